//! # Exam Question Bank
//!
//! 国家数学统考试题的采集、入库与服务管线
//!
//! ## 架构设计
//!
//! 三个独立运行的组件，以中间文档（database.json）和远程表
//! （Supabase questions）为唯一衔接点，组件之间没有直接调用：
//!
//! ### ① Extractor（bin: ingest_exams）
//! - 遍历截图目录，逐张调用图像理解模型提取结构化试题
//! - 成功记录按文件名顺序累积，整体写出为一个 JSON 文档
//!
//! ### ② Loader（bin: upload_db）
//! - 读取 JSON 文档，补齐缺失字段的默认值
//! - 整批插入远程表（无去重，重复运行产生重复行）
//!
//! ### ③ Service（bin: api_server）
//! - `GET /get-questions/` 按分值/知识点过滤查询
//! - `POST /explain-solution/` AI 辅导回复
//!
//! ## 分层
//!
//! - `clients/` - 能力层：模型调用（LlmClient）、远程表（SupabaseClient）
//! - `extractor` / `loader` - 批处理层：编排一次完整的运行
//! - `api/` - 服务层：axum 路由与 handler
//! - `config` / `error` / `logging` / `models` - 公共设施

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod extractor;
pub mod loader;
pub mod logging;
pub mod models;

// 重新导出常用类型
pub use clients::{LlmClient, QuestionFilter, SupabaseClient};
pub use config::Config;
pub use error::{ExtractError, ServiceError};
pub use extractor::{run_extraction, ExtractionReport};
pub use loader::run_upload;
pub use models::QuestionRow;
