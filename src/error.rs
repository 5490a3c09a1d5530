//! 错误类型定义
//!
//! 按子系统划分：提取错误（Extractor 逐张图片的失败原因）、
//! 服务错误（HTTP handler 的统一 500 出口）

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// 单张图片提取失败的原因
///
/// 提取流程不做重试：失败的图片被记录后跳过，不会出现在输出文档中
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// 读取图片文件失败
    #[error("读取图片失败: {0}")]
    ReadImage(#[from] std::io::Error),

    /// 图像模型调用失败
    #[error("图像模型调用失败: {0}")]
    VisionCall(#[from] async_openai::error::OpenAIError),

    /// 模型回复内容为空
    #[error("模型回复内容为空")]
    EmptyReply,

    /// 模型回复无法解析为 JSON
    #[error("模型回复不是合法的 JSON: {0}")]
    InvalidReply(#[from] serde_json::Error),

    /// 模型回复是合法 JSON 但不是对象
    #[error("模型回复不是 JSON 对象")]
    NotAnObject,
}

/// API 服务错误
///
/// 所有 handler 内部失败（远程表、模型调用）统一映射为 500 返回调用方
#[derive(Debug)]
pub struct ServiceError(pub anyhow::Error);

impl<E> From<E> for ServiceError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        ServiceError(err.into())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        tracing::error!("请求处理失败: {:#}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("服务内部错误: {}", self.0),
        )
            .into_response()
    }
}
