//! 入库批处理 - Loader
//!
//! 读取 Extractor 产出的 JSON 文档，逐条补齐默认值后整批插入远程表。
//! 没有幂等性：对同一份文档重复运行会产生重复行（表上没有可用的
//! 唯一键，见 DESIGN.md）。插入中途失败不回滚。

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::fs;
use tracing::{info, warn};

use crate::clients::SupabaseClient;
use crate::models::QuestionRow;

/// 读取中间 JSON 文档
///
/// 文档不存在时直接报错终止（说明 Extractor 还没跑过）
pub async fn read_database_json(path: &str) -> Result<Vec<Value>> {
    if !Path::new(path).exists() {
        anyhow::bail!("未找到 {}，请先运行 ingest_exams 生成提取结果", path);
    }

    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取文档: {}", path))?;

    let records: Vec<Value> =
        serde_json::from_str(&content).with_context(|| format!("无法解析文档: {}", path))?;

    Ok(records)
}

/// 把原始记录批量归一化为入库行
pub fn normalize_batch(records: &[Value]) -> Vec<QuestionRow> {
    records.iter().map(QuestionRow::from_value).collect()
}

/// 执行完整的入库流程
///
/// # 参数
/// - `store`: 注入的远程表客户端
/// - `database_json`: 中间文档路径
///
/// # 返回
/// 返回成功插入的行数
pub async fn run_upload(store: &SupabaseClient, database_json: &str) -> Result<usize> {
    let records = read_database_json(database_json).await?;
    info!("✓ 从文档加载了 {} 条记录", records.len());

    let rows = normalize_batch(&records);

    warn!("⚠️ 没有去重逻辑：重复运行会在远程表产生重复行");
    info!("正在上传到 Supabase...");

    store.insert_questions(&rows).await?;

    info!("✅ 上传完成，共 {} 行", rows.len());

    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_read_database_json_missing_file_is_fatal() {
        let result = read_database_json("/nonexistent/database.json").await;

        let err = result.unwrap_err().to_string();
        assert!(err.contains("ingest_exams"));
    }

    #[tokio::test]
    async fn test_read_database_json_roundtrip() {
        let path = std::env::temp_dir().join(format!("exam_loader_test_{}.json", std::process::id()));
        let content = r#"[{"number": 1, "topic": "ალგებრა"}, {"points": 2}]"#;
        fs::write(&path, content).await.unwrap();

        let records = read_database_json(&path.to_string_lossy()).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["topic"], "ალგებრა");

        fs::remove_file(&path).await.unwrap();
    }

    #[test]
    fn test_normalize_batch_applies_defaults_per_record() {
        let records = vec![
            json!({ "number": 1, "points": 2, "type": "multiple_choice", "options": ["ა) 5"] }),
            json!({}),
        ];

        let rows = normalize_batch(&records);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].options.len(), 1);
        assert_eq!(rows[1].topic, "General");
        assert_eq!(rows[1].question_type, "open_ended");
        assert_eq!(rows[1].number, None);
    }
}
