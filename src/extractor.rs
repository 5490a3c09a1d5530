//! 提取批处理 - Extractor
//!
//! 遍历截图目录，按文件名顺序逐张调用图像理解模型，把成功解析的
//! 试题累积为一个 JSON 文档。单线程顺序处理：同一时刻只有一个
//! 模型调用在途。不做重试，不做断点续传，运行中途崩溃会丢失全部
//! 未落盘的记录。

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::fs;
use tracing::{info, warn};

use crate::clients::LlmClient;
use crate::error::ExtractError;

/// 单张图片的提取失败记录
#[derive(Debug)]
pub struct ExtractFailure {
    pub file_name: String,
    pub reason: ExtractError,
}

/// 一次提取运行的完整结果
///
/// 成功的记录按文件名字典序排列。失败不产生占位记录，只进入
/// failures 列表供最终统计报告使用；输出文档里对应的是一个缺口。
#[derive(Debug, Default)]
pub struct ExtractionReport {
    pub records: Vec<Value>,
    pub failures: Vec<ExtractFailure>,
}

/// 执行完整的提取流程
///
/// # 参数
/// - `llm`: 注入的模型客户端
/// - `screenshots_dir`: 截图目录
/// - `output_path`: 输出 JSON 文档路径（已存在则整体覆盖）
pub async fn run_extraction(
    llm: &LlmClient,
    screenshots_dir: &str,
    output_path: &str,
) -> Result<ExtractionReport> {
    let dir = Path::new(screenshots_dir);
    if !dir.exists() {
        anyhow::bail!("截图目录不存在: {}", screenshots_dir);
    }

    let paths = collect_image_paths(dir).await?;
    info!("📁 找到 {} 张待处理截图", paths.len());

    let mut report = ExtractionReport::default();

    for path in &paths {
        let file_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        info!("正在处理 {}...", file_name);

        match extract_single(llm, path).await {
            Ok(record) => {
                let preview = record.get("latex").and_then(Value::as_str).unwrap_or_default();
                info!("✓ 提取成功: {}", crate::logging::truncate_text(preview, 40));
                report.records.push(record);
            }
            Err(reason) => {
                warn!("⚠️ {} 提取失败: {}", file_name, reason);
                report.failures.push(ExtractFailure { file_name, reason });
            }
        }
    }

    write_database_json(&report.records, output_path).await?;

    Ok(report)
}

/// 处理单张截图：读文件 → 模型调用 → 解析回复
async fn extract_single(llm: &LlmClient, path: &Path) -> Result<Value, ExtractError> {
    let image_bytes = fs::read(path).await?;
    // collect_image_paths 只会给到 png/jpg
    let mime_type = mime_for_path(path).unwrap_or("image/png");

    llm.extract_question(&image_bytes, mime_type).await
}

/// 扫描目录并收集待处理的图片路径，按文件名字典序排列
pub async fn collect_image_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("无法读取截图目录: {}", dir.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if mime_for_path(&path).is_some() {
            paths.push(path);
        }
    }

    paths.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));

    Ok(paths)
}

/// 把累积的记录序列化为单个 JSON 文档，整体覆盖写入
///
/// UTF-8，非 ASCII 字符不转义（格鲁吉亚语题干原样落盘）
pub async fn write_database_json(records: &[Value], output_path: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(records).context("序列化提取结果失败")?;

    fs::write(output_path, json)
        .await
        .with_context(|| format!("写入输出文档失败: {}", output_path))?;

    Ok(())
}

/// 扩展名对应的 MIME 类型；不支持的扩展名返回 None
fn mime_for_path(path: &Path) -> Option<&'static str> {
    match path
        .extension()
        .and_then(|s| s.to_str())?
        .to_ascii_lowercase()
        .as_str()
    {
        "png" => Some("image/png"),
        "jpg" => Some("image/jpeg"),
        _ => None,
    }
}
