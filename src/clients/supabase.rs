//! Supabase 表客户端
//!
//! 通过 PostgREST 接口操作远程表 questions：Loader 做批量插入，
//! API 服务做带过滤的查询。表结构和迁移由 Supabase 侧管理。

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::models::QuestionRow;

/// 试题查询过滤器
///
/// 可组合的过滤条件，多个条件之间为 AND 语义。
/// 独立于 PostgREST 语法，渲染为查询参数时才落到具体方言。
#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    points: Option<i64>,
    topic: Option<String>,
}

impl QuestionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 分值精确匹配
    pub fn with_points(mut self, points: i64) -> Self {
        self.points = Some(points);
        self
    }

    /// 知识点子串匹配（大小写不敏感）
    pub fn with_topic(mut self, needle: impl Into<String>) -> Self {
        self.topic = Some(needle.into());
        self
    }

    /// 渲染为 PostgREST 查询参数
    ///
    /// 无过滤条件时只带 select=*，即全表查询
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), "*".to_string())];

        if let Some(points) = self.points {
            pairs.push(("points".to_string(), format!("eq.{}", points)));
        }
        if let Some(topic) = &self.topic {
            pairs.push(("topic".to_string(), format!("ilike.*{}*", topic)));
        }

        pairs
    }
}

/// Supabase 客户端
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl SupabaseClient {
    /// 创建新的 Supabase 客户端
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            api_key: config.supabase_key.clone(),
            table: config.supabase_table.clone(),
        }
    }

    /// 批量插入试题行
    ///
    /// 整批一次提交。无唯一键约束：重复运行 Loader 会产生重复行，
    /// 调用方需要自行留意。
    pub async fn insert_questions(&self, rows: &[QuestionRow]) -> Result<()> {
        debug!("批量插入 {} 行到表 {}", rows.len(), self.table);

        let response = self
            .http
            .post(self.table_url())
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Prefer", "return=minimal")
            .json(rows)
            .send()
            .await
            .context("Supabase 插入请求失败")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Supabase 插入返回错误 ({}): {}", status, body);
        }

        Ok(())
    }

    /// 按过滤条件查询试题行
    ///
    /// 返回远程表给出的原始行，不做字段裁剪。无分页：结果集大小
    /// 不受限制。
    pub async fn select_questions(&self, filter: &QuestionFilter) -> Result<Vec<Value>> {
        debug!("查询表 {}，条件: {:?}", self.table, filter);

        let response = self
            .http
            .get(self.table_url())
            .query(&filter.to_query_pairs())
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .context("Supabase 查询请求失败")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Supabase 查询返回错误 ({}): {}", status, body);
        }

        let rows: Vec<Value> = response
            .json()
            .await
            .context("无法解析 Supabase 查询结果")?;

        Ok(rows)
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }
}
