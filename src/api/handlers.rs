//! HTTP handler 实现
//!
//! 远程表或模型调用失败统一经 ServiceError 映射为 500 返回调用方，
//! 不做重试。

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::AppState;
use crate::clients::QuestionFilter;
use crate::error::ServiceError;

/// GET /get-questions/ 的查询参数
#[derive(Debug, Deserialize)]
pub struct GetQuestionsParams {
    pub points: Option<i64>,
    pub topic: Option<String>,
}

/// AI 辅导请求体
#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    /// 学生的提问
    pub user_query: String,
    /// 题目内容（含官方解答上下文）
    pub question_text: String,
}

/// AI 辅导响应体
#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub reply: String,
}

/// 按条件查询试题
///
/// points 精确匹配、topic 大小写不敏感子串匹配，同时给出时取交集。
/// 两个参数都缺省则返回全表。无分页，结果集大小不受限制。
pub async fn get_questions(
    State(state): State<AppState>,
    Query(params): Query<GetQuestionsParams>,
) -> Result<Json<Vec<Value>>, ServiceError> {
    debug!("查询试题: {:?}", params);

    let mut filter = QuestionFilter::new();
    if let Some(points) = params.points {
        filter = filter.with_points(points);
    }
    if let Some(topic) = &params.topic {
        filter = filter.with_topic(topic);
    }

    let rows = state.store.select_questions(&filter).await?;

    Ok(Json(rows))
}

/// AI 辅导
///
/// 把学生的提问和题目内容代入固定提示词模板，发给对话模型，
/// 原样返回模型的回复文本。每次调用相互独立，没有会话记忆。
pub async fn explain_solution(
    State(state): State<AppState>,
    Json(request): Json<ExplainRequest>,
) -> Result<Json<ExplainResponse>, ServiceError> {
    debug!("辅导提问长度: {} 字符", request.user_query.len());

    let prompt = build_tutor_prompt(&request.question_text, &request.user_query);
    let reply = state.llm.chat(&prompt, None).await?;

    Ok(Json(ExplainResponse { reply }))
}

/// 构建辅导提示词
///
/// 模板固定：以官方解答为准、用 $...$ 行内公式、格鲁吉亚语作答、
/// 不输出 "*" 字符、简洁且鼓励
fn build_tutor_prompt(question_text: &str, user_query: &str) -> String {
    format!(
        r#"You are an expert Math Tutor helping a student prepare for national exams.

The Context:
Question: {question_text}

The Student asks: "{user_query}"

Instructions:
1. Use the Official Solution as the ground truth.
2. Explain the step the student is stuck on clearly.
3. Use LaTeX formatting for math (e.g., $x^2$) so the website renders it correctly.
4. Be encouraging but concise.
5. Talk in Georgian language.
6. Do not use "*"."#
    )
}
