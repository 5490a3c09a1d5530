//! LLM 客户端 - 业务能力层
//!
//! 封装全部模型调用：图像理解（提取试题）和对话补全（AI 辅导）
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 通过 OpenAI 兼容端点访问 Gemini 系列模型
//! - 图像以 base64 data URL 形式随 Vision 请求发送

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs, ImageDetail,
        ImageUrl,
    },
    Client,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::ExtractError;

/// 试题提取指令模板
///
/// 要求模型对一张试卷截图返回一个包含八个固定字段的 JSON 对象。
/// 字段语义与远程表 questions 的列一致。
const EXTRACT_PROMPT: &str = r#"Analyze this image of a math exam question.
Extract the data into a JSON object with the following keys:

- "number": integer (The question number found near the score)
- "points": integer (The number inside the parenthesis at the start, e.g., (1) is 1 point)
- "topic": string (Infer the mathematical topic in georgian language, e.g. "ალგებრა", "გეომეტრია", "ალბათობა")
- "type": string (Determine if it is "multiple_choice" or "open_ended" based on whether options a/b/g/d exist)
- "latex": string (Include the text of the question in Georgian unchanged; write any math formulas in LaTeX format, use $$ for blocks)
- "options": list of strings (If multiple choice, e.g., ["ა) 5", "ბ) 7"]. If open_ended, return [])
- "has_image": boolean (true if there is a geometry figure, graph, or diagram)
- "image_url": string (Always return an empty string "" for now)

Return ONLY raw JSON. Do not use Markdown formatting (no ```json)."#;

/// LLM 客户端
///
/// 职责：
/// - 调用图像理解模型，从截图提取结构化试题
/// - 提供通用的对话补全接口（AI 辅导 handler 用）
/// - 不持有任何流程状态，每次调用相互独立
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    vision_model: String,
    chat_model: String,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            vision_model: config.vision_model_name.clone(),
            chat_model: config.chat_model_name.clone(),
        }
    }

    /// 从一张试卷截图中提取结构化试题
    ///
    /// # 参数
    /// - `image_bytes`: 图片原始字节
    /// - `mime_type`: 图片 MIME 类型（image/png 或 image/jpeg）
    ///
    /// # 返回
    /// 返回模型给出的原始 JSON 对象。字段缺失在这一步不补默认值，
    /// 归一化是 Loader 的职责。
    pub async fn extract_question(
        &self,
        image_bytes: &[u8],
        mime_type: &str,
    ) -> Result<Value, ExtractError> {
        debug!("调用图像理解模型: {}", self.vision_model);
        debug!("图片大小: {} 字节", image_bytes.len());

        let data_url = format!("data:{};base64,{}", mime_type, BASE64.encode(image_bytes));

        // 构建包含指令文本和图片的用户消息
        let content_parts: Vec<ChatCompletionRequestUserMessageContentPart> = vec![
            ChatCompletionRequestUserMessageContentPart::Text(
                ChatCompletionRequestMessageContentPartText {
                    text: EXTRACT_PROMPT.to_string(),
                },
            ),
            ChatCompletionRequestUserMessageContentPart::ImageUrl(
                ChatCompletionRequestMessageContentPartImage {
                    image_url: ImageUrl {
                        url: data_url,
                        detail: Some(ImageDetail::Auto),
                    },
                },
            ),
        ];

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(ChatCompletionRequestUserMessageContent::Array(content_parts))
            .build()
            .map_err(ExtractError::VisionCall)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.vision_model)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .temperature(0.1)
            .max_tokens(2048u32)
            .build()
            .map_err(ExtractError::VisionCall)?;

        let response = self.client.chat().create(request).await?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or(ExtractError::EmptyReply)?;

        parse_extraction_reply(&content)
    }

    /// 通用的对话补全调用
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回模型的回复原文，不做任何改写
    pub async fn chat(&self, user_message: &str, system_message: Option<&str>) -> Result<String> {
        debug!("调用对话模型: {}", self.chat_model);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.chat_model)
            .messages(messages)
            .temperature(0.3)
            .max_tokens(1024u32)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("对话模型调用失败: {}", e);
            anyhow::anyhow!("对话模型调用失败: {}", e)
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("模型回复内容为空"))?;

        Ok(content)
    }
}

// ========== 辅助函数 ==========

/// 剥掉回复两端的 Markdown 代码围栏后解析为 JSON 对象
pub fn parse_extraction_reply(reply: &str) -> Result<Value, ExtractError> {
    let cleaned = strip_code_fence(reply);

    let value: Value = serde_json::from_str(&cleaned)?;

    if !value.is_object() {
        return Err(ExtractError::NotAnObject);
    }

    Ok(value)
}

/// 去除回复两端的 ```json / ``` 围栏
///
/// 模型被要求返回裸 JSON，但偶尔仍会加 Markdown 围栏
fn strip_code_fence(reply: &str) -> String {
    let re = Regex::new(r"^\s*```(?:json)?\s*|\s*```\s*$").expect("代码围栏正则无效");
    re.replace_all(reply.trim(), "").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fence_plain_json() {
        let reply = r#"{"number": 1}"#;
        assert_eq!(strip_code_fence(reply), r#"{"number": 1}"#);
    }

    #[test]
    fn test_strip_code_fence_with_json_fence() {
        let reply = "```json\n{\"number\": 1}\n```";
        assert_eq!(strip_code_fence(reply), "{\"number\": 1}");
    }

    #[test]
    fn test_strip_code_fence_with_bare_fence() {
        let reply = "```\n{\"number\": 1}\n```";
        assert_eq!(strip_code_fence(reply), "{\"number\": 1}");
    }

    #[test]
    fn test_parse_extraction_reply_valid() {
        let reply = "```json\n{\"number\": 5, \"points\": 2, \"topic\": \"ალგებრა\"}\n```";

        let value = parse_extraction_reply(reply).unwrap();

        assert_eq!(value["number"], 5);
        assert_eq!(value["topic"], "ალგებრა");
    }

    #[test]
    fn test_parse_extraction_reply_invalid_json() {
        let reply = "ბოდიში, ამ სურათზე ვერაფერს ვხედავ";

        assert!(matches!(
            parse_extraction_reply(reply),
            Err(ExtractError::InvalidReply(_))
        ));
    }

    #[test]
    fn test_parse_extraction_reply_non_object() {
        // 合法 JSON 但不是对象（比如模型返回了数组）
        let reply = "[1, 2, 3]";

        assert!(matches!(
            parse_extraction_reply(reply),
            Err(ExtractError::NotAnObject)
        ));
    }

    /// 测试对话模型连通性
    ///
    /// 运行方式：
    /// ```bash
    /// cargo test test_chat_connectivity -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_chat_connectivity() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::from_env();
        let client = LlmClient::new(&config);

        println!("\n========== 测试对话模型 ==========");
        let result = client
            .chat("მოკლედ ამიხსენი რა არის დისკრიმინანტი", None)
            .await;

        match result {
            Ok(response) => {
                println!("{}", response);
                println!("==============================\n");
                println!("✅ 对话模型调用成功！");
                assert!(!response.is_empty());
            }
            Err(e) => {
                println!("❌ 对话模型调用失败: {}", e);
                panic!("测试失败: {}", e);
            }
        }
    }

    /// 测试图像理解提取（需要本地截图）
    #[tokio::test]
    #[ignore]
    async fn test_extract_question_from_local_image() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::from_env();
        let client = LlmClient::new(&config);

        // 注意：请根据实际情况修改文件路径
        let image_path = format!("{}/page_01.png", config.screenshots_dir);
        let image_bytes = tokio::fs::read(&image_path).await.expect("读取截图失败");

        let result = client.extract_question(&image_bytes, "image/png").await;

        match result {
            Ok(value) => {
                println!("\n========== 提取结果 ==========");
                println!("{}", serde_json::to_string_pretty(&value).unwrap());
                println!("==============================\n");
                println!("✅ 图像理解调用成功！");
                assert!(value.is_object());
            }
            Err(e) => {
                println!("❌ 图像理解调用失败: {}", e);
                panic!("测试失败: {}", e);
            }
        }
    }
}
