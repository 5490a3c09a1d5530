/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 试题截图存放目录
    pub screenshots_dir: String,
    /// 中间 JSON 文档路径（Extractor 写，Loader 读）
    pub database_json: String,
    /// API 服务监听地址
    pub bind_addr: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    /// 图像理解模型（Extractor 用）
    pub vision_model_name: String,
    /// 对话模型（AI 辅导用）
    pub chat_model_name: String,
    // --- Supabase 配置 ---
    pub supabase_url: String,
    pub supabase_key: String,
    pub supabase_table: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screenshots_dir: "exam_screenshots".to_string(),
            database_json: "database.json".to_string(),
            bind_addr: "0.0.0.0:8000".to_string(),
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            vision_model_name: "gemini-2.5-flash-lite".to_string(),
            chat_model_name: "gemini-flash-latest".to_string(),
            supabase_url: String::new(),
            supabase_key: String::new(),
            supabase_table: "questions".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            screenshots_dir: std::env::var("SCREENSHOTS_DIR").unwrap_or(default.screenshots_dir),
            database_json: std::env::var("DATABASE_JSON").unwrap_or(default.database_json),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(default.bind_addr),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            vision_model_name: std::env::var("VISION_MODEL_NAME").unwrap_or(default.vision_model_name),
            chat_model_name: std::env::var("CHAT_MODEL_NAME").unwrap_or(default.chat_model_name),
            supabase_url: std::env::var("SUPABASE_URL").unwrap_or(default.supabase_url),
            supabase_key: std::env::var("SUPABASE_KEY").unwrap_or(default.supabase_key),
            supabase_table: std::env::var("SUPABASE_TABLE").unwrap_or(default.supabase_table),
        }
    }
}
