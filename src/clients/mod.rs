pub mod llm;
pub mod supabase;

pub use llm::LlmClient;
pub use supabase::{QuestionFilter, SupabaseClient};
