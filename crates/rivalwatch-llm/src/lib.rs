//! LLM integration for rivalwatch
//!
//! Chat completions against DeepSeek (primary) and OpenAI (secondary and
//! vision), tolerant decoding of model replies into fixed result shapes.

pub mod error;
pub mod provider;
pub mod openai;
pub mod prompts;
pub mod parser;
pub mod normalize;
pub mod client;

pub use error::LlmError;
pub use provider::{ChatProvider, ChatMessage};
pub use openai::OpenAiCompatProvider;
pub use parser::parse_json_object;
pub use client::{AnalysisClient, AnalysisClientConfig, PrimaryConfig, SecondaryConfig, EMPTY_PAGE_SUMMARY};
