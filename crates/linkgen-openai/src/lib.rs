//! # linkgen-openai
//!
//! OpenAI-compatible `LlmProvider` implementation for the linkgen agent.
//!
//! Talks to the chat-completions API over HTTP. Any server speaking the
//! same wire format (OpenAI, Azure OpenAI, vLLM, LiteLLM proxies) works by
//! pointing `OPENAI_BASE_URL` at it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use linkgen_openai::OpenAiProvider;
//!
//! let provider = OpenAiProvider::from_env()?;
//! let agent = Agent::with_defaults(Arc::new(provider), tools);
//! ```

mod openai;

pub use openai::{OpenAiConfig, OpenAiProvider};

// Re-export core types for convenience
pub use linkgen_core::{Agent, AgentError, LlmProvider, Message, Result, Role, Tool, ToolRegistry};
