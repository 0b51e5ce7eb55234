pub mod classify;
pub mod config;
pub mod conversation;
pub mod error;
pub mod export;
pub mod fetch;
pub mod input;
pub mod llm;
pub mod prompt;
pub mod session;

pub use config::Config;
pub use error::SessionError;
pub use session::{Exchange, Orchestrator, Session, SessionOptions};
