//! Simulated thinking process for the Debie diabetes assistant
//!
//! A prompt is classified into a category, the category's canned reasoning
//! script is revealed one step per tick, and a fixed final answer follows.

pub mod catalog;
pub mod chat;
pub mod classify;
pub mod config;
pub mod runtime;
pub mod state_machine;

pub use catalog::{script, PromptCategory, Script, StepTemplate};
pub use chat::{ChatError, ChatMessage, ChatSession, Role, QUICK_PROMPTS};
pub use classify::classify;
pub use config::EngineConfig;
pub use runtime::{EngineError, EngineNotification, ThinkingEngine};
pub use state_machine::{RunId, ThinkingSnapshot, ThinkingStep};
