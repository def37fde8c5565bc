//! Chat session over the thinking engine
//!
//! Keeps the visible transcript. The assistant reply is appended when the
//! engine reports that the run has finished, never on a separate timer.

use crate::runtime::{EngineError, ThinkingEngine};
use crate::state_machine::RunId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Persona prompt that opens every transcript
pub const SYSTEM_PROMPT: &str = "You are Debie, a specialized AI assistant for diabetes management.";

/// A one-click prompt offered by the chat input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickPrompt {
    pub label: &'static str,
    pub prompt: &'static str,
}

pub const QUICK_PROMPTS: &[QuickPrompt] = &[
    QuickPrompt {
        label: "Routine",
        prompt: "Create a daily routine for me",
    },
    QuickPrompt {
        label: "Meal Plan",
        prompt: "Generate a healthy meal plan for the week",
    },
    QuickPrompt {
        label: "Doctor's Report",
        prompt: "Analyze my doctor's report and explain it in simple terms",
    },
    QuickPrompt {
        label: "Analyze",
        prompt: "Analyze this data for insights",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// One user's conversation with the assistant
pub struct ChatSession {
    engine: ThinkingEngine,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(engine: ThinkingEngine) -> Self {
        let mut session = Self {
            engine,
            messages: Vec::new(),
        };
        session.push(Role::System, SYSTEM_PROMPT);
        session
    }

    pub fn engine(&self) -> &ThinkingEngine {
        &self.engine
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send a user message and wait for the assistant's answer.
    ///
    /// # Errors
    ///
    /// `ChatError::EmptyMessage` for blank input. Engine errors if the run is
    /// superseded or the engine stops; no assistant message is added then.
    pub async fn send_message(&mut self, text: &str) -> Result<String, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        self.push(Role::User, text);
        let run_id = self.engine.start(text).await?;
        tracing::debug!(run_id = %run_id, "Waiting for thinking to finish");

        let answer = self.await_answer(run_id).await?;
        self.push(Role::Assistant, &answer);
        Ok(answer)
    }

    async fn await_answer(&self, run_id: RunId) -> Result<String, ChatError> {
        match self.engine.wait_for_answer(run_id).await {
            Ok(answer) => Ok(answer),
            Err(e) => {
                tracing::warn!(run_id = %run_id, error = %e, "No answer for message");
                Err(e.into())
            }
        }
    }

    /// Clear the thinking panel. The transcript is kept.
    ///
    /// # Errors
    ///
    /// `ChatError::Engine` if the engine has stopped.
    pub async fn reset_thinking(&self) -> Result<(), ChatError> {
        self.engine.reset().await.map_err(ChatError::from)
    }

    /// Tear down the session, cancelling any pending engine timer
    pub async fn close(self) {
        self.engine.shutdown().await;
    }

    fn push(&mut self, role: Role, content: &str) {
        let id = (self.messages.len() + 1).to_string();
        self.messages.push(ChatMessage {
            id,
            role,
            content: content.to_string(),
        });
    }
}
