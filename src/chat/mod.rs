// Chat module
// Session transcript state machine and per-turn orchestration


use serde::Serialize;
use tracing::debug;

use crate::Result;
use crate::generation::Generator;
use crate::prompt;
use crate::retriever::Retriever;

/// Greeting shown at the start of every session
pub const GREETING: &str = "Hi! I'm your travel assistant. Tell me about your group, \
budget, season, and trip length, and I'll suggest places to visit.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Ordered transcript of one conversation
///
/// An explicit value owned by whatever hosts the conversation (server
/// state, a test harness); there is no process-wide session. Lives only in
/// memory and dies with its host.
#[derive(Debug, Clone)]
pub struct ChatSession {
    turns: Vec<ChatTurn>,
}

impl Default for ChatSession {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    #[inline]
    pub fn new() -> Self {
        Self {
            turns: vec![ChatTurn {
                role: ChatRole::Assistant,
                content: GREETING.to_string(),
            }],
        }
    }

    #[inline]
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Reset the transcript to the initial greeting state
    #[inline]
    pub fn clear(&mut self) {
        debug!("Clearing chat transcript ({} turns)", self.turns.len());
        *self = Self::new();
    }

    /// Run one user turn through retrieve, compose, generate
    ///
    /// The user turn is recorded before anything else happens. On failure
    /// the error propagates and no assistant turn is appended, leaving the
    /// transcript consistent but incomplete.
    #[inline]
    pub async fn submit(
        &mut self,
        retriever: &Retriever,
        generator: &dyn Generator,
        text: &str,
    ) -> Result<String> {
        self.turns.push(ChatTurn {
            role: ChatRole::User,
            content: text.to_string(),
        });

        let reply = answer(retriever, generator, text).await?;

        self.turns.push(ChatTurn {
            role: ChatRole::Assistant,
            content: reply.clone(),
        });

        Ok(reply)
    }
}

/// One full retrieval-augmented turn
///
/// An explicit function chain rather than an operator pipeline, so each
/// stage stays independently callable and mockable.
#[inline]
pub async fn answer(
    retriever: &Retriever,
    generator: &dyn Generator,
    question: &str,
) -> Result<String> {
    let documents = retriever.retrieve(question).await?;
    debug!("Retrieved {} documents for prompt context", documents.len());

    let context = prompt::build_context(&documents);
    let composed = prompt::compose(&context, question);

    generator.generate(&composed)
}
