use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::input::ImageAttachment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Model => write!(f, "model"),
        }
    }
}

/// One piece of a turn's content. Most turns are a single text part; turns
/// that carried an image attachment keep it alongside the text so the full
/// transcript can be replayed to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentPart {
    Text { text: String },
    Image { image: ImageAttachment },
}

impl ContentPart {
    pub fn text(s: impl Into<String>) -> Self {
        ContentPart::Text { text: s.into() }
    }
}

/// One exchange unit in a conversation. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<ContentPart>,
    /// Position in the conversation, monotonically increasing from zero.
    pub order: u64,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    /// Concatenated text parts; image parts contribute nothing.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text { text } => Some(text.as_str()),
                ContentPart::Image { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// The ordered transcript of one session. This is the literal history
/// replayed to the language model on every follow-up, so insertion order is
/// significant and strict user/model alternation is enforced at the append
/// boundary.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    turns: Vec<Turn>,
    next_order: u64,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    fn append(&mut self, role: Role, parts: Vec<ContentPart>) -> Result<(), SessionError> {
        let expected = match self.turns.last() {
            None => Role::User,
            Some(last) if last.role == Role::User => Role::Model,
            Some(_) => Role::User,
        };
        if role != expected {
            return Err(SessionError::InvalidTurnSequence { expected });
        }
        self.turns.push(Turn {
            role,
            parts,
            order: self.next_order,
            created_at: Utc::now(),
        });
        self.next_order += 1;
        Ok(())
    }

    pub fn append_user_turn(&mut self, parts: Vec<ContentPart>) -> Result<(), SessionError> {
        self.append(Role::User, parts)
    }

    pub fn append_model_turn(&mut self, parts: Vec<ContentPart>) -> Result<(), SessionError> {
        self.append(Role::Model, parts)
    }

    /// Discards the entire transcript. Called when a new top-level research
    /// request begins: starting a new topic forgets the previous one.
    pub fn reset(&mut self) {
        self.turns.clear();
        self.next_order = 0;
    }

    /// Removes a trailing user turn left behind by a failed exchange, so the
    /// transcript never ends mid-exchange. No-op on a well-formed transcript.
    pub fn rollback_pending_user(&mut self) {
        if matches!(self.turns.last(), Some(t) if t.role == Role::User) {
            self.turns.pop();
        }
    }

    pub fn last_model_turn(&self) -> Option<&Turn> {
        self.turns.iter().rev().find(|t| t.role == Role::Model)
    }

    pub fn as_history(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
