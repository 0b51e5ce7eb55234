use thiserror::Error;

use crate::conversation::Role;

/// Failures surfaced to the caller of the session orchestrator.
///
/// Per-source fetch failures are absorbed inside [`crate::fetch`] (they
/// degrade to empty material); everything here is a hard, typed failure.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no topic, url, or image was provided")]
    NoInputProvided,

    #[error("topic classification failed: {0}")]
    Classification(anyhow::Error),

    #[error("language model call failed: {0}")]
    ModelCall(anyhow::Error),

    /// Internal invariant breach: the transcript must strictly alternate
    /// user/model turns starting with user.
    #[error("conversation turns must alternate; expected a {expected} turn next")]
    InvalidTurnSequence { expected: Role },

    #[error("no conversation in progress; start a research session first")]
    EmptyConversation,

    #[error("no report available yet")]
    NoReportAvailable,

    #[error("export failed: {0}")]
    Export(anyhow::Error),
}
