//! The session orchestrator: turns a one-shot request into a stateful,
//! multi-turn research conversation.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::classify::TopicClassifier;
use crate::config::Config;
use crate::conversation::{ContentPart, ConversationState, Turn};
use crate::error::SessionError;
use crate::export::{self, DocumentRenderer, ExportArtifact, ExportFormat};
use crate::fetch::SourceFetcher;
use crate::input::{ResearchInput, ResearchRequest, SessionMode};
use crate::llm::LanguageModel;
use crate::prompt::{self, Prompt};

/// One user's isolated, linear conversation. Created by the calling layer
/// (one per session key) and passed by handle into every orchestrator
/// operation; nothing here is shared across sessions.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    state: ConversationState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: ConversationState::new(),
        }
    }

    pub fn history(&self) -> &[Turn] {
        self.state.as_history()
    }
}

/// The completed exchange returned to the caller after each model call.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub user_message: String,
    pub model_text: String,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Candidate labels handed to the zero-shot classifier.
    pub labels: Vec<String>,
    /// Top label is accepted only above this confidence.
    pub confidence_threshold: f64,
    /// Category used when the classifier is not confident enough.
    pub fallback_label: String,
    pub article_char_budget: usize,
    pub url_char_budget: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            labels: vec![
                "Science".into(),
                "Technology".into(),
                "History".into(),
                "Arts".into(),
                "Sports".into(),
                "Health".into(),
                "General".into(),
            ],
            confidence_threshold: 0.5,
            fallback_label: "General".into(),
            article_char_budget: 8000,
            url_char_budget: 4000,
        }
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            labels: config.labels.clone(),
            confidence_threshold: config.confidence_threshold,
            fallback_label: config.fallback_label.clone(),
            article_char_budget: config.article_char_budget,
            url_char_budget: config.url_char_budget,
        }
    }
}

/// Control loop over the three unreliable collaborators. Each operation takes
/// `&mut Session` and runs to completion, so exchanges within one session
/// never interleave.
pub struct Orchestrator {
    fetcher: SourceFetcher,
    classifier: Arc<dyn TopicClassifier>,
    model: Arc<dyn LanguageModel>,
    renderer: Option<Arc<dyn DocumentRenderer>>,
    opts: SessionOptions,
}

impl Orchestrator {
    pub fn new(
        fetcher: SourceFetcher,
        classifier: Arc<dyn TopicClassifier>,
        model: Arc<dyn LanguageModel>,
        opts: SessionOptions,
    ) -> Self {
        Self {
            fetcher,
            classifier,
            model,
            renderer: None,
            opts,
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn DocumentRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Starts a new top-level research exchange. Legal from any state: prior
    /// history is always discarded first, so a failed model call leaves an
    /// empty transcript rather than a partially updated one.
    pub async fn start_research(
        &self,
        session: &mut Session,
        request: ResearchRequest,
    ) -> Result<Exchange, SessionError> {
        session.state.reset();
        let user_message = request.input.display_text();
        info!(session = %session.id, goal = %user_message, "received new research goal");

        let prompt = self.build_prompt(&request).await?;

        info!(session = %session.id, "synthesizing report");
        let model_text = self
            .model
            .synthesize(&prompt)
            .await
            .map_err(SessionError::ModelCall)?;

        self.record_exchange(session, user_parts(&request.input), &model_text)?;

        Ok(Exchange {
            user_message,
            model_text,
        })
    }

    /// Asks a follow-up grounded in the full prior transcript. Fails before
    /// touching the model if no synthesis has happened yet.
    pub async fn ask_follow_up(
        &self,
        session: &mut Session,
        text: &str,
    ) -> Result<Exchange, SessionError> {
        if session.state.last_model_turn().is_none() {
            return Err(SessionError::EmptyConversation);
        }

        info!(session = %session.id, "received follow-up");
        let model_text = self
            .model
            .continue_chat(session.state.as_history(), text)
            .await
            .map_err(SessionError::ModelCall)?;

        self.record_exchange(session, vec![ContentPart::text(text)], &model_text)?;

        Ok(Exchange {
            user_message: text.to_string(),
            model_text,
        })
    }

    pub fn current_history<'a>(&self, session: &'a Session) -> &'a [Turn] {
        session.state.as_history()
    }

    /// Exports the latest model turn. Stateless and idempotent.
    pub fn export(
        &self,
        session: &Session,
        format: ExportFormat,
    ) -> Result<ExportArtifact, SessionError> {
        let turn = session
            .state
            .last_model_turn()
            .ok_or(SessionError::NoReportAvailable)?;
        export::build_artifact(&turn.text(), format, self.renderer.as_deref())
    }

    async fn build_prompt(&self, request: &ResearchRequest) -> Result<Prompt, SessionError> {
        match (&request.mode, &request.input) {
            (SessionMode::Report, ResearchInput::Topic(topic)) => {
                let blobs = self.fetcher.fetch_for_topic(topic).await;
                let material = blobs.join("\n\n");
                if material.trim().is_empty() {
                    warn!(topic = %topic, "no source material gathered; synthesizing anyway");
                }
                Ok(prompt::synthesis_prompt(
                    topic,
                    &material,
                    self.opts.article_char_budget,
                ))
            }
            (SessionMode::Report, ResearchInput::Url(url)) => {
                let material = self.fetcher.fetch_for_url(url).await;
                Ok(prompt::synthesis_prompt(
                    url,
                    &material,
                    self.opts.article_char_budget,
                ))
            }
            (SessionMode::Report, ResearchInput::Image(image)) => {
                Ok(prompt::report_image_prompt(image))
            }
            (SessionMode::Explain { difficulty }, ResearchInput::Topic(topic)) => {
                let classification = self
                    .classifier
                    .classify(topic, &self.opts.labels)
                    .await
                    .map_err(SessionError::Classification)?;
                let category = if classification.score > self.opts.confidence_threshold {
                    classification.label
                } else {
                    self.opts.fallback_label.clone()
                };
                info!(topic = %topic, category = %category, "classified topic");
                Ok(prompt::explain_topic_prompt(&category, topic, difficulty))
            }
            (SessionMode::Explain { difficulty }, ResearchInput::Url(url)) => {
                let material = self.fetcher.fetch_for_url(url).await;
                Ok(prompt::explain_url_prompt(
                    &material,
                    difficulty,
                    self.opts.url_char_budget,
                ))
            }
            (SessionMode::Explain { difficulty }, ResearchInput::Image(image)) => {
                Ok(prompt::explain_image_prompt(difficulty, image))
            }
        }
    }

    /// Appends the completed exchange as a user/model pair. Called only after
    /// a successful model call, so a failure leaves the transcript untouched.
    fn record_exchange(
        &self,
        session: &mut Session,
        user: Vec<ContentPart>,
        model_text: &str,
    ) -> Result<(), SessionError> {
        session.state.append_user_turn(user)?;
        if let Err(err) = session
            .state
            .append_model_turn(vec![ContentPart::text(model_text)])
        {
            // Keep the transcript well-formed even on an internal breach.
            session.state.rollback_pending_user();
            return Err(err);
        }
        Ok(())
    }
}

fn user_parts(input: &ResearchInput) -> Vec<ContentPart> {
    match input {
        ResearchInput::Image(image) => vec![
            ContentPart::text(input.display_text()),
            ContentPart::Image {
                image: image.clone(),
            },
        ],
        _ => vec![ContentPart::text(input.display_text())],
    }
}
