use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// An inline image, base64-encoded for transport to the model API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttachment {
    pub media_type: String,
    pub data: String,
}

/// What the user handed us to research. Exactly one kind per request;
/// ambiguity is resolved once at the boundary by [`ResearchInput::from_fields`].
#[derive(Debug, Clone, PartialEq)]
pub enum ResearchInput {
    Topic(String),
    Url(String),
    Image(ImageAttachment),
}

impl ResearchInput {
    /// Validates raw form-style fields into a single input kind.
    /// Priority when several are present: URL > image > topic.
    pub fn from_fields(
        topic: Option<String>,
        url: Option<String>,
        image: Option<ImageAttachment>,
    ) -> Result<Self, SessionError> {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            return Ok(ResearchInput::Url(url));
        }
        if let Some(image) = image.filter(|i| !i.data.is_empty()) {
            return Ok(ResearchInput::Image(image));
        }
        if let Some(topic) = topic.filter(|t| !t.trim().is_empty()) {
            return Ok(ResearchInput::Topic(topic));
        }
        Err(SessionError::NoInputProvided)
    }

    /// How this input reads in the transcript's opening user turn.
    pub fn display_text(&self) -> String {
        match self {
            ResearchInput::Topic(topic) => topic.clone(),
            ResearchInput::Url(url) => url.clone(),
            ResearchInput::Image(_) => "[image]".to_string(),
        }
    }
}

/// The two synthesis styles the assistant supports.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionMode {
    /// A structured research report built from searched source material.
    Report,
    /// An explanation pitched at a target audience, e.g. "10-year-old".
    Explain { difficulty: String },
}

#[derive(Debug, Clone)]
pub struct ResearchRequest {
    pub input: ResearchInput,
    pub mode: SessionMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> ImageAttachment {
        ImageAttachment {
            media_type: "image/png".into(),
            data: "aGVsbG8=".into(),
        }
    }

    #[test]
    fn url_wins_over_image_and_topic() {
        let input = ResearchInput::from_fields(
            Some("black holes".into()),
            Some("https://example.com/a".into()),
            Some(image()),
        )
        .unwrap();
        assert_eq!(input, ResearchInput::Url("https://example.com/a".into()));
    }

    #[test]
    fn image_wins_over_topic() {
        let input =
            ResearchInput::from_fields(Some("black holes".into()), None, Some(image())).unwrap();
        assert!(matches!(input, ResearchInput::Image(_)));
    }

    #[test]
    fn blank_fields_are_treated_as_absent() {
        let input = ResearchInput::from_fields(Some("black holes".into()), Some("  ".into()), None)
            .unwrap();
        assert_eq!(input, ResearchInput::Topic("black holes".into()));
    }

    #[test]
    fn all_absent_is_no_input() {
        let err = ResearchInput::from_fields(None, Some("".into()), None).unwrap_err();
        assert!(matches!(err, SessionError::NoInputProvided));
    }
}
