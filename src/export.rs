//! Report export: stateless transformations of the latest model turn's text.

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::error::SessionError;

/// Renders normalized plain text into a paginated document (e.g. PDF).
/// External collaborator; the core never looks inside the bytes.
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, plain_text: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    PlainText,
    Document,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: &'static str,
}

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
// Only a `* ` at line start is a bullet; a mid-line asterisk is prose and
// stays untouched.
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\* (.*?)$").unwrap());
static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#+\s*(.*?)$\n?").unwrap());

/// Strips emphasis markers and flattens bullets and headings to their plain
/// line equivalents. Deterministic, so exports are idempotent.
pub fn normalize_markdown(text: &str) -> String {
    let text = BOLD.replace_all(text, "$1");
    let text = BULLET.replace_all(&text, "- $1");
    HEADING.replace_all(&text, "$1\n\n").into_owned()
}

/// Best-effort degradation to the Latin-1 repertoire: any character outside
/// it becomes `?`. Never fails.
pub fn degrade_to_latin1(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) <= 0xFF { c } else { '?' })
        .collect()
}

fn encode_latin1(text: &str) -> Vec<u8> {
    // Caller guarantees every char is <= U+00FF.
    text.chars().map(|c| c as u8).collect()
}

pub fn build_artifact(
    text: &str,
    format: ExportFormat,
    renderer: Option<&dyn DocumentRenderer>,
) -> Result<ExportArtifact, SessionError> {
    match format {
        ExportFormat::Markdown => Ok(ExportArtifact {
            bytes: text.as_bytes().to_vec(),
            content_type: "text/markdown",
            filename: "ai_report.md",
        }),
        ExportFormat::PlainText => {
            let plain = degrade_to_latin1(&normalize_markdown(text));
            Ok(ExportArtifact {
                bytes: encode_latin1(&plain),
                content_type: "text/plain; charset=iso-8859-1",
                filename: "ai_report.txt",
            })
        }
        ExportFormat::Document => {
            let renderer = renderer.ok_or_else(|| {
                SessionError::Export(anyhow::anyhow!("no document renderer configured"))
            })?;
            let plain = degrade_to_latin1(&normalize_markdown(text));
            let bytes = renderer.render(&plain).map_err(SessionError::Export)?;
            Ok(ExportArtifact {
                bytes,
                content_type: "application/pdf",
                filename: "ai_report.pdf",
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_bold_markers() {
        assert_eq!(
            normalize_markdown("a **bold** claim and **another**"),
            "a bold claim and another"
        );
    }

    #[test]
    fn bullets_become_dashes() {
        assert_eq!(
            normalize_markdown("* first\n* second\n"),
            "- first\n- second\n"
        );
    }

    #[test]
    fn mid_line_asterisks_are_not_bullets() {
        assert_eq!(
            normalize_markdown("a rating of 4 * 5 stars\n* real bullet\n"),
            "a rating of 4 * 5 stars\n- real bullet\n"
        );
    }

    #[test]
    fn headings_flatten_to_title_and_blank_line() {
        assert_eq!(
            normalize_markdown("## Black Holes\nThey are dense.\n"),
            "Black Holes\n\nThey are dense.\n"
        );
    }

    #[test]
    fn latin1_degradation_replaces_unsupported_glyphs() {
        assert_eq!(degrade_to_latin1("caf\u{e9} \u{2014} 50\u{b0}"), "caf\u{e9} ? 50\u{b0}");
    }

    #[test]
    fn plain_text_export_emits_latin1_bytes() {
        let artifact = build_artifact("caf\u{e9}", ExportFormat::PlainText, None).unwrap();
        assert_eq!(artifact.bytes, vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(artifact.filename, "ai_report.txt");
    }

    #[test]
    fn markdown_export_is_a_passthrough() {
        let text = "# Title\n**bold** stays";
        let artifact = build_artifact(text, ExportFormat::Markdown, None).unwrap();
        assert_eq!(artifact.bytes, text.as_bytes());
    }

    #[test]
    fn export_is_idempotent() {
        let text = "# Report\n* point one\n* point \u{2014} two\n";
        let a = build_artifact(text, ExportFormat::PlainText, None).unwrap();
        let b = build_artifact(text, ExportFormat::PlainText, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn document_export_without_renderer_is_an_error() {
        let err = build_artifact("text", ExportFormat::Document, None).unwrap_err();
        assert!(matches!(err, SessionError::Export(_)));
    }

    struct EchoRenderer;

    impl DocumentRenderer for EchoRenderer {
        fn render(&self, plain_text: &str) -> Result<Vec<u8>> {
            Ok(plain_text.as_bytes().to_vec())
        }
    }

    #[test]
    fn document_export_hands_renderer_normalized_text() {
        let artifact =
            build_artifact("**bold**", ExportFormat::Document, Some(&EchoRenderer)).unwrap();
        assert_eq!(artifact.bytes, b"bold");
        assert_eq!(artifact.content_type, "application/pdf");
    }
}
