//! Deterministic prompt construction. Every builder is a pure function of its
//! inputs; conversation state is never touched here.

use crate::input::ImageAttachment;

/// A rendered prompt: instruction text plus an optional inline image for the
/// vision-capable model path.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub text: String,
    pub image: Option<ImageAttachment>,
}

impl Prompt {
    pub fn text_only(text: String) -> Self {
        Self { text, image: None }
    }

    pub fn with_image(text: String, image: ImageAttachment) -> Self {
        Self {
            text,
            image: Some(image),
        }
    }
}

/// Truncates to at most `max_chars` characters (not bytes), cutting hard at
/// the character boundary rather than at sentence or word breaks.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// The initial research-report prompt. `material` is the aggregated source
/// text, cut to the first `article_budget` characters.
pub fn synthesis_prompt(goal: &str, material: &str, article_budget: usize) -> Prompt {
    Prompt::text_only(format!(
        "Based on the following articles, write a detailed report on the topic: '{}'. \
         Use Markdown. ARTICLES: --- {}",
        goal,
        truncate_chars(material, article_budget)
    ))
}

pub fn report_image_prompt(image: &ImageAttachment) -> Prompt {
    Prompt::with_image(
        "Write a detailed report on the subject shown in this image. Use Markdown.".to_string(),
        image.clone(),
    )
}

pub fn explain_topic_prompt(category: &str, topic: &str, difficulty: &str) -> Prompt {
    Prompt::text_only(format!(
        "You are a friendly teacher. Explain the {} topic '{}' to a {}. \
         Keep the explanation accurate and engaging, and use Markdown.",
        category, topic, difficulty
    ))
}

pub fn explain_url_prompt(page_text: &str, difficulty: &str, url_budget: usize) -> Prompt {
    Prompt::text_only(format!(
        "You are a friendly teacher. Explain the following article to a {}. \
         Use Markdown. ARTICLE: --- {}",
        difficulty,
        truncate_chars(page_text, url_budget)
    ))
}

pub fn explain_image_prompt(difficulty: &str, image: &ImageAttachment) -> Prompt {
    Prompt::with_image(
        format!(
            "You are a friendly teacher. Explain what is shown in this image to a {}. \
             Use Markdown.",
            difficulty
        ),
        image.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesis_material_is_cut_to_exactly_the_budget() {
        let material = "a".repeat(9000);
        let prompt = synthesis_prompt("quantum computing", &material, 8000);

        let articles = prompt.text.split("ARTICLES: --- ").nth(1).unwrap();
        assert_eq!(articles, &material[..8000]);
        assert_eq!(articles.len(), 8000);
    }

    #[test]
    fn short_material_is_untouched() {
        let prompt = synthesis_prompt("ants", "two short paragraphs", 8000);
        assert!(prompt.text.ends_with("ARTICLES: --- two short paragraphs"));
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        // four 3-byte glyphs
        let s = "日本語文";
        assert_eq!(truncate_chars(s, 2), "日本");
        assert_eq!(truncate_chars(s, 10), s);
    }

    #[test]
    fn explain_topic_binds_category_topic_and_difficulty() {
        let prompt = explain_topic_prompt("Science", "black holes", "10-year-old");
        assert!(prompt.text.contains("Science topic 'black holes'"));
        assert!(prompt.text.contains("10-year-old"));
        assert!(prompt.image.is_none());
    }

    #[test]
    fn explain_url_truncates_page_text() {
        let page = "x".repeat(5000);
        let prompt = explain_url_prompt(&page, "college student", 4000);
        let article = prompt.text.split("ARTICLE: --- ").nth(1).unwrap();
        assert_eq!(article.len(), 4000);
    }

    #[test]
    fn image_prompts_carry_the_attachment() {
        let image = ImageAttachment {
            media_type: "image/jpeg".into(),
            data: "Zm9v".into(),
        };
        let prompt = explain_image_prompt("beginner", &image);
        assert_eq!(prompt.image.as_ref().unwrap().media_type, "image/jpeg");
    }
}
