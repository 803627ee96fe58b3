//! Prompt templates for LLM analysis

use rivalwatch_core::ExtractedPage;

use crate::provider::ChatMessage;

/// System prompt for free-text analysis
pub const TEXT_SYSTEM_PROMPT: &str = r#"You are an expert in law and in competitive analysis of the legal services market. Analyze the text (service description, law firm landing page, advertisement) and return a structured JSON answer.

Answer format (strict JSON):
{
    "strengths": ["strength 1", "strength 2", ...],
    "weaknesses": ["weakness 1", "weakness 2", ...],
    "unique_offers": ["unique offer 1", ...],
    "recommendations": ["recommendation 1", "recommendation 2", ...],
    "summary": "Short summary of the analysis"
}

Important:
- 3-5 items in each array
- Judge from the client's point of view and the way legal services are presented: clarity, trust, risky wording"#;

/// System prompt for image analysis
pub const IMAGE_SYSTEM_PROMPT: &str = r#"You are an expert in visual marketing and design for the legal sector. Analyze the image (landing page, banner, law firm website) and return a structured JSON answer.

Answer format (strict JSON):
{
    "description": "Detailed description of what is shown",
    "marketing_insights": ["insight 1", "insight 2", ...],
    "visual_style_score": 7,
    "visual_style_analysis": "Analysis of the visual style: how serious and trustworthy it looks",
    "recommendations": ["recommendation 1", "recommendation 2", ...]
}

Important:
- visual_style_score is an integer from 0 to 10 (including the impression of trust for a legal topic)
- 3-5 items in each array
- Judge: presentation of legal services, readability, color, typography"#;

/// System prompt for fetched page analysis
///
/// The model picks one of two field groups depending on what the page is.
pub const PAGE_SYSTEM_PROMPT: &str = r#"You are a legal expert. From the page content (headings, paragraph) decide what kind of page it is and fill in the JSON.

If it is news, legislative updates or announcements (legal portals, reference systems):
- Fill: news_highlights (what is new, key changes), attention_points (what a lawyer should watch out for), key_topics (key topics or sections), summary (short summary).
- Leave strengths, weaknesses, unique_offers, recommendations as empty arrays [].

If it is a description of legal services, a law firm landing page or an advertisement:
- Fill: strengths, weaknesses, unique_offers, recommendations, summary.
- Leave news_highlights, attention_points, key_topics as empty arrays [].

Answer format (strict JSON):
{
    "strengths": [],
    "weaknesses": [],
    "unique_offers": [],
    "recommendations": [],
    "summary": "Short summary",
    "news_highlights": [],
    "attention_points": [],
    "key_topics": []
}

Only fill the arrays that match the page type. Always fill summary. 3-7 items in each non-empty array."#;

const IMAGE_USER_PROMPT: &str =
    "Analyze this image (legal topic: landing page, banner, website) in terms of marketing and trust:";

/// Messages for a free-text analysis
pub fn text_messages(text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(TEXT_SYSTEM_PROMPT),
        ChatMessage::user(format!("Analyze the text (legal sector):\n\n{}", text)),
    ]
}

/// Messages for an image analysis
pub fn image_messages(image: &[u8], mime_type: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(IMAGE_SYSTEM_PROMPT),
        ChatMessage::user_with_image(IMAGE_USER_PROMPT, image, mime_type),
    ]
}

/// Page content block handed to the model, or `None` when nothing was extracted
pub fn page_content(page: &ExtractedPage) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(title) = &page.title {
        parts.push(format!("Page title: {}", title));
    }
    if let Some(heading) = &page.heading {
        parts.push(format!("Main heading (H1): {}", heading));
    }
    if let Some(excerpt) = &page.excerpt {
        parts.push(format!("First paragraph / content fragment: {}", excerpt));
    }

    let combined = parts.join("\n\n");
    if combined.trim().is_empty() {
        None
    } else {
        Some(combined)
    }
}

/// Messages for a page analysis built from already-combined page content
pub fn page_messages(content: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(PAGE_SYSTEM_PROMPT),
        ChatMessage::user(format!("Analyze the page content:\n\n{}", content)),
    ]
}
