//! Plain-text extraction from serialized whiteboard diagrams.

use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct Diagram {
    elements: Vec<Value>,
}

/// Join the text of every text element of a diagram with single spaces.
///
/// Elements contribute their `originalText`, or `text` when the former is
/// absent. Blank fragments are left out, so a diagram without any visible
/// text yields an empty string, as does unparsable content.
pub fn extract_whiteboard_text(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }

    let Ok(diagram) = serde_json::from_str::<Diagram>(content) else {
        return String::new();
    };

    diagram
        .elements
        .iter()
        .filter(|element| element.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|element| {
            element
                .get("originalText")
                .or_else(|| element.get("text"))
                .and_then(Value::as_str)
        })
        .filter(|text| !text.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
