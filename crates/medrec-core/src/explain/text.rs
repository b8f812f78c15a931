//! Cleanup of generated text.

/// Collapse whitespace and cap `text` at `max_chars` characters.
///
/// Prefers cutting after the last complete sentence that fits; otherwise
/// cuts at a word boundary and appends an ellipsis. A zero budget yields
/// an empty string.
pub fn tidy(text: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }

    let head: String = collapsed.chars().take(max_chars).collect();
    if let Some(end) = head.rfind(['.', '!', '?']) {
        if end > 0 {
            return head[..=end].to_string();
        }
    }

    let budget: String = collapsed.chars().take(max_chars.saturating_sub(1)).collect();
    let cut = budget.rfind(' ').unwrap_or(budget.len());
    format!("{}…", budget[..cut].trim_end())
}
