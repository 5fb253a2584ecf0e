/// Appended to text cut to fit the token budget.
pub const TRUNCATION_MARKER: &str = "\n\n[... remainder truncated due to length ...]";

/// A paragraph break is used as the cut point only if it keeps at least
/// this fraction of the allowed characters.
const PARAGRAPH_CUT_MIN_FRACTION: f64 = 0.8;

/// Estimated token count: characters divided by the per-token ratio.
pub fn estimate_tokens(text: &str, chars_per_token: usize) -> usize {
    text.chars().count() / chars_per_token.max(1)
}

/// Bound text to `max_tokens`, keeping the beginning of the document.
///
/// Text within budget is returned unchanged. Otherwise it is cut at
/// `max_tokens * chars_per_token` characters, or at the last paragraph break
/// if that break lies in the final fifth of the window, and the truncation
/// marker is appended.
pub fn truncate_to_budget(text: &str, max_tokens: usize, chars_per_token: usize) -> String {
    let chars_per_token = chars_per_token.max(1);
    let estimated = estimate_tokens(text, chars_per_token);
    if estimated <= max_tokens {
        return text.to_string();
    }

    let max_chars = max_tokens.saturating_mul(chars_per_token);
    tracing::warn!(
        estimated_tokens = estimated,
        max_tokens,
        "Text exceeds token budget, truncating"
    );

    let cut = text
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    let window = &text[..cut];

    let mut end = cut;
    if let Some(para) = window.rfind("\n\n") {
        let para_chars = window[..para].chars().count();
        if para_chars as f64 >= max_chars as f64 * PARAGRAPH_CUT_MIN_FRACTION {
            end = para;
        }
    }

    let mut truncated = String::with_capacity(end + TRUNCATION_MARKER.len());
    truncated.push_str(&text[..end]);
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

/// Whether `truncate_to_budget` cut this text.
pub fn was_truncated(bounded: &str, original: &str) -> bool {
    bounded.len() != original.len() && bounded.ends_with(TRUNCATION_MARKER)
}
