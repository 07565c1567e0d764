//! Query-aware snippet extraction

/// Extract a bounded excerpt of `text` centered on query-relevant content.
///
/// Text within `max_len` characters is returned unchanged. Otherwise the
/// window of `max_len` characters is centered on the earliest
/// case-insensitive occurrence of any whitespace-split query token,
/// shifted to stay inside the text boundaries. With no token match the
/// window falls back to the start of the text. Deterministic for identical
/// `(text, query, max_len)` inputs.
pub fn extract_snippet(text: &str, query: &str, max_len: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_len {
        return text.to_string();
    }

    let start = match earliest_token_match(&chars, query) {
        Some(position) => {
            let centered = position.saturating_sub(max_len / 2);
            centered.min(chars.len() - max_len)
        }
        None => 0,
    };

    chars[start..start + max_len].iter().collect()
}

/// Character offset of the earliest case-insensitive occurrence of any
/// whitespace-split query token inside `chars`
fn earliest_token_match(chars: &[char], query: &str) -> Option<usize> {
    // One lowercase char per input char keeps offsets aligned with `chars`
    let lowered: Vec<char> = chars
        .iter()
        .map(|c| c.to_lowercase().next().unwrap_or(*c))
        .collect();

    query
        .split_whitespace()
        .filter_map(|token| {
            let needle: Vec<char> = token.to_lowercase().chars().collect();
            find_subslice(&lowered, &needle)
        })
        .min()
}

fn find_subslice(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}
