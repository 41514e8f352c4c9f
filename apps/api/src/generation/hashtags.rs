//! Hashtag suggestions derived from the topic text.
//!
//! One hashtag per topic word: lower-cased, stripped to ascii alphanumerics,
//! deduplicated preserving order, capped at five.

const MAX_SUGGESTIONS: usize = 5;

pub fn suggest_hashtags(topic: &str) -> Vec<String> {
    let mut seen = Vec::with_capacity(MAX_SUGGESTIONS);

    for word in topic.to_lowercase().split_whitespace() {
        let cleaned: String = word.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        if cleaned.is_empty() {
            continue;
        }
        let hashtag = format!("#{cleaned}");
        if !seen.contains(&hashtag) {
            seen.push(hashtag);
            if seen.len() == MAX_SUGGESTIONS {
                break;
            }
        }
    }

    seen
}
