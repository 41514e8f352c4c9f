// All LLM prompt constants for the Generation module.

use crate::generation::length::LengthTier;

/// System prompt for every tweet completion call.
pub const TWEET_SYSTEM: &str = "You are a viral tweet generator. \
    Generate engaging, shareable tweets that are optimized for social media. \
    Keep the tone consistent with the request and ensure the tweet is \
    well-formatted with proper spacing and emoji placement.";

/// Builds the user prompt for one tweet completion.
///
/// Embeds topic, mood, tone, the length-tier instruction, and — only when
/// requested — the emoji and hashtag lists.
// TODO: thread `language` into the prompt; today it only participates in the
// cache key, so non-English requests still generate English tweets.
pub fn build_tweet_prompt(
    topic: &str,
    mood: &str,
    tone: &str,
    length: LengthTier,
    emojis: &[String],
    hashtags: &[String],
) -> String {
    let mut prompt = format!(
        "Generate a viral tweet about {topic} with a {mood} tone.\n\
         The tweet should be {tone} in style.\n\
         {}",
        length.instruction()
    );

    if !emojis.is_empty() {
        prompt.push_str(&format!("\nInclude these emojis: {}", emojis.join(" ")));
    }
    if !hashtags.is_empty() {
        prompt.push_str(&format!("\nInclude these hashtags: {}", hashtags.join(" ")));
    }

    prompt.push_str("\nMake it engaging and shareable.");
    prompt
}
