//! Length tiers — map the requested length to a prompt instruction and a
//! token budget.
//!
//! The tier string is deliberately NOT validated: anything that is not
//! "short" or "medium" falls into the long tier, matching the wire contract
//! clients already rely on.

/// The three supported tweet length tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthTier {
    Short,
    Medium,
    Long,
}

impl LengthTier {
    /// Resolves a raw request string to a tier. Unknown values map to `Long`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "short" => LengthTier::Short,
            "medium" => LengthTier::Medium,
            _ => LengthTier::Long,
        }
    }

    /// Canned phrasing embedded in the generation prompt.
    pub fn instruction(self) -> &'static str {
        match self {
            LengthTier::Short => "Keep it very concise (around 100 characters).",
            LengthTier::Medium => "Make it medium length (around 200 characters).",
            LengthTier::Long => "Use the full character limit (280 characters).",
        }
    }

    /// Token budget passed to the completion call.
    pub fn max_tokens(self) -> u32 {
        match self {
            LengthTier::Short => 100,
            LengthTier::Medium => 200,
            LengthTier::Long => 280,
        }
    }
}
