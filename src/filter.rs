//! Word filter — flags messages containing denylisted terms.
//!
//! Runs on every non-bot message before any reply is considered.
//! The check is plain substring containment over normalized text;
//! terms are fixed literals, not patterns.

/// Classifies message text against a denylist of terms.
#[derive(Debug, Clone)]
pub struct WordFilter {
    terms: Vec<String>,
}

impl WordFilter {
    /// Create a filter from a list of terms. Terms are lowercased on the
    /// way in so the containment check stays case-insensitive.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(|t| t.into().to_lowercase())
                .collect(),
        }
    }

    /// The fixed denylist the bot ships with.
    pub fn default_terms() -> Self {
        Self::new(["bad word 1", "bad word 2", "bad word 3"])
    }

    /// True if the normalized text contains any denylisted term.
    ///
    /// Normalization lowercases and strips ASCII punctuation, so
    /// "B.a.d word 1!" still matches "bad word 1".
    pub fn is_flagged(&self, text: &str) -> bool {
        let normalized = normalize(text);
        self.terms.iter().any(|term| normalized.contains(term))
    }
}

impl Default for WordFilter {
    fn default() -> Self {
        Self::default_terms()
    }
}

/// Lowercase and drop ASCII punctuation. Whitespace is preserved so
/// multi-word terms keep their shape.
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect()
}
