use serde::{Deserialize, Serialize};

/// Ordered set of anchor tokens.
///
/// Anchors are trusted trading partners for price discovery and the
/// eligibility test for tracked volume. Order only decides which anchor the
/// resolver tries first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Whitelist {
    tokens: Vec<String>,
}

impl Whitelist {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut whitelist = Self { tokens: Vec::new() };
        for token in tokens {
            let token = token.as_ref().to_lowercase();
            // Closed set: a repeated entry keeps its first position
            if !whitelist.tokens.contains(&token) {
                whitelist.tokens.push(token);
            }
        }
        whitelist
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t.eq_ignore_ascii_case(token))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl From<Vec<String>> for Whitelist {
    fn from(tokens: Vec<String>) -> Self {
        Self::new(tokens)
    }
}

impl From<Whitelist> for Vec<String> {
    fn from(whitelist: Whitelist) -> Self {
        whitelist.tokens
    }
}
