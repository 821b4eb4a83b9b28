//! Reserved vocabulary that may never be handed out as a short code.
//!
//! Membership is case-insensitive: `Admin`, `ADMIN` and `admin` are all
//! reserved when `admin` is in the set. The set is plain data injected into
//! the allocation logic, so operators can extend it at startup without
//! touching the generator.

use std::collections::HashSet;

/// Words reserved out of the box.
pub const DEFAULT_RESERVED_WORDS: &[&str] = &[
    // Framework paths
    "admin",
    "static",
    "media",
    "api",
    // Application routes
    "shorten",
    "stats",
    "health",
    // Well-known web files
    "robots",
    "favicon",
    "sitemap",
    "manifest",
    // Protocol and host names
    "www",
    "ftp",
    "http",
    "https",
    "mail",
    "email",
    // Confusing tokens
    "null",
    "undefined",
    "error",
    "test",
    "demo",
    "sample",
    // Common app routes
    "login",
    "logout",
    "register",
    "signup",
    "signin",
    "home",
    "index",
    "about",
    "contact",
    "help",
    "support",
    // Short environment names
    "app",
    "web",
    "dev",
    "prod",
    "staging",
];

/// Case-folded set of reserved words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedWords {
    words: HashSet<String>,
}

impl ReservedWords {
    /// Builds a set from arbitrary words. Blank entries are ignored.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::empty().with_words(words)
    }

    /// A set that reserves nothing.
    pub fn empty() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    /// Adds more words to the set.
    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words.extend(
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty()),
        );
        self
    }

    /// Returns true if `candidate`, lower-cased, is in the set.
    pub fn is_reserved(&self, candidate: &str) -> bool {
        self.words.contains(&candidate.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for ReservedWords {
    fn default() -> Self {
        Self::new(DEFAULT_RESERVED_WORDS)
    }
}
