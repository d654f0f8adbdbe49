//! Component-name normalization before embedding lookup.

use regex::Regex;

/// Words that carry no meaning in instance names and are stripped before lookup.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "this",
    "instance",
    "impl",
    "imp",
    "sensor",
    "subsystem",
    "system",
    "sys",
    "sub",
    "single",
    "dual",
    "integration",
    "standard",
    "with",
    "functional",
    "devices",
    "hardware",
];

/// Names whose cleaned form is this short or shorter are discarded.
pub const MIN_NAME_LEN: usize = 2;

/// Cleans raw instance names into embedding queries.
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    stop_words: Option<Regex>,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_STOP_WORDS)
    }
}

impl NameNormalizer {
    /// Create a normalizer removing the given stop words.
    pub fn new<S: AsRef<str>>(stop_words: &[S]) -> Self {
        let alternation = stop_words
            .iter()
            .map(|w| regex::escape(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join("|");

        let stop_words = if alternation.is_empty() {
            None
        } else {
            match Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!(error = %e, "invalid stop-word pattern, stop words disabled");
                    None
                }
            }
        };

        Self { stop_words }
    }

    /// Normalize one raw name.
    ///
    /// Lowercases, strips digits and parentheses, turns underscores into
    /// spaces and removes stop words. Returns `None` when nothing longer than
    /// [`MIN_NAME_LEN`] characters remains.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let cleaned: String = raw
            .chars()
            .filter(|c| !c.is_ascii_digit() && *c != '(' && *c != ')')
            .map(|c| if c == '_' { ' ' } else { c })
            .collect::<String>()
            .to_lowercase();

        let cleaned = match &self.stop_words {
            Some(re) => re.replace_all(&cleaned, "").into_owned(),
            None => cleaned,
        };
        let cleaned = cleaned.trim();

        if cleaned.chars().count() > MIN_NAME_LEN {
            Some(cleaned.to_string())
        } else {
            None
        }
    }

    /// Normalize a list of names, dropping those that do not survive.
    pub fn clean<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        names
            .iter()
            .filter_map(|name| self.normalize(name.as_ref()))
            .collect()
    }
}
