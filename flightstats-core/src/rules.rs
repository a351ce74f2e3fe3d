use serde::{Deserialize, Serialize};

/// Substring rules used to classify board text.
///
/// Both the status keywords and the terminal marker are heuristics: a status
/// phrasing that matches none of the keywords counts as on time, and the
/// terminal is inferred from the carrier name rather than read from the board.
/// All matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRules {
    /// Carrier-name fragment that places an arrival in the primary terminal (T3).
    #[serde(default = "default_primary_marker")]
    pub primary_marker: String,
    #[serde(default = "default_cancelled_keywords")]
    pub cancelled_keywords: Vec<String>,
    #[serde(default = "default_delayed_keywords")]
    pub delayed_keywords: Vec<String>,
}

fn default_primary_marker() -> String { "qantas".to_string() }
fn default_cancelled_keywords() -> Vec<String> { vec!["cancelled".to_string()] }
fn default_delayed_keywords() -> Vec<String> { vec!["delayed".to_string()] }

impl Default for ClassificationRules {
    fn default() -> Self {
        Self {
            primary_marker: default_primary_marker(),
            cancelled_keywords: default_cancelled_keywords(),
            delayed_keywords: default_delayed_keywords(),
        }
    }
}

impl ClassificationRules {
    /// `airline` is expected to be lower-cased already.
    pub fn is_primary(&self, airline: &str) -> bool {
        let marker = self.primary_marker.to_lowercase();
        !marker.is_empty() && airline.contains(&marker)
    }

    pub fn mentions_cancelled(&self, status_lower: &str) -> bool {
        contains_any(status_lower, &self.cancelled_keywords)
    }

    pub fn mentions_delayed(&self, status_lower: &str) -> bool {
        contains_any(status_lower, &self.delayed_keywords)
    }
}

fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .map(|k| k.to_lowercase())
        .any(|k| !k.is_empty() && haystack.contains(&k))
}
