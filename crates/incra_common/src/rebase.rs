//! Line rewrite rules applied while serializing analyses.
//!
//! Rules run in order over every output line. A [`Rebase::Replace`] rule
//! substitutes every occurrence of a token; a [`Rebase::Drop`] rule removes
//! the whole line when it contains its token, and no later rule sees it.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single rewrite rule for serialized analysis lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rebase {
    /// Replace every occurrence of `from` with `to`.
    Replace {
        /// Token to search for.
        from: String,
        /// Replacement text (may be empty).
        to: String,
    },
    /// Drop any line containing `from`.
    Drop {
        /// Token whose presence drops the line.
        from: String,
    },
}

impl Rebase {
    /// Creates a substitution rule.
    pub fn replace(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::Replace {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Creates a line-dropping rule.
    pub fn drop_lines(from: impl Into<String>) -> Self {
        Self::Drop { from: from.into() }
    }
}

/// Errors from parsing a `FROM=TO` rule on the command line.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RebaseParseError {
    /// The rule did not contain `=`.
    #[error("rebase rule '{0}' must have the form FROM=TO")]
    MissingSeparator(String),
    /// The `FROM` side was empty.
    #[error("rebase rule '{0}' has an empty FROM token")]
    EmptyFrom(String),
}

impl FromStr for Rebase {
    type Err = RebaseParseError;

    /// Parses `FROM=TO` into a [`Rebase::Replace`] rule.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s
            .split_once('=')
            .ok_or_else(|| RebaseParseError::MissingSeparator(s.to_string()))?;
        if from.is_empty() {
            return Err(RebaseParseError::EmptyFrom(s.to_string()));
        }
        Ok(Self::replace(from, to))
    }
}

/// Applies `rules` in order to `line`.
///
/// Returns `None` if a drop rule matched.
pub fn rebase_line(line: &str, rules: &[Rebase]) -> Option<String> {
    let mut text = line.to_string();
    for rule in rules {
        match rule {
            Rebase::Drop { from } => {
                if text.contains(from.as_str()) {
                    return None;
                }
            }
            Rebase::Replace { from, to } => {
                if text.contains(from.as_str()) {
                    text = text.replace(from.as_str(), to);
                }
            }
        }
    }
    Some(text)
}
