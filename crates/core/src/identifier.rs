//! # Video identifier
//!
//! A video is addressed by subject number, condition and task, typed by the
//! user as a single string such as `"4003 C1 T1"`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Overall shape: four digits, then two letter+number tokens.
/// The letter/digit range is narrowed per token after splitting.
static SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}\s+[A-Za-z][0-9]+\s+[A-Za-z][0-9]+$").expect("valid regex")
});

/// Parsed video identifier.
///
/// Tokens are kept exactly as typed; case folding is left to the storage
/// layout, which upper- or lower-cases depending on the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoIdentifier {
    subject: String,
    condition: String,
    task: String,
}

impl VideoIdentifier {
    /// Parses a raw identifier.
    ///
    /// Leading and trailing whitespace is ignored and tokens may be separated
    /// by any run of whitespace. The subject must be exactly four ASCII
    /// digits, the condition `C1`..`C9` and the task `T1`..`T9` (letters in
    /// either case).
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if !SHAPE_RE.is_match(trimmed) {
            return Err(CoreError::InvalidFormat);
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        let [subject, condition, task] = tokens.as_slice() else {
            return Err(CoreError::InvalidFormat);
        };

        if !is_single_digit_token(condition, 'c') || !is_single_digit_token(task, 't') {
            return Err(CoreError::InvalidFormat);
        }

        Ok(Self {
            subject: (*subject).to_string(),
            condition: (*condition).to_string(),
            task: (*task).to_string(),
        })
    }

    /// Four-digit subject number.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Condition token as typed (`C1`, `c3`, ...).
    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// Task token as typed (`T1`, `t2`, ...).
    pub fn task(&self) -> &str {
        &self.task
    }
}

/// `letter` in either case followed by exactly one digit in 1..=9.
fn is_single_digit_token(token: &str, letter: char) -> bool {
    let mut chars = token.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(l), Some(d), None) => l.eq_ignore_ascii_case(&letter) && ('1'..='9').contains(&d),
        _ => false,
    }
}

impl FromStr for VideoIdentifier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VideoIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.condition, self.task)
    }
}
