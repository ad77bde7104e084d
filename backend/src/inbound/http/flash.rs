//! One-shot feedback messages carried across a redirect in the session.

use serde::{Deserialize, Serialize};

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    /// Confirmation of a completed action.
    Info,
    /// Something the user has to fix or retry.
    Error,
}

/// A message queued for the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    /// Severity.
    pub kind: FlashKind,
    /// Text shown to the user.
    pub message: String,
}

impl Flash {
    /// An informational message.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Info,
            message: message.into(),
        }
    }

    /// An error message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Flash messages split by kind, in the order they were queued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flashes {
    /// Informational messages.
    pub info: Vec<String>,
    /// Error messages.
    pub errors: Vec<String>,
}

impl FromIterator<Flash> for Flashes {
    fn from_iter<I: IntoIterator<Item = Flash>>(iter: I) -> Self {
        let mut flashes = Self::default();
        for flash in iter {
            match flash.kind {
                FlashKind::Info => flashes.info.push(flash.message),
                FlashKind::Error => flashes.errors.push(flash.message),
            }
        }
        flashes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn splits_by_kind_preserving_order() {
        let flashes: Flashes = [
            Flash::error("first"),
            Flash::info("saved"),
            Flash::error("second"),
        ]
        .into_iter()
        .collect();

        assert_eq!(flashes.info, vec!["saved".to_owned()]);
        assert_eq!(flashes.errors, vec!["first".to_owned(), "second".to_owned()]);
    }

    #[rstest]
    fn kind_serialises_lowercase() {
        let json = serde_json::to_string(&Flash::info("hi")).expect("serialise");
        assert_eq!(json, r#"{"kind":"info","message":"hi"}"#);
    }
}
