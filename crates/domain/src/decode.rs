//! Tagged result of interpreting a payload for a given topic.

use crate::error::DecodeError;

/// Outcome of decoding a payload into a command.
///
/// Not recognising a payload is an expected branch, not a failure: the
/// message has already been persisted and is simply not acted upon.
#[derive(Debug)]
pub enum Decoded<T> {
    Recognized(T),
    Unrecognized(DecodeError),
}

impl<T> Decoded<T> {
    /// The recognised command, if any.
    #[must_use]
    pub fn recognized(self) -> Option<T> {
        match self {
            Self::Recognized(value) => Some(value),
            Self::Unrecognized(_) => None,
        }
    }

    #[must_use]
    pub fn is_recognized(&self) -> bool {
        matches!(self, Self::Recognized(_))
    }
}

impl<T> From<Result<T, DecodeError>> for Decoded<T> {
    fn from(result: Result<T, DecodeError>) -> Self {
        match result {
            Ok(value) => Self::Recognized(value),
            Err(err) => Self::Unrecognized(err),
        }
    }
}

/// Interpret a plain `on` / `off` token, ignoring case and surrounding
/// whitespace.
pub(crate) fn switch_token(payload: &str) -> Option<bool> {
    let token = payload.trim();
    if token.eq_ignore_ascii_case("on") {
        Some(true)
    } else if token.eq_ignore_ascii_case("off") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_mixed_case_tokens_with_whitespace() {
        assert_eq!(switch_token("  On\n"), Some(true));
        assert_eq!(switch_token("OFF"), Some(false));
    }

    #[test]
    fn should_reject_other_tokens() {
        assert_eq!(switch_token("onn"), None);
        assert_eq!(switch_token(""), None);
    }

    #[test]
    fn should_convert_result_into_decoded() {
        let ok: Decoded<u8> = Ok(3).into();
        assert_eq!(ok.recognized(), Some(3));

        let err: Decoded<u8> = Err(DecodeError::MissingField { field: "command" }).into();
        assert!(!err.is_recognized());
    }
}
