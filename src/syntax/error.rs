//! Syntax Errors
//!
//! Every error carries the span it refers to so it can be rendered
//! against the original source. [`SyntaxError`] is also the error type of
//! the `chumsky` lexer and parser.

use std::fmt;

use thiserror::Error;

use super::Span;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("unexpected character `{found}`")]
    UnexpectedChar { found: char, span: Span },

    #[error("invalid date `{text}`: {reason}")]
    InvalidDate {
        text: String,
        reason: String,
        span: Span,
    },

    #[error("invalid amount `{text}`: {reason}")]
    InvalidAmount {
        text: String,
        reason: String,
        span: Span,
    },

    #[error("invalid account `{text}`: {reason}")]
    InvalidAccount {
        text: String,
        reason: String,
        span: Span,
    },

    #[error("invalid currency `{text}`: use 3 to 5 uppercase letters")]
    InvalidCurrency { text: String, span: Span },

    #[error("unknown keyword `{text}`")]
    UnknownKeyword { text: String, span: Span },

    #[error("unterminated description")]
    UnterminatedString { span: Span },

    #[error("expected {}, found {found}", alternatives(.expected))]
    Unexpected {
        expected: Vec<String>,
        found: String,
        span: Span,
    },

    #[error("{what} cannot be negative")]
    NegativeAmount { what: &'static str, span: Span },
}

impl SyntaxError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedChar { span, .. }
            | Self::InvalidDate { span, .. }
            | Self::InvalidAmount { span, .. }
            | Self::InvalidAccount { span, .. }
            | Self::InvalidCurrency { span, .. }
            | Self::UnknownKeyword { span, .. }
            | Self::UnterminatedString { span }
            | Self::Unexpected { span, .. }
            | Self::NegativeAmount { span, .. } => span.clone(),
        }
    }

    /// Short hint shown under the highlighted source.
    pub fn label(&self) -> &'static str {
        match self {
            Self::UnexpectedChar { .. } => "this character is not part of any token",
            Self::InvalidDate { .. } => "dates are written as YYYY-MM-DD",
            Self::InvalidAmount { .. } => "amounts look like 10, 10.5 or -3.25",
            Self::InvalidAccount { .. } => "accounts look like assets:bank:checking",
            Self::InvalidCurrency { .. } => "currencies look like BRL or USD",
            Self::UnknownKeyword { .. } => "expected open, balance or transaction",
            Self::UnterminatedString { .. } => "add a closing `\"` on this line",
            Self::Unexpected { .. } => "unexpected token here",
            Self::NegativeAmount { .. } => "use the movement direction instead of a sign",
        }
    }
}

/// Joins alternatives as `a, b or c`.
fn alternatives(expected: &[String]) -> String {
    match expected {
        [] => "something else".to_string(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

const END_OF_INPUT: &str = "end of input";

impl<I: fmt::Display> chumsky::Error<I> for SyntaxError {
    type Span = Span;
    type Label = &'static str;

    fn expected_input_found<Iter: IntoIterator<Item = Option<I>>>(
        span: Span,
        expected: Iter,
        found: Option<I>,
    ) -> Self {
        let describe = |input: Option<I>| {
            input.map_or_else(|| END_OF_INPUT.to_string(), |i| i.to_string())
        };

        Self::Unexpected {
            expected: expected.into_iter().map(describe).collect(),
            found: describe(found),
            span,
        }
    }

    /// Labels name what was expected, replacing the raw alternatives.
    fn with_label(self, label: &'static str) -> Self {
        match self {
            Self::Unexpected { found, span, .. } => Self::Unexpected {
                expected: vec![label.to_string()],
                found,
                span,
            },
            other => other,
        }
    }

    fn merge(self, other: Self) -> Self {
        match (self, other) {
            (
                Self::Unexpected {
                    mut expected,
                    found,
                    span,
                },
                Self::Unexpected { expected: more, .. },
            ) => {
                for alternative in more {
                    if !expected.contains(&alternative) {
                        expected.push(alternative);
                    }
                }
                Self::Unexpected {
                    expected,
                    found,
                    span,
                }
            }
            (Self::Unexpected { .. }, specific) => specific,
            (this, _) => this,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merge(a: SyntaxError, b: SyntaxError) -> SyntaxError {
        <SyntaxError as chumsky::Error<char>>::merge(a, b)
    }

    fn unexpected(expected: &[&str]) -> SyntaxError {
        SyntaxError::Unexpected {
            expected: expected.iter().map(|e| e.to_string()).collect(),
            found: "currency BRL".into(),
            span: 4..7,
        }
    }

    #[test]
    fn test_unexpected_message() {
        assert_eq!(
            unexpected(&["a date"]).to_string(),
            "expected a date, found currency BRL"
        );
        assert_eq!(
            unexpected(&["`open`", "`balance`", "`transaction`"]).to_string(),
            "expected `open`, `balance` or `transaction`, found currency BRL"
        );
    }

    #[test]
    fn test_merge_collects_alternatives() {
        let merged = merge(unexpected(&["an amount"]), unexpected(&["a currency", "an amount"]));
        assert_eq!(merged, unexpected(&["an amount", "a currency"]));
    }

    #[test]
    fn test_merge_prefers_specific_errors() {
        let negative = SyntaxError::NegativeAmount {
            what: "a movement amount",
            span: 4..6,
        };

        assert_eq!(merge(unexpected(&["a date"]), negative.clone()), negative);
        assert_eq!(merge(negative.clone(), unexpected(&["a date"])), negative);
    }

    #[test]
    fn test_end_of_input_and_labels() {
        let error = <SyntaxError as chumsky::Error<char>>::expected_input_found(
            9..9,
            vec![Some('x')],
            None,
        );
        assert_eq!(error.to_string(), "expected x, found end of input");

        let error = <SyntaxError as chumsky::Error<char>>::with_label(error, "a currency");

        assert_eq!(error.to_string(), "expected a currency, found end of input");
        assert_eq!(error.span(), 9..9);
    }
}
