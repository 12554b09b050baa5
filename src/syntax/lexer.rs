//! Ledger Lexer
//!
//! Splits source text into spanned tokens with a [`chumsky`] grammar over
//! characters. The grammar accepts any input: a malformed word becomes an
//! error item instead of a token, and lexing carries on with the next word
//! so that every error in a file is collected.

use chrono::NaiveDate;
use chumsky::prelude::*;
use chumsky::Stream;
use log::debug;

use super::ast::MovementKind;
use super::error::SyntaxError;
use super::token::{Keyword, Token};
use super::{Span, Spanned};
use crate::ledger::{Account, Amount, Currency};

/// A token, or the error that took its place.
type Lexeme = Result<Spanned<Token>, SyntaxError>;

/// Lexes a whole source file.
///
/// Returns every token that could be recognized together with every error
/// found along the way. Spans are byte ranges into `source`.
pub fn lex(source: &str) -> (Vec<Spanned<Token>>, Vec<SyntaxError>) {
    let end = source.len();
    let chars = source
        .char_indices()
        .map(|(i, c)| (c, i..i + c.len_utf8()));

    let (lexemes, mut errors) = match lexer().parse(Stream::from_iter(end..end, chars)) {
        Ok(lexemes) => (lexemes, Vec::new()),
        Err(errors) => (Vec::new(), errors),
    };

    let mut tokens = Vec::with_capacity(lexemes.len());
    for lexeme in lexemes {
        match lexeme {
            Ok(token) => tokens.push(token),
            Err(e) => errors.push(e),
        }
    }

    debug!(
        "Lexed {} tokens ({} errors) from {} bytes",
        tokens.len(),
        errors.len(),
        source.len()
    );

    (tokens, errors)
}

fn lexer() -> impl Parser<char, Vec<Lexeme>, Error = SyntaxError> {
    let comment = just("//")
        .then(filter(|c: &char| *c != '\n').repeated())
        .ignored();
    let trivia = filter(|c: &char| c.is_whitespace())
        .ignored()
        .or(comment)
        .repeated();

    let movement = just('<')
        .to(Token::Movement(MovementKind::Debit))
        .or(just('>').to(Token::Movement(MovementKind::Credit)))
        .map_with_span(|token, span| Lexeme::Ok((token, span)));

    // A description ends at the closing quote or, unterminated, at the end
    // of the line.
    let description = just('"')
        .ignore_then(
            filter(|c: &char| *c != '"' && *c != '\n')
                .repeated()
                .collect::<String>(),
        )
        .then(just('"').or_not())
        .map_with_span(|(text, closing), span| match closing {
            Some(_) => Ok((Token::Description(text), span)),
            None => Err(SyntaxError::UnterminatedString { span }),
        });

    let word = filter(|c: &char| !c.is_whitespace() && !matches!(c, '"' | '<' | '>' | '/'))
        .repeated()
        .at_least(1)
        .collect::<String>()
        .map_with_span(|text, span| classify(&text, span));

    // A `/` that does not start a comment.
    let slash = just('/').map_with_span(|found, span| {
        Lexeme::Err(SyntaxError::UnexpectedChar { found, span })
    });

    let lexeme = choice((movement, description, word, slash));

    trivia
        .clone()
        .ignore_then(lexeme)
        .repeated()
        .then_ignore(trivia)
        .then_ignore(end())
}

/// Turns a word into a token based on its first character.
fn classify(text: &str, span: Span) -> Lexeme {
    let mut chars = text.chars();
    let first = chars.next().unwrap_or(' ');
    let second = chars.next();

    let signed_digit = first == '-' && second.is_some_and(|c| c.is_ascii_digit());

    let token = if first.is_ascii_digit() || signed_digit {
        number(text, &span)?
    } else if first.is_ascii_uppercase() {
        currency(text, &span)?
    } else if first.is_ascii_lowercase() {
        lowercase_word(text, &span)?
    } else {
        return Err(SyntaxError::UnexpectedChar {
            found: first,
            span: span.start..span.start + first.len_utf8(),
        });
    };

    Ok((token, span))
}

/// Dates contain a `-` after the optional leading sign, amounts do not.
fn number(text: &str, span: &Span) -> Result<Token, SyntaxError> {
    if text.trim_start_matches('-').contains('-') {
        return parse_date(text)
            .map(Token::Date)
            .map_err(|reason| SyntaxError::InvalidDate {
                text: text.to_string(),
                reason,
                span: span.clone(),
            });
    }

    text.parse::<Amount>()
        .map(Token::Amount)
        .map_err(|e| SyntaxError::InvalidAmount {
            text: text.to_string(),
            reason: e.to_string(),
            span: span.clone(),
        })
}

fn currency(text: &str, span: &Span) -> Result<Token, SyntaxError> {
    if (3..=5).contains(&text.len()) && text.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(Token::Currency(Currency::from(text)))
    } else {
        Err(SyntaxError::InvalidCurrency {
            text: text.to_string(),
            span: span.clone(),
        })
    }
}

/// Lowercase words are either accounts (`kind:name`) or keywords.
fn lowercase_word(text: &str, span: &Span) -> Result<Token, SyntaxError> {
    if text.contains(':') {
        return text
            .parse::<Account>()
            .map(Token::Account)
            .map_err(|e| SyntaxError::InvalidAccount {
                text: text.to_string(),
                reason: e.to_string(),
                span: span.clone(),
            });
    }

    Keyword::from_word(text)
        .map(Token::Keyword)
        .ok_or_else(|| SyntaxError::UnknownKeyword {
            text: text.to_string(),
            span: span.clone(),
        })
}

/// Parses `YYYY-MM-DD`, accepting one or two digit months and days.
fn parse_date(text: &str) -> Result<NaiveDate, String> {
    let parts: Vec<&str> = text.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return Err("expected year, month and day separated by `-`".to_string());
    };

    for (part, max_len) in [(year, 4), (month, 2), (day, 2)] {
        if part.is_empty() || part.len() > max_len || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("`{}` is not a valid date component", part));
        }
    }

    let year: i32 = year.parse().map_err(|_| format!("year {} is not valid", year))?;
    let month: u32 = month.parse().map_err(|_| format!("month {} is not valid", month))?;
    let day: u32 = day.parse().map_err(|_| format!("day {} is not valid", day))?;

    if !(1900..=2999).contains(&year) {
        return Err(format!("year {} is not valid", year));
    }
    if !(1..=12).contains(&month) {
        return Err(format!("month {} is not valid", month));
    }
    if !(1..=31).contains(&day) {
        return Err(format!("day {} is not valid", day));
    }

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| format!("{} is not a calendar date", text))
}
