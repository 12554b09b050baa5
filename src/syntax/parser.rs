//! Ledger Parser
//!
//! [`chumsky`] combinators over the token stream produced by the lexer.
//!
//! # Grammar
//!
//! ```text
//! file        := directive*
//! directive   := open | balance | transaction
//! open        := DATE "open" ACCOUNT [AMOUNT] CURRENCY
//! balance     := DATE "balance" ACCOUNT AMOUNT CURRENCY
//! transaction := DATE "transaction" DESCRIPTION movement+
//! movement    := ("<" | ">") AMOUNT CURRENCY ACCOUNT
//! ```
//!
//! Every directive starts with a date, so the token stream is cut at each
//! date and every directive is parsed on its own. An error in one directive
//! never hides the ones after it.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use chumsky::prelude::*;
use chumsky::{select, Stream};
use log::{debug, info};

use super::ast::{Directive, Movement, MovementKind};
use super::error::SyntaxError;
use super::lexer::lex;
use super::token::{Keyword, Token};
use super::Spanned;
use crate::error::{Error, Result};
use crate::ledger::{Account, Amount, Currency, Money};

/// Parses a token stream, collecting every directive that parses cleanly
/// and an error for every one that does not.
pub fn parse_tokens(tokens: &[Spanned<Token>]) -> (Vec<Spanned<Directive>>, Vec<SyntaxError>) {
    let parser = directive();
    let eoi = tokens.last().map_or(0..0, |(_, span)| span.end..span.end);

    let mut directives = Vec::new();
    let mut errors = Vec::new();

    for (start, end) in directive_bounds(tokens) {
        // The next date stays in the stream so errors can name it.
        let lookahead = (end + 1).min(tokens.len());
        let stream = Stream::from_iter(eoi.clone(), tokens[start..lookahead].iter().cloned());

        match parser.parse(stream) {
            Ok(directive) => directives.push(directive),
            Err(found) => {
                for e in &found {
                    debug!("Parse error: {}", e);
                }
                errors.extend(found);
            }
        }
    }

    (directives, errors)
}

/// Token index ranges `start..end` that each begin at a date. Tokens before
/// the first date form a range of their own.
fn directive_bounds(tokens: &[Spanned<Token>]) -> Vec<(usize, usize)> {
    let mut starts: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, (token, _))| token.is_date())
        .map(|(i, _)| i)
        .collect();

    if !tokens.is_empty() && starts.first() != Some(&0) {
        starts.insert(0, 0);
    }

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| (start, starts.get(i + 1).copied().unwrap_or(tokens.len())))
        .collect()
}

/// Lexes and parses a source string.
///
/// Lexer errors are returned on their own: parsing a token stream with
/// holes in it would only add noise.
///
/// # Example
///
/// ```
/// use hortela::syntax::parse_str;
///
/// let directives = parse_str("2020-01-01 open assets:cash BRL").unwrap();
/// assert_eq!(directives.len(), 1);
/// ```
pub fn parse_str(source: &str) -> std::result::Result<Vec<Spanned<Directive>>, Vec<SyntaxError>> {
    let (tokens, lex_errors) = lex(source);
    if !lex_errors.is_empty() {
        return Err(lex_errors);
    }

    let (directives, parse_errors) = parse_tokens(&tokens);
    if !parse_errors.is_empty() {
        return Err(parse_errors);
    }

    Ok(directives)
}

/// Reads and parses a ledger file, returning its text alongside the
/// directives so callers can render diagnostics later.
pub fn parse_file(path: impl AsRef<Path>) -> Result<(String, Vec<Spanned<Directive>>)> {
    let path = path.as_ref();
    info!("Loading ledger from: {}", path.display());

    let source = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Ledger content loaded ({} bytes)", source.len());

    match parse_str(&source) {
        Ok(directives) => {
            info!("Parsed {} directives", directives.len());
            Ok((source, directives))
        }
        Err(errors) => Err(Error::Syntax {
            path: path.to_path_buf(),
            text: source,
            errors,
        }),
    }
}

fn date() -> impl Parser<Token, NaiveDate, Error = SyntaxError> + Clone {
    select! { Token::Date(date) => date }.labelled("a date")
}

fn keyword(expected: Keyword) -> impl Parser<Token, Keyword, Error = SyntaxError> + Clone {
    let label = match expected {
        Keyword::Open => "`open`",
        Keyword::Balance => "`balance`",
        Keyword::Transaction => "`transaction`",
    };

    filter_map(move |span, token: Token| match token {
        Token::Keyword(keyword) if keyword == expected => Ok(keyword),
        other => Err(<SyntaxError as chumsky::Error<Token>>::expected_input_found(
            span,
            None,
            Some(other),
        )),
    })
    .labelled(label)
}

fn account() -> impl Parser<Token, Account, Error = SyntaxError> + Clone {
    select! { Token::Account(account) => account }.labelled("an account")
}

fn amount() -> impl Parser<Token, Spanned<Amount>, Error = SyntaxError> + Clone {
    select! { Token::Amount(amount) => amount }
        .labelled("an amount")
        .map_with_span(|amount, span| (amount, span))
}

fn currency() -> impl Parser<Token, Currency, Error = SyntaxError> + Clone {
    select! { Token::Currency(currency) => currency }.labelled("a currency")
}

fn description() -> impl Parser<Token, String, Error = SyntaxError> + Clone {
    select! { Token::Description(text) => text }.labelled("a quoted description")
}

fn movement_kind() -> impl Parser<Token, MovementKind, Error = SyntaxError> + Clone {
    select! { Token::Movement(kind) => kind }.labelled("a movement (`<` or `>`)")
}

fn non_negative(
    (amount, span): Spanned<Amount>,
    what: &'static str,
) -> std::result::Result<Amount, SyntaxError> {
    if amount.is_negative() {
        return Err(SyntaxError::NegativeAmount { what, span });
    }
    Ok(amount)
}

fn movement() -> impl Parser<Token, Spanned<Movement>, Error = SyntaxError> + Clone {
    movement_kind()
        .then(amount())
        .then(currency())
        .then(account())
        .try_map(|(((kind, amount), currency), account), _| {
            Ok(Movement {
                kind,
                money: Money::new(non_negative(amount, "a movement amount")?, currency),
                account,
            })
        })
        .map_with_span(|movement, span| (movement, span))
}

/// One directive, followed by the next date or the end of input.
fn directive() -> impl Parser<Token, Spanned<Directive>, Error = SyntaxError> {
    let open = date()
        .then_ignore(keyword(Keyword::Open))
        .then(
            account()
                .then(amount().or_not())
                .then(currency())
                .try_map(|((account, opening), currency), _| {
                    let opening = opening
                        .map(|amount| non_negative(amount, "an opening balance"))
                        .transpose()?;
                    Ok((account, opening, currency))
                }),
        )
        .map(|(date, (account, opening, currency))| Directive::Open {
            date,
            account,
            opening,
            currency,
        });

    let balance = date()
        .then_ignore(keyword(Keyword::Balance))
        .then(account())
        .then(amount())
        .then(currency())
        .map(|(((date, account), (amount, _)), currency)| Directive::Balance {
            date,
            account,
            expected: Money::new(amount, currency),
        });

    let transaction = date()
        .then_ignore(keyword(Keyword::Transaction))
        .then(description())
        .then(movement().repeated().at_least(1))
        .map(|((date, description), movements)| Directive::Transaction {
            date,
            description,
            movements,
        });

    choice((open, balance, transaction))
        .map_with_span(|directive, span| (directive, span))
        .then_ignore(date().rewind().ignored().or(end()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::AccountKind;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn money(amount: &str, currency: &str) -> Money {
        Money::new(amount.parse().unwrap(), currency)
    }

    #[test]
    fn test_parse_empty_file() {
        assert_eq!(parse_str("").unwrap(), vec![]);
        assert_eq!(parse_str("// nothing here\n").unwrap(), vec![]);
    }

    #[test]
    fn test_parse_single_open() {
        assert_eq!(
            parse_str("\n 2020-01-01 open assets:cash_account BRL").unwrap(),
            vec![(
                Directive::Open {
                    date: ymd(2020, 1, 1),
                    account: Account::new(AccountKind::Assets, ["cash_account"]),
                    opening: None,
                    currency: "BRL".into(),
                },
                2..41
            )]
        );
    }

    #[test]
    fn test_parse_open_with_opening_balance() {
        let directives = parse_str("2020-01-01 open assets:cash 150.5 BRL").unwrap();

        match &directives[0].0 {
            Directive::Open { opening, .. } => assert_eq!(*opening, Some("150.5".parse().unwrap())),
            other => panic!("unexpected directive {:?}", other),
        }
    }

    #[test]
    fn test_parse_multiple_opens() {
        let directives = parse_str(
            "\n 2020-01-01 open assets:cash_account BRL\n 2020-01-02 open liabilities:credit_card BRL",
        )
        .unwrap();

        assert_eq!(directives.len(), 2);
        assert_eq!(directives[1].0.date(), ymd(2020, 1, 2));
    }

    #[test]
    fn test_parse_file_with_all_directives() {
        let source = r#"
2020-01-01 open assets:cash_account BRL
2020-01-01 balance assets:cash_account 100 BRL
2020-01-01 open expenses:stuff BRL

2020-01-02 transaction "Buy some books"
  < 100 BRL assets:cash_account
  > 100 BRL expenses:stuff
"#;
        let directives = parse_str(source).unwrap();
        assert_eq!(directives.len(), 4);

        assert_eq!(
            directives[1].0,
            Directive::Balance {
                date: ymd(2020, 1, 1),
                account: Account::new(AccountKind::Assets, ["cash_account"]),
                expected: money("100", "BRL"),
            }
        );

        match &directives[3].0 {
            Directive::Transaction {
                description,
                movements,
                ..
            } => {
                assert_eq!(description, "Buy some books");
                assert_eq!(movements.len(), 2);
                assert_eq!(
                    movements[0].0,
                    Movement::debit(
                        Account::new(AccountKind::Assets, ["cash_account"]),
                        money("100", "BRL")
                    )
                );
                assert_eq!(
                    movements[1].0,
                    Movement::credit(
                        Account::new(AccountKind::Expenses, ["stuff"]),
                        money("100", "BRL")
                    )
                );
                let movement_text = &source[movements[0].1.clone()];
                assert_eq!(movement_text, "< 100 BRL assets:cash_account");
            }
            other => panic!("unexpected directive {:?}", other),
        }

        let transaction_text = &source[directives[3].1.clone()];
        assert!(transaction_text.starts_with("2020-01-02 transaction"));
        assert!(transaction_text.ends_with("expenses:stuff"));
    }

    #[test]
    fn test_parse_negative_balance_assertion() {
        let directives = parse_str("2020-01-05 balance liabilities:card -20.10 USD").unwrap();
        match &directives[0].0 {
            Directive::Balance { expected, .. } => assert_eq!(*expected, money("-20.10", "USD")),
            other => panic!("unexpected directive {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_negative_movement() {
        let errors = parse_str(
            "2020-01-02 transaction \"x\" < -5 BRL assets:cash > 5 BRL expenses:food",
        )
        .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], SyntaxError::NegativeAmount { .. }));
    }

    #[test]
    fn test_parse_rejects_negative_opening_balance() {
        let errors = parse_str("2020-01-01 open assets:cash -5 BRL").unwrap_err();

        assert_eq!(
            errors,
            vec![SyntaxError::NegativeAmount {
                what: "an opening balance",
                span: 28..30,
            }]
        );
    }

    #[test]
    fn test_parse_unknown_directive_lists_keywords() {
        let errors = parse_str("2020-01-01 assets:cash BRL").unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "expected `open`, `balance` or `transaction`, found account assets:cash"
        );
        assert_eq!(errors[0].span(), 11..22);
    }

    #[test]
    fn test_parse_trailing_error_keeps_earlier_directives() {
        let (tokens, _) = lex("2020-01-01 open assets:cash BRL\n2020-01-02 balance assets:cash BRL");
        let (directives, errors) = parse_tokens(&tokens);

        assert_eq!(directives.len(), 1);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_parse_extra_tokens_after_directive() {
        let errors = parse_str("2020-01-01 open assets:cash BRL BRL").unwrap_err();

        match &errors[0] {
            SyntaxError::Unexpected { found, span, .. } => {
                assert_eq!(found, "currency BRL");
                assert_eq!(*span, 32..35);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_parse_transaction_needs_movements() {
        let errors = parse_str(
            "2020-01-02 transaction \"nothing\"\n2020-01-03 open assets:cash BRL",
        )
        .unwrap_err();

        assert_eq!(errors.len(), 1);
        match &errors[0] {
            SyntaxError::Unexpected { expected, found, .. } => {
                assert!(expected.iter().any(|e| e.contains("movement")));
                assert_eq!(found, "date 2020-01-03");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_parse_reports_end_of_input() {
        let errors = parse_str("2020-01-01 open assets:cash").unwrap_err();

        match &errors[0] {
            SyntaxError::Unexpected { found, span, .. } => {
                assert_eq!(found, "end of input");
                assert_eq!(*span, 27..27);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_parse_recovers_between_directives() {
        let source = "\
2020-01-01 open BRL assets:cash
2020-01-01 open assets:cash BRL
2020-01-02 balance assets:cash BRL
2020-01-03 open expenses:food BRL";

        let (tokens, lex_errors) = lex(source);
        assert!(lex_errors.is_empty());

        let (directives, errors) = parse_tokens(&tokens);
        assert_eq!(directives.len(), 2);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_parse_stray_tokens_before_first_directive() {
        let (tokens, _) = lex("BRL 100 2020-01-01 open assets:cash BRL");
        let (directives, errors) = parse_tokens(&tokens);

        assert_eq!(directives.len(), 1);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_directive_bounds() {
        let (tokens, _) = lex("BRL 2020-01-01 open assets:cash BRL 2020-01-02 open assets:bank BRL");

        assert_eq!(directive_bounds(&tokens), vec![(0, 1), (1, 5), (5, 9)]);
        assert!(directive_bounds(&[]).is_empty());
    }

    #[test]
    fn test_lex_errors_short_circuit() {
        let errors = parse_str("2020-13-01 open assets:cash BRL").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], SyntaxError::InvalidDate { .. }));
    }

    #[test]
    fn test_parse_file_not_found() {
        let result = parse_file("/nonexistent/path/ledger.hta");
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_parse_file_keeps_source() {
        use tempfile::tempdir;

        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("books.hta");
        std::fs::write(&path, "2020-01-01 open assets:cash BRL\n").unwrap();

        let (source, directives) = parse_file(&path).unwrap();
        assert!(source.starts_with("2020-01-01"));
        assert_eq!(directives.len(), 1);
    }

    #[test]
    fn test_parse_file_syntax_error_carries_text() {
        use tempfile::tempdir;

        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("broken.hta");
        std::fs::write(&path, "2020-01-01 opne assets:cash BRL\n").unwrap();

        match parse_file(&path) {
            Err(Error::Syntax { text, errors, .. }) => {
                assert!(text.contains("opne"));
                assert_eq!(errors.len(), 1);
            }
            other => panic!("expected syntax error, got {:?}", other.map(|(s, _)| s)),
        }
    }
}
