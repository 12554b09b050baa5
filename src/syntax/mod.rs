//! Ledger File Syntax
//!
//! Turns ledger source text into spanned directives.
//!
//! # Structure
//!
//! - [`token`]: Token definitions
//! - [`lexer`]: Characters to tokens, with error recovery
//! - [`ast`]: Directive tree produced by the parser
//! - [`parser`]: Tokens to directives, with error recovery
//!
//! # Example Ledger
//!
//! ```text
//! // opening the books
//! 2020-01-01 open assets:cash BRL
//! 2020-01-01 open expenses:books BRL
//!
//! 2020-01-02 transaction "Buy some books"
//!   < 100.00 BRL assets:cash
//!   > 100.00 BRL expenses:books
//!
//! 2020-01-03 balance assets:cash -100 BRL
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

/// Byte range into the source text.
pub type Span = std::ops::Range<usize>;

/// A value paired with the source range it came from.
pub type Spanned<T> = (T, Span);

pub use ast::{Directive, Movement, MovementKind};
pub use error::SyntaxError;
pub use lexer::lex;
pub use parser::{parse_file, parse_str, parse_tokens};
pub use token::{Keyword, Token};
