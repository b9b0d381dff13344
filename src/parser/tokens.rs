//! Token-level parsers for the pattern grammar.
//!
//! Each special character of the pattern language gets its own small winnow
//! parser; `parse_pattern_token` tries them in priority order. Quoting is
//! resolved here, so later stages only ever see `Quoted`/`Literal` affix
//! material and the structural tokens.

use winnow::combinator::{alt, delimited, preceded, repeat};
use winnow::error::ErrMode;
use winnow::token::{literal, none_of};
use winnow::{ModalResult, Parser};

use crate::types::PatternToken;

pub fn parse_zero_digit(input: &mut &str) -> ModalResult<PatternToken> {
    literal("0")
        .value(PatternToken::ZeroDigit)
        .parse_next(input)
        .map_err(ErrMode::Backtrack)
}

pub fn parse_digit_placeholder(input: &mut &str) -> ModalResult<PatternToken> {
    literal("#")
        .value(PatternToken::Digit)
        .parse_next(input)
        .map_err(ErrMode::Backtrack)
}

pub fn parse_grouping_separator(input: &mut &str) -> ModalResult<PatternToken> {
    literal(",")
        .value(PatternToken::GroupingSeparator)
        .parse_next(input)
        .map_err(ErrMode::Backtrack)
}

pub fn parse_decimal_separator(input: &mut &str) -> ModalResult<PatternToken> {
    literal(".")
        .value(PatternToken::DecimalSeparator)
        .parse_next(input)
        .map_err(ErrMode::Backtrack)
}

pub fn parse_percent(input: &mut &str) -> ModalResult<PatternToken> {
    literal("%")
        .value(PatternToken::Percent)
        .parse_next(input)
        .map_err(ErrMode::Backtrack)
}

pub fn parse_per_mille(input: &mut &str) -> ModalResult<PatternToken> {
    literal("‰")
        .value(PatternToken::PerMille)
        .parse_next(input)
        .map_err(ErrMode::Backtrack)
}

pub fn parse_minus_sign(input: &mut &str) -> ModalResult<PatternToken> {
    literal("-")
        .value(PatternToken::MinusSign)
        .parse_next(input)
        .map_err(ErrMode::Backtrack)
}

pub fn parse_subpattern_boundary(input: &mut &str) -> ModalResult<PatternToken> {
    literal(";")
        .value(PatternToken::SubpatternBoundary)
        .parse_next(input)
        .map_err(ErrMode::Backtrack)
}

/// `¤¤` substitutes the international currency code, `¤` the symbol.
pub fn parse_currency(input: &mut &str) -> ModalResult<PatternToken> {
    alt((
        literal("¤¤").value(PatternToken::CurrencyCode),
        literal("¤").value(PatternToken::CurrencySymbol),
    ))
    .parse_next(input)
    .map_err(ErrMode::Backtrack)
}

/// `E` followed by at least one `0`. A bare `E` falls through to a literal.
pub fn parse_exponent_marker(input: &mut &str) -> ModalResult<PatternToken> {
    preceded('E', repeat(1.., '0').map(|zeros: Vec<char>| zeros.len()))
        .map(|n| PatternToken::Exponent {
            min_digits: n.min(u8::MAX as usize) as u8,
        })
        .parse_next(input)
        .map_err(ErrMode::Backtrack)
}

/// `''` outside a quoted run is a literal single quote.
pub fn parse_escaped_quote(input: &mut &str) -> ModalResult<PatternToken> {
    literal("''")
        .value(PatternToken::Quoted("'".to_string()))
        .parse_next(input)
        .map_err(ErrMode::Backtrack)
}

/// A quoted run; `''` inside collapses to a single quote.
pub fn parse_quoted_literal(input: &mut &str) -> ModalResult<PatternToken> {
    let content = repeat(0.., alt((literal("''").value('\''), none_of(['\'']))))
        .map(|chars: Vec<char>| chars.into_iter().collect::<String>());

    delimited('\'', content, '\'')
        .map(PatternToken::Quoted)
        .parse_next(input)
        .map_err(ErrMode::Backtrack)
}

/// Anything else, except a stray quote, is a literal character.
pub fn parse_literal_char(input: &mut &str) -> ModalResult<PatternToken> {
    none_of(['\''])
        .map(PatternToken::Literal)
        .parse_next(input)
        .map_err(ErrMode::Backtrack)
}

/// Parse a single token from the pattern string.
pub fn parse_pattern_token(input: &mut &str) -> ModalResult<PatternToken> {
    alt((
        parse_escaped_quote,
        parse_quoted_literal,
        parse_exponent_marker,
        parse_currency,
        parse_zero_digit,
        parse_digit_placeholder,
        parse_grouping_separator,
        parse_decimal_separator,
        parse_percent,
        parse_per_mille,
        parse_minus_sign,
        parse_subpattern_boundary,
        parse_literal_char,
    ))
    .parse_next(input)
}
