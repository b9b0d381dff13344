//! Pattern compiler.
//!
//! A pattern string goes through two stages: tokenization (winnow parsers in
//! [`tokens`]) and subpattern assembly ([`sections`]), producing an immutable
//! [`CompiledPattern`]. [`synthesis`] runs the pipeline in reverse.

pub mod sections;
pub mod synthesis;
pub mod tokens;

use winnow::Parser;

use crate::locale::DecimalSymbols;
use crate::types::{CompiledPattern, MalformedPatternError, PatternErrorKind, PatternToken};

pub use sections::expand_affix;
pub use synthesis::to_pattern;

/// Tokenize a full pattern string.
pub fn tokenize_pattern(pattern: &str) -> Result<Vec<PatternToken>, MalformedPatternError> {
    let mut tokens = Vec::new();
    let mut input = pattern;
    while !input.is_empty() {
        match tokens::parse_pattern_token.parse_next(&mut input) {
            Ok(token) => tokens.push(token),
            // The only character no token parser accepts is a stray quote.
            Err(_) => {
                return Err(MalformedPatternError::new(
                    pattern,
                    PatternErrorKind::UnbalancedQuote,
                ));
            }
        }
    }
    Ok(tokens)
}

/// Compile a pattern string against a symbol table.
pub fn compile_pattern(
    pattern: &str,
    symbols: &DecimalSymbols,
) -> Result<CompiledPattern, MalformedPatternError> {
    let tokens = tokenize_pattern(pattern)?;
    sections::compile_tokens(pattern, &tokens, symbols)
}
