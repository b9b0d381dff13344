//! Type definitions for the decimal pattern engine.
//!
//! This module defines the compiled pattern model, the numeric input union,
//! rounding modes, field spans and the error types shared by the pattern
//! compiler, the formatter and the parser.

use std::fmt;
use std::ops::Range;

use num_bigint::BigInt;

use crate::bigdec::BigDecimal;

/// Sentinel for "no explicit bound" on integer digits. Plain (non-exponential)
/// patterns leave the maximum integer digit count unbounded.
pub const UNBOUNDED_INTEGER_DIGITS: u32 = u32::MAX;

/// Ceiling on fraction digits when formatting an f64.
pub const DOUBLE_FRACTION_DIGITS: u32 = 340;

/// Rounding rule applied whenever digits must be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingMode {
    /// Round away from zero whenever any discarded digit is non-zero.
    Up,
    /// Round toward zero (truncate).
    Down,
    /// Round toward positive infinity.
    Ceiling,
    /// Round toward negative infinity.
    Floor,
    /// Round to nearest; ties away from zero.
    HalfUp,
    /// Round to nearest; ties toward zero.
    HalfDown,
    /// Round to nearest; ties to the even digit.
    HalfEven,
    /// No rounding permitted; inexact operations fail.
    Unnecessary,
}

/// A numeric value entering or leaving the engine.
///
/// Dispatch happens once at the entry point; all representations funnel into
/// the same digit-list construction.
#[derive(Debug, Clone)]
pub enum Number {
    /// Fixed-width signed integer.
    Int(i64),
    /// Double-precision floating point. NaN and the infinities are carried
    /// here; the arbitrary-precision variants have no such sentinels.
    Float(f64),
    /// Arbitrary-precision integer.
    BigInt(BigInt),
    /// Arbitrary-precision decimal.
    BigDecimal(BigDecimal),
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::Int(v)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Float(v)
    }
}

impl From<BigInt> for Number {
    fn from(v: BigInt) -> Self {
        Number::BigInt(v)
    }
}

impl From<BigDecimal> for Number {
    fn from(v: BigDecimal) -> Self {
        Number::BigDecimal(v)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => {
                a == b && a.is_sign_negative() == b.is_sign_negative()
            }
            (Number::BigInt(a), Number::BigInt(b)) => a == b,
            (Number::BigDecimal(a), Number::BigDecimal(b)) => a == b,
            _ => false,
        }
    }
}

/// One component of an affix as written in the pattern, before symbol
/// expansion. Keeping the unexpanded form around lets `to_pattern` re-emit
/// the affix and lets a symbol change re-expand it without recompiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AffixPart {
    /// Literal text (quoted runs are already unescaped).
    Literal(String),
    /// `-` outside quotes: expands to the localized minus sign.
    MinusSign,
    /// `%`: expands to the percent glyph and sets multiplier 100.
    Percent,
    /// `‰`: expands to the per-mille glyph and sets multiplier 1000.
    PerMille,
    /// `¤`: expands to the locale currency symbol.
    CurrencySymbol,
    /// `¤¤`: expands to the international currency code.
    CurrencyCode,
}

/// A single token of the pattern grammar produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternToken {
    /// `0` — digit that always shows, counts toward the minimum.
    ZeroDigit,
    /// `#` — digit placeholder, counts toward the maximum only.
    Digit,
    /// `,`
    GroupingSeparator,
    /// `.`
    DecimalSeparator,
    /// `E` followed by one or more `0`s.
    Exponent {
        /// Number of `0`s after the marker.
        min_digits: u8,
    },
    /// `%`
    Percent,
    /// `‰` (U+2030)
    PerMille,
    /// `¤`
    CurrencySymbol,
    /// `¤¤`
    CurrencyCode,
    /// `-` outside quotes.
    MinusSign,
    /// A quoted run, `''` already collapsed to a single quote.
    Quoted(String),
    /// Any other character, taken literally.
    Literal(char),
    /// `;` between the positive and negative subpatterns.
    SubpatternBoundary,
}

/// Immutable result of compiling a pattern against a symbol table.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPattern {
    /// Symbol-expanded affixes, ready to emit.
    pub positive_prefix: String,
    pub positive_suffix: String,
    pub negative_prefix: String,
    pub negative_suffix: String,

    /// Unexpanded affix structure, kept for `to_pattern` and re-expansion.
    pub positive_prefix_parts: Vec<AffixPart>,
    pub positive_suffix_parts: Vec<AffixPart>,
    pub negative_prefix_parts: Vec<AffixPart>,
    pub negative_suffix_parts: Vec<AffixPart>,

    pub min_integer_digits: u32,
    pub max_integer_digits: u32,
    pub min_fraction_digits: u32,
    pub max_fraction_digits: u32,

    /// Digits between grouping separators; 0 disables grouping.
    pub grouping_size: u8,
    /// Scale factor applied before digit extraction (1, 100 or 1000 from the
    /// pattern; arbitrary via the setter).
    pub multiplier: i32,

    pub use_exponential_notation: bool,
    pub min_exponent_digits: u8,

    /// Emit the decimal separator even when no fraction digits follow.
    pub decimal_separator_always_shown: bool,
    /// Whether an explicit negative subpattern was present.
    pub has_negative_subpattern: bool,
}

impl CompiledPattern {
    /// Grouping is in effect only for a non-zero grouping size.
    pub fn grouping_used(&self) -> bool {
        self.grouping_size > 0
    }
}

impl Default for CompiledPattern {
    fn default() -> Self {
        CompiledPattern {
            positive_prefix: String::new(),
            positive_suffix: String::new(),
            negative_prefix: String::new(),
            negative_suffix: String::new(),
            positive_prefix_parts: Vec::new(),
            positive_suffix_parts: Vec::new(),
            negative_prefix_parts: Vec::new(),
            negative_suffix_parts: Vec::new(),
            min_integer_digits: 0,
            max_integer_digits: UNBOUNDED_INTEGER_DIGITS,
            min_fraction_digits: 0,
            max_fraction_digits: 0,
            grouping_size: 0,
            multiplier: 1,
            use_exponential_notation: false,
            min_exponent_digits: 0,
            decimal_separator_always_shown: false,
            has_negative_subpattern: false,
        }
    }
}

/// Character classes a formatted string is made of, for rich-text callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Prefix,
    Suffix,
    Integer,
    GroupingSeparator,
    DecimalSeparator,
    Fraction,
    ExponentSymbol,
    ExponentSign,
    Exponent,
}

/// A field together with the character range it covers in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpan {
    pub field: Field,
    pub range: Range<usize>,
}

/// Why a pattern failed to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternErrorKind {
    /// A quote opened and never closed.
    UnbalancedQuote,
    /// More than one decimal separator in a numeric body.
    MultipleDecimalSeparators,
    /// More than one exponent marker in a numeric body.
    MultipleExponents,
    /// More than one percent or per-mille symbol.
    MultipleMultiplierSymbols,
    /// A grouping separator with no digit after it.
    GroupingWithoutDigit,
    /// A grouping separator after the decimal separator.
    GroupingAfterDecimal,
    /// Exponential pattern without integer digits or exponent digits.
    MalformedExponent,
    /// A special character in a position where only literals may appear.
    UnquotedSpecialCharacter(char),
    /// More than one `;`.
    TooManySubpatterns,
    /// `#` between `0` and the decimal separator, or `0` after `#` in the
    /// fraction body.
    MisorderedDigits,
    /// A compact pattern whose placeholder digit count exceeds what its
    /// magnitude index allows.
    PlaceholderExceedsMagnitude,
    /// A compact ladder rung whose power-of-ten divisor does not fit u64.
    DivisorOutOfRange,
    /// A plural-rule set that does not follow the rule mini-language.
    MalformedPluralRules,
}

impl fmt::Display for PatternErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternErrorKind::UnbalancedQuote => write!(f, "unbalanced quote"),
            PatternErrorKind::MultipleDecimalSeparators => {
                write!(f, "multiple decimal separators")
            }
            PatternErrorKind::MultipleExponents => write!(f, "multiple exponent markers"),
            PatternErrorKind::MultipleMultiplierSymbols => {
                write!(f, "multiple percent/per-mille symbols")
            }
            PatternErrorKind::GroupingWithoutDigit => {
                write!(f, "grouping separator with no following digit")
            }
            PatternErrorKind::GroupingAfterDecimal => {
                write!(f, "grouping separator after decimal separator")
            }
            PatternErrorKind::MalformedExponent => write!(f, "malformed exponential pattern"),
            PatternErrorKind::UnquotedSpecialCharacter(c) => {
                write!(f, "unquoted special character '{c}'")
            }
            PatternErrorKind::TooManySubpatterns => write!(f, "too many pattern separators"),
            PatternErrorKind::MisorderedDigits => write!(f, "misordered digit placeholders"),
            PatternErrorKind::PlaceholderExceedsMagnitude => {
                write!(f, "placeholder digit count exceeds magnitude index")
            }
            PatternErrorKind::DivisorOutOfRange => {
                write!(f, "compact divisor exceeds the supported magnitude")
            }
            PatternErrorKind::MalformedPluralRules => write!(f, "malformed plural rule set"),
        }
    }
}

/// Compile-time pattern rejection. Compilation either fully succeeds or the
/// previously compiled state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedPatternError {
    /// The offending pattern, verbatim.
    pub pattern: String,
    pub kind: PatternErrorKind,
}

impl MalformedPatternError {
    pub fn new(pattern: impl Into<String>, kind: PatternErrorKind) -> Self {
        MalformedPatternError {
            pattern: pattern.into(),
            kind,
        }
    }
}

impl fmt::Display for MalformedPatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed pattern \"{}\": {}", self.pattern, self.kind)
    }
}

impl std::error::Error for MalformedPatternError {}

/// Raised during digit extraction when `RoundingMode::Unnecessary` is in
/// effect and the value cannot be represented within the digit bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArithmeticError {
    RoundingNecessary,
}

impl fmt::Display for ArithmeticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithmeticError::RoundingNecessary => {
                write!(f, "rounding necessary with RoundingMode::Unnecessary")
            }
        }
    }
}

impl std::error::Error for ArithmeticError {}

/// Parse failure as a first-class result: the offset is where matching gave
/// up, so batch callers can resume from a fallback position of their choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Byte offset into the source text where parsing failed.
    pub offset: usize,
}

impl ParseError {
    pub fn at(offset: usize) -> Self {
        ParseError { offset }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unparseable number at offset {}", self.offset)
    }
}

impl std::error::Error for ParseError {}

/// Out-of-domain argument to a setter or constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidArgumentError {
    pub message: String,
}

impl InvalidArgumentError {
    pub fn new(message: impl Into<String>) -> Self {
        InvalidArgumentError {
            message: message.into(),
        }
    }
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid argument: {}", self.message)
    }
}

impl std::error::Error for InvalidArgumentError {}
