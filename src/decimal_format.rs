//! The stateful formatting surface.
//!
//! A `DecimalFormat` owns a compiled pattern, a symbol table, a rounding
//! mode and the scratch digit buffer. Setters edit the compiled pattern in
//! place and immediately re-derive everything that depends on it (expanded
//! affixes, the double fast path), so format and parse calls never observe
//! half-updated state. `apply_pattern` compiles into a temporary first; a
//! malformed pattern leaves the previous state untouched.

use crate::digits::DigitList;
use crate::formatter::fast_path::FastPathPlan;
use crate::formatter::{Formatted, format_number};
use crate::locale::DecimalSymbols;
use crate::parse::{ParseOptions, parse_number};
use crate::parser::{compile_pattern, expand_affix, to_pattern};
use crate::types::{
    AffixPart, ArithmeticError, CompiledPattern, InvalidArgumentError, MalformedPatternError,
    Number, ParseError, RoundingMode,
};

/// Grouping sizes above this are rejected.
const MAX_GROUPING_SIZE: u32 = 127;

#[derive(Debug, Clone)]
pub struct DecimalFormat {
    pattern: CompiledPattern,
    symbols: DecimalSymbols,
    rounding_mode: RoundingMode,
    parse_integer_only: bool,
    parse_arbitrary_precision: bool,
    /// Remembered size while grouping is toggled off.
    saved_grouping_size: u8,
    fast_plan: Option<FastPathPlan>,
    scratch: DigitList,
}

impl DecimalFormat {
    /// Compile `pattern` against a symbol table.
    pub fn new(
        pattern: &str,
        symbols: DecimalSymbols,
    ) -> Result<DecimalFormat, MalformedPatternError> {
        let compiled = compile_pattern(pattern, &symbols)?;
        let mut format = DecimalFormat {
            saved_grouping_size: compiled.grouping_size,
            pattern: compiled,
            symbols,
            rounding_mode: RoundingMode::HalfEven,
            parse_integer_only: false,
            parse_arbitrary_precision: false,
            fast_plan: None,
            scratch: DigitList::new(),
        };
        format.rebuild();
        Ok(format)
    }

    /// Compile against the embedded symbols of a locale.
    pub fn with_locale(pattern: &str, locale_id: &str) -> Result<DecimalFormat, MalformedPatternError> {
        let symbols = crate::locale::get_symbols(locale_id).unwrap_or_default();
        DecimalFormat::new(pattern, symbols)
    }

    /// Replace the pattern; setter-made digit and affix changes are reset.
    pub fn apply_pattern(&mut self, pattern: &str) -> Result<(), MalformedPatternError> {
        let compiled = compile_pattern(pattern, &self.symbols)?;
        self.saved_grouping_size = compiled.grouping_size;
        self.pattern = compiled;
        self.rebuild();
        Ok(())
    }

    /// The pattern in canonical (unlocalized) form.
    pub fn to_pattern(&self) -> String {
        to_pattern(&self.pattern, &self.symbols, false)
    }

    /// The pattern with locale glyphs for the structural characters.
    pub fn to_localized_pattern(&self) -> String {
        to_pattern(&self.pattern, &self.symbols, true)
    }

    /// Format to a string.
    pub fn format(&mut self, value: impl Into<Number>) -> Result<String, ArithmeticError> {
        let value = value.into();
        if let Number::Float(v) = value
            && let Some(plan) = &self.fast_plan
            && let Some(text) = plan.format(v)
        {
            return Ok(text);
        }
        Ok(self.format_with_spans(value)?.text)
    }

    /// Format keeping the field layout.
    pub fn format_with_spans(
        &mut self,
        value: impl Into<Number>,
    ) -> Result<Formatted, ArithmeticError> {
        format_number(
            &self.pattern,
            &self.symbols,
            self.rounding_mode,
            &value.into(),
            &mut self.scratch,
        )
    }

    /// Parse a number from the start of `text`, ignoring trailing content.
    pub fn parse(&mut self, text: &str) -> Result<Number, ParseError> {
        self.parse_with_position(text).map(|(value, _)| value)
    }

    /// Parse, also reporting the byte offset one past the consumed text.
    pub fn parse_with_position(&mut self, text: &str) -> Result<(Number, usize), ParseError> {
        parse_number(
            &self.pattern,
            &self.symbols,
            text,
            ParseOptions {
                integer_only: self.parse_integer_only,
                arbitrary_precision: self.parse_arbitrary_precision,
            },
            &mut self.scratch,
        )
    }

    pub fn symbols(&self) -> &DecimalSymbols {
        &self.symbols
    }

    /// Swap the symbol table; affixes re-expand against the new glyphs.
    pub fn set_symbols(&mut self, symbols: DecimalSymbols) {
        self.symbols = symbols;
        self.pattern.positive_prefix =
            expand_affix(&self.pattern.positive_prefix_parts, &self.symbols);
        self.pattern.positive_suffix =
            expand_affix(&self.pattern.positive_suffix_parts, &self.symbols);
        self.pattern.negative_prefix =
            expand_affix(&self.pattern.negative_prefix_parts, &self.symbols);
        self.pattern.negative_suffix =
            expand_affix(&self.pattern.negative_suffix_parts, &self.symbols);
        self.rebuild();
    }

    pub fn rounding_mode(&self) -> RoundingMode {
        self.rounding_mode
    }

    pub fn set_rounding_mode(&mut self, mode: RoundingMode) {
        self.rounding_mode = mode;
        self.rebuild();
    }

    pub fn positive_prefix(&self) -> &str {
        &self.pattern.positive_prefix
    }

    pub fn set_positive_prefix(&mut self, prefix: &str) {
        self.pattern.positive_prefix = prefix.to_string();
        self.pattern.positive_prefix_parts = literal_parts(prefix);
        self.rebuild();
    }

    pub fn positive_suffix(&self) -> &str {
        &self.pattern.positive_suffix
    }

    pub fn set_positive_suffix(&mut self, suffix: &str) {
        self.pattern.positive_suffix = suffix.to_string();
        self.pattern.positive_suffix_parts = literal_parts(suffix);
        self.rebuild();
    }

    pub fn negative_prefix(&self) -> &str {
        &self.pattern.negative_prefix
    }

    pub fn set_negative_prefix(&mut self, prefix: &str) {
        self.pattern.negative_prefix = prefix.to_string();
        self.pattern.negative_prefix_parts = literal_parts(prefix);
        self.pattern.has_negative_subpattern = true;
        self.rebuild();
    }

    pub fn negative_suffix(&self) -> &str {
        &self.pattern.negative_suffix
    }

    pub fn set_negative_suffix(&mut self, suffix: &str) {
        self.pattern.negative_suffix = suffix.to_string();
        self.pattern.negative_suffix_parts = literal_parts(suffix);
        self.pattern.has_negative_subpattern = true;
        self.rebuild();
    }

    pub fn multiplier(&self) -> i32 {
        self.pattern.multiplier
    }

    /// A multiplier of zero would make parsing non-invertible.
    pub fn set_multiplier(&mut self, multiplier: i32) -> Result<(), InvalidArgumentError> {
        if multiplier == 0 {
            return Err(InvalidArgumentError::new("multiplier must be non-zero"));
        }
        self.pattern.multiplier = multiplier;
        self.rebuild();
        Ok(())
    }

    pub fn grouping_used(&self) -> bool {
        self.pattern.grouping_used()
    }

    pub fn set_grouping_used(&mut self, used: bool) {
        if used {
            self.pattern.grouping_size = if self.saved_grouping_size > 0 {
                self.saved_grouping_size
            } else {
                3
            };
        } else {
            if self.pattern.grouping_size > 0 {
                self.saved_grouping_size = self.pattern.grouping_size;
            }
            self.pattern.grouping_size = 0;
        }
        self.rebuild();
    }

    pub fn grouping_size(&self) -> u8 {
        self.pattern.grouping_size
    }

    pub fn set_grouping_size(&mut self, size: u32) -> Result<(), InvalidArgumentError> {
        if size > MAX_GROUPING_SIZE {
            return Err(InvalidArgumentError::new(format!(
                "grouping size {size} out of range 0..={MAX_GROUPING_SIZE}"
            )));
        }
        self.pattern.grouping_size = size as u8;
        self.saved_grouping_size = size as u8;
        self.rebuild();
        Ok(())
    }

    pub fn minimum_integer_digits(&self) -> u32 {
        self.pattern.min_integer_digits
    }

    pub fn set_minimum_integer_digits(&mut self, digits: u32) {
        self.pattern.min_integer_digits = digits;
        self.pattern.max_integer_digits = self.pattern.max_integer_digits.max(digits);
        self.rebuild();
    }

    pub fn maximum_integer_digits(&self) -> u32 {
        self.pattern.max_integer_digits
    }

    pub fn set_maximum_integer_digits(&mut self, digits: u32) {
        self.pattern.max_integer_digits = digits;
        self.pattern.min_integer_digits = self.pattern.min_integer_digits.min(digits);
        self.rebuild();
    }

    pub fn minimum_fraction_digits(&self) -> u32 {
        self.pattern.min_fraction_digits
    }

    pub fn set_minimum_fraction_digits(&mut self, digits: u32) {
        self.pattern.min_fraction_digits = digits;
        self.pattern.max_fraction_digits = self.pattern.max_fraction_digits.max(digits);
        self.rebuild();
    }

    pub fn maximum_fraction_digits(&self) -> u32 {
        self.pattern.max_fraction_digits
    }

    pub fn set_maximum_fraction_digits(&mut self, digits: u32) {
        self.pattern.max_fraction_digits = digits;
        self.pattern.min_fraction_digits = self.pattern.min_fraction_digits.min(digits);
        self.rebuild();
    }

    pub fn decimal_separator_always_shown(&self) -> bool {
        self.pattern.decimal_separator_always_shown
    }

    pub fn set_decimal_separator_always_shown(&mut self, shown: bool) {
        self.pattern.decimal_separator_always_shown = shown;
        self.rebuild();
    }

    pub fn parse_integer_only(&self) -> bool {
        self.parse_integer_only
    }

    pub fn set_parse_integer_only(&mut self, value: bool) {
        self.parse_integer_only = value;
    }

    /// When set, finite parse results come back as `Number::BigDecimal`.
    pub fn parse_arbitrary_precision(&self) -> bool {
        self.parse_arbitrary_precision
    }

    pub fn set_parse_arbitrary_precision(&mut self, value: bool) {
        self.parse_arbitrary_precision = value;
    }

    fn rebuild(&mut self) {
        self.fast_plan = FastPathPlan::plan(&self.pattern, &self.symbols, self.rounding_mode);
    }
}

fn literal_parts(text: &str) -> Vec<AffixPart> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![AffixPart::Literal(text.to_string())]
    }
}
