//! Compact ("short form") number formatting: 12,000 as "12K".
//!
//! A compact instance couples a base decimal pattern with a ladder of
//! per-magnitude patterns and a plural rule set. Index `i` of the ladder
//! covers values with `i + 1` integer digits; each rung is either empty
//! (fall back to plain formatting), a single pattern like `"0K"`, or a
//! plural-tagged group like `"{one:0' 'millier other:0' 'milliers}"`.
//!
//! The count of `0` placeholders in a rung fixes how many integer digits
//! survive division: `"00K"` at index 4 divides by a thousand and shows two.

use num_bigint::BigInt;

use crate::bigdec::pow10;
use crate::digits::DigitList;
use crate::formatter::format_number;
use crate::locale::DecimalSymbols;
use crate::parse::{ParseOptions, parse_number};
use crate::parser::{compile_pattern, tokenize_pattern};
use crate::plural::{PluralOperands, PluralRules, PluralTag};
use crate::types::{
    ArithmeticError, CompiledPattern, DOUBLE_FRACTION_DIGITS, MalformedPatternError, Number,
    ParseError, PatternErrorKind, PatternToken, RoundingMode,
};

/// One affix pair of a ladder rung.
#[derive(Debug, Clone, PartialEq)]
struct CompactVariant {
    tag: PluralTag,
    prefix: String,
    suffix: String,
    /// Integer digits kept after division; 0 marks a literal-only variant
    /// that replaces the number entirely.
    placeholder_digits: u32,
}

/// One rung of the ladder.
#[derive(Debug, Clone, Default, PartialEq)]
struct CompactEntry {
    variants: Vec<CompactVariant>,
    /// Power-of-ten divisor; `None` means plain formatting applies.
    divisor: Option<u64>,
}

impl CompactEntry {
    fn variant(&self, tag: PluralTag) -> Option<&CompactVariant> {
        self.variants
            .iter()
            .find(|v| v.tag == tag)
            .or_else(|| self.variants.iter().find(|v| v.tag == PluralTag::Other))
            .or_else(|| self.variants.first())
    }
}

/// Formatter and parser for compact notation.
#[derive(Debug, Clone)]
pub struct CompactNumberFormat {
    base: CompiledPattern,
    symbols: DecimalSymbols,
    rounding_mode: RoundingMode,
    rules: PluralRules,
    entries: Vec<CompactEntry>,
    scratch: DigitList,
}

impl CompactNumberFormat {
    /// Compile a compact instance. `compact_patterns[i]` covers magnitude
    /// `10^i`; `plural_rules` may be empty, making every value `other`.
    pub fn new(
        base_pattern: &str,
        symbols: DecimalSymbols,
        compact_patterns: &[&str],
        plural_rules: &str,
    ) -> Result<CompactNumberFormat, MalformedPatternError> {
        let base = compile_pattern(base_pattern, &symbols)?;
        let rules = PluralRules::parse(plural_rules).map_err(|_| {
            MalformedPatternError::new(plural_rules, PatternErrorKind::MalformedPluralRules)
        })?;
        let entries = compact_patterns
            .iter()
            .enumerate()
            .map(|(index, source)| compile_entry(index, source, &symbols))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CompactNumberFormat {
            base,
            symbols,
            rounding_mode: RoundingMode::HalfEven,
            rules,
            entries,
            scratch: DigitList::new(),
        })
    }

    pub fn rounding_mode(&self) -> RoundingMode {
        self.rounding_mode
    }

    pub fn set_rounding_mode(&mut self, mode: RoundingMode) {
        self.rounding_mode = mode;
    }

    /// Fraction digit bounds carry over from the base pattern; these widen
    /// or narrow them after construction.
    pub fn set_minimum_fraction_digits(&mut self, digits: u32) {
        self.base.min_fraction_digits = digits;
        self.base.max_fraction_digits = self.base.max_fraction_digits.max(digits);
    }

    pub fn set_maximum_fraction_digits(&mut self, digits: u32) {
        self.base.max_fraction_digits = digits;
        self.base.min_fraction_digits = self.base.min_fraction_digits.min(digits);
    }

    /// Format a value in compact notation.
    pub fn format(&mut self, value: impl Into<Number>) -> Result<String, ArithmeticError> {
        let value = value.into();
        if let Number::Float(v) = value
            && !v.is_finite()
        {
            return self.format_plain(&value);
        }

        // The rung follows the magnitude of the rounded rendering: a carry
        // past a power of ten re-selects one rung up.
        let mut index = magnitude_index(&value);
        loop {
            let clamped = index.min(self.entries.len().saturating_sub(1));
            let shift = match self.entries.get(clamped).and_then(|e| e.divisor) {
                Some(divisor) => decimal_width(divisor) as i64 - 1,
                None => 0,
            };
            let scaled = float_magnitude(&value) / 10f64.powi(shift as i32);
            match self.rounded_integer_digits(scaled) {
                Some(digits) if i64::from(digits) > index as i64 + 1 - shift => index += 1,
                _ => break,
            }
        }
        let Some(entry) = self.entries.get(index.min(self.entries.len().saturating_sub(1)))
        else {
            return self.format_plain(&value);
        };
        let entry = entry.clone();
        let Some(divisor) = entry.divisor else {
            return self.format_plain(&value);
        };

        // Plural category comes from the value as it will be displayed.
        let probe = probe_value(&value, divisor, self.base.max_fraction_digits);
        let operands = PluralOperands::from_value(probe, self.base.min_fraction_digits);
        let tag = self.rules.select(&operands);
        let Some(variant) = entry.variant(tag) else {
            return self.format_plain(&value);
        };

        if variant.placeholder_digits == 0 {
            // Literal rung: the affixes are the whole rendering.
            return Ok(format!("{}{}", variant.prefix, variant.suffix));
        }

        let pattern = self.variant_pattern(variant);
        let scaled = scale_down(&value, divisor);
        let formatted = format_number(
            &pattern,
            &self.symbols,
            self.rounding_mode,
            &scaled,
            &mut self.scratch,
        )?;
        Ok(formatted.text)
    }

    /// Parse compact text back to a number. Every rung is a candidate; the
    /// longest literal match wins, with ties going to the lowest magnitude.
    pub fn parse(&mut self, text: &str) -> Result<(Number, usize), ParseError> {
        let mut best: Option<(Number, usize)> = None;
        let mut consider = |candidate: (Number, usize)| {
            if best.as_ref().is_none_or(|(_, len)| candidate.1 > *len) {
                best = Some(candidate);
            }
        };

        let entries = self.entries.clone();
        for entry in &entries {
            let Some(divisor) = entry.divisor else {
                continue;
            };
            for variant in &entry.variants {
                if variant.placeholder_digits == 0 {
                    continue;
                }
                let pattern = self.variant_pattern(variant);
                if let Ok((value, consumed)) = parse_number(
                    &pattern,
                    &self.symbols,
                    text,
                    ParseOptions::default(),
                    &mut self.scratch,
                ) {
                    consider((scale_up(value, divisor), consumed));
                }
            }
        }
        // Plain notation is always accepted.
        if let Ok(candidate) = parse_number(
            &self.base,
            &self.symbols,
            text,
            ParseOptions::default(),
            &mut self.scratch,
        ) {
            consider(candidate);
        }

        best.ok_or(ParseError::at(0))
    }

    /// Integer digit count of `magnitude` once rounded to the display
    /// fraction digits; `None` when rounding is refused.
    fn rounded_integer_digits(&mut self, magnitude: f64) -> Option<i32> {
        // Values past f64 range keep their unrounded rung.
        if !magnitude.is_finite() {
            return None;
        }
        self.scratch
            .set_float(
                false,
                magnitude,
                self.base.max_fraction_digits.min(DOUBLE_FRACTION_DIGITS),
                true,
                self.rounding_mode,
            )
            .ok()?;
        Some(self.scratch.decimal_at)
    }

    fn format_plain(&mut self, value: &Number) -> Result<String, ArithmeticError> {
        Ok(format_number(
            &self.base,
            &self.symbols,
            self.rounding_mode,
            value,
            &mut self.scratch,
        )?
        .text)
    }

    /// The base pattern wearing a rung's affixes and integer minimum.
    fn variant_pattern(&self, variant: &CompactVariant) -> CompiledPattern {
        let mut pattern = self.base.clone();
        pattern.positive_prefix = format!("{}{}", self.base.positive_prefix, variant.prefix);
        pattern.positive_suffix = format!("{}{}", variant.suffix, self.base.positive_suffix);
        pattern.negative_prefix = format!("{}{}", self.base.negative_prefix, variant.prefix);
        pattern.negative_suffix = format!("{}{}", variant.suffix, self.base.negative_suffix);
        pattern.min_integer_digits = variant.placeholder_digits;
        pattern
    }
}

/// Compile one rung. Tagged groups use `{tag:pattern tag:pattern}`; a plain
/// string is an untagged `other`.
fn compile_entry(
    index: usize,
    source: &str,
    symbols: &DecimalSymbols,
) -> Result<CompactEntry, MalformedPatternError> {
    let source = source.trim();
    if source.is_empty() {
        return Ok(CompactEntry::default());
    }

    let mut variants = Vec::new();
    if let Some(group) = source.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        for clause in split_clauses(group) {
            let (keyword, pattern) = clause.split_once(':').ok_or_else(|| {
                MalformedPatternError::new(source, PatternErrorKind::MalformedPluralRules)
            })?;
            let tag = PluralTag::from_keyword(keyword).ok_or_else(|| {
                MalformedPatternError::new(source, PatternErrorKind::MalformedPluralRules)
            })?;
            variants.push(compile_variant(index, tag, pattern, symbols)?);
        }
    } else {
        variants.push(compile_variant(index, PluralTag::Other, source, symbols)?);
    }

    // The divisor is fixed per rung; the representative variant is `other`.
    let representative = variants
        .iter()
        .find(|v| v.tag == PluralTag::Other)
        .or(variants.first())
        .and_then(|v| (v.placeholder_digits > 0).then_some(v.placeholder_digits));
    let divisor = match representative {
        Some(placeholders) => {
            let shift = index as u32 - (placeholders - 1);
            10u64.checked_pow(shift).ok_or_else(|| {
                MalformedPatternError::new(source, PatternErrorKind::DivisorOutOfRange)
            })?
        }
        // Literal-only rungs keep a nominal divisor for plural probing.
        None => 10u64.pow(index.min(18) as u32),
    };
    Ok(CompactEntry {
        variants,
        divisor: Some(divisor),
    })
}

/// Split a tagged group on whitespace, except inside quoted runs.
fn split_clauses(group: &str) -> Vec<&str> {
    let mut clauses = Vec::new();
    let mut start = None;
    let mut in_quote = false;
    for (i, c) in group.char_indices() {
        if c == '\'' {
            in_quote = !in_quote;
        }
        if c.is_whitespace() && !in_quote {
            if let Some(s) = start.take() {
                clauses.push(&group[s..i]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        clauses.push(&group[s..]);
    }
    clauses
}

fn compile_variant(
    index: usize,
    tag: PluralTag,
    source: &str,
    symbols: &DecimalSymbols,
) -> Result<CompactVariant, MalformedPatternError> {
    let tokens = tokenize_pattern(source)?;
    let has_digits = tokens
        .iter()
        .any(|t| matches!(t, PatternToken::ZeroDigit | PatternToken::Digit));
    let compiled = compile_pattern(source, symbols)?;

    let placeholder_digits = if has_digits {
        compiled.min_integer_digits.max(1)
    } else {
        0
    };
    if placeholder_digits > 0 && (placeholder_digits - 1) as usize > index {
        return Err(MalformedPatternError::new(
            source,
            PatternErrorKind::PlaceholderExceedsMagnitude,
        ));
    }
    Ok(CompactVariant {
        tag,
        prefix: compiled.positive_prefix,
        suffix: compiled.positive_suffix,
        placeholder_digits,
    })
}

/// Zero-based count of integer digits minus one, i.e. floor(log10(|v|)),
/// floored at zero.
fn magnitude_index(value: &Number) -> usize {
    match value {
        Number::Int(v) => decimal_width(v.unsigned_abs()) - 1,
        Number::Float(v) => {
            let magnitude = v.abs();
            if magnitude < 1.0 {
                return 0;
            }
            let mut index = magnitude.log10().floor() as i32;
            // log10 can land one off at power-of-ten boundaries.
            if 10f64.powi(index + 1) <= magnitude {
                index += 1;
            } else if 10f64.powi(index) > magnitude {
                index -= 1;
            }
            index.max(0) as usize
        }
        Number::BigInt(v) => v.magnitude().to_string().len() - 1,
        Number::BigDecimal(v) => {
            if v.is_zero() {
                return 0;
            }
            let (_, decimal_at) = v.magnitude_digits();
            decimal_at.max(1) as usize - 1
        }
    }
}

fn decimal_width(mut v: u64) -> usize {
    let mut width = 1;
    while v >= 10 {
        v /= 10;
        width += 1;
    }
    width
}

/// |value| as an f64 probe.
fn float_magnitude(value: &Number) -> f64 {
    match value {
        Number::Int(v) => (*v as f64).abs(),
        Number::Float(v) => v.abs(),
        Number::BigInt(v) => format!("{v}").parse().unwrap_or(0.0f64).abs(),
        Number::BigDecimal(v) => v.to_f64().abs(),
    }
}

/// Approximate divided value for plural selection, rounded to the display
/// fraction digits.
fn probe_value(value: &Number, divisor: u64, fraction_digits: u32) -> f64 {
    let divided = float_magnitude(value) / divisor as f64;
    let scale = 10f64.powi(fraction_digits.min(9) as i32);
    (divided * scale).round() / scale
}

fn scale_down(value: &Number, divisor: u64) -> Number {
    if divisor == 1 {
        return value.clone();
    }
    let shift = decimal_width(divisor) as i64 - 1;
    match value {
        Number::Int(v) => {
            if v % divisor as i64 == 0 {
                Number::Int(v / divisor as i64)
            } else {
                Number::BigDecimal(
                    crate::bigdec::BigDecimal::new(BigInt::from(*v), shift),
                )
            }
        }
        Number::Float(v) => Number::Float(v / divisor as f64),
        Number::BigInt(v) => {
            let d = pow10(shift as u64);
            if (v % &d) == BigInt::from(0) {
                Number::BigInt(v / d)
            } else {
                Number::BigDecimal(crate::bigdec::BigDecimal::new(v.clone(), shift))
            }
        }
        Number::BigDecimal(v) => Number::BigDecimal(v.shift_pow10(-shift)),
    }
}

fn scale_up(value: Number, divisor: u64) -> Number {
    if divisor == 1 {
        return value;
    }
    let shift = decimal_width(divisor) as i64 - 1;
    match value {
        Number::Int(v) => match v.checked_mul(divisor as i64) {
            Some(scaled) => Number::Int(scaled),
            None => Number::BigInt(BigInt::from(v) * pow10(shift as u64)),
        },
        Number::Float(v) => Number::Float(v * divisor as f64),
        Number::BigInt(v) => Number::BigInt(v * pow10(shift as u64)),
        Number::BigDecimal(v) => Number::BigDecimal(v.shift_pow10(shift)),
    }
}
