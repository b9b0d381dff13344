//! Number formatting against a compiled pattern.
//!
//! Every representation funnels into the shared [`DigitList`] scratch buffer
//! and a single `subformat` pass; exponential notation and the double fast
//! path live in their own submodules. The output carries field spans so
//! callers can style individual parts of the result.

pub mod exponential;
pub mod fast_path;

use num_bigint::BigInt;

use crate::bigdec::BigDecimal;
use crate::digits::DigitList;
use crate::locale::DecimalSymbols;
use crate::types::{
    ArithmeticError, CompiledPattern, DOUBLE_FRACTION_DIGITS, Field, FieldSpan, Number,
    RoundingMode,
};

/// A formatted number: the rendered text plus the field layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub text: String,
    pub spans: Vec<FieldSpan>,
}

impl Formatted {
    /// The span covering a field, if the output contains one.
    pub fn span(&self, field: Field) -> Option<&FieldSpan> {
        self.spans.iter().find(|s| s.field == field)
    }
}

/// Accumulates output text and the covering field spans. Adjacent characters
/// of the same field coalesce into one span.
#[derive(Debug, Default)]
pub(crate) struct OutputBuffer {
    text: String,
    spans: Vec<FieldSpan>,
}

impl OutputBuffer {
    pub(crate) fn push_str(&mut self, field: Field, s: &str) {
        if s.is_empty() {
            return;
        }
        let start = self.text.len();
        self.text.push_str(s);
        self.extend_span(field, start);
    }

    pub(crate) fn push_char(&mut self, field: Field, c: char) {
        let start = self.text.len();
        self.text.push(c);
        self.extend_span(field, start);
    }

    fn extend_span(&mut self, field: Field, start: usize) {
        let end = self.text.len();
        if let Some(last) = self.spans.last_mut()
            && last.field == field
            && last.range.end == start
        {
            last.range.end = end;
            return;
        }
        self.spans.push(FieldSpan {
            field,
            range: start..end,
        });
    }

    fn len(&self) -> usize {
        self.text.len()
    }

    pub(crate) fn finish(self) -> Formatted {
        Formatted {
            text: self.text,
            spans: self.spans,
        }
    }
}

/// Significant-digit budget for the mantissa in exponential notation.
fn exponential_significant_digits(pattern: &CompiledPattern) -> u32 {
    pattern
        .min_integer_digits
        .saturating_add(pattern.max_fraction_digits)
        .max(1)
}

/// Format a value against a compiled pattern. `scratch` is the caller-owned
/// digit buffer; it is cleared and reloaded on every call.
pub fn format_number(
    pattern: &CompiledPattern,
    symbols: &DecimalSymbols,
    mode: RoundingMode,
    value: &Number,
    scratch: &mut DigitList,
) -> Result<Formatted, ArithmeticError> {
    let mut out = OutputBuffer::default();
    match value {
        Number::Float(v) => format_float(pattern, symbols, mode, *v, scratch, &mut out)?,
        Number::Int(v) => format_int(pattern, symbols, mode, *v, scratch, &mut out)?,
        Number::BigInt(v) => format_bigint(pattern, symbols, mode, v, scratch, &mut out)?,
        Number::BigDecimal(v) => {
            format_big_decimal(pattern, symbols, mode, v, scratch, &mut out)?;
        }
    }
    Ok(out.finish())
}

fn format_float(
    pattern: &CompiledPattern,
    symbols: &DecimalSymbols,
    mode: RoundingMode,
    value: f64,
    scratch: &mut DigitList,
    out: &mut OutputBuffer,
) -> Result<(), ArithmeticError> {
    // NaN is emitted bare, with no affixes.
    if value.is_nan() {
        out.push_str(Field::Integer, &symbols.nan);
        return Ok(());
    }
    let scaled = if pattern.multiplier != 1 {
        value * f64::from(pattern.multiplier)
    } else {
        value
    };
    let negative = scaled < 0.0 || (scaled == 0.0 && scaled.is_sign_negative());

    if scaled.is_infinite() {
        push_prefix(pattern, out, negative);
        out.push_str(Field::Integer, &symbols.infinity);
        push_suffix(pattern, out, negative);
        return Ok(());
    }

    if pattern.use_exponential_notation {
        scratch.set_float(
            negative,
            scaled.abs(),
            exponential_significant_digits(pattern),
            false,
            mode,
        )?;
    } else {
        scratch.set_float(
            negative,
            scaled.abs(),
            pattern.max_fraction_digits.min(DOUBLE_FRACTION_DIGITS),
            true,
            mode,
        )?;
    }
    emit(pattern, symbols, scratch, negative, false, out);
    Ok(())
}

fn format_int(
    pattern: &CompiledPattern,
    symbols: &DecimalSymbols,
    mode: RoundingMode,
    value: i64,
    scratch: &mut DigitList,
    out: &mut OutputBuffer,
) -> Result<(), ArithmeticError> {
    let scaled = match value.checked_mul(i64::from(pattern.multiplier)) {
        Some(v) => v,
        // Widen instead of overflowing; the BigInt path applies the
        // multiplier itself.
        None => {
            return format_bigint(pattern, symbols, mode, &BigInt::from(value), scratch, out);
        }
    };
    let negative = scaled < 0;
    let significant_limit = pattern
        .use_exponential_notation
        .then(|| exponential_significant_digits(pattern));
    scratch.set_int(negative, scaled.unsigned_abs(), significant_limit, mode)?;
    emit(pattern, symbols, scratch, negative, true, out);
    Ok(())
}

fn format_bigint(
    pattern: &CompiledPattern,
    symbols: &DecimalSymbols,
    mode: RoundingMode,
    value: &BigInt,
    scratch: &mut DigitList,
    out: &mut OutputBuffer,
) -> Result<(), ArithmeticError> {
    let scaled;
    let value = if pattern.multiplier != 1 {
        scaled = value * BigInt::from(pattern.multiplier);
        &scaled
    } else {
        value
    };
    let negative = value.sign() == num_bigint::Sign::Minus;
    let significant_limit = pattern
        .use_exponential_notation
        .then(|| exponential_significant_digits(pattern));
    scratch.set_bigint(negative, value, significant_limit, mode)?;
    emit(pattern, symbols, scratch, negative, true, out);
    Ok(())
}

fn format_big_decimal(
    pattern: &CompiledPattern,
    symbols: &DecimalSymbols,
    mode: RoundingMode,
    value: &BigDecimal,
    scratch: &mut DigitList,
    out: &mut OutputBuffer,
) -> Result<(), ArithmeticError> {
    let scaled;
    let value = if pattern.multiplier != 1 {
        scaled = value.mul_int(i64::from(pattern.multiplier));
        &scaled
    } else {
        value
    };
    let negative = value.is_negative();
    if pattern.use_exponential_notation {
        scratch.set_big_decimal(
            negative,
            value,
            exponential_significant_digits(pattern),
            false,
            mode,
        )?;
    } else {
        scratch.set_big_decimal(negative, value, pattern.max_fraction_digits, true, mode)?;
    }
    emit(pattern, symbols, scratch, negative, false, out);
    Ok(())
}

fn push_prefix(pattern: &CompiledPattern, out: &mut OutputBuffer, negative: bool) {
    out.push_str(
        Field::Prefix,
        if negative {
            &pattern.negative_prefix
        } else {
            &pattern.positive_prefix
        },
    );
}

fn push_suffix(pattern: &CompiledPattern, out: &mut OutputBuffer, negative: bool) {
    out.push_str(
        Field::Suffix,
        if negative {
            &pattern.negative_suffix
        } else {
            &pattern.positive_suffix
        },
    );
}

fn emit(
    pattern: &CompiledPattern,
    symbols: &DecimalSymbols,
    digits: &DigitList,
    negative: bool,
    integer_source: bool,
    out: &mut OutputBuffer,
) {
    push_prefix(pattern, out, negative);
    if pattern.use_exponential_notation {
        exponential::subformat(pattern, symbols, digits, out);
    } else {
        subformat_fixed(pattern, symbols, digits, integer_source, out);
    }
    push_suffix(pattern, out, negative);
}

/// Fixed-notation digit emission. `integer_source` marks values with no
/// fractional digits by construction (i64 and BigInt), which lets the
/// fraction loop stop at the minimum.
fn subformat_fixed(
    pattern: &CompiledPattern,
    symbols: &DecimalSymbols,
    digits: &DigitList,
    integer_source: bool,
    out: &mut OutputBuffer,
) {
    let decimal_at = i64::from(digits.decimal_at);
    let digit_count = digits.count() as i64;
    let grouping = i64::from(pattern.grouping_size);

    let mut count = i64::from(pattern.min_integer_digits);
    if decimal_at > 0 && count < decimal_at {
        count = decimal_at;
    }
    let mut digit_index: i64 = 0;
    if count > i64::from(pattern.max_integer_digits) {
        // Truncate on the left, keeping the least significant digits.
        count = i64::from(pattern.max_integer_digits);
        digit_index = decimal_at - count;
    }

    let size_before = out.len();
    let mut i = count - 1;
    while i >= 0 {
        if i < decimal_at && digit_index < digit_count {
            let d = digits.digits[digit_index as usize] - b'0';
            out.push_char(Field::Integer, symbols.digit(d));
            digit_index += 1;
        } else {
            out.push_char(Field::Integer, symbols.zero_digit);
        }
        if pattern.grouping_used() && i > 0 && i % grouping == 0 {
            out.push_char(Field::GroupingSeparator, symbols.grouping_separator);
        }
        i -= 1;
    }

    let fraction_present = pattern.min_fraction_digits > 0
        || (!integer_source && digit_index < digit_count);
    // An empty integer part with no fraction still shows a single zero.
    if !fraction_present && out.len() == size_before {
        out.push_char(Field::Integer, symbols.zero_digit);
    }

    if pattern.decimal_separator_always_shown || fraction_present {
        out.push_char(Field::DecimalSeparator, symbols.decimal_separator);
    }

    let mut i: i64 = 0;
    while i < i64::from(pattern.max_fraction_digits) {
        if i >= i64::from(pattern.min_fraction_digits)
            && (integer_source || digit_index >= digit_count)
        {
            break;
        }
        if -1 - i > decimal_at - 1 {
            // Leading fraction zeros ahead of the first significant digit.
            out.push_char(Field::Fraction, symbols.zero_digit);
            i += 1;
            continue;
        }
        if !integer_source && digit_index < digit_count {
            let d = digits.digits[digit_index as usize] - b'0';
            out.push_char(Field::Fraction, symbols.digit(d));
            digit_index += 1;
        } else {
            out.push_char(Field::Fraction, symbols.zero_digit);
        }
        i += 1;
    }
}
