//! Text-to-number parsing against a compiled pattern.
//!
//! Parsing is lenient in the directions formatting is strict: leading zeros
//! vanish, grouping separators are accepted anywhere in the integer part
//! (but must be followed by a digit), and the result takes the narrowest
//! representation that holds the value losslessly.

use crate::digits::DigitList;
use crate::locale::DecimalSymbols;
use crate::types::{CompiledPattern, Number, ParseError};

/// Non-default behavior toggles threaded from the stateful surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Stop at the decimal separator and never apply an exponent.
    pub integer_only: bool,
    /// Produce `Number::BigDecimal` for finite results.
    pub arbitrary_precision: bool,
}

/// Parse a number from the start of `text`. Returns the value and the byte
/// offset one past the last consumed character; trailing text is left for
/// the caller.
pub fn parse_number(
    pattern: &CompiledPattern,
    symbols: &DecimalSymbols,
    text: &str,
    options: ParseOptions,
    scratch: &mut DigitList,
) -> Result<(Number, usize), ParseError> {
    // NaN is matched bare, before any affix.
    if text.starts_with(&symbols.nan) {
        return Ok((Number::Float(f64::NAN), symbols.nan.len()));
    }

    let mut got_positive = text.starts_with(&pattern.positive_prefix);
    let mut got_negative = text.starts_with(&pattern.negative_prefix);
    if got_positive && got_negative {
        match pattern
            .positive_prefix
            .len()
            .cmp(&pattern.negative_prefix.len())
        {
            std::cmp::Ordering::Greater => got_negative = false,
            std::cmp::Ordering::Less => got_positive = false,
            // Same text; the suffix decides.
            std::cmp::Ordering::Equal => {}
        }
    }
    if !got_positive && !got_negative {
        return Err(ParseError::at(0));
    }
    let mut position = if got_positive {
        pattern.positive_prefix.len()
    } else {
        pattern.negative_prefix.len()
    };

    let mut infinite = false;
    scratch.clear();
    if text[position..].starts_with(&symbols.infinity) {
        position += symbols.infinity.len();
        infinite = true;
    } else {
        position = scan_digits(pattern, symbols, text, position, options, scratch)
            .ok_or(ParseError::at(position))?;
    }

    // Affixes must agree front to back.
    if got_positive {
        got_positive = text[position..].starts_with(&pattern.positive_suffix);
    }
    if got_negative {
        got_negative = text[position..].starts_with(&pattern.negative_suffix);
    }
    if got_positive && got_negative {
        match pattern
            .positive_suffix
            .len()
            .cmp(&pattern.negative_suffix.len())
        {
            std::cmp::Ordering::Greater => got_negative = false,
            std::cmp::Ordering::Less => got_positive = false,
            std::cmp::Ordering::Equal => {}
        }
    }
    if got_positive == got_negative {
        return Err(ParseError::at(position));
    }
    position += if got_positive {
        pattern.positive_suffix.len()
    } else {
        pattern.negative_suffix.len()
    };

    let negative = !got_positive;
    scratch.is_negative = negative;

    if infinite {
        let value = if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        return Ok((Number::Float(value), position));
    }

    // Undo the pattern multiplier; powers of ten shift the decimal point
    // exactly, anything else divides in binary.
    if pattern.multiplier != 1 {
        let magnitude = pattern.multiplier.unsigned_abs();
        if pattern.multiplier < 0 {
            scratch.is_negative = !scratch.is_negative;
        }
        if let Some(shift) = pow10_exponent(magnitude) {
            scratch.decimal_at -= shift as i32;
        } else {
            let value = scratch.to_f64() / f64::from(magnitude);
            return Ok((Number::Float(value), position));
        }
    }

    let value = if scratch.is_zero() && scratch.is_negative {
        Number::Float(-0.0)
    } else if options.arbitrary_precision {
        Number::BigDecimal(scratch.to_big_decimal())
    } else if scratch.fits_into_long(!scratch.is_negative, options.integer_only) {
        Number::Int(scratch.to_i64())
    } else {
        Number::Float(scratch.to_f64())
    };
    Ok((value, position))
}

/// Consume the digit body at `position`, filling `digits`. Returns the new
/// position, or `None` when no digit was seen.
fn scan_digits(
    pattern: &CompiledPattern,
    symbols: &DecimalSymbols,
    text: &str,
    start: usize,
    options: ParseOptions,
    digits: &mut DigitList,
) -> Option<usize> {
    let mut position = start;
    let mut saw_digit = false;
    let mut saw_decimal = false;
    let mut backup: Option<usize> = None;
    let mut exponent: i64 = 0;

    let mut chars = text[start..].char_indices().peekable();
    while let Some(&(offset, ch)) = chars.peek() {
        let abs = start + offset;
        if let Some(digit) = symbols.digit_value(ch) {
            backup = None;
            saw_digit = true;
            if digit == 0 && digits.count() == 0 {
                if saw_decimal {
                    // Leading zeros after the point shift the scale.
                    digits.decimal_at -= 1;
                }
                // Leading integer zeros are dropped outright.
            } else {
                digits.digits.push(b'0' + digit);
            }
        } else if ch == symbols.decimal_separator && !saw_decimal {
            if options.integer_only {
                break;
            }
            digits.decimal_at = digits.count() as i32;
            saw_decimal = true;
        } else if ch == symbols.grouping_separator && pattern.grouping_used() {
            if saw_decimal {
                break;
            }
            // Tentative: only kept when a digit follows.
            backup = Some(abs);
        } else if !options.integer_only
            && backup.is_none()
            && text[abs..].starts_with(&symbols.exponent_separator)
        {
            if let Some((value, end)) =
                scan_exponent(symbols, text, abs + symbols.exponent_separator.len())
            {
                exponent = value;
                position = end;
            } else {
                position = abs;
            }
            return finish_scan(digits, saw_digit, saw_decimal, exponent, backup, position);
        } else {
            break;
        }
        chars.next();
        position = abs + ch.len_utf8();
    }

    finish_scan(digits, saw_digit, saw_decimal, exponent, backup, position)
}

fn finish_scan(
    digits: &mut DigitList,
    saw_digit: bool,
    saw_decimal: bool,
    exponent: i64,
    backup: Option<usize>,
    position: usize,
) -> Option<usize> {
    let position = backup.unwrap_or(position);
    if !saw_digit {
        return None;
    }
    if !saw_decimal {
        digits.decimal_at = digits.count() as i32;
    }
    digits.decimal_at = digits
        .decimal_at
        .saturating_add(exponent.clamp(i32::MIN as i64, i32::MAX as i64) as i32);
    Some(position)
}

/// Parse an optionally signed digit run after the exponent separator.
/// Returns the exponent and the position past it, or `None` to leave the
/// separator unconsumed.
fn scan_exponent(symbols: &DecimalSymbols, text: &str, start: usize) -> Option<(i64, usize)> {
    let mut position = start;
    let mut negative = false;
    let mut chars = text[position..].chars();
    if let Some(c) = chars.next()
        && (c == symbols.minus_sign || c == symbols.plus_sign)
    {
        negative = c == symbols.minus_sign;
        position += c.len_utf8();
    }

    let mut value: i64 = 0;
    let mut saw_digit = false;
    for c in text[position..].chars() {
        let Some(digit) = symbols.digit_value(c) else {
            break;
        };
        saw_digit = true;
        value = value.saturating_mul(10).saturating_add(i64::from(digit));
        position += c.len_utf8();
    }
    if !saw_digit {
        return None;
    }
    Some((if negative { -value } else { value }, position))
}

/// `10^k == magnitude` test for exact multiplier reversal.
fn pow10_exponent(magnitude: u32) -> Option<u32> {
    let mut n = magnitude;
    let mut k = 0;
    if n == 0 {
        return None;
    }
    while n % 10 == 0 {
        n /= 10;
        k += 1;
    }
    (n == 1).then_some(k)
}
