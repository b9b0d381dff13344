//! Scientific and engineering notation emission.
//!
//! The digit buffer arrives already rounded to the mantissa's significant
//! digit budget; this pass only decides where the decimal point and the
//! exponent land.

use crate::digits::DigitList;
use crate::formatter::OutputBuffer;
use crate::locale::DecimalSymbols;
use crate::types::{CompiledPattern, Field};

pub(crate) fn subformat(
    pattern: &CompiledPattern,
    symbols: &DecimalSymbols,
    digits: &DigitList,
    out: &mut OutputBuffer,
) {
    let decimal_at = i64::from(digits.decimal_at);
    let max_int = i64::from(pattern.max_integer_digits);
    let min_int = i64::from(pattern.min_integer_digits);
    let min_fra = i64::from(pattern.min_fraction_digits);

    let mut exponent = decimal_at;
    let mut minimum_integer_digits = min_int;
    if max_int > 1 && max_int > min_int {
        // A repeating range pins the exponent to a multiple of max_int
        // (engineering notation when max_int is 3).
        if exponent >= 1 {
            exponent = ((exponent - 1) / max_int) * max_int;
        } else {
            // Integer division truncates toward zero.
            exponent = ((exponent - max_int) / max_int) * max_int;
        }
        minimum_integer_digits = 1;
    } else {
        exponent -= if min_int > 0 || min_fra > 0 { min_int } else { 1 };
    }
    if digits.is_zero() {
        exponent = 0;
    }

    let minimum_digits = min_int + min_fra;
    let integer_digits = if digits.is_zero() {
        minimum_integer_digits
    } else {
        decimal_at - exponent
    };
    let total_digits = (digits.count() as i64)
        .max(minimum_digits)
        .max(integer_digits);

    for i in 0..total_digits {
        if i == integer_digits {
            out.push_char(Field::DecimalSeparator, symbols.decimal_separator);
        }
        let field = if i < integer_digits {
            Field::Integer
        } else {
            Field::Fraction
        };
        if (i as usize) < digits.count() {
            let d = digits.digits[i as usize] - b'0';
            out.push_char(field, symbols.digit(d));
        } else {
            out.push_char(field, symbols.zero_digit);
        }
    }

    out.push_str(Field::ExponentSymbol, &symbols.exponent_separator);
    let mut exponent = exponent;
    if exponent < 0 {
        out.push_char(Field::ExponentSign, symbols.minus_sign);
        exponent = -exponent;
    }
    let rendered = exponent.to_string();
    for _ in rendered.len()..usize::from(pattern.min_exponent_digits) {
        out.push_char(Field::Exponent, symbols.zero_digit);
    }
    for b in rendered.bytes() {
        out.push_char(Field::Exponent, symbols.digit(b - b'0'));
    }
}
