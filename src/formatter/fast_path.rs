//! Grouping-of-three fast path for finite doubles.
//!
//! Common half-even patterns ("#,##0.##", "¤#,##0.00" and friends) can skip
//! the digit-list machinery: the value is scaled by a power of ten, split
//! with `floor`, and the rounding decision is taken from the exact product
//! error recovered through `mul_add`. Because both the fractional part and
//! the error term are exact doubles, the sign of their sum is the true
//! rounding direction, so the fast path produces byte-identical output to
//! the general path or refuses up front.

use crate::locale::DecimalSymbols;
use crate::types::{CompiledPattern, RoundingMode};

/// Precomputed state for one eligible pattern/symbols/mode combination.
#[derive(Debug, Clone)]
pub(crate) struct FastPathPlan {
    /// Scaled magnitudes must stay below this for `floor` splitting to be
    /// exact; derived from 2^52 over the fraction scale.
    magnitude_bound: f64,
    fraction_scale: f64,
    divisor: u64,
    min_fraction_digits: u32,
    max_fraction_digits: u32,
    zero_digit: char,
    decimal_separator: char,
    grouping_separator: char,
    positive_prefix: String,
    positive_suffix: String,
    negative_prefix: String,
    negative_suffix: String,
}

impl FastPathPlan {
    /// Build a plan when the pattern shape qualifies; `None` routes every
    /// call through the general path.
    pub(crate) fn plan(
        pattern: &CompiledPattern,
        symbols: &DecimalSymbols,
        mode: RoundingMode,
    ) -> Option<FastPathPlan> {
        if mode != RoundingMode::HalfEven
            || pattern.use_exponential_notation
            || pattern.multiplier != 1
            || pattern.grouping_size != 3
            || pattern.decimal_separator_always_shown
            || pattern.min_integer_digits != 1
            || pattern.max_integer_digits < 10
        {
            return None;
        }
        let fraction_shape_ok = (pattern.min_fraction_digits == 0
            && (1..=3).contains(&pattern.max_fraction_digits))
            || (pattern.min_fraction_digits == 2 && pattern.max_fraction_digits == 2);
        if !fraction_shape_ok {
            return None;
        }

        let divisor = 10u64.pow(pattern.max_fraction_digits);
        let fraction_scale = divisor as f64;
        Some(FastPathPlan {
            magnitude_bound: (1u64 << 52) as f64 / fraction_scale,
            fraction_scale,
            divisor,
            min_fraction_digits: pattern.min_fraction_digits,
            max_fraction_digits: pattern.max_fraction_digits,
            zero_digit: symbols.zero_digit,
            decimal_separator: symbols.decimal_separator,
            grouping_separator: symbols.grouping_separator,
            positive_prefix: pattern.positive_prefix.clone(),
            positive_suffix: pattern.positive_suffix.clone(),
            negative_prefix: pattern.negative_prefix.clone(),
            negative_suffix: pattern.negative_suffix.clone(),
        })
    }

    /// Format a double, or `None` when the value is out of the plan's range.
    pub(crate) fn format(&self, value: f64) -> Option<String> {
        if !value.is_finite() {
            return None;
        }
        let negative = value.is_sign_negative();
        let magnitude = value.abs();
        if magnitude >= self.magnitude_bound {
            return None;
        }

        let product = magnitude * self.fraction_scale;
        // Exact error of the product; the two-term sum below is the exact
        // scaled value.
        let error = magnitude.mul_add(self.fraction_scale, -product);
        let floor = product.floor();
        let mut integer = floor as u64;
        let mut fraction = product - floor;
        if fraction == 0.0 && error < 0.0 {
            // The true value sits just below the computed floor.
            integer = integer.checked_sub(1)?;
            fraction = 1.0;
        }
        // Sign of (fraction - 1/2) + error decides the half-even rounding;
        // an exactly zero sum is a true tie.
        let offset = (fraction - 0.5) + error;
        let round_up = if offset > 0.0 {
            true
        } else if offset < 0.0 {
            false
        } else {
            integer % 2 == 1
        };
        if round_up {
            integer += 1;
        }

        let int_part = integer / self.divisor;
        let mut frac_part = integer % self.divisor;
        let mut fraction_digits = self.max_fraction_digits;
        while fraction_digits > self.min_fraction_digits && frac_part % 10 == 0 {
            frac_part /= 10;
            fraction_digits -= 1;
        }

        let mut out = String::with_capacity(32);
        out.push_str(if negative {
            &self.negative_prefix
        } else {
            &self.positive_prefix
        });
        self.push_grouped(&mut out, int_part);
        if fraction_digits > 0 {
            out.push(self.decimal_separator);
            self.push_padded(&mut out, frac_part, fraction_digits);
        }
        out.push_str(if negative {
            &self.negative_suffix
        } else {
            &self.positive_suffix
        });
        Some(out)
    }

    fn digit(&self, value: u8) -> char {
        char::from_u32(self.zero_digit as u32 + u32::from(value))
            .expect("zero digit anchors a contiguous glyph run")
    }

    fn push_grouped(&self, out: &mut String, value: u64) {
        let rendered = value.to_string();
        let len = rendered.len();
        for (i, b) in rendered.bytes().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(self.grouping_separator);
            }
            out.push(self.digit(b - b'0'));
        }
    }

    fn push_padded(&self, out: &mut String, value: u64, width: u32) {
        let rendered = value.to_string();
        for _ in rendered.len()..width as usize {
            out.push(self.zero_digit);
        }
        for b in rendered.bytes() {
            out.push(self.digit(b - b'0'));
        }
    }
}
