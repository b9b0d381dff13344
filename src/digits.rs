//! Exact decimal digit buffer shared by the format and parse paths.
//!
//! A `DigitList` holds the significant digits of a value together with a
//! decimal-point offset and a sign. All numeric representations (i64, f64,
//! BigInt, BigDecimal) funnel through it, and every rounding decision is made
//! here through a single funnel so the eight rounding modes behave
//! identically regardless of the source type.
//!
//! Doubles are decomposed through the shortest round-trip decimal
//! representation. That representation is inexact at decimal tie points, so
//! an apparent tie (a `5` followed only by zeros at the cut) is resolved by
//! comparing the exact binary value against the decimal tie point with
//! BigInt cross-multiplication. The comparison only runs at apparent ties.

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_bigint::Sign;

use crate::bigdec::{BigDecimal, pow10};
use crate::types::{ArithmeticError, RoundingMode};

/// Largest number of digits an i64 magnitude can span.
pub const MAX_LONG_DIGITS: usize = 19;

const LONG_MIN_MAGNITUDE: &[u8] = b"9223372036854775808";

/// Where the digits came from, for exact tie resolution.
#[derive(Debug, Clone, Copy)]
enum RoundSource {
    /// Digits are an exact decimal rendering of the value.
    Exact,
    /// Digits are the shortest round-trip rendering of this binary magnitude.
    Float(f64),
}

/// Mutable digit scratch buffer. One per in-flight format or parse call.
#[derive(Debug, Clone, Default)]
pub struct DigitList {
    /// ASCII decimal digits, no leading zeros, no trailing zeros.
    pub digits: Vec<u8>,
    /// Decimal point position relative to `digits[0]`; may be negative or
    /// exceed the digit count.
    pub decimal_at: i32,
    /// Sign, kept apart from the magnitude so signed zero survives.
    pub is_negative: bool,
}

impl DigitList {
    pub fn new() -> Self {
        DigitList::default()
    }

    pub fn clear(&mut self) {
        self.digits.clear();
        self.decimal_at = 0;
        self.is_negative = false;
    }

    pub fn count(&self) -> usize {
        self.digits.len()
    }

    pub fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    /// Load from an i64 magnitude. Digit extraction is exact; rounding only
    /// happens when a significant-digit limit is given (exponential mode).
    pub fn set_int(
        &mut self,
        negative: bool,
        magnitude: u64,
        significant_limit: Option<u32>,
        mode: RoundingMode,
    ) -> Result<(), ArithmeticError> {
        self.clear();
        self.is_negative = negative;
        if magnitude == 0 {
            return Ok(());
        }
        let rendered = magnitude.to_string();
        self.decimal_at = rendered.len() as i32;
        self.digits.extend_from_slice(rendered.as_bytes());
        self.strip_trailing_zeros();
        if let Some(limit) = significant_limit {
            self.round(limit as i64, mode, RoundSource::Exact)?;
        }
        Ok(())
    }

    /// Load from a finite f64 magnitude via its shortest round-trip decimal
    /// representation. `fixed_point` makes `maximum_digits` count fraction
    /// digits; otherwise it counts total significant digits.
    pub fn set_float(
        &mut self,
        negative: bool,
        value: f64,
        maximum_digits: u32,
        fixed_point: bool,
        mode: RoundingMode,
    ) -> Result<(), ArithmeticError> {
        debug_assert!(value.is_finite());
        self.clear();
        self.is_negative = negative;
        let magnitude = value.abs();
        if magnitude == 0.0 {
            return Ok(());
        }
        self.load_shortest(magnitude);
        self.apply_bounds(
            maximum_digits,
            fixed_point,
            mode,
            RoundSource::Float(magnitude),
        )
    }

    /// Load from a BigInt magnitude; exact extraction, rounding only under a
    /// significant-digit limit.
    pub fn set_bigint(
        &mut self,
        negative: bool,
        magnitude: &BigInt,
        significant_limit: Option<u32>,
        mode: RoundingMode,
    ) -> Result<(), ArithmeticError> {
        self.clear();
        self.is_negative = negative;
        if magnitude.sign() == Sign::NoSign {
            return Ok(());
        }
        let rendered = magnitude.magnitude().to_string();
        self.decimal_at = rendered.len() as i32;
        self.digits.extend_from_slice(rendered.as_bytes());
        self.strip_trailing_zeros();
        if let Some(limit) = significant_limit {
            self.round(limit as i64, mode, RoundSource::Exact)?;
        }
        Ok(())
    }

    /// Load from a BigDecimal; exact extraction, then the same bounds logic
    /// as the double path but with an exact rounding source.
    pub fn set_big_decimal(
        &mut self,
        negative: bool,
        value: &BigDecimal,
        maximum_digits: u32,
        fixed_point: bool,
        mode: RoundingMode,
    ) -> Result<(), ArithmeticError> {
        self.clear();
        self.is_negative = negative;
        if value.is_zero() {
            return Ok(());
        }
        let (rendered, decimal_at) = value.magnitude_digits();
        self.decimal_at = decimal_at;
        self.digits.extend_from_slice(rendered.as_bytes());
        self.strip_leading_zeros();
        self.strip_trailing_zeros();
        self.apply_bounds(maximum_digits, fixed_point, mode, RoundSource::Exact)
    }

    fn load_shortest(&mut self, magnitude: f64) {
        // `{:e}` is the shortest representation that round-trips, in the
        // form `d[.ddd]e<exp>`.
        let rendered = format!("{magnitude:e}");
        let (mantissa, exp) = rendered
            .split_once('e')
            .expect("LowerExp output always carries an exponent");
        let exp: i32 = exp.parse().expect("LowerExp exponent is an integer");
        for b in mantissa.bytes() {
            if b != b'.' {
                self.digits.push(b);
            }
        }
        self.decimal_at = exp + 1;
        self.strip_trailing_zeros();
    }

    fn apply_bounds(
        &mut self,
        maximum_digits: u32,
        fixed_point: bool,
        mode: RoundingMode,
        source: RoundSource,
    ) -> Result<(), ArithmeticError> {
        if fixed_point {
            let max = maximum_digits as i64;
            let fraction_span = -(self.decimal_at as i64);
            if fraction_span > max {
                // Underflows to zero, e.g. 0.0009 at 2 fraction digits.
                if mode == RoundingMode::Unnecessary {
                    return Err(ArithmeticError::RoundingNecessary);
                }
                if self.should_round_to_one(mode, source)? {
                    // One unit in the last representable place, 10^-max.
                    self.digits.clear();
                    self.digits.push(b'1');
                    self.decimal_at = 1 - max as i32;
                } else {
                    self.digits.clear();
                }
                return Ok(());
            }
            if fraction_span == max {
                // The cut lands exactly on the leading digit, e.g. 0.0009
                // at 3 fraction digits.
                if self.should_round_up(0, mode, source)? {
                    self.digits.clear();
                    self.digits.push(b'1');
                    self.decimal_at += 1;
                } else {
                    self.digits.clear();
                }
                return Ok(());
            }
            self.round(self.decimal_at as i64 + max, mode, source)
        } else {
            self.round(maximum_digits.max(1) as i64, mode, source)
        }
    }

    /// Keep at most `maximum_digits` significant digits, rounding the rest
    /// away per `mode`. A negative bound never reaches here.
    fn round(
        &mut self,
        maximum_digits: i64,
        mode: RoundingMode,
        source: RoundSource,
    ) -> Result<(), ArithmeticError> {
        if maximum_digits >= self.digits.len() as i64 {
            return Ok(());
        }
        let cut = maximum_digits as usize;
        if self.should_round_up(cut, mode, source)? {
            let mut i = cut;
            loop {
                if i == 0 {
                    // 9s carried all the way out: 999 -> 1 with the point
                    // shifted one place left-to-right.
                    self.digits[0] = b'1';
                    self.digits.truncate(1);
                    self.decimal_at += 1;
                    return Ok(());
                }
                i -= 1;
                self.digits[i] += 1;
                if self.digits[i] <= b'9' {
                    self.digits.truncate(i + 1);
                    return Ok(());
                }
            }
        }
        self.digits.truncate(cut);
        self.strip_trailing_zeros();
        Ok(())
    }

    /// Decide the rounding direction for a cut at `cut` (all digits at and
    /// beyond `cut` are discarded).
    fn should_round_up(
        &self,
        cut: usize,
        mode: RoundingMode,
        source: RoundSource,
    ) -> Result<bool, ArithmeticError> {
        let dropped_nonzero = self.digits[cut..].iter().any(|&d| d != b'0');
        match mode {
            RoundingMode::Up => Ok(dropped_nonzero),
            RoundingMode::Down => Ok(false),
            RoundingMode::Ceiling => Ok(dropped_nonzero && !self.is_negative),
            RoundingMode::Floor => Ok(dropped_nonzero && self.is_negative),
            RoundingMode::Unnecessary => {
                if dropped_nonzero {
                    Err(ArithmeticError::RoundingNecessary)
                } else {
                    Ok(false)
                }
            }
            RoundingMode::HalfUp | RoundingMode::HalfDown | RoundingMode::HalfEven => {
                let first = self.digits[cut];
                if first > b'5' {
                    return Ok(true);
                }
                if first < b'5' {
                    return Ok(false);
                }
                if self.digits[cut + 1..].iter().any(|&d| d != b'0') {
                    return Ok(true);
                }
                // Apparent tie: the current digit sequence *is* the decimal
                // tie point. For doubles, consult the exact binary value.
                let at_tie = match source {
                    RoundSource::Exact => Ordering::Equal,
                    RoundSource::Float(value) => {
                        cmp_f64_magnitude_to_decimal(value, &self.digits, self.decimal_at)
                    }
                };
                match at_tie {
                    Ordering::Greater => Ok(true),
                    Ordering::Less => Ok(false),
                    Ordering::Equal => Ok(match mode {
                        RoundingMode::HalfUp => true,
                        RoundingMode::HalfDown => false,
                        _ => cut > 0 && (self.digits[cut - 1] - b'0') % 2 == 1,
                    }),
                }
            }
        }
    }

    /// Direction when every digit sits strictly below the cut (fraction
    /// underflow). The magnitude is below half of the least significant kept
    /// position, so the half modes land on zero; only the away-from-zero
    /// directed modes produce the smallest representable step.
    fn should_round_to_one(
        &self,
        mode: RoundingMode,
        _source: RoundSource,
    ) -> Result<bool, ArithmeticError> {
        Ok(match mode {
            RoundingMode::Up => true,
            RoundingMode::Ceiling => !self.is_negative,
            RoundingMode::Floor => self.is_negative,
            _ => false,
        })
    }

    fn strip_trailing_zeros(&mut self) {
        while let Some(&b'0') = self.digits.last() {
            self.digits.pop();
        }
    }

    fn strip_leading_zeros(&mut self) {
        let lead = self.digits.iter().take_while(|&&d| d == b'0').count();
        if lead > 0 {
            self.digits.drain(..lead);
            self.decimal_at -= lead as i32;
        }
    }

    /// Whether the value reconstructs losslessly as an i64. Signed zero only
    /// fits when the caller is willing to drop the sign.
    pub fn fits_into_long(&self, is_positive: bool, ignore_negative_zero: bool) -> bool {
        let count = self.digits.len();
        if count == 0 {
            return is_positive || ignore_negative_zero;
        }
        if self.decimal_at < count as i32 {
            return false;
        }
        if self.decimal_at > MAX_LONG_DIGITS as i32 {
            return false;
        }
        if (self.decimal_at as usize) < MAX_LONG_DIGITS {
            return true;
        }
        for (i, &d) in self.digits.iter().enumerate() {
            match d.cmp(&LONG_MIN_MAGNITUDE[i]) {
                Ordering::Less => return true,
                Ordering::Greater => return false,
                Ordering::Equal => {}
            }
        }
        if count < LONG_MIN_MAGNITUDE.len() {
            // Shorter digit run padded with zeros stays below the boundary.
            return true;
        }
        // Exactly the i64::MIN magnitude: representable only when negative.
        !is_positive
    }

    /// Reconstruct as i64. Caller must have checked `fits_into_long`.
    pub fn to_i64(&self) -> i64 {
        // Accumulate negated so the i64::MIN magnitude does not overflow.
        let mut value: i64 = 0;
        for &d in &self.digits {
            value = value * 10 - i64::from(d - b'0');
        }
        for _ in self.digits.len()..self.decimal_at.max(0) as usize {
            value *= 10;
        }
        if self.is_negative { value } else { -value }
    }

    /// Reconstruct as f64, correctly rounded.
    pub fn to_f64(&self) -> f64 {
        if self.digits.is_empty() {
            return if self.is_negative { -0.0 } else { 0.0 };
        }
        let mut rendered = String::with_capacity(self.digits.len() + 16);
        if self.is_negative {
            rendered.push('-');
        }
        rendered.push_str("0.");
        rendered.push_str(std::str::from_utf8(&self.digits).expect("digits are ASCII"));
        rendered.push('e');
        rendered.push_str(&self.decimal_at.to_string());
        rendered.parse().expect("digit buffer renders a valid float")
    }

    /// Reconstruct the integer part as a BigInt, truncating any fraction.
    pub fn to_bigint(&self) -> BigInt {
        if self.decimal_at <= 0 || self.digits.is_empty() {
            return BigInt::from(0);
        }
        let int_len = (self.decimal_at as usize).min(self.digits.len());
        let head = std::str::from_utf8(&self.digits[..int_len]).expect("digits are ASCII");
        let mut value: BigInt = head.parse().unwrap_or_else(|_| BigInt::from(0));
        let zeros = self.decimal_at as usize - int_len;
        if zeros > 0 {
            value *= pow10(zeros as u64);
        }
        if self.is_negative { -value } else { value }
    }

    /// Reconstruct as an exact BigDecimal.
    pub fn to_big_decimal(&self) -> BigDecimal {
        BigDecimal::from_digits(self.is_negative, &self.digits, self.decimal_at)
    }
}

/// Exact comparison of a positive binary magnitude against the decimal value
/// `digits * 10^(decimal_at - len)`. Cross-multiplies with BigInt so the
/// answer is exact; used only at apparent rounding ties.
fn cmp_f64_magnitude_to_decimal(value: f64, digits: &[u8], decimal_at: i32) -> Ordering {
    let bits = value.to_bits();
    let exp_bits = ((bits >> 52) & 0x7ff) as i32;
    let frac = bits & 0x000f_ffff_ffff_ffff;
    let (mantissa, exp2) = if exp_bits == 0 {
        (frac, -1074)
    } else {
        (frac | (1u64 << 52), exp_bits - 1075)
    };

    let mut lhs = BigInt::from(mantissa);
    let mut rhs: BigInt = std::str::from_utf8(digits)
        .expect("digits are ASCII")
        .parse()
        .expect("digit buffer parses as an integer");

    if exp2 >= 0 {
        lhs <<= exp2 as usize;
    } else {
        rhs <<= (-exp2) as usize;
    }
    let exp10 = i64::from(decimal_at) - digits.len() as i64;
    if exp10 >= 0 {
        rhs *= pow10(exp10 as u64);
    } else {
        lhs *= pow10((-exp10) as u64);
    }
    lhs.cmp(&rhs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits_of(list: &DigitList) -> &str {
        std::str::from_utf8(&list.digits).unwrap()
    }

    #[test]
    fn int_extraction_strips_trailing_zeros() {
        let mut list = DigitList::new();
        list.set_int(false, 1_230_000, None, RoundingMode::HalfEven)
            .unwrap();
        assert_eq!(digits_of(&list), "123");
        assert_eq!(list.decimal_at, 7);
    }

    #[test]
    fn double_tie_uses_exact_binary_value() {
        // 0.125 is exactly representable: a true tie, resolved to even.
        let mut list = DigitList::new();
        list.set_float(false, 0.125, 2, true, RoundingMode::HalfEven)
            .unwrap();
        assert_eq!(digits_of(&list), "12");

        // 0.135 is slightly above its decimal rendering's tie point.
        let mut list = DigitList::new();
        list.set_float(false, 0.135, 2, true, RoundingMode::HalfEven)
            .unwrap();
        assert_eq!(digits_of(&list), "14");

        // 0.15 as a double sits just below 0.15.
        let mut list = DigitList::new();
        list.set_float(false, 0.15, 1, true, RoundingMode::HalfUp)
            .unwrap();
        assert_eq!(digits_of(&list), "1");
    }

    #[test]
    fn carry_propagates_through_nines() {
        let mut list = DigitList::new();
        list.set_float(false, 9.99, 1, true, RoundingMode::HalfEven)
            .unwrap();
        assert_eq!(digits_of(&list), "1");
        assert_eq!(list.decimal_at, 2);
    }

    #[test]
    fn fraction_underflow_rounds_to_zero_or_step() {
        let mut list = DigitList::new();
        list.set_float(false, 0.0004, 2, true, RoundingMode::HalfEven)
            .unwrap();
        assert!(list.is_zero());

        let mut list = DigitList::new();
        list.set_float(false, 0.0009, 3, true, RoundingMode::HalfEven)
            .unwrap();
        assert_eq!(digits_of(&list), "1");
        assert_eq!(list.decimal_at, -2);
    }

    #[test]
    fn unnecessary_mode_rejects_inexact_cuts() {
        let mut list = DigitList::new();
        let err = list.set_float(false, 1.234, 2, true, RoundingMode::Unnecessary);
        assert_eq!(err, Err(ArithmeticError::RoundingNecessary));

        let mut list = DigitList::new();
        list.set_float(false, 1.25, 2, true, RoundingMode::Unnecessary)
            .unwrap();
        assert_eq!(digits_of(&list), "125");
    }

    #[test]
    fn long_boundary_detection() {
        let mut list = DigitList::new();
        list.set_int(true, i64::MIN.unsigned_abs(), None, RoundingMode::HalfEven)
            .unwrap();
        assert!(list.fits_into_long(false, false));
        assert!(!list.fits_into_long(true, false));
        assert_eq!(list.to_i64(), i64::MIN);

        let mut list = DigitList::new();
        list.set_int(false, i64::MAX as u64, None, RoundingMode::HalfEven)
            .unwrap();
        assert!(list.fits_into_long(true, false));
        assert_eq!(list.to_i64(), i64::MAX);
    }

    #[test]
    fn round_trip_through_f64() {
        for &v in &[0.1, 123.456, 1e-300, 9.999999999999999e15] {
            let mut list = DigitList::new();
            list.set_float(false, v, 340, true, RoundingMode::HalfEven)
                .unwrap();
            assert_eq!(list.to_f64(), v);
        }
    }

    #[test]
    fn signed_zero_reconstructs() {
        let mut list = DigitList::new();
        list.set_float(true, -0.0, 2, true, RoundingMode::HalfEven)
            .unwrap();
        assert!(list.is_zero());
        assert!(list.to_f64().is_sign_negative());
    }
}
