//! Minimal arbitrary-precision decimal.
//!
//! A value is `unscaled * 10^-scale`. Only the operations the digit engine
//! needs are provided: construction from digit buffers, exact scaling by
//! powers of ten, integer multiplication, ordering and string conversion.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_bigint::{BigInt, Sign};

/// 10^n as a `BigInt`. Exponents here are bounded by digit counts, so a
/// simple square-and-multiply is plenty.
pub fn pow10(n: u64) -> BigInt {
    let mut result = BigInt::from(1);
    let mut base = BigInt::from(10);
    let mut exp = n;
    while exp > 0 {
        if exp & 1 == 1 {
            result = &result * &base;
        }
        exp >>= 1;
        if exp > 0 {
            base = &base * &base;
        }
    }
    result
}

/// Arbitrary-precision decimal: `unscaled * 10^-scale`.
#[derive(Debug, Clone)]
pub struct BigDecimal {
    unscaled: BigInt,
    scale: i64,
}

impl BigDecimal {
    pub fn new(unscaled: BigInt, scale: i64) -> Self {
        BigDecimal { unscaled, scale }
    }

    pub fn zero() -> Self {
        BigDecimal {
            unscaled: BigInt::from(0),
            scale: 0,
        }
    }

    pub fn from_bigint(value: BigInt) -> Self {
        BigDecimal {
            unscaled: value,
            scale: 0,
        }
    }

    /// Build from an ASCII digit buffer with a decimal-point offset relative
    /// to the first digit.
    pub fn from_digits(negative: bool, digits: &[u8], decimal_at: i32) -> Self {
        if digits.is_empty() {
            return BigDecimal::zero();
        }
        let s = std::str::from_utf8(digits).expect("digit buffer is ASCII");
        let mut unscaled = BigInt::from_str(s).expect("digit buffer parses as an integer");
        if negative {
            unscaled = -unscaled;
        }
        BigDecimal {
            unscaled,
            scale: digits.len() as i64 - decimal_at as i64,
        }
    }

    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    pub fn scale(&self) -> i64 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.unscaled.sign() == Sign::NoSign
    }

    pub fn is_negative(&self) -> bool {
        self.unscaled.sign() == Sign::Minus
    }

    /// Exact multiplication by a machine integer.
    pub fn mul_int(&self, factor: i64) -> Self {
        BigDecimal {
            unscaled: &self.unscaled * BigInt::from(factor),
            scale: self.scale,
        }
    }

    /// Exact multiplication by `10^k` (negative `k` divides).
    pub fn shift_pow10(&self, k: i64) -> Self {
        BigDecimal {
            unscaled: self.unscaled.clone(),
            scale: self.scale - k,
        }
    }

    /// Magnitude digits without sign or point, plus the decimal-point offset
    /// relative to the first digit. Zero yields `("0", 1)`.
    pub fn magnitude_digits(&self) -> (String, i32) {
        let digits = self.unscaled.magnitude().to_string();
        let decimal_at = digits.len() as i64 - self.scale;
        (digits, decimal_at as i32)
    }

    /// Nearest f64, via the correctly-rounded decimal string conversion.
    pub fn to_f64(&self) -> f64 {
        format!("{}e{}", self.unscaled, -self.scale)
            .parse::<f64>()
            .unwrap_or(f64::NAN)
    }

    /// The integer part, truncated toward zero.
    pub fn truncated(&self) -> BigInt {
        if self.scale <= 0 {
            &self.unscaled * pow10((-self.scale) as u64)
        } else {
            &self.unscaled / pow10(self.scale as u64)
        }
    }

    fn cmp_parts(&self, other: &Self) -> Ordering {
        // Align scales without normalizing either operand.
        if self.scale == other.scale {
            return self.unscaled.cmp(&other.unscaled);
        }
        let max_scale = self.scale.max(other.scale);
        let lhs = &self.unscaled * pow10((max_scale - self.scale) as u64);
        let rhs = &other.unscaled * pow10((max_scale - other.scale) as u64);
        lhs.cmp(&rhs)
    }
}

impl PartialEq for BigDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_parts(other) == Ordering::Equal
    }
}

impl Eq for BigDecimal {}

impl PartialOrd for BigDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_parts(other)
    }
}

impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.unscaled.magnitude().to_string();
        let sign = if self.is_negative() { "-" } else { "" };
        if self.scale <= 0 {
            let zeros = "0".repeat((-self.scale) as usize);
            return write!(f, "{sign}{digits}{zeros}");
        }
        let scale = self.scale as usize;
        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{sign}{int_part}.{frac_part}")
        } else {
            let zeros = "0".repeat(scale - digits.len());
            write!(f, "{sign}0.{zeros}{digits}")
        }
    }
}

/// Parse error for [`BigDecimal::from_str`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigDecimalParseError;

impl fmt::Display for BigDecimalParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid decimal literal")
    }
}

impl std::error::Error for BigDecimalParseError {}

impl FromStr for BigDecimal {
    type Err = BigDecimalParseError;

    /// Accepts `[-]digits[.digits][e[+-]digits]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (body, exp) = match s.find(['e', 'E']) {
            Some(i) => {
                let exp = s[i + 1..]
                    .parse::<i64>()
                    .map_err(|_| BigDecimalParseError)?;
                (&s[..i], exp)
            }
            None => (s, 0),
        };
        let (int_part, frac_part) = match body.find('.') {
            Some(i) => (&body[..i], &body[i + 1..]),
            None => (body, ""),
        };
        if frac_part.chars().any(|c| !c.is_ascii_digit()) {
            return Err(BigDecimalParseError);
        }
        let joined = format!("{int_part}{frac_part}");
        let unscaled = BigInt::from_str(&joined).map_err(|_| BigDecimalParseError)?;
        Ok(BigDecimal {
            unscaled,
            scale: frac_part.len() as i64 - exp,
        })
    }
}
