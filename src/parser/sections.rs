//! Subpattern assembly: token stream to `CompiledPattern`.
//!
//! Each subpattern is scanned left to right through three phases — prefix,
//! numeric body, suffix. The body phase counts digit placeholders on either
//! side of the decimal separator and tracks the grouping run; affix phases
//! accumulate `AffixPart`s which are expanded against the symbol table once
//! the scan succeeds.

use crate::locale::DecimalSymbols;
use crate::types::{
    AffixPart, CompiledPattern, MalformedPatternError, PatternErrorKind, PatternToken,
    UNBOUNDED_INTEGER_DIGITS,
};

/// Raw counts collected from one subpattern.
#[derive(Debug, Default)]
struct SubpatternScan {
    prefix: Vec<AffixPart>,
    suffix: Vec<AffixPart>,
    digit_left_count: u32,
    zero_digit_count: u32,
    digit_right_count: u32,
    /// Digit position of the decimal separator, -1 when absent.
    decimal_pos: i64,
    /// Digits since the last grouping separator, -1 when grouping unused.
    grouping_count: i64,
    multiplier: i32,
    use_exponential: bool,
    min_exponent_digits: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Prefix,
    Body,
    Suffix,
}

fn push_literal(parts: &mut Vec<AffixPart>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(AffixPart::Literal(prev)) = parts.last_mut() {
        prev.push_str(text);
    } else {
        parts.push(AffixPart::Literal(text.to_string()));
    }
}

fn scan_subpattern(
    pattern: &str,
    tokens: &[PatternToken],
) -> Result<SubpatternScan, MalformedPatternError> {
    let err = |kind| Err(MalformedPatternError::new(pattern, kind));

    let mut scan = SubpatternScan {
        decimal_pos: -1,
        grouping_count: -1,
        multiplier: 1,
        ..SubpatternScan::default()
    };
    let mut phase = Phase::Prefix;

    let mut index = 0;
    while index < tokens.len() {
        let token = &tokens[index];
        let body_token = matches!(
            token,
            PatternToken::ZeroDigit
                | PatternToken::Digit
                | PatternToken::GroupingSeparator
                | PatternToken::DecimalSeparator
                | PatternToken::Exponent { .. }
        );

        match phase {
            // An exponent marker ahead of any digit is not a body opener;
            // it reads as a literal `E` (handled below).
            Phase::Prefix if body_token && !matches!(token, PatternToken::Exponent { .. }) => {
                // Reprocess this token as the start of the numeric body.
                phase = Phase::Body;
                continue;
            }
            Phase::Body if !body_token => {
                // Reprocess as the start of the suffix.
                phase = Phase::Suffix;
                continue;
            }
            _ => {}
        }

        let affix = match phase {
            Phase::Prefix => &mut scan.prefix,
            Phase::Suffix => &mut scan.suffix,
            Phase::Body => {
                match token {
                    PatternToken::ZeroDigit => {
                        if scan.digit_right_count > 0 {
                            return err(PatternErrorKind::MisorderedDigits);
                        }
                        scan.zero_digit_count += 1;
                        if scan.grouping_count >= 0 && scan.decimal_pos < 0 {
                            scan.grouping_count += 1;
                        }
                    }
                    PatternToken::Digit => {
                        if scan.zero_digit_count > 0 {
                            scan.digit_right_count += 1;
                        } else {
                            scan.digit_left_count += 1;
                        }
                        if scan.grouping_count >= 0 && scan.decimal_pos < 0 {
                            scan.grouping_count += 1;
                        }
                    }
                    PatternToken::GroupingSeparator => {
                        if scan.decimal_pos >= 0 {
                            return err(PatternErrorKind::GroupingAfterDecimal);
                        }
                        scan.grouping_count = 0;
                    }
                    PatternToken::DecimalSeparator => {
                        if scan.decimal_pos >= 0 {
                            return err(PatternErrorKind::MultipleDecimalSeparators);
                        }
                        scan.decimal_pos = i64::from(
                            scan.digit_left_count + scan.zero_digit_count + scan.digit_right_count,
                        );
                    }
                    PatternToken::Exponent { min_digits } => {
                        if scan.use_exponential {
                            return err(PatternErrorKind::MultipleExponents);
                        }
                        scan.use_exponential = true;
                        scan.min_exponent_digits = *min_digits;
                        // The exponent marker terminates the numeric body.
                        phase = Phase::Suffix;
                    }
                    _ => unreachable!("body phase only sees body tokens"),
                }
                index += 1;
                continue;
            }
        };

        match token {
            PatternToken::Quoted(text) => push_literal(affix, text),
            PatternToken::Literal(c) => push_literal(affix, &c.to_string()),
            PatternToken::MinusSign => affix.push(AffixPart::MinusSign),
            PatternToken::Percent => {
                if scan.multiplier != 1 {
                    return err(PatternErrorKind::MultipleMultiplierSymbols);
                }
                scan.multiplier = 100;
                affix.push(AffixPart::Percent);
            }
            PatternToken::PerMille => {
                if scan.multiplier != 1 {
                    return err(PatternErrorKind::MultipleMultiplierSymbols);
                }
                scan.multiplier = 1000;
                affix.push(AffixPart::PerMille);
            }
            PatternToken::CurrencySymbol => affix.push(AffixPart::CurrencySymbol),
            PatternToken::CurrencyCode => affix.push(AffixPart::CurrencyCode),
            PatternToken::Exponent { min_digits } if phase == Phase::Prefix => {
                // A bare `E` ahead of digits is a literal prefix character;
                // its zero digits open the numeric body.
                push_literal(affix, "E");
                scan.zero_digit_count += u32::from(*min_digits);
                phase = Phase::Body;
            }
            PatternToken::ZeroDigit
            | PatternToken::Digit
            | PatternToken::GroupingSeparator
            | PatternToken::DecimalSeparator
            | PatternToken::Exponent { .. } => {
                // Only reachable in the suffix phase.
                let c = match token {
                    PatternToken::ZeroDigit | PatternToken::Exponent { .. } => '0',
                    PatternToken::Digit => '#',
                    PatternToken::GroupingSeparator => ',',
                    _ => '.',
                };
                return err(PatternErrorKind::UnquotedSpecialCharacter(c));
            }
            PatternToken::SubpatternBoundary => {
                unreachable!("subpatterns are split before scanning")
            }
        }
        index += 1;
    }

    // Patterns without any zero digit, e.g. "#.#", imply one minimum
    // integer digit: reinterpret "##.###" as "#0.###".
    if scan.zero_digit_count == 0 && scan.digit_left_count > 0 && scan.decimal_pos >= 0 {
        let mut n = scan.decimal_pos;
        if n == 0 {
            n = 1;
        }
        scan.digit_right_count = scan.digit_left_count - n as u32;
        scan.digit_left_count = n as u32 - 1;
        scan.zero_digit_count = 1;
    }

    // Structural validation.
    if scan.decimal_pos < 0 && scan.digit_right_count > 0 {
        return err(PatternErrorKind::MisorderedDigits);
    }
    let left_and_zero = i64::from(scan.digit_left_count + scan.zero_digit_count);
    if scan.decimal_pos >= 0
        && (scan.decimal_pos < i64::from(scan.digit_left_count) || scan.decimal_pos > left_and_zero)
    {
        return err(PatternErrorKind::MisorderedDigits);
    }
    if scan.grouping_count == 0 {
        return err(PatternErrorKind::GroupingWithoutDigit);
    }
    if scan.use_exponential && scan.digit_left_count + scan.zero_digit_count == 0 {
        return err(PatternErrorKind::MalformedExponent);
    }

    Ok(scan)
}

/// Expand an affix-part sequence against a symbol table.
pub fn expand_affix(parts: &[AffixPart], symbols: &DecimalSymbols) -> String {
    let mut out = String::new();
    for part in parts {
        match part {
            AffixPart::Literal(text) => out.push_str(text),
            AffixPart::MinusSign => out.push(symbols.minus_sign),
            AffixPart::Percent => out.push(symbols.percent),
            AffixPart::PerMille => out.push(symbols.per_mille),
            AffixPart::CurrencySymbol => out.push_str(&symbols.currency_symbol),
            AffixPart::CurrencyCode => out.push_str(&symbols.international_currency_symbol),
        }
    }
    out
}

/// Assemble a compiled pattern from the token stream of a full pattern
/// (`positive[;negative]`).
pub fn compile_tokens(
    pattern: &str,
    tokens: &[PatternToken],
    symbols: &DecimalSymbols,
) -> Result<CompiledPattern, MalformedPatternError> {
    let mut parts = tokens.split(|t| *t == PatternToken::SubpatternBoundary);
    let positive_tokens = parts.next().unwrap_or_default();
    let negative_tokens = parts.next();
    if parts.next().is_some() {
        return Err(MalformedPatternError::new(
            pattern,
            PatternErrorKind::TooManySubpatterns,
        ));
    }

    let positive = scan_subpattern(pattern, positive_tokens)?;
    let negative = negative_tokens
        .map(|tokens| scan_subpattern(pattern, tokens))
        .transpose()?;

    let digit_total = positive.digit_left_count + positive.zero_digit_count
        + positive.digit_right_count;
    let effective_decimal = if positive.decimal_pos >= 0 {
        positive.decimal_pos
    } else {
        i64::from(digit_total)
    };
    let min_integer_digits = (effective_decimal - i64::from(positive.digit_left_count)) as u32;
    let max_integer_digits = if positive.use_exponential {
        positive.digit_left_count + min_integer_digits
    } else {
        UNBOUNDED_INTEGER_DIGITS
    };
    let (min_fraction_digits, max_fraction_digits) = if positive.decimal_pos >= 0 {
        (
            (i64::from(positive.digit_left_count + positive.zero_digit_count)
                - positive.decimal_pos) as u32,
            (i64::from(digit_total) - positive.decimal_pos) as u32,
        )
    } else {
        (0, 0)
    };
    let decimal_separator_always_shown =
        positive.decimal_pos >= 0 && positive.decimal_pos == i64::from(digit_total);
    let grouping_size = if positive.grouping_count > 0 {
        positive.grouping_count.min(127) as u8
    } else {
        0
    };

    let positive_prefix_parts = positive.prefix;
    let positive_suffix_parts = positive.suffix;

    // The single negative-affix derivation rule: no explicit negative
    // subpattern, or one whose affixes match the positive subpattern's,
    // yields "-" prepended to the positive prefix.
    let (negative_prefix_parts, negative_suffix_parts, has_negative_subpattern) = match negative {
        Some(scan)
            if scan.prefix != positive_prefix_parts || scan.suffix != positive_suffix_parts =>
        {
            (scan.prefix, scan.suffix, true)
        }
        _ => {
            let mut derived = Vec::with_capacity(positive_prefix_parts.len() + 1);
            derived.push(AffixPart::MinusSign);
            derived.extend(positive_prefix_parts.iter().cloned());
            (derived, positive_suffix_parts.clone(), false)
        }
    };

    Ok(CompiledPattern {
        positive_prefix: expand_affix(&positive_prefix_parts, symbols),
        positive_suffix: expand_affix(&positive_suffix_parts, symbols),
        negative_prefix: expand_affix(&negative_prefix_parts, symbols),
        negative_suffix: expand_affix(&negative_suffix_parts, symbols),
        positive_prefix_parts,
        positive_suffix_parts,
        negative_prefix_parts,
        negative_suffix_parts,
        min_integer_digits,
        max_integer_digits,
        min_fraction_digits,
        max_fraction_digits,
        grouping_size,
        multiplier: positive.multiplier,
        use_exponential_notation: positive.use_exponential,
        min_exponent_digits: positive.min_exponent_digits,
        decimal_separator_always_shown,
        has_negative_subpattern,
    })
}
