//! Regenerate a pattern string from a compiled pattern.
//!
//! The output is normalized rather than verbatim: digit placeholders are
//! re-derived from the digit bounds and the grouping size, and affixes are
//! re-emitted from their structural parts with quoting added only where a
//! literal would otherwise read as pattern syntax.

use crate::locale::DecimalSymbols;
use crate::types::{AffixPart, CompiledPattern};

/// Characters that carry meaning in the unlocalized pattern grammar.
const PATTERN_SPECIALS: &[char] = &['0', '#', '.', ',', ';', '%', '‰', 'E', '-', '¤', '\''];

fn is_special(c: char, symbols: &DecimalSymbols, localized: bool) -> bool {
    if !localized {
        return PATTERN_SPECIALS.contains(&c);
    }
    c == '#'
        || c == ';'
        || c == '¤'
        || c == '\''
        || c == symbols.decimal_separator
        || c == symbols.grouping_separator
        || c == symbols.percent
        || c == symbols.per_mille
        || c == symbols.minus_sign
        || symbols.exponent_separator.contains(c)
        || (c as u32).wrapping_sub(symbols.zero_digit as u32) < 10
}

fn append_literal(out: &mut String, text: &str, symbols: &DecimalSymbols, localized: bool) {
    if text.chars().any(|c| is_special(c, symbols, localized)) {
        out.push('\'');
        for c in text.chars() {
            if c == '\'' {
                out.push('\'');
            }
            out.push(c);
        }
        out.push('\'');
    } else {
        out.push_str(text);
    }
}

fn append_affix(
    out: &mut String,
    parts: &[AffixPart],
    symbols: &DecimalSymbols,
    localized: bool,
) {
    for part in parts {
        match part {
            AffixPart::Literal(text) => append_literal(out, text, symbols, localized),
            AffixPart::MinusSign => out.push(if localized { symbols.minus_sign } else { '-' }),
            AffixPart::Percent => out.push(if localized { symbols.percent } else { '%' }),
            AffixPart::PerMille => out.push(if localized { symbols.per_mille } else { '‰' }),
            AffixPart::CurrencySymbol => out.push('¤'),
            AffixPart::CurrencyCode => out.push_str("¤¤"),
        }
    }
}

fn append_body(out: &mut String, pattern: &CompiledPattern, symbols: &DecimalSymbols, localized: bool) {
    let zero = if localized { symbols.zero_digit } else { '0' };
    let decimal = if localized {
        symbols.decimal_separator
    } else {
        '.'
    };
    let group = if localized {
        symbols.grouping_separator
    } else {
        ','
    };

    let digit_count = if pattern.use_exponential_notation {
        pattern.max_integer_digits
    } else {
        u32::from(pattern.grouping_size).max(pattern.min_integer_digits) + 1
    };
    let mut i = digit_count;
    while i > 0 {
        if i != digit_count
            && pattern.grouping_used()
            && i % u32::from(pattern.grouping_size) == 0
        {
            out.push(group);
        }
        out.push(if i <= pattern.min_integer_digits {
            zero
        } else {
            '#'
        });
        i -= 1;
    }

    if pattern.max_fraction_digits > 0 || pattern.decimal_separator_always_shown {
        out.push(decimal);
    }
    for i in 0..pattern.max_fraction_digits {
        out.push(if i < pattern.min_fraction_digits {
            zero
        } else {
            '#'
        });
    }

    if pattern.use_exponential_notation {
        if localized {
            out.push_str(&symbols.exponent_separator);
        } else {
            out.push('E');
        }
        for _ in 0..pattern.min_exponent_digits {
            out.push(zero);
        }
    }
}

/// Render a compiled pattern back to a pattern string. With `localized` set,
/// structural characters and affix symbols use the locale glyphs.
pub fn to_pattern(pattern: &CompiledPattern, symbols: &DecimalSymbols, localized: bool) -> String {
    let mut out = String::new();
    append_affix(&mut out, &pattern.positive_prefix_parts, symbols, localized);
    append_body(&mut out, pattern, symbols, localized);
    append_affix(&mut out, &pattern.positive_suffix_parts, symbols, localized);

    if pattern.has_negative_subpattern {
        out.push(';');
        append_affix(&mut out, &pattern.negative_prefix_parts, symbols, localized);
        append_body(&mut out, pattern, symbols, localized);
        append_affix(&mut out, &pattern.negative_suffix_parts, symbols, localized);
    }
    out
}
