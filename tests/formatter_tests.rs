use decimal_format::{DecimalFormat, Field, Number};
use num_bigint::BigInt;

fn fmt(pattern: &str, value: f64) -> String {
    DecimalFormat::with_locale(pattern, "en_US")
        .unwrap()
        .format(value)
        .unwrap()
}

#[test]
fn basic_grouping_and_fractions() {
    assert_eq!(fmt("#,##0.##", 1234.5), "1,234.5");
    assert_eq!(fmt("#,##0.##", 1234567.891), "1,234,567.89");
    assert_eq!(fmt("#,##0.##", -1234.5), "-1,234.5");
    assert_eq!(fmt("#,##0.##", 0.0), "0");
}

#[test]
fn minimum_digits_pad_with_zeros() {
    assert_eq!(fmt("000.000", 12.3), "012.300");
    assert_eq!(fmt("0,000", 5.0), "0,005");
}

#[test]
fn implied_integer_zero() {
    assert_eq!(fmt("#.##", 0.25), "0.25");
    assert_eq!(fmt("#.##", 0.03), "0.03");
    assert_eq!(fmt("#", 0.0), "0");
    assert_eq!(fmt("#.##", 0.0), "0");
}

#[test]
fn trailing_decimal_separator() {
    assert_eq!(fmt("0.", 5.0), "5.");
}

#[test]
fn percent_and_per_mille_scale_on_output() {
    assert_eq!(fmt("#%", 0.25), "25%");
    assert_eq!(fmt("#.##%", 0.1234), "12.34%");
    assert_eq!(fmt("#\u{2030}", 0.25), "250\u{2030}");
}

#[test]
fn currency_affixes() {
    assert_eq!(fmt("\u{a4}#,##0.00", 1234.5), "$1,234.50");
    assert_eq!(fmt("\u{a4}\u{a4}#,##0.00", 1234.5), "USD1,234.50");
}

#[test]
fn negative_subpattern_affixes() {
    assert_eq!(fmt("#,##0.00;(#,##0.00)", -1234.5), "(1,234.50)");
    assert_eq!(fmt("#,##0.00;(#,##0.00)", 1234.5), "1,234.50");
}

#[test]
fn signed_zero_takes_negative_affixes() {
    assert_eq!(fmt("0.#", -0.0), "-0");
    assert_eq!(fmt("0.00;(0.00)", -0.0), "(0.00)");
}

#[test]
fn special_values() {
    let mut df = DecimalFormat::with_locale("\u{a4}0.00", "en_US").unwrap();
    // NaN carries no affixes at all.
    assert_eq!(df.format(f64::NAN).unwrap(), "NaN");
    assert_eq!(df.format(f64::INFINITY).unwrap(), "$\u{221e}");
    assert_eq!(df.format(f64::NEG_INFINITY).unwrap(), "-$\u{221e}");
}

#[test]
fn localized_symbols() {
    let mut df = DecimalFormat::with_locale("#,##0.00", "de_DE").unwrap();
    assert_eq!(df.format(1234.5).unwrap(), "1.234,50");

    let mut df = DecimalFormat::with_locale("#,##0.##", "ar_EG").unwrap();
    assert_eq!(
        df.format(1234.5).unwrap(),
        "\u{661}\u{66c}\u{662}\u{663}\u{664}\u{66b}\u{665}"
    );
}

#[test]
fn integer_sources_never_grow_fractions() {
    let mut df = DecimalFormat::with_locale("0.##", "en_US").unwrap();
    assert_eq!(df.format(42i64).unwrap(), "42");
    assert_eq!(df.format(42.0).unwrap(), "42");
    assert_eq!(df.format(-7i64).unwrap(), "-7");
}

#[test]
fn maximum_integer_digits_truncate_on_the_left() {
    let mut df = DecimalFormat::with_locale("0", "en_US").unwrap();
    df.set_maximum_integer_digits(2);
    assert_eq!(df.format(1993i64).unwrap(), "93");
}

#[test]
fn big_integers_format_exactly() {
    let mut df = DecimalFormat::with_locale("#,##0", "en_US").unwrap();
    let huge: BigInt = "123456789012345678901234567890".parse().unwrap();
    assert_eq!(
        df.format(huge).unwrap(),
        "123,456,789,012,345,678,901,234,567,890"
    );
}

#[test]
fn int_multiplier_overflow_widens() {
    let mut df = DecimalFormat::with_locale("#,##0", "en_US").unwrap();
    df.set_multiplier(100).unwrap();
    let via_int = df.format(i64::MAX).unwrap();

    let mut plain = DecimalFormat::with_locale("#,##0", "en_US").unwrap();
    let widened = BigInt::from(i64::MAX) * BigInt::from(100);
    assert_eq!(via_int, plain.format(widened).unwrap());
}

#[test]
fn fast_path_matches_general_path() {
    let mut df = DecimalFormat::with_locale("#,##0.##", "en_US").unwrap();
    for &v in &[
        0.0, -0.0, 0.005, 0.125, 1.005, 12.345, 1234.565, 999999.995, 5432.1, -1234.565,
        8_999_999_999_999.99,
    ] {
        let fast = df.format(v).unwrap();
        let general = df.format_with_spans(v).unwrap().text;
        assert_eq!(fast, general, "divergence for {v}");
    }

    let mut df = DecimalFormat::with_locale("\u{a4}#,##0.00", "en_US").unwrap();
    for &v in &[0.0, 2.675, 1234.565, -9.995, 0.004] {
        let fast = df.format(v).unwrap();
        let general = df.format_with_spans(v).unwrap().text;
        assert_eq!(fast, general, "divergence for {v}");
    }
}

#[test]
fn field_spans_cover_the_output() {
    let mut df = DecimalFormat::with_locale("\u{a4}#,##0.00", "en_US").unwrap();
    let formatted = df.format_with_spans(1234.5).unwrap();
    assert_eq!(formatted.text, "$1,234.50");

    let prefix = formatted.span(Field::Prefix).unwrap();
    assert_eq!(&formatted.text[prefix.range.clone()], "$");
    let grouping = formatted.span(Field::GroupingSeparator).unwrap();
    assert_eq!(&formatted.text[grouping.range.clone()], ",");
    let decimal = formatted.span(Field::DecimalSeparator).unwrap();
    assert_eq!(&formatted.text[decimal.range.clone()], ".");
    let fraction = formatted.span(Field::Fraction).unwrap();
    assert_eq!(&formatted.text[fraction.range.clone()], "50");
}

#[test]
fn exponential_notation() {
    assert_eq!(fmt("0.###E0", 1234.5), "1.234E3");
    assert_eq!(fmt("0.###E0", 0.00123), "1.23E-3");
    assert_eq!(fmt("0.###E0", 0.0), "0E0");
    assert_eq!(fmt("0.0E0", 0.0), "0.0E0");
    assert_eq!(fmt("0.###E00", 1234.5), "1.234E03");
    assert_eq!(fmt("00.00E0", 12345.0), "12.34E3");
}

#[test]
fn engineering_notation_pins_the_exponent() {
    // Max integer digits beyond the minimum define the repeat interval.
    assert_eq!(fmt("##0.##E0", 12345.0), "12.3E3");
    assert_eq!(fmt("##0.##E0", 123456.0), "123E3");
}

#[test]
fn number_equality_distinguishes_zero_signs() {
    assert_eq!(Number::Float(1.5), Number::Float(1.5));
    assert_ne!(Number::Float(0.0), Number::Float(-0.0));
    assert_ne!(Number::Int(1), Number::Float(1.0));
}
