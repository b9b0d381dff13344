use decimal_format::bigdec::BigDecimal;
use decimal_format::{DecimalFormat, Number};

fn parser(pattern: &str) -> DecimalFormat {
    DecimalFormat::with_locale(pattern, "en_US").unwrap()
}

#[test]
fn narrowest_representation_wins() {
    let mut df = parser("#,##0.##");
    assert_eq!(df.parse("1234").unwrap(), Number::Int(1234));
    assert_eq!(df.parse("1,234.5").unwrap(), Number::Float(1234.5));
    assert_eq!(df.parse("-17").unwrap(), Number::Int(-17));
}

#[test]
fn i64_boundary() {
    let mut df = parser("0");
    assert_eq!(
        df.parse("9223372036854775807").unwrap(),
        Number::Int(i64::MAX)
    );
    assert_eq!(
        df.parse("-9223372036854775808").unwrap(),
        Number::Int(i64::MIN)
    );
    // One past the positive boundary no longer fits.
    assert_eq!(
        df.parse("9223372036854775808").unwrap(),
        Number::Float(9.223372036854776e18)
    );
}

#[test]
fn lenient_grouping_and_leading_zeros() {
    let mut df = parser("#,##0.##");
    assert_eq!(df.parse("12,34").unwrap(), Number::Int(1234));
    assert_eq!(df.parse("007").unwrap(), Number::Int(7));
    assert_eq!(df.parse("0.5").unwrap(), Number::Float(0.5));
    assert_eq!(df.parse(".5").unwrap(), Number::Float(0.5));
}

#[test]
fn unconsumed_grouping_separator_is_left_over() {
    let mut df = parser("#,##0.##");
    let (value, consumed) = df.parse_with_position("12, apples").unwrap();
    assert_eq!(value, Number::Int(12));
    assert_eq!(consumed, 2);
}

#[test]
fn trailing_text_is_ignored() {
    let mut df = parser("0.##");
    let (value, consumed) = df.parse_with_position("12 apples").unwrap();
    assert_eq!(value, Number::Int(12));
    assert_eq!(consumed, 2);
}

#[test]
fn negative_subpattern_affixes_round_trip() {
    let mut df = parser("#,##0.00;(#,##0.00)");
    assert_eq!(df.parse("(1,234.50)").unwrap(), Number::Float(-1234.5));
    assert_eq!(df.parse("1,234.50").unwrap(), Number::Float(1234.5));
}

#[test]
fn multiplier_is_undone() {
    let mut df = parser("#%");
    assert_eq!(df.parse("25%").unwrap(), Number::Float(0.25));

    let mut df = parser("#\u{2030}");
    assert_eq!(df.parse("250\u{2030}").unwrap(), Number::Float(0.25));
}

#[test]
fn special_values_parse() {
    let mut df = parser("0.##");
    match df.parse("NaN").unwrap() {
        Number::Float(v) => assert!(v.is_nan()),
        other => panic!("expected NaN, got {other:?}"),
    }
    assert_eq!(df.parse("\u{221e}").unwrap(), Number::Float(f64::INFINITY));
    assert_eq!(
        df.parse("-\u{221e}").unwrap(),
        Number::Float(f64::NEG_INFINITY)
    );
}

#[test]
fn exponents_shift_the_scale() {
    let mut df = parser("0.###E0");
    assert_eq!(df.parse("1.23E4").unwrap(), Number::Int(12300));
    assert_eq!(df.parse("1.23E-2").unwrap(), Number::Float(0.0123));
    assert_eq!(df.parse("5E0").unwrap(), Number::Int(5));
}

#[test]
fn integer_only_stops_at_the_decimal() {
    let mut df = parser("0.##");
    df.set_parse_integer_only(true);
    let (value, consumed) = df.parse_with_position("3.14").unwrap();
    assert_eq!(value, Number::Int(3));
    assert_eq!(consumed, 1);
}

#[test]
fn signed_zero_survives_parsing() {
    let mut df = parser("0.##");
    match df.parse("-0").unwrap() {
        Number::Float(v) => {
            assert_eq!(v, 0.0);
            assert!(v.is_sign_negative());
        }
        other => panic!("expected -0.0, got {other:?}"),
    }
}

#[test]
fn arbitrary_precision_results() {
    let mut df = parser("0.##");
    df.set_parse_arbitrary_precision(true);
    let expected: BigDecimal = "0.1".parse().unwrap();
    assert_eq!(df.parse("0.1").unwrap(), Number::BigDecimal(expected));

    let expected: BigDecimal = "12345678901234567890.5".parse().unwrap();
    assert_eq!(
        df.parse("12345678901234567890.5").unwrap(),
        Number::BigDecimal(expected)
    );
}

#[test]
fn failures_carry_an_offset() {
    let mut df = parser("0");
    assert_eq!(df.parse("abc").unwrap_err().offset, 0);

    // Digits parse but the mandatory suffix is missing.
    let mut df = parser("0'x'");
    assert_eq!(df.parse("12").unwrap_err().offset, 2);
}

#[test]
fn localized_parsing() {
    let mut df = DecimalFormat::with_locale("#,##0.##", "de_DE").unwrap();
    assert_eq!(df.parse("1.234,5").unwrap(), Number::Float(1234.5));

    let mut df = DecimalFormat::with_locale("#,##0.##", "ar_EG").unwrap();
    assert_eq!(
        df.parse("\u{661}\u{66c}\u{662}\u{663}\u{664}\u{66b}\u{665}")
            .unwrap(),
        Number::Float(1234.5)
    );
    // ASCII digits are accepted regardless of locale.
    assert_eq!(df.parse("42").unwrap(), Number::Int(42));
}
