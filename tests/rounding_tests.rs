use decimal_format::bigdec::BigDecimal;
use decimal_format::{DecimalFormat, RoundingMode};

fn fmt_mode(pattern: &str, mode: RoundingMode, value: f64) -> String {
    let mut df = DecimalFormat::with_locale(pattern, "en_US").unwrap();
    df.set_rounding_mode(mode);
    df.format(value).unwrap()
}

#[test]
fn all_modes_at_an_exact_tie() {
    // 2.5 is exactly representable, so this is a true tie.
    assert_eq!(fmt_mode("0", RoundingMode::Up, 2.5), "3");
    assert_eq!(fmt_mode("0", RoundingMode::Down, 2.5), "2");
    assert_eq!(fmt_mode("0", RoundingMode::Ceiling, 2.5), "3");
    assert_eq!(fmt_mode("0", RoundingMode::Floor, 2.5), "2");
    assert_eq!(fmt_mode("0", RoundingMode::HalfUp, 2.5), "3");
    assert_eq!(fmt_mode("0", RoundingMode::HalfDown, 2.5), "2");
    assert_eq!(fmt_mode("0", RoundingMode::HalfEven, 2.5), "2");
    assert_eq!(fmt_mode("0", RoundingMode::HalfEven, 3.5), "4");
}

#[test]
fn directed_modes_mirror_for_negatives() {
    assert_eq!(fmt_mode("0", RoundingMode::Ceiling, -2.5), "-2");
    assert_eq!(fmt_mode("0", RoundingMode::Floor, -2.5), "-3");
    assert_eq!(fmt_mode("0", RoundingMode::HalfUp, -2.5), "-3");
    assert_eq!(fmt_mode("0", RoundingMode::HalfEven, -2.5), "-2");
    assert_eq!(fmt_mode("0", RoundingMode::Up, -2.1), "-3");
    assert_eq!(fmt_mode("0", RoundingMode::Down, -2.9), "-2");
}

#[test]
fn apparent_ties_resolve_against_the_binary_value() {
    // 0.15 as a double sits just below the printed tie point.
    assert_eq!(fmt_mode("0.0", RoundingMode::HalfUp, 0.15), "0.1");
    // 0.25 is exact, so HalfUp and HalfEven disagree.
    assert_eq!(fmt_mode("0.0", RoundingMode::HalfUp, 0.25), "0.3");
    assert_eq!(fmt_mode("0.0", RoundingMode::HalfEven, 0.25), "0.2");
    // 0.135 sits just above.
    assert_eq!(fmt_mode("0.00", RoundingMode::HalfEven, 0.135), "0.14");
}

#[test]
fn fraction_underflow() {
    assert_eq!(fmt_mode("0.00", RoundingMode::HalfEven, 0.0001), "0.00");
    assert_eq!(fmt_mode("0.00", RoundingMode::Up, 0.0001), "0.01");
    assert_eq!(fmt_mode("0.00", RoundingMode::Ceiling, 0.0001), "0.01");
    assert_eq!(fmt_mode("0.00", RoundingMode::Floor, 0.0001), "0.00");
    assert_eq!(fmt_mode("0.00", RoundingMode::Floor, -0.0001), "-0.01");
    assert_eq!(fmt_mode("0.00", RoundingMode::Ceiling, -0.0001), "-0.00");
}

#[test]
fn carry_ripples_through_nines() {
    assert_eq!(fmt_mode("0.0", RoundingMode::HalfEven, 9.99), "10.0");
    assert_eq!(fmt_mode("0", RoundingMode::Up, 999.001), "1000");
}

#[test]
fn unnecessary_rejects_only_inexact_values() {
    let mut df = DecimalFormat::with_locale("0.00", "en_US").unwrap();
    df.set_rounding_mode(RoundingMode::Unnecessary);
    assert_eq!(df.format(1.25).unwrap(), "1.25");
    assert_eq!(df.format(5i64).unwrap(), "5.00");
    assert!(df.format(1.234).is_err());
}

#[test]
fn exact_decimals_round_exactly() {
    // The double nearest 1.005 is below the tie; the exact decimal is on it.
    let mut df = DecimalFormat::with_locale("0.00", "en_US").unwrap();
    df.set_rounding_mode(RoundingMode::HalfUp);
    assert_eq!(df.format(1.005f64).unwrap(), "1.00");

    let exact: BigDecimal = "1.005".parse().unwrap();
    assert_eq!(df.format(exact).unwrap(), "1.01");

    df.set_rounding_mode(RoundingMode::HalfEven);
    let exact: BigDecimal = "1.005".parse().unwrap();
    assert_eq!(df.format(exact).unwrap(), "1.00");
}

#[test]
fn integers_are_never_rounded_in_fixed_notation() {
    let mut df = DecimalFormat::with_locale("0", "en_US").unwrap();
    df.set_rounding_mode(RoundingMode::Unnecessary);
    assert_eq!(df.format(i64::MAX).unwrap(), "9223372036854775807");
    assert_eq!(df.format(i64::MIN).unwrap(), "-9223372036854775808");
}
