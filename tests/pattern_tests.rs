use decimal_format::{DecimalFormat, get_symbols};

#[test]
fn to_pattern_is_canonical() {
    let df = DecimalFormat::with_locale("#,##0.##", "en_US").unwrap();
    assert_eq!(df.to_pattern(), "#,##0.##");

    let df = DecimalFormat::with_locale("0.00", "en_US").unwrap();
    assert_eq!(df.to_pattern(), "#0.00");

    let df = DecimalFormat::with_locale("0.00;(0.00)", "en_US").unwrap();
    assert_eq!(df.to_pattern(), "#0.00;(#0.00)");
}

#[test]
fn localized_pattern_uses_locale_glyphs() {
    let df = DecimalFormat::with_locale("#,##0.00", "de_DE").unwrap();
    assert_eq!(df.to_localized_pattern(), "#.##0,00");
    assert_eq!(df.to_pattern(), "#,##0.00");
}

#[test]
fn failed_apply_pattern_preserves_state() {
    let mut df = DecimalFormat::with_locale("0.00", "en_US").unwrap();
    assert!(df.apply_pattern("0.0.0").is_err());
    assert_eq!(df.to_pattern(), "#0.00");
    assert_eq!(df.format(1.5).unwrap(), "1.50");

    assert!(df.apply_pattern("#,##0.#").is_ok());
    assert_eq!(df.format(1234.56).unwrap(), "1,234.6");
}

#[test]
fn setter_validation() {
    let mut df = DecimalFormat::with_locale("#,##0", "en_US").unwrap();
    assert!(df.set_grouping_size(128).is_err());
    assert_eq!(df.grouping_size(), 3);
    assert!(df.set_grouping_size(4).is_ok());
    assert_eq!(df.format(12345i64).unwrap(), "1,2345");

    assert!(df.set_multiplier(0).is_err());
    assert_eq!(df.multiplier(), 1);
}

#[test]
fn grouping_toggle_remembers_the_size() {
    let mut df = DecimalFormat::with_locale("#,##0", "en_US").unwrap();
    df.set_grouping_used(false);
    assert_eq!(df.format(12345i64).unwrap(), "12345");
    df.set_grouping_used(true);
    assert_eq!(df.format(12345i64).unwrap(), "12,345");
}

#[test]
fn affix_setters_take_effect_immediately() {
    let mut df = DecimalFormat::with_locale("0.00", "en_US").unwrap();
    df.set_positive_prefix("$");
    assert_eq!(df.format(5i64).unwrap(), "$5.00");
    assert_eq!(df.to_pattern(), "$#0.00");

    df.set_negative_prefix("<");
    df.set_negative_suffix(">");
    assert_eq!(df.format(-5i64).unwrap(), "<5.00>");
}

#[test]
fn digit_bound_setters_stay_consistent() {
    let mut df = DecimalFormat::with_locale("0.##", "en_US").unwrap();
    df.set_minimum_fraction_digits(4);
    assert_eq!(df.maximum_fraction_digits(), 4);
    assert_eq!(df.format(1.5).unwrap(), "1.5000");

    df.set_maximum_fraction_digits(1);
    assert_eq!(df.minimum_fraction_digits(), 1);
    assert_eq!(df.format(1.55).unwrap(), "1.6");
}

#[test]
fn symbol_swap_re_expands_affixes() {
    let mut df = DecimalFormat::with_locale("\u{a4}0.00", "en_US").unwrap();
    assert_eq!(df.format(2.5).unwrap(), "$2.50");

    df.set_symbols(get_symbols("de_DE").unwrap());
    assert_eq!(df.format(2.5).unwrap(), "\u{20ac}2,50");
}

#[test]
fn quoted_literals_pass_through() {
    let mut df = DecimalFormat::with_locale("'#'0", "en_US").unwrap();
    assert_eq!(df.format(5i64).unwrap(), "#5");

    let mut df = DecimalFormat::with_locale("0' 'K", "en_US").unwrap();
    assert_eq!(df.format(12i64).unwrap(), "12 K");
}
