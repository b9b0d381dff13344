//! Locale symbol tables.
//!
//! Symbols (separator glyphs, zero digit, special-value strings, currency)
//! are loaded from an embedded TOML document: a `base` table plus per-locale
//! override tables. The engine consumes symbols as an opaque value; nothing
//! here affects pattern compilation beyond affix expansion.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Error type for symbol-table loading.
#[derive(Debug, Clone, PartialEq)]
pub enum LocaleError {
    /// An error occurred while parsing the embedded symbol data.
    ParseError(String),
}

impl fmt::Display for LocaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocaleError::ParseError(msg) => write!(f, "error parsing locale data: {msg}"),
        }
    }
}

impl std::error::Error for LocaleError {}

type Result<T> = std::result::Result<T, LocaleError>;

/// The symbol set a compiled pattern is expanded against and a formatted
/// string is rendered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalSymbols {
    /// Glyph for digit value zero; digits 1-9 are consecutive code points.
    pub zero_digit: char,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub percent: char,
    pub per_mille: char,
    pub minus_sign: char,
    pub plus_sign: char,
    /// Exponent marker emitted and matched in scientific notation.
    pub exponent_separator: String,
    pub infinity: String,
    pub nan: String,
    pub currency_symbol: String,
    pub international_currency_symbol: String,
}

impl Default for DecimalSymbols {
    fn default() -> Self {
        DecimalSymbols {
            zero_digit: '0',
            decimal_separator: '.',
            grouping_separator: ',',
            percent: '%',
            per_mille: '‰',
            minus_sign: '-',
            plus_sign: '+',
            exponent_separator: "E".to_string(),
            infinity: "∞".to_string(),
            nan: "NaN".to_string(),
            currency_symbol: "$".to_string(),
            international_currency_symbol: "USD".to_string(),
        }
    }
}

impl DecimalSymbols {
    /// Map a digit value 0-9 to the locale glyph.
    pub fn digit(&self, value: u8) -> char {
        char::from_u32(self.zero_digit as u32 + u32::from(value))
            .expect("zero digit anchors a contiguous glyph run")
    }

    /// Map a glyph back to its digit value, accepting both the locale run
    /// and ASCII digits.
    pub fn digit_value(&self, c: char) -> Option<u8> {
        let relative = (c as u32).wrapping_sub(self.zero_digit as u32);
        if relative < 10 {
            return Some(relative as u8);
        }
        c.to_digit(10).map(|d| d as u8)
    }
}

/// Holds every symbol table parsed out of the embedded TOML document.
struct LocaleManager {
    tables: HashMap<String, DecimalSymbols>,
}

static LOCALE_MANAGER: OnceLock<LocaleManager> = OnceLock::new();

impl LocaleManager {
    fn new() -> Self {
        let mut manager = Self {
            tables: HashMap::new(),
        };
        if let Err(e) = manager.load_embedded_data() {
            eprintln!("failed to load embedded locale data: {e}");
        }
        manager
    }

    fn load_embedded_data(&mut self) -> Result<()> {
        let symbols_toml = include_str!("locale/symbols.toml");
        let parsed: toml::Value =
            toml::from_str(symbols_toml).map_err(|e| LocaleError::ParseError(e.to_string()))?;
        let table = parsed
            .as_table()
            .ok_or_else(|| LocaleError::ParseError("root is not a table".to_string()))?;

        let mut base = DecimalSymbols::default();
        if let Some(value) = table.get("base") {
            apply_overrides(&mut base, value)?;
        }

        for (locale_id, value) in table {
            if locale_id == "base" {
                continue;
            }
            let mut symbols = base.clone();
            apply_overrides(&mut symbols, value)?;
            self.tables.insert(locale_id.to_string(), symbols);
        }
        Ok(())
    }

    fn get() -> &'static Self {
        LOCALE_MANAGER.get_or_init(Self::new)
    }
}

fn apply_overrides(symbols: &mut DecimalSymbols, value: &toml::Value) -> Result<()> {
    let table = value
        .as_table()
        .ok_or_else(|| LocaleError::ParseError("locale entry is not a table".to_string()))?;

    let set_char = |key: &str, slot: &mut char| {
        if let Some(text) = table.get(key).and_then(|v| v.as_str())
            && let Some(c) = text.chars().next()
        {
            *slot = c;
        }
    };
    set_char("zero_digit", &mut symbols.zero_digit);
    set_char("decimal", &mut symbols.decimal_separator);
    set_char("group", &mut symbols.grouping_separator);
    set_char("percent", &mut symbols.percent);
    set_char("per_mille", &mut symbols.per_mille);
    set_char("minus", &mut symbols.minus_sign);
    set_char("plus", &mut symbols.plus_sign);

    if let Some(text) = table.get("exponent").and_then(|v| v.as_str()) {
        symbols.exponent_separator = text.to_string();
    }
    if let Some(text) = table.get("infinity").and_then(|v| v.as_str()) {
        symbols.infinity = text.to_string();
    }
    if let Some(text) = table.get("nan").and_then(|v| v.as_str()) {
        symbols.nan = text.to_string();
    }
    if let Some(text) = table.get("currency").and_then(|v| v.as_str()) {
        symbols.currency_symbol = text.to_string();
    }
    if let Some(text) = table.get("currency_code").and_then(|v| v.as_str()) {
        symbols.international_currency_symbol = text.to_string();
    }
    Ok(())
}

/// Get the symbol table for a locale identifier (e.g. "en_US", "de_DE").
pub fn get_symbols(locale_id: &str) -> Option<DecimalSymbols> {
    LocaleManager::get().tables.get(locale_id).cloned()
}

/// List all locale identifiers with embedded symbol data.
pub fn list_available_locales() -> Vec<String> {
    LocaleManager::get().tables.keys().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_data_loads() {
        let locales = list_available_locales();
        assert!(!locales.is_empty(), "should have loaded some locales");

        let en_us = get_symbols("en_US").expect("en_US should exist");
        assert_eq!(en_us.decimal_separator, '.');
        assert_eq!(en_us.grouping_separator, ',');
        assert_eq!(en_us.currency_symbol, "$");
    }

    #[test]
    fn overrides_apply_over_base() {
        let de = get_symbols("de_DE").expect("de_DE should exist");
        assert_eq!(de.decimal_separator, ',');
        assert_eq!(de.grouping_separator, '.');
        assert_eq!(de.international_currency_symbol, "EUR");
        // Untouched symbols come from the base table.
        assert_eq!(de.nan, "NaN");
    }

    #[test]
    fn digit_glyph_mapping() {
        let ar = get_symbols("ar_EG").expect("ar_EG should exist");
        assert_eq!(ar.digit(3), '٣');
        assert_eq!(ar.digit_value('٣'), Some(3));
        // ASCII digits are always accepted on the way in.
        assert_eq!(ar.digit_value('7'), Some(7));
        assert_eq!(ar.digit_value('x'), None);
    }
}
