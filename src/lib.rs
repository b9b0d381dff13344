pub mod bigdec;
pub mod compact;
pub mod decimal_format;
pub mod digits;
pub mod formatter;
pub mod locale;
pub mod parse;
pub mod parser;
pub mod plural;
pub mod types;

pub use bigdec::BigDecimal;
pub use compact::CompactNumberFormat;
pub use decimal_format::DecimalFormat;
pub use formatter::{Formatted, format_number};
pub use locale::{DecimalSymbols, get_symbols, list_available_locales};
pub use parse::{ParseOptions, parse_number};
pub use parser::{compile_pattern, to_pattern};
pub use plural::{PluralOperands, PluralRules, PluralTag};
pub use types::*;
