//! Numeral conventions used by decimal parsing.

use serde::{Deserialize, Serialize};

/// Decimal and grouping separators plus accepted currency symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberLocale {
    pub decimal_separator: char,
    pub group_separator: char,
    pub currency_symbols: Vec<String>,
}

impl NumberLocale {
    /// Regional convention of the source systems: `1.234,56`, `$` and `€`.
    pub fn regional() -> Self {
        Self {
            decimal_separator: ',',
            group_separator: '.',
            currency_symbols: vec!["$".to_string(), "€".to_string()],
        }
    }

    /// Culture-invariant convention: `1,234.56`, no currency symbols.
    pub fn invariant() -> Self {
        Self {
            decimal_separator: '.',
            group_separator: ',',
            currency_symbols: Vec::new(),
        }
    }

    /// Separators must differ and must not be digits or signs.
    pub fn is_valid(&self) -> bool {
        let usable = |ch: char| !ch.is_ascii_digit() && ch != '-' && ch != '+';
        self.decimal_separator != self.group_separator
            && usable(self.decimal_separator)
            && usable(self.group_separator)
    }
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::regional()
    }
}
