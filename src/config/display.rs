//! Display formatting configuration

use serde::Deserialize;

use crate::domain::recommendation::PriceFormat;

use super::error::ValidationError;

/// Locale settings for prices on recommendation cards
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    #[serde(default = "default_group_separator")]
    pub group_separator: char,

    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,
}

impl DisplayConfig {
    pub fn price_format(&self) -> PriceFormat {
        PriceFormat {
            currency_symbol: self.currency_symbol.clone(),
            group_separator: self.group_separator,
            decimal_separator: self.decimal_separator,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.group_separator == self.decimal_separator {
            return Err(ValidationError::AmbiguousSeparators);
        }
        Ok(())
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            group_separator: default_group_separator(),
            decimal_separator: default_decimal_separator(),
        }
    }
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_group_separator() -> char {
    ','
}

fn default_decimal_separator() -> char {
    '.'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_price_format() {
        let format = DisplayConfig::default().price_format();
        assert_eq!(format.format(Some(25000.0)), "$25,000");
    }

    #[test]
    fn test_european_separators() {
        let config = DisplayConfig {
            currency_symbol: "€".to_string(),
            group_separator: '.',
            decimal_separator: ',',
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.price_format().format(Some(1234.5)), "€1.234,5");
    }

    #[test]
    fn test_same_separators_rejected() {
        let config = DisplayConfig {
            group_separator: '.',
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::AmbiguousSeparators));
    }
}
