//! Locale-aware price formatting for result cards.

/// Separators and currency symbol of the display locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFormat {
    pub currency_symbol: String,
    pub group_separator: char,
    pub decimal_separator: char,
}

impl Default for PriceFormat {
    /// Guatemalan Spanish: `$25,000.5`.
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            group_separator: ',',
            decimal_separator: '.',
        }
    }
}

impl PriceFormat {
    pub const UNAVAILABLE: &'static str = "Price not available";

    /// Formats a price with grouped thousands and at most two fraction digits.
    pub fn format(&self, price: Option<f64>) -> String {
        let price = match price {
            Some(p) if p.is_finite() => p,
            _ => return Self::UNAVAILABLE.to_string(),
        };

        let cents = (price.abs() * 100.0).round() as u64;
        let whole = cents / 100;
        let fraction = cents % 100;

        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(self.group_separator);
            }
            grouped.push(ch);
        }

        if fraction != 0 {
            let fraction = format!("{:02}", fraction);
            grouped.push(self.decimal_separator);
            grouped.push_str(fraction.trim_end_matches('0'));
        }

        let sign = if price < 0.0 && cents != 0 { "-" } else { "" };
        format!("{}{}{}", sign, self.currency_symbol, grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        let fmt = PriceFormat::default();
        assert_eq!(fmt.format(Some(25000.0)), "$25,000");
        assert_eq!(fmt.format(Some(1234567.0)), "$1,234,567");
        assert_eq!(fmt.format(Some(999.0)), "$999");
        assert_eq!(fmt.format(Some(0.0)), "$0");
    }

    #[test]
    fn keeps_significant_fraction_digits() {
        let fmt = PriceFormat::default();
        assert_eq!(fmt.format(Some(25000.5)), "$25,000.5");
        assert_eq!(fmt.format(Some(25000.25)), "$25,000.25");
        assert_eq!(fmt.format(Some(25000.001)), "$25,000");
    }

    #[test]
    fn uses_locale_separators() {
        let fmt = PriceFormat {
            currency_symbol: "Q".to_string(),
            group_separator: '.',
            decimal_separator: ',',
        };
        assert_eq!(fmt.format(Some(75000.75)), "Q75.000,75");
    }

    #[test]
    fn missing_or_invalid_price_is_unavailable() {
        let fmt = PriceFormat::default();
        assert_eq!(fmt.format(None), "Price not available");
        assert_eq!(fmt.format(Some(f64::NAN)), "Price not available");
    }

    #[test]
    fn negative_prices_carry_sign() {
        assert_eq!(PriceFormat::default().format(Some(-1500.0)), "-$1,500");
    }
}
