use std::fmt;

/// Amounts are plain `f64` values; only display is fixed to two decimals.
pub type Amount = f64;

/// Format an amount with two decimal places.
/// Example: 4.5 -> "4.50", -12.345 -> "-12.35"
pub fn format_amount(amount: Amount) -> String {
    // Avoid printing "-0.00" for tiny negative sums.
    if amount.abs() < 0.005 {
        return "0.00".to_string();
    }
    format!("{:.2}", amount)
}

/// Parse a decimal string into an amount. Accepts a leading sign and
/// surrounding whitespace; rejects anything that is not a finite number.
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| ParseAmountError::InvalidFormat)?;

    if !value.is_finite() {
        return Err(ParseAmountError::NotFinite);
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
    NotFinite,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "invalid amount format"),
            ParseAmountError::NotFinite => write!(f, "amount must be a finite number"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
