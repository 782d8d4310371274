//! Amount module - monetary values as the oracle reported them

use std::fmt;

/// A monetary value from an extraction response
///
/// The oracle is asked for floats but sometimes answers with locale-formatted
/// strings such as `"2.041.680,00"`. Both shapes are kept as reported; turning
/// them into display strings is the report layer's job.
#[derive(Debug, Clone, PartialEq)]
pub enum Amount {
    /// A JSON number
    Number(f64),

    /// A string, possibly with currency symbols and separators
    Text(String),
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(n) => write!(f, "{}", n),
            Amount::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Number(value)
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Amount::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_keeps_reported_shape() {
        assert_eq!(Amount::Number(1884373.3).to_string(), "1884373.3");
        assert_eq!(Amount::from("R$ 2.041.680,00").to_string(), "R$ 2.041.680,00");
    }
}
