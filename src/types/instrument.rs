use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Instrument {
    symbol: String,
    currency: String,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into().trim().to_uppercase(),
            currency: currency.into().trim().to_uppercase(),
        }
    }
}

impl FromStr for Instrument {
    type Err = anyhow::Error;

    fn from_str(symbol: &str) -> Result<Self> {
        match symbol.split_once('/') {
            Some((base, currency)) if !base.trim().is_empty() && !currency.trim().is_empty() => {
                Ok(Self::new(base, currency))
            }
            _ => bail!("invalid instrument \"{symbol}\", expected SYMBOL/CCY"),
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}/{}", self.symbol, self.currency)
    }
}

impl fmt::Debug for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instrument({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_symbol_and_currency() {
        let instrument: Instrument = "spy/usd".parse().unwrap();

        assert_eq!(instrument.to_string(), "SPY/USD");
        assert_eq!(instrument, Instrument::new("SPY", "USD"));
    }

    #[test]
    fn rejects_missing_currency() {
        assert!("SPY".parse::<Instrument>().is_err());
        assert!("SPY/".parse::<Instrument>().is_err());
    }
}
