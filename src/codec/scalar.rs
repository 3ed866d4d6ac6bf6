use crate::codec::Parser;
use crate::common::{Error, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct StringParser;

impl Parser for StringParser {
    type Item = String;

    fn encode(&self, item: &String) -> String {
        item.clone()
    }

    fn decode(&self, raw: &str) -> Result<String> {
        Ok(raw.to_owned())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NumberParser;

impl Parser for NumberParser {
    type Item = f64;

    fn encode(&self, item: &f64) -> String {
        item.to_string()
    }

    fn decode(&self, raw: &str) -> Result<f64> {
        match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(Error::invalid_format(format!(
                "{:?} is not a finite number",
                raw
            ))),
        }
    }
}

/// Booleans are kept as "true" and "false".
///
/// Anything other than "true" reads back as false.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanParser;

impl Parser for BooleanParser {
    type Item = bool;

    fn encode(&self, item: &bool) -> String {
        item.to_string()
    }

    fn decode(&self, raw: &str) -> Result<bool> {
        Ok(raw == "true")
    }
}
