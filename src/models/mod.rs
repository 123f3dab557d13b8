pub mod domain;
pub mod dto;

/// Score fields arrive either as JSON numbers or as decimal strings ("7.50").
pub(crate) mod decimal {
    use serde::{de, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDecimal {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawDecimal::deserialize(deserializer)? {
            RawDecimal::Number(value) => Ok(value),
            RawDecimal::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| de::Error::custom(format!("invalid decimal value '{}'", text))),
        }
    }

}
