//! Serde helpers for token amounts as unsigned decimal strings.
//!
//! Amounts routinely exceed the range a JSON number can represent without
//! loss, so the wire format is a decimal string end to end.

use alloy_primitives::U256;
use serde::{de, Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    U256::from_str_radix(&value, 10).map_err(de::Error::custom)
}

pub mod option {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<U256>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        value
            .map(|value| U256::from_str_radix(&value, 10))
            .transpose()
            .map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Amount(#[serde(with = "super")] U256);

    #[test]
    fn round_trips_decimal_strings() {
        let amount = Amount(U256::from_str_radix("164577689090780", 10).unwrap());
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, r#""164577689090780""#);
        assert_eq!(serde_json::from_str::<Amount>(&json).unwrap(), amount);
    }

    #[test]
    fn rejects_hex_and_garbage() {
        assert!(serde_json::from_str::<Amount>(r#""0x10""#).is_err());
        assert!(serde_json::from_str::<Amount>(r#""-5""#).is_err());
        assert!(serde_json::from_str::<Amount>(r#""ten""#).is_err());
    }

    #[test]
    fn handles_amounts_beyond_f64_precision() {
        let big = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        let amount: Amount = serde_json::from_str(&format!(r#""{}""#, big)).unwrap();
        assert_eq!(amount.0, U256::MAX);
    }
}
