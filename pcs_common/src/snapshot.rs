//! Listing snapshot returned by the PancakeSwap token API.
//!
//! A `Snapshot` is one response of the listing endpoint: the server-side
//! refresh time plus the full mapping of token addresses to their metadata.
//! Metadata stays raw JSON so one odd record cannot invalidate the whole listing;
//! `TokenInfo` is the display view pulled out of it.
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::MonitorError;

/// Display fields of a single listed token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenInfo {
    /// Token name (e.g., `PancakeSwap Token`).
    pub name: Option<String>,
    /// Ticker symbol (e.g., `CAKE`).
    pub symbol: Option<String>,
    /// Price in USD.
    pub price: Option<String>,
    /// Price in BNB (`price_BNB` on the wire).
    pub price_bnb: Option<String>,
}

impl TokenInfo {
    /// Extract the display fields from a raw metadata record.
    ///
    /// Strings are taken as-is, numbers and booleans are rendered with
    /// `to_string`; anything else (null, arrays, objects, a non-object record)
    /// leaves the field empty.
    pub fn from_metadata(metadata: &Value) -> Self {
        let field = |key: &str| match metadata.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        };
        Self {
            name: field("name"),
            symbol: field("symbol"),
            price: field("price"),
            price_bnb: field("price_BNB"),
        }
    }
}

/// One response of the listing API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Server refresh time in milliseconds since the Unix epoch.
    pub updated_at: i64,
    /// Token address → raw metadata, in the order the server listed them.
    #[serde(rename = "data")]
    pub tokens: Map<String, Value>,
}

impl Snapshot {
    /// Decode a snapshot from the raw JSON body of the listing endpoint.
    pub fn from_json(body: &str) -> Result<Self, MonitorError> {
        serde_json::from_str(body).map_err(|e| MonitorError::MalformedSnapshot(e.to_string()))
    }

    /// Token addresses present in this snapshot but absent from `known`,
    /// in snapshot order.
    pub fn new_tokens<'a>(&'a self, known: &HashSet<String>) -> Vec<(&'a String, &'a Value)> {
        self.tokens
            .iter()
            .filter(|(address, _)| !known.contains(*address))
            .collect()
    }

    /// All token addresses of this snapshot.
    pub fn token_ids(&self) -> HashSet<String> {
        self.tokens.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BODY: &str = r#"{
        "updated_at": 1634567890123,
        "data": {
            "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c": {
                "name": "Wrapped BNB",
                "symbol": "WBNB",
                "extra": 1
            },
            "0x0E09FaBB73Bd3Ade0a17ECC321fD13a19e81cE82": {
                "name": "PancakeSwap Token",
                "symbol": "Cake",
                "price": "19.8",
                "price_BNB": "0.041"
            }
        }
    }"#;

    #[test]
    fn decodes_listing_body() {
        let snapshot = Snapshot::from_json(BODY).unwrap();
        assert_eq!(snapshot.updated_at, 1634567890123);
        assert_eq!(snapshot.tokens.len(), 2);

        let cake = TokenInfo::from_metadata(&snapshot.tokens["0x0E09FaBB73Bd3Ade0a17ECC321fD13a19e81cE82"]);
        assert_eq!(cake.symbol.as_deref(), Some("Cake"));
        assert_eq!(cake.price_bnb.as_deref(), Some("0.041"));

        let wbnb = TokenInfo::from_metadata(&snapshot.tokens["0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c"]);
        assert_eq!(wbnb.price, None);
    }

    #[test]
    fn keeps_server_listing_order() {
        let snapshot = Snapshot::from_json(BODY).unwrap();
        let order: Vec<&String> = snapshot.tokens.keys().collect();
        assert_eq!(
            order,
            vec![
                "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c",
                "0x0E09FaBB73Bd3Ade0a17ECC321fD13a19e81cE82"
            ]
        );
    }

    #[test]
    fn numeric_and_null_records_do_not_reject_listing() {
        let body = r#"{"updated_at":2000,"data":{"A":{"name":"A","price":1.5},"B":null,"C":{"name":"C"}}}"#;
        let snapshot = Snapshot::from_json(body).unwrap();
        assert_eq!(snapshot.tokens.len(), 3);

        let a = TokenInfo::from_metadata(&snapshot.tokens["A"]);
        assert_eq!(a.price.as_deref(), Some("1.5"));
        assert_eq!(TokenInfo::from_metadata(&snapshot.tokens["B"]), TokenInfo::default());
    }

    #[test]
    fn unusable_fields_are_left_empty() {
        let info = TokenInfo::from_metadata(&json!({
            "name": ["not", "a", "name"],
            "symbol": {"nested": true},
            "price": null,
            "price_BNB": 2
        }));
        assert_eq!(
            info,
            TokenInfo {
                price_bnb: Some("2".into()),
                ..TokenInfo::default()
            }
        );
        assert_eq!(TokenInfo::from_metadata(&json!("just a string")), TokenInfo::default());
    }

    #[test]
    fn body_without_timestamp_is_malformed() {
        let err = Snapshot::from_json(r#"{"data": {}}"#).unwrap_err();
        assert!(matches!(err, MonitorError::MalformedSnapshot(_)));
    }

    #[test]
    fn new_tokens_are_the_set_difference() {
        let snapshot = Snapshot::from_json(BODY).unwrap();
        let known: HashSet<String> =
            ["0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c".to_string()].into();

        let fresh: Vec<&String> = snapshot.new_tokens(&known).into_iter().map(|(id, _)| id).collect();
        assert_eq!(fresh, vec!["0x0E09FaBB73Bd3Ade0a17ECC321fD13a19e81cE82"]);

        assert!(snapshot.new_tokens(&snapshot.token_ids()).is_empty());
    }
}
