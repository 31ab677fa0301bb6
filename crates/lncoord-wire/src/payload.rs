//! RPC payload types carried by the JSON gateway.

use serde::{Deserialize, Serialize};

use lncoord_types::{NodeId, PairData, PairKey};

use crate::error::Result;

/// One directed pair observation as seen on the wire.
///
/// Node identifiers travel as base64 `bytes` fields. `history` is optional
/// on the wire so the validator can reject its absence explicitly rather
/// than silently defaulting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairHistory {
    /// The node the payment was forwarded from, 33 raw bytes.
    #[serde(with = "base64_bytes")]
    pub node_from: Vec<u8>,
    /// The node the payment was forwarded to, 33 raw bytes.
    #[serde(with = "base64_bytes")]
    pub node_to: Vec<u8>,
    /// The observation record for this pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<PairData>,
}

impl PairHistory {
    /// Build a wire pair from a stored record.
    pub fn from_record(key: PairKey, history: PairData) -> Self {
        Self {
            node_from: key.node_from.as_bytes().to_vec(),
            node_to: key.node_to.as_bytes().to_vec(),
            history: Some(history),
        }
    }

    /// Parse the node identifiers into a validated [`PairKey`].
    pub fn pair_key(&self) -> Result<PairKey> {
        Ok(PairKey::new(
            NodeId::parse(&self.node_from)?,
            NodeId::parse(&self.node_to)?,
        ))
    }
}

/// Request body of `RegisterMissionControl`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterMissionControlRequest {
    /// The contributed pair observations.
    #[serde(default)]
    pub pairs: Vec<PairHistory>,
}

/// Response body of `RegisterMissionControl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterMissionControlResponse {
    /// Human-readable registration summary.
    pub success_message: String,
}

/// Request body of `QueryAggregatedMissionControl`. Carries no fields.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct QueryAggregatedMissionControlRequest {}

/// Response body of `QueryAggregatedMissionControl`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryAggregatedMissionControlResponse {
    /// Every aggregated pair currently stored.
    #[serde(default)]
    pub pairs: Vec<PairHistory>,
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_node_id(seed: u8) -> NodeId {
        let secp = secp256k1::Secp256k1::new();
        let sk = secp256k1::SecretKey::from_slice(&[seed; 32]).unwrap();
        let pk = secp256k1::PublicKey::from_secret_key(&secp, &sk);
        NodeId::parse(&pk.serialize()).unwrap()
    }

    #[test]
    fn test_pair_history_json_round_trip() {
        let key = PairKey::new(valid_node_id(1), valid_node_id(2));
        let history = PairData {
            success_time: 1000,
            success_amt_sat: 200,
            success_amt_msat: 200_000,
            ..Default::default()
        };
        let pair = PairHistory::from_record(key, history);

        let json = serde_json::to_string(&pair).unwrap();
        let decoded: PairHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, pair);
        assert_eq!(decoded.pair_key().unwrap(), key);
    }

    #[test]
    fn test_node_ids_encode_as_base64_strings() {
        let key = PairKey::new(valid_node_id(1), valid_node_id(2));
        let pair = PairHistory::from_record(key, PairData::default());

        let value: serde_json::Value = serde_json::to_value(&pair).unwrap();
        let encoded = value["node_from"].as_str().unwrap();
        use base64::{engine::general_purpose::STANDARD, Engine as _};
        assert_eq!(STANDARD.decode(encoded).unwrap(), key.node_from.0.to_vec());
    }

    #[test]
    fn test_missing_history_deserializes_as_none() {
        let key = PairKey::new(valid_node_id(1), valid_node_id(2));
        let mut value = serde_json::to_value(PairHistory::from_record(key, PairData::default()))
            .unwrap();
        value.as_object_mut().unwrap().remove("history");

        let decoded: PairHistory = serde_json::from_value(value).unwrap();
        assert!(decoded.history.is_none());
    }

    #[test]
    fn test_register_request_defaults_to_empty_pairs() {
        let req: RegisterMissionControlRequest = serde_json::from_str("{}").unwrap();
        assert!(req.pairs.is_empty());
    }
}
