//! Registration request validation and sanitization.

use lncoord_types::{NodeId, PairData, MSAT_PER_SAT};
use lncoord_wire::{PairHistory, RegisterMissionControlRequest};

use crate::error::{NodeField, ValidationError};
use crate::stale::is_history_stale;

/// Check the integrity and correctness of a registration request.
///
/// Fails on the first violation. Per pair: both node identifiers must be
/// valid 33-byte compressed secp256k1 points, the history must be present,
/// all four amount fields must be non-negative, and the satoshi fields must
/// equal their millisatoshi counterparts divided by 1000. Finally, at least
/// one pair in the request must be within the staleness threshold.
pub fn validate_register_request(
    req: &RegisterMissionControlRequest,
    history_threshold_secs: i64,
    now: i64,
) -> Result<(), ValidationError> {
    if req.pairs.is_empty() {
        return Err(ValidationError::EmptyRequest);
    }

    let mut all_stale = true;

    for pair in &req.pairs {
        NodeId::parse(&pair.node_from).map_err(|source| ValidationError::InvalidNodeId {
            field: NodeField::NodeFrom,
            source,
        })?;
        NodeId::parse(&pair.node_to).map_err(|source| ValidationError::InvalidNodeId {
            field: NodeField::NodeTo,
            source,
        })?;

        let history = pair.history.as_ref().ok_or(ValidationError::MissingHistory)?;

        validate_amounts(history)?;

        if !is_history_stale(history, history_threshold_secs, now) {
            all_stale = false;
        }
    }

    if all_stale {
        return Err(ValidationError::AllPairsStale {
            threshold_secs: history_threshold_secs,
        });
    }

    Ok(())
}

/// Remove every stale pair from a validated request, in place.
///
/// Returns the number of pairs removed. Validation already guaranteed at
/// least one fresh pair, so the request stays non-empty.
pub fn sanitize_register_request(
    req: &mut RegisterMissionControlRequest,
    history_threshold_secs: i64,
    now: i64,
) -> usize {
    let before = req.pairs.len();
    req.pairs.retain(|pair| {
        pair.history
            .as_ref()
            .is_some_and(|h| !is_history_stale(h, history_threshold_secs, now))
    });
    before - req.pairs.len()
}

fn validate_amounts(history: &PairData) -> Result<(), ValidationError> {
    let non_negative = [
        ("fail_amt_msat", history.fail_amt_msat),
        ("success_amt_msat", history.success_amt_msat),
        ("fail_amt_sat", history.fail_amt_sat),
        ("success_amt_sat", history.success_amt_sat),
    ];
    for (field, value) in non_negative {
        if value < 0 {
            return Err(ValidationError::NegativeAmount { field, value });
        }
    }

    // Checked multiplication: an absurd satoshi value must not overflow
    // into a spurious match.
    let consistent = [
        (
            "fail_amt_sat",
            history.fail_amt_sat,
            "fail_amt_msat",
            history.fail_amt_msat,
        ),
        (
            "success_amt_sat",
            history.success_amt_sat,
            "success_amt_msat",
            history.success_amt_msat,
        ),
    ];
    for (sat_field, sat, msat_field, msat) in consistent {
        if sat.checked_mul(MSAT_PER_SAT) != Some(msat) {
            return Err(ValidationError::UnitMismatch {
                sat_field,
                sat,
                msat_field,
                msat,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lncoord_types::PairError;

    fn valid_node_bytes(seed: u8) -> Vec<u8> {
        let secp = secp256k1::Secp256k1::new();
        let sk = secp256k1::SecretKey::from_slice(&[seed; 32]).unwrap();
        secp256k1::PublicKey::from_secret_key(&secp, &sk)
            .serialize()
            .to_vec()
    }

    fn fresh_history(now: i64) -> PairData {
        PairData {
            success_time: now,
            success_amt_sat: 200,
            success_amt_msat: 200_000,
            ..Default::default()
        }
    }

    fn request_with(pairs: Vec<PairHistory>) -> RegisterMissionControlRequest {
        RegisterMissionControlRequest { pairs }
    }

    fn single_pair_request(history: PairData) -> RegisterMissionControlRequest {
        request_with(vec![PairHistory {
            node_from: valid_node_bytes(1),
            node_to: valid_node_bytes(2),
            history: Some(history),
        }])
    }

    const NOW: i64 = 1_000_000;
    const THRESHOLD: i64 = 600;

    #[test]
    fn test_accepts_well_formed_request() {
        let req = single_pair_request(fresh_history(NOW));
        validate_register_request(&req, THRESHOLD, NOW).unwrap();
    }

    #[test]
    fn test_rejects_empty_request() {
        let req = request_with(vec![]);
        let err = validate_register_request(&req, THRESHOLD, NOW).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyRequest));
    }

    #[test]
    fn test_rejects_short_node_from() {
        let mut req = single_pair_request(fresh_history(NOW));
        req.pairs[0].node_from = vec![0u8; 32];
        let err = validate_register_request(&req, THRESHOLD, NOW).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidNodeId {
                field: NodeField::NodeFrom,
                source: PairError::InvalidNodeIdLength { .. },
            }
        ));
    }

    #[test]
    fn test_rejects_off_curve_node_to() {
        let mut req = single_pair_request(fresh_history(NOW));
        req.pairs[0].node_to = vec![0xff; 33];
        let err = validate_register_request(&req, THRESHOLD, NOW).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidNodeId {
                field: NodeField::NodeTo,
                source: PairError::InvalidNodeId(_),
            }
        ));
    }

    #[test]
    fn test_rejects_missing_history() {
        let mut req = single_pair_request(fresh_history(NOW));
        req.pairs[0].history = None;
        let err = validate_register_request(&req, THRESHOLD, NOW).unwrap_err();
        assert!(matches!(err, ValidationError::MissingHistory));
    }

    #[test]
    fn test_rejects_negative_amount() {
        let mut history = fresh_history(NOW);
        history.fail_amt_msat = -1;
        let err =
            validate_register_request(&single_pair_request(history), THRESHOLD, NOW).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NegativeAmount {
                field: "fail_amt_msat",
                value: -1,
            }
        ));
    }

    #[test]
    fn test_rejects_unit_mismatch() {
        let mut history = fresh_history(NOW);
        history.success_amt_sat = 201;
        let err =
            validate_register_request(&single_pair_request(history), THRESHOLD, NOW).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnitMismatch {
                sat_field: "success_amt_sat",
                ..
            }
        ));
    }

    #[test]
    fn test_unit_check_does_not_overflow() {
        let mut history = fresh_history(NOW);
        history.fail_amt_sat = i64::MAX / 2;
        history.fail_amt_msat = 0;
        let err =
            validate_register_request(&single_pair_request(history), THRESHOLD, NOW).unwrap_err();
        assert!(matches!(err, ValidationError::UnitMismatch { .. }));
    }

    /// Scenario: a request whose pairs are all older than the threshold is
    /// rejected outright.
    #[test]
    fn test_rejects_all_stale_request() {
        let stale = PairData {
            success_time: NOW - 900,
            fail_time: NOW - 900,
            ..Default::default()
        };
        let req = request_with(vec![
            PairHistory {
                node_from: valid_node_bytes(1),
                node_to: valid_node_bytes(2),
                history: Some(stale),
            },
            PairHistory {
                node_from: valid_node_bytes(3),
                node_to: valid_node_bytes(4),
                history: Some(stale),
            },
        ]);
        let err = validate_register_request(&req, THRESHOLD, NOW).unwrap_err();
        assert!(matches!(err, ValidationError::AllPairsStale { .. }));
    }

    #[test]
    fn test_one_fresh_pair_carries_the_request() {
        let stale = PairData {
            success_time: NOW - 900,
            ..Default::default()
        };
        let req = request_with(vec![
            PairHistory {
                node_from: valid_node_bytes(1),
                node_to: valid_node_bytes(2),
                history: Some(stale),
            },
            PairHistory {
                node_from: valid_node_bytes(3),
                node_to: valid_node_bytes(4),
                history: Some(fresh_history(NOW)),
            },
        ]);
        validate_register_request(&req, THRESHOLD, NOW).unwrap();
    }

    #[test]
    fn test_sanitize_removes_only_stale_pairs() {
        let stale = PairData {
            success_time: NOW - 900,
            ..Default::default()
        };
        let mut req = request_with(vec![
            PairHistory {
                node_from: valid_node_bytes(1),
                node_to: valid_node_bytes(2),
                history: Some(fresh_history(NOW)),
            },
            PairHistory {
                node_from: valid_node_bytes(3),
                node_to: valid_node_bytes(4),
                history: Some(stale),
            },
        ]);
        assert_eq!(sanitize_register_request(&mut req, THRESHOLD, NOW), 1);
        assert_eq!(req.pairs.len(), 1);
        assert_eq!(req.pairs[0].node_from, valid_node_bytes(1));
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let stale = PairData {
            success_time: NOW - 900,
            ..Default::default()
        };
        let mut req = request_with(vec![
            PairHistory {
                node_from: valid_node_bytes(1),
                node_to: valid_node_bytes(2),
                history: Some(fresh_history(NOW)),
            },
            PairHistory {
                node_from: valid_node_bytes(3),
                node_to: valid_node_bytes(4),
                history: Some(stale),
            },
        ]);
        sanitize_register_request(&mut req, THRESHOLD, NOW);
        let after_first = req.pairs.clone();
        assert_eq!(sanitize_register_request(&mut req, THRESHOLD, NOW), 0);
        assert_eq!(req.pairs, after_first);
    }
}
