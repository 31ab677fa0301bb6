//! Merging two observations of the same directed pair.
//!
//! Contributors report independently and out of order, so two histories for
//! the same pair may disagree. The merge keeps the record consistent with
//! the probabilistic liquidity model: the band between the largest known
//! success amount and the smallest recent failure amount is where the
//! channel balance is believed to lie.
//!
//! The rules, applied in order:
//!
//! 1. A strictly newer success takes the new success time and the *larger*
//!    of the two success amounts. A larger past success proves more
//!    liquidity was available; shrinking the band on a later but smaller
//!    success would discard evidence.
//! 2. A strictly newer failure replaces the failure fields, unless it would
//!    *raise* the failure amount within the relaxation window of the
//!    previous failure. Out-of-order HTLC failure reports must not
//!    prematurely relax a tighter bound. An amount-independent failure
//!    (amount zero) invalidates all success evidence; a failure inside the
//!    success band pushes the success amount just below it.
//! 3. A success at or above the known failure amount pushes the failure
//!    amount one millisatoshi above the success. Nothing above the success
//!    was learned, so the failure evidence is displaced, not cleared.
//! 4. The satoshi fields are rederived from the millisatoshi fields.

use lncoord_types::PairData;

/// Merge `update` into `existing`, in place.
///
/// Pure: no I/O and no clock. `min_failure_relax_interval_secs` is the
/// window within which a newer failure may not raise the failure amount.
pub fn merge_pair_data(
    existing: &mut PairData,
    update: &PairData,
    min_failure_relax_interval_secs: i64,
) {
    // Newer success observation.
    if update.success_time > existing.success_time {
        existing.success_time = update.success_time;
        if update.success_amt_msat > existing.success_amt_msat {
            existing.success_amt_msat = update.success_amt_msat;
        }
    }

    // Newer failure observation.
    if update.fail_time > existing.fail_time {
        let relaxes_too_soon = update.fail_amt_msat > existing.fail_amt_msat
            && update.fail_time - existing.fail_time < min_failure_relax_interval_secs;

        if !relaxes_too_soon {
            existing.fail_time = update.fail_time;
            existing.fail_amt_msat = update.fail_amt_msat;

            if update.fail_amt_msat == 0 {
                // Amount-independent failure: no amount is currently
                // routable, all prior success evidence is void.
                existing.success_amt_msat = 0;
            } else if update.fail_amt_msat <= existing.success_amt_msat {
                // The failure invades the success band.
                existing.success_amt_msat = update.fail_amt_msat - 1;
            }
        }
    }

    // A real success at or beyond the failure amount displaces the failure
    // band upwards. A zero success amount carries no liquidity evidence.
    if existing.fail_time != 0
        && update.success_amt_msat > 0
        && update.success_amt_msat >= existing.fail_amt_msat
    {
        existing.fail_amt_msat = update.success_amt_msat + 1;
    }

    existing.rederive_sat_fields();
}
