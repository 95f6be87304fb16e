//! Snapshot digests for reproducibility checks.
//!
//! FNV-1a over a fixed little-endian encoding. Not cryptographically
//! secure; used to compare runs compactly.

use shelf_obs::EstimateSnapshot;
use shelf_sim::GroundTruthSnapshot;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash = (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME);
    }
    hash
}

#[inline]
fn fnv1a_u32(hash: u64, v: u32) -> u64 {
    fnv1a_bytes(hash, &v.to_le_bytes())
}

#[inline]
fn fnv1a_u64(hash: u64, v: u64) -> u64 {
    fnv1a_bytes(hash, &v.to_le_bytes())
}

/// Digest of a ground-truth snapshot.
///
/// Covers the step, capacity, shelf count and every quantity in shelf
/// order, so any difference in trajectory position or distribution changes
/// the digest.
pub fn snapshot_digest(truth: &GroundTruthSnapshot) -> u64 {
    let mut hash = FNV_OFFSET;
    hash = fnv1a_u64(hash, truth.step().0);
    hash = fnv1a_u32(hash, truth.capacity());
    hash = fnv1a_u64(hash, truth.len() as u64);
    for &q in truth.quantities() {
        hash = fnv1a_u32(hash, q);
    }
    hash
}

/// Digest of an estimate snapshot's records.
///
/// A never-observed estimate hashes differently from an observed zero.
pub fn estimate_digest(estimates: &EstimateSnapshot) -> u64 {
    let mut hash = FNV_OFFSET;
    hash = fnv1a_u64(hash, estimates.step().0);
    hash = fnv1a_u32(hash, estimates.unobservable().0);
    for r in estimates.records() {
        match r.estimated_quantity {
            Some(q) => {
                hash = fnv1a_bytes(hash, &[1]);
                hash = fnv1a_u64(hash, q as u64);
            }
            None => hash = fnv1a_bytes(hash, &[0]),
        }
        hash = fnv1a_u64(hash, r.last_observed_step.map_or(u64::MAX, |s| s.0));
        hash = fnv1a_u64(hash, r.uncertainty.0);
    }
    hash
}
