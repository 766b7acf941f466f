use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// FNV-1a 64-bit over raw bytes.
///
/// `DefaultHasher` is randomized per process, which would make cell content
/// differ between sessions; this stays stable across runs and platforms.
pub fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut state = FNV_OFFSET_BASIS;
    for &byte in bytes {
        state ^= u64::from(byte);
        state = state.wrapping_mul(FNV_PRIME);
    }
    state
}

/// Deterministic draw in `[0, 1)` for a seed string.
///
/// The hash seeds a ChaCha stream so that near-identical keys ("0:1" vs
/// "0:2") still land far apart in the unit interval.
pub fn unit_interval(key: &str) -> f64 {
    let mut rng = ChaCha8Rng::seed_from_u64(fnv1a_64(key.as_bytes()));
    rng.gen::<f64>()
}
