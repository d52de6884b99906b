//! Deterministic random number generation.
//!
//! RULE: No randomizer may call a platform RNG while generating.
//! All randomness flows through one RandomSource per run, handed to
//! every randomizer as a SharedSource at construction time.
//!
//! A SharedSource is a handle, not a copy: cloning it shares the same
//! stream. Copying the generator itself would fork the stream and break
//! replay, so RandomSource is not Clone.
//!
//! SharedSource is !Send. Work spread over threads takes one source per
//! thread from a SourceBank, seeded from (master_seed, stream_index).

use crate::error::{RandomizerError, RandomizerResult};
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;
use std::cell::RefCell;
use std::fmt;
use std::num::NonZeroU64;
use std::rc::Rc;

/// Environment variable consulted when no explicit seed is supplied.
pub const SEED_ENV_VAR: &str = "RANDBEANS_SEED";

/// A seeded PCG stream. Same seed + same calls = same outputs.
pub struct RandomSource {
    seed:  u64,
    inner: Pcg64Mcg,
}

impl RandomSource {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Seed from OS entropy. The drawn seed is kept so the run can be replayed.
    pub fn from_entropy() -> Self {
        let seed = rand::random::<u64>();
        log::info!("Random source seeded from entropy: {seed}");
        Self::from_seed(seed)
    }

    /// Resolve a seed (explicit, then RANDBEANS_SEED, then entropy) and build a source.
    pub fn resolve(explicit: Option<u64>) -> RandomizerResult<Self> {
        let env_value = std::env::var(SEED_ENV_VAR).ok();
        let (seed, origin) = resolve_seed(explicit, env_value.as_deref())?;
        log::info!("Random source seeded from {origin}: {seed}");
        Ok(Self::from_seed(seed))
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Roll a u64 in [0, n) without modulo bias.
    ///
    /// Draws below `2^64 mod n` are rejected so every residue is backed by
    /// the same number of raw outputs.
    pub fn next_u64_below(&mut self, n: u64) -> RandomizerResult<u64> {
        let n = NonZeroU64::new(n).ok_or(RandomizerError::NonPositiveBound { bound: 0 })?;
        Ok(self.next_below(n))
    }

    /// Infallible form of [`next_u64_below`](Self::next_u64_below).
    pub fn next_below(&mut self, n: NonZeroU64) -> u64 {
        let n = n.get();
        let threshold = n.wrapping_neg() % n;
        loop {
            let x = self.inner.next_u64();
            if x >= threshold {
                return x % n;
            }
        }
    }

    /// Roll an int in [0, bound). A bound of zero or less is a caller error.
    pub fn next_int(&mut self, bound: i32) -> RandomizerResult<i32> {
        if bound <= 0 {
            return Err(RandomizerError::invalid_argument(format!(
                "bound must be positive, got {bound}"
            )));
        }
        let value = self.next_u64_below(bound as u64)?;
        Ok(value as i32)
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    pub fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    pub fn into_shared(self) -> SharedSource {
        SharedSource(Rc::new(RefCell::new(self)))
    }
}

impl fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomSource").field("seed", &self.seed).finish_non_exhaustive()
    }
}

/// Handle to the one RandomSource of a generation run.
///
/// Each method borrows the source only for the duration of a single draw,
/// so randomizers may call into each other between draws.
#[derive(Clone, Debug)]
pub struct SharedSource(Rc<RefCell<RandomSource>>);

impl SharedSource {
    pub fn from_seed(seed: u64) -> Self {
        RandomSource::from_seed(seed).into_shared()
    }

    pub fn seed(&self) -> u64 {
        self.0.borrow().seed()
    }

    pub fn next_u64(&self) -> u64 {
        self.0.borrow_mut().next_u64()
    }

    pub fn next_u64_below(&self, n: u64) -> RandomizerResult<u64> {
        self.0.borrow_mut().next_u64_below(n)
    }

    pub fn next_below(&self, n: NonZeroU64) -> u64 {
        self.0.borrow_mut().next_below(n)
    }

    pub fn next_int(&self, bound: i32) -> RandomizerResult<i32> {
        self.0.borrow_mut().next_int(bound)
    }

    pub fn next_f64(&self) -> f64 {
        self.0.borrow_mut().next_f64()
    }

    pub fn fill_bytes(&self, dest: &mut [u8]) {
        self.0.borrow_mut().fill_bytes(dest);
    }

    /// True when both handles drive the same stream.
    pub fn same_stream(&self, other: &SharedSource) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<RandomSource> for SharedSource {
    fn from(source: RandomSource) -> Self {
        source.into_shared()
    }
}

/// Independent per-stream sources derived from one master seed.
pub struct SourceBank {
    master_seed: u64,
}

impl SourceBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// The stream index must stay stable for a given consumer, or its
    /// output changes.
    pub fn source_for(&self, stream_index: u64) -> RandomSource {
        let derived_seed = self.master_seed ^ stream_index.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        RandomSource::from_seed(derived_seed)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedOrigin {
    Explicit,
    Environment,
    Entropy,
}

impl fmt::Display for SeedOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Explicit    => "explicit seed",
            Self::Environment => SEED_ENV_VAR,
            Self::Entropy     => "entropy",
        };
        f.write_str(name)
    }
}

/// Pick the run seed: explicit wins, then the environment value, then entropy.
pub fn resolve_seed(
    explicit: Option<u64>,
    env_value: Option<&str>,
) -> RandomizerResult<(u64, SeedOrigin)> {
    if let Some(seed) = explicit {
        return Ok((seed, SeedOrigin::Explicit));
    }
    match env_value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => {
            let seed = raw.parse::<u64>().map_err(|e| {
                RandomizerError::invalid_argument(format!("{SEED_ENV_VAR}={raw:?} is not a u64: {e}"))
            })?;
            Ok((seed, SeedOrigin::Environment))
        }
        None => Ok((rand::random::<u64>(), SeedOrigin::Entropy)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = RandomSource::from_seed(12345);
        let mut b = RandomSource::from_seed(12345);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn next_int_stays_below_bound() {
        let mut rng = RandomSource::from_seed(7);
        for bound in [1, 2, 3, 7, 100, i32::MAX] {
            for _ in 0..200 {
                let v = rng.next_int(bound).unwrap();
                assert!((0..bound).contains(&v), "{v} not in [0, {bound})");
            }
        }
    }

    #[test]
    fn next_int_rejects_non_positive_bound() {
        let mut rng = RandomSource::from_seed(7);
        assert!(matches!(rng.next_int(0), Err(RandomizerError::InvalidArgument { .. })));
        assert!(matches!(rng.next_int(-3), Err(RandomizerError::InvalidArgument { .. })));
        assert!(matches!(rng.next_u64_below(0), Err(RandomizerError::NonPositiveBound { .. })));
    }

    #[test]
    fn next_u64_below_covers_every_residue() {
        let mut rng = RandomSource::from_seed(99);
        let mut seen = [false; 6];
        for _ in 0..1_000 {
            seen[rng.next_u64_below(6).unwrap() as usize] = true;
        }
        assert!(seen.iter().all(|s| *s), "Some residues never drawn: {seen:?}");
    }

    #[test]
    fn next_f64_is_unit_interval() {
        let mut rng = RandomSource::from_seed(3);
        for _ in 0..1_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn shared_handles_advance_one_stream() {
        let a = SharedSource::from_seed(42);
        let b = a.clone();
        assert!(a.same_stream(&b));

        let mut reference = RandomSource::from_seed(42);
        let first = reference.next_u64();
        let second = reference.next_u64();

        assert_eq!(a.next_u64(), first);
        assert_eq!(b.next_u64(), second, "Clone must continue the stream, not restart it");
    }

    #[test]
    fn bank_streams_are_stable_and_distinct() {
        let bank = SourceBank::new(0xDEAD_BEEF);
        let mut s0 = bank.source_for(0);
        let mut s0_again = bank.source_for(0);
        let mut s1 = bank.source_for(1);

        let a = s0.next_u64();
        assert_eq!(a, s0_again.next_u64());
        assert_ne!(a, s1.next_u64());
    }

    #[test]
    fn seed_resolution_order() {
        assert_eq!(resolve_seed(Some(5), Some("9")).unwrap(), (5, SeedOrigin::Explicit));
        assert_eq!(resolve_seed(None, Some(" 9 ")).unwrap(), (9, SeedOrigin::Environment));
        let (_, origin) = resolve_seed(None, None).unwrap();
        assert_eq!(origin, SeedOrigin::Entropy);
        let (_, origin) = resolve_seed(None, Some("")).unwrap();
        assert_eq!(origin, SeedOrigin::Entropy);
        assert!(resolve_seed(None, Some("not-a-seed")).is_err());
    }
}
