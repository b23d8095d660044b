//! Seeded uniform random source feeding the motion generator.
//!
//! This is a splitmix64 generator behind the `rand_core` traits. The point of
//! owning the implementation rather than reaching for `StdRng` is that the
//! recorded motion regression fixtures must stay bit-stable across dependency
//! upgrades; `StdRng` makes no such promise between `rand` releases.

use rand_core::{impls, Error, RngCore, SeedableRng};

const GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Deterministic uniform generator. Identical seeds produce identical output
/// sequences, which the motion tests rely on.
#[derive(Clone, Debug)]
pub struct PseudoRandomSource {
    state: u64,
}

impl PseudoRandomSource {
    /// Next uniform double in [0, 1), built from the top 53 bits.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

impl RngCore for PseudoRandomSource {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for PseudoRandomSource {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            state: u64::from_le_bytes(seed),
        }
    }

    /// The seed is the initial state, with no mixing. Mixing for correlated
    /// seeds happens where the per-axis generators are derived.
    fn seed_from_u64(state: u64) -> Self {
        Self { state }
    }
}
