//! Seedable PCG32 for cluster initialization.
//!
//! The quantizer is the only randomized stage. Keeping the generator
//! small, local, and explicitly seeded makes runs reproducible: the same
//! bytes and the same [`PipelineConfig`](crate::PipelineConfig) always
//! produce the same shape list.

/// PCG32 default multiplier.
const PCG_MULT: u64 = 6364136223846793005;
/// PCG32 default increment base.
const PCG_INIT: u64 = 0x853c49e6748fea9b;

/// Small PCG32 generator.
#[derive(Debug, Clone)]
pub struct Pcg32 {
    state: u64,
    inc: u64,
}

impl Pcg32 {
    /// Create a new generator from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut rng = Self { state: 0, inc: 1 };
        rng.next_u32();
        rng.state = rng.state.wrapping_add(PCG_INIT.wrapping_add(seed));
        rng.next_u32();
        rng
    }

    /// Generate the next 32-bit random value.
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = old.wrapping_mul(PCG_MULT).wrapping_add(self.inc | 1);
        let xorshifted = (((old >> 18) ^ old) >> 27) as u32;
        let rot = (old >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Uniform index in `[0, bound)`. Returns 0 for an empty bound.
    pub fn next_index(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        (self.next_u32() as usize) % bound
    }
}
