// Copyright @yucwang 2026

use crate::math::constants::Float;

/// Small deterministic generator. Each pixel sample gets its own stream
/// derived from the process seed, so results do not depend on which worker
/// thread picked up a tile.
#[derive(Debug, Clone)]
pub struct LcgRng {
    state: u64,
}

impl LcgRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Stream for one pixel of one render pass. The inputs are scrambled so
    /// neighbouring pixels do not start from correlated states.
    pub fn for_pixel(seed: u64, pass: u64, x: usize, y: usize) -> Self {
        let packed = ((seed & 0xFFFF) << 48)
            | ((pass & 0xFFFF) << 32)
            | (((y as u64) & 0xFFFF) << 16)
            | ((x as u64) & 0xFFFF);
        Self::new(splitmix64(packed ^ seed.rotate_left(17)))
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.state >> 32) as u32
    }

    /// Uniform in `[0, 1)`.
    pub fn next_float(&mut self) -> Float {
        (self.next_u32() as Float) / (u32::MAX as Float + 1.0)
    }
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
