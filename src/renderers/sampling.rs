// Copyright @yucwang 2026

use serde::Deserialize;

use crate::core::rng::LcgRng;
use crate::math::constants::Float;

const POISSON_4: [(Float, Float); 4] = [(0.3, 0.3), (0.7, 0.3), (0.3, 0.7), (0.7, 0.7)];

const POISSON_8: [(Float, Float); 8] = [
    (0.2, 0.2), (0.7, 0.2), (0.3, 0.5), (0.8, 0.5),
    (0.2, 0.8), (0.7, 0.8), (0.5, 0.3), (0.5, 0.7),
];

/// Maximum extra jitter inside a cell of the 16-sample Poisson layout.
const POISSON_16_JITTER: Float = 0.15;

/// Where sub-pixel samples land inside a pixel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplePattern {
    Random,
    RegularGrid,
    Jittered,
    Poisson,
    /// One random point per horizontal stratum, alternating between the
    /// upper and lower half of the pixel.
    Stratified,
}

impl SamplePattern {
    /// Offset of sample `index` out of `total` within the pixel, in `[0, 1)`
    /// on both axes (a Poisson 16 sample may reach slightly past its cell).
    pub fn offset(&self, index: u32, total: u32, rng: &mut LcgRng) -> (Float, Float) {
        let total = total.max(1);
        match self {
            SamplePattern::Random => (rng.next_float(), rng.next_float()),
            SamplePattern::RegularGrid => {
                let (cx, cy, size) = grid_cell(index, total);
                ((cx + 0.5) / size, (cy + 0.5) / size)
            }
            SamplePattern::Jittered => jittered(index, total, rng),
            SamplePattern::Poisson => match total {
                4 => POISSON_4[(index % 4) as usize],
                8 => POISSON_8[(index % 8) as usize],
                16 => {
                    let x = (index % 4) as Float / 4.0 + rng.next_float() * POISSON_16_JITTER;
                    let y = (index / 4 % 4) as Float / 4.0 + rng.next_float() * POISSON_16_JITTER;
                    (x, y)
                }
                _ => jittered(index, total, rng),
            },
            SamplePattern::Stratified => {
                let n = total as Float;
                let x = index as Float / n + rng.next_float() / n;
                let y = (index % 2) as Float / 2.0 + rng.next_float() / 2.0;
                (x, y)
            }
        }
    }
}

fn grid_cell(index: u32, total: u32) -> (Float, Float, Float) {
    let size = (total as Float).sqrt().ceil().max(1.0) as u32;
    let x = index % size;
    let y = index / size;
    (x as Float, y as Float, size as Float)
}

fn jittered(index: u32, total: u32, rng: &mut LcgRng) -> (Float, Float) {
    let (cx, cy, size) = grid_cell(index, total);
    ((cx + rng.next_float()) / size, (cy + rng.next_float()) / size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_grid_centers() {
        let mut rng = LcgRng::new(0);
        let offsets: Vec<(Float, Float)> = (0..4)
            .map(|i| SamplePattern::RegularGrid.offset(i, 4, &mut rng))
            .collect();
        assert_eq!(offsets, vec![(0.25, 0.25), (0.75, 0.25), (0.25, 0.75), (0.75, 0.75)]);
        assert_eq!(SamplePattern::RegularGrid.offset(0, 1, &mut rng), (0.5, 0.5));
    }

    #[test]
    fn test_poisson_tables() {
        let mut rng = LcgRng::new(0);
        assert_eq!(SamplePattern::Poisson.offset(1, 4, &mut rng), (0.7, 0.3));
        assert_eq!(SamplePattern::Poisson.offset(6, 8, &mut rng), (0.5, 0.3));

        let (x, y) = SamplePattern::Poisson.offset(5, 16, &mut rng);
        assert!(x >= 0.25 && x < 0.25 + POISSON_16_JITTER);
        assert!(y >= 0.25 && y < 0.25 + POISSON_16_JITTER);
    }

    #[test]
    fn test_random_patterns_stay_in_pixel() {
        let mut rng = LcgRng::new(77);
        let patterns = [
            SamplePattern::Random,
            SamplePattern::Jittered,
            SamplePattern::Stratified,
            SamplePattern::Poisson,
        ];
        for pattern in patterns.iter() {
            for total in [1u32, 2, 3, 5, 9].iter() {
                for index in 0..*total {
                    let (x, y) = pattern.offset(index, *total, &mut rng);
                    assert!((0.0..1.0).contains(&x), "{:?} x={}", pattern, x);
                    assert!((0.0..1.0).contains(&y), "{:?} y={}", pattern, y);
                }
            }
        }
    }

    #[test]
    fn test_stratified_strata() {
        let mut rng = LcgRng::new(5);
        for index in 0..4u32 {
            let (x, y) = SamplePattern::Stratified.offset(index, 4, &mut rng);
            assert!(x >= index as Float / 4.0 && x < (index + 1) as Float / 4.0);
            if index % 2 == 0 {
                assert!(y < 0.5);
            } else {
                assert!(y >= 0.5);
            }
        }
    }
}
