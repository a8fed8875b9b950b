//! # Noise Fields
//!
//! Deterministic 2D coherent noise, one [`NoiseField`] per climate channel.
//!
//! ## Determinism Guarantee
//!
//! Given the same [`WorldSeed`], a field produces **exactly** the same values
//! on any platform and across process restarts. The permutation table is
//! shuffled by a `ChaCha8` stream, whose output is specified independently of
//! the host.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::coords::ChunkCoord;

/// World seed for deterministic generation.
///
/// Every noise field and per-chunk random stream derives from this value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Seed shifted by a fixed offset, used to decorrelate climate channels.
    #[inline]
    #[must_use]
    pub const fn offset(self, by: u64) -> Self {
        Self(self.0.wrapping_add(by))
    }

    /// Seed of the random stream owned by the chunk at `coord`.
    ///
    /// Depends only on the world seed and the coordinate, so regenerating a
    /// chunk replays the same stream regardless of how many chunks exist.
    #[must_use]
    pub const fn for_chunk(self, coord: ChunkCoord) -> u64 {
        let packed = ((coord.x as u32 as u64) << 32) | (coord.y as u32 as u64);
        mix(self.0 ^ mix(packed))
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0x1503_2A7E_5EED_0001)
    }
}

/// `SplitMix64` finalizer.
#[inline]
const fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Gradient directions for 2D simplex corners.
const GRADIENTS: [[f64; 2]; 8] = [
    [1.0, 0.0],
    [-1.0, 0.0],
    [0.0, 1.0],
    [0.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [-1.0, -1.0],
];

/// Skewing factor for the 2D simplex grid, (sqrt(3) - 1) / 2.
const F2: f64 = 0.366_025_403_784_438_6;
/// Unskewing factor for the 2D simplex grid, (3 - sqrt(3)) / 6.
const G2: f64 = 0.211_324_865_405_187_1;

/// Seeded 2D simplex noise.
///
/// # Example
///
/// ```rust
/// use isoworld_procedural::{NoiseField, WorldSeed};
///
/// let elevation = NoiseField::new(WorldSeed::new(42));
/// let value = elevation.sample(10.5, -3.25);
/// assert!((-1.0..=1.0).contains(&value));
/// ```
pub struct NoiseField {
    /// 256-entry permutation, doubled so corner hashing never wraps.
    perm: [u8; 512],
}

impl NoiseField {
    /// Builds a field from a seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        let mut base: Vec<u8> = (0..=255).collect();
        base.shuffle(&mut ChaCha8Rng::seed_from_u64(seed.value()));

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = base[i & 255];
        }
        Self { perm }
    }

    #[inline]
    fn hash(&self, i: i64, j: i64) -> usize {
        // Masking keeps the index in 0..256 for negative lattice points too.
        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;
        self.perm[ii + self.perm[jj] as usize] as usize
    }

    #[inline]
    fn corner(&self, x: f64, y: f64, hash: usize) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t <= 0.0 {
            return 0.0;
        }
        let [gx, gy] = GRADIENTS[hash & 7];
        let t2 = t * t;
        t2 * t2 * (gx * x + gy * y)
    }

    /// Samples the field.
    ///
    /// # Returns
    ///
    /// A value in `[-1, 1]`, continuous in `x` and `y`.
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let skew = (x + y) * F2;
        let i = (x + skew).floor();
        let j = (y + skew).floor();

        let unskew = (i + j) * G2;
        let x0 = x - (i - unskew);
        let y0 = y - (j - unskew);

        let (i1, j1) = if x0 > y0 { (1.0, 0.0) } else { (0.0, 1.0) };
        let x1 = x0 - i1 + G2;
        let y1 = y0 - j1 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        #[allow(clippy::cast_possible_truncation)]
        let (ii, jj) = (i as i64, j as i64);
        #[allow(clippy::cast_possible_truncation)]
        let (di, dj) = (i1 as i64, j1 as i64);

        let n0 = self.corner(x0, y0, self.hash(ii, jj));
        let n1 = self.corner(x1, y1, self.hash(ii + di, jj + dj));
        let n2 = self.corner(x2, y2, self.hash(ii + 1, jj + 1));

        (70.0 * (n0 + n1 + n2)).clamp(-1.0, 1.0)
    }

    /// Samples the field and maps `[-1, 1]` onto `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn sample_normalized(&self, x: f64, y: f64) -> f64 {
        (self.sample(x, y) + 1.0) * 0.5
    }
}
