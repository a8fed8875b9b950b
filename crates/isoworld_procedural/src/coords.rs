//! # Coordinate Spaces
//!
//! Three integer spaces are in play:
//! - **tile**: absolute grid, unbounded in both directions
//! - **chunk**: absolute grid of [`CHUNK_SIZE`]-wide squares
//! - **local**: tile index `0..CHUNK_SIZE` inside one chunk
//!
//! Conversions use floor division and positive modulo, so tile `-1` lives in
//! chunk `-1` at local `CHUNK_SIZE - 1` rather than in chunk `0`.

use std::collections::VecDeque;

/// Chunk edge length in tiles.
pub const CHUNK_SIZE: usize = 24;

/// [`CHUNK_SIZE`] as a signed value for coordinate arithmetic.
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub const CHUNK_SIZE_I32: i32 = CHUNK_SIZE as i32;

/// Position of a chunk in the infinite chunk grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkCoord {
    /// Chunk column.
    pub x: i32,
    /// Chunk row.
    pub y: i32,
}

impl ChunkCoord {
    /// Creates a chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbor one chunk north (`y - 1`).
    #[inline]
    #[must_use]
    pub const fn north(self) -> Self {
        Self::new(self.x, self.y.wrapping_sub(1))
    }

    /// Neighbor one chunk south (`y + 1`).
    #[inline]
    #[must_use]
    pub const fn south(self) -> Self {
        Self::new(self.x, self.y.wrapping_add(1))
    }

    /// Neighbor one chunk west (`x - 1`).
    #[inline]
    #[must_use]
    pub const fn west(self) -> Self {
        Self::new(self.x.wrapping_sub(1), self.y)
    }

    /// Neighbor one chunk east (`x + 1`).
    #[inline]
    #[must_use]
    pub const fn east(self) -> Self {
        Self::new(self.x.wrapping_add(1), self.y)
    }

    /// Absolute tile of this chunk's local origin.
    ///
    /// Tile positions are `i32`, so only chunks within `i32::MAX / 24` of the
    /// origin have a distinct origin tile; farther chunks wrap.
    #[inline]
    #[must_use]
    pub const fn origin(self) -> TilePos {
        TilePos::new(
            self.x.wrapping_mul(CHUNK_SIZE_I32),
            self.y.wrapping_mul(CHUNK_SIZE_I32),
        )
    }

    /// Chebyshev distance in chunks.
    #[inline]
    #[must_use]
    pub fn chebyshev(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

/// Absolute tile coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TilePos {
    /// Tile column.
    pub x: i32,
    /// Tile row.
    pub y: i32,
}

impl TilePos {
    /// Creates a tile coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Tile containing a fractional absolute position.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn containing(x: f32, y: f32) -> Self {
        Self::new(x.floor() as i32, y.floor() as i32)
    }

    /// Splits into chunk and in-chunk index.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn to_local(self) -> (LocalTile, ChunkCoord) {
        let local = LocalTile {
            x: self.x.rem_euclid(CHUNK_SIZE_I32) as u8,
            y: self.y.rem_euclid(CHUNK_SIZE_I32) as u8,
        };
        let chunk = ChunkCoord::new(
            self.x.div_euclid(CHUNK_SIZE_I32),
            self.y.div_euclid(CHUNK_SIZE_I32),
        );
        (local, chunk)
    }

    /// Inverse of [`TilePos::to_local`].
    #[inline]
    #[must_use]
    pub const fn from_local(local: LocalTile, chunk: ChunkCoord) -> Self {
        Self::new(
            chunk.origin().x.wrapping_add(local.x as i32),
            chunk.origin().y.wrapping_add(local.y as i32),
        )
    }

    /// Manhattan distance.
    #[inline]
    #[must_use]
    pub const fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The four orthogonal neighbors, in N, S, W, E order.
    #[inline]
    #[must_use]
    pub const fn neighbors(self) -> [Self; 4] {
        [
            Self::new(self.x, self.y.wrapping_sub(1)),
            Self::new(self.x, self.y.wrapping_add(1)),
            Self::new(self.x.wrapping_sub(1), self.y),
            Self::new(self.x.wrapping_add(1), self.y),
        ]
    }
}

/// Tile index inside a chunk, each axis in `0..CHUNK_SIZE`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LocalTile {
    /// Column within the chunk.
    pub x: u8,
    /// Row within the chunk.
    pub y: u8,
}

/// Splits an absolute tile coordinate into `(local_x, local_y, cx, cy)`.
#[inline]
#[must_use]
pub const fn coordinates_to_local(abs_x: i32, abs_y: i32) -> (u8, u8, i32, i32) {
    let (local, chunk) = TilePos::new(abs_x, abs_y).to_local();
    (local.x, local.y, chunk.x, chunk.y)
}

/// Fractional position of an object: owning chunk plus local offset.
///
/// The local offset is kept in `[0, CHUNK_SIZE)` on both axes; building a
/// location from an absolute position always picks the chunk that contains it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Location {
    /// Owning chunk.
    pub chunk: ChunkCoord,
    /// Local column, fractional for moving objects.
    pub local_x: f32,
    /// Local row, fractional for moving objects.
    pub local_y: f32,
}

impl Location {
    /// Location at an integer local tile.
    #[must_use]
    pub fn at_tile(chunk: ChunkCoord, x: u8, y: u8) -> Self {
        Self {
            chunk,
            local_x: f32::from(x),
            local_y: f32::from(y),
        }
    }

    /// Location from an absolute fractional position.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_absolute(abs_x: f32, abs_y: f32) -> Self {
        let TilePos { x, y } = TilePos::containing(abs_x, abs_y);
        let chunk = ChunkCoord::new(x.div_euclid(CHUNK_SIZE_I32), y.div_euclid(CHUNK_SIZE_I32));
        let origin = chunk.origin();
        Self {
            chunk,
            local_x: (abs_x - origin.x as f32).clamp(0.0, CHUNK_SIZE as f32 - f32::EPSILON * 32.0),
            local_y: (abs_y - origin.y as f32).clamp(0.0, CHUNK_SIZE as f32 - f32::EPSILON * 32.0),
        }
    }

    /// Absolute fractional position.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn absolute(&self) -> (f32, f32) {
        let origin = self.chunk.origin();
        (origin.x as f32 + self.local_x, origin.y as f32 + self.local_y)
    }

    /// Absolute tile this location falls in.
    #[must_use]
    pub fn tile(&self) -> TilePos {
        let (x, y) = self.absolute();
        TilePos::containing(x, y)
    }
}

/// Walk through absolute tiles, consumed from the front as waypoints are reached.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    waypoints: VecDeque<TilePos>,
}

impl Path {
    /// Empty path: nothing to do.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Next waypoint.
    #[must_use]
    pub fn head(&self) -> Option<TilePos> {
        self.waypoints.front().copied()
    }

    /// Drops and returns the next waypoint.
    pub fn pop_head(&mut self) -> Option<TilePos> {
        self.waypoints.pop_front()
    }

    /// Returns true if there is nothing left to walk.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Remaining waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Remaining waypoints, head first.
    pub fn iter(&self) -> impl Iterator<Item = &TilePos> {
        self.waypoints.iter()
    }

    /// Last waypoint.
    #[must_use]
    pub fn goal(&self) -> Option<TilePos> {
        self.waypoints.back().copied()
    }
}

impl FromIterator<TilePos> for Path {
    fn from_iter<I: IntoIterator<Item = TilePos>>(iter: I) -> Self {
        Self {
            waypoints: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<TilePos>> for Path {
    fn from(waypoints: Vec<TilePos>) -> Self {
        Self {
            waypoints: waypoints.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_to_local_negative() {
        assert_eq!(coordinates_to_local(0, 0), (0, 0, 0, 0));
        assert_eq!(coordinates_to_local(23, 5), (23, 5, 0, 0));
        assert_eq!(coordinates_to_local(24, 5), (0, 5, 1, 0));
        assert_eq!(coordinates_to_local(-1, -1), (23, 23, -1, -1));
        assert_eq!(coordinates_to_local(-24, -25), (0, 23, -1, -2));
    }

    #[test]
    fn test_tile_round_trip() {
        for a in -100..100 {
            let tile = TilePos::new(a, -a * 3);
            let (local, chunk) = tile.to_local();
            assert!(usize::from(local.x) < CHUNK_SIZE && usize::from(local.y) < CHUNK_SIZE);
            assert_eq!(TilePos::from_local(local, chunk), tile, "round trip failed for {tile:?}");
        }
    }

    #[test]
    fn test_location_from_absolute() {
        let loc = Location::from_absolute(25.0, 12.0);
        assert_eq!(loc.chunk, ChunkCoord::new(1, 0));
        assert!((loc.local_x - 1.0).abs() < 1e-5);
        assert!((loc.local_y - 12.0).abs() < 1e-5);

        let neg = Location::from_absolute(-0.5, 3.0);
        assert_eq!(neg.chunk, ChunkCoord::new(-1, 0));
        assert!((neg.local_x - 23.5).abs() < 1e-5);
        assert_eq!(neg.tile(), TilePos::new(-1, 3));
    }

    #[test]
    fn test_chunk_neighbors() {
        let c = ChunkCoord::new(3, -2);
        assert_eq!(c.north(), ChunkCoord::new(3, -3));
        assert_eq!(c.south(), ChunkCoord::new(3, -1));
        assert_eq!(c.west(), ChunkCoord::new(2, -2));
        assert_eq!(c.east(), ChunkCoord::new(4, -2));
        assert_eq!(c.chebyshev(ChunkCoord::new(0, 0)), 3);
    }

    #[test]
    fn test_neighbors_wrap_at_range_edges() {
        let far = ChunkCoord::new(i32::MAX, i32::MIN);
        assert_eq!(far.east(), ChunkCoord::new(i32::MIN, i32::MIN));
        assert_eq!(far.north(), ChunkCoord::new(i32::MAX, i32::MAX));
        assert_eq!(far.east().west(), far);
        let wrapped = TilePos::new(i32::MAX.wrapping_mul(24), i32::MIN.wrapping_mul(24));
        assert_eq!(far.origin(), wrapped);
        assert_eq!(ChunkCoord::new(-3, 4).origin(), TilePos::new(-72, 96));
    }

    #[test]
    fn test_path_consumption() {
        let mut path: Path = vec![TilePos::new(0, 0), TilePos::new(1, 0)].into();
        assert_eq!(path.goal(), Some(TilePos::new(1, 0)));
        assert_eq!(path.pop_head(), Some(TilePos::new(0, 0)));
        assert_eq!(path.head(), Some(TilePos::new(1, 0)));
        path.pop_head();
        assert!(path.is_empty());
        assert_eq!(path.pop_head(), None);
    }
}
