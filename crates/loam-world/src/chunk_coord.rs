use serde::{Deserialize, Serialize};

/// Chunk address in chunk units. Equality and hashing are by value, which is
/// what in-flight deduplication keys on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            cz: self.cz + dz,
        }
    }

    /// Chunk containing the world-space column at `(x, z)`; always layer 0.
    #[inline]
    pub fn containing(x: f32, z: f32, chunk_size: usize) -> Self {
        let s = chunk_size as f32;
        Self::new((x / s).floor() as i32, 0, (z / s).floor() as i32)
    }

    /// World-space block origin of this chunk.
    #[inline]
    pub fn origin(self, chunk_size: usize, chunk_height: usize) -> (i32, i32, i32) {
        (
            self.cx * chunk_size as i32,
            self.cy * chunk_height as i32,
            self.cz * chunk_size as i32,
        )
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<ChunkCoord> for (i32, i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cy, value.cz)
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.cx, self.cy, self.cz)
    }
}
