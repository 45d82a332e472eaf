use loam_geom::{Aabb, Vec3};
use loam_mesh_cpu::MeshData;
use loam_world::ChunkCoord;

/// Stable handle to a pooled chunk record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub u32);

impl SlotId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Placed chunk as a renderer sees it. Records are reused, never freed;
/// `generation` increments on every placement so consumers can spot reuse.
#[derive(Clone, Debug, Default)]
pub struct Chunk {
    pub coord: ChunkCoord,
    pub origin: Vec3,
    pub mesh: MeshData,
    /// Chunk-local mesh bounds.
    pub bounds: Option<Aabb>,
    pub active: bool,
    pub generation: u64,
}

impl Chunk {
    #[inline]
    pub fn world_bounds(&self) -> Option<Aabb> {
        self.bounds.map(|b| b.translated(self.origin))
    }
}

/// Slot arena with an active list and a LIFO free list.
#[derive(Debug, Default)]
pub struct ChunkPool {
    slots: Vec<Chunk>,
    active: Vec<SlotId>,
    inactive: Vec<SlotId>,
}

impl ChunkPool {
    /// Pool with `n` idle slots; the lowest slot is handed out first.
    pub fn with_capacity(n: usize) -> Self {
        let mut pool = Self::default();
        pool.reserve(n);
        pool
    }

    /// Grows the pool until it owns at least `n` slots.
    pub fn reserve(&mut self, n: usize) {
        if self.slots.len() >= n {
            return;
        }
        let start = self.slots.len();
        self.slots.resize_with(n, Chunk::default);
        // Push highest first so pops come out in ascending order.
        self.inactive
            .extend((start..n).rev().map(|i| SlotId(i as u32)));
    }

    /// Claims a slot and overwrites it entirely with the new placement.
    pub fn place(&mut self, coord: ChunkCoord, origin: Vec3, mesh: MeshData) -> SlotId {
        let slot = match self.inactive.pop() {
            Some(s) => s,
            None => {
                self.slots.push(Chunk::default());
                SlotId((self.slots.len() - 1) as u32)
            }
        };
        let chunk = &mut self.slots[slot.index()];
        chunk.bounds = mesh.bounds();
        chunk.coord = coord;
        chunk.origin = origin;
        chunk.mesh = mesh;
        chunk.active = true;
        chunk.generation += 1;
        self.active.push(slot);
        slot
    }

    /// Returns an active slot to the free list. The mesh is dropped; `coord`
    /// and `origin` stay readable until the slot is placed again.
    pub fn release(&mut self, slot: SlotId) -> bool {
        let Some(pos) = self.active.iter().position(|s| *s == slot) else {
            return false;
        };
        self.active.swap_remove(pos);
        let chunk = &mut self.slots[slot.index()];
        chunk.active = false;
        chunk.mesh = MeshData::default();
        chunk.bounds = None;
        self.inactive.push(slot);
        true
    }

    #[inline]
    pub fn get(&self, slot: SlotId) -> Option<&Chunk> {
        self.slots.get(slot.index())
    }

    #[inline]
    pub fn active(&self) -> &[SlotId] {
        &self.active
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (SlotId, &Chunk)> + '_ {
        self.active.iter().map(|s| (*s, &self.slots[s.index()]))
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    #[inline]
    pub fn inactive_count(&self) -> usize {
        self.inactive.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
