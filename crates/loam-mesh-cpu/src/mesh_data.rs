use loam_geom::{Aabb, Vec3};

use crate::face::Face;

/// Flat vertex streams for one chunk, ready to hand to a renderer.
///
/// `pos` is xyz per vertex, `uv` is uv per vertex, `col` is rgba per vertex
/// and `idx` is a triangle list. No normals: consumers derive them from the
/// triangles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub pos: Vec<f32>,
    pub uv: Vec<f32>,
    pub col: Vec<u8>,
    pub idx: Vec<u32>,
}

impl MeshData {
    /// Clears all arrays but retains capacity for reuse.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.pos.clear();
        self.uv.clear();
        self.col.clear();
        self.idx.clear();
    }

    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.pos.reserve(n_quads * 4 * 3);
        self.uv.reserve(n_quads * 4 * 2);
        self.col.reserve(n_quads * 4 * 4);
        self.idx.reserve(n_quads * 6);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.idx.len() / 3
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.idx.len() / 6
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    #[inline]
    pub fn vertex(&self, i: usize) -> Vec3 {
        Vec3::new(self.pos[i * 3], self.pos[i * 3 + 1], self.pos[i * 3 + 2])
    }

    #[inline]
    pub fn uv_at(&self, i: usize) -> (f32, f32) {
        (self.uv[i * 2], self.uv[i * 2 + 1])
    }

    pub fn triangle(&self, t: usize) -> [Vec3; 3] {
        let i = &self.idx[t * 3..t * 3 + 3];
        [
            self.vertex(i[0] as usize),
            self.vertex(i[1] as usize),
            self.vertex(i[2] as usize),
        ]
    }

    /// Local-space bounds of every vertex, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points((0..self.vertex_count()).map(|i| self.vertex(i)))
    }

    /// Appends the quad for `face` of the voxel centered at `center`.
    pub fn add_face(&mut self, face: Face, center: Vec3, band: (f32, f32), rgba: [u8; 4]) {
        let base = self.vertex_count() as u32;
        let (v0, v1) = band;
        let band_corners = [(0.0, v0), (0.0, v1), (1.0, v0), (1.0, v1)];
        let order = face.uv_order();
        for (corner, slot) in face.corners().into_iter().zip(order) {
            let p = center + corner;
            self.pos.extend_from_slice(&[p.x, p.y, p.z]);
            let (u, v) = band_corners[slot];
            self.uv.extend_from_slice(&[u, v]);
            self.col.extend_from_slice(&rgba);
        }
        self.idx
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 1, base + 3]);
    }
}
