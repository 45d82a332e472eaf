use loam_blocks::{BlockData, BlockType};
use loam_chunk::VoxelField;
use loam_mesh_cpu::{Face, build_chunk_mesh};
use loam_world::ChunkCoord;
use proptest::prelude::*;

fn exposed_faces(f: &VoxelField) -> usize {
    let mut n = 0;
    for y in 0..f.sy {
        for z in f.interior() {
            for x in f.interior() {
                if !f.get_local(x, y, z).is_solid() {
                    continue;
                }
                for face in Face::ALL {
                    let (dx, dy, dz) = face.delta();
                    let nb = f.get_checked(x as i32 + dx, y as i32 + dy, z as i32 + dz);
                    if !matches!(nb, Some(b) if b.is_solid()) {
                        n += 1;
                    }
                }
            }
        }
    }
    n
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn one_quad_per_exposed_face(bits in proptest::collection::vec(any::<u8>(), 6 * 4 * 6)) {
        let mut f = VoxelField::new_empty(ChunkCoord::new(0, 0, 0), 4, 4);
        prop_assert_eq!(f.cells.len(), bits.len());
        for (cell, b) in f.cells.iter_mut().zip(&bits) {
            *cell = match b % 4 {
                0 => BlockData::new(BlockType::Dirt),
                1 => BlockData::new(BlockType::Water),
                _ => BlockData::NONE,
            };
        }
        let m = build_chunk_mesh(&f);
        prop_assert_eq!(m.quad_count(), exposed_faces(&f));
        prop_assert_eq!(m.vertex_count(), m.quad_count() * 4);
        prop_assert_eq!(m.uv.len(), m.vertex_count() * 2);
        prop_assert_eq!(m.col.len(), m.vertex_count() * 4);
        prop_assert!(m.idx.iter().all(|&i| (i as usize) < m.vertex_count()));
    }
}
