use loam_blocks::TextureSlice;
use loam_chunk::VoxelField;
use loam_geom::Vec3;

use crate::face::Face;
use crate::mesh_data::MeshData;

pub fn build_chunk_mesh(field: &VoxelField) -> MeshData {
    let mut mesh = MeshData::default();
    build_chunk_mesh_into(field, &mut mesh);
    mesh
}

/// Meshes the interior of `field` into `out`, reusing its allocations.
///
/// A face is emitted unless the neighbour across it exists and is solid;
/// margin cells occlude but are never meshed themselves.
pub fn build_chunk_mesh_into(field: &VoxelField, out: &mut MeshData) {
    out.clear_keep_capacity();
    for y in 0..field.sy {
        for z in field.interior() {
            for x in field.interior() {
                let block = field.get_local(x, y, z);
                if !block.is_solid() {
                    continue;
                }
                let center = Vec3::new(x as f32, y as f32, z as f32);
                let rgba = block.kind.color();
                for face in Face::ALL {
                    let (dx, dy, dz) = face.delta();
                    let covered = field
                        .get_checked(x as i32 + dx, y as i32 + dy, z as i32 + dz)
                        .is_some_and(|n| n.is_solid());
                    if covered {
                        continue;
                    }
                    let band = TextureSlice::for_face(block, face.role()).v_band();
                    out.add_face(face, center, band, rgba);
                }
            }
        }
    }
}
