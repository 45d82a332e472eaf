use loam_blocks::FaceRole;
use loam_geom::Vec3;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosY = 0,
    NegY = 1,
    PosX = 2,
    NegX = 3,
    PosZ = 4,
    NegZ = 5,
}

const H: f32 = 0.5;

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosY,
        Face::NegY,
        Face::PosX,
        Face::NegX,
        Face::PosZ,
        Face::NegZ,
    ];

    #[inline]
    pub fn normal(self) -> Vec3 {
        let (dx, dy, dz) = self.delta();
        Vec3::new(dx as f32, dy as f32, dz as f32)
    }

    /// Grid step out through this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    #[inline]
    pub fn role(self) -> FaceRole {
        match self {
            Face::PosY => FaceRole::Top,
            Face::NegY => FaceRole::Bottom,
            _ => FaceRole::Side,
        }
    }

    /// Corner offsets from the voxel center. Triangles `(0, 1, 2)` and
    /// `(2, 1, 3)` over these wind counter-clockwise seen from outside.
    #[inline]
    pub fn corners(self) -> [Vec3; 4] {
        match self {
            Face::PosX => [
                Vec3::new(H, -H, -H),
                Vec3::new(H, H, -H),
                Vec3::new(H, -H, H),
                Vec3::new(H, H, H),
            ],
            Face::NegX => [
                Vec3::new(-H, -H, -H),
                Vec3::new(-H, -H, H),
                Vec3::new(-H, H, -H),
                Vec3::new(-H, H, H),
            ],
            Face::PosY => [
                Vec3::new(-H, H, -H),
                Vec3::new(-H, H, H),
                Vec3::new(H, H, -H),
                Vec3::new(H, H, H),
            ],
            Face::NegY => [
                Vec3::new(-H, -H, -H),
                Vec3::new(H, -H, -H),
                Vec3::new(-H, -H, H),
                Vec3::new(H, -H, H),
            ],
            Face::PosZ => [
                Vec3::new(-H, -H, H),
                Vec3::new(H, -H, H),
                Vec3::new(-H, H, H),
                Vec3::new(H, H, H),
            ],
            Face::NegZ => [
                Vec3::new(-H, -H, -H),
                Vec3::new(-H, H, -H),
                Vec3::new(H, -H, -H),
                Vec3::new(H, H, -H),
            ],
        }
    }

    /// Which of the band corners `c0..c3` lands on each of [`Face::corners`].
    /// `NegX` and `PosZ` mirror the texture, `NegY` turns it over.
    #[inline]
    pub fn uv_order(self) -> [usize; 4] {
        match self {
            Face::NegX | Face::PosZ => [2, 0, 3, 1],
            Face::NegY => [1, 3, 0, 2],
            _ => [0, 1, 2, 3],
        }
    }
}
