use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::worldgen::WorldGenParams;

/// Per-chunk noise state. Built once per generated chunk so workers never share
/// noise objects.
///
/// Both noise sources run at frequency 1.0 and every sample point is pre-scaled,
/// since the elevation frequency changes per octave.
pub struct GenCtx {
    pub plane: FastNoiseLite,
    pub volume: FastNoiseLite,
    pub params: WorldGenParams,
}

impl GenCtx {
    pub fn new(params: &WorldGenParams) -> Self {
        let mut plane = FastNoiseLite::with_seed(params.seed);
        plane.set_noise_type(Some(NoiseType::OpenSimplex2));
        plane.set_frequency(Some(1.0));
        let mut volume = FastNoiseLite::with_seed(params.seed);
        volume.set_noise_type(Some(NoiseType::OpenSimplex2));
        volume.set_frequency(Some(1.0));
        Self {
            plane,
            volume,
            params: params.clone(),
        }
    }

    #[inline]
    fn noise2(&self, x: f32, z: f32, freq: f32) -> f32 {
        self.plane.get_noise_2d(x * freq, z * freq)
    }

    #[inline]
    fn noise3(&self, x: f32, y: f32, z: f32, freq: f32) -> f32 {
        self.volume.get_noise_3d(x * freq, y * freq, z * freq)
    }

    /// Terrain elevation in blocks for the world column at `(wx, wz)`, in
    /// `0..=chunk_height`.
    pub fn column_height(&self, wx: f32, wz: f32) -> f32 {
        let p = &self.params;
        let seed = p.seed as f32;
        let mut total = 0.0f32;
        let mut weight = 0.0f32;
        let mut strength = 1.0f32;
        for _ in 0..p.height_octaves {
            let off = seed * strength;
            let n = self.noise2(wx + off, wz + off, p.height_frequency / strength);
            total += ((n + 1.0) * 0.5) * strength;
            weight += strength;
            strength *= 0.5;
        }
        if weight <= 0.0 {
            return 0.0;
        }
        let n01 = (total / weight).clamp(0.0, 1.0);
        n01.powf(p.height_exponent) * p.chunk_height as f32
    }

    /// Overhang test. Blended toward 1 with altitude so high air never fills in.
    pub fn structure_at(&self, wx: f32, wy: f32, wz: f32) -> bool {
        let p = &self.params;
        let seed = p.seed as f32;
        let n = self.noise3(wx + seed, wy + seed, wz + seed, p.structure_frequency);
        let n01 = (n + 1.0) * 0.5;
        let v = lerp(n01, 1.0, wy / p.chunk_height as f32);
        p.structure_rate * 0.75 > v
    }

    /// Carving test: false where the voxel is cleared. Blended toward 1 near
    /// the ground so the floor is never hollowed out.
    pub fn kept_at(&self, wx: f32, wy: f32, wz: f32) -> bool {
        let p = &self.params;
        let seed = p.seed as f32;
        let n = self.noise3(wx - seed, wy - seed, wz - seed, p.structure_frequency);
        let n01 = (n + 1.0) * 0.5;
        let v = lerp(1.0, n01, wy / p.chunk_height as f32);
        v > p.unstructure_rate
    }

    /// Combined solidity at a world position.
    pub fn is_solid_at(&self, wx: f32, wy: f32, wz: f32) -> bool {
        (wy < self.column_height(wx, wz) || self.structure_at(wx, wy, wz))
            && self.kept_at(wx, wy, wz)
    }

    /// Altitude above which exposed tops get snow, jittered along the surface.
    pub fn snow_line(&self, wx: f32, wz: f32) -> f32 {
        let p = &self.params;
        p.snow_height - p.snow_jitter * self.noise2(wx, wz, p.snow_frequency)
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}
