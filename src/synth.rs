//! Procedural demo terrain.
//!
//! The reference program ships two bundled terrain photographs; this crate
//! can't assume assets on disk, so `--demo` synthesizes a matching pair of
//! rasters instead: a Perlin-fBM heightfield and a height-banded color map
//! with a little deterministic brightness jitter so the surface doesn't look
//! flat-shaded.

use noise::{NoiseFn, Perlin};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::terrain::{Rgb, TerrainMaps};
use crate::tilemap::Tilemap;

/// Parameters for demo terrain generation.
pub struct SynthParams {
    /// Side length of the square terrain, cells
    pub size: usize,
    /// Base noise frequency (lower = larger features)
    pub base_frequency: f64,
    /// Number of noise octaves
    pub octaves: u32,
    /// Amplitude decay per octave
    pub persistence: f64,
    /// Frequency multiplier per octave
    pub lacunarity: f64,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            size: 1024,
            base_frequency: 0.004,
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Generate a seeded demo terrain. The same seed always produces the same
/// rasters.
pub fn generate(params: &SynthParams, seed: u64) -> TerrainMaps {
    let noise = Perlin::new(seed as u32);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut heights = Tilemap::new(params.size, params.size);
    let mut colors: Tilemap<Rgb> = Tilemap::new_with(params.size, params.size, [0; 3]);

    for y in 0..params.size {
        for x in 0..params.size {
            let nx = x as f64 * params.base_frequency;
            let ny = y as f64 * params.base_frequency;
            let h = fbm_noise(&noise, nx, ny, params.octaves, params.persistence, params.lacunarity);
            // fBM lands in roughly [-1, 1]; map to the u8 elevation range
            let elevation = ((h * 0.5 + 0.5).clamp(0.0, 1.0) * 255.0) as u8;
            heights.set(x, y, elevation);

            let jitter = rng.gen_range(-10i16..=10);
            colors.set(x, y, jittered(color_for_elevation(elevation), jitter));
        }
    }

    // Color raster has the same dimensions as the height raster, so this
    // can't fail.
    TerrainMaps::new(heights, colors).expect("synthesized rasters match")
}

/// Band an elevation byte into a terrain color.
fn color_for_elevation(elevation: u8) -> Rgb {
    match elevation {
        0..=70 => [60, 100, 150],    // Water
        71..=85 => [210, 190, 140],  // Beach
        86..=120 => [80, 160, 60],   // Lowland
        121..=160 => [40, 120, 50],  // Forest
        161..=200 => [110, 140, 70], // Hills
        201..=235 => [120, 110, 100], // Mountain
        _ => [240, 240, 245],        // Snowy peak
    }
}

fn jittered(color: Rgb, amount: i16) -> Rgb {
    [
        (color[0] as i16 + amount).clamp(0, 255) as u8,
        (color[1] as i16 + amount).clamp(0, 255) as u8,
        (color[2] as i16 + amount).clamp(0, 255) as u8,
    ]
}

/// Fractional Brownian Motion noise
fn fbm_noise(
    noise: &impl NoiseFn<f64, 2>,
    x: f64,
    y: f64,
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += amplitude * noise.get([x * frequency, y * frequency]);
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    total / max_value
}
