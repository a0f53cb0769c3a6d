//! Terrain sampling over a pair of immutable rasters.
//!
//! A terrain is two grids loaded once at startup: an elevation map (one
//! unsigned byte per cell) and a color map (one RGB triple per cell). The
//! samplers treat out-of-bounds coordinates as "no data" so that rays can
//! walk off the edge of the world without that being an error.

use std::path::Path;

use image::RgbImage;
use thiserror::Error;

use crate::tilemap::Tilemap;

/// An RGB triple, one byte per channel.
pub type Rgb = [u8; 3];

/// Fatal startup-time asset failures. The per-frame sampling path never
/// produces errors.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load {path}: {source}")]
    Image {
        path: String,
        source: image::ImageError,
    },
    #[error(
        "color map is {color_width}x{color_height} but must cover the \
         {height_width}x{height_height} height map"
    )]
    DimensionMismatch {
        height_width: usize,
        height_height: usize,
        color_width: usize,
        color_height: usize,
    },
}

/// The immutable height and color rasters a scene is rendered from.
pub struct TerrainMaps {
    heights: Tilemap<u8>,
    colors: Tilemap<Rgb>,
}

impl TerrainMaps {
    /// Build a terrain from raw rasters. The color raster must cover the
    /// height raster; a larger color raster is fine, its excess just goes
    /// unsampled.
    pub fn new(heights: Tilemap<u8>, colors: Tilemap<Rgb>) -> Result<Self, AssetError> {
        if colors.width < heights.width || colors.height < heights.height {
            return Err(AssetError::DimensionMismatch {
                height_width: heights.width,
                height_height: heights.height,
                color_width: colors.width,
                color_height: colors.height,
            });
        }
        Ok(Self { heights, colors })
    }

    /// Decode a terrain from two image files.
    pub fn load(
        height_path: impl AsRef<Path>,
        color_path: impl AsRef<Path>,
    ) -> Result<Self, AssetError> {
        let height_img = open_rgb(height_path.as_ref())?;
        let color_img = open_rgb(color_path.as_ref())?;
        Self::from_images(&height_img, &color_img)
    }

    /// Build a terrain from two decoded images. Elevation is taken from the
    /// blue channel of the height image; the color image is used as-is.
    pub fn from_images(height_img: &RgbImage, color_img: &RgbImage) -> Result<Self, AssetError> {
        let mut heights = Tilemap::new(height_img.width() as usize, height_img.height() as usize);
        for (x, y, pixel) in height_img.enumerate_pixels() {
            heights.set(x as usize, y as usize, pixel[2]);
        }

        let mut colors: Tilemap<Rgb> =
            Tilemap::new(color_img.width() as usize, color_img.height() as usize);
        for (x, y, pixel) in color_img.enumerate_pixels() {
            colors.set(x as usize, y as usize, pixel.0);
        }

        Self::new(heights, colors)
    }

    pub fn width(&self) -> usize {
        self.heights.width
    }

    pub fn height(&self) -> usize {
        self.heights.height
    }

    /// Elevation at an integer world coordinate, or `None` outside the map.
    pub fn sample_height(&self, x: i64, y: i64) -> Option<u8> {
        self.heights.get(x, y).copied()
    }

    /// Surface color at an integer world coordinate, or `None` outside the map.
    pub fn sample_color(&self, x: i64, y: i64) -> Option<Rgb> {
        self.colors.get(x, y).copied()
    }
}

fn open_rgb(path: &Path) -> Result<RgbImage, AssetError> {
    match image::open(path) {
        Ok(img) => Ok(img.into_rgb8()),
        Err(source) => Err(AssetError::Image {
            path: path.display().to_string(),
            source,
        }),
    }
}
