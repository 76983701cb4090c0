//! Precomputed indicator frames
//!
//! Every rotation the indicator can show is computed once, when the sprites
//! are built. Drawing a frame is then a lookup.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use image::{imageops, ImageFormat, Rgba, RgbaImage};

use crate::animator::IndicatorPhase;
use crate::config::RefreshConfig;
use crate::error::{Error, Result};

/// A single rotated bitmap, shared between sprite sets
pub type Frame = Arc<RgbaImage>;

const ARROW_PNG: &[u8] = include_bytes!("../assets/arrow.png");
const REFRESH_PNG: &[u8] = include_bytes!("../assets/refresh.png");

const ARROW_STEP: u32 = 45;
const ARROW_FRAMES: usize = 5;
const SPIN_STEP: u32 = 45;
const SPIN_FRAMES: usize = 8;

/// Rotate `source` clockwise by `degrees` around its center.
///
/// Right angles use the lossless `imageops` rotations. Any other angle is
/// sampled nearest-neighbour onto a canvas of the source's size; pixels that
/// fall outside the source are transparent.
pub fn rotate(source: &RgbaImage, degrees: u32) -> RgbaImage {
    match degrees % 360 {
        0 => source.clone(),
        90 => imageops::rotate90(source),
        180 => imageops::rotate180(source),
        270 => imageops::rotate270(source),
        other => rotate_nearest(source, other as f64),
    }
}

fn rotate_nearest(source: &RgbaImage, degrees: f64) -> RgbaImage {
    let (width, height) = source.dimensions();
    let (sin, cos) = degrees.to_radians().sin_cos();
    let cx = (width as f64 - 1.0) / 2.0;
    let cy = (height as f64 - 1.0) / 2.0;

    RgbaImage::from_fn(width, height, |x, y| {
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        let sx = (dx * cos + dy * sin + cx).round();
        let sy = (dy * cos - dx * sin + cy).round();

        if sx >= 0.0 && sy >= 0.0 && sx < width as f64 && sy < height as f64 {
            *source.get_pixel(sx as u32, sy as u32)
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// Ordered, non-empty sequence of frames
#[derive(Debug, Clone)]
pub struct SpriteSet {
    frames: Vec<Frame>,
}

impl SpriteSet {
    /// Build `frame_count` frames where frame `i` shows the image turned by
    /// `i * angle_step` degrees.
    ///
    /// With a `secondary` image (the primary already turned by one step), odd
    /// frames are taken from it turned by `(i - 1) * angle_step`, so that a
    /// 45° step only ever needs right-angle rotations of the two sources.
    pub fn build(
        primary: &RgbaImage,
        secondary: Option<&RgbaImage>,
        angle_step: u32,
        frame_count: usize,
    ) -> Result<Self> {
        if frame_count == 0 {
            return Err(Error::EmptySprite);
        }

        let mut cache: HashMap<(bool, u32), Frame> = HashMap::new();
        let mut frames = Vec::with_capacity(frame_count);

        for i in 0..frame_count {
            let (source, step_index, from_secondary) = match secondary {
                Some(secondary) if i % 2 == 1 => (secondary, i - 1, true),
                _ => (primary, i, false),
            };
            let angle = ((step_index as u64 * angle_step as u64) % 360) as u32;

            let frame = cache
                .entry((from_secondary, angle))
                .or_insert_with(|| Arc::new(rotate(source, angle)))
                .clone();
            frames.push(frame);
        }

        Ok(Self { frames })
    }

    /// Same frames, played backwards
    pub fn reversed(&self) -> Self {
        Self {
            frames: self.frames.iter().rev().cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `cursor`, wrapped to the sequence length
    pub fn frame(&self, cursor: usize) -> &Frame {
        &self.frames[cursor % self.frames.len()]
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last_index(&self) -> usize {
        self.frames.len() - 1
    }
}

/// The three frame sequences of the indicator
#[derive(Debug, Clone)]
pub struct Sprites {
    /// Arrow turning 0° → 180°, shown while idle
    pub forward: SpriteSet,
    /// Arrow turning 180° → 0°, shown while pulled past the threshold
    pub backward: SpriteSet,
    /// Full turn of the refresh image, looped while refreshing
    pub spin: SpriteSet,
}

impl Sprites {
    pub fn from_images(arrow: &RgbaImage, refresh: &RgbaImage) -> Result<Self> {
        let refresh45 = rotate(refresh, SPIN_STEP);
        let spin = SpriteSet::build(refresh, Some(&refresh45), SPIN_STEP, SPIN_FRAMES)?;
        let forward = SpriteSet::build(arrow, None, ARROW_STEP, ARROW_FRAMES)?;
        let backward = forward.reversed();

        Ok(Self {
            forward,
            backward,
            spin,
        })
    }

    /// Sprites built from the images bundled with this crate
    pub fn bundled() -> Result<Self> {
        Self::load(None, None)
    }

    /// Build sprites from custom image files, using the bundled image for
    /// any path that is `None`. A path that cannot be read is an error.
    pub fn load(arrow: Option<&Path>, refresh: Option<&Path>) -> Result<Self> {
        let arrow = match arrow {
            Some(path) => load_image(path)?,
            None => decode_bundled("arrow.png", ARROW_PNG)?,
        };
        let refresh = match refresh {
            Some(path) => load_image(path)?,
            None => decode_bundled("refresh.png", REFRESH_PNG)?,
        };

        Self::from_images(&arrow, &refresh)
    }

    pub fn from_config(config: &RefreshConfig) -> Result<Self> {
        let arrow = config.arrow_image_path();
        let refresh = config.refresh_image_path();
        Self::load(arrow.as_deref(), refresh.as_deref())
    }

    pub fn for_phase(&self, phase: IndicatorPhase) -> &SpriteSet {
        match phase {
            IndicatorPhase::Default => &self.forward,
            IndicatorPhase::Pulling => &self.backward,
            IndicatorPhase::Refreshing => &self.spin,
        }
    }

    /// Pixel size reserved for the indicator, taken from the first spin frame
    pub fn dimensions(&self) -> (u32, u32) {
        self.spin.frame(0).dimensions()
    }
}

/// Load an image file as RGBA
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| Error::ImageLoad {
            path: path.to_path_buf(),
            source,
        })
}

fn decode_bundled(name: &'static str, bytes: &[u8]) -> Result<RgbaImage> {
    image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map(|img| img.to_rgba8())
        .map_err(|source| Error::ImageDecode { name, source })
}
