//! Per-pixel opacity bitmaps for precise collision tests.

use bevy::math::{IVec2, UVec2};
use image::RgbaImage;

/// Pixels with alpha strictly above this value are solid
pub const ALPHA_THRESHOLD: u8 = 127;

/// Opacity bitmap, row-major
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// Empty mask
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; (width as usize) * (height as usize)],
        }
    }

    /// Fully solid mask, used for objects without an image-derived mask
    pub fn filled(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; (width as usize) * (height as usize)],
        }
    }

    pub fn from_image(image: &RgbaImage) -> Self {
        let mut mask = Self::new(image.width(), image.height());
        for (x, y, pixel) in image.enumerate_pixels() {
            if pixel.0[3] > ALPHA_THRESHOLD {
                mask.set(x, y, true);
            }
        }
        mask
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + x as usize
    }

    /// Out-of-bounds reads are empty
    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.bits[i] = value;
        }
    }

    /// Number of solid pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|bit| **bit).count()
    }

    pub fn flipped_horizontal(&self) -> Self {
        let mut flipped = Self::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                flipped.set(self.width - 1 - x, y, self.get(x, y));
            }
        }
        flipped
    }

    /// First solid pixel shared with `other` placed at `offset` from this
    /// mask's origin, in this mask's coordinates.
    pub fn overlap(&self, other: &Mask, offset: IVec2) -> Option<UVec2> {
        let (ox, oy) = (offset.x as i64, offset.y as i64);
        let x_start = ox.max(0);
        let x_end = (ox + other.width as i64).min(self.width as i64);
        let y_start = oy.max(0);
        let y_end = (oy + other.height as i64).min(self.height as i64);

        if x_start >= x_end || y_start >= y_end {
            return None;
        }

        for y in y_start..y_end {
            for x in x_start..x_end {
                if self.get(x as u32, y as u32) && other.get((x - ox) as u32, (y - oy) as u32) {
                    return Some(UVec2::new(x as u32, y as u32));
                }
            }
        }
        None
    }

    pub fn overlaps(&self, other: &Mask, offset: IVec2) -> bool {
        self.overlap(other, offset).is_some()
    }
}
