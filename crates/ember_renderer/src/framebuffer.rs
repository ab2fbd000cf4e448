//! Pixel storage for a render.

use crate::{color_to_rgb8, Color};
use std::slice::ChunksMut;

/// Row-major buffer of linear-light pixel colors. Row 0 is the top of the image.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Framebuffer {
    /// Create a new framebuffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::ZERO)
    }

    /// Create a framebuffer with every cell set to `color`.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the pixel at (x, row).
    pub fn get(&self, x: u32, row: u32) -> Color {
        self.pixels[self.index(x, row)]
    }

    /// Set the pixel at (x, row).
    pub fn set(&mut self, x: u32, row: u32, color: Color) {
        let index = self.index(x, row);
        self.pixels[index] = color;
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Mutable scanlines from top to bottom, each `width` cells long.
    pub fn rows_mut(&mut self) -> ChunksMut<'_, Color> {
        // chunks_mut rejects a zero chunk size; an empty image has no rows anyway
        self.pixels.chunks_mut(self.width.max(1) as usize)
    }

    /// Gamma-corrected 8-bit RGB bytes, row-major from the top row.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb8(*color));
        }
        bytes
    }

    fn index(&self, x: u32, row: u32) -> usize {
        debug_assert!(x < self.width && row < self.height);
        row as usize * self.width as usize + x as usize
    }
}
