use crate::data::{Color, Operation};
use crate::error::{Error, Result};
use std::path::Path;

// Grid Trait /////////////////////////////////////////////////////////////////
//
// Where the VM reads its program from. Implementations must already have
// reduced every pixel to 8 bit RGB.

pub trait Grid {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn color_at(&self, x: usize, y: usize) -> Color;
}

// Raster Grid Implementation /////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterGrid {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl RasterGrid {
    /// Builds a grid from pixels in raster order. Missing pixels are black and
    /// extra ones are dropped.
    pub fn from_colors(width: usize, height: usize, mut pixels: Vec<Color>) -> RasterGrid {
        pixels.resize(width * height, Color::new(0, 0, 0));
        RasterGrid {
            width,
            height,
            pixels,
        }
    }

    /// Builds a grid from packed RGB bytes, 3 per pixel. The buffer must hold
    /// exactly `width * height` pixels.
    pub fn from_rgb(width: usize, height: usize, bytes: &[u8]) -> Result<RasterGrid> {
        let expected = width.checked_mul(height).and_then(|n| n.checked_mul(3));
        if expected != Some(bytes.len()) {
            return Err(Error::PixelBuffer {
                width,
                height,
                len: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|p| Color::new(p[0], p[1], p[2]))
            .collect();
        Ok(RasterGrid {
            width,
            height,
            pixels,
        })
    }

    /// A single row program, one pixel per operation.
    pub fn from_ops(ops: &[Operation]) -> RasterGrid {
        let pixels: Vec<Color> = ops.iter().map(|op| op_color(*op)).collect();
        RasterGrid::from_colors(pixels.len(), 1, pixels)
    }

    /// Scales every pixel up to a `size` x `size` block.
    pub fn scaled(&self, size: usize) -> RasterGrid {
        let mut pixels = Vec::with_capacity(self.pixels.len() * size * size);
        for y in 0..self.height * size {
            for x in 0..self.width * size {
                pixels.push(self.color_at(x / size, y / size));
            }
        }
        RasterGrid::from_colors(self.width * size, self.height * size, pixels)
    }

    /// Loads a PNG from disk. 16 bit channels are narrowed and alpha is
    /// dropped.
    pub fn load_png(path: &Path) -> Result<RasterGrid> {
        let is_png = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("png"))
            .unwrap_or(false);
        if !is_png {
            return Err(Error::ImageExtension(path.to_path_buf()));
        }

        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb
            .pixels()
            .map(|p| Color::new(p.0[0], p.0[1], p.0[2]))
            .collect();
        log::info!("loaded {:?} ({}x{})", path, width, height);
        Ok(RasterGrid::from_colors(
            width as usize,
            height as usize,
            pixels,
        ))
    }
}

// Accumulate pixels carry their own color
fn op_color(op: Operation) -> Color {
    match op {
        Operation::Accumulate(color) => color,
        _ => op.default_color().unwrap_or(Color::new(0, 0, 0)),
    }
}

impl Grid for RasterGrid {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn color_at(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }
}
