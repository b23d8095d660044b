//! Bridging rendered frames onto a physically addressed pixel grid.
//!
//! The bridge takes the RGBA buffer read back after each present and re-emits
//! it pixel by pixel, row-major with origin top-left, onto whatever
//! implements [`PixelGrid`]. Grid dimensions must match the render surface
//! exactly; the 1:1 mapping is validated once, at construction, and any
//! mismatch is a fatal configuration error.

use smart_leds::{SmartLedsWrite, RGB8};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("pixel frame is {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    FrameSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("render surface is {frame_width}x{frame_height} but the grid is {grid_width}x{grid_height}")]
    DimensionMismatch {
        frame_width: u32,
        frame_height: u32,
        grid_width: u32,
        grid_height: u32,
    },
    #[error("grid device error: {0}")]
    Device(String),
}

/// Byte layout of the captured surface. Fixed per bridge, chosen from the
/// surface format at startup — never auto-detected per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgba,
    Bgra,
}

/// One presented frame's color buffer: row-major, four bytes per pixel,
/// origin top-left. Produced once per frame and consumed exactly once by the
/// bridge; no history is retained.
pub struct PixelFrame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelFrame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, BridgeError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(BridgeError::FrameSize {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGB at (col, row) with alpha dropped, decoded per the given source
    /// layout.
    #[inline]
    pub fn rgb_at(&self, col: u32, row: u32, order: ChannelOrder) -> RGB8 {
        let i = (row as usize * self.width as usize + col as usize) * 4;
        let px = &self.data[i..i + 4];
        match order {
            ChannelOrder::Rgba => RGB8::new(px[0], px[1], px[2]),
            ChannelOrder::Bgra => RGB8::new(px[2], px[1], px[0]),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// A physically addressed output grid. `set_pixel` is infallible by contract:
/// a single bad pixel write must not abort the frame, so adapters absorb and
/// log per-pixel trouble; `commit` surfaces device-level failures.
pub trait PixelGrid {
    fn dimensions(&self) -> (u32, u32);
    fn set_pixel(&mut self, col: u32, row: u32, color: RGB8);
    fn commit(&mut self) -> Result<(), BridgeError>;
}

/// Copies presented frames onto a [`PixelGrid`], synchronously, once per
/// frame.
pub struct HardwareBridge<G: PixelGrid> {
    grid: G,
    order: ChannelOrder,
}

impl<G: PixelGrid> HardwareBridge<G> {
    /// Fails fast when the grid does not match the render surface; every
    /// subsequent frame would depend on the 1:1 mapping.
    pub fn new(
        grid: G,
        surface_width: u32,
        surface_height: u32,
        order: ChannelOrder,
    ) -> Result<Self, BridgeError> {
        let (gw, gh) = grid.dimensions();
        if (gw, gh) != (surface_width, surface_height) {
            return Err(BridgeError::DimensionMismatch {
                frame_width: surface_width,
                frame_height: surface_height,
                grid_width: gw,
                grid_height: gh,
            });
        }
        Ok(Self { grid, order })
    }

    /// Releases the grid, e.g. to shut the device down cleanly.
    pub fn into_inner(self) -> G {
        self.grid
    }

    /// Write one frame to the grid. Visits every (col, row) exactly once,
    /// alpha dropped, then commits.
    pub fn present(&mut self, frame: &PixelFrame) -> Result<(), BridgeError> {
        let (gw, gh) = self.grid.dimensions();
        if (gw, gh) != (frame.width(), frame.height()) {
            return Err(BridgeError::DimensionMismatch {
                frame_width: frame.width(),
                frame_height: frame.height(),
                grid_width: gw,
                grid_height: gh,
            });
        }
        for row in 0..gh {
            for col in 0..gw {
                self.grid
                    .set_pixel(col, row, frame.rgb_at(col, row, self.order));
            }
        }
        self.grid.commit()
    }
}

/// Adapter from the grid contract onto a `smart-leds` strip driver: pixels
/// are laid out row-major, origin top-left, and flushed in one write per
/// commit.
pub struct StripGrid<W> {
    writer: W,
    width: u32,
    height: u32,
    pixels: Vec<RGB8>,
}

impl<W> StripGrid<W> {
    pub fn new(writer: W, width: u32, height: u32) -> Self {
        let pixels = vec![RGB8::default(); width as usize * height as usize];
        Self {
            writer,
            width,
            height,
            pixels,
        }
    }
}

impl<W> PixelGrid for StripGrid<W>
where
    W: SmartLedsWrite<Color = RGB8>,
    W::Error: core::fmt::Debug,
{
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_pixel(&mut self, col: u32, row: u32, color: RGB8) {
        if col >= self.width || row >= self.height {
            log::warn!("dropping out-of-bounds pixel ({col},{row})");
            return;
        }
        self.pixels[(row * self.width + col) as usize] = color;
    }

    fn commit(&mut self) -> Result<(), BridgeError> {
        self.writer
            .write(self.pixels.iter().cloned())
            .map_err(|e| BridgeError::Device(format!("{e:?}")))
    }
}
