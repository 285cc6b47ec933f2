//! Collapse trace capture and GIF generation for solver visualization

use std::path::Path;

use image::{Delay, Frame, RgbaImage};

use crate::io::configuration::{FINAL_FRAME_HOLD, OPEN_COLOR, VIEWER_MIN_FRAME_DELAY_MS};
use crate::io::error::{AlgorithmError, Result, invalid_parameter};
use crate::io::image::{canvas, paint_cell, tile_color, validate_tile_pixels};
use crate::spatial::grid::Position;
use crate::spatial::tiles::TileId;

/// A single change to a cell's resolved tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEvent {
    /// Affected cell
    pub position: Position,
    /// Tile shown after the event, `None` once the cell is open again
    pub tile: Option<TileId>,
    /// Solver step during which the event happened
    pub step: usize,
}

/// Records collapses and reverts so a run can be replayed as an animation
#[derive(Debug, Clone)]
pub struct TraceCapture {
    events: Vec<TraceEvent>,
    dims: (usize, usize),
}

impl TraceCapture {
    /// Start an empty trace for a grid of the given size
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self {
            events: Vec::new(),
            dims: (rows, cols),
        }
    }

    /// Record a cell collapsing to `tile`
    pub fn record_collapse(&mut self, position: Position, tile: TileId, step: usize) {
        self.events.push(TraceEvent {
            position,
            tile: Some(tile),
            step,
        });
    }

    /// Record a cell being reverted, with the tile it shows afterwards
    pub fn record_revert(&mut self, position: Position, tile: Option<TileId>, step: usize) {
        self.events.push(TraceEvent {
            position,
            tile,
            step,
        });
    }

    /// All recorded events in order
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Total number of recorded events
    pub const fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Export the trace as a GIF, one frame per event
    ///
    /// Frames are skipped when `frame_delay_ms` is below what viewers can
    /// display, keeping the apparent speed. The last frame is held longer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No events were captured
    /// - `tile_pixels` is out of range
    /// - File system operations fail
    /// - GIF encoding fails
    pub fn export_gif(
        &self,
        output_path: &Path,
        frame_delay_ms: u32,
        tile_pixels: u32,
    ) -> Result<()> {
        if self.events.is_empty() {
            return Err(invalid_parameter(
                "trace",
                &"empty",
                &"no collapses were captured",
            ));
        }
        validate_tile_pixels(tile_pixels)?;

        let frame_delay_ms = frame_delay_ms.max(1);
        let effective_delay_ms = frame_delay_ms.max(VIEWER_MIN_FRAME_DELAY_MS);
        let skip_factor = if frame_delay_ms < VIEWER_MIN_FRAME_DELAY_MS {
            VIEWER_MIN_FRAME_DELAY_MS.div_ceil(frame_delay_ms) as usize
        } else {
            1
        };

        let frames = self.generate_frames(effective_delay_ms, skip_factor, tile_pixels);

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| AlgorithmError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }

        let file = std::fs::File::create(output_path).map_err(|e| AlgorithmError::FileSystem {
            path: output_path.to_path_buf(),
            operation: "create file",
            source: e,
        })?;

        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder
            .encode_frames(frames)
            .map_err(|e| AlgorithmError::ImageExport {
                path: output_path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn generate_frames(&self, delay_ms: u32, skip_factor: usize, tile_pixels: u32) -> Vec<Frame> {
        let (rows, cols) = self.dims;
        let mut img = canvas(rows, cols, tile_pixels);
        let mut frames = vec![frame(img.clone(), delay_ms)];

        let mut frame_count = 0;
        for event in &self.events {
            if event.position.row >= rows || event.position.col >= cols {
                continue;
            }
            let color = event.tile.map_or(OPEN_COLOR, tile_color);
            paint_cell(&mut img, event.position, color, tile_pixels);

            frame_count += 1;
            if frame_count % skip_factor == 0 {
                frames.push(frame(img.clone(), delay_ms));
            }
        }

        if frame_count % skip_factor != 0 {
            frames.push(frame(img.clone(), delay_ms));
        }

        frames.push(frame(img, delay_ms * FINAL_FRAME_HOLD));
        frames
    }
}

fn frame(img: RgbaImage, delay_ms: u32) -> Frame {
    Frame::from_parts(img, 0, 0, Delay::from_numer_denom_ms(delay_ms, 1))
}
