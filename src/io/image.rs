//! PNG export of a grid snapshot, one colored square per cell

use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::io::configuration::{
    BORDER_COLOR, CONTRADICTION_COLOR, MAX_TILE_PIXELS, OPEN_COLOR, TILE_PALETTE,
};
use crate::io::error::{AlgorithmError, Result, invalid_parameter};
use crate::spatial::Grid;
use crate::spatial::grid::{CellView, Position};
use crate::spatial::tiles::TileId;

/// Palette color of a tile, cycling when the alphabet outgrows the palette
pub fn tile_color(tile: TileId) -> [u8; 4] {
    TILE_PALETTE
        .get(tile.index() % TILE_PALETTE.len())
        .copied()
        .unwrap_or(OPEN_COLOR)
}

/// Fill color for a cell as seen by a renderer
pub fn view_color(view: &CellView) -> [u8; 4] {
    match view.tile {
        Some(tile) => tile_color(tile),
        None if view.entropy == 0 => CONTRADICTION_COLOR,
        None => OPEN_COLOR,
    }
}

/// Reject tile sizes the renderer cannot draw
///
/// # Errors
///
/// Returns an error if `tile_pixels` is zero or above `MAX_TILE_PIXELS`
pub fn validate_tile_pixels(tile_pixels: u32) -> Result<()> {
    if tile_pixels == 0 || tile_pixels > MAX_TILE_PIXELS {
        return Err(invalid_parameter(
            "tile_pixels",
            &tile_pixels,
            &format!("must be between 1 and {MAX_TILE_PIXELS}"),
        ));
    }
    Ok(())
}

/// Blank canvas sized for a grid
pub(crate) fn canvas(rows: usize, cols: usize, tile_pixels: u32) -> RgbaImage {
    RgbaImage::from_pixel(
        cols as u32 * tile_pixels,
        rows as u32 * tile_pixels,
        Rgba(OPEN_COLOR),
    )
}

/// Paint one cell, with a one pixel border when tiles are large enough
pub(crate) fn paint_cell(
    img: &mut RgbaImage,
    position: Position,
    color: [u8; 4],
    tile_pixels: u32,
) {
    let x0 = position.col as u32 * tile_pixels;
    let y0 = position.row as u32 * tile_pixels;
    let bordered = tile_pixels >= 4;

    for dy in 0..tile_pixels {
        for dx in 0..tile_pixels {
            let edge = dx == 0 || dy == 0 || dx + 1 == tile_pixels || dy + 1 == tile_pixels;
            let fill = if bordered && edge { BORDER_COLOR } else { color };
            if let Some(pixel) = img.get_pixel_mut_checked(x0 + dx, y0 + dy) {
                *pixel = Rgba(fill);
            }
        }
    }
}

/// Render the current grid state
///
/// # Errors
///
/// Returns an error if `tile_pixels` is out of range
pub fn render_grid(grid: &Grid, tile_pixels: u32) -> Result<RgbaImage> {
    validate_tile_pixels(tile_pixels)?;
    let mut img = canvas(grid.rows(), grid.cols(), tile_pixels);
    for view in grid.views() {
        paint_cell(&mut img, view.position, view_color(&view), tile_pixels);
    }
    Ok(img)
}

/// Export the grid as a PNG image
///
/// # Errors
///
/// Returns an error if:
/// - `tile_pixels` is out of range
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_grid_as_png(grid: &Grid, tile_pixels: u32, output_path: &Path) -> Result<()> {
    let img = render_grid(grid, tile_pixels)?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| AlgorithmError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path).map_err(|e| AlgorithmError::ImageExport {
        path: output_path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
