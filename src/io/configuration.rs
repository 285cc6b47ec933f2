//! Solver constants and runtime configuration defaults

/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Default number of grid rows
pub const DEFAULT_ROWS: usize = 3;

/// Default number of grid columns
pub const DEFAULT_COLS: usize = 3;

/// Default number of seeds tried before giving up on a contradiction
pub const DEFAULT_ATTEMPTS: usize = 10;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: usize = 10_000;

/// Largest alphabet a tile id can address
pub const MAX_TILES: usize = u16::MAX as usize;

// Output settings
/// Default edge length of one rendered tile in pixels
pub const DEFAULT_TILE_PIXELS: u32 = 16;
/// Largest accepted tile edge length in pixels
pub const MAX_TILE_PIXELS: u32 = 256;
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 100;
/// Minimum frame delay that viewers reliably support (in milliseconds)
pub const VIEWER_MIN_FRAME_DELAY_MS: u32 = 50;
/// How many times longer the final GIF frame is held
pub const FINAL_FRAME_HOLD: u32 = 20;

/// Fill color for open cells
pub const OPEN_COLOR: [u8; 4] = [48, 48, 48, 255];
/// Fill color for cells in contradiction
pub const CONTRADICTION_COLOR: [u8; 4] = [220, 30, 30, 255];
/// Border color drawn around every tile
pub const BORDER_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Tile colors, cycled when the alphabet is larger than the palette
pub const TILE_PALETTE: [[u8; 4]; 12] = [
    [236, 236, 236, 255],
    [66, 135, 245, 255],
    [245, 166, 35, 255],
    [80, 200, 120, 255],
    [155, 89, 182, 255],
    [241, 196, 15, 255],
    [26, 188, 156, 255],
    [231, 76, 60, 255],
    [52, 73, 94, 255],
    [230, 126, 34, 255],
    [149, 165, 166, 255],
    [46, 204, 113, 255],
];

/// Glyph shown for an open cell in text dumps
pub const OPEN_GLYPH: char = '·';
/// Glyph shown for a contradicted cell in text dumps
pub const CONTRADICTION_GLYPH: char = '!';
