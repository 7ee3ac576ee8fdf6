use crate::grid::{Grid, Position};

/// Braille character rendering for plain-text terminal previews.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// Render the occupancy grid as lines of Braille characters, at most
/// `max_columns` characters wide. Larger grids are down-sampled.
pub fn render_to_braille(grid: &Grid, max_columns: usize) -> Vec<String> {
    let size = grid.size();
    let (columns, rows) = canvas_size(size, max_columns);

    // Scale from Braille dot space back to grid cells
    let scale_x = size as f64 / (columns * 2) as f64;
    let scale_y = size as f64 / (rows * 4) as f64;
    let scale = scale_x.max(scale_y).max(1.0);

    (0..rows)
        .map(|cy| {
            (0..columns)
                .map(|cx| {
                    let mut pattern: u8 = 0;
                    for (dx, column) in BRAILLE_DOTS.iter().enumerate() {
                        for (dy, bit) in column.iter().enumerate() {
                            let gx = ((cx * 2 + dx) as f64 * scale) as i32;
                            let gy = ((cy * 4 + dy) as f64 * scale) as i32;
                            if grid.is_occupied(Position::new(gx, gy)) {
                                pattern |= bit;
                            }
                        }
                    }
                    char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ')
                })
                .collect()
        })
        .collect()
}

/// Character columns and rows needed to show a `size` x `size` grid
fn canvas_size(size: usize, max_columns: usize) -> (usize, usize) {
    let max_columns = max_columns.max(1);
    let columns = size.div_ceil(2).clamp(1, max_columns);
    // keep the aspect ratio: one char covers 2 cells across and 4 down
    let cells_per_dot = (size as f64 / (columns * 2) as f64).max(1.0);
    let rows = ((size as f64 / cells_per_dot) / 4.0).ceil().max(1.0) as usize;
    (columns, rows)
}
