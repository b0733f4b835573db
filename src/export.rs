use image::{ImageBuffer, Rgb, RgbImage};

use crate::drunk_agent::WalkerState;
use crate::tilemap::{Cell, Tilemap};

const EMPTY_COLOR: [u8; 3] = [24, 22, 30];
const FLOOR_COLOR: [u8; 3] = [196, 184, 150];
const WALKER_COLOR: [u8; 3] = [220, 40, 40];

fn cell_color(cell: Cell) -> [u8; 3] {
    match cell {
        Cell::Empty => EMPTY_COLOR,
        Cell::Floor => FLOOR_COLOR,
    }
}

/// Render a map to an image, each cell a `scale` x `scale` block.
/// The walker, if given and on the map, is drawn on top.
pub fn grid_image(map: &Tilemap<Cell>, scale: u32, walker: Option<WalkerState>) -> RgbImage {
    let scale = scale.max(1);
    let mut img: RgbImage = ImageBuffer::new(map.width() as u32 * scale, map.height() as u32 * scale);

    let mut fill_cell = |x: usize, y: usize, color: [u8; 3]| {
        for py in 0..scale {
            for px in 0..scale {
                img.put_pixel(x as u32 * scale + px, y as u32 * scale + py, Rgb(color));
            }
        }
    };

    for (x, y, &cell) in map.iter() {
        fill_cell(x, y, cell_color(cell));
    }

    if let Some(w) = walker.filter(|w| w.is_inside(map)) {
        fill_cell(w.x as usize, w.y as usize, WALKER_COLOR);
    }

    img
}

/// Export a map as a PNG.
pub fn export_grid_png(
    map: &Tilemap<Cell>,
    path: &str,
    scale: u32,
    walker: Option<WalkerState>,
) -> Result<(), image::ImageError> {
    grid_image(map, scale, walker).save(path)
}
