//! ANSI true-colour rendering of a grid snapshot.

use cave_core::{Cell, Element};
use cave_world::Grid;
use std::fmt::Write;

/// Water is drawn darker as it fills, saturating at this volume
const WATER_SHADE_MAX: f64 = 2.0;

pub type Rgb = (u8, u8, u8);

pub fn color(cell: &Cell) -> Rgb {
    match cell.kind {
        Element::Empty => (255, 255, 255),
        Element::Wall => (128, 128, 128),
        Element::Sand => (194, 178, 128),
        Element::Wood => (139, 69, 19),
        Element::Fire => (255, 0, 0),
        Element::Smoke if cell.smoke_dark => (64, 64, 64),
        Element::Smoke => (192, 192, 192),
        Element::Water => water_color(cell.water_volume),
    }
}

fn water_color(volume: f64) -> Rgb {
    let ratio = volume.clamp(0.0, WATER_SHADE_MAX) / WATER_SHADE_MAX;
    let red = 180.0 - 180.0 * ratio;
    let green = 220.0 - 220.0 * ratio;
    let blue = 255.0 - 75.0 * ratio;
    (red as u8, green as u8, blue as u8)
}

/// One frame: a header line followed by two terminal columns per cell
pub fn render_frame(grid: &Grid, generation: u64) -> String {
    let mut out = String::with_capacity(grid.cell_count() * 24);
    let _ = writeln!(out, "Generation: {}", generation);

    let mut current_row = 0;
    for (pos, cell) in grid.iter() {
        if pos.row != current_row {
            out.push_str("\x1b[0m\n");
            current_row = pos.row;
        }
        let (r, g, b) = color(&cell);
        let _ = write!(out, "\x1b[48;2;{};{};{}m  ", r, g, b);
    }
    out.push_str("\x1b[0m\n");
    out
}
