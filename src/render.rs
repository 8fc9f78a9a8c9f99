//! Rasterizing lattice state to images.
//!
//! Each site of the rhombille tiling is drawn as a rhomb in one of three
//! orientations: lying (odd rows) or tilted left/right (even rows, pattern
//! depending on `x` and `y mod 4`). Reacted sites are filled; an optional
//! overlay outlines the whole tiling.
//!
//! The lattice-to-pixel transform and the rhomb vertex shapes mirror the
//! geometry the topology module encodes: even rows advance half a cell per
//! column with a quarter-cell indent, odd rows advance a full cell, and
//! every fourth row is indented by half a cell.

use std::path::{Path, PathBuf};

use glam::Vec2;
use image::{Rgb, RgbImage};

use crate::error::SimulationError;
use crate::lattice::{Coord, Lattice};

/// Height of one lattice cell for a given cell width.
///
/// Hexagon width-to-height relation of the underlying Kagome geometry:
/// `sqrt((w/2)^2 - (w/2 * cos 60deg)^2)`.
pub fn cell_height(cell_width: f32) -> f32 {
    let half = cell_width / 2.0;
    (half * half - (half * 60f32.to_radians().cos()).powi(2)).sqrt()
}

/// How a rhomb is oriented on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Wide rhomb, long diagonal horizontal (odd rows).
    Lying,
    /// Tilted rhomb with the high vertex on the left.
    Left,
    /// Tilted rhomb with the high vertex on the right.
    Right,
}

impl Orientation {
    /// Orientation of the rhomb at a (normalized) lattice coordinate.
    pub fn of(c: Coord) -> Self {
        if c.y % 2 == 1 {
            Orientation::Lying
        } else if (c.x % 2 == 1 && c.y % 4 == 0) || (c.x % 2 == 0 && c.y % 4 == 2) {
            Orientation::Right
        } else {
            Orientation::Left
        }
    }
}

/// Snapshot rendering parameters.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Output image width in pixels.
    pub image_width: u32,
    /// Output image height in pixels.
    pub image_height: u32,
    /// Width of one lattice cell in pixels.
    pub cell_width: f32,
    /// Fill color for reacted sites.
    pub fill: Rgb<u8>,
    /// Draw the tiling outline over the whole image.
    pub outline: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_width: 1000,
            image_height: 1000,
            cell_width: 45.0,
            fill: Rgb([220, 30, 30]),
            outline: true,
        }
    }
}

impl RenderConfig {
    /// Number of lattice points needed to cover the configured image,
    /// per axis. This is how lattice dimensions are derived from pixel
    /// dimensions before the even-rounding at lattice construction.
    pub fn lattice_points(&self) -> (u32, u32) {
        let x = (self.image_width as f32 / self.cell_width) as u32 + 1;
        let y = (self.image_height as f32 / cell_height(self.cell_width)) as u32 + 1;
        (x, y)
    }
}

/// Pixel position of a lattice coordinate.
///
/// Even rows: step `w/2`, indent `w/4`. Odd rows: step `w`, indent 0,
/// except rows with `y % 4 == 3` which are indented `w/2`.
pub fn kag_to_screen(c: Coord, cell_width: f32) -> Vec2 {
    let (indent, step) = if c.y % 2 == 0 {
        (cell_width / 4.0, cell_width / 2.0)
    } else if c.y.rem_euclid(4) == 3 {
        (cell_width / 2.0, cell_width)
    } else {
        (0.0, cell_width)
    };
    Vec2::new(
        c.x as f32 * step + indent,
        c.y as f32 * cell_height(cell_width),
    )
}

/// The four vertices of a rhomb centered at `center`.
pub fn rhomb_vertices(orientation: Orientation, center: Vec2, cell_width: f32) -> [Vec2; 4] {
    let w = cell_width;
    let h = cell_height(cell_width);
    let Vec2 { x, y } = center;
    match orientation {
        Orientation::Lying => [
            Vec2::new(x - w / 2.0, y),
            Vec2::new(x, y - h * 2.0 / 3.0),
            Vec2::new(x + w / 2.0, y),
            Vec2::new(x, y + h * 2.0 / 3.0),
        ],
        Orientation::Left => [
            Vec2::new(x + w / 4.0, y + h),
            Vec2::new(x + w / 4.0, y - h / 3.0),
            Vec2::new(x - w / 4.0, y - h),
            Vec2::new(x - w / 4.0, y + h / 3.0),
        ],
        Orientation::Right => [
            Vec2::new(x - w / 4.0, y + h),
            Vec2::new(x - w / 4.0, y - h / 3.0),
            Vec2::new(x + w / 4.0, y - h),
            Vec2::new(x + w / 4.0, y + h / 3.0),
        ],
    }
}

/// Render the current lattice state to an image.
pub fn render(lattice: &Lattice, config: &RenderConfig) -> RgbImage {
    let mut image = RgbImage::from_pixel(config.image_width, config.image_height, Rgb([255; 3]));

    for rhomb in lattice.rhombs() {
        if rhomb.reacted {
            let center = kag_to_screen(rhomb.coord, config.cell_width);
            let quad = rhomb_vertices(Orientation::of(rhomb.coord), center, config.cell_width);
            fill_quad(&mut image, &quad, config.fill);
        }
    }

    if config.outline {
        for rhomb in lattice.rhombs() {
            let center = kag_to_screen(rhomb.coord, config.cell_width);
            let quad = rhomb_vertices(Orientation::of(rhomb.coord), center, config.cell_width);
            for i in 0..4 {
                draw_line(&mut image, quad[i], quad[(i + 1) % 4], Rgb([0; 3]));
            }
        }
    }

    image
}

/// Render and save one snapshot as `grid_{cycle}.png` under `dir`.
pub fn save_snapshot(
    lattice: &Lattice,
    config: &RenderConfig,
    dir: &Path,
    cycle: u64,
) -> Result<PathBuf, SimulationError> {
    let path = dir.join(format!("grid_{}.png", cycle));
    render(lattice, config).save(&path)?;
    Ok(path)
}

/// Scanline fill of a convex quad. Pixels outside the image are skipped.
fn fill_quad(image: &mut RgbImage, quad: &[Vec2; 4], color: Rgb<u8>) {
    let min_y = quad.iter().map(|v| v.y).fold(f32::INFINITY, f32::min);
    let max_y = quad.iter().map(|v| v.y).fold(f32::NEG_INFINITY, f32::max);

    let y_start = (min_y.ceil().max(0.0)) as i64;
    let y_end = (max_y.floor().min(image.height() as f32 - 1.0)) as i64;

    for y in y_start..=y_end {
        let scan = y as f32;
        let mut crossings: Vec<f32> = Vec::with_capacity(4);
        for i in 0..4 {
            let (a, b) = (quad[i], quad[(i + 1) % 4]);
            if (a.y <= scan && b.y > scan) || (b.y <= scan && a.y > scan) {
                crossings.push(a.x + (scan - a.y) / (b.y - a.y) * (b.x - a.x));
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));
        for pair in crossings.chunks(2) {
            let [left, right] = pair else { continue };
            let x_start = (left.ceil().max(0.0)) as i64;
            let x_end = (right.floor().min(image.width() as f32 - 1.0)) as i64;
            for x in x_start..=x_end {
                image.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Bresenham line, clipped to the image.
fn draw_line(image: &mut RgbImage, from: Vec2, to: Vec2, color: Rgb<u8>) {
    let (mut x0, mut y0) = (from.x.round() as i64, from.y.round() as i64);
    let (x1, y1) = (to.x.round() as i64, to.y.round() as i64);

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x0 >= 0 && y0 >= 0 && (x0 as u32) < image.width() && (y0 as u32) < image.height() {
            image.put_pixel(x0 as u32, y0 as u32, color);
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
