use std::fs;
use std::path::Path;

use log::info;

use crate::error::Result;
use crate::color::Color;

/// Maximum width of a line in the PPM body.
const PPM_LINE_WIDTH: usize = 70;

/// A canvas for drawing pixels.
///
/// The `Camera` renders a `World` onto a canvas, one color per pixel. Once
/// rendering finishes, the canvas can be serialized to a plain (P3) PPM image.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, row by row.
    pixels: Vec<Color>,
}

/// Scales a channel to `0..=255`, rounding half up.
///
/// Only the upper bound is clamped; negative channels are kept as they are.
fn ppm_channel(c: f64) -> i64 {
    ((c * 255.0 + 0.5).floor() as i64).min(255)
}

impl Canvas {
    /// Creates a black canvas with specified width and height.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height]
        }
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. `y` is the row of the pixel, and `x`
    /// is the column; both are zero-indexed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use raycaster::color::Color;
    /// # use raycaster::canvas::Canvas;
    /// let purple = Color::rgb(1.0, 0.0, 1.0);
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, purple);
    /// assert_eq!(canvas.read_pixel(4, 2), Some(purple));
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: Color) {
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = pixel;
    }

    /// Reads a color from a location on the `Canvas`, or `None` if the
    /// location is out of bounds.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }

        Some(self.pixels[(y * self.width) + x])
    }

    /// Iterates over the rows of the canvas, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        // chunks() rejects a zero chunk size
        self.pixels.chunks(self.width.max(1))
    }

    /// Serializes the canvas to a plain PPM image.
    ///
    /// Each row starts a new line; lines longer than 70 characters are
    /// wrapped at the last space that fits. The output ends with a newline.
    pub fn to_ppm(&self) -> String {
        let mut ppm = format!("P3\n{} {}\n255\n", self.width, self.height);

        for row in self.rows() {
            let mut line_len = 0;

            for pixel in row {
                for &c in [pixel.r, pixel.g, pixel.b].iter() {
                    let value = ppm_channel(c).to_string();

                    if line_len > 0
                        && line_len + 1 + value.len() > PPM_LINE_WIDTH {
                        ppm.push('\n');
                        line_len = 0;
                    }

                    if line_len > 0 {
                        ppm.push(' ');
                        line_len += 1;
                    }

                    ppm.push_str(&value);
                    line_len += value.len();
                }
            }

            ppm.push('\n');
        }

        ppm
    }

    /// Saves the canvas to a PPM file.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_ppm())?;
        info!("wrote {}x{} image to {}", self.width, self.height,
            path.display());

        Ok(())
    }
}

#[test]
fn new_canvas_is_black() {
    let c = Canvas::new(10, 20);

    assert_eq!(c.width, 10);
    assert_eq!(c.height, 20);
    assert!(c.rows().flatten().all(|p| *p == Color::black()));
    assert_eq!(c.rows().count(), 20);
}

#[test]
fn write_and_read_pixels() {
    let mut c = Canvas::new(10, 20);
    let red = Color::rgb(1.0, 0.0, 0.0);

    c.write_pixel(2, 3, red);
    assert_eq!(c.read_pixel(2, 3), Some(red));

    // Out of bounds writes are ignored
    c.write_pixel(10, 3, red);
    assert_eq!(c.read_pixel(10, 3), None);
}

#[test]
fn ppm_header() {
    let c = Canvas::new(5, 3);
    let ppm = c.to_ppm();
    let lines: Vec<&str> = ppm.lines().take(3).collect();

    assert_eq!(lines, vec!["P3", "5 3", "255"]);
}

#[test]
fn ppm_pixel_data() {
    let mut c = Canvas::new(5, 3);
    c.write_pixel(0, 0, Color::rgb(1.5, 0.0, 0.0));
    c.write_pixel(2, 1, Color::rgb(0.0, 0.5, 0.0));
    c.write_pixel(4, 2, Color::rgb(-0.5, 0.0, 1.0));

    let ppm = c.to_ppm();
    let lines: Vec<&str> = ppm.lines().skip(3).collect();

    // Only the upper bound is clamped
    assert_eq!(lines, vec![
        "255 0 0 0 0 0 0 0 0 0 0 0 0 0 0",
        "0 0 0 0 0 0 0 128 0 0 0 0 0 0 0",
        "0 0 0 0 0 0 0 0 0 0 0 0 -127 0 255",
    ]);
}

#[test]
fn ppm_splits_long_lines() {
    let mut c = Canvas::new(10, 2);
    for y in 0..2 {
        for x in 0..10 {
            c.write_pixel(x, y, Color::rgb(1.0, 0.8, 0.6));
        }
    }

    let ppm = c.to_ppm();
    let lines: Vec<&str> = ppm.lines().skip(3).collect();

    assert_eq!(lines, vec![
        "255 204 153 255 204 153 255 204 153 255 204 153 255 204 153 255 204",
        "153 255 204 153 255 204 153 255 204 153 255 204 153",
        "255 204 153 255 204 153 255 204 153 255 204 153 255 204 153 255 204",
        "153 255 204 153 255 204 153 255 204 153 255 204 153",
    ]);
    assert!(lines.iter().all(|l| l.len() <= 70));
}

#[test]
fn ppm_ends_with_newline() {
    let c = Canvas::new(5, 3);
    assert!(c.to_ppm().ends_with('\n'));
    assert!(!c.to_ppm().ends_with("\n\n"));
}

#[test]
fn ppm_save_writes_file() {
    let mut c = Canvas::new(2, 1);
    c.write_pixel(0, 0, Color::white());

    let path = std::env::temp_dir().join("raycaster_canvas_save.ppm");
    c.save(&path).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, c.to_ppm());
    let _ = std::fs::remove_file(&path);
}
