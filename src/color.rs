use std::ops::{ Add, Sub, Mul };

use crate::feq;

/// A color.
///
/// Represented with red-green-blue (RGB) values. Components nominally range
/// from 0.0 to 1.0, but intermediate shading results may leave that range;
/// nothing clamps a `Color` until it is written out.
///
/// # Examples
///
/// Mix two colors:
///
/// ```
/// # use raycaster::color::Color;
/// let yellow = Color::rgb(1.0, 1.0, 0.0);
/// let purple = Color::rgb(1.0, 0.0, 1.0);
/// assert_eq!(yellow * purple, Color::rgb(1.0, 0.0, 0.0));
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Colors are compared component-wise, accounting for floating point error.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

/// Conversion from an `[r, g, b]` triple.
impl From<[f64; 3]> for Color {
    fn from(c: [f64; 3]) -> Color {
        Color::rgb(c[0], c[1], c[2])
    }
}

impl Color {
    /// Creates a color with red, green and blue values.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    pub fn black() -> Color {
        Color::rgb(0.0, 0.0, 0.0)
    }

    pub fn white() -> Color {
        Color::rgb(1.0, 1.0, 1.0)
    }

    /// Computes the Hadamard (component-wise) product of two colors.
    ///
    /// `c1 * c2` is shorthand for this.
    pub fn hadamard(c1: &Color, c2: &Color) -> Color {
        Color {
            r: c1.r * c2.r,
            g: c1.g * c2.g,
            b: c1.b * c2.b,
        }
    }

    /// Converts the color to an RGBA byte quadruple with full opacity.
    ///
    /// Each channel is `round(c * 255)`, saturated into `0..=255`.
    pub fn to_rgba8(&self) -> [u8; 4] {
        // Float to integer casts saturate, which gives the clamp.
        let byte = |c: f64| (c * 255.0).round() as u8;
        [byte(self.r), byte(self.g), byte(self.b), 255]
    }
}

impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

impl Sub<Color> for Color {
    type Output = Color;

    fn sub(self, other: Color) -> Self::Output {
        Color {
            r: self.r - other.r,
            g: self.g - other.g,
            b: self.b - other.b,
        }
    }
}

impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
        }
    }
}

impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        other * self
    }
}

impl Mul<Color> for Color {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        Color::hadamard(&self, &other)
    }
}

#[test]
fn add_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);

    assert_eq!(c1 + c2, Color::rgb(1.6, 0.7, 1.0));
}

#[test]
fn subtract_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);

    assert_eq!(c1 - c2, Color::rgb(0.2, 0.5, 0.5));
}

#[test]
fn multiply_colors() {
    let c = Color::rgb(0.2, 0.3, 0.4);
    assert_eq!(c * 2.0, Color::rgb(0.4, 0.6, 0.8));
    assert_eq!(2.0 * c, Color::rgb(0.4, 0.6, 0.8));

    let c1 = Color::rgb(1.0, 0.2, 0.4);
    let c2 = Color::rgb(0.9, 1.0, 0.1);
    assert_eq!(c1 * c2, Color::rgb(0.9, 0.2, 0.04));
}

#[test]
fn color_to_rgba8_saturates() {
    assert_eq!(Color::rgb(1.5, 0.5, -0.5).to_rgba8(), [255, 128, 0, 255]);
    assert_eq!(Color::rgb(0.38066, 0.47583, 0.2855).to_rgba8(), [97, 121, 73, 255]);
}
