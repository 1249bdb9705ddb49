use std::ops::{ Add, Sub, Neg, Mul, Div };

use crate::feq;

/// A homogeneous coordinate.
///
/// Points carry `w == 1.0` and vectors carry `w == 0.0`. Arithmetic keeps the
/// `w` component honest: point minus point is a vector, point plus vector is
/// a point.
#[derive(Debug, Default, Copy, Clone)]
pub struct Tuple {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64
}

impl PartialEq for Tuple {
    fn eq(&self, other: &Tuple) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z) &&
            feq(self.w, other.w)
    }
}

impl Tuple {
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Tuple {
        Tuple { x, y, z, w }
    }

    pub fn point(x: f64, y: f64, z: f64) -> Tuple {
        Tuple { x, y, z, w: 1.0 }
    }

    pub fn vector(x: f64, y: f64, z: f64) -> Tuple {
        Tuple { x, y, z, w: 0.0 }
    }

    pub fn is_point(&self) -> bool {
        feq(self.w, 1.0)
    }

    pub fn is_vector(&self) -> bool {
        feq(self.w, 0.0)
    }

    pub fn magnitude(&self) -> f64 {
        f64::sqrt(
            self.x.powi(2)
            + self.y.powi(2)
            + self.z.powi(2)
            + self.w.powi(2)
        )
    }

    pub fn normalize(&self) -> Tuple {
        *self / self.magnitude()
    }

    pub fn dot(&self, other: &Tuple) -> f64 {
        self.x * other.x
            + self.y * other.y
            + self.z * other.z
            + self.w * other.w
    }

    /// The cross product of two vectors. Always produces a vector.
    pub fn cross(&self, other: &Tuple) -> Tuple {
        Tuple::vector(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Reflects a vector across a normal.
    pub fn reflect(&self, normal: &Tuple) -> Tuple {
        *self - (*normal * 2.0 * self.dot(normal))
    }
}

/// Conversion from an `[x, y, z]` triple to a point.
impl From<[f64; 3]> for Tuple {
    fn from(p: [f64; 3]) -> Tuple {
        Tuple::point(p[0], p[1], p[2])
    }
}

impl Add for Tuple {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
            w: self.w + other.w
        }
    }
}

impl Sub for Tuple {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
            w: self.w - other.w
        }
    }
}

impl Neg for Tuple {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: -self.w
        }
    }
}

/// Scalar right-multiplication for a tuple.
///
/// ```
/// use raycaster::tuple::Tuple;
///
/// let t = Tuple::new(1.0, -2.0, 3.0, -4.0);
/// assert_eq!(t * 0.5, Tuple::new(0.5, -1.0, 1.5, -2.0));
/// ```
impl Mul<f64> for Tuple {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
            z: self.z * other,
            w: self.w * other
        }
    }
}

/// Scalar left-multiplication for a tuple.
impl Mul<Tuple> for f64 {
    type Output = Tuple;

    fn mul(self, other: Tuple) -> Tuple {
        other * self
    }
}

impl Div<f64> for Tuple {
    type Output = Self;

    fn div(self, other: f64) -> Self {
        Self {
            x: self.x / other,
            y: self.y / other,
            z: self.z / other,
            w: self.w / other
        }
    }
}

#[test]
fn tuple_point_and_vector() {
    let p = Tuple::new(4.3, -4.2, 3.1, 1.0);
    assert!(p.is_point());
    assert!(!p.is_vector());
    assert_eq!(p, Tuple::point(4.3, -4.2, 3.1));

    let v = Tuple::new(4.3, -4.2, 3.1, 0.0);
    assert!(v.is_vector());
    assert!(!v.is_point());
    assert_eq!(v, Tuple::vector(4.3, -4.2, 3.1));
}

#[test]
fn tuple_arithmetic() {
    let p = Tuple::point(3.0, -2.0, 5.0);
    let v = Tuple::vector(-2.0, 3.0, 1.0);
    assert_eq!(p + v, Tuple::point(1.0, 1.0, 6.0));

    let p1 = Tuple::point(3.0, 2.0, 1.0);
    let p2 = Tuple::point(5.0, 6.0, 7.0);
    assert_eq!(p1 - p2, Tuple::vector(-2.0, -4.0, -6.0));
    assert_eq!(p1 - Tuple::vector(5.0, 6.0, 7.0), Tuple::point(-2.0, -4.0, -6.0));

    let a = Tuple::new(1.0, -2.0, 3.0, -4.0);
    assert_eq!(-a, Tuple::new(-1.0, 2.0, -3.0, 4.0));
    assert_eq!(a * 3.5, Tuple::new(3.5, -7.0, 10.5, -14.0));
    assert_eq!(3.5 * a, Tuple::new(3.5, -7.0, 10.5, -14.0));
    assert_eq!(a / 2.0, Tuple::new(0.5, -1.0, 1.5, -2.0));
}

#[test]
fn tuple_magnitude_and_normalize() {
    assert_eq!(Tuple::vector(1.0, 0.0, 0.0).magnitude(), 1.0);
    assert!(crate::feq(Tuple::vector(1.0, 2.0, 3.0).magnitude(), 14f64.sqrt()));
    assert!(crate::feq(Tuple::vector(-1.0, -2.0, -3.0).magnitude(), 14f64.sqrt()));

    assert_eq!(
        Tuple::vector(4.0, 0.0, 0.0).normalize(),
        Tuple::vector(1.0, 0.0, 0.0)
    );

    let n = Tuple::vector(1.0, 2.0, 3.0).normalize();
    assert_eq!(n, Tuple::vector(0.26726, 0.53452, 0.80178));
    assert!(crate::feq(n.magnitude(), 1.0));
}

#[test]
fn tuple_dot_and_cross() {
    let a = Tuple::vector(1.0, 2.0, 3.0);
    let b = Tuple::vector(2.0, 3.0, 4.0);

    assert_eq!(a.dot(&b), 20.0);
    assert_eq!(a.cross(&b), Tuple::vector(-1.0, 2.0, -1.0));
    assert_eq!(b.cross(&a), Tuple::vector(1.0, -2.0, 1.0));
}

#[test]
fn tuple_reflect() {
    let v = Tuple::vector(1.0, -1.0, 0.0);
    let n = Tuple::vector(0.0, 1.0, 0.0);
    assert_eq!(v.reflect(&n), Tuple::vector(1.0, 1.0, 0.0));

    let v = Tuple::vector(0.0, -1.0, 0.0);
    let h = f64::sqrt(2.0) / 2.0;
    let n = Tuple::vector(h, h, 0.0);
    assert_eq!(v.reflect(&n), Tuple::vector(1.0, 0.0, 0.0));
}
