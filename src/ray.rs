use crate::tuple::Tuple;
use crate::matrix::Matrix4;

/// A ray, cast from `origin` along `direction`.
///
/// Rays are immutable; transforming one produces a new ray. The direction is
/// not required to be normalized (object-space rays generally are not).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    origin: Tuple,
    direction: Tuple,
}

impl Ray {
    /// Creates a ray.
    ///
    /// If `origin` isn't a point or `direction` isn't a vector, their `w`
    /// components are corrected.
    pub fn new(mut origin: Tuple, mut direction: Tuple) -> Ray {
        origin.w = 1.0;
        direction.w = 0.0;

        Ray { origin, direction }
    }

    pub fn origin(&self) -> Tuple {
        self.origin
    }

    pub fn direction(&self) -> Tuple {
        self.direction
    }

    /// The point at distance `t` along the ray.
    pub fn position(&self, t: f64) -> Tuple {
        self.origin + (t * self.direction)
    }

    pub fn transform(&self, m: &Matrix4) -> Ray {
        Ray {
            origin: *m * self.origin,
            direction: *m * self.direction,
        }
    }
}

#[test]
fn ray_position() {
    let r = Ray::new(
        Tuple::point(2.0, 3.0, 4.0),
        Tuple::vector(1.0, 0.0, 0.0)
    );

    assert_eq!(r.position(0.0), Tuple::point(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), Tuple::point(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Tuple::point(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Tuple::point(4.5, 3.0, 4.0));
}

#[test]
fn ray_translation() {
    let r = Ray::new(
        Tuple::point(1.0, 2.0, 3.0),
        Tuple::vector(0.0, 1.0, 0.0)
    );
    let t = r.transform(&Matrix4::translation(3.0, 4.0, 5.0));

    assert_eq!(t.origin(), Tuple::point(4.0, 6.0, 8.0));
    assert_eq!(t.direction(), Tuple::vector(0.0, 1.0, 0.0));

    // The original ray is untouched
    assert_eq!(r.origin(), Tuple::point(1.0, 2.0, 3.0));
}

#[test]
fn ray_scaling() {
    let r = Ray::new(
        Tuple::point(1.0, 2.0, 3.0),
        Tuple::vector(0.0, 1.0, 0.0)
    );
    let t = r.transform(&Matrix4::scaling(2.0, 3.0, 4.0));

    assert_eq!(t.origin(), Tuple::point(2.0, 6.0, 12.0));
    assert_eq!(t.direction(), Tuple::vector(0.0, 3.0, 0.0));
}
