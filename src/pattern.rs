use crate::error::Result;
use crate::tuple::Tuple;
use crate::color::Color;
use crate::matrix::Matrix4;
use crate::shape::Shape;

/// The kinds of procedural pattern.
///
/// Composite patterns own their children; evaluation of a child receives the
/// point the parent was evaluated at, without applying the child's own
/// transform.
#[derive(Clone, Debug, PartialEq)]
pub enum PatternKind {
    /// Alternates between two colors with the parity of `floor(x)`.
    Stripe(Color, Color),

    /// Blends linearly from the first color to the second across each unit
    /// of `x`.
    Gradient(Color, Color),

    /// Concentric rings in the XZ plane.
    Ring(Color, Color),

    /// A 3D checkerboard of unit cubes.
    Checker(Color, Color),

    /// Picks one of two child patterns with the checker parity rule.
    Nested(Box<Pattern>, Box<Pattern>),

    /// Sums two child patterns.
    Blended(Box<Pattern>, Box<Pattern>),

    /// Jitters the point by `sin(x * y * z)` before evaluating its child.
    Perturbed(Box<Pattern>),

    /// Returns the point it is evaluated at as a color. Only useful for
    /// testing transforms.
    Test,
}

/// A pattern, plus the transform placing it relative to its shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    transform: Matrix4,
    inverse: Matrix4,
}

/// Even when the floors of the given coordinates sum to an even number.
fn even_parity(coords: &[f64]) -> bool {
    let sum: f64 = coords.iter().map(|c| c.floor()).sum();
    sum.rem_euclid(2.0) == 0.0
}

impl Pattern {
    pub fn new(kind: PatternKind) -> Pattern {
        Pattern {
            kind,
            transform: Matrix4::identity(),
            inverse: Matrix4::identity(),
        }
    }

    pub fn stripe(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::Stripe(a, b))
    }

    pub fn gradient(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::Gradient(a, b))
    }

    pub fn ring(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::Ring(a, b))
    }

    pub fn checker(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::Checker(a, b))
    }

    pub fn nested(a: Pattern, b: Pattern) -> Pattern {
        Pattern::new(PatternKind::Nested(Box::new(a), Box::new(b)))
    }

    pub fn blended(a: Pattern, b: Pattern) -> Pattern {
        Pattern::new(PatternKind::Blended(Box::new(a), Box::new(b)))
    }

    pub fn perturbed(inner: Pattern) -> Pattern {
        Pattern::new(PatternKind::Perturbed(Box::new(inner)))
    }

    pub fn test() -> Pattern {
        Pattern::new(PatternKind::Test)
    }

    pub fn transform(&self) -> &Matrix4 {
        &self.transform
    }

    /// Sets the pattern transform, caching its inverse.
    ///
    /// Fails if `transform` is not invertible; the pattern is left unchanged.
    pub fn set_transform(&mut self, transform: Matrix4) -> Result<()> {
        self.inverse = transform.inverse()?;
        self.transform = transform;

        Ok(())
    }

    /// Builder form of `set_transform`.
    pub fn with_transform(mut self, transform: Matrix4) -> Result<Pattern> {
        self.set_transform(transform)?;
        Ok(self)
    }

    /// Evaluates the pattern at a point in pattern space.
    pub fn pattern_at(&self, p: Tuple) -> Color {
        match self.kind {
            PatternKind::Stripe(a, b) => {
                if even_parity(&[p.x]) { a } else { b }
            },

            PatternKind::Gradient(a, b) => {
                a + (b - a) * (p.x - p.x.floor())
            },

            PatternKind::Ring(a, b) => {
                if even_parity(&[(p.x.powi(2) + p.z.powi(2)).sqrt()]) {
                    a
                } else {
                    b
                }
            },

            PatternKind::Checker(a, b) => {
                if even_parity(&[p.x, p.y, p.z]) { a } else { b }
            },

            PatternKind::Nested(ref a, ref b) => {
                if even_parity(&[p.x, p.y, p.z]) {
                    a.pattern_at(p)
                } else {
                    b.pattern_at(p)
                }
            },

            PatternKind::Blended(ref a, ref b) => {
                a.pattern_at(p) + b.pattern_at(p)
            },

            PatternKind::Perturbed(ref inner) => {
                let jitter = (p.x * p.y * p.z).sin();
                inner.pattern_at(
                    Tuple::point(p.x + jitter, p.y + jitter, p.z + jitter)
                )
            },

            PatternKind::Test => Color::rgb(p.x, p.y, p.z),
        }
    }

    /// Evaluates the pattern at a world-space point on `shape`.
    ///
    /// The point is brought into object space with the shape's inverse
    /// transform, then into pattern space with the pattern's.
    pub fn pattern_at_shape(&self, shape: &Shape, world_point: Tuple) -> Color {
        let object_point = shape.world_to_object(world_point);
        let pattern_point = self.inverse * object_point;

        self.pattern_at(pattern_point)
    }
}

#[test]
fn stripe_pattern_is_constant_along_y_and_z() {
    let pattern = Pattern::stripe(Color::white(), Color::black());

    for &(y, z) in &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (0.0, 1.0), (0.0, 2.0)] {
        assert_eq!(pattern.pattern_at(Tuple::point(0.0, y, z)), Color::white());
    }
}

#[test]
fn stripe_pattern_alternates_along_x() {
    let pattern = Pattern::stripe(Color::white(), Color::black());

    assert_eq!(pattern.pattern_at(Tuple::point( 0.0, 0.0, 0.0)), Color::white());
    assert_eq!(pattern.pattern_at(Tuple::point( 0.9, 0.0, 0.0)), Color::white());
    assert_eq!(pattern.pattern_at(Tuple::point( 1.0, 0.0, 0.0)), Color::black());
    assert_eq!(pattern.pattern_at(Tuple::point(-0.1, 0.0, 0.0)), Color::black());
    assert_eq!(pattern.pattern_at(Tuple::point(-1.0, 0.0, 0.0)), Color::black());
    assert_eq!(pattern.pattern_at(Tuple::point(-1.1, 0.0, 0.0)), Color::white());
}

#[test]
fn stripes_with_object_transformation() {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4::scaling(2.0, 2.0, 2.0)).unwrap();
    let pattern = Pattern::stripe(Color::white(), Color::black());

    assert_eq!(pattern.pattern_at_shape(&s, Tuple::point(1.5, 0.0, 0.0)),
        Color::white());
}

#[test]
fn stripes_with_pattern_transformation() {
    let s = Shape::sphere();
    let pattern = Pattern::stripe(Color::white(), Color::black())
        .with_transform(Matrix4::scaling(2.0, 2.0, 2.0))
        .unwrap();

    assert_eq!(pattern.pattern_at_shape(&s, Tuple::point(1.5, 0.0, 0.0)),
        Color::white());
}

#[test]
fn stripes_with_object_and_pattern_transformation() {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4::scaling(2.0, 2.0, 2.0)).unwrap();
    let pattern = Pattern::stripe(Color::white(), Color::black())
        .with_transform(Matrix4::translation(0.5, 0.0, 0.0))
        .unwrap();

    assert_eq!(pattern.pattern_at_shape(&s, Tuple::point(2.5, 0.0, 0.0)),
        Color::white());
}

#[test]
fn test_pattern_reports_transformed_point() {
    let mut s = Shape::sphere();
    s.set_transform(Matrix4::scaling(2.0, 2.0, 2.0)).unwrap();
    assert_eq!(Pattern::test().pattern_at_shape(&s, Tuple::point(2.0, 3.0, 4.0)),
        Color::rgb(1.0, 1.5, 2.0));

    let s = Shape::sphere();
    let pattern = Pattern::test()
        .with_transform(Matrix4::scaling(2.0, 2.0, 2.0))
        .unwrap();
    assert_eq!(pattern.pattern_at_shape(&s, Tuple::point(2.0, 3.0, 4.0)),
        Color::rgb(1.0, 1.5, 2.0));

    let mut s = Shape::sphere();
    s.set_transform(Matrix4::scaling(2.0, 2.0, 2.0)).unwrap();
    let pattern = Pattern::test()
        .with_transform(Matrix4::translation(0.5, 1.0, 1.5))
        .unwrap();
    assert_eq!(pattern.pattern_at_shape(&s, Tuple::point(2.5, 3.0, 3.5)),
        Color::rgb(0.75, 0.5, 0.25));
}

#[test]
fn singular_pattern_transform_is_rejected() {
    let mut pattern = Pattern::test();
    assert!(pattern.set_transform(Matrix4::scaling(0.0, 1.0, 1.0)).is_err());
    assert_eq!(pattern.transform(), &Matrix4::identity());
}

#[test]
fn gradient_interpolates_between_colors() {
    let pattern = Pattern::gradient(Color::white(), Color::black());

    assert_eq!(pattern.pattern_at(Tuple::point(0.0, 0.0, 0.0)), Color::white());
    assert_eq!(pattern.pattern_at(Tuple::point(0.25, 0.0, 0.0)),
        Color::rgb(0.75, 0.75, 0.75));
    assert_eq!(pattern.pattern_at(Tuple::point(0.5, 0.0, 0.0)),
        Color::rgb(0.5, 0.5, 0.5));
    assert_eq!(pattern.pattern_at(Tuple::point(0.75, 0.0, 0.0)),
        Color::rgb(0.25, 0.25, 0.25));
}

#[test]
fn ring_extends_in_x_and_z() {
    let pattern = Pattern::ring(Color::white(), Color::black());

    assert_eq!(pattern.pattern_at(Tuple::point(0.0, 0.0, 0.0)), Color::white());
    assert_eq!(pattern.pattern_at(Tuple::point(1.0, 0.0, 0.0)), Color::black());
    assert_eq!(pattern.pattern_at(Tuple::point(0.0, 0.0, 1.0)), Color::black());
    assert_eq!(pattern.pattern_at(Tuple::point(0.708, 0.0, 0.708)),
        Color::black());
}

#[test]
fn checkers_repeat_in_each_dimension() {
    let pattern = Pattern::checker(Color::white(), Color::black());

    assert_eq!(pattern.pattern_at(Tuple::point(0.0, 0.0, 0.0)), Color::white());
    assert_eq!(pattern.pattern_at(Tuple::point(0.99, 0.0, 0.0)), Color::white());
    assert_eq!(pattern.pattern_at(Tuple::point(1.01, 0.0, 0.0)), Color::black());
    assert_eq!(pattern.pattern_at(Tuple::point(0.0, 0.99, 0.0)), Color::white());
    assert_eq!(pattern.pattern_at(Tuple::point(0.0, 1.01, 0.0)), Color::black());
    assert_eq!(pattern.pattern_at(Tuple::point(0.0, 0.0, 0.99)), Color::white());
    assert_eq!(pattern.pattern_at(Tuple::point(0.0, 0.0, 1.01)), Color::black());
}

#[test]
fn nested_pattern_selects_child_by_parity() {
    let a = Pattern::stripe(Color::white(), Color::black());
    let b = Pattern::gradient(Color::rgb(1.0, 0.0, 0.0), Color::rgb(0.0, 0.0, 1.0));
    let pattern = Pattern::nested(a, b);

    // Even cell: the stripe, at its first color
    assert_eq!(pattern.pattern_at(Tuple::point(0.5, 0.0, 0.0)), Color::white());

    // Odd cell: the gradient, halfway through
    assert_eq!(pattern.pattern_at(Tuple::point(1.5, 0.0, 0.0)),
        Color::rgb(0.5, 0.0, 0.5));
}

#[test]
fn blended_pattern_sums_children() {
    let a = Pattern::stripe(Color::white(), Color::black());
    let b = Pattern::ring(Color::rgb(0.5, 0.0, 0.0), Color::black());
    let pattern = Pattern::blended(a, b);

    assert_eq!(pattern.pattern_at(Tuple::point(0.5, 0.0, 0.0)),
        Color::rgb(1.5, 1.0, 1.0));
    assert_eq!(pattern.pattern_at(Tuple::point(1.5, 0.0, 0.0)),
        Color::black());
}

#[test]
fn perturbed_pattern_jitters_point() {
    let pattern = Pattern::perturbed(
        Pattern::stripe(Color::white(), Color::black())
    );

    // sin(0) == 0, so the origin is untouched
    assert_eq!(pattern.pattern_at(Tuple::point(0.0, 0.0, 0.0)), Color::white());

    // sin(0.9) ~= 0.78 pushes x = 0.9 into the next stripe
    assert_eq!(pattern.pattern_at(Tuple::point(0.9, 1.0, 1.0)), Color::black());
}
