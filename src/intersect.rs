use std::ops::Index;

use crate::consts::VACUUM_RI;
use crate::error::{ Error, Result };
use crate::tuple::Tuple;
use crate::ray::Ray;
use crate::world::World;

/// A handle to a shape owned by a `World`.
///
/// Handles are positions in the world's shape list. They are stable for as
/// long as the world lives, so intersections can be kept around after the
/// borrow that produced them has ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub usize);

/// An intersection.
///
/// Records that some ray crossed the surface of shape `object` at offset `t`
/// along the ray.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Intersection {
    pub t: f64,
    pub object: ShapeId,
}

impl Intersection {
    pub fn new(t: f64, object: ShapeId) -> Intersection {
        Intersection { t, object }
    }
}

/// A collection of intersections.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Intersections {
    pub intersections: Vec<Intersection>,
}

impl From<Vec<Intersection>> for Intersections {
    fn from(intersections: Vec<Intersection>) -> Intersections {
        Intersections { intersections }
    }
}

impl Index<usize> for Intersections {
    type Output = Intersection;

    fn index(&self, index: usize) -> &Intersection {
        &self.intersections[index]
    }
}

impl Intersections {
    pub fn new() -> Intersections {
        Intersections { intersections: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.intersections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Intersection> {
        self.intersections.iter()
    }

    /// Appends all intersections from `other`.
    pub fn extend(&mut self, other: Intersections) {
        self.intersections.extend(other.intersections);
    }

    /// The visible intersection, if any.
    ///
    /// This is the intersection with the smallest non-negative `t`. Ties go to
    /// the intersection appearing first. The collection is not modified.
    pub fn hit(&self) -> Option<Intersection> {
        self.intersections.iter()
            .filter(|i| i.t >= 0.0)
            .fold(None, |best: Option<Intersection>, i| match best {
                Some(b) if b.t <= i.t => Some(b),
                _ => Some(*i),
            })
    }

    /// Sorts the intersections by ascending `t`. Equal values keep their
    /// relative order.
    pub fn sort(&mut self) {
        self.intersections.sort_by(|a, b| a.t.total_cmp(&b.t));
    }
}

/// A record for computations associated with an `Intersection`.
///
/// Mostly a superset of an `Intersection`.
#[derive(Copy, Clone, Debug)]
pub struct IntersectionComputation {
    /// The "time" of the ray intersection.
    pub t: f64,

    /// The object being intersected.
    pub object: ShapeId,

    /// The point where the intersection occurs.
    pub point: Tuple,

    /// A point slightly above the intersected surface. Used to prevent an
    /// object from shadowing itself (this causes "acne").
    pub over_point: Tuple,

    /// A point slightly below the intersected surface, where refracted rays
    /// start.
    pub under_point: Tuple,

    /// The eye vector for the intersection.
    pub eyev: Tuple,

    /// The surface normal, flipped to face the eye.
    pub normalv: Tuple,

    /// The intersection ray, reflected across the normal.
    pub reflectv: Tuple,

    /// Whether the intersection occurs within the object or not.
    pub inside: bool,

    /// The refractive index of the material being exited.
    pub n1: f64,

    /// The refractive index of the material being entered.
    pub n2: f64,
}

impl IntersectionComputation {
    /// Prepares the shading state for `hit`, an intersection of `r` with a
    /// shape in `world`.
    ///
    /// `xs` is the full, sorted list of intersections along `r`, used to work
    /// out refractive indices. Without it the hit is treated as the only
    /// intersection. Over and under points are offset by `epsilon`.
    pub fn new(world: &World, r: &Ray, hit: &Intersection,
        xs: Option<&Intersections>, epsilon: f64)
        -> Result<IntersectionComputation> {
        let t = hit.t;
        let object = hit.object;
        let shape = world.object(object).ok_or(Error::UnknownShape(object))?;

        let point = r.position(t);
        let eyev = -r.direction();
        let mut normalv = shape.normal_at(point);

        let inside = if normalv.dot(&eyev) < 0.0 {
            normalv = -normalv;
            true
        } else {
            false
        };

        let over_point = point + normalv * epsilon;
        let under_point = point - normalv * epsilon;
        let reflectv = r.direction().reflect(&normalv);

        let (n1, n2) = match xs {
            Some(xs) => Self::refraction_indices(world, hit, xs)?,
            None => {
                let only_hit: Intersections = vec![*hit].into();
                Self::refraction_indices(world, hit, &only_hit)?
            },
        };

        Ok(IntersectionComputation {
            t, object,
            point, over_point, under_point,
            eyev, normalv, reflectv,
            inside,
            n1, n2,
        })
    }

    /// Walks the intersections up to `hit`, tracking which shapes the ray is
    /// inside of. Returns the refractive indices on either side of `hit`.
    fn refraction_indices(world: &World, hit: &Intersection,
        xs: &Intersections) -> Result<(f64, f64)> {
        let index_of = |containers: &[ShapeId]| -> Result<f64> {
            match containers.last() {
                Some(&id) => world.object(id)
                    .map(|s| s.material().refractive_index)
                    .ok_or(Error::UnknownShape(id)),
                None => Ok(VACUUM_RI),
            }
        };

        // Shapes the ray has entered, but not yet exited
        let mut containers: Vec<ShapeId> = Vec::new();

        for i in xs.iter() {
            let is_hit = i == hit;
            let n1 = if is_hit { Some(index_of(&containers)?) } else { None };

            match containers.iter().position(|&id| id == i.object) {
                Some(j) => { containers.remove(j); },
                None => containers.push(i.object),
            }

            if let Some(n1) = n1 {
                return Ok((n1, index_of(&containers)?));
            }
        }

        Ok((VACUUM_RI, VACUUM_RI))
    }

    /// Calculates the reflectance of a hit, with Schlick's approximation.
    ///
    /// The reflectance is a number between 0 and 1, representing what fraction
    /// of the light is reflected for the hit.
    pub fn schlick(&self) -> f64 {
        let mut cos = self.eyev.dot(&self.normalv);

        // Total internal reflection can only occur if n1 > n2.
        if self.n1 > self.n2 {
            let n = self.n1 / self.n2;
            let sin2_t = n.powi(2) * (1.0 - cos.powi(2));
            if sin2_t > 1.0 {
                return 1.0;
            }

            cos = (1.0 - sin2_t).sqrt();
        }

        let r0 = ((self.n1 - self.n2) / (self.n1 + self.n2)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cos).powi(5)
    }
}

#[cfg(test)]
fn xs_of(pairs: &[(f64, usize)]) -> Intersections {
    pairs.iter()
        .map(|&(t, id)| Intersection::new(t, ShapeId(id)))
        .collect::<Vec<_>>()
        .into()
}

#[test]
fn hit_with_all_positive() {
    let xs = xs_of(&[(1.0, 0), (2.0, 0)]);
    assert_eq!(xs.hit(), Some(xs[0]));
}

#[test]
fn hit_with_some_negative() {
    let xs = xs_of(&[(-1.0, 0), (1.0, 0)]);
    assert_eq!(xs.hit(), Some(xs[1]));
}

#[test]
fn hit_with_all_negative() {
    let xs = xs_of(&[(-2.0, 0), (-1.0, 0)]);
    assert_eq!(xs.hit(), None);
}

#[test]
fn hit_is_lowest_nonnegative() {
    let xs = xs_of(&[(5.0, 0), (7.0, 0), (-3.0, 0), (2.0, 0)]);
    assert_eq!(xs.hit(), Some(xs[3]));

    // The collection is untouched
    assert_eq!(xs[0].t, 5.0);
}

#[test]
fn hit_ties_go_to_first() {
    let xs = xs_of(&[(2.0, 1), (2.0, 0)]);
    assert_eq!(xs.hit(), Some(Intersection::new(2.0, ShapeId(1))));

    let xs = xs_of(&[(0.0, 4), (1.0, 0)]);
    assert_eq!(xs.hit(), Some(Intersection::new(0.0, ShapeId(4))));
}

#[test]
fn sort_is_ascending_and_stable() {
    let mut xs = xs_of(&[(3.0, 0), (-1.0, 1), (3.0, 2), (0.5, 3)]);
    xs.sort();

    assert_eq!(xs, xs_of(&[(-1.0, 1), (0.5, 3), (3.0, 0), (3.0, 2)]));
}

#[test]
fn sort_places_nan_last() {
    let mut xs = xs_of(&[(std::f64::NAN, 0), (1.0, 1), (-1.0, 2)]);
    xs.sort();

    assert_eq!(xs[0].object, ShapeId(2));
    assert_eq!(xs[1].object, ShapeId(1));
    assert!(xs[2].t.is_nan());
    assert_eq!(xs.hit(), Some(Intersection::new(1.0, ShapeId(1))));
}

#[cfg(test)]
fn single_sphere_world(sphere: crate::shape::Shape) -> World {
    let mut w = World::empty();
    w.add_object(sphere);
    w
}

#[test]
fn precompute_outside_intersection() {
    use crate::shape::Shape;
    use crate::consts::FEQ_EPSILON;

    let w = single_sphere_world(Shape::sphere());
    let r = Ray::new(Tuple::point(0.0, 0.0, -5.0), Tuple::vector(0.0, 0.0, 1.0));
    let i = Intersection::new(4.0, ShapeId(0));

    let comps = IntersectionComputation::new(&w, &r, &i, None, FEQ_EPSILON)
        .unwrap();

    assert_eq!(comps.t, i.t);
    assert_eq!(comps.object, i.object);
    assert_eq!(comps.point, Tuple::point(0.0, 0.0, -1.0));
    assert_eq!(comps.eyev, Tuple::vector(0.0, 0.0, -1.0));
    assert_eq!(comps.normalv, Tuple::vector(0.0, 0.0, -1.0));
    assert!(!comps.inside);

    // Entering the sphere from empty space
    assert_eq!(comps.n1, 1.0);
    assert_eq!(comps.n2, 1.0);
}

#[test]
fn precompute_inside_intersection() {
    use crate::shape::Shape;
    use crate::consts::FEQ_EPSILON;

    let w = single_sphere_world(Shape::sphere());
    let r = Ray::new(Tuple::point(0.0, 0.0, 0.0), Tuple::vector(0.0, 0.0, 1.0));
    let i = Intersection::new(1.0, ShapeId(0));

    let comps = IntersectionComputation::new(&w, &r, &i, None, FEQ_EPSILON)
        .unwrap();

    assert!(comps.inside);
    assert_eq!(comps.point, Tuple::point(0.0, 0.0, 1.0));
    assert_eq!(comps.eyev, Tuple::vector(0.0, 0.0, -1.0));

    // Inverted, since the eye is inside the sphere
    assert_eq!(comps.normalv, Tuple::vector(0.0, 0.0, -1.0));
}

#[test]
fn precompute_unknown_shape_fails() {
    let w = World::empty();
    let r = Ray::new(Tuple::point(0.0, 0.0, -5.0), Tuple::vector(0.0, 0.0, 1.0));
    let i = Intersection::new(4.0, ShapeId(7));

    let res = IntersectionComputation::new(&w, &r, &i, None, 0.0001);
    assert!(matches!(res, Err(Error::UnknownShape(ShapeId(7)))));
}

#[test]
fn hit_offsets_over_and_under_points() {
    use crate::shape::Shape;
    use crate::matrix::Matrix4;
    use crate::consts::FEQ_EPSILON;

    let s = Shape::glass_sphere()
        .with_transform(Matrix4::translation(0.0, 0.0, 1.0))
        .unwrap();
    let w = single_sphere_world(s);
    let r = Ray::new(Tuple::point(0.0, 0.0, -5.0), Tuple::vector(0.0, 0.0, 1.0));
    let i = Intersection::new(5.0, ShapeId(0));
    let xs: Intersections = vec![i].into();

    let comps = IntersectionComputation::new(&w, &r, &i, Some(&xs), FEQ_EPSILON)
        .unwrap();

    assert!(comps.over_point.z < -FEQ_EPSILON / 2.0);
    assert!(comps.point.z > comps.over_point.z);
    assert!(comps.under_point.z > FEQ_EPSILON / 2.0);
    assert!(comps.point.z < comps.under_point.z);
}

#[test]
fn precompute_reflection_vector() {
    use crate::shape::Shape;
    use crate::consts::FEQ_EPSILON;

    let w = single_sphere_world(Shape::plane());
    let h = 2.0f64.sqrt() / 2.0;
    let r = Ray::new(Tuple::point(0.0, 1.0, -1.0), Tuple::vector(0.0, -h, h));
    let i = Intersection::new(2.0f64.sqrt(), ShapeId(0));

    let comps = IntersectionComputation::new(&w, &r, &i, None, FEQ_EPSILON)
        .unwrap();
    assert_eq!(comps.reflectv, Tuple::vector(0.0, h, h));
}

#[test]
fn finding_n1_and_n2_at_various_intersections() {
    use crate::shape::Shape;
    use crate::matrix::Matrix4;
    use crate::consts::FEQ_EPSILON;

    let mut a = Shape::glass_sphere()
        .with_transform(Matrix4::scaling(2.0, 2.0, 2.0))
        .unwrap();
    a.material_mut().refractive_index = 1.5;

    let mut b = Shape::glass_sphere()
        .with_transform(Matrix4::translation(0.0, 0.0, -0.25))
        .unwrap();
    b.material_mut().refractive_index = 2.0;

    let mut c = Shape::glass_sphere()
        .with_transform(Matrix4::translation(0.0, 0.0, 0.25))
        .unwrap();
    c.material_mut().refractive_index = 2.5;

    let mut w = World::empty();
    w.add_object(a);
    w.add_object(b);
    w.add_object(c);

    let r = Ray::new(Tuple::point(0.0, 0.0, -4.0), Tuple::vector(0.0, 0.0, 1.0));
    let xs = xs_of(&[(2.0, 0), (2.75, 1), (3.25, 2), (4.75, 1), (5.25, 2), (6.0, 0)]);
    let expected = [
        (1.0, 1.5), (1.5, 2.0), (2.0, 2.5), (2.5, 2.5), (2.5, 1.5), (1.5, 1.0)
    ];

    for (i, &(n1, n2)) in expected.iter().enumerate() {
        let comps = IntersectionComputation::new(&w, &r, &xs[i], Some(&xs),
            FEQ_EPSILON).unwrap();

        assert_eq!(comps.n1, n1, "n1 at intersection {}", i);
        assert_eq!(comps.n2, n2, "n2 at intersection {}", i);
    }
}

#[test]
fn schlick_under_total_internal_reflection() {
    use crate::shape::Shape;
    use crate::consts::FEQ_EPSILON;

    let w = single_sphere_world(Shape::glass_sphere());
    let h = 2.0f64.sqrt() / 2.0;
    let r = Ray::new(Tuple::point(0.0, 0.0, h), Tuple::vector(0.0, 1.0, 0.0));
    let xs = xs_of(&[(-h, 0), (h, 0)]);

    let comps = IntersectionComputation::new(&w, &r, &xs[1], Some(&xs),
        FEQ_EPSILON).unwrap();
    assert_eq!(comps.schlick(), 1.0);
}

#[test]
fn schlick_with_perpendicular_view() {
    use crate::shape::Shape;
    use crate::consts::FEQ_EPSILON;

    let w = single_sphere_world(Shape::glass_sphere());
    let r = Ray::new(Tuple::point(0.0, 0.0, 0.0), Tuple::vector(0.0, 1.0, 0.0));
    let xs = xs_of(&[(-1.0, 0), (1.0, 0)]);

    let comps = IntersectionComputation::new(&w, &r, &xs[1], Some(&xs),
        FEQ_EPSILON).unwrap();
    assert!(crate::feq(comps.schlick(), 0.04));
}

#[test]
fn schlick_with_small_angle_and_n2_greater() {
    use crate::shape::Shape;
    use crate::consts::FEQ_EPSILON;

    let w = single_sphere_world(Shape::glass_sphere());
    let r = Ray::new(Tuple::point(0.0, 0.99, -2.0), Tuple::vector(0.0, 0.0, 1.0));
    let xs = xs_of(&[(1.8589, 0)]);

    let comps = IntersectionComputation::new(&w, &r, &xs[0], Some(&xs),
        FEQ_EPSILON).unwrap();
    assert!(crate::feq(comps.schlick(), 0.48873));
}
