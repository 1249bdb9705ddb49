use crate::consts::{ FEQ_EPSILON, PARALLEL_EPSILON };
use crate::error::Result;
use crate::tuple::Tuple;
use crate::ray::Ray;
use crate::light::Material;
use crate::matrix::Matrix4;
use crate::intersect::{ Intersection, Intersections, ShapeId };

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeType {
    /// A shape with no surface. Its normal is the object-space point itself,
    /// which makes it handy for testing transforms.
    Test,

    /// A unit sphere with its center at the object-space origin.
    Sphere,

    /// The XZ plane, with its normal pointing up along Y.
    Plane,

    /// An axis-aligned cube spanning -1 to 1 on each axis.
    Cube,

    /// A unit-radius cylinder around the Y axis. Minimum Y, maximum Y (both
    /// exclusive) and whether the cylinder has end caps.
    Cylinder(f64, f64, bool),
}

/// A renderable shape.
///
/// Each shape has a type, a material and a transform placing it in world
/// space. The inverse of the transform is computed once, when the transform is
/// set, and reused for every ray and normal.
#[derive(Debug, Clone)]
pub struct Shape {
    pub ty: ShapeType,
    material: Material,
    transform: Matrix4,
    inverse: Matrix4,
}

impl Default for Shape {
    fn default() -> Shape {
        Shape {
            ty: ShapeType::Test,
            material: Default::default(),
            transform: Matrix4::identity(),
            inverse: Matrix4::identity(),
        }
    }
}

/// Two shapes are equal when their materials and transforms are equal.
///
/// The shape type does not take part in the comparison.
impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.transform == other.transform
            && self.material == other.material
    }
}

impl Shape {
    pub fn test() -> Shape {
        Default::default()
    }

    /// Creates a unit sphere with identity transform and default material.
    pub fn sphere() -> Shape {
        Shape {
            ty: ShapeType::Sphere,
            ..Default::default()
        }
    }

    /// Creates a unit sphere made of glass.
    pub fn glass_sphere() -> Shape {
        Shape {
            ty: ShapeType::Sphere,
            material: Material::glass(),
            ..Default::default()
        }
    }

    pub fn plane() -> Shape {
        Shape {
            ty: ShapeType::Plane,
            ..Default::default()
        }
    }

    pub fn cube() -> Shape {
        Shape {
            ty: ShapeType::Cube,
            ..Default::default()
        }
    }

    /// Creates an infinitely long cylinder with no end caps.
    pub fn cylinder() -> Shape {
        Self::bounded_cylinder(-std::f64::INFINITY, std::f64::INFINITY)
    }

    /// Creates a bounded cylinder without caps.
    pub fn bounded_cylinder(minimum: f64, maximum: f64) -> Shape {
        Shape {
            ty: ShapeType::Cylinder(minimum, maximum, false),
            ..Default::default()
        }
    }

    /// Creates a bounded cylinder with caps.
    pub fn capped_cylinder(minimum: f64, maximum: f64) -> Shape {
        Shape {
            ty: ShapeType::Cylinder(minimum, maximum, true),
            ..Default::default()
        }
    }

    pub fn transform(&self) -> &Matrix4 {
        &self.transform
    }

    pub fn inverse_transform(&self) -> &Matrix4 {
        &self.inverse
    }

    /// Sets the shape transform, caching its inverse.
    ///
    /// Fails if `transform` is not invertible; the shape is left unchanged.
    pub fn set_transform(&mut self, transform: Matrix4) -> Result<()> {
        self.inverse = transform.inverse()?;
        self.transform = transform;

        Ok(())
    }

    /// Builder form of `set_transform`.
    pub fn with_transform(mut self, transform: Matrix4) -> Result<Shape> {
        self.set_transform(transform)?;
        Ok(self)
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Mutable access to the material. Unlike `set_material`, changes made
    /// through this reference are not validated.
    pub fn material_mut(&mut self) -> &mut Material {
        &mut self.material
    }

    /// Sets the shape material, after validating it.
    pub fn set_material(&mut self, material: Material) -> Result<()> {
        material.validate()?;
        self.material = material;

        Ok(())
    }

    /// Builder form of `set_material`.
    pub fn with_material(mut self, material: Material) -> Result<Shape> {
        self.set_material(material)?;
        Ok(self)
    }

    /// Converts a point from world to object space.
    pub fn world_to_object(&self, point: Tuple) -> Tuple {
        self.inverse * point
    }

    /// Converts a normal from object to world space.
    ///
    /// Normals transform by the transpose of the inverse; the stray `w` this
    /// leaves behind is discarded before normalizing.
    pub fn normal_to_world(&self, normal: Tuple) -> Tuple {
        let mut n = self.inverse.transpose() * normal;
        n.w = 0.0;
        n.normalize()
    }

    /// The ray, converted to this shape's object space.
    pub fn object_ray(&self, ray: &Ray) -> Ray {
        ray.transform(&self.inverse)
    }

    /// Intersects a world-space ray with the shape.
    ///
    /// `id` is the handle of this shape in its world, and is recorded on each
    /// intersection.
    pub fn intersect(&self, id: ShapeId, ray: &Ray) -> Intersections {
        let ts = self.local_intersect(&self.object_ray(ray));
        let intersections = ts.into_iter()
            .map(|t| Intersection::new(t, id))
            .collect();

        Intersections { intersections }
    }

    /// The normal at a world-space point on the shape.
    pub fn normal_at(&self, world_point: Tuple) -> Tuple {
        let local_point = self.world_to_object(world_point);
        let local_normal = self.local_normal_at(&local_point);
        self.normal_to_world(local_normal)
    }

    /// Intersects an object-space ray with the shape, returning each `t` at
    /// which the ray crosses the surface.
    pub fn local_intersect(&self, ray: &Ray) -> Vec<f64> {
        match self.ty {
            ShapeType::Test => Vec::new(),
            ShapeType::Sphere => Self::intersect_sphere(ray),
            ShapeType::Plane => Self::intersect_plane(ray),
            ShapeType::Cube => Self::intersect_cube(ray),
            ShapeType::Cylinder(min, max, closed)
                => Self::intersect_cylinder(ray, min, max, closed),
        }
    }

    /// The normal at an object-space point on the shape.
    pub fn local_normal_at(&self, at: &Tuple) -> Tuple {
        match self.ty {
            ShapeType::Test => Tuple::vector(at.x, at.y, at.z),
            ShapeType::Sphere => Tuple::vector(at.x, at.y, at.z),
            ShapeType::Plane => Tuple::vector(0.0, 1.0, 0.0),
            ShapeType::Cube => Self::normal_at_cube(at),
            ShapeType::Cylinder(min, max, closed)
                => Self::normal_at_cylinder(at, min, max, closed),
        }
    }

    /// Either no intersections, or two (equal when the ray is tangent).
    fn intersect_sphere(ray: &Ray) -> Vec<f64> {
        // Subtracting a point leaves a vector
        let sphere_to_ray = ray.origin() - Tuple::point(0.0, 0.0, 0.0);
        let direction = ray.direction();

        let a = direction.dot(&direction);
        let b = 2.0 * direction.dot(&sphere_to_ray);
        let c = sphere_to_ray.dot(&sphere_to_ray) - 1.0;

        let discriminant = b.powi(2) - (4.0 * a * c);
        if discriminant < 0.0 {
            return Vec::new();
        }

        let t1 = (-b - discriminant.sqrt()) / (2.0 * a);
        let t2 = (-b + discriminant.sqrt()) / (2.0 * a);
        vec![t1, t2]
    }

    fn intersect_plane(ray: &Ray) -> Vec<f64> {
        // Parallel or coplanar rays never cross the plane
        if ray.direction().y.abs() < PARALLEL_EPSILON {
            return Vec::new();
        }

        vec![-ray.origin().y / ray.direction().y]
    }

    fn intersect_cube(ray: &Ray) -> Vec<f64> {
        let (o, d) = (ray.origin(), ray.direction());

        let (xtmin, xtmax) = Self::check_cube_axis(o.x, d.x);
        let (ytmin, ytmax) = Self::check_cube_axis(o.y, d.y);
        let (ztmin, ztmax) = Self::check_cube_axis(o.z, d.z);

        let tmin = xtmin.max(ytmin).max(ztmin);
        let tmax = xtmax.min(ytmax).min(ztmax);

        if tmin > tmax {
            return Vec::new();
        }

        vec![tmin, tmax]
    }

    /// Where a ray crosses the two slabs of a unit cube on a single axis,
    /// smaller `t` first.
    fn check_cube_axis(origin: f64, direction: f64) -> (f64, f64) {
        let tmin_numerator = -1.0 - origin;
        let tmax_numerator =  1.0 - origin;

        // A ray parallel to the slabs never crosses them. Object-space
        // directions are not normalized, so only a vanishing component counts
        let (tmin, tmax) = if direction.abs() >= PARALLEL_EPSILON {
            (tmin_numerator / direction, tmax_numerator / direction)
        } else {
            (tmin_numerator * std::f64::INFINITY,
             tmax_numerator * std::f64::INFINITY)
        };

        if tmin > tmax {
            (tmax, tmin)
        } else {
            (tmin, tmax)
        }
    }

    fn normal_at_cube(p: &Tuple) -> Tuple {
        let xa = p.x.abs();
        let ya = p.y.abs();
        let za = p.z.abs();

        let max_component = xa.max(ya).max(za);
        if max_component == xa {
            Tuple::vector(p.x, 0.0, 0.0)
        } else if max_component == ya {
            Tuple::vector(0.0, p.y, 0.0)
        } else {
            Tuple::vector(0.0, 0.0, p.z)
        }
    }

    fn intersect_cylinder(ray: &Ray, minimum: f64, maximum: f64,
        closed: bool) -> Vec<f64> {
        let (o, d) = (ray.origin(), ray.direction());
        let mut ts = Vec::new();

        let a = d.x.powi(2) + d.z.powi(2);

        // A ray parallel to the Y axis can only hit the caps
        if a >= PARALLEL_EPSILON {
            let b = 2.0 * o.x * d.x + 2.0 * o.z * d.z;
            let c = o.x.powi(2) + o.z.powi(2) - 1.0;

            let disc = b.powi(2) - 4.0 * a * c;
            if disc < 0.0 {
                return ts;
            }

            let mut t0 = (-b - disc.sqrt()) / (2.0 * a);
            let mut t1 = (-b + disc.sqrt()) / (2.0 * a);
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            for &t in [t0, t1].iter() {
                let y = o.y + t * d.y;
                if minimum < y && y < maximum {
                    ts.push(t);
                }
            }
        }

        if closed && d.y.abs() >= PARALLEL_EPSILON {
            for &cap in [minimum, maximum].iter() {
                let t = (cap - o.y) / d.y;
                if Self::check_cylinder_cap(ray, t) {
                    ts.push(t);
                }
            }
        }

        ts.sort_by(|a, b| a.total_cmp(b));
        ts
    }

    /// Whether the ray at `t` lies within the unit radius of a cap.
    fn check_cylinder_cap(ray: &Ray, t: f64) -> bool {
        let p = ray.position(t);
        (p.x.powi(2) + p.z.powi(2)) <= 1.0
    }

    /// Open cylinders have no caps, so only the wall normal applies to them.
    fn normal_at_cylinder(at: &Tuple, minimum: f64, maximum: f64,
        closed: bool) -> Tuple {
        // Square of the distance from the Y axis
        let dist = at.x.powi(2) + at.z.powi(2);
        let on_cap = closed && dist < 1.0;

        if on_cap && at.y >= maximum - FEQ_EPSILON {
            Tuple::vector(0.0, 1.0, 0.0)
        } else if on_cap && at.y <= minimum + FEQ_EPSILON {
            Tuple::vector(0.0, -1.0, 0.0)
        } else {
            Tuple::vector(at.x, 0.0, at.z)
        }
    }
}

#[cfg(test)]
fn ts(s: &Shape, origin: Tuple, direction: Tuple) -> Vec<f64> {
    s.local_intersect(&Ray::new(origin, direction.normalize()))
}

#[cfg(test)]
fn assert_ts(actual: Vec<f64>, expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert!(crate::feq(*a, *e), "{:?} vs {:?}", actual, expected);
    }
}

#[test]
fn default_shape() {
    let s = Shape::test();

    assert_eq!(s.transform(), &Matrix4::identity());
    assert_eq!(s.material(), &Material::default());
}

#[test]
fn assigning_transform_and_material() {
    let mut s = Shape::test();
    s.set_transform(Matrix4::translation(2.0, 3.0, 4.0)).unwrap();
    assert_eq!(s.transform(), &Matrix4::translation(2.0, 3.0, 4.0));
    assert_eq!(s.inverse_transform(), &Matrix4::translation(-2.0, -3.0, -4.0));

    let m = Material { ambient: 1.0, ..Default::default() };
    s.set_material(m.clone()).unwrap();
    assert_eq!(s.material(), &m);
}

#[test]
fn singular_transform_is_rejected() {
    use crate::error::Error;

    let mut s = Shape::sphere();
    let res = s.set_transform(Matrix4::scaling(1.0, 0.0, 1.0));

    assert!(matches!(res, Err(Error::NotInvertible)));
    assert_eq!(s.transform(), &Matrix4::identity());
}

#[test]
fn invalid_material_is_rejected() {
    let mut s = Shape::sphere();
    let m = Material { diffuse: -1.0, ..Default::default() };

    assert!(s.set_material(m).is_err());
    assert_eq!(s.material(), &Material::default());
}

#[test]
fn shapes_compare_by_material_and_transform() {
    assert_eq!(Shape::sphere(), Shape::sphere());
    assert_eq!(Shape::sphere(), Shape::cube());

    let moved = Shape::sphere()
        .with_transform(Matrix4::translation(1.0, 0.0, 0.0))
        .unwrap();
    assert_ne!(Shape::sphere(), moved);
    assert_ne!(Shape::sphere(), Shape::glass_sphere());
}

#[test]
fn glass_sphere() {
    let s = Shape::glass_sphere();

    assert_eq!(s.ty, ShapeType::Sphere);
    assert_eq!(s.transform(), &Matrix4::identity());
    assert_eq!(s.material().transparency, 1.0);
    assert_eq!(s.material().refractive_index, 1.5);
}

#[test]
fn intersecting_scaled_shape_uses_object_ray() {
    let r = Ray::new(Tuple::point(0.0, 0.0, -5.0), Tuple::vector(0.0, 0.0, 1.0));
    let s = Shape::test()
        .with_transform(Matrix4::scaling(2.0, 2.0, 2.0))
        .unwrap();

    let local = s.object_ray(&r);
    assert_eq!(local.origin(), Tuple::point(0.0, 0.0, -2.5));
    assert_eq!(local.direction(), Tuple::vector(0.0, 0.0, 0.5));
}

#[test]
fn intersecting_translated_shape_uses_object_ray() {
    let r = Ray::new(Tuple::point(0.0, 0.0, -5.0), Tuple::vector(0.0, 0.0, 1.0));
    let s = Shape::test()
        .with_transform(Matrix4::translation(5.0, 0.0, 0.0))
        .unwrap();

    let local = s.object_ray(&r);
    assert_eq!(local.origin(), Tuple::point(-5.0, 0.0, -5.0));
    assert_eq!(local.direction(), Tuple::vector(0.0, 0.0, 1.0));
}

#[test]
fn intersections_carry_shape_id() {
    let r = Ray::new(Tuple::point(0.0, 0.0, -5.0), Tuple::vector(0.0, 0.0, 1.0));
    let xs = Shape::sphere().intersect(ShapeId(3), &r);

    assert_eq!(xs.len(), 2);
    assert_eq!(xs[0], Intersection::new(4.0, ShapeId(3)));
    assert_eq!(xs[1], Intersection::new(6.0, ShapeId(3)));
}

#[test]
fn intersecting_scaled_and_translated_spheres() {
    let r = Ray::new(Tuple::point(0.0, 0.0, -5.0), Tuple::vector(0.0, 0.0, 1.0));

    let scaled = Shape::sphere()
        .with_transform(Matrix4::scaling(2.0, 2.0, 2.0))
        .unwrap();
    let xs = scaled.intersect(ShapeId(0), &r);
    assert_eq!(xs.len(), 2);
    assert_eq!(xs[0].t, 3.0);
    assert_eq!(xs[1].t, 7.0);

    let translated = Shape::sphere()
        .with_transform(Matrix4::translation(5.0, 0.0, 0.0))
        .unwrap();
    assert!(translated.intersect(ShapeId(0), &r).is_empty());
}

#[test]
fn ray_sphere_intersections() {
    let s = Shape::sphere();
    let z = Tuple::vector(0.0, 0.0, 1.0);

    assert_ts(ts(&s, Tuple::point(0.0, 0.0, -5.0), z), &[4.0, 6.0]);
    assert_ts(ts(&s, Tuple::point(0.0, 1.0, -5.0), z), &[5.0, 5.0]);
    assert_ts(ts(&s, Tuple::point(0.0, 2.0, -5.0), z), &[]);
    assert_ts(ts(&s, Tuple::point(0.0, 0.0, 0.0), z), &[-1.0, 1.0]);
    assert_ts(ts(&s, Tuple::point(0.0, 0.0, 5.0), z), &[-6.0, -4.0]);
}

#[test]
fn normals_on_sphere() {
    let s = Shape::sphere();
    let k = 3.0f64.sqrt() / 3.0;

    assert_eq!(s.normal_at(Tuple::point(1.0, 0.0, 0.0)),
        Tuple::vector(1.0, 0.0, 0.0));
    assert_eq!(s.normal_at(Tuple::point(0.0, 1.0, 0.0)),
        Tuple::vector(0.0, 1.0, 0.0));
    assert_eq!(s.normal_at(Tuple::point(0.0, 0.0, 1.0)),
        Tuple::vector(0.0, 0.0, 1.0));

    let n = s.normal_at(Tuple::point(k, k, k));
    assert_eq!(n, Tuple::vector(k, k, k));
    assert_eq!(n, n.normalize());
}

#[test]
fn normal_on_translated_sphere() {
    let s = Shape::sphere()
        .with_transform(Matrix4::translation(0.0, 1.0, 0.0))
        .unwrap();

    let n = s.normal_at(Tuple::point(0.0, 1.70711, -0.70711));
    assert_eq!(n, Tuple::vector(0.0, 0.70711, -0.70711));
}

#[test]
fn normal_on_transformed_sphere() {
    let m = Matrix4::scaling(1.0, 0.5, 1.0)
        * Matrix4::rotation_z(std::f64::consts::PI / 5.0);
    let s = Shape::sphere().with_transform(m).unwrap();

    let h = 2.0f64.sqrt() / 2.0;
    let n = s.normal_at(Tuple::point(0.0, h, -h));
    assert_eq!(n, Tuple::vector(0.0, 0.97014, -0.24254));
    assert!(crate::feq(n.magnitude(), 1.0));
}

#[test]
fn normal_on_transformed_test_shape() {
    let s = Shape::test()
        .with_transform(Matrix4::translation(0.0, 1.0, 0.0))
        .unwrap();

    assert_eq!(s.normal_at(Tuple::point(0.0, 1.70711, -0.70711)),
        Tuple::vector(0.0, 0.70711, -0.70711));
}

#[test]
fn normal_on_plane_is_constant() {
    let p = Shape::plane();

    for pt in [
        Tuple::point(0.0, 0.0, 0.0),
        Tuple::point(10.0, 0.0, -10.0),
        Tuple::point(-5.0, 0.0, 150.0),
    ].iter() {
        assert_eq!(p.local_normal_at(pt), Tuple::vector(0.0, 1.0, 0.0));
    }
}

#[test]
fn ray_plane_intersections() {
    let p = Shape::plane();

    // Parallel and coplanar rays miss
    assert_ts(ts(&p, Tuple::point(0.0, 10.0, 0.0), Tuple::vector(0.0, 0.0, 1.0)), &[]);
    assert_ts(ts(&p, Tuple::point(0.0, 0.0, 0.0), Tuple::vector(0.0, 0.0, 1.0)), &[]);

    assert_ts(ts(&p, Tuple::point(0.0, 1.0, 0.0), Tuple::vector(0.0, -1.0, 0.0)), &[1.0]);
    assert_ts(ts(&p, Tuple::point(0.0, -1.0, 0.0), Tuple::vector(0.0, 1.0, 0.0)), &[1.0]);
}

#[test]
fn ray_cube_intersections() {
    let c = Shape::cube();
    let cases = [
        (Tuple::point( 5.0,  0.5,  0.0), Tuple::vector(-1.0,  0.0,  0.0),  4.0, 6.0),
        (Tuple::point(-5.0,  0.5,  0.0), Tuple::vector( 1.0,  0.0,  0.0),  4.0, 6.0),
        (Tuple::point( 0.5,  5.0,  0.0), Tuple::vector( 0.0, -1.0,  0.0),  4.0, 6.0),
        (Tuple::point( 0.5, -5.0,  0.0), Tuple::vector( 0.0,  1.0,  0.0),  4.0, 6.0),
        (Tuple::point( 0.5,  0.0,  5.0), Tuple::vector( 0.0,  0.0, -1.0),  4.0, 6.0),
        (Tuple::point( 0.5,  0.0, -5.0), Tuple::vector( 0.0,  0.0,  1.0),  4.0, 6.0),
        (Tuple::point( 0.0,  0.5,  0.0), Tuple::vector( 0.0,  0.0,  1.0), -1.0, 1.0),
    ];

    for &(origin, direction, t1, t2) in cases.iter() {
        assert_ts(ts(&c, origin, direction), &[t1, t2]);
    }
}

#[test]
fn ray_misses_cube() {
    let c = Shape::cube();
    let cases = [
        (Tuple::point(-2.0,  0.0,  0.0), Tuple::vector( 0.2673,  0.5345,  0.8018)),
        (Tuple::point( 0.0, -2.0,  0.0), Tuple::vector( 0.8018,  0.2673,  0.5345)),
        (Tuple::point( 0.0,  0.0, -2.0), Tuple::vector( 0.5345,  0.8018,  0.2673)),
        (Tuple::point( 2.0,  0.0,  2.0), Tuple::vector( 0.0,     0.0,    -1.0)),
        (Tuple::point( 0.0,  2.0,  2.0), Tuple::vector( 0.0,    -1.0,     0.0)),
        (Tuple::point( 2.0,  2.0,  0.0), Tuple::vector(-1.0,     0.0,     0.0)),
    ];

    for &(origin, direction) in cases.iter() {
        assert_ts(ts(&c, origin, direction), &[]);
    }
}

#[test]
fn normals_on_cube() {
    let c = Shape::cube();
    let cases = [
        (Tuple::point( 1.0,  0.5, -0.8), Tuple::vector( 1.0,  0.0,  0.0)),
        (Tuple::point(-1.0, -0.2,  0.9), Tuple::vector(-1.0,  0.0,  0.0)),
        (Tuple::point(-0.4,  1.0, -0.1), Tuple::vector( 0.0,  1.0,  0.0)),
        (Tuple::point( 0.3, -1.0, -0.7), Tuple::vector( 0.0, -1.0,  0.0)),
        (Tuple::point(-0.6,  0.3,  1.0), Tuple::vector( 0.0,  0.0,  1.0)),
        (Tuple::point( 0.4,  0.4, -1.0), Tuple::vector( 0.0,  0.0, -1.0)),
        (Tuple::point( 1.0,  1.0,  1.0), Tuple::vector( 1.0,  0.0,  0.0)),
        (Tuple::point(-1.0, -1.0, -1.0), Tuple::vector(-1.0,  0.0,  0.0)),
    ];

    for &(point, normal) in cases.iter() {
        assert_eq!(c.local_normal_at(&point), normal);
    }
}

#[test]
fn ray_misses_cylinder() {
    let c = Shape::cylinder();

    assert_ts(ts(&c, Tuple::point(1.0, 0.0, 0.0), Tuple::vector(0.0, 1.0, 0.0)), &[]);
    assert_ts(ts(&c, Tuple::point(0.0, 0.0, 0.0), Tuple::vector(0.0, 1.0, 0.0)), &[]);
    assert_ts(ts(&c, Tuple::point(0.0, 0.0, -5.0), Tuple::vector(1.0, 1.0, 1.0)), &[]);
}

#[test]
fn ray_hits_cylinder() {
    let c = Shape::cylinder();

    assert_ts(ts(&c, Tuple::point(1.0, 0.0, -5.0), Tuple::vector(0.0, 0.0, 1.0)),
        &[5.0, 5.0]);
    assert_ts(ts(&c, Tuple::point(0.0, 0.0, -5.0), Tuple::vector(0.0, 0.0, 1.0)),
        &[4.0, 6.0]);
    assert_ts(ts(&c, Tuple::point(0.5, 0.0, -5.0), Tuple::vector(0.1, 1.0, 1.0)),
        &[6.80798, 7.08872]);
}

#[test]
fn normals_on_cylinder() {
    let c = Shape::cylinder();

    assert_eq!(c.local_normal_at(&Tuple::point(1.0, 0.0, 0.0)),
        Tuple::vector(1.0, 0.0, 0.0));
    assert_eq!(c.local_normal_at(&Tuple::point(0.0, 5.0, -1.0)),
        Tuple::vector(0.0, 0.0, -1.0));
    assert_eq!(c.local_normal_at(&Tuple::point(0.0, -2.0, 1.0)),
        Tuple::vector(0.0, 0.0, 1.0));
    assert_eq!(c.local_normal_at(&Tuple::point(-1.0, 1.0, 0.0)),
        Tuple::vector(-1.0, 0.0, 0.0));
}

#[test]
fn default_cylinder_is_unbounded_and_open() {
    assert_eq!(Shape::cylinder().ty,
        ShapeType::Cylinder(-std::f64::INFINITY, std::f64::INFINITY, false));
}

#[test]
fn intersecting_constrained_cylinder() {
    let c = Shape::bounded_cylinder(1.0, 2.0);
    let cases = [
        (Tuple::point(0.0, 1.5,  0.0), Tuple::vector(0.1, 1.0, 0.0), 0),
        (Tuple::point(0.0, 3.0, -5.0), Tuple::vector(0.0, 0.0, 1.0), 0),
        (Tuple::point(0.0, 0.0, -5.0), Tuple::vector(0.0, 0.0, 1.0), 0),
        (Tuple::point(0.0, 2.0, -5.0), Tuple::vector(0.0, 0.0, 1.0), 0),
        (Tuple::point(0.0, 1.0, -5.0), Tuple::vector(0.0, 0.0, 1.0), 0),
        (Tuple::point(0.0, 1.5, -2.0), Tuple::vector(0.0, 0.0, 1.0), 2),
    ];

    for &(origin, direction, count) in cases.iter() {
        assert_eq!(ts(&c, origin, direction).len(), count);
    }
}

#[test]
fn intersecting_capped_cylinder() {
    let c = Shape::capped_cylinder(1.0, 2.0);
    let cases = [
        (Tuple::point(0.0,  3.0,  0.0), Tuple::vector(0.0, -1.0, 0.0)),
        (Tuple::point(0.0,  3.0, -2.0), Tuple::vector(0.0, -1.0, 2.0)),
        (Tuple::point(0.0,  4.0, -2.0), Tuple::vector(0.0, -1.0, 1.0)),
        (Tuple::point(0.0,  0.0, -2.0), Tuple::vector(0.0,  1.0, 2.0)),
        (Tuple::point(0.0, -1.0, -2.0), Tuple::vector(0.0,  1.0, 1.0)),
    ];

    for &(origin, direction) in cases.iter() {
        assert_eq!(ts(&c, origin, direction).len(), 2);
    }
}

#[test]
fn normals_on_cylinder_caps() {
    let c = Shape::capped_cylinder(1.0, 2.0);
    let down = Tuple::vector(0.0, -1.0, 0.0);
    let up = Tuple::vector(0.0, 1.0, 0.0);

    assert_eq!(c.local_normal_at(&Tuple::point(0.0, 1.0, 0.0)), down);
    assert_eq!(c.local_normal_at(&Tuple::point(0.5, 1.0, 0.0)), down);
    assert_eq!(c.local_normal_at(&Tuple::point(0.0, 1.0, 0.5)), down);
    assert_eq!(c.local_normal_at(&Tuple::point(0.0, 2.0, 0.0)), up);
    assert_eq!(c.local_normal_at(&Tuple::point(0.5, 2.0, 0.0)), up);
    assert_eq!(c.local_normal_at(&Tuple::point(0.0, 2.0, 0.5)), up);
}

#[test]
fn open_cylinder_has_no_cap_normals() {
    let c = Shape::bounded_cylinder(1.0, 2.0);

    // Points near the ends of an open cylinder still get the wall normal
    assert_eq!(c.local_normal_at(&Tuple::point(0.5, 2.0, 0.0)),
        Tuple::vector(0.5, 0.0, 0.0));
    assert_eq!(c.local_normal_at(&Tuple::point(0.0, 1.0, -0.5)),
        Tuple::vector(0.0, 0.0, -0.5));
}

#[test]
fn nearly_vertical_ray_hits_cylinder_wall() {
    let c = Shape::cylinder();
    let r = Ray::new(Tuple::point(0.99, 0.0, 0.0),
        Tuple::vector(0.001, 1.0, 0.0).normalize());

    let xs = c.local_intersect(&r);
    assert_eq!(xs.len(), 2);

    let exit = r.position(xs[1]);
    assert!(xs[1] > 0.0);
    assert!(crate::feq(exit.x, 1.0));
}

#[test]
fn nearly_vertical_ray_hits_wide_cylinder() {
    let c = Shape::cylinder()
        .with_transform(Matrix4::scaling(10.0, 1.0, 10.0))
        .unwrap();
    let r = Ray::new(Tuple::point(9.9, 0.0, 0.0),
        Tuple::vector(0.01, 1.0, 0.0).normalize());

    let xs = c.intersect(ShapeId(0), &r);
    assert_eq!(xs.len(), 2);

    let exit = r.position(xs[1].t);
    assert!(xs[1].t > 0.0);
    assert!(crate::feq(exit.x, 10.0));
}

#[test]
fn ray_inside_huge_cube_has_finite_intersections() {
    let c = Shape::cube()
        .with_transform(Matrix4::scaling(1e5, 1e5, 1e5))
        .unwrap();
    let r = Ray::new(Tuple::point(1.0, 2.0, 3.0), Tuple::vector(0.0, 0.0, 1.0));

    let xs = c.intersect(ShapeId(0), &r);
    assert_eq!(xs.len(), 2);
    assert!(crate::feq(xs[0].t, -100003.0));
    assert!(crate::feq(xs[1].t, 99997.0));
}

#[test]
fn material_edits_bypass_validation_until_set() {
    use crate::error::Error;

    let mut s = Shape::sphere();
    s.material_mut().ambient = -1.0;
    assert!(matches!(s.material().validate(),
        Err(Error::InvalidMaterial { property: "ambient", .. })));

    let copy = s.material().clone();
    assert!(matches!(Shape::sphere().set_material(copy),
        Err(Error::InvalidMaterial { property: "ambient", .. })));
}
