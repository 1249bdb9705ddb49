use crate::feq;
use crate::config::RenderConfig;
use crate::error::{ Error, Result };
use crate::ray::Ray;
use crate::tuple::Tuple;
use crate::color::Color;
use crate::matrix::Matrix4;
use crate::light::{ PointLight, Material, lighting };
use crate::shape::Shape;
use crate::intersect::{ Intersections, IntersectionComputation, ShapeId };

/// A world with objects and light.
///
/// The world owns its shapes; intersections refer back to them through
/// `ShapeId` handles. Shapes can be added but never removed, so a handle stays
/// valid for the life of the world.
///
/// Shading (shadows, reflection, refraction) is driven from here.
#[derive(Clone, Debug)]
pub struct World {
    objects: Vec<Shape>,
    pub light_source: Option<PointLight>,
}

/// The default world: a white light at `(-10, 10, -10)`, a unit sphere with a
/// green-ish material, and a second sphere scaled by half inside the first.
impl Default for World {
    fn default() -> World {
        let light_source = PointLight::new(
            Color::white(),
            Tuple::point(-10.0, 10.0, -10.0)
        );

        let mut s1 = Shape::sphere();
        *s1.material_mut() = Material {
            color: Color::rgb(0.8, 1.0, 0.6),
            diffuse: 0.7,
            specular: 0.2,
            ..Default::default()
        };

        let s2 = Shape::sphere()
            .with_transform(Matrix4::scaling(0.5, 0.5, 0.5))
            .expect("uniform scaling by one half is invertible");

        World {
            objects: vec![s1, s2],
            light_source: Some(light_source),
        }
    }
}

impl World {
    /// Creates the default world with two spheres.
    pub fn new() -> World {
        Default::default()
    }

    /// Creates a world with no objects and no light source.
    pub fn empty() -> World {
        World { objects: Vec::new(), light_source: None }
    }

    /// Adds a shape to the world, returning its handle.
    pub fn add_object(&mut self, shape: Shape) -> ShapeId {
        self.objects.push(shape);
        ShapeId(self.objects.len() - 1)
    }

    pub fn objects(&self) -> &[Shape] {
        &self.objects
    }

    pub fn object(&self, id: ShapeId) -> Option<&Shape> {
        self.objects.get(id.0)
    }

    pub fn object_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.objects.get_mut(id.0)
    }

    /// Whether the world holds a shape equal to `shape`.
    ///
    /// Shapes compare by value, so this does not tell a shape apart from an
    /// identical copy.
    pub fn contains(&self, shape: &Shape) -> bool {
        self.objects.iter().any(|s| s == shape)
    }

    /// Intersects a ray against all objects in a world, sorted by `t`.
    pub fn intersect(&self, r: &Ray) -> Intersections {
        let mut intersections = Intersections::new();
        for (i, obj) in self.objects.iter().enumerate() {
            intersections.extend(obj.intersect(ShapeId(i), r));
        }

        intersections.sort();
        intersections
    }

    /// Determines whether anything lies between a point and the light.
    pub fn is_shadowed(&self, p: Tuple) -> Result<bool> {
        let light = self.light_source.as_ref().ok_or(Error::MissingLightSource)?;

        let v = light.position - p;
        let distance = v.magnitude();
        let r = Ray::new(p, v.normalize());

        Ok(match self.intersect(&r).hit() {
            Some(i) => i.t < distance,
            None => false,
        })
    }

    /// Calculates the color for a hit, based on shadows, light, reflection
    /// and refraction.
    ///
    /// `remaining` bounds how many more reflected or refracted rays may be
    /// spawned.
    pub fn shade_hit(&self, comps: &IntersectionComputation, remaining: usize,
        config: &RenderConfig) -> Result<Color> {
        let light = self.light_source.as_ref().ok_or(Error::MissingLightSource)?;
        let obj = self.object(comps.object)
            .ok_or(Error::UnknownShape(comps.object))?;
        let m = obj.material();

        let shadowed = self.is_shadowed(comps.over_point)?;
        let surface = lighting(m, obj, light, comps.over_point, comps.eyev,
            comps.normalv, shadowed);

        let reflected = self.reflected_color(comps, remaining, config)?;
        let refracted = self.refracted_color(comps, remaining, config)?;

        if m.reflective > 0.0 && m.transparency > 0.0 {
            let reflectance = comps.schlick();
            Ok(surface
                + reflected * reflectance
                + refracted * (1.0 - reflectance))
        } else {
            Ok(surface + reflected + refracted)
        }
    }

    /// The color seen in a reflective surface.
    pub fn reflected_color(&self, comps: &IntersectionComputation,
        remaining: usize, config: &RenderConfig) -> Result<Color> {
        let obj = self.object(comps.object)
            .ok_or(Error::UnknownShape(comps.object))?;
        let reflective = obj.material().reflective;

        if remaining == 0 || feq(reflective, 0.0) {
            return Ok(Color::black());
        }

        let reflect_ray = Ray::new(comps.over_point, comps.reflectv);
        let color = self.color_at(&reflect_ray, remaining - 1, config)?;

        Ok(color * reflective)
    }

    /// The color seen through a transparent surface.
    ///
    /// Black under total internal reflection.
    pub fn refracted_color(&self, comps: &IntersectionComputation,
        remaining: usize, config: &RenderConfig) -> Result<Color> {
        let obj = self.object(comps.object)
            .ok_or(Error::UnknownShape(comps.object))?;
        let transparency = obj.material().transparency;

        if remaining == 0 || feq(transparency, 0.0) {
            return Ok(Color::black());
        }

        // Snell's law
        let n_ratio = comps.n1 / comps.n2;
        let cos_i = comps.eyev.dot(&comps.normalv);
        let sin2_t = n_ratio.powi(2) * (1.0 - cos_i.powi(2));
        if sin2_t > 1.0 {
            return Ok(Color::black());
        }

        let cos_t = (1.0 - sin2_t).sqrt();
        let direction = comps.normalv * (n_ratio * cos_i - cos_t)
            - comps.eyev * n_ratio;

        let refract_ray = Ray::new(comps.under_point, direction);
        let color = self.color_at(&refract_ray, remaining - 1, config)?;

        Ok(color * transparency)
    }

    /// The color seen along a ray. Black if the ray hits nothing.
    pub fn color_at(&self, r: &Ray, remaining: usize, config: &RenderConfig)
        -> Result<Color> {
        let xs = self.intersect(r);

        match xs.hit() {
            None => Ok(Color::black()),
            Some(hit) => {
                let comps = IntersectionComputation::new(self, r, &hit,
                    Some(&xs), config.epsilon)?;
                self.shade_hit(&comps, remaining, config)
            },
        }
    }
}

#[cfg(test)]
fn comps_for(w: &World, r: &Ray, t: f64, id: usize) -> IntersectionComputation {
    use crate::intersect::Intersection;

    let i = Intersection::new(t, ShapeId(id));
    let xs: Intersections = vec![i].into();
    IntersectionComputation::new(w, r, &i, Some(&xs), RenderConfig::default().epsilon)
        .unwrap()
}

#[cfg(test)]
fn sqrt2_over_2() -> f64 {
    2.0f64.sqrt() / 2.0
}

#[test]
fn default_world() {
    let w = World::default();

    assert_eq!(w.light_source, Some(PointLight::new(
        Color::white(), Tuple::point(-10.0, 10.0, -10.0)
    )));
    assert_eq!(w.objects().len(), 2);

    let mut s1 = Shape::sphere();
    s1.material_mut().color = Color::rgb(0.8, 1.0, 0.6);
    s1.material_mut().diffuse = 0.7;
    s1.material_mut().specular = 0.2;
    assert!(w.contains(&s1));

    let s2 = Shape::sphere()
        .with_transform(Matrix4::scaling(0.5, 0.5, 0.5))
        .unwrap();
    assert!(w.contains(&s2));

    assert!(!w.contains(&Shape::glass_sphere()));
}

#[test]
fn empty_world() {
    let w = World::empty();

    assert!(w.objects().is_empty());
    assert!(w.light_source.is_none());
    assert!(w.object(ShapeId(0)).is_none());
}

#[test]
fn adding_objects_returns_handles() {
    let mut w = World::empty();

    assert_eq!(w.add_object(Shape::sphere()), ShapeId(0));
    assert_eq!(w.add_object(Shape::plane()), ShapeId(1));
    assert_eq!(w.object(ShapeId(1)).unwrap().ty, crate::shape::ShapeType::Plane);
}

#[test]
fn intersect_default_world_with_ray() {
    let w = World::default();
    let r = Ray::new(Tuple::point(0.0, 0.0, -5.0), Tuple::vector(0.0, 0.0, 1.0));
    let xs = w.intersect(&r);

    assert_eq!(xs.len(), 4);
    assert_eq!(xs[0].t, 4.0);
    assert_eq!(xs[1].t, 4.5);
    assert_eq!(xs[2].t, 5.5);
    assert_eq!(xs[3].t, 6.0);
}

#[test]
fn shade_intersection_from_outside() {
    let w = World::default();
    let r = Ray::new(Tuple::point(0.0, 0.0, -5.0), Tuple::vector(0.0, 0.0, 1.0));
    let comps = comps_for(&w, &r, 4.0, 0);

    let c = w.shade_hit(&comps, 5, &RenderConfig::default()).unwrap();
    assert_eq!(c, Color::rgb(0.38066, 0.47583, 0.2855));
}

#[test]
fn shade_intersection_from_inside() {
    let mut w = World::default();
    w.light_source = Some(PointLight::new(
        Color::white(), Tuple::point(0.0, 0.25, 0.0)
    ));
    let r = Ray::new(Tuple::point(0.0, 0.0, 0.0), Tuple::vector(0.0, 0.0, 1.0));
    let comps = comps_for(&w, &r, 0.5, 1);

    let c = w.shade_hit(&comps, 5, &RenderConfig::default()).unwrap();
    assert_eq!(c, Color::rgb(0.90498, 0.90498, 0.90498));
}

#[test]
fn shade_intersection_in_shadow() {
    let mut w = World::empty();
    w.light_source = Some(PointLight::new(
        Color::white(), Tuple::point(0.0, 0.0, -10.0)
    ));
    w.add_object(Shape::sphere());
    w.add_object(Shape::sphere()
        .with_transform(Matrix4::translation(0.0, 0.0, 10.0))
        .unwrap());

    let r = Ray::new(Tuple::point(0.0, 0.0, 5.0), Tuple::vector(0.0, 0.0, 1.0));
    let comps = comps_for(&w, &r, 4.0, 1);

    let c = w.shade_hit(&comps, 5, &RenderConfig::default()).unwrap();
    assert_eq!(c, Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn shading_without_light_fails() {
    let mut w = World::default();
    w.light_source = None;
    let r = Ray::new(Tuple::point(0.0, 0.0, -5.0), Tuple::vector(0.0, 0.0, 1.0));

    let res = w.color_at(&r, 5, &RenderConfig::default());
    assert!(matches!(res, Err(Error::MissingLightSource)));
    assert!(matches!(w.is_shadowed(Tuple::point(0.0, 0.0, 0.0)),
        Err(Error::MissingLightSource)));

    // A miss never needs the light
    let r = Ray::new(Tuple::point(0.0, 0.0, -5.0), Tuple::vector(0.0, 1.0, 0.0));
    assert_eq!(w.color_at(&r, 5, &RenderConfig::default()).unwrap(),
        Color::black());
}

#[test]
fn color_ray_miss() {
    let w = World::default();
    let r = Ray::new(Tuple::point(0.0, 0.0, -5.0), Tuple::vector(0.0, 1.0, 0.0));

    assert_eq!(w.color_at(&r, 5, &RenderConfig::default()).unwrap(),
        Color::black());
}

#[test]
fn color_ray_hit() {
    let w = World::default();
    let r = Ray::new(Tuple::point(0.0, 0.0, -5.0), Tuple::vector(0.0, 0.0, 1.0));

    assert_eq!(w.color_at(&r, 5, &RenderConfig::default()).unwrap(),
        Color::rgb(0.38066, 0.47583, 0.2855));
}

#[test]
fn color_behind_ray() {
    let mut w = World::default();
    w.object_mut(ShapeId(0)).unwrap().material_mut().ambient = 1.0;
    w.object_mut(ShapeId(1)).unwrap().material_mut().ambient = 1.0;

    let r = Ray::new(Tuple::point(0.0, 0.0, 0.75), Tuple::vector(0.0, 0.0, -1.0));
    let inner_color = w.object(ShapeId(1)).unwrap().material().color;

    assert_eq!(w.color_at(&r, 5, &RenderConfig::default()).unwrap(),
        inner_color);
}

#[test]
fn shadows_in_default_world() {
    let w = World::default();

    // Nothing collinear between point and light
    assert!(!w.is_shadowed(Tuple::point(0.0, 10.0, 0.0)).unwrap());

    // Object between point and light
    assert!(w.is_shadowed(Tuple::point(10.0, -10.0, 10.0)).unwrap());

    // Object behind the light
    assert!(!w.is_shadowed(Tuple::point(-20.0, 20.0, -20.0)).unwrap());

    // Object behind the point
    assert!(!w.is_shadowed(Tuple::point(-2.0, 2.0, -2.0)).unwrap());
}

#[test]
fn reflected_color_for_nonreflective_material() {
    let mut w = World::default();
    w.object_mut(ShapeId(1)).unwrap().material_mut().ambient = 1.0;

    let r = Ray::new(Tuple::point(0.0, 0.0, 0.0), Tuple::vector(0.0, 0.0, 1.0));
    let comps = comps_for(&w, &r, 1.0, 1);

    assert_eq!(w.reflected_color(&comps, 5, &RenderConfig::default()).unwrap(),
        Color::black());
}

#[cfg(test)]
fn world_with_reflective_floor() -> World {
    let mut w = World::default();
    let mut floor = Shape::plane()
        .with_transform(Matrix4::translation(0.0, -1.0, 0.0))
        .unwrap();
    floor.material_mut().reflective = 0.5;
    w.add_object(floor);

    w
}

#[test]
fn reflected_color_for_reflective_material() {
    let w = world_with_reflective_floor();
    let h = sqrt2_over_2();
    let r = Ray::new(Tuple::point(0.0, 0.0, -3.0), Tuple::vector(0.0, -h, h));
    let comps = comps_for(&w, &r, 2.0f64.sqrt(), 2);

    assert_eq!(w.reflected_color(&comps, 5, &RenderConfig::default()).unwrap(),
        Color::rgb(0.19032, 0.2379, 0.14274));
}

#[test]
fn shade_hit_with_reflective_material() {
    let w = world_with_reflective_floor();
    let h = sqrt2_over_2();
    let r = Ray::new(Tuple::point(0.0, 0.0, -3.0), Tuple::vector(0.0, -h, h));
    let comps = comps_for(&w, &r, 2.0f64.sqrt(), 2);

    assert_eq!(w.shade_hit(&comps, 5, &RenderConfig::default()).unwrap(),
        Color::rgb(0.87677, 0.92436, 0.82918));
}

#[test]
fn reflected_color_at_maximum_depth() {
    let w = world_with_reflective_floor();
    let h = sqrt2_over_2();
    let r = Ray::new(Tuple::point(0.0, 0.0, -3.0), Tuple::vector(0.0, -h, h));
    let comps = comps_for(&w, &r, 2.0f64.sqrt(), 2);

    assert_eq!(w.reflected_color(&comps, 0, &RenderConfig::default()).unwrap(),
        Color::black());
}

#[test]
fn mutually_reflective_surfaces_terminate() {
    let mut w = World::empty();
    w.light_source = Some(PointLight::new(
        Color::white(), Tuple::point(0.0, 0.0, 0.0)
    ));

    let mut lower = Shape::plane()
        .with_transform(Matrix4::translation(0.0, -1.0, 0.0))
        .unwrap();
    lower.material_mut().reflective = 1.0;
    w.add_object(lower);

    let mut upper = Shape::plane()
        .with_transform(Matrix4::translation(0.0, 1.0, 0.0))
        .unwrap();
    upper.material_mut().reflective = 1.0;
    w.add_object(upper);

    let r = Ray::new(Tuple::point(0.0, 0.0, 0.0), Tuple::vector(0.0, 1.0, 0.0));
    assert!(w.color_at(&r, 5, &RenderConfig::default()).is_ok());
}

#[test]
fn refracted_color_with_opaque_surface() {
    let w = World::default();
    let r = Ray::new(Tuple::point(0.0, 0.0, -5.0), Tuple::vector(0.0, 0.0, 1.0));
    let comps = comps_for(&w, &r, 4.0, 0);

    assert_eq!(w.refracted_color(&comps, 5, &RenderConfig::default()).unwrap(),
        Color::black());
}

#[test]
fn refracted_color_at_maximum_depth() {
    let mut w = World::default();
    {
        let m = w.object_mut(ShapeId(0)).unwrap().material_mut();
        m.transparency = 1.0;
        m.refractive_index = 1.5;
    }

    let r = Ray::new(Tuple::point(0.0, 0.0, -5.0), Tuple::vector(0.0, 0.0, 1.0));
    let comps = comps_for(&w, &r, 4.0, 0);

    assert_eq!(w.refracted_color(&comps, 0, &RenderConfig::default()).unwrap(),
        Color::black());
}

#[test]
fn refracted_color_under_total_internal_reflection() {
    use crate::intersect::Intersection;

    let mut w = World::default();
    {
        let m = w.object_mut(ShapeId(0)).unwrap().material_mut();
        m.transparency = 1.0;
        m.refractive_index = 1.5;
    }

    let h = sqrt2_over_2();
    let r = Ray::new(Tuple::point(0.0, 0.0, h), Tuple::vector(0.0, 1.0, 0.0));
    let xs: Intersections = vec![
        Intersection::new(-h, ShapeId(0)),
        Intersection::new(h, ShapeId(0)),
    ].into();

    let config = RenderConfig::default();
    let comps = IntersectionComputation::new(&w, &r, &xs[1], Some(&xs),
        config.epsilon).unwrap();

    assert_eq!(w.refracted_color(&comps, 5, &config).unwrap(), Color::black());
}

#[test]
fn refracted_color_with_refracted_ray() {
    use crate::intersect::Intersection;
    use crate::pattern::Pattern;

    let mut w = World::default();
    {
        let m = w.object_mut(ShapeId(0)).unwrap().material_mut();
        m.ambient = 1.0;
        m.pattern = Some(Pattern::test());
    }
    {
        let m = w.object_mut(ShapeId(1)).unwrap().material_mut();
        m.transparency = 1.0;
        m.refractive_index = 1.5;
    }

    let r = Ray::new(Tuple::point(0.0, 0.0, 0.1), Tuple::vector(0.0, 1.0, 0.0));
    let xs: Intersections = vec![
        Intersection::new(-0.9899, ShapeId(0)),
        Intersection::new(-0.4899, ShapeId(1)),
        Intersection::new(0.4899, ShapeId(1)),
        Intersection::new(0.9899, ShapeId(0)),
    ].into();

    let config = RenderConfig::default();
    let comps = IntersectionComputation::new(&w, &r, &xs[2], Some(&xs),
        config.epsilon).unwrap();

    assert_eq!(w.refracted_color(&comps, 5, &config).unwrap(),
        Color::rgb(0.0, 0.99888, 0.04725));
}

#[cfg(test)]
fn world_with_glass_floor(reflective: f64) -> World {
    let mut w = World::default();

    let mut floor = Shape::plane()
        .with_transform(Matrix4::translation(0.0, -1.0, 0.0))
        .unwrap();
    {
        let m = floor.material_mut();
        m.transparency = 0.5;
        m.refractive_index = 1.5;
        m.reflective = reflective;
    }
    w.add_object(floor);

    let mut ball = Shape::sphere()
        .with_transform(Matrix4::translation(0.0, -3.5, -0.5))
        .unwrap();
    ball.material_mut().color = Color::rgb(1.0, 0.0, 0.0);
    ball.material_mut().ambient = 0.5;
    w.add_object(ball);

    w
}

#[test]
fn shade_hit_with_transparent_material() {
    let w = world_with_glass_floor(0.0);
    let h = sqrt2_over_2();
    let r = Ray::new(Tuple::point(0.0, 0.0, -3.0), Tuple::vector(0.0, -h, h));
    let comps = comps_for(&w, &r, 2.0f64.sqrt(), 2);

    assert_eq!(w.shade_hit(&comps, 5, &RenderConfig::default()).unwrap(),
        Color::rgb(0.93642, 0.68642, 0.68642));
}

#[test]
fn shade_hit_with_reflective_transparent_material() {
    let w = world_with_glass_floor(0.5);
    let h = sqrt2_over_2();
    let r = Ray::new(Tuple::point(0.0, 0.0, -3.0), Tuple::vector(0.0, -h, h));
    let comps = comps_for(&w, &r, 2.0f64.sqrt(), 2);

    assert_eq!(w.shade_hit(&comps, 5, &RenderConfig::default()).unwrap(),
        Color::rgb(0.93391, 0.69643, 0.69243));
}

#[test]
fn color_at_is_deterministic() {
    let w = world_with_glass_floor(0.5);
    let h = sqrt2_over_2();
    let r = Ray::new(Tuple::point(0.0, 0.0, -3.0), Tuple::vector(0.0, -h, h));
    let config = RenderConfig::default();

    let first = w.color_at(&r, config.recursion_depth, &config).unwrap();
    let second = w.color_at(&r, config.recursion_depth, &config).unwrap();

    assert_eq!(first.r.to_bits(), second.r.to_bits());
    assert_eq!(first.g.to_bits(), second.g.to_bits());
    assert_eq!(first.b.to_bits(), second.b.to_bits());
}

#[test]
fn color_inside_huge_cube_is_finite() {
    let mut w = World::empty();
    w.light_source = Some(PointLight::new(
        Color::white(),
        Tuple::point(-10.0, 10.0, -10.0)
    ));
    w.add_object(Shape::cube()
        .with_transform(Matrix4::scaling(1e5, 1e5, 1e5))
        .unwrap());

    let r = Ray::new(Tuple::point(1.0, 2.0, 3.0), Tuple::vector(0.0, 0.0, 1.0));
    let config = RenderConfig::default();
    let c = w.color_at(&r, config.recursion_depth, &config).unwrap();

    assert!(c.r.is_finite() && c.g.is_finite() && c.b.is_finite());
}
