use crate::feq;
use crate::consts::GLASS_RI;
use crate::error::{ Error, Result };
use crate::color::Color;
use crate::pattern::Pattern;
use crate::tuple::Tuple;
use crate::shape::Shape;

/// A point light.
///
/// Light is produced from a single position, with no size.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointLight {
    pub intensity: Color,
    pub position: Tuple,
}

impl PointLight {
    /// Creates a point light.
    ///
    /// If `position` isn't a point, it is converted to a point automatically.
    pub fn new(intensity: Color, mut position: Tuple) -> PointLight {
        position.w = 1.0;

        PointLight { intensity, position }
    }
}

/// A material record.
///
/// Materials use attributes from the Phong reflection model; ambient, diffuse,
/// specular and shininess. Reflection and refraction are controlled by
/// `reflective`, `transparency` and `refractive_index`.
///
/// If `pattern` is set, it overrides `color`.
///
/// The fields are public, so a struct literal or `Shape::material_mut` can
/// hold any values. Only `Material::new`, `Shape::set_material` and scene
/// loading run `validate`.
#[derive(Clone, Debug)]
pub struct Material {
    pub color: Color,
    pub pattern: Option<Pattern>,

    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub shininess: f64,

    pub reflective: f64,
    pub transparency: f64,
    pub refractive_index: f64,
}

impl Default for Material {
    fn default() -> Material {
        Material {
            color: Color::white(),
            pattern: None,

            ambient: 0.1,
            diffuse: 0.9,
            specular: 0.9,
            shininess: 200.0,

            reflective: 0.0,
            transparency: 0.0,
            refractive_index: 1.0,
        }
    }
}

/// Materials are equal when every field is (approximately) equal.
impl PartialEq for Material {
    fn eq(&self, other: &Material) -> bool {
        self.color == other.color
            && self.pattern == other.pattern
            && feq(self.ambient, other.ambient)
            && feq(self.diffuse, other.diffuse)
            && feq(self.specular, other.specular)
            && feq(self.shininess, other.shininess)
            && feq(self.reflective, other.reflective)
            && feq(self.transparency, other.transparency)
            && feq(self.refractive_index, other.refractive_index)
    }
}

impl Material {
    /// Creates a validated material with the given Phong attributes.
    ///
    /// Fails if any of `ambient`, `diffuse`, `specular` or `shininess` is
    /// negative.
    pub fn new(color: Color, ambient: f64, diffuse: f64, specular: f64,
        shininess: f64) -> Result<Material> {
        let m = Material {
            color,
            ambient,
            diffuse,
            specular,
            shininess,
            ..Default::default()
        };

        m.validate()?;
        Ok(m)
    }

    /// A clear glass material.
    pub fn glass() -> Material {
        Material {
            transparency: 1.0,
            refractive_index: GLASS_RI,
            ..Default::default()
        }
    }

    /// Checks the Phong attributes are non-negative and the refractive index
    /// is positive.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("ambient", self.ambient),
            ("diffuse", self.diffuse),
            ("specular", self.specular),
            ("shininess", self.shininess),
        ];

        for &(property, value) in non_negative.iter() {
            if value < 0.0 {
                return Err(Error::InvalidMaterial { property, value });
            }
        }

        if self.refractive_index <= 0.0 {
            return Err(Error::InvalidMaterial {
                property: "refractive_index",
                value: self.refractive_index,
            });
        }

        Ok(())
    }
}

/// Calculates the Phong shading of a point on `obj`.
///
/// Takes the material, a single light, a point, the eye vector and the normal
/// vector, and calculates how the light looks from the eye. If the point is in
/// a shadow, only ambient light is used.
pub fn lighting(m: &Material, obj: &Shape, light: &PointLight,
    point: Tuple, eyev: Tuple, normalv: Tuple, in_shadow: bool) -> Color {
    let color = match m.pattern {
        Some(ref pat) => pat.pattern_at_shape(obj, point),
        None => m.color,
    };

    let ambient = color * m.ambient;
    if in_shadow {
        return ambient;
    }

    let lightv = (light.position - point).normalize();
    let light_dot_normal = lightv.dot(&normalv);

    // Light on the far side of the surface
    if light_dot_normal < 0.0 {
        return ambient;
    }

    let diffuse = color * m.diffuse * light_dot_normal;

    let reflectv = (-lightv).reflect(&normalv);
    let reflect_dot_eye = reflectv.dot(&eyev);
    let specular = if reflect_dot_eye <= 0.0 {
        Color::black()
    } else {
        light.intensity * m.specular * reflect_dot_eye.powf(m.shininess)
    };

    ambient + diffuse + specular
}

#[cfg(test)]
fn lighting_fixture(eyev: Tuple, light_position: Tuple) -> Color {
    let m = Material::default();
    let s = Shape::sphere();
    let normalv = Tuple::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(Color::white(), light_position);

    lighting(&m, &s, &light, Tuple::point(0.0, 0.0, 0.0), eyev, normalv, false)
}

#[test]
fn default_material() {
    let m = Material::default();

    assert_eq!(m.color, Color::white());
    assert_eq!(m.ambient, 0.1);
    assert_eq!(m.diffuse, 0.9);
    assert_eq!(m.specular, 0.9);
    assert_eq!(m.shininess, 200.0);
    assert_eq!(m.reflective, 0.0);
    assert_eq!(m.transparency, 0.0);
    assert_eq!(m.refractive_index, 1.0);
}

#[test]
fn negative_material_attributes_are_rejected() {
    assert!(Material::new(Color::white(), 0.1, 0.9, 0.9, 200.0).is_ok());

    match Material::new(Color::white(), -0.1, 0.9, 0.9, 200.0) {
        Err(Error::InvalidMaterial { property, .. }) => {
            assert_eq!(property, "ambient")
        },
        other => panic!("unexpected result {:?}", other),
    }

    assert!(Material::new(Color::white(), 0.1, -0.9, 0.9, 200.0).is_err());
    assert!(Material::new(Color::white(), 0.1, 0.9, -0.9, 200.0).is_err());
    assert!(Material::new(Color::white(), 0.1, 0.9, 0.9, -1.0).is_err());

    let m = Material { refractive_index: 0.0, ..Default::default() };
    assert!(m.validate().is_err());
}

#[test]
fn glass_material() {
    let m = Material::glass();
    assert_eq!(m.transparency, 1.0);
    assert_eq!(m.refractive_index, 1.5);
}

#[test]
fn eye_between_light_and_surface() {
    let res = lighting_fixture(
        Tuple::vector(0.0, 0.0, -1.0),
        Tuple::point(0.0, 0.0, -10.0)
    );
    assert_eq!(res, Color::rgb(1.9, 1.9, 1.9));
}

#[test]
fn eye_between_light_and_surface_offset_45() {
    let h = 2.0f64.sqrt() / 2.0;
    let res = lighting_fixture(
        Tuple::vector(0.0, h, -h),
        Tuple::point(0.0, 0.0, -10.0)
    );
    assert_eq!(res, Color::rgb(1.0, 1.0, 1.0));
}

#[test]
fn eye_opposite_from_surface_offset_45() {
    let res = lighting_fixture(
        Tuple::vector(0.0, 0.0, -1.0),
        Tuple::point(0.0, 10.0, -10.0)
    );
    assert_eq!(res, Color::rgb(0.7364, 0.7364, 0.7364));
}

#[test]
fn eye_in_path_of_reflection() {
    let h = 2.0f64.sqrt() / 2.0;
    let res = lighting_fixture(
        Tuple::vector(0.0, -h, -h),
        Tuple::point(0.0, 10.0, -10.0)
    );
    assert_eq!(res, Color::rgb(1.6364, 1.6364, 1.6364));
}

#[test]
fn light_behind_surface() {
    let res = lighting_fixture(
        Tuple::vector(0.0, 0.0, -1.0),
        Tuple::point(0.0, 0.0, 10.0)
    );
    assert_eq!(res, Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn surface_in_shadow() {
    let m = Material::default();
    let s = Shape::sphere();
    let eyev = Tuple::vector(0.0, 0.0, -1.0);
    let normalv = Tuple::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(Color::white(), Tuple::point(0.0, 0.0, -10.0));

    let res = lighting(&m, &s, &light, Tuple::point(0.0, 0.0, 0.0),
        eyev, normalv, true);
    assert_eq!(res, Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn lighting_with_stripe_pattern() {
    // Only ambient light contributes, so the pattern color shows through
    let m = Material {
        color: Color::rgb(0.5, 0.5, 0.5),
        pattern: Some(Pattern::stripe(Color::white(), Color::black())),
        ambient: 1.0,
        diffuse: 0.0,
        specular: 0.0,
        ..Default::default()
    };

    let s = Shape::sphere();
    let eyev = Tuple::vector(0.0, 0.0, -1.0);
    let normalv = Tuple::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(Color::white(), Tuple::point(0.0, 0.0, -10.0));

    assert_eq!(
        lighting(&m, &s, &light, Tuple::point(0.9, 0.0, 0.0),
            eyev, normalv, false),
        Color::white()
    );
    assert_eq!(
        lighting(&m, &s, &light, Tuple::point(1.1, 0.0, 0.0),
            eyev, normalv, false),
        Color::black()
    );
}
