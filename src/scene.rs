use std::convert::TryFrom;
use std::fs;
use std::path::Path;

use log::{ debug, warn };
use serde::{ Serialize, Deserialize };

use crate::error::{ Error, Result };
use crate::config::RenderConfig;
use crate::tuple::Tuple;
use crate::color::Color;
use crate::matrix::Matrix4;
use crate::pattern::Pattern;
use crate::light::{ PointLight, Material };
use crate::shape::Shape;
use crate::world::World;
use crate::camera::Camera;

/// A world and a camera looking at it, loaded from a JSON scene description.
///
/// A scene looks like this (every `transform`, `material`, `light` and
/// `config` entry is optional):
///
/// ```json
/// {
///   "camera": {
///     "width": 100, "height": 50, "field_of_view": 1.0472,
///     "from": [0, 1.5, -5], "to": [0, 1, 0], "up": [0, 1, 0]
///   },
///   "light": { "position": [-10, 10, -10], "intensity": [1, 1, 1] },
///   "shapes": [
///     {
///       "type": "sphere",
///       "transform": [{ "scale": [0.5, 0.5, 0.5] }, { "translate": [1, 0, 0] }],
///       "material": {
///         "diffuse": 0.7,
///         "pattern": { "type": "stripe", "colors": [[1, 1, 1], [0, 0, 0]] }
///       }
///     }
///   ],
///   "config": { "recursion_depth": 3 }
/// }
/// ```
///
/// Transforms are applied in the order they are listed.
#[derive(Clone, Debug)]
pub struct Scene {
    pub world: World,
    pub camera: Camera,
    pub config: RenderConfig,
}

impl Scene {
    /// Parses and validates a scene description.
    pub fn from_json(json: &str) -> Result<Scene> {
        let scene_json: SceneJson = serde_json::from_str(json)?;
        Scene::try_from(scene_json)
    }

    /// Reads a scene description from a file.
    pub fn load(path: &Path) -> Result<Scene> {
        debug!("loading scene from {}", path.display());
        Scene::from_json(&fs::read_to_string(path)?)
    }
}

impl TryFrom<SceneJson> for Scene {
    type Error = Error;

    fn try_from(scene_json: SceneJson) -> Result<Scene> {
        let camera = Camera::try_from(scene_json.camera)?;

        let mut world = World::empty();
        world.light_source = scene_json.light.map(|light| PointLight::new(
            light.intensity.into(),
            light.position.into()
        ));

        if world.light_source.is_none() {
            warn!("scene has no light source; shading will fail");
        }

        for shape_json in scene_json.shapes {
            world.add_object(Shape::try_from(shape_json)?);
        }

        debug!("loaded scene with {} shapes, {}x{} camera",
            world.objects().len(), camera.hsize(), camera.vsize());

        Ok(Scene { world, camera, config: scene_json.config })
    }
}

#[derive(Serialize, Deserialize)]
struct SceneJson {
    camera: CameraJson,
    light: Option<LightJson>,

    #[serde(default)]
    shapes: Vec<ShapeJson>,

    #[serde(default)]
    config: RenderConfig,
}

#[derive(Serialize, Deserialize)]
struct CameraJson {
    width: usize,
    height: usize,
    field_of_view: f64,

    from: [f64; 3],
    to: [f64; 3],
    up: [f64; 3],
}

impl TryFrom<CameraJson> for Camera {
    type Error = Error;

    fn try_from(camera_json: CameraJson) -> Result<Camera> {
        let [ux, uy, uz] = camera_json.up;
        let view = Matrix4::view_transform(
            camera_json.from.into(),
            camera_json.to.into(),
            Tuple::vector(ux, uy, uz)
        );

        Camera::new(camera_json.width, camera_json.height,
            camera_json.field_of_view)
            .with_transform(view)
    }
}

#[derive(Serialize, Deserialize)]
struct LightJson {
    position: [f64; 3],
    intensity: [f64; 3],
}

/// A single step of a transform list.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TransformJson {
    Translate([f64; 3]),
    Scale([f64; 3]),
    RotateX(f64),
    RotateY(f64),
    RotateZ(f64),
    Shear([f64; 6]),
}

impl From<&TransformJson> for Matrix4 {
    fn from(step: &TransformJson) -> Matrix4 {
        match *step {
            TransformJson::Translate([x, y, z]) => Matrix4::translation(x, y, z),
            TransformJson::Scale([x, y, z]) => Matrix4::scaling(x, y, z),
            TransformJson::RotateX(r) => Matrix4::rotation_x(r),
            TransformJson::RotateY(r) => Matrix4::rotation_y(r),
            TransformJson::RotateZ(r) => Matrix4::rotation_z(r),
            TransformJson::Shear([xy, xz, yx, yz, zx, zy]) =>
                Matrix4::shearing(xy, xz, yx, yz, zx, zy),
        }
    }
}

/// Chains transform steps so the first listed is applied first.
fn chain(steps: &[TransformJson]) -> Matrix4 {
    steps.iter()
        .fold(Matrix4::identity(), |m, step| Matrix4::from(step) * m)
}

#[derive(Serialize, Deserialize)]
struct ShapeJson {
    #[serde(flatten)]
    kind: ShapeKindJson,

    #[serde(default)]
    transform: Vec<TransformJson>,

    material: Option<MaterialJson>,
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ShapeKindJson {
    Sphere,
    Plane,
    Cube,
    Cylinder {
        minimum: Option<f64>,
        maximum: Option<f64>,

        #[serde(default)]
        closed: bool,
    },
}

impl TryFrom<ShapeJson> for Shape {
    type Error = Error;

    fn try_from(shape_json: ShapeJson) -> Result<Shape> {
        let mut shape = match shape_json.kind {
            ShapeKindJson::Sphere => Shape::sphere(),
            ShapeKindJson::Plane => Shape::plane(),
            ShapeKindJson::Cube => Shape::cube(),
            ShapeKindJson::Cylinder { minimum, maximum, closed } => {
                // Missing bounds leave the cylinder infinite in that direction
                let minimum = minimum.unwrap_or(-std::f64::INFINITY);
                let maximum = maximum.unwrap_or(std::f64::INFINITY);

                if closed {
                    Shape::capped_cylinder(minimum, maximum)
                } else {
                    Shape::bounded_cylinder(minimum, maximum)
                }
            },
        };

        shape.set_transform(chain(&shape_json.transform))?;

        if let Some(material_json) = shape_json.material {
            shape.set_material(Material::try_from(material_json)?)?;
        }

        Ok(shape)
    }
}

/// Material overrides; anything left out keeps its default.
#[derive(Serialize, Deserialize)]
struct MaterialJson {
    color: Option<[f64; 3]>,
    pattern: Option<PatternJson>,
    ambient: Option<f64>,
    diffuse: Option<f64>,
    specular: Option<f64>,
    shininess: Option<f64>,
    reflective: Option<f64>,
    transparency: Option<f64>,
    refractive_index: Option<f64>,
}

impl TryFrom<MaterialJson> for Material {
    type Error = Error;

    fn try_from(material_json: MaterialJson) -> Result<Material> {
        let defaults = Material::default();

        let pattern = match material_json.pattern {
            Some(pattern_json) => Some(Pattern::try_from(pattern_json)?),
            None => None,
        };

        Ok(Material {
            color: material_json.color.map(Color::from).unwrap_or(defaults.color),
            pattern,
            ambient: material_json.ambient.unwrap_or(defaults.ambient),
            diffuse: material_json.diffuse.unwrap_or(defaults.diffuse),
            specular: material_json.specular.unwrap_or(defaults.specular),
            shininess: material_json.shininess.unwrap_or(defaults.shininess),
            reflective: material_json.reflective.unwrap_or(defaults.reflective),
            transparency: material_json.transparency
                .unwrap_or(defaults.transparency),
            refractive_index: material_json.refractive_index
                .unwrap_or(defaults.refractive_index),
        })
    }
}

#[derive(Serialize, Deserialize)]
struct PatternJson {
    #[serde(flatten)]
    kind: PatternKindJson,

    #[serde(default)]
    transform: Vec<TransformJson>,
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum PatternKindJson {
    Stripe { colors: [[f64; 3]; 2] },
    Gradient { colors: [[f64; 3]; 2] },
    Ring { colors: [[f64; 3]; 2] },
    Checker { colors: [[f64; 3]; 2] },
    Nested { a: Box<PatternJson>, b: Box<PatternJson> },
    Blended { a: Box<PatternJson>, b: Box<PatternJson> },
    Perturbed { pattern: Box<PatternJson> },
}

impl TryFrom<PatternJson> for Pattern {
    type Error = Error;

    fn try_from(pattern_json: PatternJson) -> Result<Pattern> {
        let pattern = match pattern_json.kind {
            PatternKindJson::Stripe { colors: [a, b] } =>
                Pattern::stripe(a.into(), b.into()),
            PatternKindJson::Gradient { colors: [a, b] } =>
                Pattern::gradient(a.into(), b.into()),
            PatternKindJson::Ring { colors: [a, b] } =>
                Pattern::ring(a.into(), b.into()),
            PatternKindJson::Checker { colors: [a, b] } =>
                Pattern::checker(a.into(), b.into()),
            PatternKindJson::Nested { a, b } =>
                Pattern::nested(Pattern::try_from(*a)?, Pattern::try_from(*b)?),
            PatternKindJson::Blended { a, b } =>
                Pattern::blended(Pattern::try_from(*a)?, Pattern::try_from(*b)?),
            PatternKindJson::Perturbed { pattern } =>
                Pattern::perturbed(Pattern::try_from(*pattern)?),
        };

        pattern.with_transform(chain(&pattern_json.transform))
    }
}

#[cfg(test)]
const TEST_SCENE: &str = r#"{
    "camera": {
        "width": 20, "height": 10, "field_of_view": 1.5707963267948966,
        "from": [0, 0, -5], "to": [0, 0, 0], "up": [0, 1, 0]
    },
    "light": { "position": [-10, 10, -10], "intensity": [1, 1, 1] },
    "shapes": [
        {
            "type": "sphere",
            "material": { "color": [0.8, 1.0, 0.6], "diffuse": 0.7, "specular": 0.2 }
        },
        {
            "type": "sphere",
            "transform": [{ "scale": [0.5, 0.5, 0.5] }]
        },
        {
            "type": "plane",
            "transform": [{ "translate": [0, -1, 0] }],
            "material": {
                "reflective": 0.5,
                "pattern": {
                    "type": "nested",
                    "a": { "type": "stripe", "colors": [[1, 1, 1], [0, 0, 0]] },
                    "b": {
                        "type": "checker",
                        "colors": [[1, 0, 0], [0, 0, 1]],
                        "transform": [{ "rotate_y": 0.5 }]
                    }
                }
            }
        },
        {
            "type": "cylinder",
            "minimum": 1, "maximum": 2, "closed": true,
            "transform": [{ "scale": [2, 1, 2] }, { "translate": [0, 1, 0] }]
        },
        { "type": "cube" }
    ],
    "config": { "recursion_depth": 3 }
}"#;

#[test]
fn load_scene_from_json() {
    use crate::shape::ShapeType;
    use crate::pattern::PatternKind;

    let scene = Scene::from_json(TEST_SCENE).unwrap();

    assert_eq!(scene.camera.hsize(), 20);
    assert_eq!(scene.camera.vsize(), 10);
    assert_eq!(*scene.camera.transform(),
        Matrix4::scaling(-1.0, 1.0, -1.0) * Matrix4::translation(0.0, 0.0, 5.0));

    let light = scene.world.light_source.unwrap();
    assert_eq!(light.position, Tuple::point(-10.0, 10.0, -10.0));
    assert_eq!(light.intensity, Color::white());

    let objects = scene.world.objects();
    assert_eq!(objects.len(), 5);

    // The first two shapes make up the default world
    let default_world = World::default();
    assert_eq!(objects[0], default_world.objects()[0]);
    assert_eq!(objects[1], default_world.objects()[1]);

    let pattern = objects[2].material().pattern.as_ref().unwrap();
    assert!(matches!(pattern.kind, PatternKind::Nested(_, _)));
    assert_eq!(objects[2].material().reflective, 0.5);

    assert_eq!(objects[3].ty, ShapeType::Cylinder(1.0, 2.0, true));
    assert_eq!(*objects[3].transform(),
        Matrix4::translation(0.0, 1.0, 0.0) * Matrix4::scaling(2.0, 1.0, 2.0));
    assert_eq!(objects[4].ty, ShapeType::Cube);

    assert_eq!(scene.config.recursion_depth, 3);
    assert_eq!(scene.config.epsilon, RenderConfig::default().epsilon);
}

#[test]
fn scene_renders_like_default_world() {
    let scene = Scene::from_json(r#"{
        "camera": {
            "width": 11, "height": 11, "field_of_view": 1.5707963267948966,
            "from": [0, 0, -5], "to": [0, 0, 0], "up": [0, 1, 0]
        },
        "light": { "position": [-10, 10, -10], "intensity": [1, 1, 1] },
        "shapes": [
            {
                "type": "sphere",
                "material": { "color": [0.8, 1.0, 0.6], "diffuse": 0.7, "specular": 0.2 }
            },
            { "type": "sphere", "transform": [{ "scale": [0.5, 0.5, 0.5] }] }
        ]
    }"#).unwrap();

    let image = scene.camera.render(&scene.world, &scene.config).unwrap();
    assert_eq!(image.read_pixel(5, 5).unwrap(),
        Color::rgb(0.38066, 0.47583, 0.2855));
}

#[test]
fn unbounded_cylinder_by_default() {
    use crate::shape::ShapeType;

    let scene = Scene::from_json(r#"{
        "camera": {
            "width": 1, "height": 1, "field_of_view": 1.0,
            "from": [0, 0, -5], "to": [0, 0, 0], "up": [0, 1, 0]
        },
        "shapes": [{ "type": "cylinder" }]
    }"#).unwrap();

    assert!(scene.world.light_source.is_none());
    assert_eq!(scene.world.objects()[0].ty, ShapeType::Cylinder(
        -std::f64::INFINITY, std::f64::INFINITY, false));
}

#[test]
fn negative_material_rejected() {
    let result = Scene::from_json(r#"{
        "camera": {
            "width": 1, "height": 1, "field_of_view": 1.0,
            "from": [0, 0, -5], "to": [0, 0, 0], "up": [0, 1, 0]
        },
        "shapes": [{ "type": "sphere", "material": { "ambient": -0.1 } }]
    }"#);

    assert!(matches!(result,
        Err(Error::InvalidMaterial { property: "ambient", .. })));
}

#[test]
fn singular_transform_rejected() {
    let result = Scene::from_json(r#"{
        "camera": {
            "width": 1, "height": 1, "field_of_view": 1.0,
            "from": [0, 0, -5], "to": [0, 0, 0], "up": [0, 1, 0]
        },
        "shapes": [{ "type": "cube", "transform": [{ "scale": [0, 1, 1] }] }]
    }"#);

    assert!(matches!(result, Err(Error::NotInvertible)));
}

#[test]
fn malformed_scene_rejected() {
    assert!(matches!(Scene::from_json("{ \"camera\": 5 }"),
        Err(Error::Scene(_))));
    assert!(matches!(Scene::from_json(r#"{
        "camera": {
            "width": 1, "height": 1, "field_of_view": 1.0,
            "from": [0, 0, -5], "to": [0, 0, 0], "up": [0, 1, 0]
        },
        "shapes": [{ "type": "teapot" }]
    }"#), Err(Error::Scene(_))));
}

#[test]
fn missing_scene_file() {
    let path = std::env::temp_dir().join("raycaster_no_such_scene.json");
    assert!(matches!(Scene::load(&path), Err(Error::Io(_))));
}
