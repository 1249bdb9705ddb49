use serde::{ Serialize, Deserialize };

use crate::consts::{ FEQ_EPSILON, RECURSION_DEPTH };

/// Tunables for the shading engine.
///
/// Passed explicitly into `World::color_at` and `Camera::render` so that
/// tests and scenes can vary them without touching global state.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Offset used for over/under points, preventing shadow and refraction
    /// acne.
    pub epsilon: f64,

    /// How many times a reflected or refracted ray may recurse.
    pub recursion_depth: usize,
}

impl Default for RenderConfig {
    fn default() -> RenderConfig {
        RenderConfig {
            epsilon: FEQ_EPSILON,
            recursion_depth: RECURSION_DEPTH,
        }
    }
}

#[test]
fn render_config_defaults() {
    let c = RenderConfig::default();
    assert_eq!(c.epsilon, FEQ_EPSILON);
    assert_eq!(c.recursion_depth, 5);
}

#[test]
fn render_config_fills_missing_fields() {
    let c: RenderConfig = serde_json::from_str(r#"{ "recursion_depth": 2 }"#)
        .unwrap();
    assert_eq!(c.recursion_depth, 2);
    assert_eq!(c.epsilon, FEQ_EPSILON);
}
