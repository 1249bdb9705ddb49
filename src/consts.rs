// Floating point comparisons, and the default surface offset for over/under
// points
pub const FEQ_EPSILON: f64 = 0.0001;

// A ray is parallel to a plane when its y direction is within this bound
pub const PARALLEL_EPSILON: f64 = f64::EPSILON;

// Default maximum depth for reflected and refracted rays
pub const RECURSION_DEPTH: usize = 5;

// Common refraction indices
pub const VACUUM_RI: f64 = 1.0;
pub const GLASS_RI: f64 = 1.5;

// Runtime parameters
pub const OUT_FILE: &str = "./out.ppm";
