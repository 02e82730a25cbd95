/* Copyright 2020 @Yuchen Wong */

pub type Float = f64;

pub type Vector3f = nalgebra::Vector3<Float>;

/// Self-intersection bias for secondary rays and hit distances.
pub const EPSILON: Float = 1e-4;
/// Below this a direction component counts as parallel to a slab.
pub const SLAB_EPSILON: Float = 1e-8;
pub const PI: Float = std::f64::consts::PI;
