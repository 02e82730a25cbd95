// Copyright @yucwang 2021

pub mod error;
pub mod integrator;
pub mod interaction;
pub mod intersector;
pub mod rng;
pub mod scene;
pub mod settings;
pub mod surface;
pub mod tangent_frame;
