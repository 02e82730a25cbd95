// Copyright @yucwang 2021

pub extern crate nalgebra as na;

pub mod core;
pub mod integrators;
pub mod io;
pub mod math;
pub mod renderers;
pub mod scenes;
pub mod sensors;
