// Copyright @yucwang 2021

pub mod progressive;
pub mod renderer;
pub mod sampling;
pub mod simple;
pub mod tile;
