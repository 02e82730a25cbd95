/* Copyright 2020 @TwoCookingMice */

pub mod image_output;
