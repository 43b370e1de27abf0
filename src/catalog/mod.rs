//! Label resolution and recipe lookup downstream of detection.

pub mod class_names;
pub mod recipes;
