//! Panel renderers.

pub mod scene;
pub mod tracker;
