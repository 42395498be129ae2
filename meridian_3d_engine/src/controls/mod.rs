//! Camera controls
//!
//! `OrbitController`: a damped orbit rig integrated once per frame.

mod orbit;

pub use orbit::{OrbitConfig, OrbitController, Spherical, ZoomStyle};
