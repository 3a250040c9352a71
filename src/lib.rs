//! Solar system flight and asteroid defence simulation.
//!
//! Planets and moons orbit on angular rates, a belt of asteroids circles the
//! system, and some of them break loose and fall toward the centre where the
//! player can shoot them down. Rendering and asset decoding sit behind the
//! [`ecs::rendering::RenderContext`] and [`assets::AssetLoader`] traits.

pub mod assets;
pub mod config;
pub mod core;
pub mod ecs;
pub mod engine;
pub mod error;
pub mod field;
pub mod game;
pub mod input;
pub mod time;

pub use error::{SimError, SimResult};
