//! Tidewave library - procedural ocean animation core

pub mod backdrop;
pub mod bubbles;
pub mod color;
pub mod error;
pub mod input;
pub mod ocean;
pub mod params;
pub mod particles;
pub mod recording;
pub mod render_loop;
pub mod rendering;
pub mod scheduler;
pub mod sphere;
pub mod stage;
pub mod surface;
