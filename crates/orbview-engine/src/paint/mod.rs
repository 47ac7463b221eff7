//! Color model shared between scene code and the immediate renderer.

pub mod color;

pub use color::Color;
