//! GridCanvas Render Library
//!
//! Renderer abstraction for the canvas primitive scene.
//! The bundled implementation writes standalone SVG markup.

mod renderer;
mod svg;

pub use renderer::{RenderContext, RenderError, RenderResult, Renderer};
pub use svg::SvgRenderer;
