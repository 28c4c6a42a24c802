//! Renderer trait abstraction.

use gridcanvas_core::surface::Scene;
use kurbo::Size;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid viewport size: {0}x{1}")]
    InvalidViewport(f64, f64),
    #[error("Format error: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The retained scene to render.
    pub scene: &'a Scene,
    /// Viewport size in pixels.
    pub viewport_size: Size,
    /// Background color.
    pub background_color: Color,
    /// Whether to draw the dot grid.
    pub show_grid: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(scene: &'a Scene, viewport_size: Size) -> Self {
        Self {
            scene,
            viewport_size,
            background_color: Color::from_rgba8(255, 255, 255, 255),
            show_grid: true,
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Show or hide the dot grid.
    pub fn with_grid(mut self, show: bool) -> Self {
        self.show_grid = show;
        self
    }

    pub(crate) fn validate(&self) -> RenderResult<()> {
        let Size { width, height } = self.viewport_size;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(RenderError::InvalidViewport(width, height));
        }
        Ok(())
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// What a frame renders to.
    type Output;

    /// Render one frame of the scene.
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<Self::Output>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
