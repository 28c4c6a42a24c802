//! Paint presets for everything the canvas draws.

use crate::shapes::ShapeKind;
use crate::surface::PrimitiveStyle;
use peniko::Color;

/// Dot radius of the background grid.
pub const GRID_DOT_RADIUS: f64 = 2.0;

fn black() -> Color {
    Color::from_rgba8(0, 0, 0, 255)
}

fn kind_fill(kind: ShapeKind, alpha: u8) -> Color {
    match kind {
        ShapeKind::Rectangle => Color::from_rgba8(0, 0, 255, alpha),
        ShapeKind::Circle => Color::from_rgba8(255, 0, 0, alpha),
        ShapeKind::Rhombus => Color::from_rgba8(0, 255, 0, alpha),
    }
}

/// Body of a placed shape.
pub fn shape_body(kind: ShapeKind) -> PrimitiveStyle {
    PrimitiveStyle {
        fill: Some(kind_fill(kind, 128)),
        stroke: Some(black()),
        stroke_width: 2.0,
        dash: None,
        interactive: true,
    }
}

/// Ghost of the shape that would be placed under the pointer.
pub fn preview(kind: ShapeKind) -> PrimitiveStyle {
    PrimitiveStyle {
        fill: Some(kind_fill(kind, 77)),
        stroke: Some(black()),
        stroke_width: 1.0,
        dash: None,
        interactive: false,
    }
}

/// Label text inside a shape.
pub fn label() -> PrimitiveStyle {
    PrimitiveStyle {
        fill: Some(Color::from_rgba8(255, 255, 255, 255)),
        stroke: None,
        stroke_width: 0.0,
        dash: None,
        interactive: false,
    }
}

/// Outline drawn around the selected shape.
pub fn selection_overlay() -> PrimitiveStyle {
    PrimitiveStyle {
        fill: None,
        stroke: Some(Color::from_rgba8(59, 130, 246, 255)),
        stroke_width: 3.0,
        dash: Some(6.0),
        interactive: false,
    }
}

/// Option menu glyphs.
pub fn menu_glyph() -> PrimitiveStyle {
    PrimitiveStyle {
        fill: Some(Color::from_rgba8(255, 0, 0, 255)),
        stroke: None,
        stroke_width: 0.0,
        dash: None,
        interactive: true,
    }
}

/// Info text shown next to the selected shape.
pub fn info_text() -> PrimitiveStyle {
    PrimitiveStyle {
        fill: Some(Color::from_rgba8(55, 65, 81, 255)),
        stroke: None,
        stroke_width: 0.0,
        dash: None,
        interactive: false,
    }
}

/// Alignment guide line.
pub fn guide() -> PrimitiveStyle {
    PrimitiveStyle {
        fill: None,
        stroke: Some(Color::from_rgba8(236, 72, 153, 255)),
        stroke_width: 1.0,
        dash: Some(4.0),
        interactive: false,
    }
}

/// Connection path between two shapes.
pub fn connection() -> PrimitiveStyle {
    PrimitiveStyle {
        fill: None,
        stroke: Some(black()),
        stroke_width: 2.0,
        dash: None,
        interactive: false,
    }
}

/// Background dot grid.
pub fn grid_dots() -> PrimitiveStyle {
    PrimitiveStyle {
        fill: Some(Color::from_rgba8(0xca, 0xca, 0xca, 255)),
        stroke: None,
        stroke_width: 0.0,
        dash: None,
        interactive: false,
    }
}
