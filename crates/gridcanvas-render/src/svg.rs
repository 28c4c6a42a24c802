//! SVG renderer: serializes a [`Scene`] into standalone SVG markup.

use crate::renderer::{RenderContext, RenderResult, Renderer};
use gridcanvas_core::surface::{Geometry, PrimitiveHandle, PrimitiveStyle};
use kurbo::{Affine, Point};
use peniko::Color;
use std::fmt::Write;

/// Renders scenes to SVG strings.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    /// Put every element on its own line.
    pretty: bool,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit one element per line.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn newline(&self, out: &mut String) {
        if self.pretty {
            out.push('\n');
        }
    }

    fn write_primitive(
        &self,
        out: &mut String,
        handle: PrimitiveHandle,
        geometry: &Geometry,
        style: &PrimitiveStyle,
    ) -> RenderResult<()> {
        let paint = paint_attrs(style);
        match geometry {
            Geometry::Rect { rect, corner_radius } => {
                write!(
                    out,
                    r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                    rect.x0,
                    rect.y0,
                    rect.width(),
                    rect.height()
                )?;
                if *corner_radius > 0.0 {
                    write!(out, r#" rx="{}""#, corner_radius)?;
                }
                write!(out, "{}/>", paint)?;
            }
            Geometry::Circle { center, radius } => {
                write!(
                    out,
                    r#"<circle cx="{}" cy="{}" r="{}"{}/>"#,
                    center.x, center.y, radius, paint
                )?;
            }
            Geometry::Polygon { points } => {
                write!(out, r#"<polygon points="{}"{}/>"#, points_attr(points), paint)?;
            }
            Geometry::Polyline { points } => {
                write!(out, r#"<polyline points="{}"{}/>"#, points_attr(points), paint)?;
            }
            Geometry::Line { from, to } => {
                write!(
                    out,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
                    from.x, from.y, to.x, to.y, paint
                )?;
            }
            Geometry::Text {
                position,
                content,
                font_size,
            } => {
                write!(
                    out,
                    r#"<text x="{}" y="{}" font-size="{}" text-anchor="middle" dominant-baseline="central"{}>{}</text>"#,
                    position.x,
                    position.y,
                    font_size,
                    paint,
                    escape(content)
                )?;
            }
            Geometry::DotGrid {
                bounds,
                spacing,
                dot_radius,
            } => {
                // Tiles start half a cell early so every dot sits on a grid intersection.
                let id = format!("grid-dots-{}", handle.raw());
                let half = spacing / 2.0;
                write!(
                    out,
                    r#"<defs><pattern id="{id}" x="{}" y="{}" width="{s}" height="{s}" patternUnits="userSpaceOnUse"><circle cx="{half}" cy="{half}" r="{}"{}/></pattern></defs>"#,
                    -half,
                    -half,
                    dot_radius,
                    paint,
                    s = spacing,
                )?;
                self.newline(out);
                write!(
                    out,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="url(#{id})" pointer-events="none"/>"#,
                    bounds.x0,
                    bounds.y0,
                    bounds.width(),
                    bounds.height()
                )?;
            }
        }
        self.newline(out);
        Ok(())
    }
}

impl Renderer for SvgRenderer {
    type Output = String;

    fn render(&mut self, ctx: &RenderContext) -> RenderResult<String> {
        ctx.validate()?;
        let size = ctx.viewport_size;
        let mut out = String::new();

        write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = size.width,
            h = size.height
        )?;
        self.newline(&mut out);
        write!(
            out,
            r#"<rect width="100%" height="100%"{}/>"#,
            color_attr("fill", Some(self.background_color(ctx)))
        )?;
        self.newline(&mut out);

        write!(out, r#"<g transform="{}">"#, matrix(ctx.scene.view_transform()))?;
        self.newline(&mut out);

        let mut drawn = 0;
        for (handle, primitive) in ctx.scene.primitives() {
            if !ctx.show_grid && matches!(primitive.geometry, Geometry::DotGrid { .. }) {
                continue;
            }
            self.write_primitive(&mut out, handle, &primitive.geometry, &primitive.style)?;
            drawn += 1;
        }

        out.push_str("</g></svg>");
        self.newline(&mut out);
        log::debug!("Rendered {} primitives to SVG ({} bytes)", drawn, out.len());
        Ok(out)
    }
}

fn matrix(transform: Affine) -> String {
    let [a, b, c, d, e, f] = transform.as_coeffs();
    format!("matrix({} {} {} {} {} {})", a, b, c, d, e, f)
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `name="rgb(..)"` plus `name-opacity` when translucent, or `name="none"`.
fn color_attr(name: &str, color: Option<Color>) -> String {
    let Some(color) = color else {
        return format!(r#" {}="none""#, name);
    };
    let rgba = color.to_rgba8();
    let mut attr = format!(r#" {}="rgb({},{},{})""#, name, rgba.r, rgba.g, rgba.b);
    if rgba.a < 255 {
        attr.push_str(&format!(r#" {}-opacity="{:.3}""#, name, rgba.a as f64 / 255.0));
    }
    attr
}

fn paint_attrs(style: &PrimitiveStyle) -> String {
    let mut attrs = color_attr("fill", style.fill);
    attrs.push_str(&color_attr("stroke", style.stroke));
    if style.stroke.is_some() {
        attrs.push_str(&format!(r#" stroke-width="{}""#, style.stroke_width));
    }
    if let Some(dash) = style.dash {
        attrs.push_str(&format!(r#" stroke-dasharray="{}""#, dash));
    }
    if !style.interactive {
        attrs.push_str(r#" pointer-events="none""#);
    }
    attrs
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
