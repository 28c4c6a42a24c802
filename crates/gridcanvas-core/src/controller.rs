//! Interaction controller: the state machine that turns pointer events into
//! canvas mutations and surface commands.
//!
//! Only one interactive mode is active at a time. Entering a mode first leaves
//! the current one, which removes its visual artifacts (preview ghost,
//! selection overlay, option menu, guides). Events that do not fit the current
//! mode are ignored; events naming shapes that do not exist are logged and
//! ignored.

use crate::alignment::{GuideDiff, GuideKey};
use crate::canvas::{Canvas, MoveOutcome};
use crate::config::CanvasConfig;
use crate::connection::ConnectionId;
use crate::error::CanvasResult;
use crate::shapes::{Outline, Shape, ShapeId, ShapeKind};
use crate::style;
use crate::surface::{Geometry, PrimitiveHandle, RenderSurface};
use kurbo::{Point, Rect, Vec2};
use std::collections::HashMap;

/// Gap between the selection overlay and the shape bounds.
const OVERLAY_MARGIN: f64 = 6.0;
/// Offset of the first menu glyph from the shape's top-right corner.
const MENU_OFFSET: (f64, f64) = (10.0, -10.0);
/// Vertical distance between stacked menu glyphs.
const MENU_SPACING: f64 = 24.0;
const MENU_FONT_SIZE: f64 = 16.0;
const INFO_FONT_SIZE: f64 = 12.0;
/// Distance of the info text below the shape.
const INFO_OFFSET: f64 = 20.0;

/// Affordances of the option menu of a selected shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    Delete,
    Connect,
    Info,
}

impl MenuAction {
    /// Menu order, top to bottom.
    pub const ALL: [MenuAction; 3] = [MenuAction::Delete, MenuAction::Connect, MenuAction::Info];

    pub fn glyph(self) -> &'static str {
        match self {
            MenuAction::Delete => "✖",
            MenuAction::Connect => "→",
            MenuAction::Info => "ℹ",
        }
    }

    fn slot(self) -> usize {
        match self {
            MenuAction::Delete => 0,
            MenuAction::Connect => 1,
            MenuAction::Info => 2,
        }
    }
}

/// What a drag gesture started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragTarget {
    Shape(ShapeId),
    Background,
}

/// Surface handles drawn for one placed shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeVisual {
    pub body: PrimitiveHandle,
    pub label: PrimitiveHandle,
}

/// Option menu of the selected shape.
#[derive(Debug, Clone)]
pub struct OptionMenu {
    pub glyphs: [(MenuAction, PrimitiveHandle); 3],
    /// Info text, while shown.
    pub info: Option<PrimitiveHandle>,
}

/// State captured when a shape drag starts.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub id: ShapeId,
    /// Pointer position minus shape origin, in world units.
    pub grab_offset: Vec2,
    /// Origin to restore if the drag is rejected or cancelled.
    pub pre_drag_origin: Point,
}

/// Background pan in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PanSession {
    /// Last pointer position, in screen pixels.
    last: Point,
}

/// Current interactive mode.
#[derive(Debug, Clone)]
pub enum Mode {
    Idle,
    /// A shape kind is selected; the ghost appears on the first pointer move.
    Previewing {
        kind: ShapeKind,
        ghost: Option<PrimitiveHandle>,
    },
    Selected {
        id: ShapeId,
        overlay: PrimitiveHandle,
        menu: OptionMenu,
    },
    Dragging(DragSession),
    /// Waiting for the click on the connection target.
    ConnectingFrom(ShapeId),
}

/// Drives a [`Canvas`] from host events and mirrors it onto a [`RenderSurface`].
pub struct InteractionController<S: RenderSurface> {
    canvas: Canvas,
    surface: S,
    mode: Mode,
    pan: Option<PanSession>,
    visuals: HashMap<ShapeId, ShapeVisual>,
    guide_lines: HashMap<GuideKey, PrimitiveHandle>,
    connection_lines: HashMap<ConnectionId, PrimitiveHandle>,
    grid_dots: PrimitiveHandle,
}

impl<S: RenderSurface> InteractionController<S> {
    /// Build an empty canvas and draw the background grid onto `surface`.
    pub fn new(config: CanvasConfig, mut surface: S) -> CanvasResult<Self> {
        let canvas = Canvas::new(config)?;
        let grid_dots = surface.draw_primitive(
            Geometry::DotGrid {
                bounds: canvas.config().world_bounds(),
                spacing: canvas.grid().cell_size(),
                dot_radius: style::GRID_DOT_RADIUS,
            },
            style::grid_dots(),
        );
        surface.set_view_transform(canvas.viewport().transform());

        Ok(Self {
            canvas,
            surface,
            mode: Mode::Idle,
            pan: None,
            visuals: HashMap::new(),
            guide_lines: HashMap::new(),
            connection_lines: HashMap::new(),
            grid_dots,
        })
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Kind that the next click places, if any.
    pub fn pending_kind(&self) -> Option<ShapeKind> {
        match self.mode {
            Mode::Previewing { kind, .. } => Some(kind),
            _ => None,
        }
    }

    pub fn selected(&self) -> Option<&ShapeId> {
        match &self.mode {
            Mode::Selected { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    pub fn visual(&self, id: &ShapeId) -> Option<ShapeVisual> {
        self.visuals.get(id).copied()
    }

    pub fn guide_line(&self, key: &GuideKey) -> Option<PrimitiveHandle> {
        self.guide_lines.get(key).copied()
    }

    pub fn guide_line_count(&self) -> usize {
        self.guide_lines.len()
    }

    pub fn connection_line(&self, id: ConnectionId) -> Option<PrimitiveHandle> {
        self.connection_lines.get(&id).copied()
    }

    pub fn grid_dots(&self) -> PrimitiveHandle {
        self.grid_dots
    }

    /// Topmost shape under a screen point.
    pub fn shape_at_screen(&self, sx: f64, sy: f64) -> Option<&ShapeId> {
        self.canvas.shape_at_screen(Point::new(sx, sy)).map(Shape::id)
    }

    fn to_world(&self, sx: f64, sy: f64) -> Point {
        self.canvas.viewport().screen_to_world(Point::new(sx, sy))
    }

    /// Set the kind the next click places, or clear it.
    pub fn select_shape_kind(&mut self, kind: Option<ShapeKind>) {
        self.leave_mode();
        if let Some(kind) = kind {
            log::debug!("Previewing {}", kind);
            self.mode = Mode::Previewing { kind, ghost: None };
        }
    }

    /// Move the preview ghost to the snapped pointer position.
    pub fn on_pointer_move(&mut self, sx: f64, sy: f64) {
        let world = self.to_world(sx, sy);
        let Mode::Previewing { kind, ghost } = &mut self.mode else {
            return;
        };
        let geometry = kind.instantiate(self.canvas.placement_origin(world)).primitive();
        match ghost {
            Some(handle) => self.surface.update_primitive(*handle, geometry),
            None => *ghost = Some(self.surface.draw_primitive(geometry, style::preview(*kind))),
        }
    }

    /// Click: place, pick a connection target, hit a menu glyph, select or deselect.
    pub fn on_pointer_down(&mut self, sx: f64, sy: f64) {
        let world = self.to_world(sx, sy);

        if let Some(action) = self.menu_hit(world) {
            self.activate_menu(action);
            return;
        }
        if let Mode::Previewing { kind, .. } = self.mode {
            self.place(kind, world);
            return;
        }
        if let Mode::ConnectingFrom(from) = &self.mode {
            let from = from.clone();
            self.finish_connect(from, world);
            return;
        }
        if matches!(self.mode, Mode::Dragging(_)) {
            return;
        }

        let hit = self.canvas.shapes().shape_at(world).map(|s| s.id().clone());
        match hit {
            Some(id) => self.select(id),
            None => self.deselect(),
        }
    }

    /// Release: ends a shape drag at this position, or a background pan.
    pub fn on_pointer_up(&mut self, sx: f64, sy: f64) {
        if matches!(self.mode, Mode::Dragging(_)) {
            let world = self.to_world(sx, sy);
            self.end_drag(world);
        }
        self.pan = None;
    }

    /// Wheel scrolls the view vertically.
    pub fn on_wheel(&mut self, delta_y: f64) {
        self.pan_by(Vec2::new(0.0, -delta_y));
    }

    pub fn on_drag_start(&mut self, target: DragTarget, sx: f64, sy: f64) {
        match target {
            DragTarget::Background => {
                self.pan = Some(PanSession {
                    last: Point::new(sx, sy),
                });
            }
            DragTarget::Shape(id) => {
                let world = self.to_world(sx, sy);
                self.start_drag(id, world);
            }
        }
    }

    pub fn on_drag_move(&mut self, target: DragTarget, sx: f64, sy: f64) {
        match target {
            DragTarget::Background => {
                let screen = Point::new(sx, sy);
                let Some(pan) = self.pan.as_mut() else {
                    return;
                };
                let delta = screen - pan.last;
                pan.last = screen;
                self.pan_by(delta);
            }
            DragTarget::Shape(id) => {
                let world = self.to_world(sx, sy);
                self.drag_to(&id, world);
            }
        }
    }

    pub fn on_drag_end(&mut self, target: DragTarget, sx: f64, sy: f64) {
        match target {
            DragTarget::Background => self.pan = None,
            DragTarget::Shape(id) => {
                if matches!(&self.mode, Mode::Dragging(session) if session.id == id) {
                    let world = self.to_world(sx, sy);
                    self.end_drag(world);
                } else {
                    // Already ended by the pointer release.
                    log::debug!("Drag end for {} ignored", id);
                }
            }
        }
    }

    pub fn zoom_in(&mut self) {
        let step = self.canvas.config().zoom_in_step;
        self.zoom_by(step);
    }

    pub fn zoom_out(&mut self) {
        let step = self.canvas.config().zoom_out_step;
        self.zoom_by(step);
    }

    /// Clear the selection, if any.
    pub fn deselect(&mut self) {
        if matches!(self.mode, Mode::Selected { .. }) {
            self.leave_mode();
        }
    }

    /// Trigger an option-menu affordance of the selected shape.
    pub fn activate_menu(&mut self, action: MenuAction) {
        let Some(id) = self.selected().cloned() else {
            log::warn!("Menu action {:?} without a selected shape", action);
            return;
        };
        match action {
            MenuAction::Delete => self.delete(&id),
            MenuAction::Connect => {
                self.leave_mode();
                log::debug!("Connecting from {}", id);
                self.mode = Mode::ConnectingFrom(id);
            }
            MenuAction::Info => self.toggle_info(&id),
        }
    }

    fn zoom_by(&mut self, factor: f64) {
        let pivot = self.canvas.viewport().screen_center();
        self.canvas.viewport_mut().apply_zoom(factor, pivot);
        self.sync_view();
    }

    fn pan_by(&mut self, delta: Vec2) {
        self.canvas.viewport_mut().apply_pan(delta);
        self.sync_view();
    }

    /// Push the view transform and stretch live guides over the new visible rect.
    fn sync_view(&mut self) {
        let viewport = self.canvas.viewport();
        self.surface.set_view_transform(viewport.transform());

        let visible = viewport.visible_world_rect();
        for guide in self.canvas.alignment().guides() {
            if let Some(handle) = self.guide_lines.get(&guide.key) {
                let (from, to) = guide.segment(self.canvas.grid(), visible);
                self.surface.update_primitive(*handle, Geometry::Line { from, to });
            }
        }
    }

    fn place(&mut self, kind: ShapeKind, world: Point) {
        let Some(id) = self.canvas.place(kind, world) else {
            return;
        };
        self.leave_mode();
        if let Some(shape) = self.canvas.shape(&id) {
            let visual = draw_visual(&mut self.surface, shape);
            log::debug!("Placed {} at {:?}", id, shape.origin());
            self.visuals.insert(id, visual);
        }
    }

    fn select(&mut self, id: ShapeId) {
        if self.selected() == Some(&id) {
            return;
        }
        self.leave_mode();
        let Some(bounds) = self.canvas.shape(&id).map(Shape::bounds) else {
            log::warn!("Cannot select unknown shape {}", id);
            return;
        };

        let overlay = self.surface.draw_primitive(
            Geometry::Rect {
                rect: bounds.inflate(OVERLAY_MARGIN, OVERLAY_MARGIN),
                corner_radius: 0.0,
            },
            style::selection_overlay(),
        );
        let menu = self.draw_menu(bounds);
        log::debug!("Selected {}", id);
        self.mode = Mode::Selected { id, overlay, menu };
    }

    fn draw_menu(&mut self, bounds: Rect) -> OptionMenu {
        let surface = &mut self.surface;
        let glyphs = MenuAction::ALL.map(|action| {
            let position = Point::new(
                bounds.x1 + MENU_OFFSET.0,
                bounds.y0 + MENU_OFFSET.1 + action.slot() as f64 * MENU_SPACING,
            );
            let handle = surface.draw_primitive(
                Geometry::Text {
                    position,
                    content: action.glyph().to_string(),
                    font_size: MENU_FONT_SIZE,
                },
                style::menu_glyph(),
            );
            (action, handle)
        });
        OptionMenu { glyphs, info: None }
    }

    /// Menu glyph under a world point, using the surface's bounding boxes.
    fn menu_hit(&self, world: Point) -> Option<MenuAction> {
        let Mode::Selected { menu, .. } = &self.mode else {
            return None;
        };
        menu.glyphs
            .iter()
            .find(|(_, handle)| {
                self.surface
                    .bounding_box(*handle)
                    .is_some_and(|bbox| bbox.contains(world))
            })
            .map(|(action, _)| *action)
    }

    fn toggle_info(&mut self, id: &ShapeId) {
        let Some(shape) = self.canvas.shape(id) else {
            return;
        };
        let Mode::Selected { menu, .. } = &mut self.mode else {
            return;
        };
        match menu.info.take() {
            Some(handle) => self.surface.remove_primitive(handle),
            None => {
                let bounds = shape.bounds();
                let geometry = Geometry::Text {
                    position: Point::new(bounds.center().x, bounds.y1 + INFO_OFFSET),
                    content: format!("{} at {}", id, shape.anchor_cell()),
                    font_size: INFO_FONT_SIZE,
                };
                menu.info = Some(self.surface.draw_primitive(geometry, style::info_text()));
            }
        }
    }

    fn delete(&mut self, id: &ShapeId) {
        self.leave_mode();
        let removal = match self.canvas.remove(id) {
            Ok(removal) => removal,
            Err(err) => {
                log::warn!("Delete ignored: {}", err);
                return;
            }
        };

        if let Some(visual) = self.visuals.remove(id) {
            self.surface.remove_primitive(visual.body);
            self.surface.remove_primitive(visual.label);
        }
        for key in &removal.guides {
            if let Some(handle) = self.guide_lines.remove(key) {
                self.surface.remove_primitive(handle);
            }
        }
        for connection in &removal.connections {
            if let Some(handle) = self.connection_lines.remove(&connection.id) {
                self.surface.remove_primitive(handle);
            }
        }
        log::debug!("Deleted {} ({} cells released)", id, removal.cells.len());
    }

    fn finish_connect(&mut self, from: ShapeId, world: Point) {
        self.leave_mode();
        let Some(to) = self.canvas.shapes().shape_at(world).map(|s| s.id().clone()) else {
            log::debug!("Connection from {} cancelled", from);
            return;
        };
        let Some(cid) = self.canvas.connect(&from, &to) else {
            log::debug!("Connection {} -> {} cancelled", from, to);
            return;
        };
        if let Some(connection) = self.canvas.connections().get(cid) {
            let handle = self.surface.draw_primitive(
                Geometry::Polyline {
                    points: connection.path.to_vec(),
                },
                style::connection(),
            );
            self.connection_lines.insert(cid, handle);
        }
    }

    fn start_drag(&mut self, id: ShapeId, world: Point) {
        if matches!(self.mode, Mode::Dragging(_)) {
            log::warn!("Drag start on {} while another drag is active", id);
            return;
        }
        let Some(origin) = self.canvas.shape(&id).map(Shape::origin) else {
            log::warn!("Drag start on unknown shape {}", id);
            return;
        };

        // The shape becomes selected again when the drag ends.
        self.leave_mode();
        self.canvas.raise(&id);
        if let Some(visual) = self.visuals.get(&id) {
            self.surface.raise(visual.body);
            self.surface.raise(visual.label);
        }

        log::debug!("Dragging {} from {:?}", id, origin);
        self.mode = Mode::Dragging(DragSession {
            id,
            grab_offset: world - origin,
            pre_drag_origin: origin,
        });
        let diff = self.canvas.refresh_guides();
        self.apply_guide_diff(diff);
    }

    /// Optimistic move of the dragged shape; occupancy is checked at drag end.
    fn drag_to(&mut self, id: &ShapeId, world: Point) {
        let Mode::Dragging(session) = &self.mode else {
            log::debug!("Drag move for {} outside a drag", id);
            return;
        };
        if &session.id != id {
            log::warn!("Drag move for {} while dragging {}", id, session.id);
            return;
        }

        let origin = self.canvas.grid().snap(world - session.grab_offset);
        self.move_shape(id, origin);
        let diff = self.canvas.refresh_guides();
        self.apply_guide_diff(diff);
    }

    fn end_drag(&mut self, world: Point) {
        let Mode::Dragging(session) = &self.mode else {
            return;
        };
        let session = session.clone();
        self.drag_to(&session.id, world);
        self.mode = Mode::Idle;
        self.clear_guides();

        match self.canvas.commit_move(&session.id, session.pre_drag_origin) {
            Ok(MoveOutcome::Committed) => log::debug!("Moved {}", session.id),
            Ok(MoveOutcome::RolledBack { .. }) => self.refresh_shape(&session.id),
            Err(err) => {
                log::warn!("Drag end ignored: {}", err);
                return;
            }
        }
        self.select(session.id);
    }

    fn move_shape(&mut self, id: &ShapeId, origin: Point) {
        if let Err(err) = self.canvas.drag_to(id, origin) {
            log::warn!("Move ignored: {}", err);
            return;
        }
        self.refresh_shape(id);
    }

    /// Push the shape's current geometry and its connection paths to the surface.
    fn refresh_shape(&mut self, id: &ShapeId) {
        if let (Some(shape), Some(visual)) = (self.canvas.shape(id), self.visuals.get(id)) {
            self.surface.update_primitive(visual.body, shape.geometry().primitive());
            self.surface.update_primitive(visual.label, label_geometry(shape));
        }
        for (cid, path) in self.canvas.reroute(id) {
            if let Some(handle) = self.connection_lines.get(&cid) {
                self.surface.update_primitive(
                    *handle,
                    Geometry::Polyline {
                        points: path.to_vec(),
                    },
                );
            }
        }
    }

    fn apply_guide_diff(&mut self, diff: GuideDiff) {
        for key in &diff.removed {
            if let Some(handle) = self.guide_lines.remove(key) {
                self.surface.remove_primitive(handle);
            }
        }
        let visible = self.canvas.viewport().visible_world_rect();
        for guide in diff.added {
            let (from, to) = guide.segment(self.canvas.grid(), visible);
            let handle = self
                .surface
                .draw_primitive(Geometry::Line { from, to }, style::guide());
            if let Some(stale) = self.guide_lines.insert(guide.key, handle) {
                self.surface.remove_primitive(stale);
            }
        }
    }

    fn clear_guides(&mut self) {
        self.canvas.clear_guides();
        for (_, handle) in self.guide_lines.drain() {
            self.surface.remove_primitive(handle);
        }
    }

    /// Leave the current mode and remove its artifacts. A drag in progress is
    /// cancelled and the shape goes back to its pre-drag origin.
    fn leave_mode(&mut self) {
        match std::mem::replace(&mut self.mode, Mode::Idle) {
            Mode::Idle | Mode::ConnectingFrom(_) => {}
            Mode::Previewing { ghost, .. } => {
                if let Some(handle) = ghost {
                    self.surface.remove_primitive(handle);
                }
            }
            Mode::Selected { overlay, menu, .. } => {
                self.surface.remove_primitive(overlay);
                for (_, handle) in menu.glyphs {
                    self.surface.remove_primitive(handle);
                }
                if let Some(handle) = menu.info {
                    self.surface.remove_primitive(handle);
                }
            }
            Mode::Dragging(session) => {
                log::debug!("Drag of {} cancelled", session.id);
                self.move_shape(&session.id, session.pre_drag_origin);
                self.clear_guides();
            }
        }
    }
}

fn label_geometry(shape: &Shape) -> Geometry {
    Geometry::Text {
        position: shape.center(),
        content: shape.kind().label().to_string(),
        font_size: shape.kind().label_size(),
    }
}

fn draw_visual(surface: &mut impl RenderSurface, shape: &Shape) -> ShapeVisual {
    let body = surface.draw_primitive(shape.geometry().primitive(), style::shape_body(shape.kind()));
    let label = surface.draw_primitive(label_geometry(shape), style::label());
    ShapeVisual { body, label }
}
