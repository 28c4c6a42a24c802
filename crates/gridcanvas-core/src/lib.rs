//! GridCanvas Core Library
//!
//! Platform-agnostic engine for a grid-snapped diagram canvas: shape placement,
//! cell occupancy, pan/zoom, drag interaction and alignment guides.

pub mod alignment;
pub mod canvas;
pub mod config;
pub mod connection;
pub mod controller;
pub mod error;
pub mod grid;
pub mod occupancy;
pub mod registry;
pub mod shapes;
pub mod style;
pub mod surface;
pub mod viewport;

pub use alignment::{AlignmentEngine, AlignmentGuide, GuideDiff, GuideKey, Orientation, PairKey};
pub use canvas::{Canvas, MoveOutcome, Removal};
pub use config::{CanvasConfig, OccupancyPolicy};
pub use connection::{Connection, ConnectionId, ConnectionSet};
pub use controller::{DragSession, DragTarget, InteractionController, MenuAction, Mode, ShapeVisual};
pub use error::{CanvasError, CanvasResult};
pub use grid::{Grid, GridCoordinate, GRID_SIZE};
pub use occupancy::{CellSet, OccupancyIndex};
pub use registry::ShapeRegistry;
pub use shapes::{Outline, Shape, ShapeGeometry, ShapeId, ShapeKind};
pub use surface::{Geometry, PrimitiveHandle, PrimitiveKind, PrimitiveStyle, RenderSurface, Scene, ScenePrimitive};
pub use viewport::Viewport;
