//! Connections between shapes, routed as one-bend elbow paths.

use crate::grid::Grid;
use crate::shapes::{Outline, Shape, ShapeId};
use kurbo::Point;

/// Identifier of a connection, unique for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

/// A drawn connection between two shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: ConnectionId,
    pub from: ShapeId,
    pub to: ShapeId,
    /// Polyline: start, bend, end.
    pub path: [Point; 3],
}

impl Connection {
    pub fn touches(&self, id: &ShapeId) -> bool {
        &self.from == id || &self.to == id
    }
}

/// Pick the closest pair of grid-snapped boundary ports of two shapes.
pub fn nearest_ports(from: &Shape, to: &Shape, grid: &Grid) -> (Point, Point) {
    let from_ports = from.geometry().ports().map(|p| grid.snap(p));
    let to_ports = to.geometry().ports().map(|p| grid.snap(p));

    let mut best = (from_ports[0], to_ports[0]);
    let mut best_dist = f64::INFINITY;
    for a in from_ports {
        for b in to_ports {
            let dist = (b - a).hypot2();
            if dist < best_dist {
                best_dist = dist;
                best = (a, b);
            }
        }
    }
    best
}

/// One-bend path from `start` to `end`, bending at `(start.x, end.y)`.
pub fn elbow_path(start: Point, end: Point) -> [Point; 3] {
    [start, Point::new(start.x, end.y), end]
}

/// Route a connection path between two shapes.
pub fn route(from: &Shape, to: &Shape, grid: &Grid) -> [Point; 3] {
    let (start, end) = nearest_ports(from, to, grid);
    elbow_path(start, end)
}

/// All connections on the canvas.
#[derive(Debug, Clone, Default)]
pub struct ConnectionSet {
    connections: Vec<Connection>,
    next_id: u64,
}

impl ConnectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a connection with an already routed path.
    pub fn add(&mut self, from: ShapeId, to: ShapeId, path: [Point; 3]) -> &Connection {
        self.next_id += 1;
        let index = self.connections.len();
        self.connections.push(Connection {
            id: ConnectionId(self.next_id),
            from,
            to,
            path,
        });
        &self.connections[index]
    }

    pub fn get(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    /// Connections with `id` at either end.
    pub fn touching<'a>(&'a self, id: &'a ShapeId) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.touches(id))
    }

    /// Replace the path of a connection.
    pub fn set_path(&mut self, id: ConnectionId, path: [Point; 3]) {
        if let Some(connection) = self.connections.iter_mut().find(|c| c.id == id) {
            connection.path = path;
        }
    }

    /// Remove every connection touching a shape and return them.
    pub fn forget(&mut self, id: &ShapeId) -> Vec<Connection> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.connections)
            .into_iter()
            .partition(|c| c.touches(id));
        self.connections = kept;
        removed
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ShapeRegistry;
    use crate::shapes::ShapeKind;

    #[test]
    fn test_elbow_path_bend() {
        let path = elbow_path(Point::new(10.0, 20.0), Point::new(100.0, 200.0));
        assert_eq!(path[1], Point::new(10.0, 200.0));
        assert_eq!(path[0].x, path[1].x);
        assert_eq!(path[1].y, path[2].y);
    }

    #[test]
    fn test_nearest_ports_side_by_side() {
        let grid = Grid::new(20.0);
        let mut reg = ShapeRegistry::new(grid);
        let a = reg.create(ShapeKind::Rectangle, Point::new(0.0, 0.0)).clone();
        let b = reg.create(ShapeKind::Circle, Point::new(400.0, 80.0)).clone();

        let (start, end) = nearest_ports(&a, &b, &grid);
        // Right edge midpoint of the rectangle, left extreme of the circle.
        assert_eq!(start, Point::new(220.0, 80.0));
        assert_eq!(end, Point::new(360.0, 80.0));
    }

    #[test]
    fn test_forget() {
        let mut set = ConnectionSet::new();
        let path = elbow_path(Point::ZERO, Point::ZERO);
        let [a, b, c, d] = [1, 2, 3, 4].map(|n| ShapeId::new(ShapeKind::Rhombus, n));
        set.add(a, b.clone(), path);
        set.add(b.clone(), c.clone(), path);
        set.add(c.clone(), d, path);

        let removed = set.forget(&b);
        assert_eq!(removed.len(), 2);
        assert_eq!(set.len(), 1);
        assert_eq!(set.touching(&c).count(), 1);
    }
}
