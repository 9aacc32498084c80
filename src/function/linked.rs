use std::{cell::Cell, fmt};
use tracing::{debug, trace};
use crate::{
    consts::MIN_POINTS,
    error::{check_index, FunctionError, Result},
    function::{minimum_points_error, ordering_error, uniform_grid, write_points, TabulatedFunction},
    point::Point,
    utils::{interpolate, precedes},
};
type NodeId = usize;
/// Slot of the sentinel closing the ring. It never carries a data point.
const HEAD: NodeId = 0;
#[derive(Debug, Clone, Copy)]
struct Node {
    point: Point,
    prev: NodeId,
    next: NodeId,
}
/// Last node reached by an indexed lookup, together with its index.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cursor {
    node: NodeId,
    index: usize,
}
/// Tabulated function stored as a circular doubly linked list.
///
/// Nodes live in an arena addressed by slot index; slot [`HEAD`] is the
/// sentinel, so `nodes[HEAD].next` is the first point and
/// `nodes[HEAD].prev` the last. Freed slots are recycled.
///
/// Indexed access goes through a cursor remembering the last node
/// reached, which makes sequential and nearby lookups cheap. The cursor
/// is a hint only: it never changes what an operation returns.
///
/// Ordering and duplicate checks use exact float comparison.
#[derive(Debug, Clone)]
pub struct LinkedTabulatedFunction {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    len: usize,
    cursor: Cell<Option<Cursor>>,
    cursor_enabled: bool,
}
impl LinkedTabulatedFunction {
    /// `points_count` points spread evenly over `[left_x, right_x]`, all with y = 0.
    pub fn new(left_x: f64, right_x: f64, points_count: usize) -> Result<Self> {
        let xs = uniform_grid(left_x, right_x, points_count)?;
        Ok(Self::from_grid(xs, |_| 0.0))
    }
    /// One point per entry of `values`, x spread evenly over `[left_x, right_x]`.
    pub fn with_values(left_x: f64, right_x: f64, values: &[f64]) -> Result<Self> {
        let xs = uniform_grid(left_x, right_x, values.len())?;
        Ok(Self::from_grid(xs, |i| values[i]))
    }
    fn from_grid(xs: Vec<f64>, y: impl Fn(usize) -> f64) -> Self {
        let mut list = Self::empty(xs.len());
        for (i, x) in xs.into_iter().enumerate() {
            list.push_back(Point::new(x, y(i)));
        }
        list
    }
    fn empty(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity + 1);
        nodes.push(Node {
            point: Point::default(),
            prev: HEAD,
            next: HEAD,
        });
        Self {
            nodes,
            free: Vec::new(),
            len: 0,
            cursor: Cell::new(None),
            cursor_enabled: true,
        }
    }
    /// Turns the access cursor on or off. With the cursor off every
    /// indexed lookup walks from the nearer end of the list.
    pub fn set_cursor_enabled(&mut self, enabled: bool) {
        self.cursor_enabled = enabled;
        self.cursor.set(None);
    }
    #[inline]
    fn first(&self) -> NodeId {
        self.nodes[HEAD].next
    }
    #[inline]
    fn last(&self) -> NodeId {
        self.nodes[HEAD].prev
    }
    #[inline]
    fn cached(&self) -> Option<Cursor> {
        if self.cursor_enabled { self.cursor.get() } else { None }
    }
    #[inline]
    fn remember(&self, node: NodeId, index: usize) {
        if self.cursor_enabled {
            self.cursor.set(Some(Cursor { node, index }));
        }
    }
    fn invalidate_cursor(&self) {
        if self.cursor.take().is_some() {
            debug!("cursor invalidated");
        }
    }
    fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut id = self.first();
        std::iter::from_fn(move || {
            if id == HEAD {
                return None;
            }
            let current = id;
            id = self.nodes[current].next;
            Some(current)
        })
    }
    fn alloc(&mut self, point: Point, prev: NodeId, next: NodeId) -> NodeId {
        let node = Node { point, prev, next };
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = node;
                id
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }
    /// Splices a fresh node between the adjacent nodes `prev` and `next`.
    fn splice(&mut self, point: Point, prev: NodeId, next: NodeId) -> NodeId {
        let id = self.alloc(point, prev, next);
        self.nodes[prev].next = id;
        self.nodes[next].prev = id;
        self.len += 1;
        id
    }
    fn push_back(&mut self, point: Point) -> NodeId {
        let id = self.splice(point, self.last(), HEAD);
        self.invalidate_cursor();
        id
    }
    /// Detaches `id` from its neighbours and recycles its slot.
    fn unlink(&mut self, id: NodeId) {
        debug_assert_ne!(id, HEAD, "sentinel cannot be unlinked");
        let Node { prev, next, .. } = self.nodes[id];
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
        self.free.push(id);
        self.len -= 1;
    }
    fn walk(&self, mut node: NodeId, from: usize, to: usize) -> NodeId {
        if to > from {
            for _ in from..to {
                node = self.nodes[node].next;
            }
        } else {
            for _ in to..from {
                node = self.nodes[node].prev;
            }
        }
        node
    }
    fn node_by_index(&self, index: usize) -> Result<NodeId> {
        check_index(index, self.len)?;
        let from_end = self.len - index - 1;
        let node = match self.cached() {
            Some(c) if c.index == index => c.node,
            Some(c) if c.index.abs_diff(index) == 1 => {
                trace!("cursor step {} -> {}", c.index, index);
                if index > c.index { self.nodes[c.node].next } else { self.nodes[c.node].prev }
            }
            Some(c) if c.index.abs_diff(index) < index && c.index.abs_diff(index) < from_end => {
                trace!("cursor walk {} -> {}", c.index, index);
                self.walk(c.node, c.index, index)
            }
            _ if index < self.len - index => self.walk(self.first(), 0, index),
            _ => self.walk(self.last(), self.len - 1, index),
        };
        self.remember(node, index);
        Ok(node)
    }
    /// Links `point` in so that it ends up at `index`: before the node
    /// currently there, or at the tail when `index == len`.
    fn add_node_by_index(&mut self, index: usize, point: Point) -> Result<NodeId> {
        if index > self.len {
            return Err(FunctionError::IndexOutOfRange { index, len: self.len + 1 });
        }
        if index == self.len {
            return Ok(self.push_back(point));
        }
        let next = self.node_by_index(index)?;
        let prev = self.nodes[next].prev;
        let id = self.splice(point, prev, next);
        self.invalidate_cursor();
        debug!("node spliced at index {}", index);
        Ok(id)
    }
    fn check_order(&self, node: NodeId, x: f64) -> Result<()> {
        let Node { prev, next, .. } = self.nodes[node];
        let lower = (prev != HEAD).then(|| self.nodes[prev].point.x);
        let upper = (next != HEAD).then(|| self.nodes[next].point.x);
        let fits_lower = lower.map_or(!x.is_nan(), |l| precedes(l, x, 0.0));
        let fits_upper = upper.map_or(!x.is_nan(), |u| precedes(x, u, 0.0));
        if fits_lower && fits_upper {
            Ok(())
        } else {
            Err(ordering_error(x, lower, upper))
        }
    }
}
impl TabulatedFunction for LinkedTabulatedFunction {
    fn left_domain_border(&self) -> Result<f64> {
        if self.len == 0 {
            return Err(FunctionError::InvalidState("function has no points".to_string()));
        }
        Ok(self.nodes[self.first()].point.x)
    }
    fn right_domain_border(&self) -> Result<f64> {
        if self.len == 0 {
            return Err(FunctionError::InvalidState("function has no points".to_string()));
        }
        Ok(self.nodes[self.last()].point.x)
    }
    fn function_value(&self, x: f64) -> f64 {
        if self.len == 0 {
            return f64::NAN;
        }
        let (left, right) = (self.nodes[self.first()].point.x, self.nodes[self.last()].point.x);
        if !(x >= left && x <= right) {
            return f64::NAN;
        }
        let (mut node, mut index) = match self.cached() {
            Some(c) => (c.node, c.index),
            None => (self.first(), 0),
        };
        for _ in 0..self.len {
            let next = self.nodes[node].next;
            if next == HEAD {
                node = self.first();
                index = 0;
                continue;
            }
            let (p1, p2) = (self.nodes[node].point, self.nodes[next].point);
            if x >= p1.x && x <= p2.x {
                self.remember(node, index);
                return interpolate(p1.x, p1.y, p2.x, p2.y, x);
            }
            node = next;
            index += 1;
        }
        f64::NAN
    }
    fn points_count(&self) -> usize {
        self.len
    }
    fn point(&self, index: usize) -> Result<Point> {
        let node = self.node_by_index(index)?;
        Ok(self.nodes[node].point)
    }
    fn set_point(&mut self, index: usize, point: Point) -> Result<()> {
        let node = self.node_by_index(index)?;
        self.check_order(node, point.x)?;
        self.nodes[node].point = point;
        Ok(())
    }
    fn point_x(&self, index: usize) -> Result<f64> {
        self.point(index).map(|p| p.x)
    }
    fn point_y(&self, index: usize) -> Result<f64> {
        self.point(index).map(|p| p.y)
    }
    fn set_point_x(&mut self, index: usize, x: f64) -> Result<()> {
        let node = self.node_by_index(index)?;
        self.check_order(node, x)?;
        self.nodes[node].point.set_x(x);
        Ok(())
    }
    fn set_point_y(&mut self, index: usize, y: f64) -> Result<()> {
        let node = self.node_by_index(index)?;
        self.nodes[node].point.set_y(y);
        Ok(())
    }
    fn delete_point(&mut self, index: usize) -> Result<()> {
        check_index(index, self.len)?;
        if self.len <= MIN_POINTS {
            return Err(minimum_points_error(self.len));
        }
        let before = self.cached();
        let node = self.node_by_index(index)?;
        self.unlink(node);
        let after = match before {
            Some(c) if c.index == index => None,
            Some(c) if c.index > index => Some(Cursor { node: c.node, index: c.index - 1 }),
            other => other,
        };
        self.cursor.set(after);
        debug!("node unlinked at index {}", index);
        Ok(())
    }
    fn add_point(&mut self, point: Point) -> Result<()> {
        if self.node_ids().any(|id| self.nodes[id].point.x == point.x) {
            return Err(FunctionError::InvalidPoint(format!("x={} already exists", point.x)));
        }
        let index = self
            .node_ids()
            .take_while(|&id| point.x > self.nodes[id].point.x)
            .count();
        let node = self.add_node_by_index(index, point)?;
        if let Err(e) = self.check_order(node, point.x) {
            self.unlink(node);
            self.invalidate_cursor();
            debug!("insertion at index {} rolled back", index);
            return Err(e);
        }
        Ok(())
    }
    fn points(&self) -> Vec<Point> {
        self.node_ids().map(|id| self.nodes[id].point).collect()
    }
}
impl PartialEq for LinkedTabulatedFunction {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self
                .node_ids()
                .zip(other.node_ids())
                .all(|(a, b)| self.nodes[a].point == other.nodes[b].point)
    }
}
impl fmt::Display for LinkedTabulatedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_points(f, "LinkedTabulatedFunction", self.node_ids().map(|id| self.nodes[id].point), self.len)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    /// Forward and backward traversals agree and both close on the sentinel.
    fn assert_ring_consistent(f: &LinkedTabulatedFunction) {
        let forward: Vec<NodeId> = f.node_ids().collect();
        assert_eq!(forward.len(), f.len);
        let mut backward = Vec::new();
        let mut id = f.last();
        while id != HEAD {
            backward.push(id);
            id = f.nodes[id].prev;
        }
        backward.reverse();
        assert_eq!(forward, backward);
        for &id in &forward {
            assert_eq!(f.nodes[f.nodes[id].next].prev, id);
        }
        if let Some(c) = f.cursor.get() {
            assert_eq!(forward.get(c.index), Some(&c.node), "cursor points at wrong node");
        }
    }
    fn sample() -> LinkedTabulatedFunction {
        LinkedTabulatedFunction::with_values(0.0, 10.0, &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap()
    }
    #[test]
    fn test_construction_and_values() {
        let f = sample();
        assert_eq!(f.points_count(), 5);
        assert_eq!(f.left_domain_border(), Ok(0.0));
        assert_eq!(f.right_domain_border(), Ok(10.0));
        assert_eq!(f.function_value(10.0), 5.0);
        assert_eq!(f.function_value(0.0), 1.0);
        assert_relative_eq!(f.function_value(3.75), 2.5);
        assert!(f.function_value(-0.1).is_nan());
        assert!(f.function_value(10.1).is_nan());
        assert_ring_consistent(&f);
    }
    #[test]
    fn test_empty_ring_is_defended() {
        let f = LinkedTabulatedFunction::empty(0);
        assert!(matches!(f.left_domain_border(), Err(FunctionError::InvalidState(_))));
        assert!(matches!(f.right_domain_border(), Err(FunctionError::InvalidState(_))));
        assert!(f.function_value(0.0).is_nan());
        assert_eq!(f.nodes[HEAD].next, HEAD);
        assert_eq!(f.nodes[HEAD].prev, HEAD);
    }
    #[test]
    fn test_constructor_errors() {
        assert!(matches!(LinkedTabulatedFunction::new(5.0, 5.0, 5), Err(FunctionError::InvalidArgument(_))));
        assert!(matches!(LinkedTabulatedFunction::with_values(0.0, 10.0, &[1.0]), Err(FunctionError::InvalidArgument(_))));
    }
    #[test]
    fn test_add_point_front_and_duplicate() {
        let mut f = sample();
        f.add_point(Point::new(-1.0, 0.0)).unwrap();
        assert_eq!(f.point(0), Ok(Point::new(-1.0, 0.0)));
        assert_eq!(f.left_domain_border(), Ok(-1.0));
        assert!(matches!(f.add_point(Point::new(-1.0, 99.0)), Err(FunctionError::InvalidPoint(_))));
        assert_eq!(f.points_count(), 6);
        f.add_point(Point::new(6.0, 0.0)).unwrap();
        f.add_point(Point::new(11.0, 0.0)).unwrap();
        let xs: Vec<f64> = f.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![-1.0, 0.0, 2.5, 5.0, 6.0, 7.5, 10.0, 11.0]);
        assert_ring_consistent(&f);
    }
    #[test]
    fn test_add_point_exact_tolerance() {
        let mut f = sample();
        assert!(f.add_point(Point::new(5.0 + 1e-12, 0.0)).is_ok());
        assert_eq!(f.point_x(3), Ok(5.0 + 1e-12));
        assert_ring_consistent(&f);
    }
    #[test]
    fn test_rejected_insertion_rolls_back() {
        let mut f = sample();
        let before = f.points();
        let slots = f.nodes.len();
        assert!(matches!(f.add_point(Point::new(f64::NAN, 1.0)), Err(FunctionError::InvalidPoint(_))));
        assert_eq!(f.points(), before);
        assert_eq!(f.free.len(), 1);
        f.add_point(Point::new(1.0, 1.0)).unwrap();
        assert_eq!(f.nodes.len(), slots + 1);
        assert!(f.free.is_empty());
        assert_ring_consistent(&f);
    }
    #[test]
    fn test_add_node_by_index_bounds() {
        let mut f = sample();
        assert_eq!(
            f.add_node_by_index(6, Point::default()),
            Err(FunctionError::IndexOutOfRange { index: 6, len: 6 })
        );
    }
    #[test]
    fn test_set_point_ordering() {
        let mut f = sample();
        assert!(f.set_point(2, Point::new(6.0, 9.0)).is_ok());
        assert_eq!(f.point(2), Ok(Point::new(6.0, 9.0)));
        assert!(matches!(f.set_point(2, Point::new(7.5, 0.0)), Err(FunctionError::InvalidPoint(_))));
        assert!(matches!(f.set_point(0, Point::new(2.5, 0.0)), Err(FunctionError::InvalidPoint(_))));
        assert!(f.set_point(0, Point::new(2.5 - 1e-12, 0.0)).is_ok());
        assert!(matches!(f.set_point(4, Point::new(7.5, 0.0)), Err(FunctionError::InvalidPoint(_))));
        assert!(f.set_point(4, Point::new(20.0, 0.0)).is_ok());
        assert_eq!(f.right_domain_border(), Ok(20.0));
        assert_eq!(f.set_point(5, Point::default()), Err(FunctionError::IndexOutOfRange { index: 5, len: 5 }));
    }
    #[test]
    fn test_set_point_x_and_y() {
        let mut f = sample();
        assert!(matches!(f.set_point_x(2, 7.5), Err(FunctionError::InvalidPoint(_))));
        assert!(f.set_point_x(2, 5.0).is_ok());
        assert!(f.set_point_x(2, 3.0).is_ok());
        assert_eq!(f.point(2), Ok(Point::new(3.0, 3.0)));
        f.set_point_y(2, -4.0).unwrap();
        assert_eq!(f.point_y(2), Ok(-4.0));
        assert_eq!(f.point_x(2), Ok(3.0));
        assert_eq!(f.set_point_y(9, 0.0), Err(FunctionError::IndexOutOfRange { index: 9, len: 5 }));
    }
    #[test]
    fn test_delete_and_minimum() {
        let mut f = sample();
        f.delete_point(0).unwrap();
        f.delete_point(3).unwrap();
        f.delete_point(1).unwrap();
        assert_eq!(f.points(), vec![Point::new(2.5, 2.0), Point::new(7.5, 4.0)]);
        assert!(matches!(f.delete_point(0), Err(FunctionError::InvalidState(_))));
        assert_eq!(f.delete_point(2), Err(FunctionError::IndexOutOfRange { index: 2, len: 2 }));
        assert_ring_consistent(&f);
    }
    #[test]
    fn test_cursor_steps_sequentially() {
        let f = LinkedTabulatedFunction::new(0.0, 9.0, 10).unwrap();
        for i in 0..10 {
            assert_eq!(f.point_x(i), Ok(i as f64));
            assert_eq!(f.cursor.get().map(|c| c.index), Some(i));
        }
        for i in (0..10).rev() {
            assert_eq!(f.point_x(i), Ok(i as f64));
        }
        assert_ring_consistent(&f);
    }
    #[test]
    fn test_cursor_walks_and_falls_back() {
        let f = LinkedTabulatedFunction::new(0.0, 19.0, 20).unwrap();
        f.point(10).unwrap();
        assert_eq!(f.point_x(13), Ok(13.0));
        assert_eq!(f.point_x(1), Ok(1.0));
        assert_eq!(f.point_x(18), Ok(18.0));
        assert_eq!(f.cursor.get().map(|c| c.index), Some(18));
        assert_ring_consistent(&f);
    }
    #[test]
    fn test_cursor_tracks_evaluation() {
        let f = sample();
        assert_relative_eq!(f.function_value(8.0), 4.2);
        let c = f.cursor.get().unwrap();
        assert_eq!(c.index, 3);
        assert_relative_eq!(f.function_value(1.0), 1.4);
        assert_eq!(f.cursor.get().map(|c| c.index), Some(0));
        assert_ring_consistent(&f);
    }
    #[test]
    fn test_cursor_adjusted_on_delete() {
        let mut f = sample();
        f.point(3).unwrap();
        f.delete_point(1).unwrap();
        assert_eq!(f.cursor.get().map(|c| c.index), Some(2));
        assert_ring_consistent(&f);
        f.delete_point(2).unwrap();
        assert_eq!(f.cursor.get(), None);
        assert_eq!(f.point(1), Ok(Point::new(5.0, 3.0)));
        assert_ring_consistent(&f);
    }
    #[test]
    fn test_cursor_disabled_never_caches() {
        let mut f = sample();
        f.set_cursor_enabled(false);
        assert_eq!(f.point_x(3), Ok(7.5));
        assert_relative_eq!(f.function_value(8.0), 4.2);
        assert_eq!(f.cursor.get(), None);
        f.add_point(Point::new(1.0, 0.0)).unwrap();
        f.delete_point(0).unwrap();
        assert_eq!(f.cursor.get(), None);
        assert_eq!(f.points(), {
            let mut g = sample();
            g.add_point(Point::new(1.0, 0.0)).unwrap();
            g.delete_point(0).unwrap();
            g.points()
        });
    }
    #[test]
    fn test_equality_ignores_cursor() {
        let a = sample();
        let b = sample();
        a.point(4).unwrap();
        assert_eq!(a, b);
        let mut c = sample();
        c.set_point_y(0, 9.0).unwrap();
        assert_ne!(a, c);
    }
    #[test]
    fn test_display() {
        let f = LinkedTabulatedFunction::new(0.0, 1.0, 2).unwrap();
        assert_eq!(f.to_string(), "LinkedTabulatedFunction{pointsCount=2, points=[(0, 0), (1, 0)]}");
    }
}
