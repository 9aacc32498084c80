use std::fmt;
use tracing::debug;
use crate::{
    consts::{EPSILON, MIN_POINTS},
    error::{check_index, FunctionError, Result},
    function::{minimum_points_error, ordering_error, uniform_grid, write_points, TabulatedFunction},
    point::Point,
    utils::{approx_eq, interpolate, precedes},
};
/// Tabulated function stored in one contiguous buffer.
///
/// All ordering and duplicate checks treat x values closer than
/// [`EPSILON`] as equal. Capacity grows by half plus one on a full
/// insert and never shrinks.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayTabulatedFunction {
    points: Vec<Point>,
}
impl ArrayTabulatedFunction {
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
        let mut points = Vec::with_capacity(xs.len());
        points.extend(xs.into_iter().enumerate().map(|(i, x)| Point::new(x, y(i))));
        Self { points }
    }
    pub fn capacity(&self) -> usize {
        self.points.capacity()
    }
    fn check_order(&self, index: usize, x: f64) -> Result<()> {
        let lower = index.checked_sub(1).map(|i| self.points[i].x);
        let upper = self.points.get(index + 1).map(|p| p.x);
        let fits_lower = lower.map_or(!x.is_nan(), |l| precedes(l, x, EPSILON));
        let fits_upper = upper.map_or(!x.is_nan(), |u| precedes(x, u, EPSILON));
        if fits_lower && fits_upper {
            Ok(())
        } else {
            Err(ordering_error(x, lower, upper))
        }
    }
    fn grow_if_full(&mut self) {
        let capacity = self.points.capacity();
        if self.points.len() == capacity {
            let additional = capacity / 2 + 1;
            self.points.reserve_exact(additional);
            debug!("array grown: capacity {} -> {}", capacity, self.points.capacity());
        }
    }
}
impl TabulatedFunction for ArrayTabulatedFunction {
    fn left_domain_border(&self) -> Result<f64> {
        self.points
            .first()
            .map(|p| p.x)
            .ok_or_else(|| FunctionError::InvalidState("function has no points".to_string()))
    }
    fn right_domain_border(&self) -> Result<f64> {
        self.points
            .last()
            .map(|p| p.x)
            .ok_or_else(|| FunctionError::InvalidState("function has no points".to_string()))
    }
    fn function_value(&self, x: f64) -> f64 {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return f64::NAN;
        };
        if !(x >= first.x && x <= last.x) {
            return f64::NAN;
        }
        self.points
            .windows(2)
            .find(|pair| x >= pair[0].x && x <= pair[1].x)
            .map(|pair| interpolate(pair[0].x, pair[0].y, pair[1].x, pair[1].y, x))
            .unwrap_or(f64::NAN)
    }
    fn points_count(&self) -> usize {
        self.points.len()
    }
    fn point(&self, index: usize) -> Result<Point> {
        check_index(index, self.points.len())?;
        Ok(self.points[index])
    }
    fn set_point(&mut self, index: usize, point: Point) -> Result<()> {
        check_index(index, self.points.len())?;
        self.check_order(index, point.x)?;
        self.points[index] = point;
        Ok(())
    }
    fn point_x(&self, index: usize) -> Result<f64> {
        check_index(index, self.points.len())?;
        Ok(self.points[index].x)
    }
    fn point_y(&self, index: usize) -> Result<f64> {
        check_index(index, self.points.len())?;
        Ok(self.points[index].y)
    }
    fn set_point_x(&mut self, index: usize, x: f64) -> Result<()> {
        check_index(index, self.points.len())?;
        self.check_order(index, x)?;
        self.points[index].set_x(x);
        Ok(())
    }
    fn set_point_y(&mut self, index: usize, y: f64) -> Result<()> {
        check_index(index, self.points.len())?;
        self.points[index].set_y(y);
        Ok(())
    }
    fn delete_point(&mut self, index: usize) -> Result<()> {
        check_index(index, self.points.len())?;
        if self.points.len() <= MIN_POINTS {
            return Err(minimum_points_error(self.points.len()));
        }
        self.points.remove(index);
        Ok(())
    }
    fn add_point(&mut self, point: Point) -> Result<()> {
        if let Some(existing) = self.points.iter().find(|p| approx_eq(p.x, point.x, EPSILON)) {
            return Err(FunctionError::InvalidPoint(format!(
                "x={} already exists (as {})",
                point.x, existing.x
            )));
        }
        let index = self.points.iter().take_while(|p| point.x > p.x).count();
        let lower = index.checked_sub(1).map(|i| self.points[i].x);
        let upper = self.points.get(index).map(|p| p.x);
        let fits = lower.map_or(true, |l| precedes(l, point.x, EPSILON))
            && upper.map_or(true, |u| precedes(point.x, u, EPSILON));
        if !fits || point.x.is_nan() {
            return Err(ordering_error(point.x, lower, upper));
        }
        self.grow_if_full();
        self.points.insert(index, point);
        Ok(())
    }
    fn points(&self) -> Vec<Point> {
        self.points.clone()
    }
}
impl fmt::Display for ArrayTabulatedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_points(f, "ArrayTabulatedFunction", self.points.iter().copied(), self.points.len())
    }
}
