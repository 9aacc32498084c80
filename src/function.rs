pub mod array;
pub mod linked;
use std::fmt;
use crate::{
    consts::MIN_POINTS,
    error::{FunctionError, Result},
    point::Point,
    utils::linspace,
};
pub use self::{array::ArrayTabulatedFunction, linked::LinkedTabulatedFunction};
/// A function known only at a finite set of points with strictly
/// increasing x, evaluated elsewhere by piecewise-linear interpolation.
///
/// Both storage strategies implement this trait, so callers can hold a
/// `Box<dyn TabulatedFunction>` and stay agnostic of the representation.
/// Reads always hand out copies; no operation exposes internal storage.
pub trait TabulatedFunction: fmt::Display {
    /// x of the first point.
    fn left_domain_border(&self) -> Result<f64>;
    /// x of the last point.
    fn right_domain_border(&self) -> Result<f64>;
    /// Interpolated value at `x`, or NaN outside the domain.
    fn function_value(&self, x: f64) -> f64;
    fn points_count(&self) -> usize;
    fn point(&self, index: usize) -> Result<Point>;
    /// Replaces the point at `index`. The new x must stay strictly
    /// between the neighbouring x values.
    fn set_point(&mut self, index: usize, point: Point) -> Result<()>;
    fn point_x(&self, index: usize) -> Result<f64>;
    fn point_y(&self, index: usize) -> Result<f64>;
    fn set_point_x(&mut self, index: usize, x: f64) -> Result<()>;
    /// Changes y only; there is no ordering constraint on y.
    fn set_point_y(&mut self, index: usize, y: f64) -> Result<()>;
    /// Removes the point at `index`. Refused when only `MIN_POINTS` remain.
    fn delete_point(&mut self, index: usize) -> Result<()>;
    /// Inserts `point` at the position its x dictates.
    fn add_point(&mut self, point: Point) -> Result<()>;
    /// Copies of all points in x order.
    fn points(&self) -> Vec<Point>;
}
/// Uniform x grid shared by both constructors.
pub(crate) fn uniform_grid(left_x: f64, right_x: f64, points_count: usize) -> Result<Vec<f64>> {
    if !(left_x < right_x) {
        return Err(FunctionError::InvalidArgument(format!(
            "left border {} must be less than right border {}",
            left_x, right_x
        )));
    }
    if points_count < MIN_POINTS {
        return Err(FunctionError::InvalidArgument(format!(
            "at least {} points required, got {}",
            MIN_POINTS, points_count
        )));
    }
    Ok(linspace(left_x, right_x, points_count))
}
pub(crate) fn ordering_error(x: f64, lower: Option<f64>, upper: Option<f64>) -> FunctionError {
    let msg = match (lower, upper) {
        (Some(l), Some(u)) => format!("x={} must lie in ({}, {})", x, l, u),
        (Some(l), None) => format!("x={} must be greater than {}", x, l),
        (None, Some(u)) => format!("x={} must be less than {}", x, u),
        (None, None) => format!("x={} is not orderable", x),
    };
    FunctionError::InvalidPoint(msg)
}
pub(crate) fn minimum_points_error(len: usize) -> FunctionError {
    FunctionError::InvalidState(format!(
        "cannot delete from {} points: at least {} must remain",
        len, MIN_POINTS
    ))
}
pub(crate) fn write_points(f: &mut fmt::Formatter<'_>, name: &str, points: impl Iterator<Item = Point>, len: usize) -> fmt::Result {
    write!(f, "{}{{pointsCount={}, points=[", name, len)?;
    for (i, p) in points.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", p)?;
    }
    write!(f, "]}}")
}
