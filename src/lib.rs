//! Functions tabulated at strictly increasing x, evaluated by
//! piecewise-linear interpolation over two interchangeable storage
//! strategies: a contiguous buffer and a cursor-cached circular list.
pub mod consts;
pub mod error;
pub mod function;
pub mod point;
pub mod utils;
pub use error::{FunctionError, Result};
pub use function::{ArrayTabulatedFunction, LinkedTabulatedFunction, TabulatedFunction};
pub use point::Point;
