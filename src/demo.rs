use anyhow::{Context, Result};
use tracing::{info, warn};
use tabulated::{
    consts::DemoConfig,
    ArrayTabulatedFunction, FunctionError, LinkedTabulatedFunction, Point, TabulatedFunction,
};
/// Logs `outcome` as the expected rejection, or warns when it succeeded.
fn expect_rejected<T: std::fmt::Debug>(what: &str, outcome: tabulated::Result<T>) {
    match outcome {
        Err(e) => info!("{} rejected: {}", what, e),
        Ok(v) => warn!("{} unexpectedly succeeded: {:?}", what, v),
    }
}
fn sample_values(function: &dyn TabulatedFunction, steps: usize) -> Result<Vec<(f64, f64)>> {
    let left = function.left_domain_border()?;
    let right = function.right_domain_border()?;
    let step = (right - left) / steps as f64;
    Ok((0..=steps)
        .map(|i| {
            let x = if i == steps { right } else { left + step * i as f64 };
            (x, function.function_value(x))
        })
        .collect())
}
fn describe(name: &str, function: &dyn TabulatedFunction, steps: usize) -> Result<()> {
    info!("== {}", name);
    info!(
        "domain: [{}, {}], points: {}",
        function.left_domain_border()?,
        function.right_domain_border()?,
        function.points_count()
    );
    for (i, p) in function.points().iter().enumerate() {
        info!("  [{}] ({:.2}, {:.2})", i, p.x, p.y);
    }
    for (x, y) in sample_values(function, steps)? {
        info!("  f({:.2}) = {:.2}", x, y);
    }
    Ok(())
}
fn exercise_errors(function: &mut dyn TabulatedFunction) -> Result<()> {
    let count = function.points_count();
    expect_rejected("point(count)", function.point(count));
    expect_rejected("point(100)", function.point(100));
    let below_first = function.point_x(0)? - 1.0;
    expect_rejected("set_point_x(2, left - 1)", function.set_point_x(2, below_first));
    let existing = function.point_x(1)?;
    expect_rejected("add_point(duplicate x)", function.add_point(Point::new(existing, 10.0)));
    let mut minimal = ArrayTabulatedFunction::new(0.0, 2.0, 2)?;
    expect_rejected("delete_point on 2 points", minimal.delete_point(0));
    let mid = (function.left_domain_border()? + function.right_domain_border()?) / 2.0;
    match function.add_point(Point::new(mid + 0.25, 10.0)) {
        Ok(()) => info!("added ({}, 10)", mid + 0.25),
        Err(FunctionError::InvalidPoint(msg)) => warn!("add skipped: {}", msg),
        Err(e) => return Err(e).context("add_point"),
    }
    function.set_point_y(1, 15.0).context("set_point_y")?;
    info!("after edits: {}", function);
    Ok(())
}
fn exercise_constructors() {
    expect_rejected("ArrayTabulatedFunction(10, 0, 5)", ArrayTabulatedFunction::new(10.0, 0.0, 5));
    expect_rejected("LinkedTabulatedFunction(5, 5, 5)", LinkedTabulatedFunction::new(5.0, 5.0, 5));
    expect_rejected("ArrayTabulatedFunction(0, 10, 1)", ArrayTabulatedFunction::new(0.0, 10.0, 1));
    expect_rejected("LinkedTabulatedFunction(0, 10, [1])", LinkedTabulatedFunction::with_values(0.0, 10.0, &[1.0]));
}
fn exercise_point_operations() -> Result<()> {
    let mut function = ArrayTabulatedFunction::new(0.0, 4.0, 3)?;
    info!("initial: {}", function);
    function.add_point(Point::new(2.5, 10.0))?;
    function.add_point(Point::new(1.5, 5.0))?;
    info!("after adds: {} (capacity {})", function, function.capacity());
    function.delete_point(2)?;
    info!("after delete: {}", function);
    Ok(())
}
pub fn run(config: &DemoConfig) -> Result<()> {
    exercise_constructors();
    let values: Vec<f64> = (0..config.points_count).map(|i| (i * i) as f64).collect();
    let array: Box<dyn TabulatedFunction> = Box::new(
        ArrayTabulatedFunction::new(config.left_x, config.right_x, config.points_count)
            .context("build array function")?,
    );
    let linked: Box<dyn TabulatedFunction> = Box::new(
        LinkedTabulatedFunction::with_values(config.left_x, config.right_x, &values)
            .context("build linked function")?,
    );
    let mut functions = [("ArrayTabulatedFunction", array), ("LinkedTabulatedFunction", linked)];
    for (name, function) in functions.iter_mut() {
        describe(*name, &**function, config.sample_steps)?;
        exercise_errors(&mut **function)?;
    }
    exercise_point_operations()
}
