#[inline(always)]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}
/// Linear interpolation of `x` across the segment `(x1, y1)..(x2, y2)`.
/// Exact at both ends.
#[inline(always)]
pub fn interpolate(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    match () {
        _ if x == x1 => y1,
        _ if x == x2 => y2,
        _ => lerp(y1, y2, (x - x1) / (x2 - x1)),
    }
}
#[inline]
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}
#[inline(always)]
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}
/// `a` lies strictly before `b` and is not within `tolerance` of it.
/// NaN never precedes anything.
#[inline(always)]
pub fn precedes(a: f64, b: f64, tolerance: f64) -> bool {
    a < b && !approx_eq(a, b, tolerance)
}
