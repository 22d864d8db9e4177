//! Piecewise-linear approximation of `atanh`.
//!
//! The sum-product check node rule evaluates `atanh` once per Tanner graph
//! edge and iteration. This module replaces it by seven linear segments with
//! breakpoints at `±0.6640`, `±0.9217` and `±0.9951`, saturating to `±5.0`
//! for inputs beyond `±0.9999`.

/// Output value used in the saturation region.
pub const SATURATION: f64 = 5.0;

/// Inputs with an absolute value above this threshold saturate.
pub const SATURATION_THRESHOLD: f64 = 0.9999;

/// Segments `(upper breakpoint, offset, slope)` for negative inputs. Each
/// segment evaluates `(x + offset) / slope`. Positive inputs use the same
/// segments by symmetry.
const SEGMENTS: [(f64, f64, f64); 3] = [
    (-0.9951, 0.9914, 0.0012),
    (-0.9217, 0.8378, 0.0524),
    (-0.6640, 0.4064, 0.322),
];

const CENTRAL_SLOPE: f64 = 0.83;

/// Approximates `atanh(x)`.
///
/// The function is odd, monotonically non-decreasing and defined for every
/// finite input. Outputs are limited to `±`[`SATURATION`]. The outermost
/// segment reaches the saturation value at `|x| ≈ 0.9974`, before the
/// threshold, so it is clamped there as well.
///
/// # Examples
/// ```
/// # use ldpc802::phi::atanh_approx;
/// assert!((atanh_approx(0.5) - 0.5_f64.atanh()).abs() < 0.06);
/// assert_eq!(atanh_approx(1.5), 5.0);
/// assert_eq!(atanh_approx(-1.5), -5.0);
/// ```
pub fn atanh_approx(x: f64) -> f64 {
    if x > SATURATION_THRESHOLD {
        return SATURATION;
    }
    if x < -SATURATION_THRESHOLD {
        return -SATURATION;
    }
    let y = if x <= SEGMENTS[2].0 {
        let &(_, offset, slope) = SEGMENTS
            .iter()
            .find(|&&(upper, _, _)| x <= upper)
            .unwrap_or(&SEGMENTS[2]);
        (x + offset) / slope
    } else if x <= -SEGMENTS[2].0 {
        x / CENTRAL_SLOPE
    } else {
        let &(_, offset, slope) = SEGMENTS
            .iter()
            .find(|&&(upper, _, _)| x > -upper)
            .unwrap_or(&SEGMENTS[2]);
        (x - offset) / slope
    };
    y.clamp(-SATURATION, SATURATION)
}
