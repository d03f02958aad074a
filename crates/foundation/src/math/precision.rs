//! Deterministic ordering for ray distances and split keys.

use core::cmp::Ordering;

/// Folds `-0.0` into `0.0` and every NaN payload into the canonical NaN.
pub fn canonical_f64(v: f64) -> f64 {
    if v.is_nan() { f64::NAN } else { v + 0.0 }
}

/// Total order over canonical values: NaN sorts after `+inf`.
pub fn cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}
