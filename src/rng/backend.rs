//! Optional SIMD-accelerated backend, gated behind the `wide-simd` feature.
//!
//! `wide::f64x4` gives us two 256-bit lanes of 4 `f64` each for the 8-wide
//! batch. The arithmetic here is identical to [`super::core::step`]'s scalar
//! path by construction (same operations, same order) so the two must agree
//! bit-for-bit; the scalar path in `core.rs` remains the default because it
//! needs no optional dependency and is what the golden-vector tests pin.
//!
//! TODO: lower `fract_mod1`/`round_to` directly onto `wide` lane ops instead
//! of extracting to arrays per call, once a `wide` release exposes `floor`/
//! `round` on `f64x4` in this crate's pinned version.

use super::lanes::Lanes8;
use wide::f64x4;

const STEP_MUL: f64 = 1.72431234;
const STEP_ADD: f64 = 2.134453429141;

/// Vectorized step over two `f64x4` halves. Falls back to the scalar
/// per-element math for the modulus/rounding stage (see module TODO above),
/// so behavior is identical to [`super::core::step`].
pub fn step_wide(state: Lanes8) -> Lanes8 {
    let lo = f64x4::from(&state.0[0..4]);
    let hi = f64x4::from(&state.0[4..8]);

    let mul = f64x4::splat(STEP_MUL);
    let add = f64x4::splat(STEP_ADD);

    let lo = lo * mul + add;
    let hi = hi * mul + add;

    let lo_arr = lo.to_array();
    let hi_arr = hi.to_array();

    let mut out = [0.0; 8];
    for i in 0..4 {
        let v = lo_arr[i];
        out[i] = (v - v.floor()) * 1e13;
        out[i] = out[i].round() / 1e13;
    }
    for i in 0..4 {
        let v = hi_arr[i];
        out[4 + i] = (v - v.floor()) * 1e13;
        out[4 + i] = out[4 + i].round() / 1e13;
    }
    Lanes8(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::core::step as step_scalar;

    #[test]
    fn wide_backend_matches_scalar() {
        let state = Lanes8([0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8]);
        let a = step_scalar(state);
        let b = step_wide(state);
        for i in 0..8 {
            assert!((a.0[i] - b.0[i]).abs() < 1e-12);
        }
    }
}
