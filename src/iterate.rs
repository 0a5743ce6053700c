// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Scalar reference kernels.
//!
//! Each kernel maps a pixel to a point `c` on the complex plane,
//! iterates `z = z^2 + c` from zero, and counts iterations until the
//! orbit leaves the bailout circle or the budget runs out.  The three
//! strip renderers differ only in how `c` is derived (a fresh affine
//! mapping per pixel, or accumulated increments across the scan) and
//! in whether the recurrence goes through the complex-number type or
//! hand-written real/imaginary arithmetic.  They are the correctness
//! oracle for the vector kernel.

use itertools::iproduct;
use num::Complex;

use crate::frame::{colour, FrameStrip};
use crate::region::Region;

/// Squared bailout radius: an orbit whose squared magnitude exceeds
/// this has escaped and can only diverge from here.
pub const BAILOUT_SQR: f64 = 4.0;

/// Count iterations of `z = z^2 + c` from `z = 0` until the orbit
/// escapes the bailout circle, capped at `budget`.
pub fn escape_iterations(c: Complex<f64>, budget: u32) -> u32 {
    let mut z: Complex<f64> = Complex::new(0.0, 0.0);
    let mut n = 0;
    while z.norm_sqr() <= BAILOUT_SQR && n < budget {
        z = z * z + c;
        n += 1;
    }
    n
}

/// The same count computed with explicit real/imaginary stepping,
/// with no complex-number abstraction in the loop.
pub fn escape_iterations_real(cr: f64, ci: f64, budget: u32) -> u32 {
    let mut zr = 0.0_f64;
    let mut zi = 0.0_f64;
    let mut n = 0;
    while zr * zr + zi * zi <= BAILOUT_SQR && n < budget {
        let zr_next = zr * zr - zi * zi + cr;
        zi = 2.0 * zr * zi + ci;
        zr = zr_next;
        n += 1;
    }
    n
}

/// Render a Region with a fresh affine mapping for every pixel.
pub fn render_direct(region: &Region, budget: u32, strip: &mut FrameStrip<'_>) {
    let ys = region.pixel_tl.1..region.pixel_br.1;
    let xs = region.pixel_tl.0..region.pixel_br.0;
    for (y, x) in iproduct!(ys, xs) {
        let n = escape_iterations(region.point_at(x, y), budget);
        strip.set(x, y, colour(n));
    }
}

/// Render a Region with `c` accumulated across the scan: one addition
/// per pixel instead of a multiply, at the price of accumulated
/// rounding over the row.
pub fn render_stepped(region: &Region, budget: u32, strip: &mut FrameStrip<'_>) {
    let mut ci = region.frac_tl.im;
    for y in region.pixel_tl.1..region.pixel_br.1 {
        let mut cr = region.frac_tl.re;
        for x in region.pixel_tl.0..region.pixel_br.0 {
            let n = escape_iterations(Complex::new(cr, ci), budget);
            strip.set(x, y, colour(n));
            cr += region.x_ratio();
        }
        ci += region.y_ratio();
    }
}

/// Render a Region with accumulated `c` and hand-written
/// real/imaginary arithmetic throughout.
pub fn render_manual(region: &Region, budget: u32, strip: &mut FrameStrip<'_>) {
    let mut ci = region.frac_tl.im;
    for y in region.pixel_tl.1..region.pixel_br.1 {
        let mut cr = region.frac_tl.re;
        for x in region.pixel_tl.0..region.pixel_br.0 {
            let n = escape_iterations_real(cr, ci, budget);
            strip.set(x, y, colour(n));
            cr += region.x_ratio();
        }
        ci += region.y_ratio();
    }
}
