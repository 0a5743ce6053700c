//! The vector kernel: four horizontally adjacent pixels advanced in
//! lockstep, each lane stopping its count independently once its orbit
//! escapes or the budget is spent.
//!
//! Lane coordinates come from the same scalar mapping the direct
//! kernel uses, and the recurrence rounds identically, so the counts
//! here match [`crate::iterate::escape_iterations`] bit for bit.

use wide::{f64x4, CmpLe, CmpLt};

use crate::frame::{colour, FrameStrip};
use crate::iterate::{escape_iterations, BAILOUT_SQR};
use crate::region::Region;

/// Number of pixels advanced together by one lane group.
pub const LANES: usize = 4;

/// Escape counts for four `c` values sharing one imaginary part (four
/// adjacent pixels of a row), advanced in lockstep.
///
/// A lane is active while its orbit is still inside the bailout
/// circle and its count is below the budget; only active lanes are
/// counted, so a lane's count freezes at the iteration where it first
/// escapes, exactly as in the scalar kernels.
pub fn escape_iterations_x4(cr: [f64; 4], ci: f64, budget: u32) -> [u32; 4] {
    let cr = f64x4::from(cr);
    let ci = f64x4::splat(ci);
    let bailout = f64x4::splat(BAILOUT_SQR);
    let limit = f64x4::splat(budget as f64);
    let two = f64x4::splat(2.0);
    let one = f64x4::splat(1.0);
    let zero = f64x4::splat(0.0);

    let mut zr = zero;
    let mut zi = zero;
    let mut n = zero;

    loop {
        let zr2 = zr * zr;
        let zi2 = zi * zi;
        let bounded = (zr2 + zi2).cmp_le(bailout);
        let within = n.cmp_lt(limit);
        let active = bounded & within;
        if !active.any() {
            break;
        }
        // Advance every lane.  Escaped lanes keep iterating and may
        // overflow to infinities or NaNs, which stay outside the
        // bailout test; their counts are frozen by the mask either
        // way.
        let zr_next = zr2 - zi2 + cr;
        zi = two * zr * zi + ci;
        zr = zr_next;
        n += active.blend(one, zero);
    }

    let counts = n.to_array();
    [
        counts[0] as u32,
        counts[1] as u32,
        counts[2] as u32,
        counts[3] as u32,
    ]
}

/// Render a Region through the lane kernel.  Columns left over when
/// the strip width is not a multiple of the lane count fall back to
/// the scalar kernel, which produces identical counts.
pub fn render_lanes(region: &Region, budget: u32, strip: &mut FrameStrip<'_>) {
    let x0 = region.pixel_tl.0;
    let x1 = region.pixel_br.0;
    let groups_end = x0 + (x1 - x0) / LANES * LANES;

    for y in region.pixel_tl.1..region.pixel_br.1 {
        let ci = region.point_at(x0, y).im;

        let mut x = x0;
        while x < groups_end {
            let cr = [
                region.point_at(x, y).re,
                region.point_at(x + 1, y).re,
                region.point_at(x + 2, y).re,
                region.point_at(x + 3, y).re,
            ];
            let counts = escape_iterations_x4(cr, ci, budget);
            for (lane, &count) in counts.iter().enumerate() {
                strip.set(x + lane, y, colour(count));
            }
            x += LANES;
        }

        for x in groups_end..x1 {
            let n = escape_iterations(region.point_at(x, y), budget);
            strip.set(x, y, colour(n));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{FrameBuffer, Rgb};
    use crate::iterate::render_direct;
    use itertools::iproduct;
    use num::Complex;

    fn render_with(
        kernel: fn(&Region, u32, &mut FrameStrip<'_>),
        region: &Region,
        budget: u32,
    ) -> Vec<Rgb> {
        let mut frame = FrameBuffer::new(region.pixel_width(), region.pixel_height());
        {
            let mut strip = unsafe { frame.strip(region.pixel_tl.0..region.pixel_br.0) };
            kernel(region, budget, &mut strip);
        }
        frame.snapshot()
    }

    #[test]
    fn lanes_match_the_scalar_oracle_per_lane() {
        // A group mixing immediate escapes, slow escapes, and interior
        // points exercises independent lane exit.
        let cr = [-2.0, 0.25, -0.75, 0.3];
        let ci = 0.1;
        for &budget in &[1, 4, 16, 200] {
            let counts = escape_iterations_x4(cr, ci, budget);
            for lane in 0..LANES {
                assert_eq!(
                    counts[lane],
                    escape_iterations(Complex::new(cr[lane], ci), budget),
                    "lane {} diverged at budget {}",
                    lane,
                    budget
                );
            }
        }
    }

    #[test]
    fn lane_counts_freeze_and_never_regress() {
        let cr = [-1.8, 0.4, -0.2, 0.27];
        let ci = 0.51;
        let mut previous = [0u32; LANES];
        for budget in 1..64u32 {
            let counts = escape_iterations_x4(cr, ci, budget);
            for lane in 0..LANES {
                assert!(counts[lane] <= budget);
                assert!(counts[lane] >= previous[lane], "lane {} regressed", lane);
                // A lane that stopped short of the budget has escaped;
                // raising the budget must not move it.
                if previous[lane] < budget - 1 {
                    assert_eq!(counts[lane], previous[lane]);
                }
            }
            previous = counts;
        }
    }

    #[test]
    fn lane_renderer_matches_direct_renderer() {
        for &(w, h) in &[(8usize, 8usize), (7, 5), (5, 3), (37, 11)] {
            let region = Region::default_view(w, h).unwrap();
            assert_eq!(
                render_with(render_lanes, &region, 50),
                render_with(render_direct, &region, 50),
                "divergence on a {}x{} view",
                w,
                h
            );
        }
    }

    #[test]
    fn zero_budget_renders_uniformly() {
        let region = Region::default_view(9, 2).unwrap();
        let shot = render_with(render_lanes, &region, 0);
        for (y, x) in iproduct!(0..2usize, 0..9usize) {
            assert_eq!(shot[y * 9 + x], crate::frame::colour(0));
        }
    }
}
