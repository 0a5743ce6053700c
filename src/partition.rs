//! Splits a Region into vertical strips, one per worker.  Strips are
//! contiguous, disjoint, and together cover the parent's pixel columns
//! exactly; each carries its own fractal-space bounds derived through
//! the parent's mapping.

use crate::region::Region;

/// Divide `region` into `parts` vertical strips of near-equal width.
///
/// When the pixel width does not divide evenly, the leading
/// `width % parts` strips take one extra column, so no column is ever
/// dropped.  When `parts` exceeds the pixel width the count is clamped
/// to one column per strip.
pub fn split_columns(region: &Region, parts: usize) -> Vec<Region> {
    assert!(parts > 0, "cannot split a region into zero strips");
    let width = region.pixel_width();
    let parts = parts.min(width);

    let base = width / parts;
    let remainder = width % parts;

    let mut strips = Vec::with_capacity(parts);
    let mut start = region.pixel_tl.0;
    for i in 0..parts {
        let extra = if i < remainder { 1 } else { 0 };
        let end = start + base + extra;
        strips.push(region.column_span(start, end));
        start = end;
    }
    strips
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::iproduct;

    #[test]
    fn strips_cover_the_parent_exactly() {
        for (width, parts) in iproduct!(1..40usize, 1..9usize) {
            let region = Region::default_view(width, 4).unwrap();
            let strips = split_columns(&region, parts);
            assert_eq!(strips.len(), parts.min(width));

            // Contiguous, disjoint, and covering: each strip starts
            // where the previous one ended.
            let mut expected_start = 0;
            for strip in &strips {
                assert_eq!(strip.pixel_tl.0, expected_start);
                assert!(strip.pixel_width() > 0);
                assert_eq!(strip.pixel_height(), region.pixel_height());
                expected_start = strip.pixel_br.0;
            }
            assert_eq!(expected_start, width);
        }
    }

    #[test]
    fn remainder_goes_to_leading_strips() {
        let region = Region::default_view(10, 4).unwrap();
        let widths: Vec<usize> = split_columns(&region, 4)
            .iter()
            .map(|s| s.pixel_width())
            .collect();
        assert_eq!(widths, vec![3, 3, 2, 2]);
    }

    #[test]
    fn fractal_bounds_are_seamless() {
        let region = Region::default_view(16, 8).unwrap();
        let strips = split_columns(&region, 3);
        for pair in strips.windows(2) {
            assert_eq!(pair[0].frac_br.re, pair[1].frac_tl.re);
        }
        assert_eq!(strips[0].frac_tl.re, region.frac_tl.re);
        assert_eq!(strips.last().unwrap().frac_br.re, region.frac_br.re);
    }

    #[test]
    fn more_parts_than_columns_clamps() {
        let region = Region::default_view(3, 2).unwrap();
        let strips = split_columns(&region, 8);
        assert_eq!(strips.len(), 3);
        assert!(strips.iter().all(|s| s.pixel_width() == 1));
    }
}
