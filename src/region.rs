//! Contains the Region struct, which describes a rectangular viewport
//! in both fractal-space and pixel-space coordinates, together with the
//! affine mapping between them.  A Region is created fresh for every
//! frame (or every strip of a frame) and never mutated afterwards; pan
//! and zoom produce new Regions.

use failure::Fail;
use num::Complex;

/// Describes the x, y of a point on the pixel plane.  Pixel
/// coordinates are global: a strip of a frame keeps the frame's
/// coordinates rather than renumbering from zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pixel(pub usize, pub usize);

/// The fractal-space top-left corner of the home view.
pub const DEFAULT_FRAC_TL: Complex<f64> = Complex { re: -2.0, im: 1.0 };

/// The fractal-space bottom-right corner of the home view.
pub const DEFAULT_FRAC_BR: Complex<f64> = Complex { re: 1.0, im: -1.0 };

/// Errors raised when a Region's corners do not describe a viewport.
#[derive(Debug, Fail, PartialEq)]
pub enum RegionError {
    /// The pixel rectangle has zero width or height.
    #[fail(display = "pixel rectangle {:?} to {:?} has no area", _0, _1)]
    EmptyPixelRect(Pixel, Pixel),
    /// A fractal-space bound is NaN or infinite.
    #[fail(display = "fractal bounds are not finite")]
    NonFiniteBounds,
}

/// A rectangular viewport: fractal-space corners, pixel-space corners,
/// and the scale factors relating the two.  The vertical axis is
/// allowed to run in either direction; the home view puts positive
/// imaginary at the top, so `y_ratio` is negative there.
#[derive(Copy, Clone, Debug)]
pub struct Region {
    /// Fractal-space point under the top-left pixel corner.
    pub frac_tl: Complex<f64>,
    /// Fractal-space point under the bottom-right pixel corner.
    pub frac_br: Complex<f64>,
    /// Top-left corner on the pixel plane, inclusive.
    pub pixel_tl: Pixel,
    /// Bottom-right corner on the pixel plane, exclusive.
    pub pixel_br: Pixel,
    // Fractal-space distance covered by one pixel along each axis.
    x_ratio: f64,
    y_ratio: f64,
    // The pixel the mapping is expressed from, and its fractal point.
    // For a whole frame this is the top-left corner.  Strips inherit
    // the parent's anchor verbatim, so a pixel maps to the same
    // fractal point, bit for bit, whether the mapping is evaluated
    // through the frame or through a strip of it.
    anchor_px: Pixel,
    anchor: Complex<f64>,
}

impl Region {
    /// Constructor.  Takes the two fractal-space corners and the two
    /// pixel-space corners.  The pixel rectangle must be non-empty and
    /// the fractal bounds finite.
    pub fn new(
        frac_tl: Complex<f64>,
        frac_br: Complex<f64>,
        pixel_tl: Pixel,
        pixel_br: Pixel,
    ) -> Result<Region, RegionError> {
        if pixel_br.0 <= pixel_tl.0 || pixel_br.1 <= pixel_tl.1 {
            return Err(RegionError::EmptyPixelRect(pixel_tl, pixel_br));
        }
        if !(frac_tl.re.is_finite()
            && frac_tl.im.is_finite()
            && frac_br.re.is_finite()
            && frac_br.im.is_finite())
        {
            return Err(RegionError::NonFiniteBounds);
        }

        let x_ratio = (frac_br.re - frac_tl.re) / ((pixel_br.0 - pixel_tl.0) as f64);
        let y_ratio = (frac_br.im - frac_tl.im) / ((pixel_br.1 - pixel_tl.1) as f64);

        Ok(Region {
            frac_tl,
            frac_br,
            pixel_tl,
            pixel_br,
            x_ratio,
            y_ratio,
            anchor_px: pixel_tl,
            anchor: frac_tl,
        })
    }

    /// The home view: the whole set between `(-2, 1)` and `(1, -1)`,
    /// covering a `width` by `height` pixel frame anchored at `(0, 0)`.
    pub fn default_view(width: usize, height: usize) -> Result<Region, RegionError> {
        Region::new(
            DEFAULT_FRAC_TL,
            DEFAULT_FRAC_BR,
            Pixel(0, 0),
            Pixel(width, height),
        )
    }

    /// A new Region over the same pixel rectangle with different
    /// fractal corners.  This is the pan/zoom step: scale factors are
    /// recomputed and the anchor moves to the new top-left corner.
    pub fn with_frac_bounds(&self, frac_tl: Complex<f64>, frac_br: Complex<f64>) -> Region {
        let x_ratio = (frac_br.re - frac_tl.re) / (self.pixel_width() as f64);
        let y_ratio = (frac_br.im - frac_tl.im) / (self.pixel_height() as f64);
        Region {
            frac_tl,
            frac_br,
            pixel_tl: self.pixel_tl,
            pixel_br: self.pixel_br,
            x_ratio,
            y_ratio,
            anchor_px: self.pixel_tl,
            anchor: frac_tl,
        }
    }

    /// Width of the pixel rectangle.
    pub fn pixel_width(&self) -> usize {
        self.pixel_br.0 - self.pixel_tl.0
    }

    /// Height of the pixel rectangle.
    pub fn pixel_height(&self) -> usize {
        self.pixel_br.1 - self.pixel_tl.1
    }

    /// Fractal-space distance covered by one pixel step along x.
    pub fn x_ratio(&self) -> f64 {
        self.x_ratio
    }

    /// Fractal-space distance covered by one pixel step along y.
    pub fn y_ratio(&self) -> f64 {
        self.y_ratio
    }

    /// Given the global coordinates of a pixel inside this Region, map
    /// it to the corresponding fractal-space point.  The bottom-right
    /// corner is accepted as well, which gives the exclusive fractal
    /// bound of the covered span.
    pub fn point_at(&self, x: usize, y: usize) -> Complex<f64> {
        debug_assert!(x >= self.pixel_tl.0 && x <= self.pixel_br.0);
        debug_assert!(y >= self.pixel_tl.1 && y <= self.pixel_br.1);
        Complex::new(
            ((x - self.anchor_px.0) as f64) * self.x_ratio + self.anchor.re,
            ((y - self.anchor_px.1) as f64) * self.y_ratio + self.anchor.im,
        )
    }

    /// The sub-Region covering columns `start..end` of this Region and
    /// its full pixel height.  Fractal bounds are derived through this
    /// Region's mapping; the scale factors and the mapping anchor are
    /// inherited verbatim, so a kernel running over the strip maps
    /// every pixel to exactly the point the parent would.
    pub fn column_span(&self, start: usize, end: usize) -> Region {
        assert!(
            self.pixel_tl.0 <= start && start < end && end <= self.pixel_br.0,
            "column span {}..{} outside pixel range {}..{}",
            start,
            end,
            self.pixel_tl.0,
            self.pixel_br.0
        );
        let frac_tl = Complex::new(self.point_at(start, self.pixel_tl.1).re, self.frac_tl.im);
        let frac_br = Complex::new(self.point_at(end, self.pixel_tl.1).re, self.frac_br.im);
        Region {
            frac_tl,
            frac_br,
            pixel_tl: Pixel(start, self.pixel_tl.1),
            pixel_br: Pixel(end, self.pixel_br.1),
            x_ratio: self.x_ratio,
            y_ratio: self.y_ratio,
            anchor_px: self.anchor_px,
            anchor: self.anchor,
        }
    }
}
