#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot set renderer built for interactive rates.
//!
//! Every frame recomputes the escape iteration of every pixel of the
//! current viewport; nothing is cached between frames, so the
//! interesting work is making that recomputation fast.  The crate
//! offers six strategies for it, selectable per frame: three scalar
//! reference kernels (a fresh affine mapping per pixel through the
//! complex type, an accumulated scan, and an accumulated scan with
//! hand-written real/imaginary arithmetic), a four-lane vector kernel
//! with per-lane early exit, and the vector kernel dispatched over
//! vertical strips on either per-frame scoped threads or a persistent
//! worker pool.
//!
//! The strategies are interchangeable: for the same viewport and
//! budget they produce the same iteration count for every pixel, and
//! the scalar kernels serve as the oracle the others are tested
//! against.  The window, device polling, and display belong to the
//! embedding program; this crate consumes a per-frame
//! [`input::Controls`] snapshot and fills a [`frame::FrameBuffer`].

pub mod frame;
pub mod input;
pub mod iterate;
pub mod lanes;
pub mod partition;
pub mod pool;
pub mod region;
pub mod render;

pub use crate::region::{Pixel, Region, RegionError};
pub use crate::render::{Renderer, Strategy};
