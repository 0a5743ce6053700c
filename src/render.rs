//! Strategy selection and per-frame dispatch.
//!
//! A [`Renderer`] owns the output buffer and the worker pool for the
//! lifetime of the program; every frame it recomputes the whole buffer
//! under the currently selected [`Strategy`].  The three parallel
//! paths all partition the frame into vertical strips and run the lane
//! kernel over each strip; they differ only in where the strips run.

use std::fmt;
use std::sync::Arc;

use crate::frame::{FrameBuffer, FrameStrip, Rgb};
use crate::iterate;
use crate::lanes;
use crate::partition::split_columns;
use crate::pool::WorkerPool;
use crate::region::Region;

/// The selectable ways to compute a frame, in selector order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Scalar kernel, fresh affine mapping for every pixel.
    Direct,
    /// Scalar kernel, `c` accumulated across the scan.
    Stepped,
    /// Scalar kernel, accumulated `c` and hand-written real/imaginary
    /// arithmetic.
    Manual,
    /// The four-lane vector kernel on the calling thread.
    Lanes,
    /// The vector kernel over strips, on threads spawned and joined
    /// every frame.
    Threads,
    /// The vector kernel over strips, on the persistent worker pool.
    Pool,
}

impl Strategy {
    /// All strategies, indexed by their selector number.
    pub const ALL: [Strategy; 6] = [
        Strategy::Direct,
        Strategy::Stepped,
        Strategy::Manual,
        Strategy::Lanes,
        Strategy::Threads,
        Strategy::Pool,
    ];

    /// The strategy behind selector `index`, if it names one.
    pub fn from_index(index: usize) -> Option<Strategy> {
        Strategy::ALL.get(index).copied()
    }

    /// This strategy's selector number.
    pub fn index(self) -> usize {
        Strategy::ALL
            .iter()
            .position(|&s| s == self)
            .expect("strategy missing from ALL")
    }

    /// Short label for the frame readout.
    pub fn label(self) -> &'static str {
        match self {
            Strategy::Direct => "direct scalar",
            Strategy::Stepped => "stepped scalar",
            Strategy::Manual => "manual scalar",
            Strategy::Lanes => "simd lanes",
            Strategy::Threads => "scoped threads",
            Strategy::Pool => "worker pool",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Owns the frame buffer and the worker pool, and renders one frame at
/// a time.
pub struct Renderer {
    buffer: Arc<FrameBuffer>,
    pool: WorkerPool,
    strips: usize,
}

impl Renderer {
    /// A renderer for `width` by `height` frames, partitioning
    /// parallel frames into `strips` strips and keeping that many
    /// pool workers.
    pub fn new(width: usize, height: usize, strips: usize) -> Renderer {
        Renderer {
            buffer: Arc::new(FrameBuffer::new(width, height)),
            pool: WorkerPool::new(strips),
            strips,
        }
    }

    /// Frame width in pixels.
    pub fn width(&self) -> usize {
        self.buffer.width()
    }

    /// Frame height in pixels.
    pub fn height(&self) -> usize {
        self.buffer.height()
    }

    /// Recompute every pixel of `region` into the frame buffer.  The
    /// call returns only once the whole frame is written; parallel
    /// strategies end with a completion barrier.
    pub fn render(&self, strategy: Strategy, region: &Region, budget: u32) {
        match strategy {
            Strategy::Direct => self.whole_frame(iterate::render_direct, region, budget),
            Strategy::Stepped => self.whole_frame(iterate::render_stepped, region, budget),
            Strategy::Manual => self.whole_frame(iterate::render_manual, region, budget),
            Strategy::Lanes => self.whole_frame(lanes::render_lanes, region, budget),
            Strategy::Threads => self.scoped_threads(region, budget),
            Strategy::Pool => self.pooled(region, budget),
        }
    }

    fn whole_frame(
        &self,
        kernel: fn(&Region, u32, &mut FrameStrip<'_>),
        region: &Region,
        budget: u32,
    ) {
        // The frame's sole strip.
        let mut strip = unsafe { self.buffer.strip(region.pixel_tl.0..region.pixel_br.0) };
        kernel(region, budget, &mut strip);
    }

    fn scoped_threads(&self, region: &Region, budget: u32) {
        let strips = split_columns(region, self.strips);
        crossbeam::scope(|spawner| {
            for sub in strips {
                let buffer = &self.buffer;
                spawner.spawn(move |_| {
                    // Strips are disjoint by construction of the
                    // partitioner.
                    let mut strip = unsafe { buffer.strip(sub.pixel_tl.0..sub.pixel_br.0) };
                    lanes::render_lanes(&sub, budget, &mut strip);
                });
            }
        })
        .unwrap();
    }

    fn pooled(&self, region: &Region, budget: u32) {
        for sub in split_columns(region, self.strips) {
            let buffer = Arc::clone(&self.buffer);
            self.pool.enqueue(move || {
                let mut strip = unsafe { buffer.strip(sub.pixel_tl.0..sub.pixel_br.0) };
                lanes::render_lanes(&sub, budget, &mut strip);
            });
        }
        self.pool.wait_idle();
    }

    /// Copy of the last rendered frame.
    pub fn snapshot(&mut self) -> Vec<Rgb> {
        self.buffer_mut().snapshot()
    }

    /// The last rendered frame as flat RGB bytes for encoding.
    pub fn raw_rgb(&mut self) -> Vec<u8> {
        self.buffer_mut().raw_rgb()
    }

    fn buffer_mut(&mut self) -> &mut FrameBuffer {
        // After render() returns every worker has dropped its handle
        // on the buffer: pooled tasks are consumed before they are
        // counted finished, and scoped threads are joined.
        Arc::get_mut(&mut self.buffer).expect("a render is still in flight")
    }
}
