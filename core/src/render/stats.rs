//! Draw call statistics.
//!
//! Every render call tallies how many primitives, vertices, and fragments
//! entered the pipeline and how many survived clipping, culling, and the
//! per-pixel tests, plus the wall-clock time spent when `std` is enabled.
//! The per-call stats accumulate in the [`Context`][super::Context] so an
//! application can print a running report.

use alloc::{format, string::String};
use core::fmt::{self, Display, Formatter};
use core::ops::AddAssign;
use core::time::Duration;
#[cfg(feature = "std")]
use std::time::Instant;

/// Accumulated pipeline throughput counters.
#[derive(Clone, Debug, Default)]
pub struct Stats {
    /// Time spent rendering.
    pub time: Duration,
    /// Number of render calls issued.
    pub calls: f32,

    /// Triangles and lines submitted and drawn.
    pub prims: Throughput,
    /// Vertices submitted and emitted past clipping.
    pub verts: Throughput,
    /// Fragments rasterized and written to the target.
    pub frags: Throughput,

    #[cfg(feature = "std")]
    start: Option<Instant>,
}

/// An input/output item count pair.
///
/// The ratio `o / i` tells how large a share of submitted work survived
/// culling, clipping, and the depth and stencil tests.
#[derive(Copy, Clone, Debug, Default)]
pub struct Throughput {
    /// Count of items submitted for rendering.
    pub i: usize,
    /// Count of items output to the render target.
    pub o: usize,
}

impl Stats {
    /// Creates a new zeroed `Stats` instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `Stats` instance that records the time of its creation.
    ///
    /// Call [`finish`][Self::finish] to write the elapsed time to
    /// `self.time`. Equivalent to [`Stats::new`] if the `std` feature is
    /// not enabled.
    pub fn start() -> Self {
        Self {
            #[cfg(feature = "std")]
            start: Some(Instant::now()),
            ..Self::default()
        }
    }

    /// Stops the timer and records the elapsed time to `self.time`.
    ///
    /// No-op if the timer was not running, or if the `std` feature is
    /// not enabled.
    pub fn finish(self) -> Self {
        Self {
            #[cfg(feature = "std")]
            time: self.start.map(|st| st.elapsed()).unwrap_or(self.time),
            ..self
        }
    }

    /// Returns the average throughput in items per second.
    pub fn per_sec(&self) -> Self {
        let secs = if self.time.is_zero() {
            1.0
        } else {
            self.time.as_secs_f32()
        };
        let [prims, verts, frags] =
            self.throughput().map(|stat| stat.per_sec(secs));
        Self {
            calls: self.calls / secs,
            time: Duration::from_secs(1),
            prims,
            verts,
            frags,
            #[cfg(feature = "std")]
            start: None,
        }
    }

    fn throughput(&self) -> [Throughput; 3] {
        [self.prims, self.verts, self.frags]
    }

    fn throughput_mut(&mut self) -> [&mut Throughput; 3] {
        let Self { prims, verts, frags, .. } = self;
        [prims, verts, frags]
    }
}

impl Throughput {
    fn per_sec(&self, secs: f32) -> Self {
        Self {
            i: (self.i as f32 / secs) as usize,
            o: (self.o as f32 / secs) as usize,
        }
    }
}

impl Display for Stats {
    #[inline(never)]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let w = f.width().unwrap_or(16);
        let per_s = self.per_sec();

        writeln!(f, " STATS  {:>w$} │ {:>w$}", "TOTAL", "PER SEC")?;
        writeln!(f, " ───────{e:─>w$}─┼─{e:─>w$}─", e = "")?;
        writeln!(f, " time   {:>w$} │ {e:>w$}", human_time(self.time), e = "")?;
        writeln!(f, " calls  {:>w$} │ {:>w$.1}", self.calls, per_s.calls)?;

        for (lbl, i) in [("prims", 0), ("verts", 1), ("frags", 2)] {
            let [tot, ps] = [self, &per_s].map(|s| s.throughput()[i]);
            if f.alternate() {
                writeln!(f, " {lbl:6} {tot:#w$} │ {ps:#w$}")?;
            } else {
                writeln!(f, " {lbl:6} {tot:w$} │ {ps:w$}")?;
            }
        }
        Ok(())
    }
}

impl Display for Throughput {
    #[inline(never)]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let &Self { i, o } = self;
        let w = f.width().unwrap_or(10);
        if f.alternate() {
            // Survival percentage rather than raw counts
            if i == 0 {
                write!(f, "{:>w$}", "--")
            } else {
                let pct = 100.0 * o as f32 / i as f32;
                write!(f, "{pct:>w$.1}%", w = w - 1)
            }
        } else {
            let io = format!("{} / {}", human_num(i), human_num(o));
            write!(f, "{io:>w$}")
        }
    }
}

impl AddAssign for Stats {
    /// Appends the stats of `other` to `self`.
    fn add_assign(&mut self, other: Self) {
        self.time += other.time;
        self.calls += other.calls;
        for i in 0..3 {
            *self.throughput_mut()[i] += other.throughput()[i];
        }
    }
}

impl AddAssign for Throughput {
    fn add_assign(&mut self, rhs: Self) {
        self.i += rhs.i;
        self.o += rhs.o;
    }
}

#[inline(never)]
fn human_num(n: usize) -> String {
    match n as u64 {
        0..=999 => format!("{n:5}"),
        1_000..=99_999 => format!("{:4.1}k", n as f32 / 1e3),
        100_000..=999_999 => format!("{:4}k", n / 1_000),
        1_000_000..=99_999_999 => format!("{:4.1}M", n as f32 / 1e6),
        100_000_000..=999_999_999 => format!("{:4}M", n / 1_000_000),
        1_000_000_000..=99_999_999_999 => format!("{:4.1}G", n as f32 / 1e9),
        _ => format!("{n:5.1e}"),
    }
}

#[inline(never)]
fn human_time(d: Duration) -> String {
    let secs = d.as_secs_f32();
    match secs {
        s if s < 1e-3 => format!("{:4.1}μs", s * 1e6),
        s if s < 1.0 => format!("{:4.1}ms", s * 1e3),
        s if s < 60.0 => format!("{s:.1}s"),
        s => format!("{:.0}min {:02.0}s", s / 60.0, s % 60.0),
    }
}
