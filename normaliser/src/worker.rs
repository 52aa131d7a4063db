//! One worker per chunk: reduce, rendezvous twice, transform.
//!
//! ```text
//! Idle -> LocalReduce -> Arrive1 -(leader)-> Aggregate -> Arrive2 -> Transform -> Done
//!                           \------(follower)------------^
//! ```
//!
//! Every path through [`run`] arrives at the barrier exactly twice, so a run
//! with one worker per barrier party cannot deadlock.

use std::sync::OnceLock;

use common::{CyclicBarrier, SharedFn};

use crate::error::{Error, Result};
use crate::partition::Chunk;
use crate::range::BrightnessRange;
use crate::transform::TransformKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    LocalReduce,
    Arrive1,
    Aggregate,
    Arrive2,
    Transform,
    Done,
}

/// Reported each time a worker enters a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerEvent {
    pub chunk: usize,
    pub phase: Phase,
}

pub type EventCallback = SharedFn<dyn Fn(WorkerEvent) + Send + Sync>;

/// Brightness ranges shared by the workers of one run.
///
/// Each slot is written once: a chunk range by its own worker before the
/// first arrival, the global range by the leader between the two arrivals.
#[derive(Debug)]
pub struct SharedRanges {
    local: Vec<OnceLock<BrightnessRange>>,
    global: OnceLock<BrightnessRange>,
}

impl SharedRanges {
    pub fn new(chunk_count: usize) -> Self {
        Self {
            local: (0..chunk_count).map(|_| OnceLock::new()).collect(),
            global: OnceLock::new(),
        }
    }

    pub fn local(&self, index: usize) -> Option<BrightnessRange> {
        self.local.get(index).and_then(|slot| slot.get().copied())
    }

    pub fn global(&self) -> Option<BrightnessRange> {
        self.global.get().copied()
    }

    fn publish_local(&self, index: usize, range: BrightnessRange) {
        if let Some(slot) = self.local.get(index) {
            let _ = slot.set(range);
        }
    }

    /// Reduces every chunk range into the global slot.
    ///
    /// Returns `None` without publishing if any chunk range is missing.
    fn aggregate(&self) -> Option<BrightnessRange> {
        let ranges: Option<Vec<BrightnessRange>> =
            self.local.iter().map(|slot| slot.get().copied()).collect();
        let global = BrightnessRange::aggregate(ranges?)?;
        let _ = self.global.set(global);
        Some(global)
    }
}

pub(crate) struct WorkerContext<'a> {
    pub barrier: &'a CyclicBarrier,
    pub ranges: &'a SharedRanges,
    pub transform: TransformKind,
    pub events: &'a EventCallback,
}

impl WorkerContext<'_> {
    fn enter(&self, chunk: usize, phase: Phase) {
        tracing::debug!(chunk, ?phase, "worker phase");
        if let Some(f) = self.events.as_ref() {
            f(WorkerEvent { chunk, phase });
        }
    }
}

#[derive(Debug)]
pub(crate) struct WorkerOutput {
    pub chunk: Chunk,
    pub local_range: BrightnessRange,
    pub global_range: BrightnessRange,
    pub was_leader: bool,
}

pub(crate) fn run(mut chunk: Chunk, ctx: &WorkerContext<'_>) -> Result<WorkerOutput> {
    let index = chunk.index();
    ctx.enter(index, Phase::Idle);

    ctx.enter(index, Phase::LocalReduce);
    let local_range = BrightnessRange::of_pixels(chunk.pixels());
    if let Some(range) = local_range {
        ctx.ranges.publish_local(index, range);
    }

    ctx.enter(index, Phase::Arrive1);
    let was_leader = ctx.barrier.arrive();
    if was_leader {
        ctx.enter(index, Phase::Aggregate);
        match ctx.ranges.aggregate() {
            Some(global) => tracing::debug!(
                chunk = index,
                min = global.min,
                max = global.max,
                "global range published"
            ),
            None => tracing::error!(chunk = index, "chunk range missing, nothing published"),
        }
    }

    ctx.enter(index, Phase::Arrive2);
    ctx.barrier.arrive();

    if ctx.barrier.is_broken() {
        return Err(Error::BarrierBroken { index });
    }
    let local_range = local_range.ok_or(Error::MissingRange { index })?;
    let global_range = ctx.ranges.global().ok_or(Error::MissingRange { index })?;

    ctx.enter(index, Phase::Transform);
    for px in chunk.pixels_mut() {
        *px = ctx.transform.apply(*px, index, local_range, global_range);
    }

    ctx.enter(index, Phase::Done);

    Ok(WorkerOutput {
        chunk,
        local_range,
        global_range,
        was_leader,
    })
}
