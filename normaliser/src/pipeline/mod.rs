//! Fan-out/fan-in orchestration of a normalisation run.


use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use common::CyclicBarrier;

use crate::config::NormaliseConfig;
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::partition::{covered_rows, partition, reassemble, Chunk};
use crate::range::BrightnessRange;
use crate::worker::{self, EventCallback, SharedRanges, WorkerContext, WorkerEvent, WorkerOutput};

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct NormaliseOutput {
    pub grid: Grid,
    /// Brightness extrema over every processed row.
    pub global_range: BrightnessRange,
    /// Brightness extrema of each chunk, in chunk order.
    pub local_ranges: Vec<BrightnessRange>,
    /// Chunk whose worker completed the first rendezvous.
    pub leader: Option<usize>,
    /// Time between starting the first worker and joining the last one.
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct Normaliser {
    config: NormaliseConfig,
    events: EventCallback,
}

impl Normaliser {
    pub fn new(config: NormaliseConfig) -> Self {
        Self {
            config,
            events: EventCallback::default(),
        }
    }

    /// Builder method to observe worker phase transitions.
    ///
    /// The callback runs on the worker threads.
    pub fn on_event(mut self, f: Arc<dyn Fn(WorkerEvent) + Send + Sync>) -> Self {
        self.events = EventCallback::new(f);
        self
    }

    pub fn config(&self) -> &NormaliseConfig {
        &self.config
    }

    /// Runs one worker thread per chunk and stitches the results together.
    ///
    /// The chunk count is validated before any thread is started. No partial
    /// grid is returned if any worker fails.
    pub fn run(&self, grid: &Grid) -> Result<NormaliseOutput> {
        let chunk_count = self.config.chunk_count;
        self.config.validate(grid.height())?;

        let chunks = partition(grid, chunk_count, self.config.remainder)?;
        let dropped =
            grid.height() - covered_rows(grid.height(), chunk_count, self.config.remainder);
        if dropped > 0 {
            tracing::warn!(
                dropped,
                height = grid.height(),
                chunk_count,
                "height is not a multiple of the chunk count, trailing rows are left black"
            );
        }

        let barrier = CyclicBarrier::new(chunk_count)?;
        let ranges = SharedRanges::new(chunk_count);
        let ctx = WorkerContext {
            barrier: &barrier,
            ranges: &ranges,
            transform: self.config.transform,
            events: &self.events,
        };

        tracing::info!(
            chunk_count,
            transform = ?self.config.transform,
            "Using {} threads for image normalisation",
            chunk_count
        );

        let start = Instant::now();
        let outputs = run_workers(chunks, &ctx);
        let elapsed = start.elapsed();

        let outputs = match outputs {
            Ok(outputs) => outputs,
            Err(err) => {
                tracing::error!("normalisation aborted: {}", err);
                return Err(err);
            }
        };

        let global_range = outputs
            .first()
            .map(|out| out.global_range)
            .ok_or(Error::MissingRange { index: 0 })?;
        let leader = outputs
            .iter()
            .find(|out| out.was_leader)
            .map(|out| out.chunk.index());
        let local_ranges = outputs.iter().map(|out| out.local_range).collect();

        let grid = reassemble(
            grid.width(),
            grid.height(),
            outputs.into_iter().map(|out| out.chunk),
        )?;

        tracing::info!(
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            min = global_range.min,
            max = global_range.max,
            "normalisation done"
        );

        Ok(NormaliseOutput {
            grid,
            global_range,
            local_ranges,
            leader,
            elapsed,
        })
    }
}

/// Runs `config` over `grid` with no event observer.
pub fn normalise(grid: &Grid, config: NormaliseConfig) -> Result<NormaliseOutput> {
    Normaliser::new(config).run(grid)
}

/// Spawns one scoped thread per chunk and joins them in chunk order.
///
/// If a thread cannot be started, or a worker panics, the barrier is broken so
/// the remaining workers return instead of waiting for a party that never comes.
fn run_workers(chunks: Vec<Chunk>, ctx: &WorkerContext<'_>) -> Result<Vec<WorkerOutput>> {
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(chunks.len());
        let mut spawn_error = None;

        for chunk in chunks {
            let index = chunk.index();
            let spawned = thread::Builder::new()
                .name(format!("normaliser-{index}"))
                .spawn_scoped(scope, move || {
                    let result = panic::catch_unwind(AssertUnwindSafe(|| worker::run(chunk, ctx)));
                    result.unwrap_or_else(|_| {
                        ctx.barrier.break_barrier();
                        Err(Error::WorkerPanicked { index })
                    })
                });

            match spawned {
                Ok(handle) => handles.push((index, handle)),
                Err(source) => {
                    ctx.barrier.break_barrier();
                    spawn_error = Some(Error::WorkerSpawn { index, source });
                    break;
                }
            }
        }

        let results: Vec<Result<WorkerOutput>> = handles
            .into_iter()
            .map(|(index, handle)| {
                handle
                    .join()
                    .unwrap_or(Err(Error::WorkerPanicked { index }))
            })
            .collect();

        if let Some(err) = spawn_error {
            return Err(err);
        }

        first_root_error(results)
    })
}

/// Collects worker results, preferring the failure that broke the barrier over
/// the follow-up errors of the workers it released.
fn first_root_error(results: Vec<Result<WorkerOutput>>) -> Result<Vec<WorkerOutput>> {
    let mut outputs = Vec::with_capacity(results.len());
    let mut released = None;

    for result in results {
        match result {
            Ok(output) => outputs.push(output),
            Err(err @ Error::BarrierBroken { .. }) => {
                released.get_or_insert(err);
            }
            Err(err) => return Err(err),
        }
    }

    match released {
        Some(err) => Err(err),
        None => Ok(outputs),
    }
}
