//! Per-tick state handed to renderers and loggers.
//!
//! Sinks are purely observational: they see a borrowed snapshot after each
//! tick and cannot feed anything back into the simulation.

use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::environment::AgentSlot;
use super::events::TickEvent;
use super::ground::Ground;
use super::obstacle::Obstacle;

/// Borrowed snapshot of an environment at the end of a tick.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Live agents.
    pub agents: &'a [AgentSlot],
    /// Live obstacles, left to right.
    pub obstacles: &'a [Obstacle],
    /// Ground strip state.
    pub ground: &'a Ground,
    /// Obstacles passed so far.
    pub score: u32,
    /// Generation being evaluated.
    pub generation: u32,
    /// Number of live agents.
    pub live_count: usize,
    /// Ticks completed in this generation.
    pub tick: u64,
    /// Events of this tick.
    pub events: &'a [TickEvent],
}

/// Receives one frame per tick.
pub trait TelemetrySink {
    /// Called after every completed tick.
    fn on_tick(&mut self, frame: &Frame<'_>);
}

impl<S: TelemetrySink + ?Sized> TelemetrySink for &mut S {
    fn on_tick(&mut self, frame: &Frame<'_>) {
        (**self).on_tick(frame);
    }
}

/// Discards every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn on_tick(&mut self, _frame: &Frame<'_>) {}
}

/// Emits frames as structured `tracing` records.
///
/// Events go out at `debug`, the per-tick summary at `trace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn on_tick(&mut self, frame: &Frame<'_>) {
        for event in frame.events {
            debug!(
                generation = frame.generation,
                tick = frame.tick,
                ?event,
                "tick event"
            );
        }
        trace!(
            generation = frame.generation,
            tick = frame.tick,
            score = frame.score,
            alive = frame.live_count,
            ground_x = frame.ground.x1,
            "frame"
        );
    }
}

/// Paces another sink to a fixed tick rate for live viewing.
///
/// Sleeps after each forwarded frame until one tick period has passed since
/// the previous frame. Simulation results are unaffected.
#[derive(Debug)]
pub struct RealtimeSink<S> {
    inner: S,
    period: Duration,
    last: Option<Instant>,
}

impl<S: TelemetrySink> RealtimeSink<S> {
    /// Wraps `inner`, releasing at most `tick_rate` frames per second.
    pub fn new(inner: S, tick_rate: u32) -> Self {
        Self {
            inner,
            period: Duration::from_secs(1) / tick_rate.max(1),
            last: None,
        }
    }
}

impl<S: TelemetrySink> TelemetrySink for RealtimeSink<S> {
    fn on_tick(&mut self, frame: &Frame<'_>) {
        self.inner.on_tick(frame);
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.period {
                thread::sleep(self.period - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }
}
