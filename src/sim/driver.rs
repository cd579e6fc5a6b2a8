//! Frame driver
//!
//! The host (browser `requestAnimationFrame`, or a test) calls [`SimLoop::frame`]
//! once per animation frame while [`SimLoop::is_running`] is true. The loop
//! stops itself once the table is at rest and no scratch is pending, and
//! `shoot`/`init_rack` start it again.

use super::state::{Session, Snapshot};
use super::step::step;
use crate::tuning::Tuning;

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Snapshot observer
pub type Observer = Box<dyn FnMut(&Snapshot)>;

/// Owns the session and drives it one frame at a time
pub struct SimLoop {
    session: Session,
    running: bool,
    observers: Vec<Observer>,
    frames: u64,
}

impl SimLoop {
    /// New loop with a freshly racked table, ready to run
    pub fn new(tuning: Tuning) -> Self {
        Self {
            session: Session::racked(tuning),
            running: true,
            observers: Vec::new(),
            frames: 0,
        }
    }

    /// Register a snapshot observer (called once per frame)
    pub fn subscribe(&mut self, observer: impl FnMut(&Snapshot) + 'static) {
        self.observers.push(Box::new(observer));
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable access for tools and tests that stage custom layouts
    #[inline]
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Frames stepped since the loop was created
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Current state as a read-only copy
    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }

    /// Replace the session with a fresh rack and start the loop.
    ///
    /// Pending respawns of the old session are cancelled so they can't
    /// resurrect a ball into the new one.
    pub fn init_rack(&mut self) {
        self.session.cancel_respawns();
        let tuning = self.session.tuning;
        let clock_ms = self.session.clock_ms;
        self.session = Session::racked(tuning);
        // Keep the host clock so new timers are scheduled against it
        self.session.clock_ms = clock_ms;
        self.start();
    }

    /// Fire the cue ball. No-op (returns false) while it is potted.
    pub fn shoot(&mut self, power: f32, angle: f32) -> bool {
        let fired = self.session.shoot(power, angle);
        if fired {
            self.start();
        }
        fired
    }

    /// Stop scheduling and drop pending timers (owning view torn down)
    pub fn shutdown(&mut self) {
        self.session.cancel_respawns();
        if self.running {
            log::info!("Simulation loop shut down after {} frames", self.frames);
        }
        self.running = false;
    }

    /// Run one frame at host time `now_ms`: fire due respawns, step the
    /// physics and publish the result.
    pub fn frame(&mut self, now_ms: f64) -> LoopControl {
        if now_ms > self.session.clock_ms {
            self.session.clock_ms = now_ms;
        }

        let respawned = self.session.fire_due_respawns() > 0;
        let moving = step(&mut self.session) || respawned;
        self.frames += 1;

        let snapshot = self.session.snapshot();
        for observer in &mut self.observers {
            observer(&snapshot);
        }

        if moving || !self.session.respawns.is_empty() {
            self.running = true;
            LoopControl::Continue
        } else {
            if self.running {
                log::debug!("Table at rest after {} frames, loop idle", self.frames);
            }
            self.running = false;
            LoopControl::Stop
        }
    }

    fn start(&mut self) {
        if !self.running {
            log::debug!("Simulation loop started");
        }
        self.running = true;
    }
}
