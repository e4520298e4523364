//! Frame driver and game lifecycle
//!
//! The page calls into the driver from two places: the animation frame
//! callback and the fire timer. They never overlap, but their relative
//! order is arbitrary, so nothing here assumes a fixed interleaving. The
//! restart countdown is paced by frame timestamps from the moment the run
//! ends.

use crate::highscores::HighScoreStore;
use crate::sim::{
    GameEvent, GamePhase, GameState, InputAction, Playfield, apply_input, fire, tick,
};
use crate::snapshot::{Scoreboard, Snapshot};
use crate::tuning::Tuning;

/// Lifecycle as seen from outside the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Waiting for the start button, background only
    Idle,
    Running,
    /// Frozen; restarts on its own when the countdown reaches zero
    GameOver { countdown: u32 },
}

/// Turns wall-clock frame timestamps into delta multipliers
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    reference_ms: f64,
    max_delta: f32,
}

impl FrameClock {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            last_ms: None,
            reference_ms: tuning.reference_frame_ms(),
            max_delta: tuning.max_delta,
        }
    }

    /// Forget the previous frame so the next delta is measured from `now_ms`
    pub fn reset(&mut self, now_ms: f64) {
        self.last_ms = Some(now_ms);
    }

    /// Frame duration in reference frames, clamped to `[0, max_delta]`.
    /// The very first frame counts as exactly one reference frame.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let delta = match self.last_ms {
            Some(last) => ((now_ms - last) / self.reference_ms) as f32,
            None => 1.0,
        };
        self.last_ms = Some(now_ms);
        delta.clamp(0.0, self.max_delta)
    }
}

/// Converts elapsed wall-clock time into a count of due timer ticks
#[derive(Debug, Clone)]
pub struct FixedInterval {
    period_ms: f64,
    next_due_ms: Option<f64>,
}

impl FixedInterval {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            next_due_ms: None,
        }
    }

    /// Number of ticks that fell due up to `now_ms`. The first call only
    /// arms the timer.
    pub fn due(&mut self, now_ms: f64) -> u32 {
        let Some(mut next) = self.next_due_ms else {
            self.next_due_ms = Some(now_ms + self.period_ms);
            return 0;
        };
        let mut count = 0;
        while now_ms >= next {
            count += 1;
            next += self.period_ms;
        }
        self.next_due_ms = Some(next);
        count
    }
}

/// Owns one session and everything that feeds it
pub struct FrameDriver {
    state: GameState,
    high_scores: HighScoreStore,
    clock: FrameClock,
    pending: Vec<InputAction>,
    countdown: Option<u32>,
    /// One-second ticks of the countdown, armed on the game-over frame
    countdown_timer: Option<FixedInterval>,
}

impl FrameDriver {
    /// Build an idle session and seed the best score from storage.
    /// Tuning that fails validation is replaced by the defaults.
    pub fn new(field: Playfield, tuning: Tuning, seed: u64, high_scores: HighScoreStore) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(err) => {
                log::warn!("Ignoring invalid tuning: {}", err);
                Tuning::default()
            }
        };
        let clock = FrameClock::new(&tuning);
        let mut state = GameState::new(field, tuning, seed);
        state.ledger.set_high_score(high_scores.load());
        log::info!("Session created with seed {}", seed);
        Self {
            state,
            high_scores,
            clock,
            pending: Vec::new(),
            countdown: None,
            countdown_timer: None,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match self.state.phase {
            GamePhase::Idle => Lifecycle::Idle,
            GamePhase::Running => Lifecycle::Running,
            GamePhase::GameOver => Lifecycle::GameOver {
                countdown: self.countdown.unwrap_or(0),
            },
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn high_scores(&self) -> &HighScoreStore {
        &self.high_scores
    }

    pub fn scoreboard(&self) -> Scoreboard {
        Scoreboard::from_ledger(&self.state.ledger)
    }

    /// Idle -> Running. Returns false if a run is already underway or over.
    pub fn start(&mut self, now_ms: f64) -> bool {
        if self.state.phase != GamePhase::Idle {
            return false;
        }
        self.state.phase = GamePhase::Running;
        self.clock.reset(now_ms);
        self.pending.clear();
        log::info!("Run started");
        true
    }

    /// Reset the session and begin a fresh run immediately
    pub fn restart(&mut self, now_ms: f64) {
        self.reset_session();
        self.start(now_ms);
    }

    /// Back to Idle. A score banked by the reset is written to storage too.
    fn reset_session(&mut self) {
        let best = self.state.ledger.high_score();
        self.state.reset();
        self.countdown = None;
        self.countdown_timer = None;
        let new_best = self.state.ledger.high_score();
        if new_best > best {
            self.high_scores.save(new_best);
        }
    }

    /// Queue an impulse for the next frame. Dropped unless running.
    pub fn push_input(&mut self, action: InputAction) {
        if self.state.phase == GamePhase::Running {
            self.pending.push(action);
        }
    }

    /// Animation frame callback. Also runs the restart countdown, measured
    /// from the frame on which the run ended.
    pub fn on_frame(&mut self, now_ms: f64) -> Snapshot {
        let delta = self.clock.delta(now_ms);
        match self.state.phase {
            GamePhase::Running => {
                for action in self.pending.drain(..) {
                    apply_input(&mut self.state, action);
                }
                tick(&mut self.state, delta);
            }
            GamePhase::GameOver => {
                self.pending.clear();
                self.advance_countdown(now_ms);
            }
            GamePhase::Idle => self.pending.clear(),
        }
        self.process_events();
        if self.countdown.is_some() && self.countdown_timer.is_none() {
            let mut timer = FixedInterval::new(1000.0);
            timer.due(now_ms);
            self.countdown_timer = Some(timer);
        }
        Snapshot::capture(&self.state, self.countdown)
    }

    fn advance_countdown(&mut self, now_ms: f64) {
        let due = match self.countdown_timer.as_mut() {
            Some(timer) => timer.due(now_ms),
            None => return,
        };
        for _ in 0..due {
            if self.on_countdown_timer().is_none_or(|left| left == 0) {
                break;
            }
        }
    }

    /// Fire timer callback. Returns whether a bullet left the ship.
    pub fn on_fire_timer(&mut self) -> bool {
        let fired = fire(&mut self.state);
        self.process_events();
        fired
    }

    /// One countdown second. Returns the seconds left, or `None` when no
    /// countdown is running. At zero the session resets to Idle.
    pub fn on_countdown_timer(&mut self) -> Option<u32> {
        let remaining = self.countdown?.saturating_sub(1);
        if remaining == 0 {
            self.reset_session();
            log::info!("Countdown finished, back to the start screen");
        } else {
            self.countdown = Some(remaining);
        }
        Some(remaining)
    }

    fn process_events(&mut self) {
        for event in self.state.drain_events() {
            if let GameEvent::GameOver {
                new_high_score,
                score,
                ..
            } = event
            {
                if new_high_score {
                    self.high_scores.save(score);
                }
                self.countdown = Some(self.state.tuning.restart_countdown_secs);
            }
        }
    }
}
