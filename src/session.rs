//! Round lifecycle and scoring
//!
//! The session owns the simulation and is the only place that moves between
//! phases, runs the countdown and hands out points. The shell drives it from
//! two independent cooperative timers:
//! - the display frame callback calls [`Session::frame`]
//! - a one second interval calls [`Session::on_timer_second`]
//!
//! Neither blocks the other. Pausing stops gameplay in both.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::history::ScoreHistory;
use crate::settings::Settings;
use crate::sim::{SimState, Tier, TickInput, TickOutcome, celebrate_goal, tick};

/// Round phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for Start
    #[default]
    Idle,
    /// Clock running, physics live
    Running,
    /// Clock and physics frozen
    Paused,
    /// Time ran out; board stays live but scores nothing
    RoundEnded,
}

/// Notifications for the UI shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    ScoreChanged(u32),
    TimeLeftChanged(u32),
    RoundEnded { total_score: u64, timestamp: f64 },
    /// Puck reached the goal and points were awarded
    Win,
    /// Magnet pull started or stopped (drives the hum)
    AttractionChanged(bool),
}

pub struct Session {
    pub sim: SimState,
    phase: Phase,
    score: u32,
    total_score: u64,
    time_left: u32,
    time_up: bool,
    /// Timestamp (ms) when the TIME'S UP banner hides
    banner_until: Option<f64>,
    history: ScoreHistory,
    input: TickInput,
    attraction_active: bool,
    /// Wall-clock seconds not yet turned into timer ticks
    clock_accumulator: f32,
    events: Vec<SessionEvent>,
}

impl Session {
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        Self {
            sim: SimState::new(width, height, seed),
            phase: Phase::Idle,
            score: 0,
            total_score: 0,
            time_left: ROUND_SECONDS,
            time_up: false,
            banner_until: None,
            history: ScoreHistory::new(),
            input: TickInput::default(),
            attraction_active: false,
            clock_accumulator: 0.0,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total_score(&self) -> u64 {
        self.total_score
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_time_up(&self) -> bool {
        self.time_up
    }

    pub fn history(&self) -> &ScoreHistory {
        &self.history
    }

    pub fn attraction_active(&self) -> bool {
        self.attraction_active
    }

    /// TIME'S UP banner should be on screen at `now` (ms)
    pub fn banner_visible(&self, now: f64) -> bool {
        self.banner_until.is_some_and(|until| now < until)
    }

    /// Take all pending notifications
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // === Input adapter ===

    /// Pointer moved (surface-local coordinates)
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.input.pointer = Some(Vec2::new(x, y));
    }

    pub fn set_pointer_down(&mut self, down: bool) {
        self.input.pointer_down = down;
    }

    /// Flip magnet polarity. Ignored unless a round is running.
    pub fn flip_polarity(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        self.sim.magnet.flip_polarity();
        log::debug!("Polarity flipped to {:?}", self.sim.magnet.polarity);
        true
    }

    /// Pick a magnet size; allowed at any time
    pub fn select_tier(&mut self, tier: Tier) {
        self.sim.set_tier(tier);
        log::info!("Magnet tier: {}", tier.as_str());
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.sim.resize(width, height);
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sim.particles.set_cap(settings.max_particles());
        self.sim.falloff = settings.falloff;
    }

    // === Lifecycle ===

    /// Begin a round. No-op while one is already running or paused.
    pub fn start(&mut self) -> bool {
        match self.phase {
            Phase::Running | Phase::Paused => return false,
            Phase::RoundEnded => {
                self.time_left = ROUND_SECONDS;
                self.events.push(SessionEvent::TimeLeftChanged(self.time_left));
            }
            Phase::Idle => {}
        }

        self.time_up = false;
        self.banner_until = None;
        self.clock_accumulator = 0.0;
        self.sim.particles.clear();
        let tier = self.sim.magnet.tier;
        self.sim.set_tier(tier);
        self.phase = Phase::Running;
        log::info!("Round started ({}s)", self.time_left);
        true
    }

    /// Freeze the round. Idempotent.
    pub fn pause(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        self.phase = Phase::Paused;
        self.set_attraction(false);
        log::info!("Paused with {}s left", self.time_left);
        true
    }

    /// Unfreeze the round. Idempotent.
    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused {
            return false;
        }
        self.phase = Phase::Running;
        log::info!("Resumed");
        true
    }

    /// Pause button behaviour
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            Phase::Running => self.pause(),
            Phase::Paused => self.resume(),
            _ => false,
        }
    }

    /// Bank the current score and immediately start a fresh round
    pub fn restart(&mut self) {
        self.total_score += u64::from(self.score);
        self.score = 0;
        self.time_left = ROUND_SECONDS;
        self.time_up = false;
        self.banner_until = None;
        self.set_attraction(false);

        let (w, h) = (self.sim.field.width, self.sim.field.height);
        self.sim.resize(w, h);
        self.sim.reset_positions();

        self.events.push(SessionEvent::ScoreChanged(0));
        self.events.push(SessionEvent::TimeLeftChanged(self.time_left));
        log::info!("Restart, total score {}", self.total_score);

        self.phase = Phase::Idle;
        self.start();
    }

    /// One wall-clock second elapsed (interval callback)
    pub fn on_timer_second(&mut self, now: f64) {
        if self.phase != Phase::Running || self.time_up {
            return;
        }
        self.time_left = self.time_left.saturating_sub(1);
        self.events.push(SessionEvent::TimeLeftChanged(self.time_left));
        if self.time_left == 0 {
            self.end_round(now);
        }
    }

    /// Feed elapsed wall-clock time; fires one timer tick per whole second
    pub fn advance_clock(&mut self, dt: f32, now: f64) {
        if self.phase != Phase::Running {
            return;
        }
        self.clock_accumulator += dt.max(0.0);
        while self.clock_accumulator >= 1.0 && self.phase == Phase::Running {
            self.clock_accumulator -= 1.0;
            self.on_timer_second(now);
        }
    }

    /// Time is up: bank the score and log the round in history
    pub fn end_round(&mut self, now: f64) {
        self.time_up = true;
        self.phase = Phase::RoundEnded;
        self.total_score += u64::from(self.score);
        self.history.record(self.total_score, now);
        self.score = 0;
        self.banner_until = Some(now + BANNER_DURATION_MS);
        self.set_attraction(false);

        self.events.push(SessionEvent::RoundEnded {
            total_score: self.total_score,
            timestamp: now,
        });
        self.events.push(SessionEvent::ScoreChanged(0));
        log::info!("Time's up! Total score {}", self.total_score);
    }

    // === Frame ===

    /// Advance physics by one display frame
    ///
    /// Returns `None` when gameplay is frozen (idle or paused).
    pub fn frame(&mut self) -> Option<TickOutcome> {
        if !matches!(self.phase, Phase::Running | Phase::RoundEnded) {
            return None;
        }

        let outcome = tick(&mut self.sim, &self.input);
        self.input.pointer = None;

        self.set_attraction(outcome.in_range);
        if outcome.goal_reached {
            self.handle_win();
        }
        Some(outcome)
    }

    fn handle_win(&mut self) {
        if self.time_up {
            return;
        }
        self.score += WIN_POINTS;
        celebrate_goal(&mut self.sim);
        self.events.push(SessionEvent::ScoreChanged(self.score));
        self.events.push(SessionEvent::Win);
        log::info!("Goal! Score {}", self.score);
    }

    fn set_attraction(&mut self, active: bool) {
        if self.attraction_active != active {
            self.attraction_active = active;
            self.events.push(SessionEvent::AttractionChanged(active));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Polarity;

    fn session() -> Session {
        Session::new(1000.0, 600.0, 12345)
    }

    #[test]
    fn test_start_runs_round() {
        let mut s = session();
        assert_eq!(s.phase(), Phase::Idle);
        assert!(s.frame().is_none());
        assert!(s.start());
        assert_eq!(s.phase(), Phase::Running);
        assert!(!s.start(), "second start is ignored");
        assert!(s.frame().is_some());
    }

    #[test]
    fn test_pause_idempotent() {
        let mut once = session();
        once.start();
        once.pause();

        let mut twice = session();
        twice.start();
        twice.pause();
        assert!(!twice.pause());

        assert_eq!(once.phase(), twice.phase());
        assert_eq!(once.time_left(), twice.time_left());
        assert_eq!(once.drain_events(), twice.drain_events());
    }

    #[test]
    fn test_paused_freezes_timer_and_physics() {
        let mut s = session();
        s.start();
        s.sim.magnet.pos = Vec2::new(200.0, 300.0);
        s.pause();
        s.on_timer_second(0.0);
        assert_eq!(s.time_left(), ROUND_SECONDS);
        let before = s.sim.mover.pos;
        assert!(s.frame().is_none());
        assert_eq!(s.sim.mover.pos, before);

        s.resume();
        s.on_timer_second(1000.0);
        assert_eq!(s.time_left(), ROUND_SECONDS - 1);
    }

    #[test]
    fn test_flip_only_while_running() {
        let mut s = session();
        assert!(!s.flip_polarity());
        s.start();
        assert!(s.flip_polarity());
        assert_eq!(s.sim.magnet.polarity, Polarity::South);
        s.pause();
        assert!(!s.flip_polarity());
        assert_eq!(s.sim.magnet.polarity, Polarity::South);
    }

    #[test]
    fn test_timer_ends_round_and_floors_at_zero() {
        let mut s = session();
        s.start();
        for i in 0..ROUND_SECONDS + 5 {
            s.on_timer_second(f64::from(i) * 1000.0);
        }
        assert_eq!(s.time_left(), 0);
        assert!(s.is_time_up());
        assert_eq!(s.phase(), Phase::RoundEnded);
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn test_end_round_banks_score() {
        let mut s = session();
        s.start();
        s.score = 300;
        s.total_score = 150;
        s.end_round(0.0);

        assert_eq!(s.total_score(), 450);
        assert_eq!(s.score(), 0);
        let latest = s.history().latest().map(|e| e.label());
        assert_eq!(latest.as_deref(), Some("00:00 — Total Score: 450"));

        for _ in 0..10 {
            s.end_round(0.0);
        }
        assert_eq!(s.history().len(), 10);
    }

    #[test]
    fn test_banner_hides_after_five_seconds() {
        let mut s = session();
        s.start();
        s.end_round(10_000.0);
        assert!(s.banner_visible(14_999.0));
        assert!(!s.banner_visible(15_000.0));
    }

    #[test]
    fn test_win_awards_once() {
        let mut s = session();
        s.start();
        s.sim.mover.pos = s.sim.goal.pos;
        s.frame();
        s.frame();
        assert_eq!(s.score(), WIN_POINTS);
        let wins = s
            .drain_events()
            .into_iter()
            .filter(|e| *e == SessionEvent::Win)
            .count();
        assert_eq!(wins, 1);
    }

    #[test]
    fn test_no_score_after_time_up() {
        let mut s = session();
        s.start();
        s.end_round(0.0);
        s.sim.mover.pos = s.sim.goal.pos;
        let outcome = s.frame();
        assert_eq!(outcome.map(|o| o.goal_reached), Some(true));
        assert_eq!(s.score(), 0);
        assert_eq!(s.total_score(), 0);
    }

    #[test]
    fn test_restart_folds_score() {
        let mut s = session();
        s.start();
        s.score = 200;
        s.on_timer_second(0.0);
        s.restart();
        assert_eq!(s.total_score(), 200);
        assert_eq!(s.score(), 0);
        assert_eq!(s.time_left(), ROUND_SECONDS);
        assert_eq!(s.phase(), Phase::Running);
    }

    #[test]
    fn test_restart_relays_out_field() {
        let mut s = session();
        s.start();
        s.sim.mover.pos = Vec2::new(700.0, 100.0);
        s.sim.mover.vel = Vec2::new(3.0, 3.0);
        let amplitudes: Vec<f32> = s.sim.waves.waves.iter().map(|w| w.amplitude).collect();

        s.restart();
        assert_eq!(s.sim.mover.pos, Vec2::new(300.0, 300.0));
        assert_eq!(s.sim.mover.vel, Vec2::ZERO);
        assert_eq!(s.sim.magnet.pos, Vec2::new(120.0, 300.0));
        let after: Vec<f32> = s.sim.waves.waves.iter().map(|w| w.amplitude).collect();
        assert_ne!(after, amplitudes, "waves are re-rolled");
    }

    #[test]
    fn test_start_after_round_end_refills_clock() {
        let mut s = session();
        s.start();
        s.end_round(0.0);
        assert!(s.start());
        assert_eq!(s.time_left(), ROUND_SECONDS);
        assert!(!s.is_time_up());
    }

    #[test]
    fn test_advance_clock_accumulates() {
        let mut s = session();
        s.start();
        s.advance_clock(0.6, 0.0);
        assert_eq!(s.time_left(), ROUND_SECONDS);
        s.advance_clock(0.6, 0.0);
        assert_eq!(s.time_left(), ROUND_SECONDS - 1);
        s.advance_clock(2.5, 0.0);
        assert_eq!(s.time_left(), ROUND_SECONDS - 3);
    }

    #[test]
    fn test_pause_silences_attraction() {
        let mut s = session();
        s.start();
        s.sim.magnet.pos = Vec2::new(200.0, 300.0);
        s.frame();
        assert!(s.attraction_active());
        s.pause();
        assert!(!s.attraction_active());
        let events = s.drain_events();
        assert_eq!(events.last(), Some(&SessionEvent::AttractionChanged(false)));
    }
}
