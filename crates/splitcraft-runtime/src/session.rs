#![forbid(unsafe_code)]

//! The puzzle session: one level, its target line, and the pane layout.
//!
//! # State machine
//!
//! ```text
//!            line covered                delay elapsed
//!  Playing ───────────────▶ Advancing ─────────────────▶ Playing (level + 1)
//!     ▲                        │
//!     └──── split / delete ────┘   (cancel, re-evaluate, maybe reschedule)
//!
//!  any ── suspend ──▶ Suspended ── resume ──▶ Playing (re-evaluated)
//!  any ── dispose ──▶ Disposed
//! ```
//!
//! Time is always passed in. The session never reads a clock, so a host can
//! drive it either by polling [`Session::tick`] from its frame loop or by
//! arming a timer from the [`AdvanceTicket`] returned when an advance is
//! scheduled and calling [`Session::fire`] when it expires.
//!
//! Only geometry changes reset a pending advance. Moving focus leaves the
//! layout's boundaries untouched, so it neither cancels nor reschedules.

use serde::Serialize;
use splitcraft_core::{Command, KeyEvent, Orientation, Rect};
use splitcraft_layout::{LineCoverage, PaneId, PaneLayout, is_line_covered, line_coverage};
use tracing::{debug, debug_span, info};
use web_time::{Duration, Instant};

use crate::cancellation::{CancellationSource, CancellationToken};
use crate::config::SessionConfig;
use crate::target_line::{LineGenerator, TargetLine};

/// Handle for a scheduled level advance, for hosts that run their own timer.
#[derive(Debug, Clone)]
pub struct AdvanceTicket {
    generation: u64,
    due: Instant,
    token: CancellationToken,
}

impl AdvanceTicket {
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn due(&self) -> Instant {
        self.due
    }

    /// Time left until the advance is due, from `now`.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.due.saturating_duration_since(now)
    }

    /// Token that flips once this advance is superseded or cancelled.
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug)]
struct PendingAdvance {
    generation: u64,
    due: Instant,
    source: CancellationSource,
}

impl PendingAdvance {
    fn ticket(&self) -> AdvanceTicket {
        AdvanceTicket {
            generation: self.generation,
            due: self.due,
            token: self.source.token(),
        }
    }
}

#[derive(Debug)]
enum Phase {
    Playing,
    Advancing(PendingAdvance),
    Suspended,
    Disposed,
}

/// Serializable view of the session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PhaseKind {
    Playing,
    Advancing { generation: u64 },
    Suspended,
    Disposed,
}

/// What applying a command did.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub command: Command,
    /// Whether the layout or focus changed.
    pub changed: bool,
    /// Coverage of the target line after the command.
    pub line_covered: bool,
    /// Set when this command scheduled a new level advance.
    pub scheduled: Option<AdvanceTicket>,
}

/// Emitted when a level is completed and the next one loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelAdvanced {
    pub completed_level: u32,
    pub level: u32,
    pub target_line: TargetLine,
}

/// A pane as seen by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaneView {
    pub id: PaneId,
    pub rect: Rect,
    pub active: bool,
}

/// Read-only snapshot for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub level: u32,
    pub phase: PhaseKind,
    pub panes: Vec<PaneView>,
    pub coverage: LineCoverage,
    /// Covered fraction of the target line, in `[0, 1]`.
    pub progress: f64,
    /// `(command, chord)` pairs for a controls legend.
    pub controls: Vec<(Command, String)>,
}

/// One running puzzle.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    generator: LineGenerator,
    level: u32,
    line: TargetLine,
    layout: PaneLayout,
    phase: Phase,
    generation: u64,
}

impl Session {
    /// Start at level 1 with a single full pane.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let config = config.validated();
        let mut generator = LineGenerator::from_config(&config);
        let line = generator.generate(1);
        Self {
            config,
            generator,
            level: 1,
            line,
            layout: PaneLayout::new(),
            phase: Phase::Playing,
            generation: 0,
        }
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub const fn layout(&self) -> &PaneLayout {
        &self.layout
    }

    #[must_use]
    pub const fn target_line(&self) -> &TargetLine {
        &self.line
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> PhaseKind {
        match &self.phase {
            Phase::Playing => PhaseKind::Playing,
            Phase::Advancing(pending) => PhaseKind::Advancing {
                generation: pending.generation,
            },
            Phase::Suspended => PhaseKind::Suspended,
            Phase::Disposed => PhaseKind::Disposed,
        }
    }

    /// The advance currently scheduled, if any.
    #[must_use]
    pub fn pending_advance(&self) -> Option<AdvanceTicket> {
        match &self.phase {
            Phase::Advancing(pending) => Some(pending.ticket()),
            _ => None,
        }
    }

    /// Whether every target segment lies on a pane boundary right now.
    #[must_use]
    pub fn is_line_covered(&self) -> bool {
        is_line_covered(self.line.as_ref(), &self.layout)
    }

    #[must_use]
    pub fn line_coverage(&self) -> LineCoverage {
        line_coverage(self.line.as_ref(), &self.layout)
    }

    /// Apply a puzzle command at time `now`.
    ///
    /// Commands are ignored while suspended or after disposal.
    pub fn apply(&mut self, command: Command, now: Instant) -> CommandOutcome {
        let _span = debug_span!("session.command", command = command.label(), level = self.level)
            .entered();

        if matches!(self.phase, Phase::Suspended | Phase::Disposed) {
            debug!(phase = ?self.phase(), "command ignored: session inactive");
            return CommandOutcome {
                command,
                changed: false,
                line_covered: self.is_line_covered(),
                scheduled: None,
            };
        }

        let (changed, reshaped) = match command {
            Command::SplitVertical => {
                let split = self.layout.split_active(Orientation::Vertical).is_some();
                (split, split)
            }
            Command::SplitHorizontal => {
                let split = self.layout.split_active(Orientation::Horizontal).is_some();
                (split, split)
            }
            Command::DeletePane => {
                let deleted = self.layout.delete_active().is_some();
                (deleted, deleted)
            }
            Command::Navigate(direction) => (self.layout.navigate(direction), false),
        };

        let scheduled = if reshaped { self.reevaluate(now) } else { None };
        CommandOutcome {
            command,
            changed,
            line_covered: self.is_line_covered(),
            scheduled,
        }
    }

    /// Resolve `event` through the configured keymap and apply it.
    pub fn handle_key(&mut self, event: &KeyEvent, now: Instant) -> Option<CommandOutcome> {
        let command = self.config.keymap.resolve(event)?;
        Some(self.apply(command, now))
    }

    /// Fire the pending advance if it is due at `now`.
    pub fn tick(&mut self, now: Instant) -> Option<LevelAdvanced> {
        let due = matches!(&self.phase, Phase::Advancing(pending) if now >= pending.due);
        if due { self.advance(now) } else { None }
    }

    /// Host timer callback for `ticket`.
    ///
    /// Tickets that were cancelled or superseded by a later schedule are
    /// ignored.
    pub fn fire(&mut self, ticket: &AdvanceTicket, now: Instant) -> Option<LevelAdvanced> {
        if ticket.is_cancelled() {
            debug!(generation = ticket.generation, "advance ticket ignored: cancelled");
            return None;
        }
        let current =
            matches!(&self.phase, Phase::Advancing(pending) if pending.generation == ticket.generation);
        if !current {
            debug!(generation = ticket.generation, "advance ticket ignored: stale");
            return None;
        }
        self.advance(now)
    }

    /// Stop play while the view is hidden. Cancels any pending advance.
    pub fn suspend(&mut self) {
        if matches!(self.phase, Phase::Disposed) {
            return;
        }
        self.cancel_pending();
        self.phase = Phase::Suspended;
        debug!(level = self.level, "session suspended");
    }

    /// Resume after [`suspend`](Self::suspend), re-evaluating coverage.
    pub fn resume(&mut self, now: Instant) -> Option<AdvanceTicket> {
        if !matches!(self.phase, Phase::Suspended) {
            return None;
        }
        self.phase = Phase::Playing;
        debug!(level = self.level, "session resumed");
        self.reevaluate(now)
    }

    /// Cancel pending work for good. Later calls are no-ops.
    pub fn dispose(&mut self) {
        self.cancel_pending();
        self.phase = Phase::Disposed;
        debug!(level = self.level, "session disposed");
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let active = self.layout.active_id();
        let coverage = self.line_coverage();
        SessionSnapshot {
            level: self.level,
            phase: self.phase(),
            panes: self
                .layout
                .panes()
                .map(|pane| PaneView {
                    id: pane.id,
                    rect: pane.rect,
                    active: pane.id == active,
                })
                .collect(),
            progress: coverage.progress(),
            coverage,
            controls: self.config.keymap.describe(),
        }
    }

    fn cancel_pending(&mut self) {
        if let Phase::Advancing(pending) = &self.phase {
            pending.source.cancel();
            debug!(generation = pending.generation, "pending advance cancelled");
            self.phase = Phase::Playing;
        }
    }

    /// Drop any pending advance and schedule a new one if the line is covered.
    fn reevaluate(&mut self, now: Instant) -> Option<AdvanceTicket> {
        self.cancel_pending();
        if !self.is_line_covered() {
            return None;
        }
        self.generation += 1;
        let pending = PendingAdvance {
            generation: self.generation,
            due: now + self.config.advance_delay(),
            source: CancellationSource::new(),
        };
        let ticket = pending.ticket();
        debug!(
            level = self.level,
            generation = pending.generation,
            delay_ms = self.config.advance_delay_ms,
            "line covered; advance scheduled"
        );
        self.phase = Phase::Advancing(pending);
        Some(ticket)
    }

    fn advance(&mut self, now: Instant) -> Option<LevelAdvanced> {
        if !self.is_line_covered() {
            debug!(level = self.level, "advance dropped: line no longer covered");
            self.cancel_pending();
            return None;
        }
        self.cancel_pending();

        let completed_level = self.level;
        self.level = self.level.saturating_add(1);
        self.line = self.generator.generate(self.level);
        self.layout = self.layout.successor();
        info!(
            completed_level,
            level = self.level,
            segments = self.line.len(),
            "level advanced"
        );
        self.reevaluate(now);

        Some(LevelAdvanced {
            completed_level,
            level: self.level,
            target_line: self.line.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitcraft_core::{Direction, KeyCode, KeyEventKind, Modifiers};

    fn session() -> Session {
        Session::new(SessionConfig::default().with_seed(11))
    }

    #[test]
    fn starts_at_level_one_with_one_pane() {
        let s = session();
        assert_eq!(s.level(), 1);
        assert_eq!(s.layout().len(), 1);
        assert_eq!(s.phase(), PhaseKind::Playing);
        assert!(!s.is_line_covered());
    }

    #[test]
    fn covering_split_schedules_advance() {
        let mut s = session();
        let t0 = Instant::now();
        let outcome = s.apply(Command::SplitVertical, t0);
        assert!(outcome.changed);
        assert!(outcome.line_covered);
        let ticket = outcome.scheduled.expect("advance scheduled");
        assert_eq!(ticket.due(), t0 + Duration::from_millis(1000));
        assert_eq!(s.phase(), PhaseKind::Advancing { generation: 1 });
    }

    #[test]
    fn tick_waits_for_deadline() {
        let mut s = session();
        let t0 = Instant::now();
        s.apply(Command::SplitVertical, t0);
        assert!(s.tick(t0 + Duration::from_millis(999)).is_none());
        let advanced = s.tick(t0 + Duration::from_millis(1000)).expect("advance");
        assert_eq!(advanced.completed_level, 1);
        assert_eq!(advanced.level, 2);
        assert_eq!(s.level(), 2);
        assert_eq!(s.layout().len(), 1);
        assert_eq!(s.target_line().len(), 2);
        assert_eq!(s.phase(), PhaseKind::Playing);
    }

    #[test]
    fn navigation_keeps_pending_advance() {
        let mut s = session();
        let t0 = Instant::now();
        let ticket = s.apply(Command::SplitVertical, t0).scheduled.expect("scheduled");
        let outcome = s.apply(Command::Navigate(Direction::Right), t0);
        assert!(outcome.changed);
        assert!(outcome.scheduled.is_none());
        assert!(!ticket.is_cancelled());
        assert!(s.fire(&ticket, t0).is_some());
    }

    #[test]
    fn mutation_cancels_and_reschedules() {
        let mut s = session();
        let t0 = Instant::now();
        let first = s.apply(Command::SplitVertical, t0).scheduled.expect("scheduled");

        let t1 = t0 + Duration::from_millis(600);
        let second = s
            .apply(Command::SplitHorizontal, t1)
            .scheduled
            .expect("still covered, rescheduled");
        assert!(first.is_cancelled());
        assert!(second.generation() > first.generation());
        assert_eq!(second.due(), t1 + Duration::from_millis(1000));

        assert!(s.fire(&first, t1).is_none());
        assert!(s.tick(t0 + Duration::from_millis(1000)).is_none());
        assert!(s.fire(&second, second.due()).is_some());
    }

    #[test]
    fn uncovering_mutation_cancels() {
        let mut s = session();
        let t0 = Instant::now();
        let ticket = s.apply(Command::SplitVertical, t0).scheduled.expect("scheduled");
        let outcome = s.apply(Command::DeletePane, t0);
        assert!(outcome.changed);
        assert!(!outcome.line_covered);
        assert!(ticket.is_cancelled());
        assert_eq!(s.phase(), PhaseKind::Playing);
        assert!(s.tick(t0 + Duration::from_secs(5)).is_none());
        assert_eq!(s.level(), 1);
    }

    #[test]
    fn suspend_cancels_and_resume_reschedules() {
        let mut s = session();
        let t0 = Instant::now();
        let ticket = s.apply(Command::SplitVertical, t0).scheduled.expect("scheduled");
        s.suspend();
        assert!(ticket.is_cancelled());
        assert_eq!(s.phase(), PhaseKind::Suspended);

        let ignored = s.apply(Command::SplitHorizontal, t0);
        assert!(!ignored.changed);
        assert_eq!(s.layout().len(), 2);

        let t1 = t0 + Duration::from_secs(3);
        let resumed = s.resume(t1).expect("line still covered");
        assert_eq!(resumed.due(), t1 + Duration::from_millis(1000));
    }

    #[test]
    fn dispose_is_final() {
        let mut s = session();
        let t0 = Instant::now();
        let ticket = s.apply(Command::SplitVertical, t0).scheduled.expect("scheduled");
        s.dispose();
        assert!(ticket.is_cancelled());
        assert!(s.fire(&ticket, t0 + Duration::from_secs(2)).is_none());
        assert!(s.resume(t0).is_none());
        s.suspend();
        assert_eq!(s.phase(), PhaseKind::Disposed);
    }

    #[test]
    fn zero_delay_fires_on_next_tick() {
        let mut s = Session::new(
            SessionConfig::default()
                .with_seed(1)
                .with_advance_delay(Duration::ZERO),
        );
        let t0 = Instant::now();
        s.apply(Command::SplitVertical, t0);
        assert!(s.tick(t0).is_some());
    }

    #[test]
    fn keys_resolve_through_keymap() {
        let mut s = session();
        let t0 = Instant::now();
        let alt_w = KeyEvent::new(KeyCode::Char('w')).with_modifiers(Modifiers::ALT);
        let outcome = s.handle_key(&alt_w, t0).expect("bound");
        assert_eq!(outcome.command, Command::SplitVertical);

        let release = alt_w.with_kind(KeyEventKind::Release);
        assert!(s.handle_key(&release, t0).is_none());
        let plain = KeyEvent::new(KeyCode::Char('w'));
        assert!(s.handle_key(&plain, t0).is_none());
    }

    #[test]
    fn snapshot_marks_active_pane_and_progress() {
        let mut s = session();
        let t0 = Instant::now();
        s.apply(Command::SplitHorizontal, t0);
        let snap = s.snapshot();
        assert_eq!(snap.panes.len(), 2);
        assert_eq!(snap.panes.iter().filter(|p| p.active).count(), 1);
        assert_eq!(snap.progress, 0.0);
        assert_eq!(snap.controls.len(), Command::ALL.len());

        s.apply(Command::SplitVertical, t0);
        let snap = s.snapshot();
        assert!((snap.progress - 0.5).abs() < 1e-9);
        assert!(!snap.coverage.is_covered());
    }
}
