use std::time::{Duration, Instant};

use crate::invariants::{debug_assert_full_since_consistent, debug_assert_valid_transition};

/// Fill-level state of the queue.
///
/// # State Transitions
///
/// ```text
/// ┌────────┐  is_full            ┌──────┐
/// │ Normal │ ──────────────────► │ Full │
/// └────────┘                     └──────┘
///     ▲  │ is_warn                  │  │
///     │  ▼                         │  │ tolerance elapsed (still full)
///  ┌─────────┐ ◄────────────────────┘  ▼
///  │ Warning │  ¬is_full ∧ ¬is_normal ┌───────┐
///  └─────────┘ ◄──────────────────────│ Flood │
///     │              is_normal        └───────┘
///     └──────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelState {
    Normal,
    Warning,
    Full,
    Flood,
}

/// Sticky edge flags: a transition happened and a notification is owed.
///
/// Edges are level-triggered, not counted — re-entering a state without an
/// intervening [`LevelMachine::take_edges`] does not set the flag again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Edges {
    pub warn: bool,
    pub full: bool,
    pub flood: bool,
    pub normal: bool,
}

impl Edges {
    fn clear(&mut self) {
        *self = Edges::default();
    }

    /// Whether any edge is set.
    #[must_use]
    pub fn any(&self) -> bool {
        self.warn || self.full || self.flood || self.normal
    }
}

/// Fill percentages and fullness the state machine needs to decide a
/// transition. Computed fresh from the [`Ring`](crate::ring::Ring) before
/// each call into [`LevelMachine`].
#[derive(Debug, Clone, Copy)]
pub struct Fill {
    pub fill_percent: u32,
    pub is_full: bool,
}

impl Fill {
    fn is_warn(&self, warn_level: u8) -> bool {
        self.fill_percent >= u32::from(warn_level)
    }

    fn is_normal(&self, normal_level: u8) -> bool {
        self.fill_percent <= u32::from(normal_level)
    }
}

/// Tracks fill-level pressure and decides when to notify and when to
/// escalate toward dropping messages.
pub struct LevelMachine {
    state: LevelState,
    full_since: Option<Instant>,
    edges: Edges,
    warn_level: u8,
    normal_level: u8,
    tolerance: Duration,
}

impl LevelMachine {
    /// Creates a fresh machine in `Normal` with no pending edges.
    pub fn new(warn_level: u8, normal_level: u8, tolerance: Duration) -> Self {
        Self {
            state: LevelState::Normal,
            full_since: None,
            edges: Edges::default(),
            warn_level,
            normal_level,
            tolerance,
        }
    }

    /// Resets to `Normal` with no pending edges, for `Queue::init` reuse
    /// after `destroy`.
    pub fn reset(&mut self) {
        self.state = LevelState::Normal;
        self.full_since = None;
        self.edges.clear();
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> LevelState {
        self.state
    }

    /// Reads and clears all pending edge flags.
    pub fn take_edges(&mut self) -> Edges {
        std::mem::take(&mut self.edges)
    }

    /// Re-evaluates the state machine against the current fill, applying
    /// the precedence Full > Warning-upward > Normal-downward. Called
    /// after every `push` and `pop`.
    pub fn evaluate(&mut self, fill: Fill, now: Instant) {
        let from = self.state;
        let to = match self.state {
            LevelState::Normal => {
                if fill.is_full {
                    self.enter_full(now);
                    LevelState::Full
                } else if fill.is_warn(self.warn_level) {
                    self.edges.warn = true;
                    LevelState::Warning
                } else {
                    LevelState::Normal
                }
            }
            LevelState::Warning => {
                if fill.is_full {
                    self.enter_full(now);
                    LevelState::Full
                } else if fill.is_normal(self.normal_level) {
                    self.enter_normal();
                    LevelState::Normal
                } else {
                    LevelState::Warning
                }
            }
            LevelState::Full => {
                if fill.is_normal(self.normal_level) {
                    self.enter_normal();
                    LevelState::Normal
                } else if !fill.is_full {
                    self.edges.warn = true;
                    self.full_since = None;
                    LevelState::Warning
                } else if self.dwell_exceeded(now) {
                    self.edges.flood = true;
                    LevelState::Flood
                } else {
                    LevelState::Full
                }
            }
            LevelState::Flood => {
                if fill.is_normal(self.normal_level) {
                    self.enter_normal();
                    LevelState::Normal
                } else if !fill.is_full {
                    self.edges.warn = true;
                    self.full_since = None;
                    LevelState::Warning
                } else {
                    LevelState::Flood
                }
            }
        };

        debug_assert_valid_transition!(is_valid_transition(from, to), from, to);
        self.state = to;
        debug_assert_full_since_consistent!(self.state, self.full_since);
    }

    fn enter_full(&mut self, now: Instant) {
        self.edges.full = true;
        self.full_since = Some(now);
    }

    fn enter_normal(&mut self) {
        self.edges.normal = true;
        self.full_since = None;
    }

    fn dwell_exceeded(&self, now: Instant) -> bool {
        self.full_since
            .is_some_and(|since| now.saturating_duration_since(since) >= self.tolerance)
    }
}

fn is_valid_transition(from: LevelState, to: LevelState) -> bool {
    use LevelState::{Flood, Full, Normal, Warning};
    matches!(
        (from, to),
        (Normal, Normal)
            | (Normal, Warning)
            | (Normal, Full)
            | (Warning, Warning)
            | (Warning, Normal)
            | (Warning, Full)
            | (Full, Full)
            | (Full, Normal)
            | (Full, Warning)
            | (Full, Flood)
            | (Flood, Flood)
            | (Flood, Normal)
            | (Flood, Warning)
    )
}
