//! Score, countdown and the drag rules of a Hoop Shot session.
//!
//! Plain data and plain methods: the Bevy systems in `gameplay` feed pointer
//! events and one-second ticks in, and render what comes out.

use bevy::math::{Rect, Vec2};
use bevy::prelude::Resource;

use crate::config::HoopConfig;
use crate::geometry::{hoop_bounds, overlaps, square_at};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragPhase {
    #[default]
    Idle,
    /// `origin` is where the ball was when the drag started.
    Dragging { origin: Vec2 },
}

/// How a drag ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Dropped on the hoop.
    Scored,
    /// Dropped on the player, away from the hoop.
    Fouled,
    /// Dropped anywhere else. The ball stays where it was dropped.
    Missed,
}

impl ReleaseOutcome {
    pub const fn score_delta(self) -> i32 {
        match self {
            Self::Scored => 1,
            Self::Fouled => -1,
            Self::Missed => 0,
        }
    }

    pub const fn springs_back(self) -> bool {
        matches!(self, Self::Scored | Self::Fouled)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Counting { remaining: u32 },
    /// The countdown ran out: score back to zero, a new round started.
    RoundReset { final_score: i32 },
}

#[derive(Resource, Clone, Debug)]
pub struct GameSession {
    pub score: i32,
    pub timer_seconds: u32,
    /// Top-left corner of the ball, in play-area coordinates.
    pub ball_position: Vec2,
    /// Top-left corner of the player.
    pub player_position: Vec2,
    drag: DragPhase,
    ball_size: f32,
    hoop: Rect,
    round_length: u32,
    reset_position: Vec2,
}

impl GameSession {
    pub fn new(config: &HoopConfig, ball_position: Vec2, player_position: Vec2) -> Self {
        Self {
            score: 0,
            timer_seconds: config.round_length,
            ball_position,
            player_position,
            drag: DragPhase::Idle,
            ball_size: config.ball_size,
            hoop: hoop_bounds(config.play_area().x, config.target_size),
            round_length: config.round_length,
            reset_position: config.reset_position(),
        }
    }

    pub const fn drag_phase(&self) -> DragPhase {
        self.drag
    }

    pub const fn is_dragging(&self) -> bool {
        matches!(self.drag, DragPhase::Dragging { .. })
    }

    pub const fn round_length(&self) -> u32 {
        self.round_length
    }

    pub const fn reset_position(&self) -> Vec2 {
        self.reset_position
    }

    pub const fn hoop(&self) -> Rect {
        self.hoop
    }

    pub fn ball_bounds(&self) -> Rect {
        square_at(self.ball_position, self.ball_size)
    }

    pub fn player_bounds(&self) -> Rect {
        square_at(self.player_position, self.ball_size)
    }

    pub fn is_over_hoop(&self) -> bool {
        overlaps(self.ball_bounds(), self.hoop)
    }

    pub fn is_over_player(&self) -> bool {
        overlaps(self.ball_bounds(), self.player_bounds())
    }

    /// Whether a press at `point` lands on the ball.
    pub fn ball_contains(&self, point: Vec2) -> bool {
        self.ball_bounds().contains(point)
    }

    /// Idle -> Dragging. Returns `false` if a drag was already running.
    pub fn drag_start(&mut self) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.drag = DragPhase::Dragging {
            origin: self.ball_position,
        };
        true
    }

    /// Moves the ball to `delta` away from where the drag started. Every move
    /// that ends on the player costs a point, returned as `true`.
    pub fn drag_move(&mut self, delta: Vec2) -> bool {
        let DragPhase::Dragging { origin } = self.drag else {
            return false;
        };
        self.ball_position = origin + delta;

        let collided = self.is_over_player();
        if collided {
            self.score -= 1;
        }
        collided
    }

    /// Dragging -> Idle. `None` when there was no drag to end.
    pub fn drag_release(&mut self) -> Option<ReleaseOutcome> {
        if !self.is_dragging() {
            return None;
        }
        self.drag = DragPhase::Idle;

        let outcome = if self.is_over_hoop() {
            ReleaseOutcome::Scored
        } else if self.is_over_player() {
            ReleaseOutcome::Fouled
        } else {
            ReleaseOutcome::Missed
        };

        self.score += outcome.score_delta();
        if outcome.springs_back() {
            self.ball_position = self.reset_position;
        }
        Some(outcome)
    }

    /// One second passed.
    pub fn tick(&mut self) -> TickOutcome {
        self.timer_seconds = self.timer_seconds.saturating_sub(1);
        if self.timer_seconds > 0 {
            return TickOutcome::Counting {
                remaining: self.timer_seconds,
            };
        }

        let final_score = self.score;
        self.reset_round();
        TickOutcome::RoundReset { final_score }
    }

    /// Zero score, full countdown. The ball and any running drag are left alone.
    pub fn reset_round(&mut self) {
        self.score = 0;
        self.timer_seconds = self.round_length;
    }
}
