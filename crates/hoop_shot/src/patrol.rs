use core::time::Duration;

use bevy::math::Vec2;

/// Closed loop W0 -> W1 -> W2 -> W3 -> W0 walked at constant speed per leg.
#[derive(Clone, Debug, PartialEq)]
pub struct PatrolRoute {
    waypoints: [Vec2; 4],
    leg: Duration,
}

impl PatrolRoute {
    pub const fn new(waypoints: [Vec2; 4], leg: Duration) -> Self {
        Self { waypoints, leg }
    }

    pub const fn start(&self) -> Vec2 {
        self.waypoints[0]
    }

    /// Time to walk all four legs.
    pub fn lap(&self) -> Duration {
        self.leg * 4
    }

    /// Position `elapsed` after the route started. Never stops: past the end
    /// of a lap it starts over from W0.
    pub fn position_at(&self, elapsed: Duration) -> Vec2 {
        let leg_secs = self.leg.as_secs_f64();
        if leg_secs <= 0.0 {
            return self.start();
        }

        let into_lap = elapsed.as_secs_f64() % self.lap().as_secs_f64();
        let leg = (into_lap / leg_secs).floor();
        let progress = ((into_lap - leg * leg_secs) / leg_secs) as f32;

        let [w0, w1, w2, w3] = self.waypoints;
        let (from, to) = match leg as u8 {
            0 => (w0, w1),
            1 => (w1, w2),
            2 => (w2, w3),
            _ => (w3, w0),
        };
        from.lerp(to, progress)
    }
}
