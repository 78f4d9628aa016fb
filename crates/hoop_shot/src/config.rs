use core::time::Duration;

use bevy::prelude::*;
use bits_helpers::PLAY_AREA;
use serde::Deserialize;
use thiserror::Error;

/// Side of the ball and of the player, in pixels.
pub const BALL_SIZE: f32 = 60.0;
/// The hoop box is 1.5 x 0.75 times this.
pub const TARGET_SIZE: f32 = 100.0;
pub const ROUND_LENGTH_SECS: u32 = 30;
pub const PATROL_LEG_MS: u64 = 1750;
pub const SPRING_BACK_MS: u64 = 400;
pub const PATROL_WAYPOINTS: [(f32, f32); 4] =
    [(200.0, 550.0), (50.0, 100.0), (300.0, 100.0), (300.0, 500.0)];

/// Environment variable naming a RON file that overrides the defaults.
#[cfg(not(target_arch = "wasm32"))]
pub const CONFIG_ENV_VAR: &str = "HOOP_SHOT_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NonPositiveSize { name: &'static str, value: f32 },
    #[error("round length must be at least one second")]
    ZeroRoundLength,
    #[error("patrol legs must last longer than zero milliseconds")]
    ZeroLegDuration,
    #[error("a {ball_size}px ball does not fit in a {width}x{height} play area")]
    BallLargerThanPlayArea {
        ball_size: f32,
        width: f32,
        height: f32,
    },
    #[error("the reset box at ({x}, {y}) does not fit in the play area")]
    ResetOutsidePlayArea { x: f32, y: f32 },
    #[error("invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
}

/// Tunables of a session. Every field has a default, so a RON override only
/// needs the fields it changes, e.g. `(round_length: 5)`.
///
/// The play area itself is not configurable: it is the shared
/// [`PLAY_AREA`] every bit renders into.
#[derive(Resource, Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HoopConfig {
    pub ball_size: f32,
    pub target_size: f32,
    /// Seconds in a round, and the value the countdown restarts from.
    pub round_length: u32,
    pub patrol_leg_ms: u64,
    pub patrol_waypoints: [(f32, f32); 4],
    /// Where the ball springs back to after landing on the hoop or the player.
    /// Bottom-left corner of the play area when unset.
    pub reset_position: Option<(f32, f32)>,
    pub spring_back_ms: u64,
}

impl Default for HoopConfig {
    fn default() -> Self {
        Self {
            ball_size: BALL_SIZE,
            target_size: TARGET_SIZE,
            round_length: ROUND_LENGTH_SECS,
            patrol_leg_ms: PATROL_LEG_MS,
            patrol_waypoints: PATROL_WAYPOINTS,
            reset_position: None,
            spring_back_ms: SPRING_BACK_MS,
        }
    }
}

impl HoopConfig {
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("ball_size", self.ball_size),
            ("target_size", self.target_size),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositiveSize { name, value });
            }
        }

        if self.ball_size > PLAY_AREA.x || self.ball_size > PLAY_AREA.y {
            return Err(ConfigError::BallLargerThanPlayArea {
                ball_size: self.ball_size,
                width: PLAY_AREA.x,
                height: PLAY_AREA.y,
            });
        }
        let reset = self.reset_position();
        let reset_area = Rect::from_corners(Vec2::ZERO, PLAY_AREA - Vec2::splat(self.ball_size));
        if !reset_area.contains(reset) {
            return Err(ConfigError::ResetOutsidePlayArea {
                x: reset.x,
                y: reset.y,
            });
        }
        if self.round_length == 0 {
            return Err(ConfigError::ZeroRoundLength);
        }
        if self.patrol_leg_ms == 0 {
            return Err(ConfigError::ZeroLegDuration);
        }

        Ok(())
    }

    /// Reads the file named by [`CONFIG_ENV_VAR`]. `Ok(None)` when it is unset.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
            return Ok(None);
        };
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        info!("Loading config from {path}");
        Self::from_ron(&text).map(Some)
    }

    /// The override when there is a valid one, the defaults otherwise.
    pub fn load_or_default() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        {
            match Self::from_env() {
                Ok(Some(config)) => return config,
                Ok(None) => {}
                Err(err) => error!("{err}, using the default config"),
            }
        }

        Self::default()
    }

    pub const fn play_area(&self) -> Vec2 {
        PLAY_AREA
    }

    pub fn patrol_leg(&self) -> Duration {
        Duration::from_millis(self.patrol_leg_ms)
    }

    pub fn waypoints(&self) -> [Vec2; 4] {
        self.patrol_waypoints.map(|(x, y)| Vec2::new(x, y))
    }

    pub fn reset_position(&self) -> Vec2 {
        self.reset_position.map_or_else(
            || Vec2::new(0.0, PLAY_AREA.y - self.ball_size),
            |(x, y)| Vec2::new(x, y),
        )
    }

    pub fn spring_back(&self) -> Duration {
        Duration::from_millis(self.spring_back_ms)
    }
}
