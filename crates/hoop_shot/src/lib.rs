use bevy::prelude::*;
use bits_helpers::floating_score::FloatingScorePlugin;

pub mod config;
pub mod gameplay;
pub mod geometry;
pub mod patrol;
mod ribbit;
pub mod session;
pub mod spawn;
mod ui;

use config::HoopConfig;
use gameplay::GameplayPlugin;
use ribbit::HoopShot;
use ui::UiPlugin;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Default, States)]
pub enum GameState {
    #[default]
    Welcome,
    Playing,
    GameOver,
}

pub fn run() {
    bits_helpers::get_default_app::<HoopShot>(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    )
    .add_plugins(HoopShotPlugin)
    .run();
}

pub struct HoopShotPlugin;

impl Plugin for HoopShotPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .insert_resource(HoopConfig::load_or_default())
            .add_plugins((FloatingScorePlugin, GameplayPlugin, UiPlugin))
            .add_systems(Startup, setup);
    }
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);
}
