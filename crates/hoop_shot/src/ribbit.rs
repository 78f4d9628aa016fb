use bevy::prelude::*;
use bits_helpers::RibbitMessageHandler;
use ribbit_bits::{BitDuration, BitResult};

use crate::GameState;
use crate::session::GameSession;

#[derive(Default, Clone, Copy)]
pub struct HoopShot;

impl RibbitMessageHandler for HoopShot {
    fn restart(world: &mut World) {
        info!("Restarting HoopShot");

        world.remove_resource::<GameSession>();
        let mut next_state = world.resource_mut::<NextState<GameState>>();
        next_state.set(GameState::Welcome);
    }

    fn end(world: &mut World) -> BitResult {
        info!("Ending HoopShot");

        let mut next_state = world.resource_mut::<NextState<GameState>>();
        next_state.set(GameState::GameOver);

        let score = world.get_resource::<GameSession>().map_or(0, |session| session.score);
        BitResult::HighestScore(score.into())
    }

    // Rounds restart on their own, so the bit runs until the host ends it.
    fn duration(_world: &mut World) -> BitDuration {
        BitDuration::max_duration()
    }
}
