use core::time::Duration;

use bevy::color::palettes::css::{DARK_ORANGE, ROYAL_BLUE, SILVER};
use bevy::math::curve::{Curve, EaseFunction};
use bevy::math::primitives;
use bevy::prelude::*;
use bevy::time::Stopwatch;
use bits_helpers::input::{PointerEvent, pointer_world_event};
use bits_helpers::{play_area_to_world, world_to_play_area};

use crate::GameState;
use crate::config::HoopConfig;
use crate::patrol::PatrolRoute;
use crate::geometry::square_at;
use crate::session::{GameSession, ReleaseOutcome, TickOutcome};
use crate::spawn::spawn_position;

const HOOP_Z: f32 = 0.0;
const PLAYER_Z: f32 = 1.0;
const BALL_Z: f32 = 2.0;

#[derive(Component)]
pub struct Ball;

#[derive(Component)]
pub struct Player;

#[derive(Component)]
pub struct Hoop;

/// Everything spawned for a session, despawned when leaving `Playing`.
#[derive(Component)]
pub struct PlayfieldElement;

/// Eases the ball sprite from the drop location back to the reset position.
/// The session already holds the reset position; this only moves the sprite.
#[derive(Component)]
pub struct SpringBack {
    from: Vec2,
    to: Vec2,
    timer: Timer,
}

impl SpringBack {
    pub fn new(from: Vec2, to: Vec2, duration: Duration) -> Self {
        Self {
            from,
            to,
            timer: Timer::new(duration, TimerMode::Once),
        }
    }

    fn sample(&self) -> Vec2 {
        let eased = EasingCurve::new(0.0, 1.0, EaseFunction::BackOut).sample_clamped(self.timer.fraction());
        self.from.lerp(self.to, eased)
    }
}

/// The one-second tick driving the countdown.
#[derive(Resource)]
pub struct Countdown(pub Timer);

impl Default for Countdown {
    fn default() -> Self {
        Self(Timer::from_seconds(1.0, TimerMode::Repeating))
    }
}

#[derive(Resource)]
pub struct PatrolClock {
    route: PatrolRoute,
    stopwatch: Stopwatch,
}

/// Pointer position when the drag started, in play-area coordinates.
#[derive(Resource, Default)]
pub struct PointerDrag {
    grab_point: Option<Vec2>,
    last_delta: Vec2,
}

/// Sent on every score change. `position` is the ball's top-left corner.
#[derive(Event, Clone, Copy, Debug)]
pub struct ScoreChanged {
    pub delta: i32,
    pub position: Vec2,
}

#[derive(Event, Clone, Copy, Debug)]
pub struct RoundReset {
    pub final_score: i32,
}

#[derive(SystemSet, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GameplaySet;

pub struct GameplayPlugin;

impl Plugin for GameplayPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ScoreChanged>()
            .add_event::<RoundReset>()
            .add_systems(OnEnter(GameState::Playing), start_session)
            .add_systems(OnExit(GameState::Playing), end_session)
            .add_systems(
                Update,
                (
                    move_player,
                    handle_drag,
                    tick_countdown,
                    animate_spring_back,
                    sync_transforms,
                )
                    .chain()
                    .in_set(GameplaySet)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// World position of the center of a box whose top-left corner is `top_left`.
fn world_center(top_left: Vec2, size: Vec2) -> Vec2 {
    play_area_to_world(top_left + size / 2.0)
}

fn start_session(
    mut commands: Commands,
    config: Res<HoopConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let mut rng = fastrand::Rng::new();
    let (edge, ball_position) = spawn_position(&mut rng, config.play_area(), config.ball_size);
    let route = PatrolRoute::new(config.waypoints(), config.patrol_leg());
    let session = GameSession::new(&config, ball_position, route.start());
    info!("Ball spawned on the {edge} edge at {ball_position}");

    let ball_size = Vec2::splat(config.ball_size);
    let hoop = session.hoop();

    commands.spawn((
        Mesh2d(meshes.add(primitives::Ellipse::from_size(hoop.size()))),
        MeshMaterial2d(materials.add(ColorMaterial::from(Color::Srgba(SILVER)))),
        Transform::from_translation(world_center(hoop.min, hoop.size()).extend(HOOP_Z)),
        Hoop,
        PlayfieldElement,
    ));

    commands.spawn((
        Mesh2d(meshes.add(primitives::Circle::new(config.ball_size / 2.0))),
        MeshMaterial2d(materials.add(ColorMaterial::from(Color::Srgba(ROYAL_BLUE)))),
        Transform::from_translation(
            world_center(session.player_position, ball_size).extend(PLAYER_Z),
        ),
        Player,
        PlayfieldElement,
    ));

    commands.spawn((
        Mesh2d(meshes.add(primitives::Circle::new(config.ball_size / 2.0))),
        MeshMaterial2d(materials.add(ColorMaterial::from(Color::Srgba(DARK_ORANGE)))),
        Transform::from_translation(world_center(ball_position, ball_size).extend(BALL_Z)),
        Ball,
        PlayfieldElement,
    ));

    commands.insert_resource(session);
    commands.insert_resource(Countdown::default());
    commands.insert_resource(PatrolClock {
        route,
        stopwatch: Stopwatch::new(),
    });
    commands.insert_resource(PointerDrag::default());
}

// The session itself stays around for the game over screen and the host's score query.
fn end_session(mut commands: Commands, query: Query<Entity, With<PlayfieldElement>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
    commands.remove_resource::<Countdown>();
    commands.remove_resource::<PatrolClock>();
    commands.remove_resource::<PointerDrag>();
}

/// Top-left corner of the ball as drawn. Mid spring-back the sprite trails
/// the session, which already sits at the reset position.
fn drawn_ball_position(transform: &Transform, ball_size: f32) -> Vec2 {
    world_to_play_area(transform.translation.truncate()) - Vec2::splat(ball_size / 2.0)
}

/// Starts a drag when `point` lands on the ball. While the ball springs back the
/// press is tested against the sprite, and a hit takes the ball over from the
/// animation right where it is drawn.
fn grab_ball(
    commands: &mut Commands,
    session: &mut GameSession,
    ball: Option<(Entity, &Transform, Option<&SpringBack>)>,
    point: Vec2,
    ball_size: f32,
) -> bool {
    if session.is_dragging() {
        return false;
    }

    match ball {
        Some((entity, transform, Some(_))) => {
            let drawn = drawn_ball_position(transform, ball_size);
            if !square_at(drawn, ball_size).contains(point) {
                return false;
            }
            session.ball_position = drawn;
            commands.entity(entity).remove::<SpringBack>();
        }
        _ => {
            if !session.ball_contains(point) {
                return false;
            }
        }
    }
    session.drag_start()
}

/// Ends the drag and starts the spring-back animation when the outcome calls
/// for one. `None` when no drag was running.
fn release_ball(
    commands: &mut Commands,
    session: &mut GameSession,
    ball: Option<(Entity, &Transform)>,
    config: &HoopConfig,
) -> Option<ReleaseOutcome> {
    let outcome = session.drag_release()?;

    if outcome.springs_back() {
        if let Some((entity, transform)) = ball {
            let target = world_center(session.ball_position, Vec2::splat(config.ball_size));
            commands.entity(entity).insert(SpringBack::new(
                transform.translation.truncate(),
                target,
                config.spring_back(),
            ));
        }
    }
    Some(outcome)
}

fn move_player(time: Res<Time>, mut clock: ResMut<PatrolClock>, mut session: ResMut<GameSession>) {
    clock.stopwatch.tick(time.delta());
    session.player_position = clock.route.position_at(clock.stopwatch.elapsed());
}

fn handle_drag(
    mut commands: Commands,
    mouse_input: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    windows: Query<&Window>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    ball_query: Query<(Entity, &Transform, Option<&SpringBack>), With<Ball>>,
    config: Res<HoopConfig>,
    mut session: ResMut<GameSession>,
    mut pointer: ResMut<PointerDrag>,
    mut score_events: EventWriter<ScoreChanged>,
) {
    let Some(event) = pointer_world_event(&mouse_input, &touch_input, &windows, &camera_query)
    else {
        return;
    };

    match event {
        PointerEvent::Pressed(world_position) => {
            let point = world_to_play_area(world_position);
            let ball = ball_query.get_single().ok();
            if !grab_ball(&mut commands, &mut session, ball, point, config.ball_size) {
                return;
            }
            pointer.grab_point = Some(point);
            pointer.last_delta = Vec2::ZERO;
            debug!("Drag started at {point}");
        }
        PointerEvent::Held(world_position) => {
            let Some(grab_point) = pointer.grab_point else {
                return;
            };
            let delta = world_to_play_area(world_position) - grab_point;
            if delta == pointer.last_delta {
                return;
            }
            pointer.last_delta = delta;

            if session.drag_move(delta) {
                score_events.send(ScoreChanged {
                    delta: -1,
                    position: session.ball_position,
                });
            }
        }
        PointerEvent::Released(_) => {
            pointer.grab_point = None;
            let drop = session.ball_position;
            let ball = ball_query
                .get_single()
                .ok()
                .map(|(entity, transform, _)| (entity, transform));
            let Some(outcome) = release_ball(&mut commands, &mut session, ball, &config) else {
                return;
            };
            debug!("Ball released at {drop}: {outcome:?}");

            if outcome.score_delta() != 0 {
                score_events.send(ScoreChanged {
                    delta: outcome.score_delta(),
                    position: drop,
                });
            }
        }
    }
}

fn tick_countdown(
    time: Res<Time>,
    mut countdown: ResMut<Countdown>,
    mut session: ResMut<GameSession>,
    mut resets: EventWriter<RoundReset>,
) {
    countdown.0.tick(time.delta());

    for _ in 0..countdown.0.times_finished_this_tick() {
        if let TickOutcome::RoundReset { final_score } = session.tick() {
            info!("Round over with {final_score} points, starting a new one");
            resets.send(RoundReset { final_score });
        }
    }
}

fn animate_spring_back(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &mut SpringBack)>,
) {
    for (entity, mut transform, mut spring_back) in &mut query {
        spring_back.timer.tick(time.delta());
        transform.translation = spring_back.sample().extend(transform.translation.z);

        if spring_back.timer.finished() {
            commands.entity(entity).remove::<SpringBack>();
        }
    }
}

fn sync_transforms(
    session: Res<GameSession>,
    config: Res<HoopConfig>,
    mut balls: Query<&mut Transform, (With<Ball>, Without<SpringBack>, Without<Player>)>,
    mut players: Query<&mut Transform, (With<Player>, Without<Ball>)>,
) {
    let size = Vec2::splat(config.ball_size);

    for mut transform in &mut balls {
        transform.translation = world_center(session.ball_position, size).extend(BALL_Z);
    }
    for mut transform in &mut players {
        transform.translation = world_center(session.player_position, size).extend(PLAYER_Z);
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;
    use bevy::state::app::StatesPlugin;

    use super::*;

    const BALL_START: Vec2 = Vec2::new(150.0, 580.0);

    fn world_with_session(round_length: u32) -> World {
        let config = HoopConfig {
            round_length,
            ..HoopConfig::default()
        };
        let mut world = World::new();
        world.insert_resource(GameSession::new(&config, Vec2::ZERO, Vec2::new(200.0, 550.0)));
        world.insert_resource(config);
        world.insert_resource(Countdown::default());
        world.insert_resource(Time::<()>::default());
        world.init_resource::<Events<RoundReset>>();
        world
    }

    fn advance(world: &mut World, duration: Duration) {
        world.resource_mut::<Time>().advance_by(duration);
    }

    #[test]
    fn countdown_ticks_once_per_second() {
        let mut world = world_with_session(30);

        advance(&mut world, Duration::from_millis(2500));
        world
            .run_system_once(tick_countdown)
            .expect("system should run");
        assert_eq!(world.resource::<GameSession>().timer_seconds, 28, "two whole seconds");

        advance(&mut world, Duration::from_millis(500));
        world
            .run_system_once(tick_countdown)
            .expect("system should run");
        assert_eq!(world.resource::<GameSession>().timer_seconds, 27, "the half seconds add up");
    }

    #[test]
    fn countdown_end_sends_round_reset() {
        let mut world = world_with_session(2);
        world.resource_mut::<GameSession>().score = 7;

        advance(&mut world, Duration::from_secs(2));
        world
            .run_system_once(tick_countdown)
            .expect("system should run");

        let session = world.resource::<GameSession>();
        assert_eq!(session.score, 0, "score reset");
        assert_eq!(session.timer_seconds, 2, "timer back to the round length");

        let events = world.resource::<Events<RoundReset>>();
        let mut reader = events.get_cursor();
        let resets: Vec<_> = reader.read(events).map(|reset| reset.final_score).collect();
        assert_eq!(resets, vec![7], "one reset carrying the final score");
    }

    #[test]
    fn player_follows_the_patrol_route() {
        let mut world = world_with_session(30);
        let config = HoopConfig::default();
        world.insert_resource(PatrolClock {
            route: PatrolRoute::new(config.waypoints(), config.patrol_leg()),
            stopwatch: Stopwatch::new(),
        });

        advance(&mut world, Duration::from_millis(1750));
        world
            .run_system_once(move_player)
            .expect("system should run");
        assert_eq!(
            world.resource::<GameSession>().player_position,
            Vec2::new(50.0, 100.0),
            "one leg in, the player stands on the second waypoint"
        );
    }

    #[test]
    fn spring_back_ends_on_target() {
        let mut spring_back = SpringBack::new(
            Vec2::ZERO,
            Vec2::new(10.0, -20.0),
            Duration::from_millis(400),
        );
        assert!(
            spring_back.sample().length() < 1e-4,
            "starts at the drop location"
        );

        spring_back.timer.tick(Duration::from_millis(400));
        assert!(spring_back.timer.finished(), "done after its duration");
        assert!(
            spring_back.sample().distance(Vec2::new(10.0, -20.0)) < 1e-4,
            "ends on the reset position"
        );
    }

    /// A world holding a session whose ball is being dragged to `drop`, and
    /// the ball sprite drawn where the session puts it.
    fn world_with_drag_to(drop: Vec2) -> (World, Entity) {
        let mut world = world_with_session(30);
        let config = HoopConfig::default();
        let mut session = GameSession::new(&config, BALL_START, Vec2::new(20.0, 300.0));
        session.drag_start();
        session.drag_move(drop - BALL_START);
        let drawn = world_center(session.ball_position, Vec2::splat(config.ball_size));
        world.insert_resource(session);
        let ball = world
            .spawn((Ball, Transform::from_translation(drawn.extend(BALL_Z))))
            .id();
        (world, ball)
    }

    fn release(world: &mut World) -> Option<ReleaseOutcome> {
        world
            .run_system_once(
                |mut commands: Commands,
                 mut session: ResMut<GameSession>,
                 config: Res<HoopConfig>,
                 balls: Query<(Entity, &Transform), With<Ball>>| {
                    release_ball(&mut commands, &mut session, balls.get_single().ok(), &config)
                },
            )
            .expect("system should run")
    }

    fn press(world: &mut World, point: Vec2) -> bool {
        world
            .run_system_once(
                move |mut commands: Commands,
                      mut session: ResMut<GameSession>,
                      config: Res<HoopConfig>,
                      balls: Query<(Entity, &Transform, Option<&SpringBack>), With<Ball>>| {
                    grab_ball(
                        &mut commands,
                        &mut session,
                        balls.get_single().ok(),
                        point,
                        config.ball_size,
                    )
                },
            )
            .expect("system should run")
    }

    #[test]
    fn scoring_release_springs_back_to_the_reset_position() {
        let (mut world, ball) = world_with_drag_to(Vec2::new(150.0, 0.0));

        assert_eq!(release(&mut world), Some(ReleaseOutcome::Scored), "dropped on the hoop");

        let config = HoopConfig::default();
        let spring_back = world
            .get::<SpringBack>(ball)
            .expect("a scored ball springs back");
        assert_eq!(
            spring_back.to,
            world_center(config.reset_position(), Vec2::splat(config.ball_size)),
            "the animation targets the reset position"
        );
        assert_eq!(
            spring_back.from,
            world_center(Vec2::new(150.0, 0.0), Vec2::splat(config.ball_size)),
            "and starts where the ball was dropped"
        );
    }

    #[test]
    fn fouling_release_springs_back_too() {
        let (mut world, ball) = world_with_drag_to(Vec2::new(20.0, 300.0));

        assert_eq!(release(&mut world), Some(ReleaseOutcome::Fouled), "dropped on the player");
        assert!(world.get::<SpringBack>(ball).is_some(), "a fouled ball springs back");
    }

    #[test]
    fn missed_release_leaves_the_ball_where_it_fell() {
        let (mut world, ball) = world_with_drag_to(Vec2::new(250.0, 400.0));

        assert_eq!(release(&mut world), Some(ReleaseOutcome::Missed), "open field");
        assert!(world.get::<SpringBack>(ball).is_none(), "no animation on a miss");
        assert_eq!(
            release(&mut world),
            None,
            "nothing left to release once the drag ended"
        );
    }

    #[test]
    fn presses_mid_spring_back_hit_the_drawn_ball() {
        let (mut world, ball) = world_with_drag_to(Vec2::new(150.0, 0.0));
        release(&mut world);

        // Halfway through the animation the sprite is far from the reset corner.
        let config = HoopConfig::default();
        let drawn = Vec2::new(150.0, 300.0);
        world.entity_mut(ball).insert(Transform::from_translation(
            world_center(drawn, Vec2::splat(config.ball_size)).extend(BALL_Z),
        ));

        let reset_corner = config.reset_position() + Vec2::splat(config.ball_size / 2.0);
        assert!(!press(&mut world, reset_corner), "the empty reset corner is not the ball");
        assert!(world.get::<SpringBack>(ball).is_some(), "a miss leaves the animation running");

        assert!(press(&mut world, drawn + Vec2::splat(10.0)), "the drawn ball is grabbed");
        assert!(world.get::<SpringBack>(ball).is_none(), "the drag takes over from the animation");
        let session = world.resource::<GameSession>();
        assert!(session.is_dragging(), "dragging");
        assert!(
            session.ball_position.distance(drawn) < 1e-3,
            "the drag starts where the ball is drawn"
        );
    }

    #[test]
    fn resting_ball_is_hit_tested_at_the_session_position() {
        let (mut world, _) = world_with_drag_to(Vec2::new(250.0, 400.0));
        release(&mut world);

        assert!(!press(&mut world, Vec2::new(10.0, 10.0)), "far from the ball");
        assert!(press(&mut world, Vec2::new(280.0, 430.0)), "middle of the ball");
        assert!(!press(&mut world, Vec2::new(280.0, 430.0)), "already dragging");
    }

    #[test]
    fn leaving_playing_tears_the_round_down() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_state::<GameState>()
            .init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<ColorMaterial>>()
            .init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<Touches>()
            .insert_resource(HoopConfig::default())
            .add_plugins(GameplayPlugin);

        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::Playing);
        app.update();

        let mut playfield = app
            .world_mut()
            .query_filtered::<Entity, With<PlayfieldElement>>();
        assert_eq!(playfield.iter(app.world()).count(), 3, "hoop, player and ball");
        assert!(app.world().contains_resource::<Countdown>(), "the countdown runs");
        assert!(app.world().contains_resource::<PatrolClock>(), "the player patrols");

        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::GameOver);
        app.update();

        assert_eq!(playfield.iter(app.world()).count(), 0, "the playfield is gone");
        assert!(!app.world().contains_resource::<Countdown>(), "the countdown is released");
        assert!(!app.world().contains_resource::<PatrolClock>(), "the patrol clock too");
        assert!(!app.world().contains_resource::<PointerDrag>(), "and the pointer state");
        assert!(
            app.world().contains_resource::<GameSession>(),
            "the session stays for the game over screen"
        );
    }
}
