use bevy::color::palettes::css::{GREEN, RED, WHITE, YELLOW};
use bevy::prelude::*;
use bits_helpers::floating_score::spawn_floating_score;
use bits_helpers::play_area_to_world;
use bits_helpers::welcome_screen::{despawn_welcome_screen, spawn_welcome_screen_text};

use crate::GameState;
use crate::config::HoopConfig;
use crate::gameplay::{GameplaySet, RoundReset, ScoreChanged};
use crate::session::GameSession;

const INSTRUCTION: &str = "Drag the ball to the basket";

#[derive(Component)]
struct ScoreText;

#[derive(Component)]
struct TimerText;

#[derive(Component)]
struct HudElement;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Welcome), spawn_welcome_screen)
            .add_systems(OnExit(GameState::Welcome), despawn_welcome_screen)
            .add_systems(
                Update,
                handle_welcome_input.run_if(in_state(GameState::Welcome)),
            )
            .add_systems(OnEnter(GameState::Playing), spawn_hud)
            .add_systems(OnExit(GameState::Playing), despawn_hud)
            .add_systems(
                Update,
                (update_hud, show_score_changes, show_round_resets)
                    .after(GameplaySet)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(OnEnter(GameState::GameOver), spawn_game_over_screen)
            .add_systems(OnExit(GameState::GameOver), despawn_hud);
    }
}

fn spawn_welcome_screen(mut commands: Commands) {
    spawn_welcome_screen_text(&mut commands, "Hoop Shot", INSTRUCTION);
}

fn handle_welcome_input(
    mouse_input: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if mouse_input.just_pressed(MouseButton::Left) || touch_input.any_just_pressed() {
        next_state.set(GameState::Playing);
    }
}

fn hud_text(text: String, font_size: f32) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(Color::Srgba(WHITE)),
        HudElement,
    )
}

fn spawn_hud(mut commands: Commands, config: Res<HoopConfig>) {
    commands.spawn((
        hud_text("Score: 0".to_string(), 24.0),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(40.0),
            left: Val::Px(20.0),
            ..default()
        },
        ScoreText,
    ));

    commands.spawn((
        hud_text(format!("Time: {}s", config.round_length), 24.0),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(40.0),
            right: Val::Px(20.0),
            ..default()
        },
        TimerText,
    ));

    commands.spawn((
        hud_text(INSTRUCTION.to_string(), 18.0),
        TextLayout::new_with_justify(JustifyText::Center),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(40.0),
            width: Val::Percent(100.0),
            ..default()
        },
    ));
}

fn despawn_hud(mut commands: Commands, query: Query<Entity, With<HudElement>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

fn update_hud(
    session: Res<GameSession>,
    mut score_text: Query<&mut Text, (With<ScoreText>, Without<TimerText>)>,
    mut timer_text: Query<&mut Text, (With<TimerText>, Without<ScoreText>)>,
) {
    if !session.is_changed() {
        return;
    }
    if let Ok(mut text) = score_text.get_single_mut() {
        text.0 = format!("Score: {}", session.score);
    }
    if let Ok(mut text) = timer_text.get_single_mut() {
        text.0 = format!("Time: {}s", session.timer_seconds);
    }
}

fn show_score_changes(
    mut commands: Commands,
    mut events: EventReader<ScoreChanged>,
    config: Res<HoopConfig>,
) {
    for event in events.read() {
        let position = play_area_to_world(event.position + Vec2::splat(config.ball_size / 2.0));
        let (text, color) = if event.delta > 0 {
            (format!("+{}", event.delta), GREEN)
        } else {
            (event.delta.to_string(), RED)
        };
        spawn_floating_score(&mut commands, position, &text, color);
    }
}

fn show_round_resets(mut commands: Commands, mut events: EventReader<RoundReset>) {
    for event in events.read() {
        spawn_floating_score(
            &mut commands,
            Vec2::ZERO,
            &format!("Round over: {}", event.final_score),
            YELLOW,
        );
    }
}

fn spawn_game_over_screen(mut commands: Commands, session: Option<Res<GameSession>>) {
    let score = session.map_or(0, |session| session.score);

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                ..default()
            },
            BackgroundColor::from(Srgba::new(0.0, 0.0, 0.0, 0.7)),
            HudElement,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(format!("Game Over!\nFinal Score: {score}")),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
                TextLayout::new_with_justify(JustifyText::Center),
                TextColor(Color::Srgba(WHITE)),
            ));
        });
}
