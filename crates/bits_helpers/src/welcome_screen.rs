use bevy::prelude::*;

#[derive(Component)]
pub struct WelcomeScreenElement;

/// Spawns a full-screen welcome card: the bit title, a one-line instruction
/// and a "Tap to start" prompt.
pub fn spawn_welcome_screen_text(commands: &mut Commands, title: &str, instruction: &str) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::SpaceEvenly,
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(Color::BLACK),
            WelcomeScreenElement,
        ))
        .with_children(|parent| {
            for (text, font_size) in [(title, 40.0), (instruction, 24.0), ("Tap to start", 30.0)] {
                parent.spawn((
                    Text::new(text),
                    TextFont {
                        font_size,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    TextLayout::new_with_justify(JustifyText::Center),
                ));
            }
        });
}

pub fn despawn_welcome_screen(
    mut commands: Commands,
    welcome_elements: Query<Entity, With<WelcomeScreenElement>>,
) {
    for entity in welcome_elements.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
