#![allow(
    clippy::allow_attributes,
    reason = "allow attributes are needed for wasm"
)]

use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy::render::RenderPlugin;
use bevy::render::settings::{WgpuSettings, WgpuSettingsPriority};
use bevy::window::{WindowMode, WindowResolution};

#[cfg(target_arch = "wasm32")]
use crate::RibbitCommunicationPlugin;
use crate::RibbitMessageHandler;
#[cfg(target_arch = "wasm32")]
use crate::window_resizing::handle_browser_resize;

// typical smartphone screen ratio (9:16)
pub const WINDOW_WIDTH: f32 = 360.0;
pub const WINDOW_HEIGHT: f32 = 640.0;

/// Size of the play area every bit lays itself out in.
pub const PLAY_AREA: Vec2 = Vec2::new(WINDOW_WIDTH, WINDOW_HEIGHT);

/// Converts a play-area position (origin top-left, y down) to a world position
/// (origin at the center of the screen, y up).
pub fn play_area_to_world(position: Vec2) -> Vec2 {
    Vec2::new(position.x - PLAY_AREA.x / 2.0, PLAY_AREA.y / 2.0 - position.y)
}

/// Inverse of [`play_area_to_world`].
pub fn world_to_play_area(position: Vec2) -> Vec2 {
    Vec2::new(position.x + PLAY_AREA.x / 2.0, PLAY_AREA.y / 2.0 - position.y)
}

// Creates a Bevy app with the window, asset and render settings every bit shares,
// plus the host communication when running in the browser.
#[allow(unused_variables, reason = "bit_version is used in wasm")]
#[allow(clippy::extra_unused_type_parameters)]
pub fn get_default_app<T: RibbitMessageHandler>(bit_name: &str, bit_version: &str) -> App {
    let mut app = App::new();

    let asset_plugin = bevy::asset::AssetPlugin {
        mode: bevy::asset::AssetMode::Unprocessed,

        #[cfg(not(target_arch = "wasm32"))]
        file_path: "assets".to_string(),
        #[cfg(target_arch = "wasm32")]
        file_path: format!("bits/{bit_name}-{bit_version}/assets"),
        processed_file_path: "imported_assets/Default".to_string(),
        watch_for_changes_override: None,
        meta_check: AssetMetaCheck::Never,
    };

    let window_plugin = WindowPlugin {
        primary_window: Some(Window {
            title: bit_name.to_string(),
            present_mode: bevy::window::PresentMode::Fifo,
            resolution: WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT),
            canvas: Some("#bit".into()),
            fit_canvas_to_parent: true,
            mode: WindowMode::Windowed,
            // Keep browser shortcuts (F5, Ctrl+R) working.
            prevent_default_event_handling: false,
            ..default()
        }),
        ..default()
    };

    let render_plugin = RenderPlugin {
        render_creation: bevy::render::settings::RenderCreation::Automatic(WgpuSettings {
            backends: Some(
                bevy::render::settings::Backends::BROWSER_WEBGPU
                    | bevy::render::settings::Backends::GL,
            ),
            power_preference: bevy::render::settings::PowerPreference::HighPerformance,
            priority: WgpuSettingsPriority::Functionality,
            ..Default::default()
        }),
        ..Default::default()
    };

    app.add_plugins(
        DefaultPlugins
            .set(asset_plugin)
            .set(window_plugin)
            .set(render_plugin),
    );

    // Saves battery on mobile: https://github.com/aevyrie/bevy_framepace
    app.add_plugins(bevy_framepace::FramepacePlugin);

    app.insert_resource(ClearColor(Color::BLACK));

    #[cfg(target_arch = "wasm32")]
    {
        app.add_plugins(RibbitCommunicationPlugin::<T>::default());
        app.add_systems(PreUpdate, handle_browser_resize);
    }

    app
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_area_corners_map_to_world_corners() {
        assert_eq!(
            play_area_to_world(Vec2::ZERO),
            Vec2::new(-WINDOW_WIDTH / 2.0, WINDOW_HEIGHT / 2.0),
            "top-left of the play area is the top-left of the world"
        );
        assert_eq!(
            play_area_to_world(PLAY_AREA),
            Vec2::new(WINDOW_WIDTH / 2.0, -WINDOW_HEIGHT / 2.0),
            "bottom-right of the play area is the bottom-right of the world"
        );
    }

    #[test]
    fn world_conversion_round_trips() {
        let position = Vec2::new(-42.5, 700.0);
        assert_eq!(
            world_to_play_area(play_area_to_world(position)),
            position,
            "off-screen positions convert back unchanged"
        );
    }
}
