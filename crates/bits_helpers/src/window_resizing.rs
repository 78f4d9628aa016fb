#[cfg(target_arch = "wasm32")]
use bevy::prelude::*;
#[cfg(target_arch = "wasm32")]
use bevy::window::PrimaryWindow;

// WebGPU surfaces larger than this fail to configure on most mobile GPUs.
#[cfg(target_arch = "wasm32")]
const MAX_SURFACE_EXTENT: f32 = 2048.0;

/// Follows the browser's inner size, capped to [`MAX_SURFACE_EXTENT`].
#[cfg(target_arch = "wasm32")]
pub fn handle_browser_resize(mut primary_query: Query<&mut Window, With<PrimaryWindow>>) {
    let Some(browser_window) = web_sys::window() else {
        return;
    };
    let (Ok(inner_width), Ok(inner_height)) =
        (browser_window.inner_width(), browser_window.inner_height())
    else {
        return;
    };
    let (Some(target_width), Some(target_height)) = (inner_width.as_f64(), inner_height.as_f64())
    else {
        return;
    };

    let width = (target_width as f32).min(MAX_SURFACE_EXTENT);
    let height = (target_height as f32).min(MAX_SURFACE_EXTENT);

    for mut window in &mut primary_query {
        if (window.resolution.width() - width).abs() > f32::EPSILON
            || (window.resolution.height() - height).abs() > f32::EPSILON
        {
            window.resolution.set(width, height);
        }
    }
}
