use bevy::prelude::*;

/// What the primary pointer (left mouse button or first touch) did this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// The pointer went down at this world position.
    Pressed(Vec2),
    /// The pointer is still down, now at this world position.
    Held(Vec2),
    /// The pointer went up. The position is unknown when a touch was canceled.
    Released(Option<Vec2>),
}

pub fn just_pressed_screen_position(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
) -> Option<Vec2> {
    if button_input.just_pressed(MouseButton::Left) {
        windows.get_single().ok()?.cursor_position()
    } else if touch_input.any_just_pressed() {
        let touch = touch_input.iter_just_pressed().next()?;
        Some(touch.position())
    } else {
        None
    }
}

pub fn pressed_screen_position(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
) -> Option<Vec2> {
    if button_input.pressed(MouseButton::Left) {
        windows.get_single().ok()?.cursor_position()
    } else {
        touch_input.iter().next().map(bevy::input::touch::Touch::position)
    }
}

pub fn just_released_screen_position(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
) -> Option<Vec2> {
    if button_input.just_released(MouseButton::Left) {
        windows.get_single().ok()?.cursor_position()
    } else if touch_input.any_just_released() {
        let touch = touch_input.iter_just_released().next()?;
        Some(touch.position())
    } else {
        None
    }
}

fn screen_to_world(camera: &Query<(&Camera, &GlobalTransform)>, position: Vec2) -> Option<Vec2> {
    let (camera, camera_transform) = camera.get_single().ok()?;

    camera
        .viewport_to_world(camera_transform, position)
        .map(|ray| ray.origin.truncate())
        .ok()
}

pub fn just_pressed_world_position(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
    camera: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    let position = just_pressed_screen_position(button_input, touch_input, windows)?;
    screen_to_world(camera, position)
}

pub fn pressed_world_position(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
    camera: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    let position = pressed_screen_position(button_input, touch_input, windows)?;
    screen_to_world(camera, position)
}

pub fn just_released_world_position(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
    camera: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    let position = just_released_screen_position(button_input, touch_input, windows)?;
    screen_to_world(camera, position)
}

/// Folds mouse and touch input into a single pointer lifecycle event.
///
/// A press and a release landing in the same frame are reported as the release,
/// so a drag can never be left open without a pointer down.
pub fn pointer_world_event(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
    camera: &Query<(&Camera, &GlobalTransform)>,
) -> Option<PointerEvent> {
    if button_input.just_released(MouseButton::Left)
        || touch_input.any_just_released()
        || touch_input.any_just_canceled()
    {
        let position = just_released_world_position(button_input, touch_input, windows, camera);
        return Some(PointerEvent::Released(position));
    }

    if let Some(position) = just_pressed_world_position(button_input, touch_input, windows, camera)
    {
        return Some(PointerEvent::Pressed(position));
    }

    pressed_world_position(button_input, touch_input, windows, camera).map(PointerEvent::Held)
}
