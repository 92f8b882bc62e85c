use bevy::{
    input::mouse::{AccumulatedMouseMotion, MouseScrollUnit, MouseWheel},
    prelude::*,
};
use bevy_egui::EguiContexts;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(PostUpdate, camera_control_system);
    }
}

fn spawn_camera(mut commands: Commands, mut clearcolor: ResMut<ClearColor>) {
    *clearcolor = ClearColor(Color::BLACK);

    let orbit = OrbitCamera::looking_from(Vec3::splat(3.0));
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 75f32.to_radians(),
            near: 0.1,
            far: 100.0,
            ..default()
        }),
        orbit.transform(),
        orbit,
    ));
}

/// Damped orbit around `target`. Drag and scroll input feed velocities that decay each
/// frame, so the camera glides to a stop instead of halting with the pointer.
#[derive(Component, Clone, Debug)]
pub struct OrbitCamera {
    pub target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    smooth_zoom_buffer: f32,
}

impl OrbitCamera {
    const ROTATE_SPEED: f32 = 0.005;
    // fraction of velocity kept per 60 Hz frame
    const DAMPING: f32 = 0.9;
    const MIN_DISTANCE: f32 = 0.5;
    const MAX_DISTANCE: f32 = 50.0;
    const PITCH_LIMIT: f32 = 1.55;

    pub fn looking_from(eye: Vec3) -> Self {
        let distance = eye.length();
        Self {
            target: Vec3::ZERO,
            yaw: eye.x.atan2(eye.z),
            pitch: (eye.y / distance).asin(),
            distance,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            smooth_zoom_buffer: 0.0,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, -self.pitch, 0.0);
        self.target + rotation * Vec3::Z * self.distance
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(self.target, Vec3::Y)
    }

    fn push(&mut self, drag: Vec2) {
        self.yaw_velocity -= drag.x * Self::ROTATE_SPEED;
        self.pitch_velocity += drag.y * Self::ROTATE_SPEED;
    }

    fn advance(&mut self, delta_secs: f32) {
        self.yaw += self.yaw_velocity;
        self.pitch = (self.pitch + self.pitch_velocity).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);

        let keep = Self::DAMPING.powf(delta_secs * 60.0);
        self.yaw_velocity *= keep;
        self.pitch_velocity *= keep;

        // scroll delta is cached to a buffer and bled into the distance over a few frames
        let smooth_zoom_min = 0.001f32;
        let smooth_zoom_factor = 0.2f32;
        let smooth_zoom_amount = if self.smooth_zoom_buffer < 0.0 {
            f32::min(
                self.smooth_zoom_buffer * smooth_zoom_factor,
                (-smooth_zoom_min).max(self.smooth_zoom_buffer),
            )
        } else {
            f32::max(
                self.smooth_zoom_buffer * smooth_zoom_factor,
                smooth_zoom_min.min(self.smooth_zoom_buffer),
            )
        };
        self.smooth_zoom_buffer -= smooth_zoom_amount;
        self.distance = (self.distance * (1.0 - smooth_zoom_amount))
            .clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }
}

fn camera_control_system(
    mut query: Query<(&mut Transform, &mut OrbitCamera)>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mut scroll_evr: EventReader<MouseWheel>,
    mut contexts: EguiContexts,
    time: Res<Time>,
) {
    let ui_has_pointer = contexts
        .try_ctx_mut()
        .is_some_and(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area());

    let Ok((mut transform, mut orbit)) = query.single_mut() else {
        return;
    };

    for ev in scroll_evr.read() {
        if ui_has_pointer {
            continue;
        }
        match ev.unit {
            MouseScrollUnit::Line => orbit.smooth_zoom_buffer += ev.y * 0.1,
            MouseScrollUnit::Pixel => orbit.smooth_zoom_buffer += ev.y * 0.002,
        }
    }

    if mouse_buttons.pressed(MouseButton::Left) && !ui_has_pointer {
        orbit.push(mouse_motion.delta);
    }

    orbit.advance(time.delta_secs());
    *transform = orbit.transform();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_where_it_was_placed() {
        let orbit = OrbitCamera::looking_from(Vec3::splat(3.0));
        assert!(orbit.eye().distance(Vec3::splat(3.0)) < 1e-4);
    }

    #[test]
    fn drag_velocity_decays() {
        let mut orbit = OrbitCamera::looking_from(Vec3::splat(3.0));
        orbit.push(vec2(100.0, 0.0));
        let yaw = orbit.yaw;

        for _ in 0..600 {
            orbit.advance(1.0 / 60.0);
        }
        assert!(orbit.yaw != yaw);
        assert!(orbit.yaw_velocity.abs() < 1e-6);
    }

    #[test]
    fn zoom_buffer_drains_and_distance_stays_bounded() {
        let mut orbit = OrbitCamera::looking_from(Vec3::splat(3.0));
        orbit.smooth_zoom_buffer = 50.0;
        for _ in 0..1000 {
            orbit.advance(1.0 / 60.0);
        }
        assert!(orbit.smooth_zoom_buffer.abs() < 1e-3);
        assert!(orbit.distance >= OrbitCamera::MIN_DISTANCE);
    }
}
