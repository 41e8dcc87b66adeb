//! # Camera Implementation
//!
//! This module contains the core camera implementation including:
//! - Camera representation and orientation
//! - Forward and walking vectors derived from yaw and pitch
//! - Camera controller for input processing
//!
//! ## Key Components
//! - `Camera`: Represents the camera's position and orientation in 3D space
//! - `CameraController`: Collects player input between updates

use cgmath::*;
use std::f32::consts::FRAC_PI_2;

use crate::engine_state::{physics::MovementIntent, PlayerAction};

/// Safe limit for pitch to prevent gimbal lock
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// Represents a first-person camera in 3D space.
///
/// # Fields
/// - `position`: The camera's position in world space
/// - `yaw`: Horizontal rotation (around Y axis) in radians
/// - `pitch`: Vertical rotation (around X axis) in radians
/// - `forward_vec`: Normalized vector pointing where the camera looks
/// - `right_vec`: Normalized horizontal vector pointing to the camera's right
#[derive(Debug, Clone)]
pub struct Camera {
    /// The camera's position in world space
    pub position: Point3<f32>,
    /// Horizontal rotation (around Y axis) in radians
    pub yaw: Rad<f32>,
    /// Vertical rotation (around X axis) in radians
    pub pitch: Rad<f32>,
    forward_vec: Vector3<f32>,
    right_vec: Vector3<f32>,
}

impl Camera {
    /// Creates a new camera with the specified position and orientation.
    ///
    /// # Arguments
    /// * `position` - Initial position of the camera in world space. Can be any type that converts to `Point3<f32>`.
    /// * `yaw` - Initial yaw (horizontal rotation around Y axis). Can be any type that converts to `Rad<f32>`.
    /// * `pitch` - Initial pitch (vertical rotation around X axis). Can be any type that converts to `Rad<f32>`.
    ///
    /// # Example
    /// ```rust
    /// use cgmath::{Deg, InnerSpace, Point3};
    /// use voxel_world::engine_state::camera_state::camera::Camera;
    ///
    /// let camera = Camera::new(
    ///     Point3::new(0.0, 0.0, 0.0),  // Position at origin
    ///     Deg(-90.0),                   // Facing along negative Z
    ///     Deg(0.0),                     // Level horizon
    /// );
    /// assert!((camera.forward().z + 1.0).abs() < 1e-6);
    /// ```
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        let mut camera = Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
            forward_vec: Vector3::unit_x(),
            right_vec: Vector3::unit_z(),
        };
        camera.update_vectors();
        camera
    }

    /// Gets the camera's forward direction vector.
    ///
    /// # Returns
    /// A normalized 3D vector representing the camera's forward direction
    pub fn forward(&self) -> Vector3<f32> {
        self.forward_vec
    }

    /// Horizontal forward and right vectors, used for walking.
    pub fn horizontal_basis(&self) -> (Vector3<f32>, Vector3<f32>) {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        (
            Vector3::new(yaw_cos, 0.0, yaw_sin).normalize(),
            self.right_vec,
        )
    }

    /// Applies pending rotation from the controller, then resets it.
    ///
    /// # Returns
    /// The walking and jumping the controller collected, relative to the new orientation.
    pub fn get_controller_updates_and_reset_controller(
        &mut self,
        controller: &mut CameraController,
        dt: f32,
    ) -> MovementIntent {
        // Rotate
        self.yaw += Rad(controller.rotate_horizontal) * controller.sensitivity * dt;
        self.pitch += Rad(-controller.rotate_vertical) * controller.sensitivity * dt;

        // Clamp pitch to prevent gimbal lock
        if self.pitch < -Rad(SAFE_FRAC_PI_2) {
            self.pitch = -Rad(SAFE_FRAC_PI_2);
        } else if self.pitch > Rad(SAFE_FRAC_PI_2) {
            self.pitch = Rad(SAFE_FRAC_PI_2);
        }
        self.update_vectors();

        let (forward, right) = self.horizontal_basis();
        let wish_direction = forward * (controller.amount_forward - controller.amount_backward)
            + right * (controller.amount_right - controller.amount_left);
        let intent = MovementIntent {
            wish_direction,
            jump: controller.jump,
        };

        // Reset controller state
        controller.rotate_horizontal = 0.0;
        controller.rotate_vertical = 0.0;
        controller.amount_left = 0.0;
        controller.amount_right = 0.0;
        controller.amount_forward = 0.0;
        controller.amount_backward = 0.0;
        controller.jump = false;

        intent
    }

    fn update_vectors(&mut self) {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();

        self.forward_vec = Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin).normalize();
        self.right_vec = Vector3::new(-yaw_sin, 0.0, yaw_cos).normalize();
    }
}

/// Collects movement and rotation input between camera updates.
#[derive(Debug)]
pub struct CameraController {
    // Movement amounts (normalized)
    amount_left: f32,
    amount_right: f32,
    amount_forward: f32,
    amount_backward: f32,
    jump: bool,

    // Rotation amounts (in radians)
    rotate_horizontal: f32,
    rotate_vertical: f32,

    // Configuration
    sensitivity: f32,
}

impl CameraController {
    /// Creates a new camera controller with the given mouse sensitivity.
    pub fn new(sensitivity: f32) -> Self {
        Self {
            amount_left: 0.0,
            amount_right: 0.0,
            amount_forward: 0.0,
            amount_backward: 0.0,
            jump: false,
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
            sensitivity,
        }
    }

    /// Processes player actions and updates controller state accordingly.
    ///
    /// # Arguments
    /// * `actions` - The player's input actions to process
    pub fn intake_actions(&mut self, actions: &PlayerAction) {
        if actions.move_forward {
            self.amount_forward = 1.0;
        }
        if actions.move_backward {
            self.amount_backward = 1.0;
        }
        if actions.move_left {
            self.amount_left = 1.0;
        }
        if actions.move_right {
            self.amount_right = 1.0;
        }
        if actions.jump {
            self.jump = true;
        }
        if let Some((delta_x, delta_y)) = actions.rotate_view {
            // Deltas that do not fit an f32 would turn the orientation into NaN.
            let usable = |delta: f64| delta.abs() > 0.5 && (delta as f32).is_finite();
            if usable(delta_x) {
                self.rotate_horizontal = delta_x as f32;
            }
            if usable(delta_y) {
                self.rotate_vertical = delta_y as f32;
            }
        }
    }

    /// Checks if there are any pending updates that would affect the camera or player.
    pub fn has_updates(&self) -> bool {
        self.amount_forward > 0.0
            || self.amount_backward > 0.0
            || self.amount_left > 0.0
            || self.amount_right > 0.0
            || self.jump
            || self.rotate_horizontal != 0.0
            || self.rotate_vertical != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(0.0), Deg(0.0));
        let mut controller = CameraController::new(1.0);
        controller.intake_actions(&PlayerAction {
            rotate_view: Some((0.0, -1000.0)),
            ..Default::default()
        });
        camera.get_controller_updates_and_reset_controller(&mut controller, 1.0);
        assert!(camera.pitch.0 <= SAFE_FRAC_PI_2);
        assert!(camera.forward().y > 0.99);
        assert!(!controller.has_updates());
    }

    #[test]
    fn non_finite_mouse_deltas_are_ignored() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(-90.0), Deg(0.0));
        let mut controller = CameraController::new(1.0);
        for delta in [(f64::MAX, 0.0), (f64::NAN, f64::INFINITY), (0.0, f64::NEG_INFINITY)] {
            controller.intake_actions(&PlayerAction {
                rotate_view: Some(delta),
                ..Default::default()
            });
        }
        assert!(!controller.has_updates());

        controller.intake_actions(&PlayerAction {
            rotate_view: Some((f64::MAX, 2.0)),
            ..Default::default()
        });
        camera.get_controller_updates_and_reset_controller(&mut controller, 1.0 / 60.0);
        let forward = camera.forward();
        assert!(forward.x.is_finite() && forward.y.is_finite() && forward.z.is_finite());
        assert!(camera.yaw.0.is_finite());
    }

    #[test]
    fn walking_intent_follows_yaw() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(-90.0), Deg(30.0));
        let mut controller = CameraController::new(1.0);
        controller.intake_actions(&PlayerAction {
            move_forward: true,
            jump: true,
            ..Default::default()
        });
        let intent = camera.get_controller_updates_and_reset_controller(&mut controller, 1.0 / 60.0);
        assert!(intent.jump);
        assert!(intent.wish_direction.y.abs() < 1e-6);
        assert!((intent.wish_direction.z + 1.0).abs() < 1e-5);
    }
}
