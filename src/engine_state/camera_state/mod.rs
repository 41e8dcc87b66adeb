//! # Camera State Management
//!
//! This module handles all camera-related functionality including:
//! - Camera position and orientation tracking
//! - Player input processing for camera control
//! - Following the player's eye position
//!
//! ## Core Components
//! - `Camera`: Represents the camera's position and orientation in 3D space
//! - `CameraController`: Handles player input between updates

use camera::{Camera, CameraController};
use cgmath::{Deg, Point3};

use super::{physics::MovementIntent, PlayerAction};

pub mod camera;

/// Mouse look sensitivity applied to raw rotation deltas.
const LOOK_SENSITIVITY: f32 = 0.4;

/// Manages the camera and the input that steers it.
///
/// # Fields
/// - `camera`: The current camera state (position, orientation)
/// - `camera_controller`: Collects player input between updates
pub struct CameraState {
    /// The current camera position and orientation
    pub camera: Camera,
    /// Handles player input and camera movement
    pub camera_controller: CameraController,
}

impl CameraState {
    /// Creates a camera at the given eye position looking along negative Z.
    pub fn new(eye: Point3<f32>) -> Self {
        CameraState {
            camera: Camera::new(eye, Deg(-90.0), Deg(0.0)),
            camera_controller: CameraController::new(LOOK_SENSITIVITY),
        }
    }

    /// Processes player input actions and updates the camera controller state.
    pub fn intake_actions(&mut self, actions: &PlayerAction) {
        self.camera_controller.intake_actions(actions);
    }

    /// Applies pending rotation and returns the movement the player asked for.
    pub fn update(&mut self, dt: f32) -> MovementIntent {
        if self.camera_controller.has_updates() {
            self.camera
                .get_controller_updates_and_reset_controller(&mut self.camera_controller, dt)
        } else {
            MovementIntent::default()
        }
    }

    /// Moves the camera to the player's eyes.
    pub fn follow(&mut self, eye: Point3<f32>) {
        self.camera.position = eye;
    }
}
