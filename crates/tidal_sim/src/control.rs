use bevy::prelude::*;

use super::gesture::GestureUpdate;

/// Hand-driven control signal, written by the gesture link and read every frame.
/// A plain last-writer-wins pair; the two fields may briefly disagree.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ControlState {
    /// Smoothed openness in [0, 1]
    pub openness: f32,
    /// Display only; the deformation never reads it
    pub hand_detected: bool,
}

impl ControlState {
    pub fn new(openness: f32) -> Self {
        Self {
            openness: openness.clamp(0.0, 1.0),
            hand_detected: false,
        }
    }

    /// Blend an incoming sample into the current openness.
    /// `weight` is the share of the new sample (0.3 keeps 70% of the old value).
    pub fn apply(&mut self, update: &GestureUpdate, weight: f32) {
        let blended = self.openness * (1.0 - weight) + update.openness * weight;
        self.openness = blended.clamp(0.0, 1.0);
        self.hand_detected = update.hand_detected;
    }

    /// Manual adjustment, clamped to [0, 1]
    pub fn nudge(&mut self, delta: f32) {
        self.openness = (self.openness + delta).clamp(0.0, 1.0);
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new(0.5)
    }
}
