//! Animation компоненты: текущий clip и длины clip'ов
//!
//! Headless симуляция не проигрывает кадры. Player хранит имя текущего
//! clip'а и знает его длину, этого достаточно для таймингов Sleep.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::guard::ports::Animator;

/// Clip'ы, которые умеет играть guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum AnimationClip {
    Idle,
    Patrol,
    FallAsleep,
    WakeUp,
}

/// Длины clip'ов в секундах (из animation import settings)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipLengths {
    pub idle: f32,
    pub patrol: f32,
    pub fall_asleep: f32,
    pub wake_up: f32,
}

impl Default for ClipLengths {
    fn default() -> Self {
        Self {
            idle: 2.0,
            patrol: 1.0,
            fall_asleep: 1.0,
            wake_up: 1.0,
        }
    }
}

impl ClipLengths {
    pub fn of(&self, clip: AnimationClip) -> f32 {
        match clip {
            AnimationClip::Idle => self.idle,
            AnimationClip::Patrol => self.patrol,
            AnimationClip::FallAsleep => self.fall_asleep,
            AnimationClip::WakeUp => self.wake_up,
        }
    }
}

/// Animation player guard'а
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct AnimationPlayer {
    pub current: AnimationClip,
    pub lengths: ClipLengths,
}

impl Default for AnimationPlayer {
    fn default() -> Self {
        Self {
            current: AnimationClip::Idle,
            lengths: ClipLengths::default(),
        }
    }
}

impl AnimationPlayer {
    pub fn with_lengths(lengths: ClipLengths) -> Self {
        Self {
            current: AnimationClip::Idle,
            lengths,
        }
    }
}

impl Animator for AnimationPlayer {
    fn play(&mut self, clip: AnimationClip) {
        self.current = clip;
    }

    fn current_state_is(&self, clip: AnimationClip) -> bool {
        self.current == clip
    }

    fn current_state_length(&self) -> f32 {
        self.lengths.of(self.current)
    }
}
