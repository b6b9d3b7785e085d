//! Camera framing (внутри камеры / снаружи)

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum Framing {
    #[default]
    Inside,
    Outside,
}

/// Текущий кадр камеры сцены
#[derive(Resource, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Resource)]
pub struct CameraFraming {
    pub framing: Framing,
}

impl CameraFraming {
    pub fn reset_inside(&mut self) {
        self.framing = Framing::Inside;
    }

    pub fn set_outside(&mut self) {
        self.framing = Framing::Outside;
    }

    pub fn is_inside(&self) -> bool {
        self.framing == Framing::Inside
    }
}
