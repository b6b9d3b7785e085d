//! Message board: одна строка сообщения над сценой

use bevy::prelude::*;

use crate::guard::ports::{MessageDuration, MessageSurface};

/// Текущее сообщение
///
/// Timed сообщение скрывается по истечении, только если его не заменили.
/// Новый show() сбрасывает таймер.
#[derive(Resource, Debug, Clone, Default)]
pub struct MessageBoard {
    text: Option<String>,
    remaining: Option<f32>,
}

impl MessageBoard {
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.text.is_some()
    }

    /// Продвигает таймер timed сообщения
    pub fn tick(&mut self, delta: f32) {
        let Some(remaining) = self.remaining.as_mut() else {
            return;
        };

        *remaining -= delta;
        if *remaining <= 0.0 {
            self.hide();
        }
    }
}

impl MessageSurface for MessageBoard {
    fn show(&mut self, text: &str, duration: MessageDuration) {
        crate::log(&format!("💬 Message: \"{}\" ({:?})", text, duration));
        self.text = Some(text.to_string());
        self.remaining = match duration {
            MessageDuration::Timed(seconds) => Some(seconds.max(0.0)),
            MessageDuration::Persistent => None,
        };
    }

    fn hide(&mut self) {
        self.text = None;
        self.remaining = None;
    }
}

/// Система: скрытие timed сообщений
pub fn expire_messages(mut board: ResMut<MessageBoard>, time: Res<Time<Fixed>>) {
    if board.remaining.is_some() {
        board.tick(time.delta_secs());
    }
}
