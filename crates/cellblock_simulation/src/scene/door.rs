//! Двери камер
//!
//! Состояние двери определяет её detection layer:
//! - открыта → Target (guard замечает открытую дверь)
//! - закрыта → Obstacle (блокирует line of sight)
//! - suppressed (guard уже среагировал) → Inert
//!
//! Двойные двери связаны через [`LinkedDoor`]. Кто меняет дверь, пишет
//! [`DoorChanged`], `propagate_linked_doors` зеркалит изменение на partner'а.

use bevy::prelude::*;

use crate::components::DetectionLayer;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Door {
    pub is_open: bool,
    pub is_locked: bool,
    /// Дверь невидима для sensor'ов до следующего закрытия
    pub suppressed: bool,
}

impl Default for Door {
    fn default() -> Self {
        Self::locked()
    }
}

impl Door {
    pub fn locked() -> Self {
        Self {
            is_open: false,
            is_locked: true,
            suppressed: false,
        }
    }

    pub fn unlocked() -> Self {
        Self {
            is_locked: false,
            ..Self::locked()
        }
    }

    /// Открывает дверь. Запертая дверь не открывается.
    pub fn open(&mut self) -> bool {
        if self.is_locked {
            return false;
        }
        self.is_open = true;
        true
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn unlock(&mut self) {
        self.is_locked = false;
    }

    /// Закрывает (и опционально запирает) без анимации
    pub fn close_immediately(&mut self, lock: bool) {
        self.is_open = false;
        self.is_locked = lock;
        self.suppressed = false;
    }

    pub fn suppress(&mut self) {
        self.suppressed = true;
    }

    pub fn detection_layer(&self) -> DetectionLayer {
        if self.suppressed {
            DetectionLayer::Inert
        } else if self.is_open {
            DetectionLayer::Target
        } else {
            DetectionLayer::Obstacle
        }
    }
}

/// Вторая створка двойной двери
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct LinkedDoor {
    pub partner: Entity,
}

/// Дверь изменилась (open/close/lock)
#[derive(Event, Debug, Clone, Copy)]
pub struct DoorChanged {
    pub door: Entity,
}

/// Mediator двойных дверей
pub struct DoorLink;

impl DoorLink {
    /// Переносит open/closed и unlock с `source` на `mirror`.
    /// Lock не переносится. Возвращает true, если mirror изменился.
    pub fn propagate(source: &Door, mirror: &mut Door) -> bool {
        let mut changed = false;

        if !source.is_locked && mirror.is_locked {
            mirror.unlock();
            changed = true;
        }

        if mirror.is_open != source.is_open {
            if source.is_open {
                // Source может быть открыт при запертом mirror'е
                mirror.is_open = true;
            } else {
                mirror.close();
            }
            changed = true;
        }

        changed
    }
}

/// Система: DoorChanged → синхронизация partner'а
pub fn propagate_linked_doors(mut changes: EventReader<DoorChanged>, mut doors: Query<(&mut Door, Option<&LinkedDoor>)>) {
    for change in changes.read() {
        let Ok((source, link)) = doors.get(change.door) else {
            continue;
        };
        let Some(link) = link.copied() else {
            continue;
        };
        let source = *source;

        let Ok((mut mirror, _)) = doors.get_mut(link.partner) else {
            crate::log_warning(&format!("Door {:?}: linked partner {:?} not found", change.door, link.partner));
            continue;
        };

        // Пишем через копию, чтобы не трогать change detection без изменений
        let mut updated = *mirror;
        if DoorLink::propagate(&source, &mut updated) {
            *mirror = updated;
            crate::log(&format!(
                "🚪 Door {:?} → partner {:?} (open: {}, locked: {})",
                change.door, link.partner, updated.is_open, updated.is_locked
            ));
        }
    }
}

/// Система: detection layer следует за состоянием двери
pub fn sync_door_layers(mut doors: Query<(&Door, &mut DetectionLayer), Changed<Door>>) {
    for (door, mut layer) in doors.iter_mut() {
        let next = door.detection_layer();
        if *layer != next {
            *layer = next;
        }
    }
}
