//! The on-disk save record. Field names follow the camelCase JSON layout
//! the desktop app has always written.

pub mod reminders;
pub mod storage;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::components::{ModeKind, SaveSnapshot};
use crate::sim::needs::Needs;
use crate::sim::poop::Poop;

use self::reminders::Reminders;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveData {
    pub pet_state: PetStateData,
    pub user_settings: UserSettingsData,
    pub room_state: RoomStateData,
    pub session: SessionData,
    pub reminders: Reminders,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PetStateData {
    pub position_x: f64,
    pub position_y: f64,
    pub current_state: String,
    pub is_in_room: bool,
    pub hunger: f64,
    pub cleanliness: f64,
    pub happiness: f64,
}

impl Default for PetStateData {
    fn default() -> Self {
        Self {
            position_x: 0.0,
            position_y: 0.0,
            current_state: ModeKind::Idle.label().to_string(),
            is_in_room: false,
            hunger: 100.0,
            cleanliness: 100.0,
            happiness: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettingsData {
    pub house_locked: bool,
    /// Empty until the pet gets a name.
    pub pet_name: String,
    pub sound_enabled: bool,
    pub has_completed_setup: bool,
    /// Decoration slot -> colour, e.g. `"wall" -> "#A0C4FF"`.
    pub decoration_colors: BTreeMap<String, String>,
    pub reminders_enabled: bool,
}

impl Default for UserSettingsData {
    fn default() -> Self {
        Self {
            house_locked: false,
            pet_name: String::new(),
            sound_enabled: true,
            has_completed_setup: false,
            decoration_colors: BTreeMap::new(),
            reminders_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomStateData {
    pub food_bowl_full: bool,
    pub poop_positions: Vec<PoopRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoopRecord {
    pub x: f64,
    pub y: f64,
    pub spawn_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionData {
    pub last_exit_time: DateTime<Utc>,
}

impl Default for SessionData {
    fn default() -> Self {
        Self {
            last_exit_time: Utc::now(),
        }
    }
}

impl SaveData {
    /// The simulation's view of this save. Unknown mode names load as Idle.
    pub fn snapshot(&self) -> SaveSnapshot {
        let pet = &self.pet_state;
        let mode = ModeKind::from_label(&pet.current_state).unwrap_or_else(|| {
            log::warn!("Unknown saved mode {:?}, using Idle", pet.current_state);
            ModeKind::Idle
        });
        SaveSnapshot {
            position: Vec2::new(pet.position_x as f32, pet.position_y as f32),
            mode,
            in_room: pet.is_in_room,
            needs: Needs::new(pet.hunger, pet.cleanliness, pet.happiness),
            food_bowl_full: self.room_state.food_bowl_full,
            poops: self
                .room_state
                .poop_positions
                .iter()
                .map(|p| Poop {
                    position: Vec2::new(p.x as f32, p.y as f32),
                    spawn_time: p.spawn_time,
                })
                .collect(),
            room_locked: self.user_settings.house_locked,
            last_exit: self.session.last_exit_time,
        }
    }

    /// Overwrite the simulation-owned fields. Settings the simulation does
    /// not know about (name, sound, decorations, reminders) are kept.
    pub fn apply_snapshot(&mut self, snapshot: &SaveSnapshot) {
        self.pet_state = PetStateData {
            position_x: f64::from(snapshot.position.x),
            position_y: f64::from(snapshot.position.y),
            current_state: snapshot.mode.label().to_string(),
            is_in_room: snapshot.in_room,
            hunger: snapshot.needs.hunger,
            cleanliness: snapshot.needs.cleanliness,
            happiness: snapshot.needs.happiness,
        };
        self.room_state.food_bowl_full = snapshot.food_bowl_full;
        self.room_state.poop_positions = snapshot
            .poops
            .iter()
            .map(|p| PoopRecord {
                x: f64::from(p.position.x),
                y: f64::from(p.position.y),
                spawn_time: p.spawn_time,
            })
            .collect();
        self.user_settings.house_locked = snapshot.room_locked;
        self.session.last_exit_time = snapshot.last_exit;
    }
}
