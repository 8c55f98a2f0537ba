// Last known narrative objective per level.
//
// Set by the first story fetch (or an explicit caller supply) and read by
// every subsequent challenge request for that level, so generation stays
// thematically consistent across a playthrough.

use parking_lot::Mutex;

use crate::config::{clamp_level, LEVEL_SLOTS, MIN_LEVEL};

pub struct ObjectiveStore {
    slots: Mutex<[Option<String>; LEVEL_SLOTS]>,
}

impl ObjectiveStore {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(std::array::from_fn(|_| None)),
        }
    }

    pub fn get(&self, level: u32) -> Option<String> {
        self.slots.lock()[Self::index(level)].clone()
    }

    /// Always overwrites. No expiry.
    pub fn set(&self, level: u32, objective: &str) {
        self.slots.lock()[Self::index(level)] = Some(objective.to_string());
    }

    fn index(level: u32) -> usize {
        (clamp_level(level) - MIN_LEVEL) as usize
    }
}

impl Default for ObjectiveStore {
    fn default() -> Self {
        Self::new()
    }
}
