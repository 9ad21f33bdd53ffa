//! A/B/C/D settings slots.
//!
//! Four independent in-memory snapshots of the full parameter set, used
//! to compare alternative settings while listening. Recalling a slot
//! overwrites every parameter with the stored raw values, so a
//! store/recall round trip is bit-for-bit exact.

use std::fmt;
use std::str::FromStr;

use crate::error::SessionError;
use crate::params::ParamMap;

/// One of the four settings slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotId {
    /// Slot A
    A,
    /// Slot B
    B,
    /// Slot C
    C,
    /// Slot D
    D,
}

impl SlotId {
    /// All slots in display order.
    pub const ALL: [SlotId; 4] = [SlotId::A, SlotId::B, SlotId::C, SlotId::D];

    /// Display label.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SlotId::A => "A",
            SlotId::B => "B",
            SlotId::C => "C",
            SlotId::D => "D",
        }
    }

    const fn index(self) -> usize {
        match self {
            SlotId::A => 0,
            SlotId::B => 1,
            SlotId::C => 2,
            SlotId::D => 3,
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotId {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "a" | "A" => Ok(SlotId::A),
            "b" | "B" => Ok(SlotId::B),
            "c" | "C" => Ok(SlotId::C),
            "d" | "D" => Ok(SlotId::D),
            other => Err(SessionError::UnknownSlot(other.to_string())),
        }
    }
}

/// The four settings slots. Empty until stored into.
#[derive(Debug, Clone, Default)]
pub struct SlotBank {
    slots: [Option<ParamMap>; 4],
}

impl SlotBank {
    /// Creates a bank with all slots empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a snapshot, replacing any previous content of the slot.
    pub fn store(&mut self, id: SlotId, snapshot: ParamMap) {
        self.slots[id.index()] = Some(snapshot);
    }

    /// Returns the stored snapshot, or `None` for an empty slot.
    pub fn recall(&self, id: SlotId) -> Option<&ParamMap> {
        self.slots[id.index()].as_ref()
    }

    /// Empties a slot. Returns the snapshot it held, if any.
    pub fn clear(&mut self, id: SlotId) -> Option<ParamMap> {
        self.slots[id.index()].take()
    }

    /// Whether the slot holds a snapshot.
    pub fn is_stored(&self, id: SlotId) -> bool {
        self.slots[id.index()].is_some()
    }

    /// Copies one slot's snapshot to another. Returns `false` when the
    /// source slot is empty.
    pub fn copy(&mut self, from: SlotId, to: SlotId) -> bool {
        match self.slots[from.index()].clone() {
            Some(snapshot) => {
                self.slots[to.index()] = Some(snapshot);
                true
            }
            None => false,
        }
    }
}
