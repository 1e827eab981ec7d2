//! Library inventory types: slots, volumes and the status snapshot.

use std::fmt;

use serde::Serialize;

/// Kind of element inside the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SlotType {
    /// Data transfer element (a tape drive).
    DataTransfer,
    /// Storage element.
    Storage,
    /// Import/export (mail) element.
    Mail,
}

impl fmt::Display for SlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotType::DataTransfer => "DataTransferSlot",
            SlotType::Storage => "StorageSlot",
            SlotType::Mail => "MailSlot",
        };
        f.write_str(name)
    }
}

/// A tape cartridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Volume {
    /// Volume tag (barcode) of the tape.
    pub serial: String,
    /// Storage or mail slot the volume returns to when unloaded without an
    /// explicit destination.
    pub home: usize,
}

impl Volume {
    pub fn new(serial: impl Into<String>, home: usize) -> Self {
        Self {
            serial: serial.into(),
            home,
        }
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serial)
    }
}

/// A numbered element of the library, possibly holding a volume.
///
/// Drives are numbered from 0; storage and mail slots from 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub num: usize,
    #[serde(rename = "type")]
    pub slot_type: SlotType,
    pub volume: Option<Volume>,
}

impl Slot {
    /// Create an empty slot.
    pub fn empty(num: usize, slot_type: SlotType) -> Self {
        Self {
            num,
            slot_type,
            volume: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.volume.is_none()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.volume {
            Some(vol) => write!(f, "{}[{}]: {}", self.slot_type, self.num, vol),
            None => write!(f, "{}[{}]: <none>", self.slot_type, self.num),
        }
    }
}

/// Snapshot of the whole library as reported by one status query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    /// Changer identifier from the report header (usually the device path).
    pub changer: String,
    pub max_drives: usize,
    /// Storage plus mail slots.
    pub num_slots: usize,
    pub num_storage_slots: usize,
    pub num_mail_slots: usize,
    pub drives: Vec<Slot>,
    /// Storage slots followed by mail slots.
    pub slots: Vec<Slot>,
}

impl Status {
    /// Look up a drive by its element number.
    pub fn drive(&self, num: usize) -> Option<&Slot> {
        self.drives.iter().find(|s| s.num == num)
    }

    /// Look up a storage or mail slot by its element number.
    pub fn slot(&self, num: usize) -> Option<&Slot> {
        self.slots.iter().find(|s| s.num == num)
    }

    pub fn storage_slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots
            .iter()
            .filter(|s| s.slot_type == SlotType::Storage)
    }

    pub fn mail_slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|s| s.slot_type == SlotType::Mail)
    }

    /// Find the drive or slot currently holding the volume with `serial`.
    pub fn find_volume(&self, serial: &str) -> Option<&Slot> {
        self.drives
            .iter()
            .chain(self.slots.iter())
            .find(|s| s.volume.as_ref().is_some_and(|v| v.serial == serial))
    }

    /// Serials of every volume in the library, drives first.
    pub fn serials(&self) -> Vec<&str> {
        self.drives
            .iter()
            .chain(self.slots.iter())
            .filter_map(|s| s.volume.as_ref())
            .map(|v| v.serial.as_str())
            .collect()
    }
}
