//! In-memory library simulator speaking the `mtx` command vocabulary.

use tracing::{debug, warn};

use crate::error::{MtxError, MtxResult};
use crate::executor::Executor;
use crate::inventory::{Slot, SlotType, Volume};
use crate::report::render_status;

/// Changer identifier reported in the status header.
pub const MOCK_DEVICE: &str = "/dev/mock";

/// Serial of the cleaning cartridge placed in the last storage slot.
pub const CLEANING_SERIAL: &str = "CLN000L1";

/// Serial of the `n`th synthetic volume.
pub fn mock_serial(n: usize) -> String {
    format!("S{:05}L6", n)
}

/// Simulated library changer.
///
/// Volumes are owned by the slot or drive holding them and are moved with
/// [`Option::take`], so a volume can never be in two places at once.
#[derive(Debug, Clone)]
pub struct MockChanger {
    drives: Vec<Slot>,
    /// Storage slots followed by mail slots; element `n` lives at index `n - 1`.
    slots: Vec<Slot>,
}

impl MockChanger {
    /// Create a library with `num_drives` empty drives, `num_storage_slots`
    /// storage slots and `num_mail_slots` import/export slots.
    ///
    /// The first `num_volumes` storage slots receive volumes `S00000L6`,
    /// `S00001L6`, ... A cleaning cartridge replaces whatever is in the last
    /// storage slot, and the last mail slot gets one extra volume numbered
    /// `num_volumes`. Every seeded volume's home is the 1-based number of
    /// the slot it starts in, the mail slot volume included.
    pub fn new(
        num_drives: usize,
        num_storage_slots: usize,
        num_mail_slots: usize,
        num_volumes: usize,
    ) -> Self {
        let drives = (0..num_drives)
            .map(|i| Slot::empty(i, SlotType::DataTransfer))
            .collect();

        let total = num_storage_slots + num_mail_slots;
        let slots = (0..total)
            .map(|i| {
                let num = i + 1;
                let slot_type = if i < num_storage_slots {
                    SlotType::Storage
                } else {
                    SlotType::Mail
                };

                let volume = if i + 1 == num_storage_slots {
                    Some(Volume::new(CLEANING_SERIAL, num))
                } else if slot_type == SlotType::Mail && i + 1 == total {
                    Some(Volume::new(mock_serial(num_volumes), num))
                } else if i < num_volumes && slot_type == SlotType::Storage {
                    Some(Volume::new(mock_serial(i), num))
                } else {
                    None
                };

                Slot {
                    num,
                    slot_type,
                    volume,
                }
            })
            .collect();

        Self { drives, slots }
    }

    pub fn drives(&self) -> &[Slot] {
        &self.drives
    }

    /// Storage slots followed by mail slots.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Render the current state as an `mtx status` report.
    pub fn status(&self) -> String {
        render_status(MOCK_DEVICE, &self.drives, &self.slots)
    }

    /// Move the volume in `slot_num` into `drive_num`.
    ///
    /// Occupancy is not checked: loading from an empty slot or onto a loaded
    /// drive replaces the drive's content.
    pub fn load(&mut self, slot_num: usize, drive_num: usize) -> MtxResult<()> {
        let slot = slot_index(&self.slots, slot_num)?;
        let drive = drive_index(&self.drives, drive_num)?;

        let volume = self.slots[slot].volume.take();
        if volume.is_none() {
            warn!(slot = slot_num, "loading from an empty slot");
        }
        if let Some(old) = &self.drives[drive].volume {
            warn!(drive = drive_num, serial = %old, "overwriting loaded drive");
        }

        debug!(slot = slot_num, drive = drive_num, ?volume, "load");
        self.drives[drive].volume = volume;
        Ok(())
    }

    /// Move the volume in `drive_num` into `slot_num`.
    ///
    /// A `slot_num` of 0 sends the volume to its home slot. Occupancy of the
    /// destination is not checked.
    pub fn unload(&mut self, slot_num: usize, drive_num: usize) -> MtxResult<()> {
        let drive = drive_index(&self.drives, drive_num)?;

        let slot_num = if slot_num == 0 {
            match &self.drives[drive].volume {
                Some(vol) => vol.home,
                None => {
                    return Err(MtxError::Transfer(format!(
                        "no volume in drive {} to return home",
                        drive_num
                    )))
                }
            }
        } else {
            slot_num
        };
        let slot = slot_index(&self.slots, slot_num)?;

        let volume = self.drives[drive].volume.take();
        if volume.is_none() {
            warn!(drive = drive_num, "unloading an empty drive");
        }
        if let Some(old) = &self.slots[slot].volume {
            warn!(slot = slot_num, serial = %old, "overwriting occupied slot");
        }

        debug!(slot = slot_num, drive = drive_num, ?volume, "unload");
        self.slots[slot].volume = volume;
        Ok(())
    }

    /// Move a volume between two storage or mail slots.
    pub fn transfer(&mut self, from_num: usize, to_num: usize) -> MtxResult<()> {
        let from = slot_index(&self.slots, from_num)?;
        let to = slot_index(&self.slots, to_num)?;

        if self.slots[from].is_empty() {
            return Err(MtxError::Transfer(format!(
                "no volume in slot {}",
                from_num
            )));
        }

        if !self.slots[to].is_empty() {
            return Err(MtxError::Transfer(format!(
                "slot {} already occupied",
                to_num
            )));
        }

        let volume = self.slots[from].volume.take();
        debug!(from = from_num, to = to_num, ?volume, "transfer");
        self.slots[to].volume = volume;
        Ok(())
    }
}

fn slot_index(slots: &[Slot], num: usize) -> MtxResult<usize> {
    if num == 0 || num > slots.len() {
        return Err(MtxError::Argument(format!(
            "slot {} out of range 1..={}",
            num,
            slots.len()
        )));
    }
    Ok(num - 1)
}

fn drive_index(drives: &[Slot], num: usize) -> MtxResult<usize> {
    if num >= drives.len() {
        return Err(MtxError::Argument(format!(
            "drive {} out of range (library has {} drives)",
            num,
            drives.len()
        )));
    }
    Ok(num)
}

fn parse_arg(arg: &str) -> MtxResult<usize> {
    arg.parse()
        .map_err(|_| MtxError::Argument(format!("not an element number: {:?}", arg)))
}

impl Executor for MockChanger {
    fn execute(&mut self, command: &str, args: &[String]) -> MtxResult<Vec<u8>> {
        debug!(command, ?args, "mock mtx");

        if command == "status" {
            if !args.is_empty() {
                return Err(MtxError::Argument(
                    "status takes no arguments".to_string(),
                ));
            }
            return Ok(self.status().into_bytes());
        }

        if !matches!(command, "load" | "unload" | "transfer") {
            return Err(MtxError::Argument(format!(
                "unknown or unsupported mtx command: {:?}",
                command
            )));
        }

        let [a, b] = args else {
            return Err(MtxError::Argument(format!(
                "{} takes 2 arguments, got {}",
                command,
                args.len()
            )));
        };
        let (a, b) = (parse_arg(a)?, parse_arg(b)?);

        match command {
            "load" => self.load(a, b)?,
            "unload" => self.unload(a, b)?,
            _ => self.transfer(a, b)?,
        }

        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(a: &str, b: &str) -> Vec<String> {
        vec![a.to_string(), b.to_string()]
    }

    fn serial(slot: &Slot) -> Option<&str> {
        slot.volume.as_ref().map(|v| v.serial.as_str())
    }

    #[test]
    fn test_seeding() {
        let mock = MockChanger::new(2, 6, 2, 3);

        assert_eq!(mock.drives().len(), 2);
        assert!(mock.drives().iter().all(Slot::is_empty));

        let serials: Vec<_> = mock.slots().iter().map(serial).collect();
        assert_eq!(
            serials,
            vec![
                Some("S00000L6"),
                Some("S00001L6"),
                Some("S00002L6"),
                None,
                None,
                Some("CLN000L1"),
                None,
                Some("S00003L6"),
            ]
        );
        assert_eq!(mock.slots()[7].slot_type, SlotType::Mail);
        assert_eq!(mock.slots()[7].volume.as_ref().map(|v| v.home), Some(8));
    }

    #[test]
    fn test_cleaning_cartridge_overrides_synthetic_volume() {
        let mock = MockChanger::new(1, 4, 1, 10);
        let serials: Vec<_> = mock.slots().iter().map(serial).collect();
        assert_eq!(
            serials,
            vec![
                Some("S00000L6"),
                Some("S00001L6"),
                Some("S00002L6"),
                Some("CLN000L1"),
                Some("S00010L6"),
            ]
        );
    }

    #[test]
    fn test_load_unload_home() {
        let mut mock = MockChanger::new(2, 6, 2, 3);

        mock.load(2, 1).unwrap();
        assert!(mock.slots()[1].is_empty());
        assert_eq!(serial(&mock.drives()[1]), Some("S00001L6"));

        mock.unload(0, 1).unwrap();
        assert!(mock.drives()[1].is_empty());
        assert_eq!(serial(&mock.slots()[1]), Some("S00001L6"));
    }

    #[test]
    fn test_unload_explicit_slot() {
        let mut mock = MockChanger::new(1, 6, 2, 3);
        mock.load(1, 0).unwrap();
        mock.unload(5, 0).unwrap();
        assert_eq!(serial(&mock.slots()[4]), Some("S00000L6"));
        // Home is unchanged by the move.
        assert_eq!(mock.slots()[4].volume.as_ref().map(|v| v.home), Some(1));
    }

    #[test]
    fn test_load_is_permissive() {
        let mut mock = MockChanger::new(1, 6, 2, 3);
        mock.load(1, 0).unwrap();
        mock.load(2, 0).unwrap();
        assert_eq!(serial(&mock.drives()[0]), Some("S00001L6"));

        mock.load(4, 0).unwrap();
        assert!(mock.drives()[0].is_empty());
    }

    #[test]
    fn test_unload_is_permissive() {
        let mut mock = MockChanger::new(1, 6, 2, 3);
        mock.load(1, 0).unwrap();
        mock.unload(2, 0).unwrap();

        assert!(mock.drives()[0].is_empty());
        assert_eq!(serial(&mock.slots()[1]), Some("S00000L6"));
        assert!(mock.slots().iter().all(|s| serial(s) != Some("S00001L6")));
    }

    #[test]
    fn test_unload_empty_drive_to_home() {
        let mut mock = MockChanger::new(1, 6, 2, 3);
        assert!(matches!(mock.unload(0, 0), Err(MtxError::Transfer(_))));
    }

    #[test]
    fn test_out_of_range() {
        let mut mock = MockChanger::new(1, 6, 2, 3);
        assert!(matches!(mock.load(0, 0), Err(MtxError::Argument(_))));
        assert!(matches!(mock.load(9, 0), Err(MtxError::Argument(_))));
        assert!(matches!(mock.load(1, 1), Err(MtxError::Argument(_))));
        assert!(matches!(mock.transfer(1, 9), Err(MtxError::Argument(_))));
        // Nothing moved.
        assert_eq!(serial(&mock.slots()[0]), Some("S00000L6"));
    }

    #[test]
    fn test_transfer() {
        let mut mock = MockChanger::new(1, 6, 2, 3);

        mock.transfer(1, 4).unwrap();
        assert!(mock.slots()[0].is_empty());
        assert_eq!(serial(&mock.slots()[3]), Some("S00000L6"));

        assert!(matches!(mock.transfer(1, 5), Err(MtxError::Transfer(_))));
        assert!(matches!(mock.transfer(2, 3), Err(MtxError::Transfer(_))));
        assert_eq!(serial(&mock.slots()[1]), Some("S00001L6"));
        assert_eq!(serial(&mock.slots()[2]), Some("S00002L6"));
    }

    #[test]
    fn test_status_render() {
        let mut mock = MockChanger::new(1, 2, 1, 1);
        mock.load(1, 0).unwrap();

        let expected = "  Storage Changer /dev/mock:1 Drives, 3 Slots ( 1 Import/Export )
Data Transfer Element 0:Full (Storage Element 1 Loaded):VolumeTag = S00000L6
      Storage Element 1:Empty
      Storage Element 2:Full :VolumeTag=CLN000L1
      Storage Element 3 IMPORT/EXPORT:Full :VolumeTag=S00001L6
";
        assert_eq!(mock.status(), expected);
    }

    #[test]
    fn test_execute_dispatch() {
        let mut mock = MockChanger::new(1, 6, 2, 3);

        assert!(mock.execute("status", &[]).unwrap().starts_with(b"  Storage Changer"));
        assert!(mock.execute("load", &args("1", "0")).unwrap().is_empty());
        assert_eq!(serial(&mock.drives()[0]), Some("S00000L6"));
        mock.execute("unload", &args("0", "0")).unwrap();
        mock.execute("transfer", &args("1", "4")).unwrap();
        assert_eq!(serial(&mock.slots()[3]), Some("S00000L6"));
    }

    #[test]
    fn test_execute_bad_invocations() {
        let mut mock = MockChanger::new(1, 6, 2, 3);

        let bad: Vec<(&str, Vec<String>)> = vec![
            ("status", vec!["1".to_string()]),
            ("load", vec!["1".to_string()]),
            ("load", vec!["1".to_string(), "0".to_string(), "2".to_string()]),
            ("load", args("one", "0")),
            ("unload", args("0", "-1")),
            ("eject", args("1", "0")),
            ("", vec![]),
        ];

        for (cmd, a) in bad {
            assert!(
                matches!(mock.execute(cmd, &a), Err(MtxError::Argument(_))),
                "{} {:?}",
                cmd,
                a
            );
        }

        assert!(matches!(
            mock.execute("transfer", &args("4", "5")),
            Err(MtxError::Transfer(_))
        ));
    }
}
