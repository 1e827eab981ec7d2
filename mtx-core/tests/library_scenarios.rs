//! End-to-end scenarios against the simulated library.

use mtx_core::{mock_serial, Changer, MockChanger, MtxError, SlotType, CLEANING_SERIAL};

fn library() -> Changer<MockChanger> {
    Changer::new(MockChanger::new(8, 32, 4, 16))
}

fn serial_in_slot(chgr: &mut Changer<MockChanger>, num: usize) -> Option<String> {
    let status = chgr.status().expect("status");
    status
        .slot(num)
        .and_then(|s| s.volume.as_ref())
        .map(|v| v.serial.clone())
}

#[test]
fn test_initial_inventory() {
    let mut chgr = library();

    assert_eq!(chgr.max_drives().unwrap(), 8);
    assert_eq!(chgr.num_slots().unwrap(), 36);
    assert_eq!(chgr.num_storage_slots().unwrap(), 32);
    assert_eq!(chgr.num_mail_slots().unwrap(), 4);

    let drives = chgr.drives().unwrap();
    assert_eq!(drives.len(), 8);
    for (i, drive) in drives.iter().enumerate() {
        assert_eq!(drive.num, i);
        assert_eq!(drive.slot_type, SlotType::DataTransfer);
        assert!(drive.is_empty());
    }

    let storage = chgr.storage_slots().unwrap();
    assert_eq!(storage.len(), 32);
    for (i, slot) in storage.iter().enumerate().take(16) {
        assert_eq!(slot.num, i + 1);
        assert_eq!(slot.volume.as_ref().unwrap().serial, mock_serial(i));
    }
    assert!(storage[16..31].iter().all(|s| s.is_empty()));
    assert_eq!(storage[31].volume.as_ref().unwrap().serial, CLEANING_SERIAL);

    let mail = chgr.mail_slots().unwrap();
    let nums: Vec<_> = mail.iter().map(|s| s.num).collect();
    assert_eq!(nums, vec![33, 34, 35, 36]);
    assert!(mail[..3].iter().all(|s| s.is_empty()));
    assert_eq!(mail[3].volume.as_ref().unwrap().serial, "S00016L6");
}

#[test]
fn test_slots_are_storage_then_mail() {
    let mut chgr = library();
    let slots = chgr.slots().unwrap();
    let nums: Vec<_> = slots.iter().map(|s| s.num).collect();
    assert_eq!(nums, (1..=36).collect::<Vec<_>>());
    assert!(slots[..32].iter().all(|s| s.slot_type == SlotType::Storage));
    assert!(slots[32..].iter().all(|s| s.slot_type == SlotType::Mail));
}

#[test]
fn test_load_then_unload_home() {
    let mut chgr = library();

    chgr.load(1, 0).unwrap();
    let status = chgr.status().unwrap();
    assert!(status.slot(1).unwrap().is_empty());
    let vol = status.drive(0).unwrap().volume.clone().unwrap();
    assert_eq!(vol.serial, "S00000L6");
    assert_eq!(vol.home, 1);

    chgr.unload(0, 0).unwrap();
    assert!(chgr.drives().unwrap()[0].is_empty());
    assert_eq!(serial_in_slot(&mut chgr, 1).as_deref(), Some("S00000L6"));
}

#[test]
fn test_unload_to_mail_slot() {
    let mut chgr = library();
    chgr.load(5, 3).unwrap();
    chgr.unload(33, 3).unwrap();

    let status = chgr.status().unwrap();
    assert_eq!(status.find_volume("S00004L6").map(|s| s.num), Some(33));
    assert!(status.drive(3).unwrap().is_empty());
}

#[test]
fn test_transfer_to_occupied_slot_fails() {
    let mut chgr = library();

    let err = chgr.transfer(1, 2).unwrap_err();
    assert!(matches!(err, MtxError::Transfer(_)));
    assert_eq!(serial_in_slot(&mut chgr, 1).as_deref(), Some("S00000L6"));
    assert_eq!(serial_in_slot(&mut chgr, 2).as_deref(), Some("S00001L6"));
}

#[test]
fn test_transfer_from_empty_slot_fails() {
    let mut chgr = library();

    // Destination occupied or not, an empty source is rejected.
    assert!(matches!(chgr.transfer(20, 21), Err(MtxError::Transfer(_))));
    assert!(matches!(chgr.transfer(20, 1), Err(MtxError::Transfer(_))));
    assert!(serial_in_slot(&mut chgr, 20).is_none());
    assert!(serial_in_slot(&mut chgr, 21).is_none());
}

#[test]
fn test_transfer_moves_volume() {
    let mut chgr = library();
    chgr.transfer(36, 20).unwrap();

    assert!(serial_in_slot(&mut chgr, 36).is_none());
    assert_eq!(serial_in_slot(&mut chgr, 20).as_deref(), Some("S00016L6"));
}

#[test]
fn test_independent_libraries() {
    let mut a = library();
    let mut b = library();

    a.load(1, 0).unwrap();

    assert!(!a.drives().unwrap()[0].is_empty());
    assert!(b.drives().unwrap()[0].is_empty());
}
