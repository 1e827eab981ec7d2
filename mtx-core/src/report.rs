//! The `mtx status` report: a strict parser and the matching renderer.
//!
//! The report looks like this:
//!
//! ```text
//!   Storage Changer /dev/sg3:2 Drives, 5 Slots ( 1 Import/Export )
//! Data Transfer Element 0:Empty
//! Data Transfer Element 1:Full (Storage Element 2 Loaded):VolumeTag = S00001L6
//!       Storage Element 1:Full :VolumeTag=S00000L6
//!       Storage Element 2:Empty
//!       Storage Element 5 IMPORT/EXPORT:Empty
//! ```
//!
//! Any line the parser does not recognize is an error. Elements are kept in
//! report order; the parser never re-sorts.

use std::fmt::Write;

use crate::error::{MtxError, MtxResult};
use crate::inventory::{Slot, SlotType, Status, Volume};

const HEADER_PREFIX: &str = "Storage Changer";
const DRIVE_PREFIX: &str = "Data Transfer Element ";
const SLOT_PREFIX: &str = "Storage Element ";
const MAIL_TAG: &str = " IMPORT/EXPORT";
const EMPTY: &str = "Empty";
const DRIVE_FULL_PREFIX: &str = "Full (Storage Element ";
const DRIVE_FULL_SEP: &str = " Loaded):VolumeTag = ";
const SLOT_FULL_PREFIX: &str = "Full :VolumeTag=";

/// Counts carried by the report header.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Header {
    changer: String,
    drives: usize,
    slots: usize,
    mail_slots: usize,
}

/// Parse raw `mtx status` output into a [`Status`] snapshot.
pub fn parse_status(raw: &[u8]) -> MtxResult<Status> {
    let text = std::str::from_utf8(raw).map_err(|e| {
        let line = raw[..e.valid_up_to()].iter().filter(|&&b| b == b'\n').count() + 1;
        MtxError::format(line, "status text is not valid UTF-8")
    })?;

    let mut lines = text.lines().map(str::trim_end).enumerate();

    let header = match lines.next() {
        Some((_, line)) => parse_header(line)?,
        None => return Err(MtxError::format(1, "missing status header")),
    };

    let num_storage_slots = header.slots.checked_sub(header.mail_slots).ok_or_else(|| {
        MtxError::format(1, "more import/export slots than slots in header")
    })?;

    let mut drives = Vec::new();
    let mut storage = Vec::new();
    let mut mail = Vec::new();

    for (idx, line) in lines {
        let line_no = idx + 1;
        let trimmed = line.trim_start();

        if let Some(rest) = trimmed.strip_prefix(DRIVE_PREFIX) {
            drives.push(parse_drive(rest, line_no)?);
        } else if let Some(rest) = trimmed.strip_prefix(SLOT_PREFIX) {
            let slot = parse_slot(rest, line_no)?;
            match slot.slot_type {
                SlotType::Mail => mail.push(slot),
                _ => storage.push(slot),
            }
        } else {
            return Err(MtxError::format(line_no, "failed to parse slot"));
        }
    }

    storage.append(&mut mail);

    Ok(Status {
        changer: header.changer,
        max_drives: header.drives,
        num_slots: header.slots,
        num_storage_slots,
        num_mail_slots: header.mail_slots,
        drives,
        slots: storage,
    })
}

fn parse_header(line: &str) -> MtxResult<Header> {
    let bad = || MtxError::format(1, "failed to match mtx status header");

    let rest = line
        .trim_start()
        .strip_prefix(HEADER_PREFIX)
        .ok_or_else(bad)?
        .trim_start();

    let (ident, rest) = rest.split_once(" Drives, ").ok_or_else(bad)?;
    let (changer, drives) = ident.rsplit_once(':').ok_or_else(bad)?;
    let (slots, rest) = rest.split_once(" Slots (").ok_or_else(bad)?;
    let mail = rest
        .trim_end()
        .strip_suffix(')')
        .and_then(|s| s.trim_end().strip_suffix(" Import/Export"))
        .ok_or_else(bad)?;

    Ok(Header {
        changer: changer.trim().to_string(),
        drives: parse_num(drives, 1, "drive count")?,
        slots: parse_num(slots, 1, "slot count")?,
        mail_slots: parse_num(mail.trim(), 1, "import/export count")?,
    })
}

/// `rest` is everything after "Data Transfer Element ".
fn parse_drive(rest: &str, line_no: usize) -> MtxResult<Slot> {
    let (num, state) = rest
        .split_once(':')
        .ok_or_else(|| MtxError::format(line_no, "failed to parse transfer element"))?;

    let mut slot = Slot::empty(parse_num(num, line_no, "drive number")?, SlotType::DataTransfer);

    if state != EMPTY {
        let (home, serial) = state
            .strip_prefix(DRIVE_FULL_PREFIX)
            .and_then(|s| s.split_once(DRIVE_FULL_SEP))
            .ok_or_else(|| MtxError::format(line_no, "failed to parse transfer element"))?;

        slot.volume = Some(Volume::new(
            parse_serial(serial, line_no)?,
            parse_num(home, line_no, "home slot number")?,
        ));
    }

    Ok(slot)
}

/// `rest` is everything after "Storage Element ".
fn parse_slot(rest: &str, line_no: usize) -> MtxResult<Slot> {
    let (head, state) = rest
        .split_once(':')
        .ok_or_else(|| MtxError::format(line_no, "failed to parse slot"))?;

    let (num, slot_type) = match head.strip_suffix(MAIL_TAG) {
        Some(num) => (num, SlotType::Mail),
        None => (head, SlotType::Storage),
    };

    let num = parse_num(num, line_no, "slot number")?;
    let mut slot = Slot::empty(num, slot_type);

    if state != EMPTY {
        let serial = state.strip_prefix(SLOT_FULL_PREFIX).ok_or_else(|| {
            MtxError::format(line_no, format!("failed to parse slot element: {}", state))
        })?;

        slot.volume = Some(Volume::new(parse_serial(serial, line_no)?, num));
    }

    Ok(slot)
}

fn parse_num(field: &str, line_no: usize, what: &str) -> MtxResult<usize> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MtxError::format(
            line_no,
            format!("invalid {}: {:?}", what, field),
        ));
    }

    field
        .parse()
        .map_err(|_| MtxError::format(line_no, format!("{} out of range: {}", what, field)))
}

fn parse_serial(field: &str, line_no: usize) -> MtxResult<String> {
    let serial = field.trim();
    if serial.is_empty() {
        return Err(MtxError::format(line_no, "empty volume tag"));
    }
    Ok(serial.to_string())
}

/// Render drives and slots as an `mtx status` report.
///
/// `slots` holds storage and mail slots in element order; the mail count in
/// the header is the number of [`SlotType::Mail`] entries.
pub fn render_status(changer: &str, drives: &[Slot], slots: &[Slot]) -> String {
    let num_mail = slots
        .iter()
        .filter(|s| s.slot_type == SlotType::Mail)
        .count();

    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(
        out,
        "  {} {}:{} Drives, {} Slots ( {} Import/Export )",
        HEADER_PREFIX,
        changer,
        drives.len(),
        slots.len(),
        num_mail
    );

    for drive in drives {
        let _ = match &drive.volume {
            None => writeln!(out, "{}{}:{}", DRIVE_PREFIX, drive.num, EMPTY),
            Some(vol) => writeln!(
                out,
                "{}{}:{}{}{}{}",
                DRIVE_PREFIX, drive.num, DRIVE_FULL_PREFIX, vol.home, DRIVE_FULL_SEP, vol.serial
            ),
        };
    }

    for slot in slots {
        let tag = if slot.slot_type == SlotType::Mail {
            MAIL_TAG
        } else {
            ""
        };

        let _ = match &slot.volume {
            None => writeln!(out, "      {}{}{}:{}", SLOT_PREFIX, slot.num, tag, EMPTY),
            Some(vol) => writeln!(
                out,
                "      {}{}{}:{}{}",
                SLOT_PREFIX, slot.num, tag, SLOT_FULL_PREFIX, vol.serial
            ),
        };
    }

    out
}
