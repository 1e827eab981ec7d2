//! Tape library changer core
//!
//! This crate models an automated tape library (drives, storage slots and
//! import/export slots) driven by the `mtx` program:
//! - `mtx status` report parsing into a typed inventory
//! - High-level load/unload/transfer operations
//! - An in-memory simulator that speaks the same commands and report format
//!
//! # Architecture
//!
//! The changer uses a layered design:
//! - `Executor` trait: raw command interface (`status`, `load 3 0`, ...)
//! - `ScsiExecutor`: runs the real `mtx` program against a device
//! - `MockChanger`: simulated library for tests and development
//! - `Changer`: issues commands and parses the status report

pub mod changer;
pub mod config;
pub mod error;
pub mod executor;
pub mod inventory;
pub mod mock;
pub mod report;
pub mod scsi;

pub use changer::Changer;
pub use config::{load_config_from_path, parse_config, Backend, ChangerConfig, MockConfig};
pub use error::{MtxError, MtxResult};
pub use executor::Executor;
pub use inventory::{Slot, SlotType, Status, Volume};
pub use mock::{mock_serial, MockChanger, CLEANING_SERIAL, MOCK_DEVICE};
pub use report::{parse_status, render_status};
pub use scsi::{ScsiExecutor, DEFAULT_MTX_PROGRAM};
