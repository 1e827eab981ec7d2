//! Changer - high-level library operations on top of an [`Executor`].

use tracing::debug;

use crate::error::MtxResult;
use crate::executor::Executor;
use crate::inventory::{Slot, Status};
use crate::report::parse_status;

/// A library changer driven through an executor.
///
/// Nothing is cached: every query issues a fresh `status` command and parses
/// the result, so the answer reflects the library at the time of the call.
pub struct Changer<E: Executor> {
    executor: E,
}

impl<E: Executor> Changer<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Get the underlying executor.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Get mutable reference to the underlying executor.
    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    pub fn into_inner(self) -> E {
        self.executor
    }

    fn command(&mut self, command: &str, a: usize, b: usize) -> MtxResult<()> {
        debug!(command, a, b, "changer command");
        self.executor
            .execute(command, &[a.to_string(), b.to_string()])
            .map(|_| ())
    }

    /// Load the volume in `slot_num` into drive `drive_num`.
    pub fn load(&mut self, slot_num: usize, drive_num: usize) -> MtxResult<()> {
        self.command("load", slot_num, drive_num)
    }

    /// Unload drive `drive_num` into `slot_num`, or into the volume's home
    /// slot when `slot_num` is 0.
    pub fn unload(&mut self, slot_num: usize, drive_num: usize) -> MtxResult<()> {
        self.command("unload", slot_num, drive_num)
    }

    /// Move a volume from one storage or mail slot to another.
    pub fn transfer(&mut self, from_slot: usize, to_slot: usize) -> MtxResult<()> {
        self.command("transfer", from_slot, to_slot)
    }

    /// Query and parse the full library status.
    pub fn status(&mut self) -> MtxResult<Status> {
        let raw = self.executor.execute("status", &[])?;
        parse_status(&raw)
    }

    /// Number of data transfer elements. This need not match the number of
    /// drives actually installed.
    pub fn max_drives(&mut self) -> MtxResult<usize> {
        Ok(self.status()?.max_drives)
    }

    /// Number of storage and mail slots.
    pub fn num_slots(&mut self) -> MtxResult<usize> {
        Ok(self.status()?.num_slots)
    }

    pub fn num_storage_slots(&mut self) -> MtxResult<usize> {
        Ok(self.status()?.num_storage_slots)
    }

    pub fn num_mail_slots(&mut self) -> MtxResult<usize> {
        Ok(self.status()?.num_mail_slots)
    }

    /// Data transfer elements, usually numbered from 0.
    pub fn drives(&mut self) -> MtxResult<Vec<Slot>> {
        Ok(self.status()?.drives)
    }

    /// Storage slots followed by mail slots, usually numbered from 1.
    pub fn slots(&mut self) -> MtxResult<Vec<Slot>> {
        Ok(self.status()?.slots)
    }

    pub fn storage_slots(&mut self) -> MtxResult<Vec<Slot>> {
        let status = self.status()?;
        Ok(status.storage_slots().cloned().collect())
    }

    /// Mail slots are numbered after the last storage slot.
    pub fn mail_slots(&mut self) -> MtxResult<Vec<Slot>> {
        let status = self.status()?;
        Ok(status.mail_slots().cloned().collect())
    }
}
