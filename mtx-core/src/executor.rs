//! Executor trait - raw command interface to a library changer.

use crate::error::MtxResult;

/// Runs a raw changer command such as `status` or `load 3 0`.
///
/// Implementations either drive the real `mtx` program ([`crate::ScsiExecutor`])
/// or simulate it in memory ([`crate::MockChanger`]). Only `status` produces
/// meaningful output; the other commands return an empty payload on success.
pub trait Executor {
    /// Execute `command` with positional `args` and return its raw output.
    fn execute(&mut self, command: &str, args: &[String]) -> MtxResult<Vec<u8>>;
}

impl<E: Executor + ?Sized> Executor for Box<E> {
    fn execute(&mut self, command: &str, args: &[String]) -> MtxResult<Vec<u8>> {
        (**self).execute(command, args)
    }
}
