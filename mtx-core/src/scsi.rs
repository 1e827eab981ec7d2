//! Executor backed by the `mtx` program and a SCSI media changer device.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{MtxError, MtxResult};
use crate::executor::Executor;

/// Default location of the `mtx` program.
pub const DEFAULT_MTX_PROGRAM: &str = "/usr/bin/mtx";

/// Runs `mtx -f <device> <command> <args..>` for each request.
#[derive(Debug, Clone)]
pub struct ScsiExecutor {
    device: PathBuf,
    program: PathBuf,
}

impl ScsiExecutor {
    /// Create an executor for `device` using the default `mtx` program.
    pub fn new(device: impl Into<PathBuf>) -> Self {
        Self::with_program(device, DEFAULT_MTX_PROGRAM)
    }

    pub fn with_program(device: impl Into<PathBuf>, program: impl Into<PathBuf>) -> Self {
        Self {
            device: device.into(),
            program: program.into(),
        }
    }

    pub fn device(&self) -> &Path {
        &self.device
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Executor for ScsiExecutor {
    fn execute(&mut self, command: &str, args: &[String]) -> MtxResult<Vec<u8>> {
        debug!(
            program = %self.program.display(),
            device = %self.device.display(),
            command,
            ?args,
            "running mtx"
        );

        let output = Command::new(&self.program)
            .arg("-f")
            .arg(&self.device)
            .arg(command)
            .args(args)
            .output()?;

        if !output.status.success() {
            return Err(MtxError::Execution {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }

        Ok(output.stdout)
    }
}
