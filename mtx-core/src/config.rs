//! Changer configuration and backend selection.
//!
//! A configuration is a small JSON document choosing either a real device:
//!
//! ```json
//! { "device": "/dev/sg3", "program": "/usr/local/bin/mtx" }
//! ```
//!
//! or the in-memory simulator:
//!
//! ```json
//! { "mock": { "drives": 2, "storageSlots": 10, "mailSlots": 1, "volumes": 4 } }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MtxError, MtxResult};
use crate::executor::Executor;
use crate::mock::MockChanger;
use crate::scsi::{ScsiExecutor, DEFAULT_MTX_PROGRAM};

/// Largest number of drives or slots a simulated library may have. SCSI
/// element addresses are 16 bits wide.
pub const MAX_MOCK_ELEMENTS: usize = 0xFFFF;

/// Dimensions of a simulated library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MockConfig {
    pub drives: usize,
    pub storage_slots: usize,
    pub mail_slots: usize,
    pub volumes: usize,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            drives: 8,
            storage_slots: 32,
            mail_slots: 4,
            volumes: 16,
        }
    }
}

/// Which changer to talk to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangerConfig {
    /// Changer device passed to `mtx -f`.
    #[serde(default)]
    pub device: Option<PathBuf>,
    /// Path of the `mtx` program.
    #[serde(default)]
    pub program: Option<PathBuf>,
    /// Use the simulator instead of a device.
    #[serde(default)]
    pub mock: Option<MockConfig>,
}

impl ChangerConfig {
    /// Build the executor this configuration describes.
    pub fn backend(&self) -> MtxResult<Backend> {
        if let Some(mock) = &self.mock {
            let slots = mock.storage_slots.checked_add(mock.mail_slots);
            if mock.drives > MAX_MOCK_ELEMENTS || slots.map_or(true, |n| n > MAX_MOCK_ELEMENTS) {
                return Err(MtxError::Argument(format!(
                    "mock library too large: at most {} drives and {} slots",
                    MAX_MOCK_ELEMENTS, MAX_MOCK_ELEMENTS
                )));
            }

            return Ok(Backend::Mock(MockChanger::new(
                mock.drives,
                mock.storage_slots,
                mock.mail_slots,
                mock.volumes,
            )));
        }

        let device = self.device.as_ref().ok_or_else(|| {
            MtxError::Argument("no changer device configured".to_string())
        })?;
        let program = self
            .program
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MTX_PROGRAM));

        Ok(Backend::Scsi(ScsiExecutor::with_program(device, program)))
    }
}

/// Parse a configuration from JSON text.
pub fn parse_config(json: &str) -> MtxResult<ChangerConfig> {
    Ok(serde_json::from_str(json)?)
}

/// Load a configuration file.
pub fn load_config_from_path(path: impl AsRef<Path>) -> MtxResult<ChangerConfig> {
    let text = std::fs::read_to_string(path)?;
    parse_config(&text)
}

/// A real device or the simulator, chosen when the changer is built.
#[derive(Debug)]
pub enum Backend {
    Scsi(ScsiExecutor),
    Mock(MockChanger),
}

impl Executor for Backend {
    fn execute(&mut self, command: &str, args: &[String]) -> MtxResult<Vec<u8>> {
        match self {
            Backend::Scsi(exec) => exec.execute(command, args),
            Backend::Mock(mock) => mock.execute(command, args),
        }
    }
}
