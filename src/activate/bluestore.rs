use anyhow::Result;
use tracing as log;

use super::ObjectStore;
use crate::volume::VolumeSet;

/// Placeholder for the block-device backend: nothing is activated yet.
pub struct Bluestore;

impl ObjectStore for Bluestore {
    fn name(&self) -> &'static str {
        "bluestore"
    }

    fn activate(&self, volumes: &VolumeSet) -> Result<()> {
        log::warn!(
            "[activate] bluestore activation is not supported, leaving {} volume(s) untouched",
            volumes.len()
        );
        Ok(())
    }
}
