//! JSON serialization of the complete world.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::ExportError;
use crate::world::WorldData;

/// Writes `world` as pretty-printed JSON, creating parent directories.
pub fn export_world_json(world: &WorldData, path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, world)?;
    writer.flush()?;
    Ok(())
}

/// Reads a world previously written by [`export_world_json`].
pub fn import_world_json(path: &Path) -> Result<WorldData, ExportError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
