use std::fs;
use std::path::Path;

use rad_model::Model;

use crate::error::Result;

pub fn statistics_json(model: &Model) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(model.statistics())?)
}

pub fn write_statistics(path: impl AsRef<Path>, model: &Model) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let bytes = serde_json::to_vec_pretty(&model.statistics())?;
    fs::write(path, bytes)?;
    Ok(())
}
