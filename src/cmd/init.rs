use crate::data::AppSettings;
use anyhow::Result;
use std::fs;
use std::path::Path;

pub fn run() -> Result<()> {
    let dir = crate::data::persistence::get_data_dir()?;
    fs::create_dir_all(&dir)?;
    run_in_dir(&dir)?;
    println!("Config initialized at {}", dir.display());
    Ok(())
}

/// Writes the default config.yaml into `dir`. Exposed for unit testing.
/// Domain data is seeded in memory at launch, so config is the only file.
pub(crate) fn run_in_dir(dir: &Path) -> Result<()> {
    AppSettings::default().save_to(dir)
}
