use anyhow::{Context, Result};
use ::config::{Config, File};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Loads a file on top of `defaults`, so the file only needs the keys it changes.
pub fn load_config_with_defaults<T, P>(defaults: &T, path: P) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    P: AsRef<Path>,
{
    let path_str = path.as_ref().to_str().context("Invalid config path")?;

    let settings = Config::builder()
        .add_source(Config::try_from(defaults).context("Failed to serialize defaults")?)
        .add_source(File::with_name(path_str))
        .build()
        .context("Failed to build configuration")?;

    settings.try_deserialize::<T>().context("Failed to deserialize configuration")
}
