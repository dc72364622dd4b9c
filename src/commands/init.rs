use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory and an initial `config.json` file with default settings.
///
/// # Arguments
/// - `home` - The directory that will be the root of the home directory, e.g. `$HOME/posr`
/// - `message_limit` - Overrides the default maximum message length, in bytes.
///
/// # Errors
/// - Returns an error if the home directory is already initialized or any file operation fails.
pub async fn init(home: &Path, message_limit: Option<usize>) -> Result<Out<()>> {
    let config = Config::create(home, message_limit)
        .await
        .context("Unable to create the posr home directory and config")?;
    Ok(format!(
        "Successfully created the posr home directory at {}",
        config.root().display()
    )
    .into())
}
