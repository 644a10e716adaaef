mod config;

pub use config::{Config, MirrorConfig, SoundConfig, TimerSection, WorkflowConfig};

use std::path::PathBuf;

/// Returns `~/.config/flowtimer[-dev]/` based on FLOWTIMER_ENV, creating it.
///
/// Set FLOWTIMER_ENV=dev to use the development directory, or
/// FLOWTIMER_CONFIG_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Same location as [`data_dir`], without touching the filesystem.
pub fn config_dir() -> PathBuf {
    match std::env::var_os("FLOWTIMER_CONFIG_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("FLOWTIMER_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("flowtimer-dev")
            } else {
                base_dir.join("flowtimer")
            }
        }
    }
}
