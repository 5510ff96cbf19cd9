use std::sync::Once;
use std::{env, fs, path::Path, path::PathBuf};

use dirs::home_dir;

use crate::errors::Result;

const DEFAULT_DIR_NAME: &str = ".contas";
const CONFIG_FILE: &str = "config.json";

/// Returns the application data directory, defaulting to `~/.contas`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("CONTAS_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Path to the user preferences file.
pub fn config_file() -> PathBuf {
    app_data_dir().join(CONFIG_FILE)
}

/// Creates `path` (and missing parents) if needed.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("contas_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}
