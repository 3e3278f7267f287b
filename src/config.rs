use crate::diff::DEFAULT_WINDOW;
use crate::session::store::home_dir;
use std::path::PathBuf;

/// Largest accepted `BLOGDESK_DIFF_WINDOW`.
pub const MAX_DIFF_WINDOW: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Client configuration loaded from environment variables.
///
/// A `.env` file in the working directory is honoured (see `main`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL (default: `http://localhost:8000`).
    pub api_url: String,
    /// Directory holding `session.json` (default: `$HOME/.blogdesk`).
    pub data_dir: PathBuf,
    /// Diff lookahead window (default: `4`, at most [`MAX_DIFF_WINDOW`]).
    pub diff_window: usize,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default                 |
    /// |-----------------------|-------------------------|
    /// | `BLOGDESK_API_URL`    | `http://localhost:8000` |
    /// | `BLOGDESK_DATA_DIR`   | `$HOME/.blogdesk`       |
    /// | `BLOGDESK_DIFF_WINDOW`| `4`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_url = var("BLOGDESK_API_URL").unwrap_or_else(|| "http://localhost:8000".into());

        let data_dir = var("BLOGDESK_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| home_dir().join(".blogdesk"));

        let diff_window = match var("BLOGDESK_DIFF_WINDOW") {
            None => DEFAULT_WINDOW,
            Some(value) => match value.parse::<usize>() {
                Ok(window) if (1..=MAX_DIFF_WINDOW).contains(&window) => window,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "BLOGDESK_DIFF_WINDOW",
                        expected: "an integer between 1 and 256",
                        value,
                    })
                }
            },
        };

        Ok(Self {
            api_url,
            data_dir,
            diff_window,
        })
    }
}
