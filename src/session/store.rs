use crate::session::{PersistedSession, SCHEMA_VERSION};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const SESSION_FILE: &str = "session.json";

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown schema_version in {path}: {version}")]
    UnknownSchema { path: PathBuf, version: u32 },
}

/// Where the session credentials live between runs.
pub trait SessionPersistence: Send + Sync {
    fn load(&self) -> Result<Option<PersistedSession>, SessionStoreError>;
    fn save(&self, session: &PersistedSession) -> Result<(), SessionStoreError>;
    fn clear(&self) -> Result<(), SessionStoreError>;
}

pub fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("USERPROFILE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Stores the session as one JSON file so the three credentials are always
/// written and removed together.
pub struct FileSessionPersistence {
    dir: PathBuf,
}

impl FileSessionPersistence {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    fn ensure_dir(&self) -> Result<&Path, SessionStoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| SessionStoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        Ok(self.dir.as_path())
    }
}

fn read_session_file(path: &Path) -> Result<PersistedSession, SessionStoreError> {
    let data = fs::read(path).map_err(|source| SessionStoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let session: PersistedSession =
        serde_json::from_slice(&data).map_err(|source| SessionStoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if session.schema_version != SCHEMA_VERSION {
        return Err(SessionStoreError::UnknownSchema {
            path: path.to_path_buf(),
            version: session.schema_version,
        });
    }
    Ok(session)
}

impl SessionPersistence for FileSessionPersistence {
    fn load(&self) -> Result<Option<PersistedSession>, SessionStoreError> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }
        read_session_file(&path).map(Some)
    }

    fn save(&self, session: &PersistedSession) -> Result<(), SessionStoreError> {
        let dir = self.ensure_dir()?;
        let final_path = self.session_path();
        let tmp_path = dir.join(format!("{SESSION_FILE}.tmp"));
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: io::Error| SessionStoreError::Io { path, source }
        };

        let bytes = serde_json::to_vec_pretty(session).map_err(|source| SessionStoreError::Parse {
            path: final_path.clone(),
            source,
        })?;
        fs::write(&tmp_path, bytes).map_err(io_err(&tmp_path))?;

        match fs::rename(&tmp_path, &final_path) {
            Ok(()) => Ok(()),
            Err(rename_err) => {
                if final_path.exists() {
                    fs::remove_file(&final_path).map_err(io_err(&final_path))?;
                    fs::rename(&tmp_path, &final_path).map_err(io_err(&final_path))
                } else {
                    Err(io_err(&final_path)(rename_err))
                }
            }
        }
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        let path = self.session_path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionStoreError::Io { path, source }),
        }
    }
}

#[cfg(test)]
pub use memory::MemorySessionPersistence;


#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserId;
    use assert_matches::assert_matches;

    fn sample() -> PersistedSession {
        PersistedSession {
            schema_version: SCHEMA_VERSION,
            token: Some("abc".to_string()),
            user_id: Some(UserId(7)),
            display_name: Some("writer".to_string()),
        }
    }

    #[test]
    fn save_then_load_returns_same_session() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let persistence = FileSessionPersistence::new(dir.path().join("nested"));

        persistence.save(&sample()).expect("session should save");
        let loaded = persistence.load().expect("session should load");
        assert_eq!(loaded, Some(sample()));
        assert!(!dir.path().join("nested").join("session.json.tmp").exists());
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let persistence = FileSessionPersistence::new(dir.path());
        assert_matches!(persistence.load(), Ok(None));
    }

    #[test]
    fn clear_removes_file_and_tolerates_absence() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let persistence = FileSessionPersistence::new(dir.path());
        persistence.save(&sample()).expect("session should save");

        persistence.clear().expect("first clear should succeed");
        persistence.clear().expect("second clear should succeed");
        assert!(!dir.path().join(SESSION_FILE).exists());
    }

    #[test]
    fn rejects_unknown_schema() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join(SESSION_FILE);
        fs::write(
            &path,
            r#"{"schema_version": 99, "token": "t", "user_id": 1, "display_name": "x"}"#,
        )
        .expect("fixture should write");

        let persistence = FileSessionPersistence::new(dir.path());
        assert_matches!(
            persistence.load(),
            Err(SessionStoreError::UnknownSchema { version: 99, .. })
        );
    }

    #[test]
    fn partial_file_loads_but_yields_no_identity() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        fs::write(
            dir.path().join(SESSION_FILE),
            r#"{"schema_version": 1, "token": "t", "user_id": null, "display_name": "x"}"#,
        )
        .expect("fixture should write");

        let persistence = FileSessionPersistence::new(dir.path());
        let loaded = persistence
            .load()
            .expect("partial file is still valid json")
            .expect("file exists");
        assert!(loaded.into_identity().is_none());
    }
}
