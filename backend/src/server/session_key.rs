//! Session cookie key loading.

use std::path::{Path, PathBuf};

use actix_web::cookie::Key;
use cap_std::{ambient_authority, fs::Dir};
use tracing::warn;
use zeroize::Zeroize;

const SESSION_KEY_MIN_LEN: usize = 64;

/// Build mode for session key validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds fall back to a generated key when the file is missing.
    Debug,
    /// Release builds require the key file unless explicitly overridden.
    Release,
}

impl BuildMode {
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Errors raised while loading the session key.
#[derive(thiserror::Error, Debug)]
pub enum SessionKeyError {
    #[error("failed to read session key at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    TooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Load the cookie key from `path`.
///
/// An unreadable file yields a generated key in debug builds or when
/// `allow_ephemeral` is set; sessions then do not survive a restart.
pub fn load_session_key(
    path: &Path,
    allow_ephemeral: bool,
    mode: BuildMode,
) -> Result<Key, SessionKeyError> {
    match read_key_file(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionKeyError::TooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(source) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %source,
                "using temporary session key; sessions will not survive a restart"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionKeyError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn read_key_file(path: &Path) -> std::io::Result<Vec<u8>> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "session key path must name a file",
        )
    })?;
    Dir::open_ambient_dir(parent, ambient_authority())?.read(Path::new(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn key_file(dir: &TempDir, len: usize) -> PathBuf {
        let path = dir.path().join("session_key");
        std::fs::write(&path, vec![b'k'; len]).expect("write key");
        path
    }

    #[rstest]
    fn same_file_derives_same_key() {
        let dir = TempDir::new().expect("tempdir");
        let path = key_file(&dir, 64);

        let first = load_session_key(&path, false, BuildMode::Release).expect("key");
        let second = load_session_key(&path, false, BuildMode::Release).expect("key");

        assert_eq!(first.master(), second.master());
    }

    #[rstest]
    #[case(BuildMode::Debug)]
    #[case(BuildMode::Release)]
    fn short_key_is_rejected(#[case] mode: BuildMode) {
        let dir = TempDir::new().expect("tempdir");
        let path = key_file(&dir, 16);

        let result = load_session_key(&path, true, mode);

        assert!(matches!(
            result,
            Err(SessionKeyError::TooShort { length: 16, .. })
        ));
    }

    #[rstest]
    #[case::debug(BuildMode::Debug, false, true)]
    #[case::release_with_override(BuildMode::Release, true, true)]
    #[case::release(BuildMode::Release, false, false)]
    fn missing_file_falls_back_only_when_permitted(
        #[case] mode: BuildMode,
        #[case] allow_ephemeral: bool,
        #[case] expect_key: bool,
    ) {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("absent");

        let result = load_session_key(&path, allow_ephemeral, mode);

        assert_eq!(result.is_ok(), expect_key);
    }
}
