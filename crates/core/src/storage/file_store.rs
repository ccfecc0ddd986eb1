use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::CoreError;

use super::encryption::KdfParams;
use super::format;
use super::kv::KeyValueStore;

/// Whole-map key-value store backed by a single file.
///
/// Plain stores are a pretty-printed JSON object. Sealed stores hold the
/// bincode-encoded map inside an encrypted envelope (see [`format`]).
/// The map is cached in memory and the file is rewritten on every change;
/// a missing file is an empty store.
pub struct FileStore {
    path: PathBuf,
    sealing: Option<Sealing>,
    entries: BTreeMap<String, String>,
}

struct Sealing {
    password: String,
    kdf_params: KdfParams,
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .field("sealed", &self.sealing.is_some())
            .field("keys", &self.entries.len())
            .finish()
    }
}

impl FileStore {
    /// Open a plain JSON store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let entries: BTreeMap<String, String> = match read_if_exists(&path)? {
            None => BTreeMap::new(),
            Some(bytes) if format::is_sealed(&bytes) => {
                return Err(CoreError::InvalidFileFormat(format!(
                    "{} is encrypted; a password is required",
                    path.display()
                )));
            }
            Some(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Some(bytes) => serde_json::from_slice(&bytes)?,
        };
        debug!(path = %path.display(), keys = entries.len(), "opened plain store");

        Ok(Self {
            path,
            sealing: None,
            entries,
        })
    }

    /// Open an encrypted store. `kdf_params` only applies to future writes;
    /// existing files carry their own parameters.
    pub fn open_sealed(
        path: impl Into<PathBuf>,
        password: &str,
        kdf_params: KdfParams,
    ) -> Result<Self, CoreError> {
        kdf_params.validate().map_err(CoreError::Config)?;
        let path = path.into();
        let entries: BTreeMap<String, String> = match read_if_exists(&path)? {
            None => BTreeMap::new(),
            Some(bytes) => {
                let plaintext = format::open(&bytes, password)?;
                bincode::deserialize(&plaintext).map_err(|e| {
                    CoreError::Deserialization(format!("Failed to decode sealed store: {e}"))
                })?
            }
        };
        debug!(path = %path.display(), keys = entries.len(), "opened sealed store");

        Ok(Self {
            path,
            sealing: Some(Sealing {
                password: password.to_string(),
                kdf_params,
            }),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_sealed(&self) -> bool {
        self.sealing.is_some()
    }

    /// Re-encrypt the file under a new password. A plain store becomes
    /// sealed with default KDF parameters.
    pub fn change_password(&mut self, new_password: &str) -> Result<(), CoreError> {
        let kdf_params = self
            .sealing
            .as_ref()
            .map(|s| s.kdf_params)
            .unwrap_or_default();
        let sealing = Sealing {
            password: new_password.to_string(),
            kdf_params,
        };
        write_entries(&self.path, Some(&sealing), &self.entries)?;
        self.sealing = Some(sealing);
        Ok(())
    }

    /// Apply `change` to a copy of the map, write it, and only then keep it.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut BTreeMap<String, String>) -> T,
    ) -> Result<T, CoreError> {
        let mut next = self.entries.clone();
        let out = change(&mut next);
        write_entries(&self.path, self.sealing.as_ref(), &next)?;
        self.entries = next;
        Ok(out)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), CoreError> {
        self.commit(|map| {
            map.insert(key.to_string(), value);
        })
    }

    fn remove(&mut self, key: &str) -> Result<Option<String>, CoreError> {
        if !self.entries.contains_key(key) {
            return Ok(None);
        }
        self.commit(|map| map.remove(key))
    }

    fn set_many(&mut self, entries: Vec<(&str, String)>) -> Result<(), CoreError> {
        self.commit(|map| {
            for (key, value) in entries {
                map.insert(key.to_string(), value);
            }
        })
    }
}

fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>, CoreError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Writes go to a sibling `.tmp` file that is renamed over the target;
/// the store file is never partially written.
fn write_entries(
    path: &Path,
    sealing: Option<&Sealing>,
    entries: &BTreeMap<String, String>,
) -> Result<(), CoreError> {
    let bytes = match sealing {
        None => serde_json::to_vec_pretty(entries)
            .map_err(|e| CoreError::Serialization(format!("Failed to encode store: {e}")))?,
        Some(s) => {
            let plaintext = bincode::serialize(entries)?;
            format::seal(&plaintext, &s.password, s.kdf_params)?
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, &bytes)?;
    std::fs::rename(&tmp, path)?;

    debug!(path = %path.display(), bytes = bytes.len(), sealed = sealing.is_some(), "wrote store");
    Ok(())
}
