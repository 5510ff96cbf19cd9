//! Filesystem-backed JSON document store.
//!
//! Layout: `<root>/users/<user>/<collection>.json`, one file per user per
//! collection, each holding an id-keyed map of documents. Writes go through
//! a temp file followed by a rename so a failed save leaves the previous
//! file intact.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::UserId;
use crate::core::utils::{app_data_dir, ensure_dir};
use crate::domain::RecordId;
use crate::errors::{LedgerError, Result};

use super::{Collection, Document, DocumentStore};

const STORE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
const USERS_DIR: &str = "users";

/// Per-user JSON document store rooted at a data directory.
#[derive(Clone)]
pub struct JsonStore {
    users_dir: PathBuf,
}

impl JsonStore {
    pub fn new(root: PathBuf) -> Result<Self> {
        let users_dir = root.join(USERS_DIR);
        ensure_dir(&users_dir)?;
        Ok(Self { users_dir })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(app_data_dir())
    }

    /// Canonical file path for one user's collection.
    pub fn collection_path(&self, user: &UserId, collection: Collection) -> PathBuf {
        self.users_dir
            .join(canonical_user(user))
            .join(format!("{}.{}", collection.as_str(), STORE_EXTENSION))
    }

    fn read_collection(&self, user: &UserId, collection: Collection) -> Result<CollectionFile> {
        let path = self.collection_path(user, collection);
        if path.exists() {
            let data = fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(CollectionFile::default())
        }
    }

    fn write_collection(
        &self,
        user: &UserId,
        collection: Collection,
        file: &CollectionFile,
    ) -> Result<()> {
        let path = self.collection_path(user, collection);
        let data = serde_json::to_string_pretty(file)?;
        write_atomic(&path, &data)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CollectionFile {
    #[serde(default)]
    records: BTreeMap<String, Value>,
}

impl DocumentStore for JsonStore {
    fn create(&self, user: &UserId, collection: Collection, fields: Value) -> Result<RecordId> {
        let mut file = self.read_collection(user, collection)?;
        let id = RecordId::generate();
        file.records.insert(id.as_str().to_string(), fields);
        self.write_collection(user, collection, &file)?;
        tracing::debug!(user = %user, %collection, %id, "document created");
        Ok(id)
    }

    fn list_all(&self, user: &UserId, collection: Collection) -> Result<Vec<Document>> {
        let file = self.read_collection(user, collection)?;
        Ok(file
            .records
            .into_iter()
            .map(|(id, fields)| Document {
                id: RecordId::from(id),
                fields,
            })
            .collect())
    }

    fn update(
        &self,
        user: &UserId,
        collection: Collection,
        id: &RecordId,
        changes: Map<String, Value>,
    ) -> Result<()> {
        let mut file = self.read_collection(user, collection)?;
        let document = file.records.get_mut(id.as_str()).ok_or_else(|| {
            LedgerError::NotFound {
                collection: collection.as_str(),
                id: id.to_string(),
            }
        })?;
        merge_fields(document, changes);
        self.write_collection(user, collection, &file)?;
        tracing::debug!(user = %user, %collection, %id, "document updated");
        Ok(())
    }

    fn delete(&self, user: &UserId, collection: Collection, id: &RecordId) -> Result<()> {
        let mut file = self.read_collection(user, collection)?;
        if file.records.remove(id.as_str()).is_none() {
            return Err(LedgerError::NotFound {
                collection: collection.as_str(),
                id: id.to_string(),
            });
        }
        self.write_collection(user, collection, &file)?;
        tracing::debug!(user = %user, %collection, %id, "document deleted");
        Ok(())
    }
}

fn merge_fields(document: &mut Value, changes: Map<String, Value>) {
    if !document.is_object() {
        *document = Value::Object(Map::new());
    }
    if let Value::Object(fields) = document {
        for (key, value) in changes {
            if value.is_null() {
                fields.remove(&key);
            } else {
                fields.insert(key, value);
            }
        }
    }
}

/// Directory-safe rendition of an opaque user id.
fn canonical_user(user: &UserId) -> String {
    let sanitized: String = user
        .as_str()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "user".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
