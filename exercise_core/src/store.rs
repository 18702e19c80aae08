//! User persistence.
//!
//! [`UserStore`] is the seam every operation goes through. Two
//! implementations are provided:
//! - [`MemoryStore`]: in-process, for tests and throwaway servers
//! - [`JsonFileStore`]: a single JSON document with file locking and
//!   atomic replacement

use crate::{Error, FieldError, Result, User, UserSummary};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Persistence for user records
pub trait UserStore: Send + Sync {
    /// Create and persist a user with an empty log
    fn create(&self, username: &str) -> Result<User>;

    /// Fetch a full user record
    ///
    /// Fails with [`Error::InvalidId`] for a malformed id and
    /// [`Error::NotFound`] for an unknown one.
    fn find_by_id(&self, id: &str) -> Result<User>;

    /// Every user projected to id and username, in creation order
    fn list_all(&self) -> Result<Vec<UserSummary>>;

    /// Persist changes to an existing user
    fn save(&self, user: &User) -> Result<User>;
}

/// Parse an external user id
pub fn parse_user_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id.trim()).map_err(|_| Error::InvalidId(id.to_string()))
}

/// Check the invariants a user record must satisfy before it is persisted
pub fn validate_user(user: &User) -> Result<()> {
    let mut errors = Vec::new();

    if user.username.trim().is_empty() {
        errors.push(FieldError::required("username"));
    }

    for (i, entry) in user.log.iter().enumerate() {
        if entry.description.trim().is_empty() {
            errors.push(FieldError::required(&format!("log.{}.description", i)));
        }
    }

    if user.count != user.log.len() {
        errors.push(FieldError::new(
            "count",
            format!(
                "count ({}) does not match log length ({})",
                user.count,
                user.log.len()
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(errors))
    }
}

fn new_user(username: &str) -> Result<User> {
    let user = User::new(username.trim());
    validate_user(&user)?;
    Ok(user)
}

// ============================================================================
// In-memory store
// ============================================================================

/// Mutex-guarded in-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<User>>> {
        self.users
            .lock()
            .map_err(|_| Error::Other("user store lock poisoned".into()))
    }
}

impl UserStore for MemoryStore {
    fn create(&self, username: &str) -> Result<User> {
        let user = new_user(username)?;
        self.lock()?.push(user.clone());
        tracing::debug!("Created user {} ({})", user.id, user.username);
        Ok(user)
    }

    fn find_by_id(&self, id: &str) -> Result<User> {
        let id = parse_user_id(id)?;
        self.lock()?
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn list_all(&self) -> Result<Vec<UserSummary>> {
        Ok(self.lock()?.iter().map(User::summary).collect())
    }

    fn save(&self, user: &User) -> Result<User> {
        validate_user(user)?;
        let mut users = self.lock()?;
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| Error::NotFound(user.id.to_string()))?;
        *slot = user.clone();
        tracing::debug!("Saved user {} ({} entries)", user.id, user.count);
        Ok(user.clone())
    }
}

// ============================================================================
// JSON file store
// ============================================================================

/// On-disk document layout
#[derive(Debug, Default, Serialize, Deserialize)]
struct UsersFile {
    users: Vec<User>,
}

/// All users in one JSON document
///
/// Readers take a shared lock on the document. Writers hold an exclusive
/// lock on a sidecar `.lock` file for the whole read-modify-write, then
/// replace the document by renaming a synced temp file over it.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by the given document path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Read the document with a shared lock
    ///
    /// A missing file is an empty store. A corrupted file is an error.
    fn read(&self) -> Result<UsersFile> {
        if !self.path.exists() {
            return Ok(UsersFile::default());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read_result = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read_result?;

        if contents.trim().is_empty() {
            return Ok(UsersFile::default());
        }

        let doc: UsersFile = serde_json::from_str(&contents).map_err(|e| {
            tracing::warn!("User store {:?} is corrupted: {}", self.path, e);
            Error::Json(e)
        })?;
        tracing::debug!("Read {} users from {:?}", doc.users.len(), self.path);
        Ok(doc)
    }

    /// Atomically replace the document
    fn write(&self, doc: &UsersFile) -> Result<()> {
        let parent = self.path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "user store path missing parent")
        })?;
        let temp = NamedTempFile::new_in(parent)?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(doc)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    /// Load, modify and write back the document under the writer lock
    fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut UsersFile) -> Result<T>,
    {
        self.ensure_parent_dir()?;

        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        lock.lock_exclusive()?;

        let result = self.read().and_then(|mut doc| {
            let value = f(&mut doc)?;
            self.write(&doc)?;
            Ok(value)
        });

        lock.unlock()?;
        result
    }
}

impl UserStore for JsonFileStore {
    fn create(&self, username: &str) -> Result<User> {
        let user = new_user(username)?;
        self.update(|doc| {
            doc.users.push(user.clone());
            Ok(())
        })?;
        tracing::debug!("Created user {} ({}) in {:?}", user.id, user.username, self.path);
        Ok(user)
    }

    fn find_by_id(&self, id: &str) -> Result<User> {
        let id = parse_user_id(id)?;
        self.read()?
            .users
            .into_iter()
            .find(|u| u.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn list_all(&self) -> Result<Vec<UserSummary>> {
        Ok(self.read()?.users.iter().map(User::summary).collect())
    }

    fn save(&self, user: &User) -> Result<User> {
        validate_user(user)?;
        self.update(|doc| {
            let slot = doc
                .users
                .iter_mut()
                .find(|u| u.id == user.id)
                .ok_or_else(|| Error::NotFound(user.id.to_string()))?;
            *slot = user.clone();
            Ok(())
        })?;
        tracing::debug!("Saved user {} ({} entries) to {:?}", user.id, user.count, self.path);
        Ok(user.clone())
    }
}
