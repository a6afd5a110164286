//! User store implementation using redb.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use redb::{Database, ReadableTable, TableDefinition, WriteTransaction};
use tracing::{debug, error, info, trace, warn};
use uuid::Uuid;

use super::error::StoreError;
use super::password::hash_password;
use super::tables::{
    EMAIL_IDS, ID_EMAILS, ID_USERNAMES, LOWERCASED_EMAILS, LOWERCASED_USERNAMES, META,
    USERNAME_IDS, USERS,
};
use super::types::{BasicUserData, Change, NewUser, PrivateUserData, User};

const META_VERSION_KEY: &str = "version";

/// Current store layout version (1).
/// Increment this when changing the table layout or the record encoding.
/// The store will reject opening databases with a different version.
const STORE_VERSION: u32 = 1;

/// Persistent user records and their secondary indexes.
///
/// Every mutating method runs in a single redb write transaction and every
/// reading method in a read transaction. redb admits one writer at a time, so
/// read-modify-write through [`update_user`](Self::update_user) is atomic with
/// respect to all other mutations. Readers never block.
///
/// # Example
///
/// ```ignore
/// use users_service::store::{NewUser, UserStore};
///
/// let store = UserStore::open("data/users/users.db")?;
/// let uid = store.register_user(NewUser {
///     email: "bob@example.com".into(),
///     username: "bob".into(),
///     password: "hunter2".into(),
///     ..NewUser::default()
/// })?;
///
/// assert_eq!(store.find_user_id_by_username("BOB")?, uid);
/// ```
///
/// # Indexes
///
/// Usernames and emails each have three index tables: case-preserved value to
/// user-id, lowercased value to canonical value, and user-id to canonical
/// value. Lookups go through the lowercased table, so they are
/// case-insensitive while storage keeps the original casing.
pub struct UserStore {
    db: Database,
    path: PathBuf,
}

impl UserStore {
    /// Open the store at `path`, creating the file and its parent directories
    /// if needed.
    ///
    /// A new database file is created with mode 0600 on unix.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening user store");

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                error!(path = %parent.display(), error = %e, "failed to create store directory");
                e
            })?;
        }
        create_private_file(path)?;

        let db = Database::create(path)?;
        let store = Self {
            db,
            path: path.to_path_buf(),
        };
        store.init_tables()?;

        info!(path = %path.display(), version = STORE_VERSION, "user store opened");
        Ok(store)
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the engine handle.
    pub fn close(self) {
        let Self { db, path } = self;
        drop(db);
        info!(path = %path.display(), "user store closed");
    }

    /// Register a new user and return its generated user-id.
    ///
    /// Fails with [`StoreError::EmailAlreadyExists`] or
    /// [`StoreError::UsernameAlreadyExists`] when a case-insensitive match is
    /// already registered. Nothing is written in that case.
    pub fn register_user(&self, new_user: NewUser) -> Result<String, StoreError> {
        let NewUser {
            email,
            name,
            pic_url,
            username,
            alias,
            about,
            password,
        } = new_user;
        debug!(username = %username, email = %email, "registering user");

        let lower_email = email.to_lowercase();
        let lower_username = username.to_lowercase();

        // bcrypt is slow; keep it outside the writer lock
        let password = hash_password(&password)?;

        let txn = self.db.begin_write()?;
        let uid = {
            let mut lowercased_emails = txn.open_table(LOWERCASED_EMAILS)?;
            if lowercased_emails.get(lower_email.as_str())?.is_some() {
                warn!(email = %email, "email already registered");
                return Err(StoreError::EmailAlreadyExists(email));
            }

            let mut lowercased_usernames = txn.open_table(LOWERCASED_USERNAMES)?;
            if lowercased_usernames.get(lower_username.as_str())?.is_some() {
                warn!(username = %username, "username already registered");
                return Err(StoreError::UsernameAlreadyExists(username));
            }

            let mut users = txn.open_table(USERS)?;
            let uid = loop {
                let candidate = Uuid::new_v4().to_string();
                if users.get(candidate.as_str())?.is_none() {
                    break candidate;
                }
            };

            let user = User::new(
                BasicUserData {
                    name,
                    pic_url,
                    username: username.clone(),
                    alias,
                    about,
                },
                PrivateUserData {
                    email: email.clone(),
                    password,
                },
            );
            let bytes = bincode::serialize(&user)?;
            users.insert(uid.as_str(), bytes.as_slice())?;

            let mut username_ids = txn.open_table(USERNAME_IDS)?;
            let mut id_usernames = txn.open_table(ID_USERNAMES)?;
            let mut email_ids = txn.open_table(EMAIL_IDS)?;
            let mut id_emails = txn.open_table(ID_EMAILS)?;

            username_ids.insert(username.as_str(), uid.as_str())?;
            lowercased_usernames.insert(lower_username.as_str(), username.as_str())?;
            id_usernames.insert(uid.as_str(), username.as_str())?;
            email_ids.insert(email.as_str(), uid.as_str())?;
            lowercased_emails.insert(lower_email.as_str(), email.as_str())?;
            id_emails.insert(uid.as_str(), email.as_str())?;

            uid
        };
        txn.commit()?;

        info!(uid = %uid, username = %username, "user registered");
        Ok(uid)
    }

    /// Load the record of `uid`.
    pub fn user(&self, uid: &str) -> Result<User, StoreError> {
        trace!(uid = uid, "loading user");
        let txn = self.db.begin_read()?;
        let users = txn.open_table(USERS)?;
        let Some(bytes) = users.get(uid)? else {
            return Err(StoreError::UserNotFound(uid.to_string()));
        };
        let user: User = bincode::deserialize(bytes.value())?;
        Ok(user)
    }

    /// Point the username indexes of `uid` at `new_username`, removing the
    /// bindings of its previous username.
    ///
    /// Only the indexes change; the username inside the record is updated by
    /// [`update_user`](Self::update_user). [`rename_user`](Self::rename_user)
    /// does both in one transaction.
    pub fn map_username(&self, new_username: &str, uid: &str) -> Result<(), StoreError> {
        debug!(uid = uid, new_username = new_username, "mapping username");
        let txn = self.db.begin_write()?;
        Self::remap_username_in(&txn, new_username, uid)?;
        txn.commit()?;
        debug!(uid = uid, new_username = new_username, "username mapped");
        Ok(())
    }

    /// Read-modify-write the record of `uid`.
    ///
    /// `transform` must not call back into the store. When it returns
    /// [`Change::Unchanged`] nothing is written.
    pub fn update_user<F>(&self, uid: &str, transform: F) -> Result<Change, StoreError>
    where
        F: FnOnce(&mut User) -> Change,
    {
        debug!(uid = uid, "updating user");
        let txn = self.db.begin_write()?;
        let change = Self::update_user_in(&txn, uid, transform)?;
        txn.commit()?;
        trace!(uid = uid, change = ?change, "user update committed");
        Ok(change)
    }

    /// Change the username of `uid` and apply `transform`, indexes and record
    /// together in a single transaction.
    pub fn rename_user<F>(
        &self,
        uid: &str,
        new_username: &str,
        transform: F,
    ) -> Result<Change, StoreError>
    where
        F: FnOnce(&mut User) -> Change,
    {
        debug!(uid = uid, new_username = new_username, "renaming user");
        let txn = self.db.begin_write()?;
        Self::remap_username_in(&txn, new_username, uid)?;

        let username = new_username.to_string();
        let change = Self::update_user_in(&txn, uid, move |user| {
            let renamed = user.basic.username != username;
            user.basic.username = username;
            let change = transform(user);
            if renamed { Change::Modified } else { change }
        })?;
        txn.commit()?;

        info!(uid = uid, new_username = new_username, "user renamed");
        Ok(change)
    }

    /// Case-insensitive username lookup.
    pub fn find_user_id_by_username(&self, username: &str) -> Result<String, StoreError> {
        trace!(username = username, "resolving username");
        self.resolve_id(LOWERCASED_USERNAMES, USERNAME_IDS, username)?
            .ok_or_else(|| StoreError::UsernameNotFound(username.to_string()))
    }

    /// Case-insensitive email lookup.
    pub fn find_user_id_by_email(&self, email: &str) -> Result<String, StoreError> {
        trace!(email = email, "resolving email");
        self.resolve_id(LOWERCASED_EMAILS, EMAIL_IDS, email)?
            .ok_or_else(|| StoreError::EmailNotFound(email.to_string()))
    }

    /// Canonical username currently indexed for `uid`.
    pub fn username_of(&self, uid: &str) -> Result<String, StoreError> {
        self.canonical_of(ID_USERNAMES, uid)
    }

    /// Canonical email currently indexed for `uid`.
    pub fn email_of(&self, uid: &str) -> Result<String, StoreError> {
        self.canonical_of(ID_EMAILS, uid)
    }

    // Helper methods

    fn init_tables(&self) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        {
            // Opening a table in a write transaction creates it
            let _ = txn.open_table(USERS)?;
            let _ = txn.open_table(USERNAME_IDS)?;
            let _ = txn.open_table(LOWERCASED_USERNAMES)?;
            let _ = txn.open_table(ID_USERNAMES)?;
            let _ = txn.open_table(EMAIL_IDS)?;
            let _ = txn.open_table(LOWERCASED_EMAILS)?;
            let _ = txn.open_table(ID_EMAILS)?;

            let mut meta = txn.open_table(META)?;
            let stored = meta.get(META_VERSION_KEY)?.map(|v| v.value());
            match stored {
                Some(version) if version != STORE_VERSION => {
                    error!(
                        stored_version = version,
                        expected_version = STORE_VERSION,
                        "store version mismatch"
                    );
                    return Err(StoreError::InvalidFormat(format!(
                        "Store version mismatch: expected {}, got {}",
                        STORE_VERSION, version
                    )));
                }
                Some(version) => trace!(version = version, "store version verified"),
                None => {
                    meta.insert(META_VERSION_KEY, STORE_VERSION)?;
                }
            }
        }
        txn.commit()?;
        Ok(())
    }

    fn remap_username_in(
        txn: &WriteTransaction,
        new_username: &str,
        uid: &str,
    ) -> Result<(), StoreError> {
        let mut username_ids = txn.open_table(USERNAME_IDS)?;
        let mut lowercased = txn.open_table(LOWERCASED_USERNAMES)?;
        let mut id_usernames = txn.open_table(ID_USERNAMES)?;

        let lower_new = new_username.to_lowercase();
        let existing = lowercased
            .get(lower_new.as_str())?
            .map(|canonical| canonical.value().to_string());
        if let Some(canonical) = existing {
            let owner = username_ids
                .get(canonical.as_str())?
                .map(|id| id.value().to_string());
            if owner.as_deref() != Some(uid) {
                warn!(uid = uid, username = new_username, "username taken by another user");
                return Err(StoreError::UsernameAlreadyExists(new_username.to_string()));
            }
        }

        let old = id_usernames
            .get(uid)?
            .map(|name| name.value().to_string())
            .ok_or_else(|| StoreError::UserNotFound(uid.to_string()))?;
        trace!(uid = uid, old = %old, new = new_username, "replacing username bindings");

        username_ids.remove(old.as_str())?;
        lowercased.remove(old.to_lowercase().as_str())?;

        username_ids.insert(new_username, uid)?;
        lowercased.insert(lower_new.as_str(), new_username)?;
        id_usernames.insert(uid, new_username)?;
        Ok(())
    }

    fn update_user_in<F>(
        txn: &WriteTransaction,
        uid: &str,
        transform: F,
    ) -> Result<Change, StoreError>
    where
        F: FnOnce(&mut User) -> Change,
    {
        let mut users = txn.open_table(USERS)?;
        let mut user: User = match users.get(uid)? {
            Some(bytes) => bincode::deserialize(bytes.value())?,
            None => return Err(StoreError::UserNotFound(uid.to_string())),
        };

        let change = transform(&mut user);
        if change == Change::Modified {
            let bytes = bincode::serialize(&user)?;
            users.insert(uid, bytes.as_slice())?;
        }
        Ok(change)
    }

    fn resolve_id(
        &self,
        lowercased: TableDefinition<&str, &str>,
        ids: TableDefinition<&str, &str>,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        let txn = self.db.begin_read()?;
        let lowercased = txn.open_table(lowercased)?;
        let Some(canonical) = lowercased
            .get(key.to_lowercase().as_str())?
            .map(|c| c.value().to_string())
        else {
            return Ok(None);
        };

        let ids = txn.open_table(ids)?;
        let uid = ids.get(canonical.as_str())?.map(|id| id.value().to_string());
        Ok(uid)
    }

    fn canonical_of(
        &self,
        table: TableDefinition<&str, &str>,
        uid: &str,
    ) -> Result<String, StoreError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(table)?;
        let value = table.get(uid)?.map(|v| v.value().to_string());
        value.ok_or_else(|| StoreError::UserNotFound(uid.to_string()))
    }
}

/// Create an empty database file readable only by its owner.
fn create_private_file(path: &Path) -> Result<(), StoreError> {
    if path.exists() {
        return Ok(());
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)?;
    trace!(path = %path.display(), "created database file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::password::verify_password;
    use tempfile::TempDir;

    fn open_temp() -> (UserStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = UserStore::open(dir.path().join("users").join("users.db")).unwrap();
        (store, dir)
    }

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            name: format!("{} name", username),
            pic_url: format!("https://pics.example/{}.png", username),
            username: username.into(),
            alias: username.to_uppercase(),
            about: String::new(),
            password: "secret".into(),
        }
    }

    #[test]
    fn test_register_and_fetch() {
        let (store, _dir) = open_temp();
        let uid = store
            .register_user(NewUser {
                email: "luisguveal@gmail.com".into(),
                username: "luiSguve".into(),
                password: "1747018Lv/".into(),
                ..NewUser::default()
            })
            .unwrap();

        assert_eq!(store.find_user_id_by_username("LUISGUVE").unwrap(), uid);
        assert_eq!(store.find_user_id_by_username("luisguve").unwrap(), uid);
        assert_eq!(store.find_user_id_by_email("LuisGuveal@Gmail.com").unwrap(), uid);

        let user = store.user(&uid).unwrap();
        assert_eq!(user.basic.username, "luiSguve");
        assert_eq!(user.private.email, "luisguveal@gmail.com");
        assert_ne!(user.private.password, "1747018Lv/");
        assert!(verify_password("1747018Lv/", &user.private.password));
        assert!(user.following_ids.is_empty());
        assert!(user.recent_activity.is_none());
        assert_eq!(user.last_time_created, 0);

        assert_eq!(store.username_of(&uid).unwrap(), "luiSguve");
        assert_eq!(store.email_of(&uid).unwrap(), "luisguveal@gmail.com");
    }

    #[test]
    fn test_duplicate_username_is_case_insensitive() {
        let (store, _dir) = open_temp();
        store.register_user(new_user("alice", "alice@example.com")).unwrap();

        let err = store
            .register_user(new_user("ALICE", "other@example.com"))
            .unwrap_err();
        assert!(matches!(err, StoreError::UsernameAlreadyExists(ref u) if u == "ALICE"));
        assert!(err.is_conflict());

        // Nothing from the failed registration is visible
        assert!(matches!(
            store.find_user_id_by_email("other@example.com"),
            Err(StoreError::EmailNotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_email_is_checked_first() {
        let (store, _dir) = open_temp();
        store.register_user(new_user("alice", "alice@example.com")).unwrap();

        let err = store
            .register_user(new_user("alice", "ALICE@example.com"))
            .unwrap_err();
        assert!(matches!(err, StoreError::EmailAlreadyExists(_)));
    }

    #[test]
    fn test_missing_lookups() {
        let (store, _dir) = open_temp();
        assert!(matches!(store.user("nope"), Err(StoreError::UserNotFound(_))));
        assert!(matches!(
            store.find_user_id_by_username("nope"),
            Err(StoreError::UsernameNotFound(_))
        ));
        assert!(matches!(
            store.find_user_id_by_email("nope@example.com"),
            Err(StoreError::EmailNotFound(_))
        ));
        assert!(store.user("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_map_username_then_update() {
        let (store, _dir) = open_temp();
        let uid = store.register_user(new_user("bob", "bob@example.com")).unwrap();

        store.map_username("bob-2", &uid).unwrap();
        let change = store
            .update_user(&uid, |user| {
                user.basic.username = "bob-2".into();
                Change::Modified
            })
            .unwrap();
        assert_eq!(change, Change::Modified);

        assert!(matches!(
            store.find_user_id_by_username("bob"),
            Err(StoreError::UsernameNotFound(_))
        ));
        assert_eq!(store.find_user_id_by_username("BOB-2").unwrap(), uid);
        assert_eq!(store.username_of(&uid).unwrap(), "bob-2");
        assert_eq!(store.user(&uid).unwrap().basic.username, "bob-2");
    }

    #[test]
    fn test_map_username_rejects_taken_name() {
        let (store, _dir) = open_temp();
        let bob = store.register_user(new_user("bob", "bob@example.com")).unwrap();
        store.register_user(new_user("carol", "carol@example.com")).unwrap();

        let err = store.map_username("Carol", &bob).unwrap_err();
        assert!(matches!(err, StoreError::UsernameAlreadyExists(_)));
        assert_eq!(store.find_user_id_by_username("bob").unwrap(), bob);
    }

    #[test]
    fn test_map_username_allows_case_change_of_own_name() {
        let (store, _dir) = open_temp();
        let uid = store.register_user(new_user("bob", "bob@example.com")).unwrap();

        store.map_username("Bob", &uid).unwrap();
        assert_eq!(store.username_of(&uid).unwrap(), "Bob");
        assert_eq!(store.find_user_id_by_username("bob").unwrap(), uid);
    }

    #[test]
    fn test_map_username_unknown_user() {
        let (store, _dir) = open_temp();
        assert!(matches!(
            store.map_username("ghost", "missing-uid"),
            Err(StoreError::UserNotFound(_))
        ));
        assert!(matches!(
            store.find_user_id_by_username("ghost"),
            Err(StoreError::UsernameNotFound(_))
        ));
    }

    #[test]
    fn test_rename_user_is_atomic() {
        let (store, _dir) = open_temp();
        let uid = store.register_user(new_user("dave", "dave@example.com")).unwrap();

        store
            .rename_user(&uid, "David", |user| {
                user.basic.alias = "Dave".into();
                Change::Modified
            })
            .unwrap();

        let user = store.user(&uid).unwrap();
        assert_eq!(user.basic.username, "David");
        assert_eq!(user.basic.alias, "Dave");
        assert_eq!(store.find_user_id_by_username("david").unwrap(), uid);
        assert!(store.find_user_id_by_username("dave").is_err());
    }

    #[test]
    fn test_rename_user_conflict_leaves_record_untouched() {
        let (store, _dir) = open_temp();
        let uid = store.register_user(new_user("erin", "erin@example.com")).unwrap();
        store.register_user(new_user("frank", "frank@example.com")).unwrap();

        let err = store
            .rename_user(&uid, "FRANK", |user| {
                user.basic.alias = "changed".into();
                Change::Modified
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::UsernameAlreadyExists(_)));
        assert_eq!(store.user(&uid).unwrap().basic.alias, "ERIN");
    }

    #[test]
    fn test_update_user_unchanged_skips_write() {
        let (store, _dir) = open_temp();
        let uid = store.register_user(new_user("gina", "gina@example.com")).unwrap();
        let before = store.user(&uid).unwrap();

        let change = store
            .update_user(&uid, |user| {
                user.basic.about = "discarded".into();
                Change::Unchanged
            })
            .unwrap();
        assert_eq!(change, Change::Unchanged);
        assert_eq!(store.user(&uid).unwrap(), before);
    }

    #[test]
    fn test_update_user_missing() {
        let (store, _dir) = open_temp();
        let err = store.update_user("missing", |_| Change::Modified).unwrap_err();
        assert!(matches!(err, StoreError::UserNotFound(_)));
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users").join("users.db");

        let store = UserStore::open(&path).unwrap();
        let uid = store.register_user(new_user("hank", "hank@example.com")).unwrap();
        store.close();

        let store = UserStore::open(&path).unwrap();
        assert_eq!(store.find_user_id_by_username("Hank").unwrap(), uid);
        assert_eq!(store.path(), path.as_path());
    }

    #[cfg(unix)]
    #[test]
    fn test_database_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let (store, _dir) = open_temp();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
