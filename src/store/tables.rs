use redb::TableDefinition;

/// Users table: user-id -> User (bincode)
pub const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// username (case-preserved) -> user-id
pub const USERNAME_IDS: TableDefinition<&str, &str> = TableDefinition::new("username_ids");

/// lowercased username -> canonical username
pub const LOWERCASED_USERNAMES: TableDefinition<&str, &str> =
    TableDefinition::new("lowercased_usernames");

/// user-id -> canonical username
pub const ID_USERNAMES: TableDefinition<&str, &str> = TableDefinition::new("id_usernames");

/// email (case-preserved) -> user-id
pub const EMAIL_IDS: TableDefinition<&str, &str> = TableDefinition::new("email_ids");

/// lowercased email -> canonical email
pub const LOWERCASED_EMAILS: TableDefinition<&str, &str> =
    TableDefinition::new("lowercased_emails");

/// user-id -> canonical email
pub const ID_EMAILS: TableDefinition<&str, &str> = TableDefinition::new("id_emails");

/// Store metadata (layout version).
pub const META: TableDefinition<&str, u32> = TableDefinition::new("_meta");
