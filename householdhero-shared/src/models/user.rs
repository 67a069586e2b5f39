/// User model and database operations
///
/// Users register on their own and start without a household. They join one
/// exactly once, either by creating it (becoming its first admin) or by
/// accepting an invitation. After that the household link is never changed.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('admin', 'parent', 'member', 'staff');
/// CREATE TYPE user_status AS ENUM ('active', 'suspended');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email CITEXT NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     name VARCHAR(255),
///     role user_role NOT NULL DEFAULT 'member',
///     household_id UUID REFERENCES households(id) ON DELETE RESTRICT,
///     status user_status NOT NULL DEFAULT 'active',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use householdhero_shared::models::user::{User, CreateUser};
/// use householdhero_shared::db::pool::{create_pool, PoolSettings};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(PoolSettings::new("postgresql://localhost/householdhero")).await?;
///
/// let user = User::create(&pool, CreateUser {
///     email: "sam@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     name: Some("Sam".to_string()),
/// }).await?;
///
/// assert!(user.household_id.is_none());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use std::fmt;
use uuid::Uuid;

/// Permission tier of a user within their household
///
/// Privilege order: Admin > Parent > Member / Staff. Staff is limited to
/// operational resources (no finance, no staff or member management).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Household administrator; the household creator starts here
    Admin,

    /// Guardian with access to finance and staff
    Parent,

    /// Regular household member
    Member,

    /// Employed help with operational access only
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Parent => "parent",
            Role::Member => "member",
            Role::Staff => "staff",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "parent" => Some(Role::Parent),
            "member" => Some(Role::Member),
            "staff" => Some(Role::Staff),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account status, managed by household admins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Can sign in and use the API
    Active,

    /// Blocked from signing in and from every authenticated route
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Suspended => "suspended",
        }
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address (case-insensitive via CITEXT)
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Optional display name
    pub name: Option<String>,

    /// Role within the household
    pub role: Role,

    /// Household the user belongs to (None until created or joined)
    pub household_id: Option<Uuid>,

    /// Account status
    pub status: UserStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// When the user last logged in (None if never logged in)
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Returns true if the account may authenticate
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address (stored case-insensitively via CITEXT)
    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,

    /// Optional display name
    pub name: Option<String>,
}

const USER_COLUMNS: &str = "id, email, password_hash, name, role, household_id, status, \
                            created_at, updated_at, last_login_at";

/// Result of a role or status change guarded by the last-admin rule
#[derive(Debug, Clone)]
pub enum MemberChange {
    /// Applied; `previous` is the row as it was before the change
    Updated { previous: User, user: User },

    /// No such user in the household
    NotFound,

    /// The change would leave the household without an active admin
    LastActiveAdmin,
}

/// Locks the household's active admin rows, in id order, and returns their ids
async fn lock_active_admins(
    tx: &mut Transaction<'_, Postgres>,
    household_id: Uuid,
) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows: Vec<(Uuid,)> = sqlx::query_as(
        r#"
        SELECT id FROM users
        WHERE household_id = $1 AND role = 'admin' AND status = 'active'
        ORDER BY id
        FOR UPDATE
        "#,
    )
    .bind(household_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

async fn lock_member(
    tx: &mut Transaction<'_, Postgres>,
    household_id: Uuid,
    id: Uuid,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE id = $1 AND household_id = $2 FOR UPDATE",
        USER_COLUMNS
    ))
    .bind(id)
    .bind(household_id)
    .fetch_optional(&mut **tx)
    .await
}


impl User {
    /// Creates a new user without a household
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already registered (unique constraint)
    /// or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, name) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.name)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email (case-insensitive)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user inside a household
    ///
    /// Returns None for users of other households, so admins can never act on
    /// accounts outside their own tenant.
    pub async fn find_in_household(
        pool: &PgPool,
        household_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1 AND household_id = $2",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(household_id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists household members, oldest account first
    pub async fn list_by_household(
        pool: &PgPool,
        household_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE household_id = $1 ORDER BY created_at ASC",
            USER_COLUMNS
        ))
        .bind(household_id)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Attaches a user to a household with the given role
    ///
    /// Only succeeds while the user has no household yet. Returns None if the
    /// user already belongs to one.
    pub async fn join_household(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        household_id: Uuid,
        role: Role,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET household_id = $2, role = $3, updated_at = NOW()
            WHERE id = $1 AND household_id IS NULL
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(household_id)
        .bind(role)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(user)
    }

    /// Changes the role of a household member
    ///
    /// Refuses to demote the household's last active admin. The household's
    /// active admin rows are locked for the duration of the check and update,
    /// so concurrent demotions are serialized.
    pub async fn update_role(
        pool: &PgPool,
        household_id: Uuid,
        id: Uuid,
        role: Role,
    ) -> Result<MemberChange, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let admins = lock_active_admins(&mut tx, household_id).await?;
        let Some(previous) = lock_member(&mut tx, household_id, id).await? else {
            return Ok(MemberChange::NotFound);
        };

        if admins.contains(&id) && role != Role::Admin && admins.len() <= 1 {
            return Ok(MemberChange::LastActiveAdmin);
        }

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET role = $3, updated_at = NOW()
            WHERE id = $1 AND household_id = $2
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(household_id)
        .bind(role)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(MemberChange::Updated { previous, user })
    }

    /// Changes the account status of a household member
    ///
    /// Refuses to suspend the household's last active admin, with the same
    /// locking as [`User::update_role`].
    pub async fn update_status(
        pool: &PgPool,
        household_id: Uuid,
        id: Uuid,
        status: UserStatus,
    ) -> Result<MemberChange, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let admins = lock_active_admins(&mut tx, household_id).await?;
        let Some(previous) = lock_member(&mut tx, household_id, id).await? else {
            return Ok(MemberChange::NotFound);
        };

        if admins.contains(&id) && status == UserStatus::Suspended && admins.len() <= 1 {
            return Ok(MemberChange::LastActiveAdmin);
        }

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND household_id = $2
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(household_id)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(MemberChange::Updated { previous, user })
    }

    /// Counts active admins of a household
    pub async fn count_admins(pool: &PgPool, household_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM users WHERE household_id = $1 AND role = 'admin' AND status = 'active'",
        )
        .bind(household_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Records a successful login
    pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET last_login_at = NOW(), updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_user(role: Role, household_id: Option<Uuid>) -> User {
        User {
            id: Uuid::new_v4(),
            email: "pat@example.com".to_string(),
            password_hash: "$argon2id$test".to_string(),
            name: Some("Pat".to_string()),
            role,
            household_id,
            status: UserStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        }
    }

    #[test]
    fn test_role_as_str_from_str() {
        for role in [Role::Admin, Role::Parent, Role::Member, Role::Staff] {
            assert_eq!(Role::from_str(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_str("owner"), None);
        assert_eq!(Role::Parent.to_string(), "parent");
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Staff).unwrap(), "\"staff\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_user_is_active() {
        let mut user = sample_user(Role::Member, None);
        assert!(user.is_active());

        user.status = UserStatus::Suspended;
        assert!(!user.is_active());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = sample_user(Role::Member, None);
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "member");
        assert!(json["household_id"].is_null());
    }
}
