/// Household invitation model and database operations
///
/// Invitations are the only way to join an existing household. They carry the
/// role the new member receives, expire, and can be accepted exactly once.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE invitations (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     household_id UUID NOT NULL REFERENCES households(id) ON DELETE CASCADE,
///     role user_role NOT NULL,
///     code_hash VARCHAR(64) NOT NULL UNIQUE,
///     created_by UUID NOT NULL REFERENCES users(id),
///     expires_at TIMESTAMPTZ NOT NULL,
///     accepted_by UUID REFERENCES users(id),
///     accepted_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT invitations_role_check CHECK (role <> 'admin')
/// );
/// ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::user::{Role, User};
use crate::auth::invite_code::{generate_invite_code, hash_invite_code};

/// Why an invitation could not be issued or accepted
#[derive(Debug, thiserror::Error)]
pub enum InvitationError {
    /// No invitation matches the code
    #[error("Invitation not found")]
    NotFound,

    /// Invitation has passed its expiry
    #[error("Invitation has expired")]
    Expired,

    /// Invitation was already used
    #[error("Invitation has already been accepted")]
    AlreadyAccepted,

    /// Accepting user is already in a household
    #[error("User already belongs to a household")]
    AlreadyMember,

    /// Invitations cannot grant the admin role
    #[error("Invitations cannot grant the '{0}' role")]
    RoleNotInvitable(Role),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Stored invitation (code hash only)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Invitation {
    pub id: Uuid,

    /// Household the invitation grants access to
    pub household_id: Uuid,

    /// Role given to the accepting user
    pub role: Role,

    /// SHA-256 of the plaintext code
    #[serde(skip_serializing)]
    pub code_hash: String,

    /// Issuing user
    pub created_by: Uuid,

    pub expires_at: DateTime<Utc>,

    pub accepted_by: Option<Uuid>,
    pub accepted_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl Invitation {
    /// Returns true once the expiry has passed
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Returns true once someone accepted the invitation
    pub fn is_accepted(&self) -> bool {
        self.accepted_at.is_some()
    }
}

/// Input for issuing an invitation
#[derive(Debug, Clone)]
pub struct CreateInvitation {
    pub household_id: Uuid,
    pub role: Role,
    pub created_by: Uuid,

    /// How long the code stays valid
    pub ttl: Duration,
}

const INVITATION_COLUMNS: &str = "id, household_id, role, code_hash, created_by, expires_at, \
                                  accepted_by, accepted_at, created_at";

impl Invitation {
    /// Issues an invitation
    ///
    /// # Returns
    ///
    /// The stored invitation and the plaintext code. The code is not
    /// recoverable afterwards.
    ///
    /// # Errors
    ///
    /// `RoleNotInvitable` for [`Role::Admin`]; the admin role is only
    /// reachable by creating a household or through a role change.
    pub async fn create(
        pool: &PgPool,
        data: CreateInvitation,
    ) -> Result<(Self, String), InvitationError> {
        if data.role == Role::Admin {
            return Err(InvitationError::RoleNotInvitable(data.role));
        }

        let (code, code_hash) = generate_invite_code();
        let expires_at = Utc::now() + data.ttl;

        let invitation = sqlx::query_as::<_, Invitation>(&format!(
            r#"
            INSERT INTO invitations (household_id, role, code_hash, created_by, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            INVITATION_COLUMNS
        ))
        .bind(data.household_id)
        .bind(data.role)
        .bind(code_hash)
        .bind(data.created_by)
        .bind(expires_at)
        .fetch_one(pool)
        .await?;

        Ok((invitation, code))
    }

    /// Lists a household's invitations, newest first
    pub async fn list_by_household(
        pool: &PgPool,
        household_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let invitations = sqlx::query_as::<_, Invitation>(&format!(
            "SELECT {} FROM invitations WHERE household_id = $1 ORDER BY created_at DESC",
            INVITATION_COLUMNS
        ))
        .bind(household_id)
        .fetch_all(pool)
        .await?;

        Ok(invitations)
    }

    /// Accepts an invitation on behalf of a user
    ///
    /// Locks the invitation row, checks it is neither expired nor used, attaches
    /// the user to the household with the invited role and marks the invitation
    /// accepted, all in one transaction.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Expired`, `AlreadyAccepted` or `AlreadyMember`. Nothing is
    /// written when an error is returned.
    pub async fn accept(pool: &PgPool, code: &str, user_id: Uuid) -> Result<User, InvitationError> {
        let mut tx = pool.begin().await?;

        let invitation = sqlx::query_as::<_, Invitation>(&format!(
            "SELECT {} FROM invitations WHERE code_hash = $1 FOR UPDATE",
            INVITATION_COLUMNS
        ))
        .bind(hash_invite_code(code))
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(InvitationError::NotFound)?;

        if invitation.is_accepted() {
            return Err(InvitationError::AlreadyAccepted);
        }
        if invitation.is_expired() {
            return Err(InvitationError::Expired);
        }

        let user = User::join_household(&mut tx, user_id, invitation.household_id, invitation.role)
            .await?
            .ok_or(InvitationError::AlreadyMember)?;

        sqlx::query("UPDATE invitations SET accepted_by = $2, accepted_at = NOW() WHERE id = $1")
            .bind(invitation.id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            household_id = %invitation.household_id,
            user_id = %user_id,
            role = %invitation.role,
            "Invitation accepted"
        );

        Ok(user)
    }

    /// Revokes an unaccepted invitation
    pub async fn delete(pool: &PgPool, household_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM invitations WHERE id = $1 AND household_id = $2 AND accepted_at IS NULL",
        )
        .bind(id)
        .bind(household_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invitation(expires_at: DateTime<Utc>, accepted_at: Option<DateTime<Utc>>) -> Invitation {
        Invitation {
            id: Uuid::new_v4(),
            household_id: Uuid::new_v4(),
            role: Role::Member,
            code_hash: hash_invite_code("hh_test"),
            created_by: Uuid::new_v4(),
            expires_at,
            accepted_by: accepted_at.map(|_| Uuid::new_v4()),
            accepted_at,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_expiry() {
        assert!(!invitation(Utc::now() + Duration::hours(1), None).is_expired());
        assert!(invitation(Utc::now() - Duration::seconds(1), None).is_expired());
    }

    #[test]
    fn test_accepted() {
        assert!(!invitation(Utc::now() + Duration::hours(1), None).is_accepted());
        assert!(invitation(Utc::now() + Duration::hours(1), Some(Utc::now())).is_accepted());
    }

    #[test]
    fn test_code_hash_not_serialized() {
        let json = serde_json::to_value(invitation(Utc::now(), None)).unwrap();
        assert!(json.get("code_hash").is_none());
        assert_eq!(json["role"], "member");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            InvitationError::RoleNotInvitable(Role::Admin).to_string(),
            "Invitations cannot grant the 'admin' role"
        );
        assert!(InvitationError::Expired.to_string().contains("expired"));
    }
}
