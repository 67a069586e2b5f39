/// Authentication and household access control
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength rules
/// - [`jwt`]: access/refresh token issuance and validation
/// - [`invite_code`]: household invitation code generation and hashing
/// - [`access`]: membership and role checks for household-scoped operations

pub mod access;
pub mod invite_code;
pub mod jwt;
pub mod password;
