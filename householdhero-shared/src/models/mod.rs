/// Database models
///
/// Tenant-scoped models take the caller's household ID on every query and put
/// it in the `WHERE` clause, so a row of another household behaves exactly
/// like a missing row.
///
/// # Models
///
/// - `user`, `household`, `invitation`: accounts and tenancy
/// - `task`, `inventory`, `calendar_event`, `recipe`, `pet`, `vehicle`:
///   everyday household resources
/// - `budget`, `transaction`: household finances
/// - `employee`: household staff records

pub mod budget;
pub mod calendar_event;
pub mod employee;
pub mod household;
pub mod inventory;
pub mod invitation;
pub mod pet;
pub mod recipe;
pub mod task;
pub mod transaction;
pub mod user;
pub mod vehicle;
