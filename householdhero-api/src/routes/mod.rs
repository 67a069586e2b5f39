/// API route handlers
///
/// Handlers are organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, token refresh
/// - `me`: The authenticated user's own account
/// - `households`: Household creation, overview, members, rename
/// - `invitations`: Issuing, listing, revoking and accepting invitations
/// - `admin`: Member role and account status changes
/// - `tasks`, `inventory`, `calendar`, `recipes`, `pets`, `vehicles`: shared household resources
/// - `finance`: Budgets and transactions
/// - `employees`: Household staff records
///
/// Every handler of a tenant-scoped route takes the
/// [`HouseholdScope`](householdhero_shared::auth::access::HouseholdScope)
/// inserted by the access layer and passes its household ID to every query.

pub mod admin;
pub mod auth;
pub mod calendar;
pub mod employees;
pub mod finance;
pub mod health;
pub mod households;
pub mod inventory;
pub mod invitations;
pub mod me;
pub mod pets;
pub mod recipes;
pub mod tasks;
pub mod vehicles;
