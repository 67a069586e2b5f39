/// Middleware modules for the API server
///
/// - `access`: bearer-token authentication and household access enforcement
/// - `security`: security response headers

pub mod access;
pub mod security;
