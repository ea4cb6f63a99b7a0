//! The API endpoints URIs.

/// The route for checking that the server is up.
pub const HEALTH: &str = "/api/health";
/// The route to access transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
