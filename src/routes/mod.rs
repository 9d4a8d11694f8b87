/// Router Module Index
///
/// Splits the site into the routes anyone may call and the routes behind the
/// admin gate. The gate is applied to the whole admin router as a route
/// layer in `create_router`, so no admin handler can be mounted unguarded.

/// Pages, JSON endpoints, the session endpoints and the upstream proxy.
pub mod public;

/// Content management. Every route requires an admin session.
pub mod admin;
