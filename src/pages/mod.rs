/// The graph page.
pub mod home;
/// Fallback for unknown routes.
pub mod not_found;
