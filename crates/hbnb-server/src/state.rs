use hbnb_core::TokenIssuer;

/// Shared application state, available to all route handlers via `State<Arc<AppState<S>>>`.
pub struct AppState<S> {
    pub store: S,
    /// Signs tokens at login and verifies them on protected routes.
    pub tokens: TokenIssuer,
}
