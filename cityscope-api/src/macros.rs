//! Utility macros for reducing boilerplate

/// Implement `FromRef<AppState>` so a handler can extract one field of the
/// application state directly.
///
/// # Example
/// ```ignore
/// impl_from_ref!(Arc<TmdbClient>, movies);
/// // Expands to:
/// impl axum::extract::FromRef<AppState> for Arc<TmdbClient> {
///     fn from_ref(state: &AppState) -> Self {
///         state.movies.clone()
///     }
/// }
/// ```
#[macro_export]
macro_rules! impl_from_ref {
    ($type:ty, $field:ident) => {
        impl axum::extract::FromRef<$crate::state::AppState> for $type {
            fn from_ref(state: &$crate::state::AppState) -> Self {
                state.$field.clone()
            }
        }
    };
}
