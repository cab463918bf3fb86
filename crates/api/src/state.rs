use std::sync::Arc;

use beans_core::catalog::BeanCatalog;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Bean catalog service, bound to whichever store backend was configured.
    pub catalog: Arc<BeanCatalog>,
}
