//! Items and stats API routes
//!
//! Both routers are built from clones of the same service so writes made
//! through `/items` invalidate the snapshot served by `/stats`.

use axum::Router;
use domain_items::handlers;

use crate::state::AppState;

/// Create items router
pub fn router(state: &AppState) -> Router {
    handlers::router(state.items.clone())
}

/// Create stats router
pub fn stats_router(state: &AppState) -> Router {
    handlers::stats_router(state.items.clone())
}
