//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod account;
pub mod dashboard;
pub mod health;
pub mod labels;
pub mod reports;
pub mod royalties;
pub mod withdrawals;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(account::routes())
        .merge(dashboard::routes())
        .merge(labels::routes())
        .merge(reports::routes())
        .merge(royalties::routes())
        .merge(withdrawals::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new().merge(health::routes()).merge(protected_routes)
}
