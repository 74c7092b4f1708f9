//! Accounts Router

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::domain::repository::UserRepository;
use crate::infra::assets::AssetStore;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, AccountsAppState};
use crate::presentation::upload::MAX_FORM_BYTES;

/// Create the Accounts router with PostgreSQL repository
pub fn accounts_router(
    repo: PgUserRepository,
    assets: AssetStore,
    config: AccountsConfig,
) -> Router {
    accounts_router_generic(repo, assets, config)
}

/// Create a generic Accounts router for any repository implementation
///
/// Routes are relative; the binary nests them under `/api`.
pub fn accounts_router_generic<R>(repo: R, assets: AssetStore, config: AccountsConfig) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let state = AccountsAppState {
        repo: Arc::new(repo),
        assets: Arc::new(assets),
        config: Arc::new(config),
    };

    let users = Router::new()
        .route("/create", post(handlers::create_user::<R>))
        .route("/login", post(handlers::sign_in::<R>))
        .route("/logout", post(handlers::sign_out::<R>))
        .route("/get", get(handlers::list_users::<R>))
        .route("/get/{id}", get(handlers::get_user::<R>))
        .route("/search", get(handlers::search_users::<R>))
        .route("/delete/{id}", delete(handlers::delete_user::<R>))
        .route("/deleteAll", delete(handlers::delete_all_users::<R>))
        .route("/update", post(handlers::update_user::<R>))
        .route("/updateUser", post(handlers::update_user_field::<R>))
        .layer(DefaultBodyLimit::max(MAX_FORM_BYTES));

    let roles = Router::new()
        .route("/create", post(handlers::add_role::<R>))
        .route("/update", post(handlers::update_role::<R>))
        .route("/delete/{user_id}/{id}", delete(handlers::delete_role::<R>))
        .route("/get/{user_id}", get(handlers::list_roles::<R>));

    Router::new()
        .nest("/users", users)
        .nest("/roles", roles)
        .with_state(state)
}
