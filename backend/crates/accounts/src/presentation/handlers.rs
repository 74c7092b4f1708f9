//! HTTP Handlers

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use kernel::response::ApiResponse;
use platform::cookie::extract_cookie;
use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::application::{
    AddRoleInput, CreateUserInput, CreateUserUseCase, DeleteUserUseCase, QueryUsersUseCase,
    RoleLedgerUseCase, SignInInput, SignInUseCase, SignOutUseCase, UpdateFieldInput,
    UpdateRoleInput, UpdateUserInput, UpdateUserUseCase,
};
use crate::domain::entity::role::Role;
use crate::domain::repository::UserRepository;
use crate::error::{AccountError, AccountResult};
use crate::infra::assets::AssetStore;
use crate::presentation::dto::{
    AddRoleRequest, DeleteResponse, SearchQuery, UpdateFieldRequest, UpdateRoleRequest,
    UserPageResponse, UserView,
};
use crate::presentation::upload::ProfileForm;

/// Shared state for account handlers
#[derive(Clone)]
pub struct AccountsAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub assets: Arc<AssetStore>,
    pub config: Arc<AccountsConfig>,
}

// ============================================================================
// Create / Update
// ============================================================================

/// POST /api/users/create
pub async fn create_user<R>(
    State(state): State<AccountsAppState<R>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> AccountResult<ApiResponse<UserView>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let mut form = ProfileForm::read(multipart?).await?;

    let use_case = CreateUserUseCase::new(
        state.repo.clone(),
        state.assets.clone(),
        state.config.clone(),
    );

    let input = CreateUserInput {
        profile: form.profile_input(),
        password: form.take("password"),
        avatar: form.avatar.take(),
        base_url: request_base_url(&headers),
    };

    let user = use_case.execute(input).await?;

    Ok(ApiResponse::created(user.into()))
}

/// POST /api/users/update
pub async fn update_user<R>(
    State(state): State<AccountsAppState<R>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> AccountResult<ApiResponse<UserView>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let mut form = ProfileForm::read(multipart?).await?;

    let use_case = UpdateUserUseCase::new(
        state.repo.clone(),
        state.assets.clone(),
        state.config.clone(),
    );

    let input = UpdateUserInput {
        id: form.take("id"),
        profile: form.profile_input(),
        avatar: form.avatar.take(),
        base_url: request_base_url(&headers),
    };

    let user = use_case.update(input).await?;

    Ok(ApiResponse::created(user.into()))
}

/// POST /api/users/updateUser
pub async fn update_user_field<R>(
    State(state): State<AccountsAppState<R>>,
    payload: Result<Json<UpdateFieldRequest>, JsonRejection>,
) -> AccountResult<ApiResponse<UserView>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = payload?;

    let use_case = UpdateUserUseCase::new(
        state.repo.clone(),
        state.assets.clone(),
        state.config.clone(),
    );

    let user = use_case
        .update_field(UpdateFieldInput {
            id: req.id,
            password: req.password,
            is_active: req.is_active,
        })
        .await?;

    Ok(ApiResponse::created(user.into()))
}

// ============================================================================
// Sign In / Sign Out
// ============================================================================

/// POST /api/users/login
///
/// Credentials travel in the `username` and `password` headers.
pub async fn sign_in<R>(
    State(state): State<AccountsAppState<R>>,
    headers: HeaderMap,
) -> AccountResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let (Some(username), Some(password)) =
        (header_str(&headers, "username"), header_str(&headers, "password"))
    else {
        return Err(AccountError::InvalidCredentials);
    };

    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(SignInInput {
            username: username.to_string(),
            password: password.to_string(),
        })
        .await?;

    let cookie = state
        .config
        .session_cookie()
        .build_set_cookie(&output.token.token);

    Ok((
        [(header::SET_COOKIE, cookie)],
        ApiResponse::ok(UserView::from(output.user)),
    ))
}

/// POST /api/users/logout
pub async fn sign_out<R>(
    State(state): State<AccountsAppState<R>>,
    headers: HeaderMap,
) -> impl IntoResponse
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let cookie_config = state.config.session_cookie();

    if let Some(token) = extract_cookie(&headers, &cookie_config.name) {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        // The cookie is cleared either way
        if let Err(e) = use_case.execute(&token).await {
            tracing::debug!(error = %e, "Sign out with unusable session");
        }
    }

    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, cookie_config.build_delete_cookie())],
    )
}

// ============================================================================
// Queries
// ============================================================================

/// GET /api/users/get
///
/// Paging comes from the `page` and `limit` headers.
pub async fn list_users<R>(
    State(state): State<AccountsAppState<R>>,
    headers: HeaderMap,
) -> AccountResult<ApiResponse<UserPageResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let page = header_str(&headers, "page").and_then(|v| v.trim().parse().ok());
    let limit = header_str(&headers, "limit").and_then(|v| v.trim().parse().ok());

    let use_case = QueryUsersUseCase::new(state.repo.clone());
    let page = use_case.list(page, limit).await?;

    Ok(ApiResponse::ok(UserPageResponse {
        data: page.users.into_iter().map(UserView::from).collect(),
        count: page.count,
    }))
}

/// GET /api/users/get/{id}
pub async fn get_user<R>(
    State(state): State<AccountsAppState<R>>,
    Path(id): Path<String>,
) -> AccountResult<ApiResponse<UserView>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = QueryUsersUseCase::new(state.repo.clone());
    let user = use_case.get(&id).await?;

    Ok(ApiResponse::ok(user.into()))
}

/// GET /api/users/search?search=...
pub async fn search_users<R>(
    State(state): State<AccountsAppState<R>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> AccountResult<ApiResponse<Vec<UserView>>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let Query(query) = query?;

    let use_case = QueryUsersUseCase::new(state.repo.clone());
    let users = use_case.search(&query.search).await?;

    Ok(ApiResponse::ok(users.into_iter().map(UserView::from).collect()))
}

// ============================================================================
// Delete
// ============================================================================

/// DELETE /api/users/delete/{id}
pub async fn delete_user<R>(
    State(state): State<AccountsAppState<R>>,
    Path(id): Path<String>,
) -> AccountResult<ApiResponse<DeleteResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = DeleteUserUseCase::new(state.repo.clone(), state.assets.clone());
    let outcome = use_case.delete(&id).await?;

    Ok(ApiResponse::ok(DeleteResponse::new(outcome.count)))
}

/// DELETE /api/users/deleteAll
pub async fn delete_all_users<R>(
    State(state): State<AccountsAppState<R>>,
) -> AccountResult<ApiResponse<DeleteResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = DeleteUserUseCase::new(state.repo.clone(), state.assets.clone());
    let outcome = use_case.delete_all().await?;

    Ok(ApiResponse::ok(DeleteResponse::new(outcome.count)))
}

// ============================================================================
// Roles
// ============================================================================

/// POST /api/roles/create
pub async fn add_role<R>(
    State(state): State<AccountsAppState<R>>,
    payload: Result<Json<AddRoleRequest>, JsonRejection>,
) -> AccountResult<ApiResponse<Vec<Role>>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = payload?;

    let use_case = RoleLedgerUseCase::new(state.repo.clone());
    let roles = use_case
        .add(AddRoleInput {
            user_id: req.user_id,
            role: req.role,
            modules: req.modules,
        })
        .await?;

    Ok(ApiResponse::ok(roles))
}

/// POST /api/roles/update
pub async fn update_role<R>(
    State(state): State<AccountsAppState<R>>,
    payload: Result<Json<UpdateRoleRequest>, JsonRejection>,
) -> AccountResult<ApiResponse<Vec<Role>>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = payload?;

    let use_case = RoleLedgerUseCase::new(state.repo.clone());
    let roles = use_case
        .update(UpdateRoleInput {
            user_id: req.user_id,
            role_id: req.id,
            role: req.role,
            modules: req.modules,
        })
        .await?;

    Ok(ApiResponse::ok(roles))
}

/// DELETE /api/roles/delete/{userId}/{id}
pub async fn delete_role<R>(
    State(state): State<AccountsAppState<R>>,
    Path((user_id, role_id)): Path<(String, String)>,
) -> AccountResult<ApiResponse<Vec<Role>>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = RoleLedgerUseCase::new(state.repo.clone());
    let roles = use_case.delete(&user_id, &role_id).await?;

    Ok(ApiResponse::ok(roles))
}

/// GET /api/roles/get/{userId}
pub async fn list_roles<R>(
    State(state): State<AccountsAppState<R>>,
    Path(user_id): Path<String>,
) -> AccountResult<ApiResponse<Vec<Role>>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = RoleLedgerUseCase::new(state.repo.clone());
    let roles = use_case.list(&user_id).await?;

    Ok(ApiResponse::ok(roles))
}

// ============================================================================
// Helpers
// ============================================================================

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// `{scheme}://{host}` of the current request, used for local avatar URLs
fn request_base_url(headers: &HeaderMap) -> String {
    let host = header_str(headers, header::HOST.as_str()).unwrap_or("localhost");
    let scheme = header_str(headers, "x-forwarded-proto").unwrap_or("http");
    format!("{}://{}", scheme, host)
}
