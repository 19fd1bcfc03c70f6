//! User resource handlers.
//!
//! Every route except `OPTIONS` is guarded by an `OAuth2<S>` extractor listed
//! first, so scope checks run before the body or query is parsed.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::api::doc::USER_TAG;
use crate::api::dto::{ErrorResponse, PagedResponse, SearchParams, UserViewModel};
use crate::api::middleware::{OAuth2, UsersEdit, UsersView};
use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::state::AppState;
use crate::utils::extract::{ApiJson, ApiQuery};

const COLLECTION_ALLOW: &str = "GET";
const ITEM_ALLOW: &str = "PUT, GET, POST, DELETE";

pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(search_users, options_users))
        .routes(routes!(
            create_user,
            get_user,
            update_user,
            delete_user,
            options_user
        ))
}

/// Search users by username/email glob, one page at a time.
#[utoipa::path(
    get,
    path = "/api/users",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching users", body = PagedResponse<UserViewModel>),
        (status = 400, description = "Invalid pagination", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing users.edit scope", body = ErrorResponse)
    ),
    security(("bearerAuth" = ["users.edit"])),
    tag = USER_TAG
)]
pub async fn search_users(
    _auth: OAuth2<UsersEdit>,
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> AppResult<Json<PagedResponse<UserViewModel>>> {
    let search = params.into_search()?;
    let (users, total) = state.users.search(&search).await?;

    Ok(Json(PagedResponse::new(
        UserViewModel::from_users(&users),
        &search,
        total,
    )))
}

#[utoipa::path(
    options,
    path = "/api/users",
    responses((status = 204, description = "Allowed methods in the Allow header")),
    tag = USER_TAG
)]
pub async fn options_users() -> impl IntoResponse {
    (StatusCode::NO_CONTENT, [(header::ALLOW, COLLECTION_ALLOW)])
}

/// Create a user. The path username wins over any username in the body.
#[utoipa::path(
    put,
    path = "/api/users/{username}",
    params(("username" = String, Path, description = "Username of the new user")),
    request_body = UserViewModel,
    responses(
        (status = 200, description = "User created", body = UserViewModel),
        (status = 400, description = "Invalid body or missing password", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing users.edit scope", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse)
    ),
    security(("bearerAuth" = ["users.edit"])),
    tag = USER_TAG
)]
pub async fn create_user(
    _auth: OAuth2<UsersEdit>,
    State(state): State<AppState>,
    Path(username): Path<String>,
    ApiJson(mut view): ApiJson<UserViewModel>,
) -> AppResult<Json<UserViewModel>> {
    view.username = Some(username);
    view.valid(false)?;

    if view.password.is_none() {
        return Err(AppError::Validation {
            field: "password".to_string(),
            reason: "password is required".to_string(),
        });
    }

    let mut user = User::default();
    view.copy_to_model(&mut user)?;

    let created = state.users.create(user).await?;
    Ok(Json(UserViewModel::from_user(&created)))
}

#[utoipa::path(
    get,
    path = "/api/users/{username}",
    params(("username" = String, Path, description = "Username to look up")),
    responses(
        (status = 200, description = "User found", body = UserViewModel),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing users.view scope", body = ErrorResponse),
        (status = 404, description = "No user with username", body = ErrorResponse)
    ),
    security(("bearerAuth" = ["users.view"])),
    tag = USER_TAG
)]
pub async fn get_user(
    _auth: OAuth2<UsersView>,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<UserViewModel>> {
    let user = find_user(&state, &username).await?;
    Ok(Json(UserViewModel::from_user(&user)))
}

/// Update a user. Only fields present in the body are changed.
#[utoipa::path(
    post,
    path = "/api/users/{username}",
    params(("username" = String, Path, description = "Current username")),
    request_body = UserViewModel,
    responses(
        (status = 200, description = "User updated", body = UserViewModel),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing users.edit scope", body = ErrorResponse),
        (status = 404, description = "No user with username", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse)
    ),
    security(("bearerAuth" = ["users.edit"])),
    tag = USER_TAG
)]
pub async fn update_user(
    _auth: OAuth2<UsersEdit>,
    State(state): State<AppState>,
    Path(username): Path<String>,
    ApiJson(view): ApiJson<UserViewModel>,
) -> AppResult<Json<UserViewModel>> {
    view.valid(true)?;

    let mut user = find_user(&state, &username).await?;
    view.copy_to_model(&mut user)?;

    let updated = state.users.update(user).await?;
    Ok(Json(UserViewModel::from_user(&updated)))
}

/// Delete a user and return what was removed.
#[utoipa::path(
    delete,
    path = "/api/users/{username}",
    params(("username" = String, Path, description = "Username to delete")),
    responses(
        (status = 200, description = "User deleted", body = UserViewModel),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing users.edit scope", body = ErrorResponse),
        (status = 404, description = "No user with username", body = ErrorResponse)
    ),
    security(("bearerAuth" = ["users.edit"])),
    tag = USER_TAG
)]
pub async fn delete_user(
    _auth: OAuth2<UsersEdit>,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<UserViewModel>> {
    let user = find_user(&state, &username).await?;
    state.users.delete(&user.username).await?;
    Ok(Json(UserViewModel::from_user(&user)))
}

#[utoipa::path(
    options,
    path = "/api/users/{username}",
    params(("username" = String, Path, description = "Any username")),
    responses((status = 204, description = "Allowed methods in the Allow header")),
    tag = USER_TAG
)]
pub async fn options_user(Path(_username): Path<String>) -> impl IntoResponse {
    (StatusCode::NO_CONTENT, [(header::ALLOW, ITEM_ALLOW)])
}

async fn find_user(state: &AppState, username: &str) -> AppResult<User> {
    state
        .users
        .get(username)
        .await?
        .ok_or_else(|| AppError::user_not_found(username))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::Body,
        http::{self, Method, Response},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::api::routes::create_router;
    use crate::test_support::{InMemoryUserService, app_state, bearer, user};

    fn seeded() -> Arc<InMemoryUserService> {
        Arc::new(InMemoryUserService::with_users(vec![
            user(1, "alice", "alice@example.com"),
            user(2, "bob", "bob@example.com"),
        ]))
    }

    fn app(users: Arc<InMemoryUserService>) -> Router {
        create_router(app_state(users))
    }

    fn request(method: Method, uri: &str, scopes: Option<&[&str]>, body: Option<Value>) -> http::Request<Body> {
        let mut builder = http::Request::builder().method(method).uri(uri);
        if let Some(scopes) = scopes {
            builder = builder.header(http::header::AUTHORIZATION, bearer(scopes));
        }
        match body {
            Some(body) => builder
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const EDIT: &[&str] = &["users.edit"];
    const VIEW: &[&str] = &["users.view"];

    #[tokio::test]
    async fn test_search_without_token_is_unauthorized() {
        let response = app(seeded())
            .oneshot(request(Method::GET, "/api/users", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), http::StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_search_with_view_scope_is_forbidden() {
        let response = app(seeded())
            .oneshot(request(Method::GET, "/api/users", Some(VIEW), None))
            .await
            .unwrap();

        assert_eq!(response.status(), http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_search_returns_page_and_metadata() {
        let response = app(seeded())
            .oneshot(request(Method::GET, "/api/users?limit=1", Some(EDIT), None))
            .await
            .unwrap();

        assert_eq!(response.status(), http::StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"], json!([{"id": 1, "username": "alice", "email": "alice@example.com"}]));
        assert_eq!(body["pagination"]["total"], 2);
        assert_eq!(body["pagination"]["page_size"], 1);
        assert_eq!(body["pagination"]["has_next"], true);
    }

    #[tokio::test]
    async fn test_search_filters_by_glob() {
        let response = app(seeded())
            .oneshot(request(Method::GET, "/api/users?username=B*", Some(&["*"][..]), None))
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["username"], "bob");
    }

    #[tokio::test]
    async fn test_search_second_page_skips_first() {
        let response = app(seeded())
            .oneshot(request(Method::GET, "/api/users?limit=1&page=2", Some(EDIT), None))
            .await
            .unwrap();

        assert_eq!(response.status(), http::StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"], json!([{"id": 2, "username": "bob", "email": "bob@example.com"}]));
        assert_eq!(body["pagination"]["page"], 2);
        assert_eq!(body["pagination"]["has_next"], false);
    }

    #[tokio::test]
    async fn test_search_caps_page_size() {
        let response = app(seeded())
            .oneshot(request(Method::GET, "/api/users?limit=500", Some(EDIT), None))
            .await
            .unwrap();

        assert_eq!(response.status(), http::StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["pagination"]["page_size"], 100);
        assert_eq!(body["pagination"]["max_size"], 100);
    }

    #[tokio::test]
    async fn test_search_rejects_bad_pagination() {
        let cases = [
            ("/api/users?limit=0", "page size must be a positive number"),
            ("/api/users?limit=abc", "page size must be a positive number"),
            ("/api/users?page=-1", "page must be a positive number"),
            ("/api/users?page=x", "page must be a positive number"),
        ];

        for (uri, message) in cases {
            let response = app(seeded())
                .oneshot(request(Method::GET, uri, Some(EDIT), None))
                .await
                .unwrap();

            assert_eq!(response.status(), http::StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(json_body(response).await["message"], message, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_create_uses_path_username() {
        let users = seeded();
        let response = app(users.clone())
            .oneshot(request(
                Method::PUT,
                "/api/users/carol",
                Some(EDIT),
                Some(json!({"username": "ignored", "email": "carol@example.com", "password": "hunter2hunter2"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), http::StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["username"], "carol");
        assert_eq!(body["id"], 3);
        assert!(body.get("password").is_none());

        let stored = users.snapshot().await;
        let carol = stored.iter().find(|u| u.username == "carol").unwrap();
        assert!(carol.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_create_requires_password() {
        let response = app(seeded())
            .oneshot(request(
                Method::PUT,
                "/api/users/carol",
                Some(EDIT),
                Some(json!({"email": "carol@example.com"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), http::StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["message"], "password is required");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_email() {
        let response = app(seeded())
            .oneshot(request(
                Method::PUT,
                "/api/users/carol",
                Some(EDIT),
                Some(json!({"email": "not-an-email", "password": "hunter2hunter2"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), http::StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_create_rejects_email_longer_than_column() {
        let long = format!("{}@{}", "a".repeat(64), vec!["b".repeat(60); 4].join("."));
        let response = app(seeded())
            .oneshot(request(
                Method::PUT,
                "/api/users/carol",
                Some(EDIT),
                Some(json!({"email": long, "password": "hunter2hunter2"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), http::StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_create_accepts_json_sent_as_form() {
        let users = seeded();
        let response = app(users.clone())
            .oneshot(
                http::Request::builder()
                    .method(Method::PUT)
                    .uri("/api/users/carol")
                    .header(http::header::AUTHORIZATION, bearer(EDIT))
                    .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(
                        json!({"email": "carol@example.com", "password": "hunter2hunter2"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(json_body(response).await["username"], "carol");
        assert_eq!(users.snapshot().await.len(), 3);
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_json() {
        let response = app(seeded())
            .oneshot(
                http::Request::builder()
                    .method(Method::PUT)
                    .uri("/api/users/carol")
                    .header(http::header::AUTHORIZATION, bearer(EDIT))
                    .header(http::header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), http::StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_create_duplicate_email_conflicts() {
        let response = app(seeded())
            .oneshot(request(
                Method::PUT,
                "/api/users/carol",
                Some(EDIT),
                Some(json!({"email": "alice@example.com", "password": "hunter2hunter2"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), http::StatusCode::CONFLICT);
        assert_eq!(json_body(response).await["code"], "DUPLICATE_ENTRY");
    }

    #[tokio::test]
    async fn test_get_user() {
        let response = app(seeded())
            .oneshot(request(Method::GET, "/api/users/bob", Some(VIEW), None))
            .await
            .unwrap();

        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"id": 2, "username": "bob", "email": "bob@example.com"})
        );
    }

    #[tokio::test]
    async fn test_get_missing_user_is_not_found() {
        let response = app(seeded())
            .oneshot(request(Method::GET, "/api/users/ghost", Some(VIEW), None))
            .await
            .unwrap();

        assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["message"], "no user with username");
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_get_with_edit_scope_only_is_forbidden() {
        let response = app(seeded())
            .oneshot(request(Method::GET, "/api/users/bob", Some(EDIT), None))
            .await
            .unwrap();

        assert_eq!(response.status(), http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_update_merges_present_fields() {
        let users = seeded();
        let response = app(users.clone())
            .oneshot(request(
                Method::POST,
                "/api/users/alice",
                Some(EDIT),
                Some(json!({"email": "alice@new.example.com"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"id": 1, "username": "alice", "email": "alice@new.example.com"})
        );

        let stored = users.snapshot().await;
        let alice = stored.iter().find(|u| u.id == 1).unwrap();
        assert_eq!(alice.password_hash, user(1, "alice", "").password_hash);
    }

    #[tokio::test]
    async fn test_update_can_rename() {
        let users = seeded();
        let response = app(users.clone())
            .oneshot(request(
                Method::POST,
                "/api/users/bob",
                Some(EDIT),
                Some(json!({"username": "robert"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(json_body(response).await["username"], "robert");
        let names: Vec<String> = users.snapshot().await.into_iter().map(|u| u.username).collect();
        assert_eq!(names, vec!["alice".to_string(), "robert".to_string()]);
    }

    #[tokio::test]
    async fn test_update_to_taken_name_or_email_conflicts() {
        for body in [json!({"username": "alice"}), json!({"email": "alice@example.com"})] {
            let users = seeded();
            let response = app(users.clone())
                .oneshot(request(Method::POST, "/api/users/bob", Some(EDIT), Some(body.clone())))
                .await
                .unwrap();

            assert_eq!(response.status(), http::StatusCode::CONFLICT, "{body}");
            assert_eq!(json_body(response).await["code"], "DUPLICATE_ENTRY");
            let names: Vec<String> = users.snapshot().await.into_iter().map(|u| u.username).collect();
            assert!(names.contains(&"bob".to_string()), "{body}");
        }
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let response = app(seeded())
            .oneshot(request(
                Method::POST,
                "/api/users/ghost",
                Some(EDIT),
                Some(json!({"email": "ghost@example.com"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_rejects_short_password() {
        let response = app(seeded())
            .oneshot(request(
                Method::POST,
                "/api/users/alice",
                Some(EDIT),
                Some(json!({"password": "short"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_returns_removed_user() {
        let users = seeded();
        let response = app(users.clone())
            .oneshot(request(Method::DELETE, "/api/users/alice", Some(EDIT), None))
            .await
            .unwrap();

        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"id": 1, "username": "alice", "email": "alice@example.com"})
        );
        assert_eq!(users.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_found() {
        let response = app(seeded())
            .oneshot(request(Method::DELETE, "/api/users/ghost", Some(EDIT), None))
            .await
            .unwrap();

        assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_options_need_no_token() {
        let cases = [
            ("/api/users", "GET"),
            ("/api/users/anyone", "PUT, GET, POST, DELETE"),
        ];

        for (uri, allow) in cases {
            let response = app(seeded())
                .oneshot(request(Method::OPTIONS, uri, None, None))
                .await
                .unwrap();

            assert_eq!(response.status(), http::StatusCode::NO_CONTENT, "{uri}");
            assert_eq!(response.headers()[http::header::ALLOW], allow, "{uri}");
        }
    }
}
