use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use docsafe::config::AppConfig;
use docsafe::entities::documents;
use docsafe::entities::prelude::*;
use docsafe::entities::users::{self, Role};
use docsafe::infrastructure::storage::StorageService;
use docsafe::services::document_service::DocumentService;
use docsafe::services::session;
use docsafe::{AppState, create_app};
use http_body_util::BodyExt;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Set,
};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

async fn setup() -> (Router, DatabaseConnection, TempDir) {
    let db = Database::connect("sqlite::memory:").await.unwrap();

    let backend = db.get_database_backend();
    let schema = sea_orm::Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(Users)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(Sessions)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(Documents)))
        .await
        .unwrap();

    let tmp = TempDir::new().unwrap();
    let storage = Arc::new(StorageService::new(tmp.path().to_path_buf()));
    let documents = Arc::new(DocumentService::new(db.clone(), storage.clone()));
    let mut config = AppConfig::development();
    config.upload_dir = tmp.path().to_path_buf();

    let state = AppState {
        db: db.clone(),
        storage,
        documents,
        config,
    };

    (create_app(state), db, tmp)
}

async fn create_user(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
    role: Role,
    approved: bool,
) -> i32 {
    let user = users::ActiveModel {
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(session::hash_password("pw").unwrap()),
        role: Set(role),
        is_approved: Set(approved),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    user.insert(db).await.unwrap().id
}

async fn login_cookie(app: &Router, path: &str, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(format!("email={email}&password=pw")))
                .unwrap(),
        )
        .await
        .unwrap();

    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap().to_string())
        .expect("login should set a session cookie")
}

async fn post(app: &Router, uri: &str, cookie: &str) -> axum::http::Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get(app: &Router, uri: &str, cookie: &str) -> axum::http::Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_admin_panel_forbidden_for_users() {
    let (app, db, _tmp) = setup().await;
    create_user(&db, "bob", "bob@example.com", Role::User, true).await;
    let cookie = login_cookie(&app, "/login/user", "bob@example.com").await;

    let response = get(&app, "/admin", &cookie).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    for uri in [
        "/admin/toggle_approval",
        "/admin/approve/1",
        "/admin/reject/1",
        "/admin/delete_doc/1",
    ] {
        let response = post(&app, uri, &cookie).await;
        assert_eq!(
            response.status(),
            StatusCode::FORBIDDEN,
            "expected 403 for {uri}"
        );
    }
}

#[tokio::test]
async fn test_approve_is_idempotent() {
    let (app, db, _tmp) = setup().await;
    create_user(&db, "admin", "admin@example.com", Role::Admin, true).await;
    let pending_id = create_user(&db, "bob", "bob@example.com", Role::User, false).await;
    let cookie = login_cookie(&app, "/login", "admin@example.com").await;

    for _ in 0..2 {
        let response = post(&app, &format!("/admin/approve/{pending_id}"), &cookie).await;
        assert!(response.status().is_redirection());

        let user = Users::find_by_id(pending_id).one(&db).await.unwrap().unwrap();
        assert!(user.is_approved);
    }

    assert_eq!(Users::find().count(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn test_reject_deletes_user_and_cascades_documents() {
    let (app, db, _tmp) = setup().await;
    create_user(&db, "admin", "admin@example.com", Role::Admin, true).await;
    let bob_id = create_user(&db, "bob", "bob@example.com", Role::User, false).await;

    let doc = documents::ActiveModel {
        user_id: Set(bob_id),
        filename: Set("notes.pdf".to_string()),
        filepath: Set(format!("uploads/{bob_id}_20250101120000_notes.pdf")),
        uploaded_at: Set(Utc::now()),
        ..Default::default()
    };
    doc.insert(&db).await.unwrap();

    let cookie = login_cookie(&app, "/login", "admin@example.com").await;
    let response = post(&app, &format!("/admin/reject/{bob_id}"), &cookie).await;
    assert!(response.status().is_redirection());

    assert!(Users::find_by_id(bob_id).one(&db).await.unwrap().is_none());
    assert_eq!(
        Documents::find()
            .filter(documents::Column::UserId.eq(bob_id))
            .count(&db)
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_pending_users_listed_oldest_first() {
    let (app, db, _tmp) = setup().await;
    create_user(&db, "admin", "admin@example.com", Role::Admin, true).await;
    create_user(&db, "first", "first@example.com", Role::User, false).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    create_user(&db, "second", "second@example.com", Role::User, false).await;

    // Admin login via /login turns approval mode on, so the dashboard
    // shows the pending panel.
    let cookie = login_cookie(&app, "/login", "admin@example.com").await;
    let response = get(&app, "/dashboard", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("Pending approvals"));
    let first_pos = body.find("first@example.com").unwrap();
    let second_pos = body.find("second@example.com").unwrap();
    assert!(first_pos < second_pos);
}

#[tokio::test]
async fn test_toggle_approval_mode_hides_pending_panel() {
    let (app, db, _tmp) = setup().await;
    create_user(&db, "admin", "admin@example.com", Role::Admin, true).await;
    create_user(&db, "bob", "bob@example.com", Role::User, false).await;

    let cookie = login_cookie(&app, "/login", "admin@example.com").await;

    // On after admin login
    let response = get(&app, "/dashboard", &cookie).await;
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8(body.to_vec()).unwrap().contains("Pending approvals"));

    // Toggle off
    let response = post(&app, "/admin/toggle_approval", &cookie).await;
    assert!(response.status().is_redirection());

    let response = get(&app, "/dashboard", &cookie).await;
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(!String::from_utf8(body.to_vec()).unwrap().contains("Pending approvals"));

    // Approve stays reachable regardless of the flag
    let bob = Users::find()
        .filter(users::Column::Username.eq("bob"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    let response = post(&app, &format!("/admin/approve/{}", bob.id), &cookie).await;
    assert!(response.status().is_redirection());
    let bob = Users::find_by_id(bob.id).one(&db).await.unwrap().unwrap();
    assert!(bob.is_approved);
}

#[tokio::test]
async fn test_delete_doc_removes_row_and_file() {
    let (app, db, tmp) = setup().await;
    let admin_id = create_user(&db, "admin", "admin@example.com", Role::Admin, true).await;

    let disk_name = format!("{admin_id}_20250101120000_report.pdf");
    tokio::fs::write(tmp.path().join(&disk_name), b"%PDF-1.4")
        .await
        .unwrap();
    let doc = documents::ActiveModel {
        user_id: Set(admin_id),
        filename: Set("report.pdf".to_string()),
        filepath: Set(format!("uploads/{disk_name}")),
        uploaded_at: Set(Utc::now()),
        ..Default::default()
    };
    let doc = doc.insert(&db).await.unwrap();

    let cookie = login_cookie(&app, "/login", "admin@example.com").await;
    let response = post(&app, &format!("/admin/delete_doc/{}", doc.id), &cookie).await;
    assert!(response.status().is_redirection());

    assert_eq!(Documents::find().count(&db).await.unwrap(), 0);
    assert!(!tmp.path().join(&disk_name).exists());
}

#[tokio::test]
async fn test_delete_doc_survives_missing_file() {
    let (app, db, _tmp) = setup().await;
    let admin_id = create_user(&db, "admin", "admin@example.com", Role::Admin, true).await;

    // Metadata row with no backing file on disk
    let doc = documents::ActiveModel {
        user_id: Set(admin_id),
        filename: Set("ghost.pdf".to_string()),
        filepath: Set(format!("uploads/{admin_id}_20250101120000_ghost.pdf")),
        uploaded_at: Set(Utc::now()),
        ..Default::default()
    };
    let doc = doc.insert(&db).await.unwrap();

    let cookie = login_cookie(&app, "/login", "admin@example.com").await;
    let response = post(&app, &format!("/admin/delete_doc/{}", doc.id), &cookie).await;
    assert!(response.status().is_redirection());
    assert_eq!(Documents::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_admin_panel_lists_users_and_documents() {
    let (app, db, _tmp) = setup().await;
    let admin_id = create_user(&db, "admin", "admin@example.com", Role::Admin, true).await;
    create_user(&db, "bob", "bob@example.com", Role::User, false).await;

    let doc = documents::ActiveModel {
        user_id: Set(admin_id),
        filename: Set("handbook.pdf".to_string()),
        filepath: Set(format!("uploads/{admin_id}_20250101120000_handbook.pdf")),
        uploaded_at: Set(Utc::now()),
        ..Default::default()
    };
    doc.insert(&db).await.unwrap();

    let cookie = login_cookie(&app, "/login", "admin@example.com").await;
    let response = get(&app, "/admin", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("admin@example.com"));
    assert!(body.contains("bob@example.com"));
    assert!(body.contains("handbook.pdf"));
}
