//! Request-level tests through the full router.

use crate::config::AppConfig;
use crate::db::test_support::memory_pool;
use crate::db::DbPool;
use crate::models::RecipeInput;
use crate::recipes::{create_manual_recipe, find_recipe};
use crate::schema::{recipes, users};
use crate::{build_router, AppState};
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use diesel::prelude::*;
use genie_core::{AiClient, AiConfig, FakeProvider};
use http_body_util::BodyExt;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
const BOUNDARY: &str = "genie-test-boundary";

struct TestApp {
    router: Router,
    pool: Arc<DbPool>,
    static_dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.static_dir);
    }
}

fn test_app(ai: AiClient) -> TestApp {
    let static_dir = std::env::temp_dir().join(format!("genie-static-{}", Uuid::new_v4()));
    let config = AppConfig {
        secret_key: "router-test-secret".to_string(),
        database_url: ":memory:".to_string(),
        static_dir: static_dir.clone(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        ai: AiConfig::default(),
    };
    let state = AppState::new(config, memory_pool(), ai).unwrap();
    let pool = state.pool.clone();

    TestApp {
        router: build_router(state),
        pool,
        static_dir,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::get(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn post_json(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn upload_photo(&self, filename: &str, data: &[u8], cookie: &str) -> Response<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::post("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header(header::COOKIE, cookie)
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Register and log in, returning the session cookie pair.
    async fn sign_up(&self, name: &str, email: &str) -> String {
        let resp = self
            .post_form(
                "/register",
                &format!("name={name}&email={email}&password=pw"),
                None,
            )
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let resp = self
            .post_form("/login", &format!("email={email}&password=pw"), None)
            .await;
        assert_eq!(location(&resp), "/dashboard");
        session_cookie(&resp)
    }

    fn count(&self, table: &str) -> i64 {
        let mut conn = self.pool.get().unwrap();
        match table {
            "recipes" => recipes::table.count().get_result(&mut conn).unwrap(),
            "users" => users::table.count().get_result(&mut conn).unwrap(),
            other => panic!("unknown table {}", other),
        }
    }
}

fn location(resp: &Response<Body>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default()
}

fn set_cookies(resp: &Response<Body>) -> Vec<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

fn session_cookie(resp: &Response<Body>) -> String {
    set_cookies(resp)
        .into_iter()
        .find(|c| c.starts_with("genie_session="))
        .and_then(|c| c.split(';').next().map(str::to_string))
        .expect("login should set a session cookie")
}

async fn body_text(resp: Response<Body>) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(resp: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(resp).await).unwrap()
}

fn stored_uploads(app: &TestApp) -> usize {
    std::fs::read_dir(app.static_dir.join("uploads"))
        .map(|entries| entries.count())
        .unwrap_or(0)
}

#[tokio::test]
async fn test_pages_require_login() {
    let app = test_app(AiClient::offline());

    for uri in ["/dashboard", "/history", "/favorites", "/shopping-list", "/profile", "/recipe/add"] {
        let resp = app.get(uri, None).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(location(&resp), "/login", "{}", uri);
    }
}

#[tokio::test]
async fn test_api_requires_session() {
    let app = test_app(AiClient::offline());

    let resp = app.post_json("/api/favorite/1", "", None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["error"], "Not logged in");

    let resp = app
        .post_json("/api/shopping-list/add", r#"{"item":"salt"}"#, None)
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app.post_json("/chat", r#"{"message":"hi"}"#, None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_landing_redirects_signed_in_user() {
    let app = test_app(AiClient::offline());

    let resp = app.get("/", None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = app.sign_up("Asha", "asha@example.com").await;
    let resp = app.get("/", Some(&cookie)).await;
    assert_eq!(location(&resp), "/dashboard");

    let resp = app.get("/dashboard", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Welcome, Asha"));
}

#[tokio::test]
async fn test_duplicate_registration_is_flashed() {
    let app = test_app(AiClient::offline());
    app.sign_up("Asha", "asha@example.com").await;

    let resp = app
        .post_form(
            "/register",
            "name=Other&email=asha@example.com&password=x",
            None,
        )
        .await;
    assert_eq!(location(&resp), "/register");
    assert!(set_cookies(&resp)
        .iter()
        .any(|c| c.starts_with("genie_flash=")));
    assert_eq!(app.count("users"), 1);
}

#[tokio::test]
async fn test_bad_login_sets_no_session() {
    let app = test_app(AiClient::offline());
    app.sign_up("Asha", "asha@example.com").await;

    let resp = app
        .post_form("/login", "email=asha@example.com&password=wrong", None)
        .await;
    assert_eq!(location(&resp), "/login");
    assert!(!set_cookies(&resp)
        .iter()
        .any(|c| c.starts_with("genie_session=")));
}

#[tokio::test]
async fn test_upload_offline_creates_nothing() {
    let app = test_app(AiClient::offline());
    let cookie = app.sign_up("Asha", "asha@example.com").await;

    let resp = app.upload_photo("dosa.png", PNG_MAGIC, &cookie).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard");
    assert_eq!(app.count("recipes"), 0);
    assert_eq!(stored_uploads(&app), 0);
}

#[tokio::test]
async fn test_upload_rejects_disallowed_extension() {
    let app = test_app(AiClient::offline());
    let cookie = app.sign_up("Asha", "asha@example.com").await;

    let resp = app.upload_photo("notes.txt", b"hello", &cookie).await;
    assert_eq!(location(&resp), "/dashboard");
    assert_eq!(app.count("recipes"), 0);
}

#[tokio::test]
async fn test_upload_with_model_creates_recipe() {
    let provider = Arc::new(FakeProvider::with_recipe_responses());
    let app = test_app(AiClient::with_provider(provider.clone()));
    let cookie = app.sign_up("Asha", "asha@example.com").await;

    let resp = app.upload_photo("dosa.png", PNG_MAGIC, &cookie).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/recipe/1");
    assert_eq!(provider.call_count(), 2);
    assert_eq!(stored_uploads(&app), 1);

    let resp = app.get("/recipe/1", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Masala Dosa"));
    assert!(html.contains("Boil the potatoes"));

    let resp = app.get("/history", Some(&cookie)).await;
    assert!(body_text(resp).await.contains("/recipe/1"));
}

#[tokio::test]
async fn test_failed_insert_flashes_and_removes_photo() {
    let app = test_app(AiClient::with_provider(Arc::new(
        FakeProvider::with_recipe_responses(),
    )));
    let cookie = app.sign_up("Asha", "asha@example.com").await;
    {
        let mut conn = app.pool.get().unwrap();
        diesel::delete(users::table).execute(&mut conn).unwrap();
    }

    let resp = app.upload_photo("dosa.png", PNG_MAGIC, &cookie).await;
    assert_eq!(location(&resp), "/dashboard");
    assert!(set_cookies(&resp)
        .iter()
        .any(|c| c.starts_with("genie_flash=")));
    assert_eq!(stored_uploads(&app), 0);

    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"dish_name\"\r\n\r\nKesari\r\n--{BOUNDARY}--\r\n"
    );
    let request = Request::post("/recipe/add")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::COOKIE, &cookie)
        .body(Body::from(body))
        .unwrap();
    let resp = app.send(request).await;
    assert_eq!(location(&resp), "/recipe/add");
    assert_eq!(app.count("recipes"), 0);
}

#[tokio::test]
async fn test_unknown_recipe_is_404() {
    let app = test_app(AiClient::offline());

    let resp = app.get("/recipe/999", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(resp).await, "Recipe not found");
}

#[tokio::test]
async fn test_edit_by_non_owner_is_denied() {
    let app = test_app(AiClient::offline());
    app.sign_up("Owner", "owner@example.com").await;
    let intruder = app.sign_up("Intruder", "intruder@example.com").await;

    let recipe_id = {
        let mut conn = app.pool.get().unwrap();
        let input = RecipeInput {
            dish_name: "Rasam".to_string(),
            ingredients: vec!["tamarind".to_string()],
            instructions: vec!["boil".to_string()],
            ..Default::default()
        };
        create_manual_recipe(&mut conn, 1, &input, "img/default_food.svg").unwrap()
    };

    let resp = app
        .get(&format!("/recipe/edit/{}", recipe_id), Some(&intruder))
        .await;
    assert_eq!(location(&resp), "/dashboard");

    let resp = app
        .post_form(
            &format!("/recipe/edit/{}", recipe_id),
            "dish_name=Stolen&ingredients%5B%5D=salt&instructions%5B%5D=stir",
            Some(&intruder),
        )
        .await;
    assert_eq!(location(&resp), "/dashboard");

    let mut conn = app.pool.get().unwrap();
    let recipe = find_recipe(&mut conn, recipe_id).unwrap().unwrap();
    assert_eq!(recipe.dish_name, "Rasam");
    assert_eq!(recipe.english.ingredients, vec!["tamarind"]);
}

#[tokio::test]
async fn test_owner_edit_and_manual_add() {
    let app = test_app(AiClient::offline());
    let cookie = app.sign_up("Owner", "owner@example.com").await;

    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"dish_name\"\r\n\r\nKesari\r\n\
         --{BOUNDARY}\r\nContent-Disposition: form-data; name=\"ingredients[]\"\r\n\r\nrava\r\n\
         --{BOUNDARY}\r\nContent-Disposition: form-data; name=\"ingredients[]\"\r\n\r\nsugar\r\n\
         --{BOUNDARY}\r\nContent-Disposition: form-data; name=\"instructions[]\"\r\n\r\nroast\r\n\
         --{BOUNDARY}--\r\n"
    );
    let request = Request::post("/recipe/add")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::COOKIE, &cookie)
        .body(Body::from(body))
        .unwrap();
    let resp = app.send(request).await;
    assert_eq!(location(&resp), "/recipe/1");

    let resp = app
        .post_form(
            "/recipe/edit/1",
            "dish_name=Rava+Kesari&cuisine_type=South+Indian&ingredients%5B%5D=rava&ingredients%5B%5D=ghee&instructions%5B%5D=roast",
            Some(&cookie),
        )
        .await;
    assert_eq!(location(&resp), "/recipe/1");

    let mut conn = app.pool.get().unwrap();
    let recipe = find_recipe(&mut conn, 1).unwrap().unwrap();
    assert_eq!(recipe.dish_name, "Rava Kesari");
    assert_eq!(recipe.cuisine_type.as_deref(), Some("South Indian"));
    assert_eq!(recipe.english.ingredients, vec!["rava", "ghee"]);
    assert_eq!(recipe.image_path, "img/default_food.svg");
}

#[tokio::test]
async fn test_favorite_toggle_over_http() {
    let app = test_app(AiClient::offline());
    let cookie = app.sign_up("Asha", "asha@example.com").await;
    {
        let mut conn = app.pool.get().unwrap();
        let input = RecipeInput {
            dish_name: "Idli".to_string(),
            ..Default::default()
        };
        create_manual_recipe(&mut conn, 1, &input, "img/default_food.svg").unwrap();
    }

    let resp = app.post_json("/api/favorite/1", "", Some(&cookie)).await;
    assert_eq!(body_json(resp).await["status"], "added");

    let resp = app.get("/favorites", Some(&cookie)).await;
    assert!(body_text(resp).await.contains("Idli"));

    let resp = app.post_json("/api/favorite/1", "", Some(&cookie)).await;
    assert_eq!(body_json(resp).await["status"], "removed");

    let resp = app.post_json("/api/favorite/404", "", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_shopping_list_flow() {
    let app = test_app(AiClient::offline());
    let cookie = app.sign_up("Asha", "asha@example.com").await;
    let other = app.sign_up("Ravi", "ravi@example.com").await;

    let resp = app
        .post_json("/api/shopping-list/add", r#"{"item":"  "}"#, Some(&cookie))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["status"], "error");

    let resp = app
        .post_json("/api/shopping-list/add", r#"{"item":"jaggery"}"#, Some(&cookie))
        .await;
    let added = body_json(resp).await;
    assert_eq!(added["status"], "added");
    let id = added["id"].as_i64().unwrap();

    let resp = app
        .post_json(&format!("/api/shopping-list/toggle/{}", id), "", Some(&cookie))
        .await;
    let toggled = body_json(resp).await;
    assert_eq!(toggled["status"], "toggled");
    assert_eq!(toggled["is_checked"], true);

    let resp = app
        .post_json(&format!("/api/shopping-list/delete/{}", id), "", Some(&other))
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app.get("/shopping-list", Some(&cookie)).await;
    assert!(body_text(resp).await.contains("jaggery"));

    let resp = app
        .post_json(&format!("/api/shopping-list/delete/{}", id), "", Some(&cookie))
        .await;
    assert_eq!(body_json(resp).await["status"], "deleted");
}

#[tokio::test]
async fn test_chat_replies() {
    let app = test_app(AiClient::offline());
    let cookie = app.sign_up("Asha", "asha@example.com").await;

    let resp = app
        .post_json("/chat", r#"{"message":"   "}"#, Some(&cookie))
        .await;
    assert_eq!(body_json(resp).await["response"], "I didn't catch that.");

    let resp = app
        .post_json(
            "/chat",
            r#"{"message":"More spice?","context":{"dish_name":"Idli"}}"#,
            Some(&cookie),
        )
        .await;
    assert_eq!(body_json(resp).await["response"], "I'm offline right now!");
}

#[tokio::test]
async fn test_profile_rename_refreshes_session() {
    let app = test_app(AiClient::offline());
    let cookie = app.sign_up("Asha", "asha@example.com").await;

    let resp = app.post_form("/profile", "name=Asha+R", Some(&cookie)).await;
    assert_eq!(location(&resp), "/profile");
    let renamed = session_cookie(&resp);

    let resp = app.get("/profile", Some(&renamed)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Asha R"));
    assert!(html.contains("<strong>0</strong> recipes"));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = test_app(AiClient::offline());
    let cookie = app.sign_up("Asha", "asha@example.com").await;

    let resp = app.get("/logout", Some(&cookie)).await;
    assert_eq!(location(&resp), "/");
    assert!(set_cookies(&resp)
        .iter()
        .any(|c| c.starts_with("genie_session=") && c.contains("Max-Age=0")));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = test_app(AiClient::offline());

    let resp = app.get("/api-docs/openapi.json", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let doc = body_json(resp).await;
    assert!(doc["paths"]["/chat"].is_object());
}
