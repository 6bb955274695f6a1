#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use foodgram::{
    db,
    models::{Ingredient, NewIngredient, NewTag, Tag},
    routes::AppState,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tempfile::TempDir;
use tower::ServiceExt;

/// 1x1 transparent PNG
pub const PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
    pub media: TempDir,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<Ingredient>,
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
}

impl Reply {
    pub fn json(&self) -> Value {
        if self.text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&self.text).unwrap()
        }
    }
}

pub async fn setup() -> TestApp {
    // A single connection keeps the in-memory database alive and shared.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::run_migrations(&pool).await.unwrap();

    let mut tags = Vec::new();
    for (name, color, slug) in [
        ("Breakfast", "#E26C2D", "breakfast"),
        ("Lunch", "#49B64E", "lunch"),
        ("Dinner", "#8775D2", "dinner"),
    ] {
        let tag = db::create_tag(
            &pool,
            &NewTag {
                name: name.to_string(),
                color: color.to_string(),
                slug: Some(slug.to_string()),
            },
        )
        .await
        .unwrap();
        tags.push(tag);
    }

    let mut ingredients = Vec::new();
    for (name, unit) in [("Flour", "g"), ("Sugar", "g"), ("Egg", "pcs"), ("Milk", "ml")] {
        let ingredient = db::create_ingredient(
            &pool,
            &NewIngredient {
                name: name.to_string(),
                measurement_unit: unit.to_string(),
            },
        )
        .await
        .unwrap();
        ingredients.push(ingredient);
    }

    let media = tempfile::tempdir().unwrap();
    let state = AppState {
        pool: pool.clone(),
        jwt_secret: "test-secret".to_string(),
        media_path: media.path().to_str().unwrap().to_string(),
        media_url: "/media".to_string(),
        page_size: 6,
    };

    TestApp {
        app: foodgram::build_app(state),
        pool,
        media,
        tags,
        ingredients,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        Reply {
            status,
            headers,
            text: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Reply {
        self.request("GET", uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Reply {
        self.request("POST", uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Reply {
        self.request("DELETE", uri, token, None).await
    }

    /// Registers and logs in a user. Returns (user id, access token).
    pub async fn signup(&self, username: &str) -> (String, String) {
        let email = format!("{}@example.com", username);
        let reply = self
            .post(
                "/api/users",
                None,
                json!({
                    "email": email,
                    "username": username,
                    "first_name": "Test",
                    "last_name": "Cook",
                    "password": "correct horse battery",
                }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.text);
        let id = reply.json()["id"].as_str().unwrap().to_string();

        let reply = self
            .post(
                "/api/auth/token/login",
                None,
                json!({ "email": email, "password": "correct horse battery" }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.text);
        let token = reply.json()["access_token"].as_str().unwrap().to_string();

        (id, token)
    }

    pub fn ingredient(&self, name: &str) -> &str {
        &self
            .ingredients
            .iter()
            .find(|i| i.name == name)
            .unwrap()
            .id
    }

    pub fn tag(&self, slug: &str) -> &str {
        &self.tags.iter().find(|t| t.slug == slug).unwrap().id
    }

    /// Creates a recipe from (ingredient name, amount) pairs and tag slugs. Returns its id.
    pub async fn create_recipe(
        &self,
        token: &str,
        name: &str,
        items: &[(&str, i64)],
        tags: &[&str],
    ) -> String {
        let reply = self
            .post("/api/recipes", Some(token), self.recipe_body(name, items, tags))
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.text);
        reply.json()["id"].as_str().unwrap().to_string()
    }

    pub fn recipe_body(&self, name: &str, items: &[(&str, i64)], tags: &[&str]) -> Value {
        let ingredients: Vec<Value> = items
            .iter()
            .map(|(ingredient, amount)| json!({ "id": self.ingredient(ingredient), "amount": amount }))
            .collect();
        let tags: Vec<&str> = tags.iter().map(|slug| self.tag(slug)).collect();

        json!({
            "ingredients": ingredients,
            "tags": tags,
            "image": PNG,
            "name": name,
            "text": "Mix everything and cook.",
            "cooking_time": 15,
        })
    }
}
