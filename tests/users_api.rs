mod common;

use axum::http::StatusCode;
use common::setup;
use serde_json::json;

#[tokio::test]
async fn register_login_and_me() {
    let app = setup().await;

    let reply = app
        .post(
            "/api/users",
            None,
            json!({
                "email": "ada@example.com",
                "username": "ada",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "password": "analytical engine",
            }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.text);
    let user = reply.json();
    assert_eq!(user["username"], "ada");
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());

    // Same email again
    let reply = app
        .post(
            "/api/users",
            None,
            json!({
                "email": "ada@example.com",
                "username": "ada2",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "password": "analytical engine",
            }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);

    let reply = app
        .post(
            "/api/auth/token/login",
            None,
            json!({ "email": "ada@example.com", "password": "wrong password" }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = app
        .post(
            "/api/auth/token/login",
            None,
            json!({ "email": "ada@example.com", "password": "analytical engine" }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    let tokens = reply.json();
    let access = tokens["access_token"].as_str().unwrap();
    let refresh = tokens["refresh_token"].as_str().unwrap();

    let me = app.get("/api/users/me", Some(access)).await.json();
    assert_eq!(me["email"], "ada@example.com");
    assert_eq!(me["is_subscribed"], false);

    let reply = app.get("/api/users/me", None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    // Refresh tokens rotate: the old one cannot be reused
    let reply = app
        .post("/api/auth/token/refresh", None, json!({ "refresh_token": refresh }))
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    let reply = app
        .post("/api/auth/token/refresh", None, json!({ "refresh_token": refresh }))
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_token_is_not_a_bearer_token() {
    let app = setup().await;
    app.signup("chef").await;

    let tokens = app
        .post(
            "/api/auth/token/login",
            None,
            json!({ "email": "chef@example.com", "password": "correct horse battery" }),
        )
        .await
        .json();
    let access = tokens["access_token"].as_str().unwrap();
    let refresh = tokens["refresh_token"].as_str().unwrap();

    let reply = app.get("/api/users/me", Some(refresh)).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    // An access token cannot be exchanged for a new pair either
    let reply = app
        .post("/api/auth/token/refresh", None, json!({ "refresh_token": access }))
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = app.post("/api/auth/token/logout", Some(access), json!({})).await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = app.get("/api/users/me", Some(refresh)).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    let reply = app
        .post("/api/auth/token/refresh", None, json!({ "refresh_token": refresh }))
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deleting_user_cascades_to_owned_rows() {
    let app = setup().await;
    let (chef_id, chef) = app.signup("chef").await;
    let (fan_id, fan) = app.signup("fan").await;

    let recipe = app
        .create_recipe(&chef, "Pancakes", &[("Flour", 200)], &["breakfast"])
        .await;
    for token in [&chef, &fan] {
        for action in ["favorite", "shopping_cart"] {
            let reply = app
                .post(&format!("/api/recipes/{}/{}", recipe, action), Some(token), json!({}))
                .await;
            assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.text);
        }
    }
    let reply = app
        .post(&format!("/api/users/{}/subscribe", chef_id), Some(&fan), json!({}))
        .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    let reply = app
        .post(&format!("/api/users/{}/subscribe", fan_id), Some(&chef), json!({}))
        .await;
    assert_eq!(reply.status, StatusCode::CREATED);

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(&chef_id)
        .execute(&app.pool)
        .await
        .unwrap();

    for (sql, expected) in [
        ("SELECT COUNT(*) FROM recipes WHERE author_id = ?", 0),
        (
            "SELECT COUNT(*) FROM follows, (SELECT ? AS uid) WHERE user_id = uid OR author_id = uid",
            0,
        ),
        ("SELECT COUNT(*) FROM favorites WHERE user_id = ?", 0),
        ("SELECT COUNT(*) FROM shopping_cart WHERE user_id = ?", 0),
        ("SELECT COUNT(*) FROM refresh_tokens WHERE user_id = ?", 0),
    ] {
        let (count,): (i64,) = sqlx::query_as(sql)
            .bind(&chef_id)
            .fetch_one(&app.pool)
            .await
            .unwrap();
        assert_eq!(count, expected, "{}", sql);
    }

    // The fan's rows pointed at the deleted recipe, so they go too
    for table in ["favorites", "shopping_cart"] {
        let (count,): (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM {} WHERE user_id = ?",
            table
        ))
        .bind(&fan_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
        assert_eq!(count, 0, "{}", table);
    }

    let reply = app.get("/api/users/me", Some(&fan)).await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn reserved_username_is_rejected() {
    let app = setup().await;
    let reply = app
        .post(
            "/api/users",
            None,
            json!({
                "email": "me@example.com",
                "username": "me",
                "first_name": "Me",
                "last_name": "Myself",
                "password": "long enough password",
            }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn set_password_requires_current_password() {
    let app = setup().await;
    let (_, token) = app.signup("cook").await;

    let reply = app
        .post(
            "/api/users/set_password",
            Some(&token),
            json!({ "current_password": "not it", "new_password": "brand new secret" }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = app
        .post(
            "/api/users/set_password",
            Some(&token),
            json!({
                "current_password": "correct horse battery",
                "new_password": "brand new secret",
            }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);

    let reply = app
        .post(
            "/api/auth/token/login",
            None,
            json!({ "email": "cook@example.com", "password": "brand new secret" }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn subscribe_rules() {
    let app = setup().await;
    let (reader_id, reader) = app.signup("reader").await;
    let (author_id, author) = app.signup("author").await;
    let uri = format!("/api/users/{}/subscribe", author_id);

    let reply = app
        .post(&format!("/api/users/{}/subscribe", reader_id), Some(&reader), json!({}))
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = app
        .post("/api/users/nobody/subscribe", Some(&reader), json!({}))
        .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    let reply = app.post(&uri, Some(&reader), json!({})).await;
    assert_eq!(reply.status, StatusCode::CREATED);
    let body = reply.json();
    assert_eq!(body["id"], author_id.as_str());
    assert_eq!(body["is_subscribed"], true);
    assert_eq!(body["recipes_count"], 0);

    let reply = app.post(&uri, Some(&reader), json!({})).await;
    assert_eq!(reply.status, StatusCode::CONFLICT);

    // Profile reflects the edge from the viewer's side only
    let profile = app
        .get(&format!("/api/users/{}", author_id), Some(&reader))
        .await
        .json();
    assert_eq!(profile["is_subscribed"], true);
    let profile = app
        .get(&format!("/api/users/{}", reader_id), Some(&author))
        .await
        .json();
    assert_eq!(profile["is_subscribed"], false);

    assert_eq!(app.delete(&uri, Some(&reader)).await.status, StatusCode::NO_CONTENT);
    assert_eq!(app.delete(&uri, Some(&reader)).await.status, StatusCode::CONFLICT);

    // Self-subscribe stays rejected after other edges changed
    let reply = app
        .post(&format!("/api/users/{}/subscribe", reader_id), Some(&reader), json!({}))
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn subscriptions_preview_recipes() {
    let app = setup().await;
    let (_, reader) = app.signup("reader").await;
    let (author_id, author) = app.signup("author").await;

    for name in ["One", "Two", "Three"] {
        app.create_recipe(&author, name, &[("Egg", 1)], &[]).await;
    }
    app.post(&format!("/api/users/{}/subscribe", author_id), Some(&reader), json!({}))
        .await;

    let page = app
        .get("/api/users/subscriptions?recipes_limit=2", Some(&reader))
        .await
        .json();
    assert_eq!(page["count"], 1);
    let entry = &page["results"][0];
    assert_eq!(entry["username"], "author");
    assert_eq!(entry["recipes_count"], 3);
    assert_eq!(entry["recipes"].as_array().unwrap().len(), 2);
    assert_eq!(entry["recipes"][0]["name"], "Three");

    let page = app.get("/api/users/subscriptions", Some(&reader)).await.json();
    assert_eq!(page["results"][0]["recipes"].as_array().unwrap().len(), 3);

    let page = app.get("/api/users/subscriptions", Some(&author)).await.json();
    assert_eq!(page["count"], 0);
}

#[tokio::test]
async fn list_users_is_paginated() {
    let app = setup().await;
    for name in ["a1", "a2", "a3"] {
        app.signup(name).await;
    }

    let page = app.get("/api/users?limit=2", None).await.json();
    assert_eq!(page["count"], 3);
    assert_eq!(page["results"].as_array().unwrap().len(), 2);
    assert_eq!(page["next"], 2);
    assert_eq!(page["results"][0]["username"], "a3");
}
