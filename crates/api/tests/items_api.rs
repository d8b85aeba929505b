//! HTTP-level integration tests for the `/items` resource: adding, status
//! cycling, check-off, edits, views and visibility between users.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_user, delete, get, login, post_empty, post_json, put_json};
use serde_json::{json, Value};
use sqlx::SqlitePool;

/// A grouped user logged in on a fresh app.
async fn setup(pool: &SqlitePool) -> (axum::Router, String) {
    create_user(pool, "hanako", Some("family-1"), false).await;
    let app = common::build_test_app(pool.clone());
    let cookie = login(&app, "hanako", "family-1").await;
    (app, cookie)
}

async fn add(app: &axum::Router, cookie: &str, body: Value) -> Value {
    let response = post_json(app, "/api/v1/items", body, Some(cookie)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn item_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM items")
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_item_routes_require_a_session(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone());

    let response = post_json(&app, "/api/v1/items", json!({ "name": "Milk" }), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(get(&app, "/api/v1/items", None).await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        post_empty(&app, "/api/v1/items/1/check", None).await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(item_count(&pool).await, 0);
}

// ---------------------------------------------------------------------------
// Adding
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_item_defaults(pool: SqlitePool) {
    let (app, cookie) = setup(&pool).await;

    let item = add(&app, &cookie, json!({ "name": "  Milk ", "category": " " })).await;
    assert_eq!(item["name"], "Milk");
    assert_eq!(item["category"], "uncategorized");
    assert_eq!(item["status"], 0);
    assert_eq!(item["is_shared"], true);
    assert_eq!(item["should_buy"], true);
    assert_eq!(item["is_memo_only"], false);
    assert_eq!(item["group_id"], "family-1");
    assert_eq!(item["updated_by"], "hanako");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_to_shopping_list_or_memo_starts_empty(pool: SqlitePool) {
    let (app, cookie) = setup(&pool).await;

    let listed = add(&app, &cookie, json!({ "name": "Eggs", "add_to_shopping_list": true })).await;
    assert_eq!(listed["status"], 2);

    let memo = add(&app, &cookie, json!({ "name": "Candles", "is_memo_only": true })).await;
    assert_eq!(memo["status"], 2);
    assert_eq!(memo["is_memo_only"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_item_rejects_blank_name(pool: SqlitePool) {
    let (app, cookie) = setup(&pool).await;

    let response = post_json(&app, "/api/v1/items", json!({ "name": "   " }), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["fields"]["name"].is_array());
    assert_eq!(item_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_demo_account_item_cap(pool: SqlitePool) {
    create_user(&pool, "demo", Some("demo-family"), false).await;
    let config = stocker_api::config::ServerConfig {
        accounts: stocker_api::config::AccountPolicy {
            demo_item_limit: 2,
            ..common::test_config().accounts
        },
        ..common::test_config()
    };
    let app = common::build_test_app_with(pool.clone(), config);
    let cookie = login(&app, "demo", "demo-family").await;

    add(&app, &cookie, json!({ "name": "One" })).await;
    add(&app, &cookie, json!({ "name": "Two" })).await;

    let response = post_json(&app, "/api/v1/items", json!({ "name": "Three" }), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(item_count(&pool).await, 2);
}

// ---------------------------------------------------------------------------
// Status and should-buy
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_toggle_status_cycles_and_wraps(pool: SqlitePool) {
    let (app, cookie) = setup(&pool).await;
    let item = add(&app, &cookie, json!({ "name": "Rice" })).await;
    let uri = format!("/api/v1/items/{}/toggle-status", item["id"]);

    let mut current = 0;
    for expected in [1, 2, 0] {
        let response =
            post_json(&app, &uri, json!({ "current_status": current }), Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["type"], "status_changed");
        assert_eq!(json["data"]["status"], expected);
        current = expected;
    }

    let stored: i64 = sqlx::query_scalar("SELECT status FROM items")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_toggle_status_rejects_unknown_status(pool: SqlitePool) {
    let (app, cookie) = setup(&pool).await;
    let item = add(&app, &cookie, json!({ "name": "Rice" })).await;
    let uri = format!("/api/v1/items/{}/toggle-status", item["id"]);

    let response = post_json(&app, &uri, json!({ "current_status": 3 }), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_toggle_status_unknown_item_is_404(pool: SqlitePool) {
    let (app, cookie) = setup(&pool).await;

    let response = post_json(
        &app,
        "/api/v1/items/999/toggle-status",
        json!({ "current_status": 0 }),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_toggle_should_buy_hides_item_from_shopping_view(pool: SqlitePool) {
    let (app, cookie) = setup(&pool).await;
    let item = add(&app, &cookie, json!({ "name": "Soy sauce", "add_to_shopping_list": true })).await;

    let uri = format!("/api/v1/items/{}/toggle-should-buy", item["id"]);
    let response = post_json(&app, &uri, json!({ "current": true }), Some(&cookie)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["type"], "should_buy_toggled");
    assert_eq!(json["data"]["should_buy"], false);

    let view = body_json(get(&app, "/api/v1/items/view?view=shopping", Some(&cookie)).await).await;
    assert_eq!(view["data"]["groups"], json!([]));
}

// ---------------------------------------------------------------------------
// Check-off, update, delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_check_off_deletes_memo_only_items(pool: SqlitePool) {
    let (app, cookie) = setup(&pool).await;
    let memo = add(&app, &cookie, json!({ "name": "Birthday card", "is_memo_only": true })).await;

    let uri = format!("/api/v1/items/{}/check", memo["id"]);
    let json = body_json(post_empty(&app, &uri, Some(&cookie)).await).await;
    assert_eq!(json["data"]["type"], "checked_off");
    assert_eq!(json["data"]["removed"], true);
    assert_eq!(item_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_check_off_restocks_tracked_items(pool: SqlitePool) {
    let (app, cookie) = setup(&pool).await;
    let item = add(&app, &cookie, json!({ "name": "Coffee", "add_to_shopping_list": true })).await;

    let uri = format!("/api/v1/items/{}/check", item["id"]);
    let json = body_json(post_empty(&app, &uri, Some(&cookie)).await).await;
    assert_eq!(json["data"]["removed"], false);

    let items = body_json(get(&app, "/api/v1/items", Some(&cookie)).await).await;
    assert_eq!(items["data"][0]["status"], 0);
    assert_eq!(items["data"][0]["updated_by"], "hanako");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_fields_but_keeps_status(pool: SqlitePool) {
    let (app, cookie) = setup(&pool).await;
    let item = add(&app, &cookie, json!({ "name": "Tea", "add_to_shopping_list": true })).await;

    let uri = format!("/api/v1/items/{}", item["id"]);
    let body = json!({
        "name": "Green tea",
        "category": "Drinks",
        "memo": "loose leaf",
        "is_shared": false,
        "is_memo_only": false,
    });
    let response = put_json(&app, &uri, body, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["type"], "updated");
    assert_eq!(json["data"]["fields"]["name"], "Green tea");

    let items = body_json(get(&app, "/api/v1/items", Some(&cookie)).await).await;
    let stored = &items["data"][0];
    assert_eq!(stored["name"], "Green tea");
    assert_eq!(stored["category"], "Drinks");
    assert_eq!(stored["memo"], "loose leaf");
    assert_eq!(stored["is_shared"], false);
    assert_eq!(stored["status"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_item(pool: SqlitePool) {
    let (app, cookie) = setup(&pool).await;
    let item = add(&app, &cookie, json!({ "name": "Flour" })).await;
    let uri = format!("/api/v1/items/{}", item["id"]);

    let response = delete(&app, &uri, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["type"], "deleted");
    assert_eq!(item_count(&pool).await, 0);

    let response = delete(&app, &uri, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stock_and_shopping_views(pool: SqlitePool) {
    let (app, cookie) = setup(&pool).await;
    add(&app, &cookie, json!({ "name": "Milk", "category": "Dairy" })).await;
    add(&app, &cookie, json!({ "name": "Apples", "category": "Produce", "add_to_shopping_list": true })).await;
    add(&app, &cookie, json!({ "name": "Cheese", "category": "Dairy", "add_to_shopping_list": true })).await;
    add(&app, &cookie, json!({ "name": "Balloons", "category": "Party", "is_memo_only": true })).await;

    let stock = body_json(get(&app, "/api/v1/items/view", Some(&cookie)).await).await;
    let stock = &stock["data"];
    assert_eq!(stock["view"], "stock");
    assert_eq!(stock["categories"], json!(["Dairy", "Produce"]));
    assert_eq!(stock["groups"][0]["category"], "Dairy");
    assert_eq!(stock["groups"][0]["items"].as_array().unwrap().len(), 2);
    assert_eq!(stock["groups"][1]["category"], "Produce");

    let shopping = body_json(get(&app, "/api/v1/items/view?view=shopping", Some(&cookie)).await).await;
    let shopping = &shopping["data"];
    assert_eq!(shopping["categories"], json!(["Produce", "Dairy", "Party"]));
    let names: Vec<&str> = shopping["groups"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|g| g["items"].as_array().unwrap())
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Apples", "Cheese", "Balloons"]);

    let filtered = body_json(
        get(&app, "/api/v1/items/view?view=shopping&category=Dairy", Some(&cookie)).await,
    )
    .await;
    let filtered = &filtered["data"];
    assert_eq!(filtered["categories"], json!(["Produce", "Dairy", "Party"]));
    assert_eq!(filtered["groups"].as_array().unwrap().len(), 1);
    assert_eq!(filtered["groups"][0]["items"][0]["name"], "Cheese");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_view_mode_is_rejected(pool: SqlitePool) {
    let (app, cookie) = setup(&pool).await;
    let response = get(&app, "/api/v1/items/view?view=pantry", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_suggestions_skip_finished_memos(pool: SqlitePool) {
    let (app, cookie) = setup(&pool).await;
    add(&app, &cookie, json!({ "name": "Milk", "category": "Dairy" })).await;
    add(&app, &cookie, json!({ "name": "Gift", "category": "Gifts", "is_memo_only": true })).await;

    // A memo-only item pushed back to plenty is a leftover.
    let leftover = add(&app, &cookie, json!({ "name": "Hats", "category": "Party", "is_memo_only": true })).await;
    let uri = format!("/api/v1/items/{}/toggle-status", leftover["id"]);
    post_json(&app, &uri, json!({ "current_status": 2 }), Some(&cookie)).await;

    let json = body_json(get(&app, "/api/v1/items/categories", Some(&cookie)).await).await;
    assert_eq!(json["data"], json!(["Dairy", "Gifts"]));
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_group_members_share_items_but_not_private_ones(pool: SqlitePool) {
    create_user(&pool, "hanako", Some("family-1"), false).await;
    create_user(&pool, "taro", Some("family-1"), false).await;
    create_user(&pool, "jiro", Some("family-2"), false).await;
    let app = common::build_test_app(pool.clone());
    let hanako = login(&app, "hanako", "family-1").await;
    let taro = login(&app, "taro", "family-1").await;
    let jiro = login(&app, "jiro", "family-2").await;

    let shared = add(&app, &hanako, json!({ "name": "Milk" })).await;
    let private = add(&app, &hanako, json!({ "name": "Diary", "is_shared": false })).await;

    let seen = body_json(get(&app, "/api/v1/items", Some(&taro)).await).await;
    let ids: Vec<&Value> = seen["data"].as_array().unwrap().iter().map(|i| &i["id"]).collect();
    assert_eq!(ids, vec![&shared["id"]]);

    // A family member can act on the shared item.
    let uri = format!("/api/v1/items/{}/check", shared["id"]);
    assert_eq!(post_empty(&app, &uri, Some(&taro)).await.status(), StatusCode::OK);

    // Private items and other families' items behave as missing.
    let uri = format!("/api/v1/items/{}", private["id"]);
    assert_eq!(delete(&app, &uri, Some(&taro)).await.status(), StatusCode::NOT_FOUND);
    let uri = format!("/api/v1/items/{}", shared["id"]);
    assert_eq!(delete(&app, &uri, Some(&jiro)).await.status(), StatusCode::NOT_FOUND);

    let seen = body_json(get(&app, "/api/v1/items", Some(&jiro)).await).await;
    assert_eq!(seen["data"], json!([]));
    assert_eq!(item_count(&pool).await, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ungrouped_users_see_only_their_own_items(pool: SqlitePool) {
    create_user(&pool, "solo", None, false).await;
    create_user(&pool, "other", None, false).await;
    let config = stocker_api::config::ServerConfig {
        accounts: stocker_api::config::AccountPolicy {
            require_group_on_login: false,
            ..common::test_config().accounts
        },
        ..common::test_config()
    };
    let app = common::build_test_app_with(pool, config);
    let solo = common::login(&app, "solo", "").await;
    let other = common::login(&app, "other", "").await;

    let item = add(&app, &solo, json!({ "name": "Batteries" })).await;
    assert_eq!(item["group_id"], Value::Null);

    let seen = body_json(get(&app, "/api/v1/items", Some(&other)).await).await;
    assert_eq!(seen["data"], json!([]));
}
