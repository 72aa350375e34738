#![cfg(feature = "server")]

use std::sync::Arc;

use fedora::{build_router, AppState, Catalog, PersonDraft, SqliteStore};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const USER: &str = "x-remote-user";
const ROLES: &str = "x-remote-roles";

fn test_catalog() -> Catalog {
    Catalog::new(Arc::new(SqliteStore::open_in_memory().unwrap()))
}

/// Spin up the HTTP server on an OS-assigned port, returning the base URL.
async fn spawn_test_server(catalog: Catalog) -> String {
    let app = build_router(AppState::new(catalog));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

fn client() -> Client {
    Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Request builder carrying an identity, or none for `user = None`
fn as_user(
    builder: reqwest::RequestBuilder,
    user: Option<&str>,
    roles: &str,
) -> reqwest::RequestBuilder {
    match user {
        Some(name) => builder.header(USER, name).header(ROLES, roles),
        None => builder,
    }
}

async fn create_book(base: &str, title: &str, restricted: bool) -> Value {
    let resp = client()
        .post(format!("{}/books/", base))
        .header(USER, "root")
        .header(ROLES, "superuser")
        .json(&json!({"title": title, "author": "Anon", "restricted": restricted}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn list_tools_returns_fixed_pair() {
    let base = spawn_test_server(test_catalog()).await;

    // stored vehicles must not influence the listing
    client()
        .post(format!("{}/vehicles/", base))
        .json(&json!({"name": "Van"}))
        .send()
        .await
        .unwrap();

    let resp = client()
        .get(format!("{}/vehicles/list_tools/", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "tools": [
                {"name": "hammer", "make": "Mastercraft"},
                {"name": "wrench", "make": "Husky"},
            ]
        })
    );
}

#[tokio::test]
async fn people_listing_shape() {
    let catalog = test_catalog();
    catalog
        .add_person(PersonDraft {
            first: Some("Grace".to_string()),
            last: Some("Hopper".to_string()),
            title: Some("RADM".to_string()),
        })
        .unwrap();
    let base = spawn_test_server(catalog).await;

    let body: Value = client()
        .get(format!("{}/people/", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body,
        json!({"people": [{"first": "Grace", "last": "Hopper", "title": "RADM"}]})
    );
}

#[tokio::test]
async fn restricted_books_hidden_from_non_staff() {
    let base = spawn_test_server(test_catalog()).await;
    create_book(&base, "Open", false).await;
    let hidden = create_book(&base, "Hidden", true).await;
    let hidden_url = format!("{}/books/{}/", base, hidden["id"]);

    for (user, roles) in [(None, ""), (Some("reader"), ""), (Some("root"), "superuser")] {
        let books: Vec<Value> = as_user(client().get(format!("{}/books/", base)), user, roles)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(books.len(), 1, "caller {:?}", user);
        assert_eq!(books[0]["title"], "Open");

        let resp = as_user(client().get(&hidden_url), user, roles).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["kind"], "not_found");
    }
}

#[tokio::test]
async fn staff_sees_every_book() {
    let base = spawn_test_server(test_catalog()).await;
    create_book(&base, "Open", false).await;
    let hidden = create_book(&base, "Hidden", true).await;

    let books: Vec<Value> = client()
        .get(format!("{}/books/", base))
        .header(USER, "sam")
        .header(ROLES, "staff")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(books.len(), 2);

    let book: Value = client()
        .get(format!("{}/books/{}/", base, hidden["id"]))
        .header(USER, "sam")
        .header(ROLES, "staff")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(book, hidden);
}

#[tokio::test]
async fn staff_cannot_write_books() {
    let base = spawn_test_server(test_catalog()).await;
    let book = create_book(&base, "Open", false).await;
    let url = format!("{}/books/{}/", base, book["id"]);

    let resp = client()
        .post(format!("{}/books/", base))
        .header(USER, "sam")
        .header(ROLES, "staff")
        .json(&json!({"title": "New", "author": "Sam"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["kind"], "authorization");
    assert_eq!(body["success"], false);

    let resp = client()
        .patch(&url)
        .header(USER, "sam")
        .header(ROLES, "staff")
        .json(&json!({"title": "Changed"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client()
        .delete(&url)
        .header(USER, "sam")
        .header(ROLES, "staff")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client().post(format!("{}/books/", base)).json(&json!({})).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn superuser_updates_and_deletes_books() {
    let base = spawn_test_server(test_catalog()).await;
    let book = create_book(&base, "Draft", false).await;
    let url = format!("{}/books/{}/", base, book["id"]);

    let updated: Value = client()
        .put(&url)
        .header(USER, "root")
        .header(ROLES, "superuser")
        .json(&json!({"title": "Final", "author": "Editor", "restricted": false}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["title"], "Final");
    assert_eq!(updated["author"], "Editor");

    let resp = client()
        .patch(&url)
        .header(USER, "ada")
        .header(ROLES, "admin")
        .json(&json!({"restricted": true}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let patched: Value = resp.json().await.unwrap();
    assert_eq!(patched["restricted"], true);
    assert_eq!(patched["title"], "Final");

    let resp = client()
        .delete(&url)
        .header(USER, "ada")
        .header(ROLES, "admin")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client()
        .get(&url)
        .header(USER, "ada")
        .header(ROLES, "admin")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn book_validation_errors_are_structured() {
    let base = spawn_test_server(test_catalog()).await;

    let resp = client()
        .post(format!("{}/books/", base))
        .header(USER, "root")
        .header(ROLES, "superuser")
        .json(&json!({"title": "   "}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["kind"], "validation");
    assert_eq!(body["fields"]["title"], json!(["This field may not be blank."]));
    assert_eq!(body["fields"]["author"], json!(["This field is required."]));
}

#[tokio::test]
async fn library_requires_login() {
    let base = spawn_test_server(test_catalog()).await;

    let resp = client()
        .get(format!("{}/books/library/", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers()["location"],
        "/accounts/login/?next=%2Fbooks%2Flibrary%2F"
    );

    let resp = client()
        .get(format!("{}/books/library/", base))
        .header(USER, "reader")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    assert!(resp.text().await.unwrap().contains("<h1>Library</h1>"));
}

#[tokio::test]
async fn deleting_vehicle_cascades_to_parts() {
    let base = spawn_test_server(test_catalog()).await;

    let vehicle: Value = client()
        .post(format!("{}/vehicles/", base))
        .json(&json!({"name": "Truck"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let mut part_ids = Vec::new();
    for name in ["Axle", "Cab"] {
        let resp = client()
            .post(format!("{}/parts/", base))
            .json(&json!({"name": name, "make": "Dana", "vehicle": vehicle["id"]}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let part: Value = resp.json().await.unwrap();
        assert_eq!(part["vehicle"], vehicle["id"]);
        part_ids.push(part["id"].clone());
    }

    let resp = client()
        .delete(format!("{}/vehicles/{}/", base, vehicle["id"]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let parts: Vec<Value> = client()
        .get(format!("{}/parts/", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(parts.is_empty());

    for id in part_ids {
        let resp = client()
            .get(format!("{}/parts/{}/", base, id))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn part_with_unknown_vehicle_is_rejected() {
    let base = spawn_test_server(test_catalog()).await;

    let resp = client()
        .post(format!("{}/parts/", base))
        .json(&json!({"name": "Ghost", "make": "None", "vehicle": 999}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["fields"]["vehicle"],
        json!(["Invalid pk \"999\" - object does not exist."])
    );
}

#[tokio::test]
async fn artifact_crud_round() {
    let base = spawn_test_server(test_catalog()).await;

    let resp = client()
        .post(format!("{}/artifacts/", base))
        .json(&json!({"name": "Lamp"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let lamp: Value = resp.json().await.unwrap();
    assert_eq!(lamp["shiny"], false);
    let url = format!("{}/artifacts/{}/", base, lamp["id"]);

    let patched: Value = client()
        .patch(&url)
        .json(&json!({"shiny": true}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(patched, json!({"id": lamp["id"], "name": "Lamp", "shiny": true}));

    let resp = client().put(&url).json(&json!({"shiny": false})).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client().delete(&url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client().delete(&url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_json_is_validation_error() {
    let base = spawn_test_server(test_catalog()).await;

    let resp = client()
        .post(format!("{}/artifacts/", base))
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["kind"], "validation");
    assert!(body["fields"]["non_field_errors"].is_array());
}

#[tokio::test]
async fn non_numeric_id_is_not_found() {
    let base = spawn_test_server(test_catalog()).await;

    let resp = client()
        .get(format!("{}/vehicles/abc/", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_endpoint() {
    let base = spawn_test_server(test_catalog()).await;

    let body: Value = client()
        .get(format!("{}/health", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["success"], true);
}
