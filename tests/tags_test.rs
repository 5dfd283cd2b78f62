mod common;

use axum::http::StatusCode;
use common::*;
use rust_file_organizer::entities::prelude::*;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

#[tokio::test]
async fn test_tag_crud() {
    let (test, _) = spawn_app().await;

    let (status, created) = send(
        &test.app,
        json_request(
            "POST",
            "/api/tags",
            Some(&test.token),
            json!({ "name": "Holiday", "color": "#ff8800" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["name"], "Holiday");
    let id = created["id"].as_str().unwrap();

    let (status, updated) = send(
        &test.app,
        json_request(
            "PUT",
            &format!("/api/tags/{}", id),
            Some(&test.token),
            json!({ "name": "Travel", "color": "blue" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], id);
    assert_eq!(updated["name"], "Travel");
    assert_eq!(updated["color"], "blue");

    let (status, list) = send(&test.app, empty_request("GET", "/api/tags", Some(&test.token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["name"], "Travel");
}

#[tokio::test]
async fn test_tag_validation_and_missing_tags() {
    let (test, _) = spawn_app().await;

    let (status, _) = send(
        &test.app,
        json_request("POST", "/api/tags", Some(&test.token), json!({ "name": "", "color": "red" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &test.app,
        json_request(
            "PUT",
            "/api/tags/missing",
            Some(&test.token),
            json!({ "name": "x", "color": "red" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &test.app,
        empty_request("DELETE", "/api/tags/missing", Some(&test.token)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_tag_retracts_it_from_files() {
    let (test, _) = spawn_app().await;

    let (_, tag) = send(
        &test.app,
        json_request(
            "POST",
            "/api/tags",
            Some(&test.token),
            json!({ "name": "Work", "color": "#000" }),
        ),
    )
    .await;
    let tag_id = tag["id"].as_str().unwrap();

    let tagged = format!("{},keep", tag_id);
    let a = upload(&test, "a.png", "image/png", b"a", None, Some(&tagged)).await;
    let b = upload(&test, "b.pdf", "application/pdf", b"b", None, Some(tag_id)).await;
    assert_eq!(FileTags::find().count(&test.db).await.unwrap(), 3);

    let (status, _) = send(
        &test.app,
        empty_request("DELETE", &format!("/api/tags/{}", tag_id), Some(&test.token)),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, a) = send(
        &test.app,
        empty_request("GET", &format!("/api/files/{}", a["id"].as_str().unwrap()), Some(&test.token)),
    )
    .await;
    assert_eq!(a["tags"], json!(["keep"]));

    let (_, b) = send(
        &test.app,
        empty_request("GET", &format!("/api/files/{}", b["id"].as_str().unwrap()), Some(&test.token)),
    )
    .await;
    assert_eq!(b["tags"], json!([]));

    assert_eq!(Tags::find().count(&test.db).await.unwrap(), 0);
}
