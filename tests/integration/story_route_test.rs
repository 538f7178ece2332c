use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
};
use serde_json::json;
use taleweaver::config::ImagePolicy;
use tower::ServiceExt;

use crate::support::{json_body, page_array, post_json, router, valid_body, StubImages, StubText};

const GENERATE: &str = "/api/story/generate";

#[tokio::test]
async fn forwards_provider_page_count_unchanged() {
    for (length, count) in [("short", 5), ("medium", 8), ("long", 12)] {
        let text = StubText::new(page_array(count));
        let images = StubImages::new();
        let app = router(text.clone(), images.clone(), ImagePolicy::PerPage);

        let response = app
            .oneshot(post_json(GENERATE, &valid_body(length)))
            .await
            .expect("router call");
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["pages"].as_array().map(Vec::len), Some(count));
        assert_eq!(text.calls(), 1);
        assert_eq!(images.calls(), count);
    }
}

#[tokio::test]
async fn short_reply_is_passed_through_not_padded() {
    let text = StubText::new(page_array(3));
    let app = router(text, StubImages::new(), ImagePolicy::PerPage);

    let response = app
        .oneshot(post_json(GENERATE, &valid_body("medium")))
        .await
        .expect("router call");
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["pages"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn success_body_carries_metadata() {
    let app = router(
        StubText::new(page_array(5)),
        StubImages::new(),
        ImagePolicy::PerPage,
    );

    let response = app
        .oneshot(post_json(GENERATE, &valid_body("short")))
        .await
        .expect("router call");
    let json = json_body(response).await;

    assert_eq!(json["metadata"]["title"], "The Adventures of Milo");
    assert_eq!(json["metadata"]["ageRange"], "6-8");
    assert_eq!(json["metadata"]["theme"], "adventure");
    assert_eq!(json["metadata"]["characterName"], "Milo");
    assert_eq!(json["pages"][0]["text"], "Page 1 of the story.");
    assert!(json["pages"][0].get("audioUrl").is_none());
}

#[tokio::test]
async fn out_of_enum_fields_are_rejected_before_any_provider_call() {
    let cases = [
        ("theme", json!("horror")),
        ("ageRange", json!("13-18")),
        ("storyLength", json!("epic")),
    ];

    for (field, value) in cases {
        let text = StubText::new(page_array(5));
        let images = StubImages::new();
        let app = router(text.clone(), images.clone(), ImagePolicy::PerPage);

        let mut body = valid_body("short");
        body[field] = value;

        let response = app
            .oneshot(post_json(GENERATE, &body))
            .await
            .expect("router call");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "field {}", field);

        let json = json_body(response).await;
        assert_eq!(json["error"], "Invalid request data");
        assert_eq!(json["details"][0]["field"], field);
        assert_eq!(text.calls(), 0);
        assert_eq!(images.calls(), 0);
    }
}

#[tokio::test]
async fn overlong_name_or_traits_are_rejected() {
    let cases = [
        ("characterName", "N".repeat(21)),
        ("characterTraits", "t".repeat(101)),
    ];

    for (field, value) in cases {
        let text = StubText::new(page_array(5));
        let app = router(text.clone(), StubImages::new(), ImagePolicy::PerPage);

        let mut body = valid_body("short");
        body[field] = json!(value);

        let response = app
            .oneshot(post_json(GENERATE, &body))
            .await
            .expect("router call");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = json_body(response).await;
        let details = json["details"].as_array().expect("details array");
        assert_eq!(details.len(), 1);
        assert_eq!(details[0]["field"], field);
        assert_eq!(text.calls(), 0);
    }
}

#[tokio::test]
async fn very_long_traits_are_a_field_violation() {
    let text = StubText::new(page_array(5));
    let app = router(text.clone(), StubImages::new(), ImagePolicy::PerPage);

    let mut body = valid_body("short");
    body["characterTraits"] = json!("t".repeat(70_000));

    let response = app
        .oneshot(post_json(GENERATE, &body))
        .await
        .expect("router call");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["error"], "Invalid request data");
    assert_eq!(json["details"][0]["field"], "characterTraits");
    assert_eq!(text.calls(), 0);
}

#[tokio::test]
async fn body_over_the_read_limit_is_a_validation_failure() {
    let text = StubText::new(page_array(5));
    let app = router(text.clone(), StubImages::new(), ImagePolicy::PerPage);

    let mut body = valid_body("short");
    body["characterTraits"] = json!("t".repeat(2 * 1024 * 1024));

    let response = app
        .oneshot(post_json(GENERATE, &body))
        .await
        .expect("router call");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["error"], "Invalid request data");
    assert_eq!(json["details"][0]["field"], "body");
    assert_eq!(text.calls(), 0);
}

#[tokio::test]
async fn malformed_json_body_is_a_validation_failure() {
    let text = StubText::new(page_array(5));
    let app = router(text.clone(), StubImages::new(), ImagePolicy::PerPage);

    let request = Request::builder()
        .method("POST")
        .uri(GENERATE)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"ageRange\": 5"))
        .expect("build request");

    let response = app.oneshot(request).await.expect("router call");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["error"], "Invalid request data");
    assert_eq!(json["details"][0]["field"], "body");
    assert_eq!(text.calls(), 0);
}

#[tokio::test]
async fn prose_around_the_array_is_ignored() {
    let reply = format!(
        "Here is a lovely story for you!\n\n{}\n\nLet me know if you want changes.",
        page_array(5)
    );
    let app = router(StubText::new(reply), StubImages::new(), ImagePolicy::PerPage);

    let response = app
        .oneshot(post_json(GENERATE, &valid_body("short")))
        .await
        .expect("router call");
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let pages = json["pages"].as_array().expect("pages array");
    assert_eq!(pages.len(), 5);
    assert_eq!(pages[4]["text"], "Page 5 of the story.");
}

#[tokio::test]
async fn unparseable_reply_is_a_server_error() {
    let images = StubImages::new();
    let app = router(
        StubText::new("I'm sorry, I can't write that story today."),
        images.clone(),
        ImagePolicy::PerPage,
    );

    let response = app
        .oneshot(post_json(GENERATE, &valid_body("short")))
        .await
        .expect("router call");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = json_body(response).await;
    assert_eq!(json["error"], "Failed to parse story response");
    assert!(json.get("details").is_none());
    assert_eq!(images.calls(), 0);
}

#[tokio::test]
async fn empty_provider_reply_is_a_generic_failure() {
    let app = router(StubText::new(""), StubImages::new(), ImagePolicy::PerPage);

    let response = app
        .oneshot(post_json(GENERATE, &valid_body("short")))
        .await
        .expect("router call");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = json_body(response).await;
    assert_eq!(json["error"], "Failed to generate story. Please try again.");
}

#[tokio::test]
async fn text_provider_failure_is_a_generic_failure_without_images() {
    let text = StubText::unreachable();
    let images = StubImages::new();
    let app = router(text.clone(), images.clone(), ImagePolicy::PerPage);

    let response = app
        .oneshot(post_json(GENERATE, &valid_body("short")))
        .await
        .expect("router call");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = json_body(response).await;
    assert_eq!(json["error"], "Failed to generate story. Please try again.");
    assert!(json.get("details").is_none());
    assert_eq!(text.calls(), 1);
    assert_eq!(images.calls(), 0);
}

#[tokio::test]
async fn cover_only_makes_one_image_call() {
    let text = StubText::new(page_array(12));
    let images = StubImages::new();
    let app = router(text, images.clone(), ImagePolicy::CoverOnly);

    let response = app
        .oneshot(post_json(GENERATE, &valid_body("long")))
        .await
        .expect("router call");
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let pages = json["pages"].as_array().expect("pages array");
    assert_eq!(pages.len(), 12);
    assert_eq!(images.calls(), 1);
    assert!(pages[0]["imageUrl"].as_str().is_some());
    assert!(pages[1..].iter().all(|p| p.get("imageUrl").is_none()));
}

#[tokio::test]
async fn failed_page_image_leaves_the_story_intact() {
    let images = StubImages::failing_on("scene-2");
    let app = router(
        StubText::new(page_array(5)),
        images.clone(),
        ImagePolicy::PerPage,
    );

    let response = app
        .oneshot(post_json(GENERATE, &valid_body("short")))
        .await
        .expect("router call");
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let pages = json["pages"].as_array().expect("pages array");
    assert_eq!(pages.len(), 5);
    assert_eq!(images.calls(), 5);
    assert!(pages[2].get("imageUrl").is_none());
    for index in [0, 1, 3, 4] {
        assert_eq!(pages[index]["imageUrl"], "data:image/png;base64,iVBORw0KGgo=");
    }
}
