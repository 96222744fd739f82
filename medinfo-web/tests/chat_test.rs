mod common;

use common::{image_part, png_bytes, test_settings, TestApp};
use medinfo_web::services::{MockCompletionProvider, MockReply};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use std::sync::Arc;

async fn error_message(response: reqwest::Response) -> String {
    let body: serde_json::Value = response.json().await.unwrap();
    body["error"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn text_query_returns_the_answer() {
    let provider = Arc::new(MockCompletionProvider::answering("Drink water and rest."));
    let app = TestApp::spawn(provider.clone()).await;

    let response = app
        .post_chat(Form::new().text("query", "What helps with a fever?"))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["answer"], "Drink water and rest.");

    let requests = provider.recorded_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].len(), 1);
    let texts: Vec<&str> = requests[0][0].text_blocks().collect();
    assert_eq!(texts, vec!["What helps with a fever?"]);
    assert_eq!(requests[0][0].image_urls().count(), 0);
}

#[tokio::test]
async fn missing_query_is_rejected_without_calling_upstream() {
    let provider = Arc::new(MockCompletionProvider::answering("unused"));
    let app = TestApp::spawn(provider.clone()).await;

    let response = app.post_chat(Form::new().text("other", "x")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "No query provided.");
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn empty_query_is_rejected_even_with_an_image() {
    let provider = Arc::new(MockCompletionProvider::answering("unused"));
    let app = TestApp::spawn(provider.clone()).await;

    let form = Form::new()
        .text("query", "")
        .part("image", image_part(png_bytes(), "scan.png"));
    let response = app.post_chat(form).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "No query provided.");
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn request_without_a_form_body_is_rejected() {
    let provider = Arc::new(MockCompletionProvider::answering("unused"));
    let app = TestApp::spawn(provider.clone()).await;

    let response = app
        .client
        .post(format!("{}/api/chat", app.address))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn corrupted_image_is_rejected_without_calling_upstream() {
    let provider = Arc::new(MockCompletionProvider::answering("unused"));
    let app = TestApp::spawn(provider.clone()).await;

    let form = Form::new()
        .text("query", "What is this?")
        .part("image", image_part(b"definitely not an image".to_vec(), "scan.png"));
    let response = app.post_chat(form).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(error_message(response)
        .await
        .starts_with("Invalid image format: "));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn valid_image_is_forwarded_as_a_jpeg_data_url() {
    let provider = Arc::new(MockCompletionProvider::answering("Looks like a red square."));
    let app = TestApp::spawn(provider.clone()).await;

    let form = Form::new()
        .text("query", "What is this?")
        .part("image", image_part(png_bytes(), "scan.png"));
    let response = app.post_chat(form).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(provider.call_count(), 1);

    let requests = provider.recorded_requests().await;
    let urls: Vec<&str> = requests[0][0].image_urls().collect();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].starts_with("data:image/jpeg;base64,"));
    assert!(urls[0].len() > "data:image/jpeg;base64,".len());
}

#[tokio::test]
async fn image_field_without_a_file_name_counts_as_no_image() {
    let provider = Arc::new(MockCompletionProvider::answering("ok"));
    let app = TestApp::spawn(provider.clone()).await;

    let form = Form::new()
        .text("query", "Hello")
        .part("image", Part::bytes(Vec::new()).file_name(""));
    let response = app.post_chat(form).await;

    assert_eq!(response.status(), StatusCode::OK);
    let requests = provider.recorded_requests().await;
    assert_eq!(requests[0][0].image_urls().count(), 0);
}

#[tokio::test]
async fn url_encoded_query_is_accepted() {
    let provider = Arc::new(MockCompletionProvider::answering("Hi there"));
    let app = TestApp::spawn(provider.clone()).await;

    let response = app
        .client
        .post(format!("{}/api/chat", app.address))
        .form(&[("query", "Hello")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn upstream_status_is_propagated() {
    let provider = Arc::new(MockCompletionProvider::new(MockReply::Status(
        StatusCode::TOO_MANY_REQUESTS,
        "rate limited".to_string(),
    )));
    let app = TestApp::spawn(provider.clone()).await;

    let response = app.post_chat(Form::new().text("query", "Hello")).await;

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        error_message(response).await,
        "Error from API: 429 - rate limited"
    );
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn network_failure_is_an_internal_error() {
    let provider = Arc::new(MockCompletionProvider::new(MockReply::Network(
        "connection refused".to_string(),
    )));
    let app = TestApp::spawn(provider.clone()).await;

    let response = app.post_chat(Form::new().text("query", "Hello")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error_message(response)
        .await
        .starts_with("Internal Server Error: "));
}

#[tokio::test]
async fn each_submission_is_relayed_once() {
    let provider = Arc::new(MockCompletionProvider::answering("Same answer"));
    let app = TestApp::spawn(provider.clone()).await;

    for _ in 0..2 {
        let response = app.post_chat(Form::new().text("query", "Repeat me")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(provider.call_count(), 2);
    let requests = provider.recorded_requests().await;
    assert_eq!(requests[0], requests[1]);
}

#[tokio::test]
async fn chat_responses_use_the_api_content_security_policy() {
    let provider = Arc::new(MockCompletionProvider::answering("ok"));
    let app = TestApp::spawn(provider).await;

    let response = app.post_chat(Form::new().text("query", "Hello")).await;

    assert_eq!(
        response.headers()["content-security-policy"],
        "default-src 'none'; frame-ancestors 'none'"
    );
}

async fn spawn_with_upload_cap(provider: Arc<MockCompletionProvider>, cap: usize) -> TestApp {
    let mut settings = test_settings("http://127.0.0.1:9");
    settings.chat.max_upload_bytes = Some(cap);
    TestApp::spawn_with(settings, provider).await
}

#[tokio::test]
async fn upload_over_the_cap_is_payload_too_large() {
    let provider = Arc::new(MockCompletionProvider::answering("unused"));
    let app = spawn_with_upload_cap(provider.clone(), 1024).await;

    let form = Form::new()
        .text("query", "What is this?")
        .part("image", image_part(vec![0u8; 64 * 1024], "large.png"));
    let response = app.post_chat(form).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(error_message(response).await, "Upload too large");
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn url_encoded_body_over_the_cap_is_payload_too_large() {
    let provider = Arc::new(MockCompletionProvider::answering("unused"));
    let app = spawn_with_upload_cap(provider.clone(), 1024).await;

    let query = "a".repeat(8 * 1024);
    let response = app
        .client
        .post(format!("{}/api/chat", app.address))
        .form(&[("query", query.as_str())])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn upload_under_the_cap_is_relayed() {
    let provider = Arc::new(MockCompletionProvider::answering("A red square."));
    let app = spawn_with_upload_cap(provider.clone(), 64 * 1024).await;

    let form = Form::new()
        .text("query", "What is this?")
        .part("image", image_part(png_bytes(), "scan.png"));
    let response = app.post_chat(form).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(provider.call_count(), 1);
}
