use super::*;
use crate::error::{PagesmithError, Result};
use crate::form::Submission;
use crate::generator::Generator;
use crate::handlers::generate::GenerateResponse;

use async_trait::async_trait;
use axum::http::header;
use http_body_util::BodyExt;
use std::sync::Mutex;
use tower::ServiceExt;

const BOUNDARY: &str = "pagesmith-test-boundary";

// Echoes what reached the generator so routes can be checked end to end
struct MockGenerator {
    seen: Mutex<Vec<Submission>>,
    fail: bool,
}

impl MockGenerator {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            fail: true,
        })
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, submission: &Submission) -> Result<String> {
        self.seen.lock().unwrap().push(submission.clone());
        if self.fail {
            return Err(PagesmithError::Upstream {
                status: 503,
                message: "model overloaded".to_string(),
            });
        }
        let mime = submission
            .attachment
            .as_ref()
            .map(|a| a.mime_type.as_str())
            .unwrap_or("none");
        Ok(format!("<html>{}|{}</html>", submission.prompt, mime))
    }
}

enum FormPart<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            FormPart::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            FormPart::File(file_name, mime, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {mime}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn generate_request(uri: &str, parts: &[FormPart<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

fn app(generator: Arc<MockGenerator>, token: Option<&str>) -> Router {
    router(
        PagesmithService::with_generator(generator, 1024),
        token.map(str::to_string),
    )
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_index_serves_page() {
    let response = app(MockGenerator::new(), None)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("id=\"dropzone\""));
    assert!(html.contains("/api/generate"));
    assert!(html.contains("sandbox=\"allow-scripts"));
    assert!(!html.contains("allow-same-origin"));
    assert!(!html.contains("window.open"));
    assert!(html.contains(
        "accept=\"image/png,image/jpeg,image/webp,image/heic,image/heif,application/pdf\""
    ));
}

#[tokio::test]
async fn test_health() {
    let response = app(MockGenerator::new(), None)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_generate_with_prompt_only() {
    let generator = MockGenerator::new();
    let response = app(generator.clone(), None)
        .oneshot(generate_request(
            "/api/generate",
            &[FormPart::Text("prompt", "a snake game")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let value = body_json(response).await;
    let parsed: GenerateResponse = serde_json::from_value(value).unwrap();
    assert_eq!(parsed.html, "<html>a snake game|none</html>");
    assert_eq!(generator.seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_generate_with_file_only() {
    let generator = MockGenerator::new();
    let response = app(generator.clone(), None)
        .oneshot(generate_request(
            "/api/generate",
            &[
                FormPart::Text("prompt", ""),
                FormPart::File("wireframe.png", "image/png", &[0x89, b'P', b'N', b'G']),
                FormPart::Text("theme", "ignored"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["html"], "<html>|image/png</html>");

    let seen = generator.seen.lock().unwrap();
    let attachment = seen[0].attachment.as_ref().unwrap();
    assert_eq!(attachment.file_name.as_deref(), Some("wireframe.png"));
    assert_eq!(attachment.bytes, vec![0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn test_generate_rejects_empty_submission() {
    let generator = MockGenerator::new();
    let response = app(generator.clone(), None)
        .oneshot(generate_request(
            "/api/generate",
            &[
                FormPart::Text("prompt", "   "),
                FormPart::File("", "application/octet-stream", b""),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value = body_json(response).await;
    assert!(value["error"].as_str().unwrap().contains("enter a prompt or attach a file"));
    assert!(generator.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_generate_rejects_unsupported_file() {
    let response = app(MockGenerator::new(), None)
        .oneshot(generate_request(
            "/api/generate",
            &[FormPart::File("notes.txt", "text/plain", b"hello")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_generate_rejects_oversized_file() {
    let big = vec![0u8; 2048];
    let response = app(MockGenerator::new(), None)
        .oneshot(generate_request(
            "/api/generate",
            &[FormPart::File("photo.jpg", "image/jpeg", &big)],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_generate_requires_multipart() {
    let response = app(MockGenerator::new(), None)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/generate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"prompt":"x"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_generate_upstream_failure_is_bad_gateway() {
    let response = app(MockGenerator::failing(), None)
        .oneshot(generate_request(
            "/api/generate",
            &[FormPart::Text("prompt", "dashboard")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let value = body_json(response).await;
    assert!(value["error"].as_str().unwrap().contains("model overloaded"));
}

#[tokio::test]
async fn test_bearer_token_required() {
    let app = app(MockGenerator::new(), Some("s3cret"));

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::AUTHORIZATION, "Bearer s3cret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(generate_request(
            "/api/generate?access_token=s3cret",
            &[FormPart::Text("prompt", "hi")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_bearer_token_rejects_wrong_credentials() {
    let app = app(MockGenerator::new(), Some("s3cret"));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::AUTHORIZATION, "Bearer wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::AUTHORIZATION, "s3cret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(generate_request(
            "/api/generate?access_token=s3cre",
            &[FormPart::Text("prompt", "hi")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_token_with_reserved_characters_in_query() {
    let generator = MockGenerator::new();
    let app = app(generator.clone(), Some("a/b+c=="));

    let response = app
        .clone()
        .oneshot(generate_request(
            "/api/generate?access_token=a%2Fb%2Bc%3D%3D",
            &[FormPart::Text("prompt", "hi")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(generator.seen.lock().unwrap().len(), 1);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/?token=a%2Fb%2Bc%3D%3D")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_generate_rejects_body_over_limit() {
    // Larger than max_upload_bytes plus the multipart allowance
    let huge = vec![0u8; 1024 + MULTIPART_OVERHEAD + 4096];
    let generator = MockGenerator::new();
    let response = app(generator.clone(), None)
        .oneshot(generate_request(
            "/api/generate",
            &[FormPart::File("poster.png", "image/png", &huge)],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let value = body_json(response).await;
    assert!(value["error"].as_str().unwrap().contains("Request body exceeds"));
    assert!(generator.seen.lock().unwrap().is_empty());
}

#[test]
fn test_query_token_matches() {
    let uri = |s: &str| s.parse::<Uri>().unwrap();
    assert!(query_token_matches(&uri("/?a=1&token=abc"), "abc"));
    assert!(query_token_matches(&uri("/?access_token=abc"), "abc"));
    assert!(query_token_matches(&uri("/?access_token=x%2By%2Fz"), "x+y/z"));
    assert!(!query_token_matches(&uri("/?token=abd"), "abc"));
    assert!(!query_token_matches(&uri("/?other=abc"), "abc"));
    assert!(!query_token_matches(&uri("/"), "abc"));
}
