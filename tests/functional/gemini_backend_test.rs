//! Functional tests for the Gemini HTTP contract

use image_studio::backend::traits::{ContentPart, EditRequest, GenerateRequest, ImageBackend};
use image_studio::backend::GeminiBackend;
use image_studio::config::ApiConfig;
use image_studio::response::{base64, StateRenderer, ViewState};
use image_studio::studio::generate::GENERATE_PROMPT;
use image_studio::{AppError, ModelId, Studio, UploadedImage};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

fn create_backend(server: &MockServer) -> GeminiBackend {
    GeminiBackend::new(&ApiConfig {
        api_key: API_KEY.to_string(),
        base_url: format!("{}/", server.uri()),
        timeout_ms: None,
    })
    .unwrap()
}

fn generate_request(model: ModelId) -> GenerateRequest {
    GenerateRequest {
        model: model.to_string(),
        prompt: "a lighthouse".to_string(),
        number_of_images: model.image_count(),
        aspect_ratio: "1:1".to_string(),
        person_generation: "allow_adult".to_string(),
        output_mime_type: "image/jpeg".to_string(),
        include_rai_reason: true,
    }
}

#[tokio::test]
async fn test_edit_request_contract() {
    let server = MockServer::start().await;
    let source = vec![0x89, 0x50, 0x4E, 0x47];

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash-image-preview:generateContent"))
        .and(header("x-goog-api-key", API_KEY))
        .and(body_json(json!({
            "contents": [{
                "role": "user",
                "parts": [
                    { "inlineData": { "mimeType": "image/png", "data": base64::encode(&source) } },
                    { "text": "add a hat" }
                ]
            }],
            "generationConfig": { "responseModalities": ["TEXT", "IMAGE"] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "Here is the edited image" },
                        { "inlineData": { "mimeType": "image/png", "data": base64::encode(b"edited") } }
                    ]
                },
                "finishReason": "STOP"
            }],
            "responseId": "abc"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = create_backend(&server)
        .edit_image(EditRequest {
            model: ModelId::GeminiFlashImage.to_string(),
            image: UploadedImage::new(source, "image/png"),
            prompt: "add a hat".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.parts.len(), 2);
    assert_eq!(
        response.parts[0],
        ContentPart::Text("Here is the edited image".to_string())
    );
    match &response.parts[1] {
        ContentPart::Image(image) => {
            assert_eq!(image.bytes, b"edited".to_vec());
            assert_eq!(image.mime_type, "image/png");
        }
        other => panic!("expected image part, got {:?}", other),
    }
    assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
}

#[tokio::test]
async fn test_edit_blocked_prompt_has_no_parts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash-image-preview:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let response = create_backend(&server)
        .edit_image(EditRequest {
            model: ModelId::GeminiFlashImage.to_string(),
            image: UploadedImage::new(vec![1, 2, 3], "image/jpeg"),
            prompt: "anything".to_string(),
        })
        .await
        .unwrap();

    assert!(response.parts.is_empty());
    assert_eq!(response.block_reason.as_deref(), Some("SAFETY"));
}

#[tokio::test]
async fn test_generate_request_contract() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/imagen-4.0-generate-001:predict"))
        .and(header("x-goog-api-key", API_KEY))
        .and(body_json(json!({
            "instances": [{ "prompt": "a lighthouse" }],
            "parameters": {
                "sampleCount": 3,
                "aspectRatio": "1:1",
                "personGeneration": "allow_adult",
                "outputOptions": { "mimeType": "image/jpeg" },
                "includeRaiReason": true
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "predictions": [
                { "bytesBase64Encoded": base64::encode(b"one"), "mimeType": "image/jpeg" },
                { "raiFilteredReason": "Filtered by safety settings" },
                { "bytesBase64Encoded": base64::encode(b"three") }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = create_backend(&server)
        .generate_images(generate_request(ModelId::Imagen4))
        .await
        .unwrap();

    let images = response.images.unwrap();
    assert_eq!(images.len(), 3);
    assert_eq!(images[0].image.as_ref().unwrap().bytes, b"one".to_vec());
    assert!(images[1].image.is_none());
    assert_eq!(
        images[1].rai_filtered_reason.as_deref(),
        Some("Filtered by safety settings")
    );
    assert_eq!(images[2].image.as_ref().unwrap().mime_type, "image/jpeg");
}

#[tokio::test]
async fn test_generate_without_predictions() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/imagen-3.0-generate-002:predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let response = create_backend(&server)
        .generate_images(generate_request(ModelId::Imagen3))
        .await
        .unwrap();

    assert!(response.images.is_none());
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let err = create_backend(&server)
        .generate_images(generate_request(ModelId::Imagen4Fast))
        .await
        .unwrap_err();

    match err {
        AppError::Api { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body, "API key not valid");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = create_backend(&server)
        .generate_images(generate_request(ModelId::Imagen4))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Json(_)));
}

#[tokio::test]
async fn test_selecting_ultra_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/imagen-4.0-ultra-generate-001:predict"))
        .and(body_json(json!({
            "instances": [{ "prompt": GENERATE_PROMPT }],
            "parameters": {
                "sampleCount": 1,
                "aspectRatio": "1:1",
                "personGeneration": "allow_adult",
                "outputOptions": { "mimeType": "image/jpeg" },
                "includeRaiReason": true
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "predictions": [
                { "bytesBase64Encoded": base64::encode(b"ultra"), "mimeType": "image/jpeg" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let renderer = Arc::new(StateRenderer::new());
    let studio = Studio::new(Arc::new(create_backend(&server)), renderer.clone());

    assert_eq!(studio.set_mode(ModelId::Imagen4Ultra).await.unwrap(), 1);

    match renderer.view() {
        ViewState::Results(images) => {
            assert_eq!(images.len(), 1);
            assert_eq!(images[0].bytes, b"ultra".to_vec());
            assert_eq!(images[0].alt_text, format!("{} - Image 1", GENERATE_PROMPT));
        }
        other => panic!("unexpected view: {:?}", other),
    }
}

#[tokio::test]
async fn test_transport_failure_surfaces_generic_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;

    let renderer = Arc::new(StateRenderer::new());
    let studio = Studio::new(Arc::new(create_backend(&server)), renderer.clone());
    studio.set_upload(UploadedImage::new(vec![1, 2, 3], "image/png"));
    studio.set_prompt("add a hat");

    let err = studio.submit_edit().await.unwrap_err();

    assert!(matches!(err, AppError::EditFailed));
    assert_eq!(
        renderer.view(),
        ViewState::Error(AppError::EditFailed.to_string())
    );
}

#[tokio::test]
async fn test_undecodable_prediction_keeps_the_rest() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/imagen-4.0-generate-001:predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "predictions": [
                { "bytesBase64Encoded": base64::encode(b"one"), "mimeType": "image/jpeg" },
                { "bytesBase64Encoded": "%%%not-base64%%%", "mimeType": "image/jpeg" },
                { "bytesBase64Encoded": base64::encode(b"three"), "mimeType": "image/jpeg" }
            ]
        })))
        .mount(&server)
        .await;

    let renderer = Arc::new(StateRenderer::new());
    let studio = Studio::new(Arc::new(create_backend(&server)), renderer.clone());

    assert_eq!(studio.set_mode(ModelId::Imagen4).await.unwrap(), 2);

    match renderer.view() {
        ViewState::Results(images) => {
            let bytes: Vec<_> = images.iter().map(|i| i.bytes.clone()).collect();
            assert_eq!(bytes, vec![b"one".to_vec(), b"three".to_vec()]);
            assert_eq!(images[1].alt_text, format!("{} - Image 3", GENERATE_PROMPT));
        }
        other => panic!("unexpected view: {:?}", other),
    }
}
