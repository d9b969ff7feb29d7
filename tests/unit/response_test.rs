//! Unit tests for response helpers and the in-memory renderer

use image_studio::response::{base64, RenderedImage, ResultRenderer, StateRenderer, ViewState};
use image_studio::UploadedImage;

fn rendered(byte: u8) -> RenderedImage {
    RenderedImage {
        bytes: vec![byte],
        mime_type: "image/png".to_string(),
        alt_text: format!("image {}", byte),
    }
}

#[test]
fn test_base64_decode_data_url() {
    let data_url = "data:image/png;base64,SGVsbG8sIFdvcmxkIQ==";
    let decoded = base64::decode(data_url).unwrap();

    assert_eq!(b"Hello, World!", decoded.as_slice());
}

#[test]
fn test_parse_data_url() {
    let (mime, data) = base64::parse_data_url("data:image/webp;base64,SGVsbG8=").unwrap();
    assert_eq!(mime, "image/webp");
    assert_eq!(data, b"Hello".to_vec());

    assert!(base64::parse_data_url("SGVsbG8=").is_err());
}

#[test]
fn test_end_loading_without_begin_is_harmless() {
    let renderer = StateRenderer::new();
    renderer.end_loading();

    assert_eq!(renderer.view(), ViewState::Idle);
}

#[test]
fn test_loading_then_results() {
    let renderer = StateRenderer::new();
    renderer.begin_loading();
    renderer.append_image(rendered(1));
    renderer.append_image(rendered(2));
    assert_eq!(renderer.view(), ViewState::Loading);

    renderer.end_loading();
    assert_eq!(
        renderer.view(),
        ViewState::Results(vec![rendered(1), rendered(2)])
    );
}

#[test]
fn test_error_replaces_results() {
    let renderer = StateRenderer::new();
    renderer.append_image(rendered(1));
    renderer.show_error("boom");

    assert_eq!(renderer.view(), ViewState::Error("boom".to_string()));
    assert!(renderer.images().is_empty());

    renderer.begin_loading();
    renderer.end_loading();
    assert_eq!(renderer.view(), ViewState::Idle);
}

#[test]
fn test_clear_results() {
    let renderer = StateRenderer::new();
    renderer.append_image(rendered(1));
    renderer.show_error("boom");
    renderer.clear_results();

    assert_eq!(renderer.view(), ViewState::Idle);
    assert!(renderer.error().is_none());
}

#[test]
fn test_preview_and_controls() {
    let renderer = StateRenderer::new();
    let upload = UploadedImage::new(vec![1, 2], "image/png");

    renderer.show_preview(Some(&upload));
    renderer.show_edit_controls(true);
    assert_eq!(renderer.preview(), Some(upload));
    assert!(renderer.edit_controls_visible());

    renderer.show_preview(None);
    renderer.show_edit_controls(false);
    assert!(renderer.preview().is_none());
    assert!(!renderer.edit_controls_visible());
}
