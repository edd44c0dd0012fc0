// /convert end-to-end tests

use super::test_harness::*;
use httpmock::prelude::*;

#[tokio::test]
async fn test_convert_to_webp_with_default_quality() {
    let harness = PipelineHarness::start().await;
    let mock = harness.serve("/photo.jpg", "image/jpeg", jpeg_fixture(120, 80));

    let response = harness.get("/convert", "/photo.jpg", "").await;

    mock.assert();
    assert_eq!(response.status, 200, "{}", body_text(&response));
    assert_eq!(response.header_value("Content-Type"), Some("image/webp"));
    assert_eq!(response.header_value("X-Image-Width"), Some("120"));
    assert_eq!(response.header_value("X-Image-Height"), Some("80"));
    assert_eq!(response.header_value("X-Original-Format"), Some(".jpg"));
    assert_eq!(
        response.header_value("Content-Disposition"),
        Some("inline; filename=\"photo.webp\"")
    );
    assert_eq!(&response.body[..4], b"RIFF");
    assert_eq!(&response.body[8..12], b"WEBP");
    // Lossy bitstream
    assert_eq!(&response.body[12..16], b"VP8 ");
}

#[tokio::test]
async fn test_convert_with_explicit_quality() {
    let harness = PipelineHarness::start().await;
    harness.serve("/photo.jpg", "image/jpeg", jpeg_fixture(32, 32));

    let response = harness.get("/convert", "/photo.jpg", "quality=90").await;

    assert_eq!(response.status, 200);
    assert_eq!(
        response.header_value("Content-Disposition"),
        Some("inline; filename=\"photo_q90.webp\"")
    );
}

#[tokio::test]
async fn test_lower_quality_is_not_larger() {
    let harness = PipelineHarness::start().await;
    harness.serve("/photo.jpg", "image/jpeg", jpeg_fixture(256, 256));

    let low = harness.get("/convert", "/photo.jpg", "quality=10").await;
    let high = harness.get("/convert", "/photo.jpg", "quality=100").await;

    assert_eq!(low.status, 200);
    assert_eq!(high.status, 200);
    assert!(low.body.len() <= high.body.len());
}

#[tokio::test]
async fn test_convert_png_reports_original_format() {
    let harness = PipelineHarness::start().await;
    harness.serve("/logo.png", "image/png", png_fixture(16, 16));

    let response = harness.get("/convert", "/logo.png", "").await;

    assert_eq!(response.status, 200);
    assert_eq!(response.header_value("X-Original-Format"), Some(".png"));
}

#[tokio::test]
async fn test_convert_without_extension_omits_original_format() {
    let harness = PipelineHarness::start().await;
    harness.serve("/avatar", "image/jpeg", jpeg_fixture(16, 16));

    let response = harness.get("/convert", "/avatar", "").await;

    assert_eq!(response.status, 200);
    assert_eq!(response.header_value("X-Original-Format"), None);
    assert_eq!(
        response.header_value("Content-Disposition"),
        Some("inline; filename=\"avatar.webp\"")
    );
}

#[tokio::test]
async fn test_convert_missing_image_is_400() {
    let harness = PipelineHarness::start().await;
    let response = harness
        .service
        .handle("GET", "/convert", Some("quality=90"))
        .await;

    assert_eq!(response.status, 400);
    assert_eq!(
        body_text(&response),
        "Invalid parameters: image URL is required"
    );
}

#[tokio::test]
async fn test_convert_non_numeric_quality_is_500() {
    let harness = PipelineHarness::start().await;
    harness.serve("/photo.jpg", "image/jpeg", jpeg_fixture(16, 16));

    let response = harness.get("/convert", "/photo.jpg", "quality=best").await;

    assert_eq!(response.status, 500);
    assert_eq!(body_text(&response), "Error converting the image");
}

#[tokio::test]
async fn test_convert_out_of_range_quality_is_500() {
    let harness = PipelineHarness::start().await;
    harness.serve("/photo.jpg", "image/jpeg", jpeg_fixture(16, 16));

    let response = harness.get("/convert", "/photo.jpg", "quality=150").await;

    assert_eq!(response.status, 500);
}

#[tokio::test]
async fn test_convert_source_500_is_500() {
    let harness = PipelineHarness::start().await;
    harness.fail("/broken.jpg", 503);

    let response = harness.get("/convert", "/broken.jpg", "").await;

    assert_eq!(response.status, 500);
    assert_eq!(body_text(&response), "Error converting the image");
}

#[tokio::test]
async fn test_convert_control_characters_in_source_name_stay_out_of_headers() {
    let harness = PipelineHarness::start().await;
    harness.source.mock(|when, then| {
        when.method(GET).path_suffix("oto.jpg");
        then.status(200)
            .header("content-type", "image/jpeg")
            .body(jpeg_fixture(10, 10));
    });

    let response = harness
        .get("/convert", "/ph%0D%0Aoto.jpg", "quality=90")
        .await;

    assert_eq!(response.status, 200, "{}", body_text(&response));
    assert_eq!(
        response.header_value("Content-Disposition"),
        Some("inline; filename=\"photo_q90.webp\"")
    );
    assert_eq!(response.header_value("X-Original-Format"), Some(".jpg"));

    let mut header = pingora_http::ResponseHeader::build(response.status, None).unwrap();
    for (name, value) in &response.headers {
        header.insert_header(*name, value.as_str()).unwrap();
    }
}
