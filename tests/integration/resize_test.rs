// /resize end-to-end tests

use super::test_harness::*;

#[tokio::test]
async fn test_resize_jpeg_preserves_aspect_ratio() {
    let harness = PipelineHarness::start().await;
    let mock = harness.serve("/photos/photo.jpg", "image/jpeg", jpeg_fixture(800, 600));

    let response = harness
        .get("/resize", "/photos/photo.jpg", "width=400")
        .await;

    mock.assert();
    assert_eq!(response.status, 200, "{}", body_text(&response));
    assert_eq!(response.header_value("Content-Type"), Some("image/jpeg"));
    assert_eq!(response.header_value("X-Image-Width"), Some("400"));
    assert_eq!(response.header_value("X-Image-Height"), Some("300"));
    assert_eq!(
        response.header_value("Content-Length"),
        Some(response.body.len().to_string().as_str())
    );
    assert_eq!(
        response.header_value("Content-Disposition"),
        Some("inline; filename=\"photo_400w.jpg\"")
    );
    assert_eq!(response.header_value("X-Original-Format"), None);

    let decoded = image::load_from_memory(&response.body).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (400, 300));
}

#[tokio::test]
async fn test_resize_with_blur_names_file() {
    let harness = PipelineHarness::start().await;
    harness.serve("/photo.jpg", "image/jpeg", jpeg_fixture(64, 48));

    let response = harness
        .get("/resize", "/photo.jpg", "width=32&blur=5")
        .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.header_value("X-Image-Height"), Some("24"));
    assert_eq!(
        response.header_value("Content-Disposition"),
        Some("inline; filename=\"photo_32w_blur5.jpg\"")
    );
}

#[tokio::test]
async fn test_resize_upscales() {
    let harness = PipelineHarness::start().await;
    harness.serve("/small.jpg", "image/jpeg", jpeg_fixture(10, 5));

    let response = harness.get("/resize", "/small.jpg", "width=40").await;

    assert_eq!(response.status, 200);
    assert_eq!(response.header_value("X-Image-Width"), Some("40"));
    assert_eq!(response.header_value("X-Image-Height"), Some("20"));
}

#[tokio::test]
async fn test_resize_png_source_yields_png() {
    let harness = PipelineHarness::start().await;
    harness.serve("/logo.png", "image/png", png_fixture(100, 50));

    let response = harness.get("/resize", "/logo.png", "width=20").await;

    assert_eq!(response.status, 200);
    assert_eq!(response.header_value("Content-Type"), Some("image/png"));
    assert_eq!(&response.body[..4], &[0x89, b'P', b'N', b'G']);
    assert_eq!(response.header_value("X-Image-Height"), Some("10"));
    assert_eq!(
        response.header_value("Content-Disposition"),
        Some("inline; filename=\"logo_20w.png\"")
    );
}

#[tokio::test]
async fn test_resize_keeps_exif_orientation() {
    let harness = PipelineHarness::start().await;
    harness.serve("/rotated.jpg", "image/jpeg", jpeg_with_orientation(40, 20));

    let response = harness.get("/resize", "/rotated.jpg", "width=20").await;

    assert_eq!(response.status, 200);
    assert_eq!(orientation_of(&response.body), Some(6));
}

#[tokio::test]
async fn test_resize_missing_width_is_400() {
    let harness = PipelineHarness::start().await;
    let mock = harness.serve("/photo.jpg", "image/jpeg", jpeg_fixture(8, 8));

    let response = harness.get("/resize", "/photo.jpg", "").await;

    assert_eq!(response.status, 400);
    assert_eq!(body_text(&response), "Invalid parameters");
    mock.assert_hits(0);
}

#[tokio::test]
async fn test_resize_missing_image_is_400() {
    let harness = PipelineHarness::start().await;
    let response = harness
        .service
        .handle("GET", "/resize", Some("width=400"))
        .await;

    assert_eq!(response.status, 400);
    assert_eq!(body_text(&response), "Invalid parameters");
}

#[tokio::test]
async fn test_resize_width_over_configured_limit_is_400() {
    let harness = PipelineHarness::start_with(|c| c.transform.max_width = 100).await;
    harness.serve("/photo.jpg", "image/jpeg", jpeg_fixture(8, 8));

    let response = harness.get("/resize", "/photo.jpg", "width=101").await;

    assert_eq!(response.status, 400);
}

#[tokio::test]
async fn test_resize_source_404_is_500() {
    let harness = PipelineHarness::start().await;
    harness.fail("/missing.jpg", 404);

    let response = harness.get("/resize", "/missing.jpg", "width=400").await;

    assert_eq!(response.status, 500);
    assert_eq!(body_text(&response), "Error processing the image");
}

#[tokio::test]
async fn test_resize_non_image_source_is_500() {
    let harness = PipelineHarness::start().await;
    harness.serve("/page.jpg", "text/html", b"<html></html>".to_vec());

    let response = harness.get("/resize", "/page.jpg", "width=400").await;

    assert_eq!(response.status, 500);
    assert_eq!(body_text(&response), "Error processing the image");
}

#[tokio::test]
async fn test_resize_tall_sliver_to_max_width_is_500() {
    let harness = PipelineHarness::start().await;
    harness.serve("/sliver.png", "image/png", png_fixture(1, 4000));

    let response = harness.get("/resize", "/sliver.png", "width=16384").await;

    assert_eq!(response.status, 500);
    assert_eq!(body_text(&response), "Error processing the image");
    assert_eq!(harness.scratch_entries(), 0);
}

#[tokio::test]
async fn test_resize_source_over_pixel_budget_is_500() {
    let harness = PipelineHarness::start_with(|c| c.transform.max_source_pixels = 1000).await;
    harness.serve("/big.jpg", "image/jpeg", jpeg_fixture(40, 30));

    let response = harness.get("/resize", "/big.jpg", "width=20").await;

    assert_eq!(response.status, 500);
    assert_eq!(harness.scratch_entries(), 0);
}
