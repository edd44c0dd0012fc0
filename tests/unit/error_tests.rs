// Error mapping unit tests

use imgshift::error::PipelineError;
use imgshift::request::Operation;
use imgshift::transform::ImageError;

#[test]
fn test_every_non_validation_error_is_500_with_generic_message() {
    let errors = vec![
        PipelineError::download("https://x/a.jpg", "HTTP request failed with status: 500"),
        PipelineError::unreadable("unknown container"),
        PipelineError::Transform(ImageError::decode_failed("truncated")),
        PipelineError::Scratch(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )),
    ];

    for err in errors {
        assert_eq!(err.to_http_status(), 500, "{err}");
        assert_eq!(
            err.client_message(Operation::Resize),
            "Error processing the image"
        );
        assert_eq!(
            err.client_message(Operation::Convert),
            "Error converting the image"
        );
    }
}

#[test]
fn test_internal_detail_never_reaches_client() {
    let err = PipelineError::download("https://secret.internal/a.jpg", "connection refused");
    let message = err.client_message(Operation::Resize);
    assert!(!message.contains("secret.internal"));
    assert!(err.to_string().contains("secret.internal"));
}

#[test]
fn test_image_error_converts_into_pipeline_error() {
    let err: PipelineError = ImageError::invalid_quality("webp", f32::NAN).into();
    assert_eq!(err.kind(), "transform");
    assert!(err.to_string().contains("received NaN"));
}

#[test]
fn test_error_kinds() {
    assert_eq!(PipelineError::validation("x").kind(), "validation");
    assert_eq!(PipelineError::download("u", "m").kind(), "download");
    assert_eq!(PipelineError::unreadable("m").kind(), "unreadable_image");
}
