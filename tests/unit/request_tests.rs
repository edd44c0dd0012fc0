// Request parsing unit tests

use imgshift::config::TransformConfig;
use imgshift::request::{
    parse_query, Operation, TransformRequest, CONVERT_VALIDATION_MESSAGE,
    RESIZE_VALIDATION_MESSAGE,
};

fn parse(operation: Operation, query: &str) -> Result<TransformRequest, String> {
    TransformRequest::from_query(operation, &parse_query(Some(query)), &TransformConfig::default())
        .map_err(|e| e.client_message(operation))
}

#[test]
fn test_resize_requires_image_and_width() {
    for query in ["", "width=400", "image=https://x/a.jpg", "image=&width=400"] {
        assert_eq!(
            parse(Operation::Resize, query).unwrap_err(),
            RESIZE_VALIDATION_MESSAGE,
            "query {query:?}"
        );
    }
}

#[test]
fn test_convert_requires_image() {
    assert_eq!(
        parse(Operation::Convert, "quality=90").unwrap_err(),
        CONVERT_VALIDATION_MESSAGE
    );
}

#[test]
fn test_lenient_width_parsing() {
    let request = parse(Operation::Resize, "image=https://x/a.jpg&width=300px").unwrap();
    match request {
        TransformRequest::Resize(r) => assert_eq!(r.width, 300),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_width_at_limit_accepted() {
    assert!(parse(Operation::Resize, "image=https://x/a.jpg&width=16384").is_ok());
    assert!(parse(Operation::Resize, "image=https://x/a.jpg&width=16385").is_err());
}

#[test]
fn test_operation_and_source_url_accessors() {
    let request = parse(Operation::Convert, "image=https%3A%2F%2Fx%2Fa.jpg").unwrap();
    assert_eq!(request.operation(), Operation::Convert);
    assert_eq!(request.source_url(), "https://x/a.jpg");
    assert_eq!(request.operation().to_string(), "convert");
}

#[test]
fn test_numeric_quality_is_carried() {
    match parse(Operation::Convert, "image=https://x/a.jpg&quality=55").unwrap() {
        TransformRequest::Convert(c) => assert_eq!(c.effective_quality(), 55.0),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_out_of_range_quality_is_not_rejected_by_parser() {
    // Range checks belong to the encoder
    assert!(parse(Operation::Convert, "image=https://x/a.jpg&quality=150").is_ok());
    assert!(parse(Operation::Convert, "image=https://x/a.jpg&quality=0").is_ok());
}
