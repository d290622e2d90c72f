use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PostcompError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(PostcompError::fetch("x").to_string().contains("fetch error:"));
    assert!(
        PostcompError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        PostcompError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn token_errors_name_the_offending_token() {
    let err = PostcompError::InvalidFormat("poster".to_string());
    assert!(err.to_string().contains("'poster'"));
    assert!(err.is_caller_error());

    let err = PostcompError::InvalidAnchor("middle".to_string());
    assert!(err.to_string().contains("'middle'"));
    assert!(err.is_caller_error());

    assert!(!PostcompError::fetch("timeout").is_caller_error());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PostcompError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
