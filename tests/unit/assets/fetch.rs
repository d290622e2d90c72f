use std::io::Write;

use super::*;

#[test]
fn parse_classifies_sources() {
    assert_eq!(
        ImageSource::parse("https://cdn.example.com/bg.jpg").unwrap(),
        ImageSource::Url("https://cdn.example.com/bg.jpg".to_owned())
    );
    assert_eq!(
        ImageSource::parse("file:///tmp/logo.png").unwrap(),
        ImageSource::Path(PathBuf::from("/tmp/logo.png"))
    );
    assert_eq!(
        ImageSource::parse("  assets/logo.png ").unwrap(),
        ImageSource::Path(PathBuf::from("assets/logo.png"))
    );
    assert_eq!(
        ImageSource::parse("data:image/png;base64,AQID").unwrap(),
        ImageSource::from_bytes(vec![1, 2, 3])
    );
}

#[test]
fn parse_rejects_bad_sources() {
    assert!(ImageSource::parse("").is_err());
    assert!(ImageSource::parse("file://").is_err());
    assert!(ImageSource::parse("s3://bucket/key").is_err());
    assert!(ImageSource::parse("data:image/png,rawtext").is_err());
    assert!(ImageSource::parse("data:image/png;base64,@@@").is_err());
}

#[test]
fn serde_uses_source_strings() {
    let src: ImageSource = serde_json::from_str("\"https://x.test/a.png\"").unwrap();
    assert!(matches!(src, ImageSource::Url(_)));

    let inline = ImageSource::from_bytes(vec![9, 8, 7]);
    let json = serde_json::to_string(&inline).unwrap();
    assert!(json.contains("data:application/octet-stream;base64,"));
    let back: ImageSource = serde_json::from_str(&json).unwrap();
    assert_eq!(back, inline);
}

#[test]
fn describe_hides_inline_payload() {
    assert_eq!(
        ImageSource::from_bytes(vec![0; 42]).describe(),
        "<42 inline bytes>"
    );
}

#[tokio::test]
async fn fetch_bytes_reads_files_and_inline_bytes() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(b"hello").unwrap();
    let fetcher = AssetFetcher::new(FetchConfig::default()).unwrap();

    let from_file = fetcher
        .fetch_bytes(&ImageSource::Path(f.path().to_path_buf()))
        .await
        .unwrap();
    assert_eq!(from_file.as_slice(), b"hello");

    let inline = fetcher
        .fetch_bytes(&ImageSource::from_bytes(b"abc".to_vec()))
        .await
        .unwrap();
    assert_eq!(inline.as_slice(), b"abc");
}

#[tokio::test]
async fn missing_file_is_a_fetch_error() {
    let fetcher = AssetFetcher::new(FetchConfig::default()).unwrap();
    let err = fetcher
        .fetch(&ImageSource::Path(PathBuf::from("/nonexistent/postcomp/logo.png")))
        .await
        .unwrap_err();
    assert!(matches!(err, PostcompError::Fetch(_)));
}

#[tokio::test]
async fn undecodable_bytes_are_a_fetch_error() {
    let fetcher = AssetFetcher::new(FetchConfig::default()).unwrap();
    let err = fetcher
        .fetch(&ImageSource::from_bytes(b"nope".to_vec()))
        .await
        .unwrap_err();
    assert!(matches!(err, PostcompError::Fetch(_)));
}

#[tokio::test]
async fn unreachable_host_is_a_fetch_error() {
    let fetcher = AssetFetcher::new(FetchConfig {
        timeout: Duration::from_secs(2),
    })
    .unwrap();
    let err = fetcher
        .fetch(&ImageSource::Url("http://127.0.0.1:9/bg.png".to_owned()))
        .await
        .unwrap_err();
    assert!(matches!(err, PostcompError::Fetch(_)));
}
