//! DOI lookup and existence check against a mock Crossref server.

mod integration;

use crossref_client::notify::{InMemoryNotifier, TRY_AGAIN_LATER};
use crossref_client::{Error, FailureClass, Settings};
use integration::mock_server::{unreachable_client, MockServerFixture, DOI};
use std::sync::Arc;

#[tokio::test]
async fn test_works_doi_parses_metadata() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_work(1).await;
    let client = fixture.client(Settings::default());

    let work = client.works_doi(DOI).await.expect("lookup succeeds");

    mock.assert_async().await;
    assert_eq!(work.status, "ok");
    assert_eq!(work.message.doi, DOI);
    assert_eq!(work.message.primary_title(), Some("Caching Considered Helpful"));
    assert_eq!(work.message.year(), Some(2019));
    assert!(fixture.notifier.is_empty());
}

#[tokio::test]
async fn test_works_doi_not_found_warns_once_and_fails() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_status("GET", 404, 1).await;
    let client = fixture.client(Settings::default());

    let err = client.works_doi(DOI).await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, Error::NotFound { .. }));
    assert_eq!(err.failure_class(), Some(FailureClass::NotFound));
    let warnings = fixture.notifier.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains(DOI));
    assert!(fixture.notifier.errors().is_empty());
}

#[tokio::test]
async fn test_works_doi_exists_true_on_200() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_status("HEAD", 200, 1).await;
    let client = fixture.client(Settings::default());

    assert!(client.works_doi_exists(DOI).await.unwrap());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_works_doi_exists_false_on_404_without_notice() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_status("HEAD", 404, 1).await;
    let client = fixture.client(Settings::default());

    let exists = client.works_doi_exists(DOI).await.expect("404 is not an error here");

    mock.assert_async().await;
    assert!(!exists);
    assert!(fixture.notifier.is_empty());
}

#[tokio::test]
async fn test_works_doi_exists_propagates_server_error() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_status("HEAD", 503, 1).await;
    let client = fixture.client(Settings::default());

    let err = client.works_doi_exists(DOI).await.unwrap_err();
    assert!(matches!(err, Error::Server { status: 503, .. }));
    assert_eq!(fixture.notifier.errors(), vec![TRY_AGAIN_LATER.to_string()]);
}

#[tokio::test]
async fn test_server_error_notifies_and_propagates() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_status("GET", 500, 1).await;
    let client = fixture.client(Settings::default());

    let err = client.works_doi(DOI).await.unwrap_err();

    match &err {
        Error::Server { status, uri, message } => {
            assert_eq!(*status, 500);
            assert!(uri.ends_with("/works/10.1000%2Fxyz%20123"));
            assert!(message.contains("Resource not available"));
        }
        other => panic!("expected server error, got {:?}", other),
    }
    assert_eq!(fixture.notifier.errors(), vec![TRY_AGAIN_LATER.to_string()]);
    assert!(fixture.notifier.warnings().is_empty());
}

#[tokio::test]
async fn test_other_client_error_propagates_silently() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_status("GET", 400, 1).await;
    let client = fixture.client(Settings::default());

    let err = client.works_doi(DOI).await.unwrap_err();

    assert!(matches!(err, Error::Client { status: 400, .. }));
    assert_eq!(err.failure_class(), Some(FailureClass::OtherClientFailure));
    assert!(fixture.notifier.is_empty());
}

#[tokio::test]
async fn test_connect_failure_notifies_and_propagates() {
    let notifier = Arc::new(InMemoryNotifier::default());
    let client = unreachable_client(notifier.clone());

    let err = client.works_doi(DOI).await.unwrap_err();
    assert!(matches!(err, Error::Connect { .. }));
    assert!(err.failure_class().unwrap().is_transient());

    let err = client.works_doi_exists(DOI).await.unwrap_err();
    assert!(matches!(err, Error::Connect { .. }));

    assert_eq!(notifier.errors().len(), 2);
    assert!(notifier.warnings().is_empty());
}

#[tokio::test]
async fn test_invalid_json_body_is_a_serialization_error() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .server
        .mock("GET", integration::mock_server::DOI_PATH)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;
    let client = fixture.client(Settings::default());

    let err = client.works_doi(DOI).await.unwrap_err();
    assert!(matches!(err, Error::Serialization(_)));
    assert_eq!(err.failure_class(), None);
}

#[tokio::test]
async fn test_works_doi_exists_rejects_non_2xx_status() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_status("HEAD", 300, 1).await;
    let client = fixture.client(Settings::default());

    let err = client.works_doi_exists(DOI).await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, Error::UnexpectedStatus { status: 300, .. }));
    assert_eq!(err.failure_class(), Some(FailureClass::UnexpectedStatus));
    assert!(fixture.notifier.is_empty());
}

#[tokio::test]
async fn test_works_doi_rejects_non_2xx_status_before_parsing() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_status("GET", 300, 2).await;
    let client = fixture.client(Settings::default());

    let err = client.works_doi(DOI).await.unwrap_err();
    assert!(matches!(err, Error::UnexpectedStatus { status: 300, .. }));
    assert_eq!(err.status(), Some(300));

    // Not cached either.
    assert!(client.works_doi(DOI).await.is_err());
    assert_eq!(client.cache().stats().sets, 0);
}

#[tokio::test]
async fn test_truncated_body_is_a_connect_failure() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        // Promise 100 bytes, send 5, hang up.
        let _ = socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nshort")
            .await;
        let _ = socket.shutdown().await;
    });

    let notifier = Arc::new(InMemoryNotifier::default());
    let client = crossref_client::CrossrefClient::builder()
        .base_url_override(format!("http://{}", addr))
        .notifier(notifier.clone())
        .build()
        .unwrap();

    let err = client.works_doi(DOI).await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, Error::Connect { .. }));
    assert_eq!(notifier.errors(), vec![TRY_AGAIN_LATER.to_string()]);
    assert_eq!(client.cache().stats().sets, 0);
}
