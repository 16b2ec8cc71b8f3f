//! Settings-derived query parameters, headers and transfer statistics.

mod integration;

use crossref_client::request::{TransferStats, WORKS_DOI};
use crossref_client::{RequestOptions, Settings};
use integration::mock_server::{MockServerFixture, DOI, DOI_PATH, WORK_BODY};
use mockito::Matcher;
use reqwest::Method;
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn test_email_is_sent_as_mailto() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", DOI_PATH)
        .match_query(Matcher::UrlEncoded("mailto".into(), "me@example.org".into()))
        .with_status(200)
        .with_body(WORK_BODY)
        .expect(1)
        .create_async()
        .await;
    let client = fixture.client(Settings::new().with_email("me@example.org"));

    client.works_doi(DOI).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_no_email_means_no_query_string() {
    let mut fixture = MockServerFixture::new().await;
    // Without match_query the path matcher only accepts a bare path.
    let mock = fixture.mock_work(1).await;
    let client = fixture.client(Settings::new().with_email("   "));

    client.works_doi(DOI).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_token_is_sent_as_bearer_header() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("HEAD", DOI_PATH)
        .match_header("crossref-plus-api-token", "Bearer tok")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let client = fixture.client(Settings::new().with_token("tok"));

    assert!(client.works_doi_exists(DOI).await.unwrap());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_no_token_means_no_header() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("HEAD", DOI_PATH)
        .match_header("crossref-plus-api-token", Matcher::Missing)
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let client = fixture.client(Settings::default());

    assert!(client.works_doi_exists(DOI).await.unwrap());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_email_is_sent_on_existence_check() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("HEAD", DOI_PATH)
        .match_query(Matcher::UrlEncoded("mailto".into(), "me@example.org".into()))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let client = fixture.client(Settings::new().with_email("me@example.org"));

    assert!(client.works_doi_exists(DOI).await.unwrap());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_no_email_means_no_query_string_on_existence_check() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_status("HEAD", 200, 1).await;
    let client = fixture.client(Settings::default());

    assert!(client.works_doi_exists(DOI).await.unwrap());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_token_is_sent_on_lookup() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", DOI_PATH)
        .match_header("crossref-plus-api-token", "Bearer tok")
        .with_status(200)
        .with_body(WORK_BODY)
        .expect(1)
        .create_async()
        .await;
    let client = fixture.client(Settings::new().with_token("tok"));

    client.works_doi(DOI).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_no_token_means_no_header_on_lookup() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", DOI_PATH)
        .match_header("crossref-plus-api-token", Matcher::Missing)
        .with_status(200)
        .with_body(WORK_BODY)
        .expect(1)
        .create_async()
        .await;
    let client = fixture.client(Settings::new().with_token(""));

    client.works_doi(DOI).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_extra_options_win_over_settings() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", DOI_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("mailto".into(), "override@example.org".into()),
            Matcher::UrlEncoded("select".into(), "DOI".into()),
        ]))
        .match_header("crossref-plus-api-token", "Bearer other")
        .with_status(200)
        .with_body(WORK_BODY)
        .expect(1)
        .create_async()
        .await;
    let client = fixture.client(Settings::new().with_email("me@example.org").with_token("tok"));

    let extra = RequestOptions::new()
        .with_query("mailto", "override@example.org")
        .with_query("select", "DOI")
        .with_header("crossref-plus-api-token", "Bearer other");
    let response = client
        .request(Method::GET, WORKS_DOI, &[("{doi}", DOI)], Some(extra))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_stats_callback_sees_status_and_pool() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_work(1).await;
    let client = fixture.client(Settings::default());

    let seen: Arc<Mutex<Vec<TransferStats>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let extra = RequestOptions::new().with_on_stats(Arc::new(move |stats: &TransferStats| {
        sink.lock().unwrap().push(stats.clone());
    }));

    let response = client
        .request(Method::GET, WORKS_DOI, &[("{doi}", DOI)], Some(extra))
        .await
        .unwrap();
    assert_eq!(response.header("x-api-pool"), Some("public"));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, Method::GET);
    assert_eq!(seen[0].status, Some(200));
    assert_eq!(seen[0].reason.as_deref(), Some("OK"));
    assert_eq!(seen[0].api_pool.as_deref(), Some("public"));
    assert!(seen[0].uri.ends_with(DOI_PATH));
}

#[tokio::test]
async fn test_stats_callback_not_called_on_cache_hit() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_work(1).await;
    let client = fixture.client(Settings::default());
    client.works_doi(DOI).await.unwrap();

    let calls = Arc::new(Mutex::new(0usize));
    let counter = calls.clone();
    let extra = RequestOptions::new().with_on_stats(Arc::new(move |_: &TransferStats| {
        *counter.lock().unwrap() += 1;
    }));
    client
        .request(Method::GET, WORKS_DOI, &[("{doi}", DOI)], Some(extra))
        .await
        .unwrap();

    assert_eq!(*calls.lock().unwrap(), 0);
}
