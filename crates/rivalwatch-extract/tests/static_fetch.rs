use std::time::Duration;

use mockito::Server;
use rivalwatch_extract::{ContentExtractor, ExtractError, ExtractionMode, ExtractorConfig};

const PAGE: &str = r#"<!doctype html>
<html>
  <head><title>Acme Legal | Tax disputes</title></head>
  <body>
    <nav><p>Home | About | Contact us for a free consultation today, no strings attached</p></nav>
    <main>
      <h1>Tax disputes, resolved</h1>
      <p>Fast.</p>
      <p>We represent companies before the tax authority and in court, with fixed fees agreed upfront.</p>
    </main>
  </body>
</html>"#;

fn extractor(user_agent: &str) -> ContentExtractor {
    ContentExtractor::new(ExtractorConfig {
        mode: ExtractionMode::Static,
        timeout: Duration::from_secs(5),
        user_agent: user_agent.to_string(),
        ..ExtractorConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_static_extraction() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/services")
        .match_header("user-agent", "rivalwatch-test/1.0")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(PAGE)
        .expect(1)
        .create_async()
        .await;

    let url = format!("{}/services", server.url());
    let page = extractor("rivalwatch-test/1.0").extract(&url).await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.title.as_deref(), Some("Acme Legal | Tax disputes"));
    assert_eq!(page.heading.as_deref(), Some("Tax disputes, resolved"));
    assert_eq!(
        page.excerpt.as_deref(),
        Some("We represent companies before the tax authority and in court, with fixed fees agreed upfront.")
    );
    assert_eq!(page.source_url, url);
}

#[tokio::test]
async fn test_redirects_are_followed() {
    let mut server = Server::new_async().await;

    let _old = server
        .mock("GET", "/old")
        .with_status(301)
        .with_header("location", "/new")
        .create_async()
        .await;
    let _new = server
        .mock("GET", "/new")
        .with_status(200)
        .with_body(PAGE)
        .create_async()
        .await;

    let page = extractor("ua").extract(&format!("{}/old", server.url())).await.unwrap();
    assert_eq!(page.heading.as_deref(), Some("Tax disputes, resolved"));
}

#[tokio::test]
async fn test_non_success_status_is_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/missing")
        .with_status(404)
        .with_body("<html><title>Not found</title></html>")
        .create_async()
        .await;

    let err = extractor("ua")
        .extract(&format!("{}/missing", server.url()))
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractError::HttpStatus(404)));
}

#[tokio::test]
async fn test_connection_failure_is_error() {
    let err = extractor("ua").extract("http://127.0.0.1:1/").await.unwrap_err();
    assert!(matches!(err, ExtractError::Request(_)));
}

#[tokio::test]
async fn test_sparse_page_is_not_an_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_body("<html><head><title>Coming soon</title></head><body><p>Soon.</p></body></html>")
        .create_async()
        .await;

    let page = extractor("ua").extract(&server.url()).await.unwrap();
    assert_eq!(page.title.as_deref(), Some("Coming soon"));
    assert!(page.heading.is_none());
    assert!(page.excerpt.is_none());
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Accept connections and never answer
    let _hold = tokio::spawn(async move {
        let mut sockets = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            sockets.push(socket);
        }
    });

    let extractor = ContentExtractor::new(ExtractorConfig {
        mode: ExtractionMode::Static,
        timeout: Duration::from_secs(1),
        ..ExtractorConfig::default()
    })
    .unwrap();

    let err = extractor
        .extract(&format!("http://{}/slow", addr))
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractError::Timeout(1)));
}
