mod helpers;

use std::time::Duration;

use sitegrade::fetcher::{FetchError, FetchRoute, Fetcher, FetcherSettings, normalize_url};
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

use helpers::{direct_fetcher, fetcher};

fn target(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{route}", server.uri())).unwrap()
}

#[tokio::test]
async fn test_fetch_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(
                    "<html><head><title>Test</title></head><body>Hello World</body></html>"
                        .as_bytes(),
                )
                .insert_header("Content-Type", "text/html; charset=utf-8"),
        )
        .mount(&mock_server)
        .await;

    let url = target(&mock_server, "/test");
    let page = direct_fetcher()
        .fetch(&url, &CancellationToken::new())
        .await
        .unwrap();

    assert!(page.status.is_success());
    assert!(page.markup.contains("Hello World"));
    assert_eq!(page.url, url);
    assert_eq!(page.encoding, "UTF-8");
}

#[tokio::test]
async fn test_fetch_through_relay_encodes_target() {
    let mock_server = MockServer::start().await;
    let page_url = "https://example.com/blog?id=7&lang=en";

    Mock::given(method("GET"))
        .and(path("/raw"))
        .and(query_param("url", page_url))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>Relayed</body></html>")
                .insert_header("Content-Type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let relay = FetchRoute::from_prefix(Some(&format!("{}/raw?url=", mock_server.uri())));
    let fetcher = fetcher(relay, Duration::from_secs(5));
    let page = fetcher
        .fetch(&Url::parse(page_url).unwrap(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(page.markup.contains("Relayed"));
    // The page keeps the target URL, not the relay address
    assert_eq!(page.url.as_str(), page_url);
}

#[tokio::test]
async fn test_fetch_direct_ignores_relay() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>direct</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Relay points nowhere useful; fetch_direct must not use it
    let relay = FetchRoute::from_prefix(Some("http://192.0.2.1:9/raw?url="));
    let fetcher = fetcher(relay, Duration::from_secs(5));
    let page = fetcher
        .fetch_direct(&target(&mock_server, "/direct"), &CancellationToken::new())
        .await
        .unwrap();

    assert!(page.markup.contains("direct"));
}

#[tokio::test]
async fn test_fetch_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notfound"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let result = direct_fetcher()
        .fetch(&target(&mock_server, "/notfound"), &CancellationToken::new())
        .await;

    match result {
        Err(FetchError::Http {
            status,
            status_text,
        }) => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(status_text, "Not Found");
        }
        other => panic!("Expected HTTP 404 error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_500_is_single_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = direct_fetcher()
        .fetch(&target(&mock_server, "/error"), &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(FetchError::Http { status, .. }) if status.as_u16() == 500));
}

#[tokio::test]
async fn test_fetch_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let fetcher = fetcher(FetchRoute::Direct, Duration::from_secs(1));
    let result = fetcher
        .fetch(&target(&mock_server, "/slow"), &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(FetchError::Timeout(1))));
}

#[tokio::test]
async fn test_fetch_cancelled_mid_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let result = direct_fetcher()
        .fetch(&target(&mock_server, "/slow"), &cancel)
        .await;
    assert!(matches!(result, Err(FetchError::Cancelled)));
}

#[tokio::test]
async fn test_fetch_measures_load_time() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/delayed"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&mock_server)
        .await;

    let page = direct_fetcher()
        .fetch(&target(&mock_server, "/delayed"), &CancellationToken::new())
        .await
        .unwrap();
    assert!(page.load_time_ms >= 200, "load time {}", page.load_time_ms);
}

#[tokio::test]
async fn test_fetch_gzip_compression() {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let original_content =
        "<html><head><title>Compressed</title></head><body>This content is gzipped!</body></html>";

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(original_content.as_bytes()).unwrap();
    let compressed_data = encoder.finish().unwrap();

    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gzipped"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(compressed_data)
                .insert_header("Content-Type", "text/html; charset=utf-8")
                .insert_header("Content-Encoding", "gzip"),
        )
        .mount(&mock_server)
        .await;

    let page = direct_fetcher()
        .fetch(&target(&mock_server, "/gzipped"), &CancellationToken::new())
        .await
        .unwrap();

    assert!(page.markup.contains("This content is gzipped!"));
}

#[tokio::test]
async fn test_fetch_decodes_declared_charset() {
    let mock_server = MockServer::start().await;

    // "Café" in ISO-8859-1
    let body = b"<html><head><title>Caf\xe9</title></head></html>".to_vec();
    Mock::given(method("GET"))
        .and(path("/latin1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body)
                .insert_header("Content-Type", "text/html; charset=iso-8859-1"),
        )
        .mount(&mock_server)
        .await;

    let page = direct_fetcher()
        .fetch(&target(&mock_server, "/latin1"), &CancellationToken::new())
        .await
        .unwrap();

    assert!(page.markup.contains("Café"));
    assert_eq!(page.encoding, "windows-1252");
}

#[tokio::test]
async fn test_fetch_body_too_large() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("x".repeat(4096))
                .insert_header("Content-Type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(FetcherSettings {
        max_body_bytes: 1024,
        ..FetcherSettings::default()
    })
    .unwrap();
    let result = fetcher
        .fetch(&target(&mock_server, "/large"), &CancellationToken::new())
        .await;

    match result {
        Err(FetchError::BodyTooLarge(size)) => assert_eq!(size, 4096),
        other => panic!("Expected BodyTooLarge error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_decoded_body_too_large() {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    // Compresses to a few hundred bytes; decoding drops Content-Length
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all("x".repeat(512 * 1024).as_bytes()).unwrap();
    let compressed = encoder.finish().unwrap();
    assert!(compressed.len() < 1024);

    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bomb"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(compressed)
                .insert_header("Content-Type", "text/html")
                .insert_header("Content-Encoding", "gzip"),
        )
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::new(FetcherSettings {
        max_body_bytes: 1024,
        ..FetcherSettings::default()
    })
    .unwrap();
    let result = fetcher
        .fetch(&target(&mock_server, "/bomb"), &CancellationToken::new())
        .await;

    match result {
        Err(FetchError::BodyTooLarge(size)) => {
            assert!(size > 1024);
            assert!(size < 512 * 1024, "read {size} bytes before stopping");
        }
        other => panic!("Expected BodyTooLarge error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_connection_refused_is_network_error() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let url = Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap();
    let result = direct_fetcher().fetch(&url, &CancellationToken::new()).await;
    assert!(matches!(result, Err(FetchError::Network(_))));
}

#[test]
fn test_normalize_invalid_url() {
    assert!(matches!(normalize_url(""), Err(FetchError::InvalidUrl(_))));
    assert!(matches!(
        normalize_url("http://"),
        Err(FetchError::InvalidUrl(_))
    ));
    assert_eq!(
        normalize_url("example.com").unwrap().as_str(),
        "https://example.com/"
    );
}
