//! Integration tests for the HTTP strategy and the extraction fallback.
//!
//! Uses `wiremock` to stand up a local HTTP server per test. The heavy
//! strategy is either a canned in-process fake or the disabled browser, so
//! no Chromium is needed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pricewatch_core::{ProductRef, Store};
use pricewatch_scraper::user_agent::{ACCEPT_LANGUAGE, REFERER, USER_AGENTS};
use pricewatch_scraper::{
    BrowserStrategy, DisabledBrowser, Extractor, FetchError, FetchStrategy, HttpStrategy,
    StrategyKind,
};

const PRODUCT_PAGE: &str = r#"<!doctype html>
<html><head>
  <meta property="og:title" content="Mouse Logitech G203 Lightsync">
  <meta property="product:price:amount" content="25.999,50">
</head><body>
  <h1>Mouse Logitech G203</h1>
</body></html>"#;

const RENDERED_PAGE: &str = r#"<html><body>
  <h1>Teclado HyperX Alloy Origins</h1>
  <div class="product-price">$ 89.999</div>
  <p>Sin stock</p>
</body></html>"#;

/// Heavy strategy stand-in returning [`RENDERED_PAGE`].
struct CannedRender {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl FetchStrategy for CannedRender {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Heavy
    }

    async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RENDERED_PAGE.to_owned())
    }
}

fn http() -> Box<dyn FetchStrategy> {
    Box::new(HttpStrategy::new(Duration::from_secs(5)))
}

fn product(url: String) -> ProductRef {
    ProductRef {
        id: 7,
        name: "Periférico".to_owned(),
        url,
        store: None,
        active: true,
    }
}

// ---------------------------------------------------------------------------
// HttpStrategy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn http_strategy_sends_browser_like_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/item"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PRODUCT_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let html = HttpStrategy::new(Duration::from_secs(5))
        .fetch(&format!("{}/item", server.uri()))
        .await
        .expect("fetch should succeed");
    assert!(html.contains("Logitech"));

    let requests = server.received_requests().await.expect("recording enabled");
    let headers = &requests[0].headers;
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned()
    };
    assert!(USER_AGENTS.contains(&header("user-agent").as_str()));
    assert_eq!(header("accept-language"), ACCEPT_LANGUAGE);
    assert_eq!(header("referer"), REFERER);
    assert!(header("accept").starts_with("text/html"));
}

#[tokio::test]
async fn http_strategy_rejects_non_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = HttpStrategy::new(Duration::from_secs(5))
        .fetch(&format!("{}/blocked", server.uri()))
        .await
        .expect_err("403 must fail");
    assert!(
        matches!(err, FetchError::UnexpectedStatus { status: 403, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn http_strategy_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(PRODUCT_PAGE)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = HttpStrategy::new(Duration::from_millis(200))
        .fetch(&server.uri())
        .await
        .expect_err("slow response must time out");
    assert!(matches!(err, FetchError::Timeout { .. }), "got {err:?}");
}

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lightweight_page_is_extracted_without_rendering() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mouse"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PRODUCT_PAGE))
        .mount(&server)
        .await;

    let renders = Arc::new(AtomicUsize::new(0));
    let extractor = Extractor::new(
        http(),
        Box::new(CannedRender {
            calls: Arc::clone(&renders),
        }),
        Duration::ZERO,
    );
    let result = extractor
        .extract(&product(format!("{}/mouse", server.uri())))
        .await;

    assert_eq!(result.store, Store::Generic);
    assert_eq!(result.name, "Mouse Logitech G203 Lightsync");
    assert_eq!(result.price, Some(25_999.5));
    assert_eq!(result.currency, "ARS");
    assert!(result.in_stock);
    assert!(result.error.is_none());
    assert_eq!(renders.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn server_error_falls_back_to_render() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let renders = Arc::new(AtomicUsize::new(0));
    let extractor = Extractor::new(
        http(),
        Box::new(CannedRender {
            calls: Arc::clone(&renders),
        }),
        Duration::ZERO,
    );
    let result = extractor
        .extract(&product(format!("{}/teclado", server.uri())))
        .await;

    assert_eq!(result.name, "Teclado HyperX Alloy Origins");
    assert_eq!(result.price, Some(89_999.0));
    assert!(!result.in_stock);
    assert!(result.error.is_none());
    assert_eq!(renders.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn not_found_with_browser_disabled_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let extractor = Extractor::new(
        http(),
        Box::new(BrowserStrategy::new(
            DisabledBrowser,
            Duration::from_secs(5),
            Duration::ZERO,
        )),
        Duration::ZERO,
    );
    let result = extractor
        .extract(&product(format!("{}/gone", server.uri())))
        .await;

    assert!(result.price.is_none());
    assert!(!result.in_stock);
    assert_eq!(result.name, "Periférico");
    let error = result.error.expect("failure must carry an error");
    assert!(error.contains("404"), "{error}");
    assert!(error.contains("disabled"), "{error}");
}
