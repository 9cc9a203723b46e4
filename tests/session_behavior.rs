//! Behaviour tests for the Yahoo cookie/crumb session.

use pricechart_tests::*;

fn request() -> HistoryRequest {
    history_request("NTFL", "2020-01-01", "2020-02-01")
}

fn fixture() -> HttpResponse {
    ChartFixture::new_york()
        .row(nyse_open("2020-01-02"), 329.81, 329.81, 4_485_800)
        .response()
}

#[tokio::test]
async fn unauthorized_chart_triggers_exactly_one_session_refresh() {
    // Given: the first chart call is rejected with 401, the retry succeeds
    let (adapter, client) = scripted_adapter(
        ScriptedHttpClient::new()
            .with_yahoo_session()
            .route("/v8/finance/chart/NTFL", HttpResponse::new(401, "Unauthorized"))
            .route("/v8/finance/chart/NTFL", fixture()),
    );

    // When
    let series = adapter.history(request()).await.expect("history after refresh");

    // Then: one extra crumb fetch and one re-request carrying the new crumb
    assert_eq!(series.len(), 1);
    assert_eq!(client.count("getcrumb"), 2);
    assert_eq!(client.count("/v8/finance/chart/NTFL"), 2);

    let charts: Vec<_> = client
        .requests()
        .into_iter()
        .filter(|request| request.url.contains("/v8/finance/chart/"))
        .collect();
    assert!(charts[0].url.ends_with("&crumb=crumb-1"));
    assert!(charts[1].url.ends_with("&crumb=crumb-2"));
}

#[tokio::test]
async fn persistent_rate_limit_is_reported_after_one_refresh() {
    // Given: every chart call answers 429
    let (adapter, client) = scripted_adapter(
        ScriptedHttpClient::new()
            .with_yahoo_session()
            .route("/v8/finance/chart/NTFL", HttpResponse::new(429, "Too Many Requests")),
    );

    // When
    let error = adapter.history(request()).await.expect_err("rate limited");

    // Then: no retry loop, the caller sees a rate-limit error
    assert_eq!(error.kind(), SourceErrorKind::RateLimited);
    assert_eq!(client.count("/v8/finance/chart/NTFL"), 2);
}

#[tokio::test]
async fn crumb_is_reused_across_requests() {
    // Given: a healthy session
    let (adapter, client) = scripted_adapter(
        ScriptedHttpClient::new()
            .with_yahoo_session()
            .route("/v8/finance/chart/NTFL", fixture()),
    );

    // When: two histories are fetched
    adapter.history(request()).await.expect("first");
    adapter.history(request()).await.expect("second");

    // Then: the session was established once
    assert_eq!(client.count("fc.yahoo.com"), 1);
    assert_eq!(client.count("getcrumb"), 1);
    assert_eq!(client.count("/v8/finance/chart/NTFL"), 2);
}

#[tokio::test]
async fn session_requests_carry_referer_and_cookie_override() {
    // Given: an explicit cookie
    let client = std::sync::Arc::new(
        ScriptedHttpClient::new()
            .with_yahoo_session()
            .route("/v8/finance/chart/NTFL", fixture()),
    );
    let adapter = YahooAdapter::with_http_client(
        client.clone(),
        HttpAuth::Cookie(String::from("A1=session")),
    );

    // When
    adapter.history(request()).await.expect("history");

    // Then: every request is sent with the cookie and a Yahoo referer
    let requests = client.requests();
    assert!(!requests.is_empty());
    for request in requests {
        assert_eq!(request.headers.get("cookie").map(String::as_str), Some("A1=session"));
        assert!(request.headers.contains_key("referer"));
    }
}

#[tokio::test]
async fn missing_crumb_makes_the_source_unavailable() {
    // Given: both crumb endpoints return an HTML page
    let (adapter, client) = scripted_adapter(
        ScriptedHttpClient::new()
            .route("fc.yahoo.com", HttpResponse::new(404, "<html></html>"))
            .route("getcrumb", HttpResponse::ok_json("<html>consent</html>")),
    );

    // When
    let error = adapter.history(request()).await.expect_err("no crumb");

    // Then: both endpoints were tried and the chart was never requested
    assert_eq!(error.kind(), SourceErrorKind::Unavailable);
    assert_eq!(client.count("getcrumb"), 2);
    assert_eq!(client.count("/v8/finance/chart/"), 0);
}
