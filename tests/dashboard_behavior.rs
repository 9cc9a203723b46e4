//! Behaviour tests for the rendered dashboard page.

use pricechart_tests::*;
use pricechart_web::Dashboard;

async fn demo_series(config: &DashboardConfig) -> PriceSeries {
    YahooAdapter::default()
        .history(config.request().expect("valid config"))
        .await
        .expect("offline history")
}

#[tokio::test]
async fn rendering_twice_produces_identical_pages() {
    // Given: the default dashboard over offline data
    let config = DashboardConfig::default();
    let series = demo_series(&config).await;

    // When: the page is built and rendered twice
    let first = Dashboard::from_series(&config, &series).render_html();
    let second = Dashboard::from_series(&config, &series).render_html();

    // Then: the output is byte-identical
    assert_eq!(first, second);
}

#[tokio::test]
async fn page_shows_intro_then_close_then_volume() {
    // Given
    let config = DashboardConfig::default();
    let series = demo_series(&config).await;

    // When
    let html = Dashboard::from_series(&config, &series).render_html();

    // Then: title block, then the two charts in order
    let title = html.find("<h1>Simple Stock Price App</h1>").expect("title");
    let description = html
        .find("<p>Shown are the stock closing price and volume of Netflix!</p>")
        .expect("description");
    let close = html.find("<h2>Close</h2>").expect("close chart");
    let volume = html.find("<h2>Volume</h2>").expect("volume chart");
    assert!(title < description && description < close && close < volume);
    assert_eq!(html.matches("<polyline").count(), 2);
}

#[tokio::test]
async fn page_is_self_contained_and_escaped() {
    // Given: page text with markup characters
    let config = DashboardConfig {
        title: String::from("<Prices> & more"),
        description: String::from("Closing \"price\""),
        start_date: day("2020-01-01"),
        end_date: day("2020-03-01"),
        ..DashboardConfig::default()
    };
    let series = demo_series(&config).await;

    // When
    let html = Dashboard::from_series(&config, &series).render_html();

    // Then: no external assets and no raw markup from the text
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<style>"));
    assert!(!html.contains("<script"));
    assert!(!html.contains("<link"));
    assert!(html.contains("<h1>&lt;Prices&gt; &amp; more</h1>"));
    assert!(html.contains("<p>Closing &quot;price&quot;</p>"));
}
