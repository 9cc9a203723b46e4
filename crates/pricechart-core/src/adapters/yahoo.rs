use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use serde::Deserialize;
use time::{Date, Weekday};
use tracing::{debug, info, warn};

use crate::data_source::{HistoryRequest, PriceSource, SourceError, SourceErrorKind};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient};
use crate::{Interval, PriceRecord, PriceSeries, Symbol, TradingDay};

const CHART_BASE: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_ENDPOINTS: [&str; 2] = [
    "https://query1.finance.yahoo.com/v1/test/getcrumb",
    "https://query2.finance.yahoo.com/v1/test/getcrumb",
];
const REFERER: &str = "https://finance.yahoo.com/";
const REQUEST_TIMEOUT_MS: u64 = 10_000;
const COOKIE_ENV: &str = "YAHOO_COOKIE";
const WINDOW_PADDING_SECS: i64 = 86_400;

// ============================================================================
// Yahoo Auth Manager - cookie/crumb session
// ============================================================================

/// Manages the Yahoo Finance cookie/crumb session.
///
/// Yahoo's unofficial API requires:
/// 1. A session cookie from fc.yahoo.com (kept by the transport's cookie jar)
/// 2. A crumb token from /v1/test/getcrumb, sent as a query parameter
#[derive(Debug)]
pub struct YahooAuthManager {
    cached: Mutex<Option<CachedCrumb>>,
    crumb_ttl: Duration,
}

#[derive(Debug, Clone)]
struct CachedCrumb {
    crumb: String,
    fetched_at: Instant,
}

impl Default for YahooAuthManager {
    fn default() -> Self {
        Self {
            cached: Mutex::new(None),
            crumb_ttl: Duration::from_secs(3600),
        }
    }
}

impl YahooAuthManager {
    fn lock(&self) -> MutexGuard<'_, Option<CachedCrumb>> {
        self.cached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn cached_crumb(&self) -> Option<String> {
        self.lock()
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.crumb_ttl)
            .map(|cached| cached.crumb.clone())
    }

    /// Current crumb, refreshing the session when missing or expired.
    pub async fn crumb(
        &self,
        http_client: &Arc<dyn HttpClient>,
        auth: &HttpAuth,
    ) -> Result<String, SourceError> {
        if let Some(crumb) = self.cached_crumb() {
            return Ok(crumb);
        }

        let crumb = self.refresh(http_client, auth).await?;
        *self.lock() = Some(CachedCrumb {
            crumb: crumb.clone(),
            fetched_at: Instant::now(),
        });
        Ok(crumb)
    }

    /// Drop the cached crumb; the next call re-authenticates.
    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    async fn refresh(
        &self,
        http_client: &Arc<dyn HttpClient>,
        auth: &HttpAuth,
    ) -> Result<String, SourceError> {
        debug!("refreshing yahoo session cookie and crumb");

        // fc.yahoo.com answers 404 but still sets the session cookie.
        let cookie_request = HttpRequest::get(COOKIE_URL)
            .with_header("referer", REFERER)
            .with_auth(auth)
            .with_timeout_ms(REQUEST_TIMEOUT_MS);
        http_client.execute(cookie_request).await.map_err(|e| {
            SourceError::unavailable(format!("failed to fetch yahoo cookie: {}", e.message()))
        })?;

        for endpoint in CRUMB_ENDPOINTS {
            let request = HttpRequest::get(endpoint)
                .with_header("referer", REFERER)
                .with_auth(auth)
                .with_timeout_ms(REQUEST_TIMEOUT_MS);

            match http_client.execute(request).await {
                Ok(response) if response.is_success() => {
                    if let Some(crumb) = parse_crumb(&response.body)? {
                        return Ok(crumb);
                    }
                }
                Ok(response) if response.status == 429 => {
                    return Err(SourceError::rate_limited(
                        "yahoo rate limited while fetching crumb",
                    ));
                }
                Ok(response) => {
                    debug!(endpoint, status = response.status, "crumb endpoint rejected request");
                }
                Err(e) => {
                    debug!(endpoint, error = e.message(), "crumb endpoint unreachable");
                }
            }
        }

        Err(SourceError::unavailable(
            "failed to fetch yahoo crumb from all endpoints",
        ))
    }

    fn env_auth() -> Option<HttpAuth> {
        std::env::var(COOKIE_ENV).ok().map(HttpAuth::Cookie)
    }
}

/// Validate a crumb body: short, no whitespace, not an HTML error page.
fn parse_crumb(body: &str) -> Result<Option<String>, SourceError> {
    let body = body.trim();

    if body.to_ascii_lowercase().contains("too many requests") {
        return Err(SourceError::rate_limited(
            "yahoo rate limited while fetching crumb",
        ));
    }
    if body.is_empty() || body.len() >= 100 || body.contains(' ') || body.contains('<') {
        return Ok(None);
    }
    Ok(Some(body.to_owned()))
}

// ============================================================================
// Yahoo Adapter
// ============================================================================

/// Yahoo price-history adapter supporting both real API calls and offline mode.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    auth_manager: Arc<YahooAuthManager>,
    use_real_api: bool,
}

impl Default for YahooAdapter {
    fn default() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            auth: HttpAuth::None,
            auth_manager: Arc::new(YahooAuthManager::default()),
            use_real_api: false,
        }
    }
}

impl YahooAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>, auth: HttpAuth) -> Self {
        let use_real_api = !http_client.is_mock();
        Self {
            http_client,
            auth,
            use_real_api,
            ..Self::default()
        }
    }

    /// Adapter over reqwest, honouring a `YAHOO_COOKIE` override.
    pub fn with_real_client() -> Self {
        let auth = YahooAuthManager::env_auth().unwrap_or(HttpAuth::None);
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), auth)
    }

    pub fn is_real_client(&self) -> bool {
        self.use_real_api
    }

    async fn fetch_real_history(&self, req: &HistoryRequest) -> Result<PriceSeries, SourceError> {
        let crumb = self.auth_manager.crumb(&self.http_client, &self.auth).await?;
        let mut response = self.fetch_chart(req, &crumb).await?;

        if response.status == 401 || response.status == 429 {
            warn!(
                symbol = %req.symbol,
                status = response.status,
                "yahoo rejected crumb; refreshing session once"
            );
            self.auth_manager.invalidate();
            let crumb = self.auth_manager.crumb(&self.http_client, &self.auth).await?;
            response = self.fetch_chart(req, &crumb).await?;

            if response.status == 429 {
                return Err(SourceError::rate_limited(
                    "yahoo returned status 429 after session refresh",
                ));
            }
        }

        if response.status == 404 {
            return Err(match parse_chart(req, &response.body) {
                Err(error) if error.kind() == SourceErrorKind::UnknownSymbol => error,
                _ => SourceError::unknown_symbol(&req.symbol, "status 404"),
            });
        }

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "yahoo returned status {}",
                response.status
            )));
        }

        parse_chart(req, &response.body)
    }

    async fn fetch_chart(
        &self,
        req: &HistoryRequest,
        crumb: &str,
    ) -> Result<HttpResponse, SourceError> {
        let endpoint = chart_endpoint(req);
        debug!(url = %endpoint, "requesting yahoo chart");

        let request = HttpRequest::get(format!(
            "{endpoint}&crumb={}",
            urlencoding::encode(crumb)
        ))
        .with_header("referer", REFERER)
        .with_auth(&self.auth)
        .with_timeout_ms(REQUEST_TIMEOUT_MS);

        self.http_client.execute(request).await.map_err(|e| {
            if e.retryable() {
                SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
            } else {
                SourceError::internal(format!("yahoo transport error: {}", e.message()))
            }
        })
    }

    fn fake_history(&self, req: &HistoryRequest) -> Result<PriceSeries, SourceError> {
        let seed = symbol_seed(&req.symbol);
        let base = 20.0 + (seed % 80) as f64;
        let mut records = Vec::new();
        let mut day = req.range.start().into_inner();
        let end = req.range.end().into_inner();
        let mut index = 0_u64;
        let mut weekdays = 0_u64;
        let mut last_period = None;

        while day < end {
            let is_weekday = !matches!(day.weekday(), Weekday::Saturday | Weekday::Sunday);
            let opens_bar = is_weekday && {
                let period = bar_period(req.interval, day, weekdays);
                weekdays += 1;
                last_period.replace(period) != Some(period)
            };

            if opens_bar {
                let t = index as f64;
                let mid = base * (1.0 + 0.25 * (t / 40.0).sin()) + t * 0.05;
                let (open, close) = if index % 2 == 0 {
                    (mid * 0.995, mid * 1.005)
                } else {
                    (mid * 1.004, mid * 0.996)
                };
                let volume = 1_000_000 + (seed.wrapping_add(index * 7_919)) % 500_000;

                let record = PriceRecord::new(
                    TradingDay::new(day),
                    open,
                    open.max(close) * 1.01,
                    open.min(close) * 0.99,
                    close,
                    volume,
                )
                .map_err(|e| SourceError::internal(e.to_string()))?;
                records.push(record);
                index += 1;
            }

            day = match day.next_day() {
                Some(next) => next,
                None => break,
            };
        }

        Ok(PriceSeries::new(req.symbol.clone(), req.interval, req.range, records)
            .with_currency(Some(String::from("USD"))))
    }
}

impl PriceSource for YahooAdapter {
    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            info!(symbol = %req.symbol, range = %req.range, interval = %req.interval, "fetching price history");

            if req.range.is_empty() {
                return Ok(PriceSeries::new(
                    req.symbol.clone(),
                    req.interval,
                    req.range,
                    Vec::new(),
                ));
            }

            let series = if self.is_real_client() {
                self.fetch_real_history(&req).await?
            } else {
                // Deterministic synthetic data for offline runs and tests
                self.fake_history(&req)?
            };

            info!(symbol = %req.symbol, rows = series.len(), "price history fetched");
            Ok(series)
        })
    }
}

/// Chart URL without the crumb parameter.
///
/// The window is padded by a day on each side so sessions east or west of UTC
/// whose local date is inside the range are returned; rows are trimmed back to
/// the exchange-local range after parsing.
fn chart_endpoint(req: &HistoryRequest) -> String {
    format!(
        "{CHART_BASE}/{}?period1={}&period2={}&interval={}&events=div%2Csplit&includeAdjustedClose=true",
        urlencoding::encode(req.symbol.as_str()),
        req.range.start().unix_midnight_utc() - WINDOW_PADDING_SECS,
        req.range.end().unix_midnight_utc() + WINDOW_PADDING_SECS,
        req.interval.as_str(),
    )
}

// Yahoo Finance chart response structures
#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: YahooChartMeta,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: YahooChartIndicators,
    #[serde(default)]
    events: YahooChartEvents,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartMeta {
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    gmtoffset: i64,
    #[serde(rename = "exchangeTimezoneName", default)]
    exchange_timezone_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
    #[serde(default)]
    adjclose: Vec<YahooAdjClose>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartEvents {
    #[serde(default)]
    dividends: BTreeMap<String, YahooDividend>,
    #[serde(default)]
    splits: BTreeMap<String, YahooSplit>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooDividend {
    amount: f64,
    date: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooSplit {
    numerator: f64,
    denominator: f64,
    date: i64,
}

/// Map a chart payload onto a [`PriceSeries`].
fn parse_chart(req: &HistoryRequest, body: &str) -> Result<PriceSeries, SourceError> {
    let response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = response.chart.error {
        let detail = format!("{}: {}", error.code, error.description);
        return Err(if error.code.eq_ignore_ascii_case("not found") {
            SourceError::unknown_symbol(&req.symbol, detail)
        } else {
            SourceError::unavailable(format!("yahoo chart API error: {detail}"))
        });
    }

    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| SourceError::internal("no chart data in response"))?;

    let currency = result.meta.currency.clone();
    let gmt_offset = result.meta.gmtoffset;
    debug!(
        timezone = result.meta.exchange_timezone_name.as_deref().unwrap_or("UTC"),
        gmt_offset,
        "yahoo chart meta"
    );

    let Some(timestamps) = result.timestamp else {
        return Ok(
            PriceSeries::new(req.symbol.clone(), req.interval, req.range, Vec::new())
                .with_currency(currency),
        );
    };

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|series| series.adjclose)
        .unwrap_or_default();

    let dividends = event_days(result.events.dividends.values(), gmt_offset, |d| {
        (d.date, d.amount)
    });
    let splits = event_days(result.events.splits.values(), gmt_offset, |s| {
        let ratio = if s.denominator > 0.0 {
            s.numerator / s.denominator
        } else {
            0.0
        };
        (s.date, ratio)
    });

    let mut records = Vec::with_capacity(timestamps.len());
    let mut incomplete = 0_usize;

    for (i, &ts) in timestamps.iter().enumerate() {
        let date = TradingDay::from_unix_timestamp(ts, gmt_offset)
            .map_err(|e| SourceError::internal(format!("invalid timestamp: {e}")))?;

        let ohlc = (
            value_at(&quote.open, i),
            value_at(&quote.high, i),
            value_at(&quote.low, i),
            value_at(&quote.close, i),
        );
        let (Some(mut open), Some(mut high), Some(mut low), Some(mut close)) = ohlc else {
            incomplete += 1;
            continue;
        };

        if req.auto_adjust && close > 0.0 {
            if let Some(adjusted) = value_at(&adjclose, i) {
                let ratio = adjusted / close;
                open *= ratio;
                high *= ratio;
                low *= ratio;
                close = adjusted;
            }
        }

        let volume = quote
            .volume
            .get(i)
            .copied()
            .flatten()
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(0);

        let record = PriceRecord::new(date, open, high, low, close, volume).and_then(|record| {
            let record = match dividends.get(&date) {
                Some(amount) => record.with_dividend(*amount)?,
                None => record,
            };
            match splits.get(&date) {
                Some(ratio) => record.with_split(*ratio),
                None => Ok(record),
            }
        });

        match record {
            Ok(record) => records.push(record),
            Err(e) => warn!(symbol = %req.symbol, %date, error = %e, "skipping invalid price row"),
        }
    }

    if incomplete > 0 {
        debug!(symbol = %req.symbol, rows = incomplete, "dropped rows with missing prices");
    }

    Ok(PriceSeries::new(req.symbol.clone(), req.interval, req.range, records).with_currency(currency))
}

/// Bucket a weekday into the bar it opens; one offline row per bucket.
fn bar_period(interval: Interval, day: Date, weekday_index: u64) -> (i64, i64) {
    let year = i64::from(day.year());
    let month = i64::from(u8::from(day.month()));
    match interval {
        Interval::OneDay => (i64::from(day.to_julian_day()), 0),
        Interval::FiveDays => ((weekday_index / 5) as i64, 0),
        Interval::OneWeek => {
            let (iso_year, week, _) = day.to_iso_week_date();
            (i64::from(iso_year), i64::from(week))
        }
        Interval::OneMonth => (year, month),
        Interval::ThreeMonths => (year, (month - 1) / 3),
    }
}

fn value_at(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

fn event_days<'a, T: 'a>(
    events: impl Iterator<Item = &'a T>,
    gmt_offset: i64,
    extract: impl Fn(&T) -> (i64, f64),
) -> BTreeMap<TradingDay, f64> {
    events
        .filter_map(|event| {
            let (ts, value) = extract(event);
            TradingDay::from_unix_timestamp(ts, gmt_offset)
                .ok()
                .map(|day| (day, value))
        })
        .collect()
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol
        .as_str()
        .bytes()
        .fold(0_u64, |acc, value| acc.wrapping_mul(31).wrapping_add(u64::from(value)))
}
