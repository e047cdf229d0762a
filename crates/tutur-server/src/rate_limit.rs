use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use axum::Json;
use axum::body::Body;
use axum::http::{HeaderName, Request, Response, StatusCode};
use axum::response::IntoResponse;
use dashmap::DashMap;
use serde_json::json;
use tower::{Layer, Service};
use tracing::{debug, warn};

const LOG_INTERVAL: Duration = Duration::from_secs(60);
const PRUNE_INTERVAL: Duration = Duration::from_secs(60);
/// Tracked clients before a prune runs ahead of schedule.
const MAX_TRACKED_CLIENTS: usize = 100_000;

/// Token bucket refilled continuously at `rate` tokens/s up to `burst`.
#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn full(burst: f64, now: Instant) -> Self {
        Self {
            tokens: burst,
            last_refill: now,
        }
    }

    fn try_take(&mut self, now: Instant, rate: f64, burst: f64) -> bool {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        if elapsed > 0.0 {
            self.tokens = (self.tokens + elapsed * rate).min(burst);
            self.last_refill = now;
        }
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// A bucket that has refilled to `burst` is indistinguishable from a new
    /// one and can be dropped.
    fn is_full_at(&self, now: Instant, rate: f64, burst: f64) -> bool {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens + elapsed * rate >= burst
    }
}

#[derive(Clone)]
struct SharedState {
    buckets: Arc<DashMap<String, TokenBucket>>,
    dropped_since_log: Arc<AtomicU64>,
    last_log: Arc<Mutex<Instant>>,
    last_prune: Arc<Mutex<Instant>>,
}

/// Per-client rate limiting keyed on a request header.
///
/// Requests without the header pass through; behind a proxy that always sets
/// it, every client is limited. Buckets are shared by every service the layer
/// wraps, so a client's budget covers all routes.
#[derive(Clone)]
pub struct RateLimiterLayer {
    state: SharedState,
    rate_per_sec: f64,
    burst: f64,
    client_header: HeaderName,
}

impl RateLimiterLayer {
    pub fn new(rate_per_sec: u32, burst: u32, client_header: HeaderName) -> Self {
        Self {
            state: SharedState {
                buckets: Arc::new(DashMap::new()),
                dropped_since_log: Arc::new(AtomicU64::new(0)),
                last_log: Arc::new(Mutex::new(Instant::now())),
                last_prune: Arc::new(Mutex::new(Instant::now())),
            },
            rate_per_sec: rate_per_sec as f64,
            burst: burst as f64,
            client_header,
        }
    }
}

impl<S> Layer<S> for RateLimiterLayer {
    type Service = RateLimiter<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimiter {
            inner,
            state: self.state.clone(),
            rate_per_sec: self.rate_per_sec,
            burst: self.burst,
            client_header: self.client_header.clone(),
        }
    }
}

#[derive(Clone)]
pub struct RateLimiter<S> {
    inner: S,
    state: SharedState,
    rate_per_sec: f64,
    burst: f64,
    client_header: HeaderName,
}

impl<S, ReqBody> Service<Request<ReqBody>> for RateLimiter<S>
where
    S: Service<Request<ReqBody>, Response = Response<Body>> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        if let Some(client) = client_id(&req, &self.client_header)
            && !self.check_and_consume(&client)
        {
            self.state.dropped_since_log.fetch_add(1, Ordering::Relaxed);
            log_drops_if_needed(&self.state);
            return Box::pin(async move {
                Ok((
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({ "error": "rate limited" })),
                )
                    .into_response())
            });
        }

        let fut = self.inner.call(req);
        Box::pin(fut)
    }
}

/// First address in the configured header; proxies append, so the left-most
/// entry is the original client.
fn client_id<B>(req: &Request<B>, header: &HeaderName) -> Option<String> {
    req.headers()
        .get(header)
        .and_then(|h| h.to_str().ok())
        .and_then(|raw| raw.split(',').next())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

impl<S> RateLimiter<S> {
    fn check_and_consume(&self, client: &str) -> bool {
        let now = Instant::now();
        self.prune_if_due(now);
        let mut bucket = self
            .state
            .buckets
            .entry(client.to_string())
            .or_insert_with(|| TokenBucket::full(self.burst, now));
        bucket.try_take(now, self.rate_per_sec, self.burst)
    }

    /// Client ids come from a request header, so idle buckets are swept once
    /// per interval, or early when too many clients are tracked.
    fn prune_if_due(&self, now: Instant) {
        let crowded = self.state.buckets.len() >= MAX_TRACKED_CLIENTS;
        {
            let Ok(mut last) = self.state.last_prune.lock() else {
                return;
            };
            if !crowded && now.saturating_duration_since(*last) < PRUNE_INTERVAL {
                return;
            }
            *last = now;
        }
        prune_idle(&self.state.buckets, now, self.rate_per_sec, self.burst);
    }
}

fn prune_idle(
    buckets: &DashMap<String, TokenBucket>,
    now: Instant,
    rate: f64,
    burst: f64,
) -> usize {
    let before = buckets.len();
    buckets.retain(|_, bucket| !bucket.is_full_at(now, rate, burst));
    let removed = before.saturating_sub(buckets.len());
    if removed > 0 {
        debug!("rate limiter pruned {removed} idle clients");
    }
    removed
}

fn log_drops_if_needed(state: &SharedState) {
    let now = Instant::now();
    let Ok(mut last) = state.last_log.lock() else {
        return;
    };
    if now.saturating_duration_since(*last) >= LOG_INTERVAL {
        let dropped = state.dropped_since_log.swap(0, Ordering::Relaxed);
        if dropped > 0 {
            warn!("rate limiter dropped {dropped} requests in the last minute");
        }
        *last = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_drains_then_refills() {
        let start = Instant::now();
        let mut bucket = TokenBucket::full(2.0, start);
        assert!(bucket.try_take(start, 1.0, 2.0));
        assert!(bucket.try_take(start, 1.0, 2.0));
        assert!(!bucket.try_take(start, 1.0, 2.0));
        assert!(bucket.try_take(start + Duration::from_secs(1), 1.0, 2.0));
    }

    #[test]
    fn bucket_never_exceeds_burst() {
        let start = Instant::now();
        let mut bucket = TokenBucket::full(1.0, start);
        let later = start + Duration::from_secs(60);
        assert!(bucket.try_take(later, 5.0, 1.0));
        assert!(!bucket.try_take(later, 5.0, 1.0));
    }

    #[test]
    fn prune_drops_only_refilled_buckets() {
        let start = Instant::now();
        let later = start + Duration::from_secs(10);
        let buckets = DashMap::new();

        let mut idle = TokenBucket::full(2.0, start);
        assert!(idle.try_take(start, 1.0, 2.0));
        buckets.insert("203.0.113.7".to_string(), idle);

        let mut busy = TokenBucket::full(2.0, later);
        assert!(busy.try_take(later, 1.0, 2.0));
        assert!(busy.try_take(later, 1.0, 2.0));
        buckets.insert("198.51.100.4".to_string(), busy);

        assert_eq!(prune_idle(&buckets, later, 1.0, 2.0), 1);
        assert!(buckets.contains_key("198.51.100.4"));
        assert!(!buckets.contains_key("203.0.113.7"));
    }

    #[test]
    fn limiter_sweeps_idle_clients_when_crowded() {
        let layer = RateLimiterLayer::new(1, 1, HeaderName::from_static("x-forwarded-for"));
        let limiter = layer.layer(());
        let now = Instant::now();
        for n in 0..MAX_TRACKED_CLIENTS {
            limiter
                .state
                .buckets
                .insert(format!("client-{n}"), TokenBucket::full(1.0, now));
        }

        assert!(limiter.check_and_consume("198.51.100.4"));
        assert_eq!(limiter.state.buckets.len(), 1);
        assert!(!limiter.check_and_consume("198.51.100.4"));
    }

    #[test]
    fn client_id_takes_first_forwarded_address() {
        let header = HeaderName::from_static("x-forwarded-for");
        let req = Request::builder()
            .header("X-Forwarded-For", " 203.0.113.7 , 10.0.0.1")
            .body(())
            .unwrap();
        assert_eq!(client_id(&req, &header).as_deref(), Some("203.0.113.7"));

        let bare = Request::builder().body(()).unwrap();
        assert_eq!(client_id(&bare, &header), None);
    }
}
