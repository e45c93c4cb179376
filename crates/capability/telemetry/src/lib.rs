//! 追踪、请求 ID 与基础计数器。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 计数器快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub upstream_requests: u64,
    pub upstream_failures: u64,
    pub facilities_registered: u64,
    pub status_records_written: u64,
    pub photo_cache_hits: u64,
    pub photo_cache_misses: u64,
    pub photo_lookup_failures: u64,
    pub status_poll_cycles: u64,
    pub status_check_failures: u64,
}

/// 进程级计数器。
pub struct TelemetryMetrics {
    upstream_requests: AtomicU64,
    upstream_failures: AtomicU64,
    facilities_registered: AtomicU64,
    status_records_written: AtomicU64,
    photo_cache_hits: AtomicU64,
    photo_cache_misses: AtomicU64,
    photo_lookup_failures: AtomicU64,
    status_poll_cycles: AtomicU64,
    status_check_failures: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            upstream_requests: AtomicU64::new(0),
            upstream_failures: AtomicU64::new(0),
            facilities_registered: AtomicU64::new(0),
            status_records_written: AtomicU64::new(0),
            photo_cache_hits: AtomicU64::new(0),
            photo_cache_misses: AtomicU64::new(0),
            photo_lookup_failures: AtomicU64::new(0),
            status_poll_cycles: AtomicU64::new(0),
            status_check_failures: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            upstream_requests: self.upstream_requests.load(Ordering::Relaxed),
            upstream_failures: self.upstream_failures.load(Ordering::Relaxed),
            facilities_registered: self.facilities_registered.load(Ordering::Relaxed),
            status_records_written: self.status_records_written.load(Ordering::Relaxed),
            photo_cache_hits: self.photo_cache_hits.load(Ordering::Relaxed),
            photo_cache_misses: self.photo_cache_misses.load(Ordering::Relaxed),
            photo_lookup_failures: self.photo_lookup_failures.load(Ordering::Relaxed),
            status_poll_cycles: self.status_poll_cycles.load(Ordering::Relaxed),
            status_check_failures: self.status_check_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局计数器实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录上游请求次数。
pub fn record_upstream_request() {
    metrics().upstream_requests.fetch_add(1, Ordering::Relaxed);
}

/// 记录上游失败次数（传输失败或非 OK 状态）。
pub fn record_upstream_failure() {
    metrics().upstream_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录设施注册次数。
pub fn record_facility_registered(count: u64) {
    metrics()
        .facilities_registered
        .fetch_add(count, Ordering::Relaxed);
}

/// 记录营业状态写入次数。
pub fn record_status_record_written() {
    metrics()
        .status_records_written
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录照片缓存命中。
pub fn record_photo_cache_hit() {
    metrics().photo_cache_hits.fetch_add(1, Ordering::Relaxed);
}

/// 记录照片缓存未命中（触发一次远程查询）。
pub fn record_photo_cache_miss() {
    metrics().photo_cache_misses.fetch_add(1, Ordering::Relaxed);
}

/// 记录照片远程查询失败。
pub fn record_photo_lookup_failure() {
    metrics()
        .photo_lookup_failures
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录轮询周期次数。
pub fn record_status_poll_cycle() {
    metrics().status_poll_cycles.fetch_add(1, Ordering::Relaxed);
}

/// 记录单个设施营业状态查询失败。
pub fn record_status_check_failure() {
    metrics()
        .status_check_failures
        .fetch_add(1, Ordering::Relaxed);
}
