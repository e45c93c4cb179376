//! 照片引用到 URL 的缓存解析。

use crate::backend::FacilityBackend;
use crate::error::ClientError;
use finder_telemetry::{
    record_photo_cache_hit, record_photo_cache_miss, record_photo_lookup_failure,
};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

type PendingLookup = Shared<BoxFuture<'static, Result<String, ClientError>>>;

#[derive(Default)]
struct PhotoCache {
    resolved: HashMap<String, String>,
    /// 正在进行的远程查询；同一引用的并发调用共享同一个查询。
    pending: HashMap<String, PendingLookup>,
}

/// 照片 URL 解析器。
///
/// 成功结果按引用缓存整个会话，不淘汰、不过期；失败不缓存，下次调用会重新查询。
pub struct PhotoResolver {
    backend: Arc<dyn FacilityBackend>,
    cache: Mutex<PhotoCache>,
    fallback_url: String,
}

impl PhotoResolver {
    pub fn new(backend: Arc<dyn FacilityBackend>, fallback_url: impl Into<String>) -> Self {
        Self {
            backend,
            cache: Mutex::new(PhotoCache::default()),
            fallback_url: fallback_url.into(),
        }
    }

    pub fn fallback_url(&self) -> &str {
        &self.fallback_url
    }

    /// 已缓存的 URL。
    pub async fn cached(&self, photo_reference: &str) -> Option<String> {
        self.cache.lock().await.resolved.get(photo_reference).cloned()
    }

    /// 查询 URL，失败时返回错误（不缓存）。
    pub async fn lookup(&self, photo_reference: &str) -> Result<String, ClientError> {
        let pending = {
            let mut cache = self.cache.lock().await;
            if let Some(url) = cache.resolved.get(photo_reference) {
                record_photo_cache_hit();
                return Ok(url.clone());
            }
            match cache.pending.get(photo_reference) {
                Some(pending) => pending.clone(),
                None => {
                    record_photo_cache_miss();
                    let backend = self.backend.clone();
                    let reference = photo_reference.to_string();
                    let pending = async move {
                        let result = backend.photo_url(&reference).await;
                        if result.is_err() {
                            record_photo_lookup_failure();
                        }
                        result
                    }
                    .boxed()
                    .shared();
                    cache
                        .pending
                        .insert(photo_reference.to_string(), pending.clone());
                    pending
                }
            }
        };

        let result = pending.clone().await;

        let mut cache = self.cache.lock().await;
        if cache
            .pending
            .get(photo_reference)
            .is_some_and(|current| current.ptr_eq(&pending))
        {
            cache.pending.remove(photo_reference);
        }
        if let Ok(url) = &result {
            cache
                .resolved
                .entry(photo_reference.to_string())
                .or_insert_with(|| url.clone());
        }
        result
    }

    /// 查询 URL，没有引用或查询失败时返回占位图。
    pub async fn resolve(&self, photo_reference: Option<&str>) -> String {
        let Some(reference) = photo_reference.filter(|value| !value.is_empty()) else {
            return self.fallback_url.clone();
        };
        match self.lookup(reference).await {
            Ok(url) => url,
            Err(err) => {
                warn!(target: "finder.client", photo_reference = reference, error = %err, "photo_lookup_failed");
                self.fallback_url.clone()
            }
        }
    }
}
