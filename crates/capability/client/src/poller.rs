//! 营业状态轮询。
//!
//! 两种状态：inactive / active。启用时立即跑一轮，然后按固定间隔重复；
//! 停用时取消周期任务，并把当前所有标记恢复为默认外观。

use crate::gather::{Settled, gather_settled};
use crate::session::SharedSession;
use crate::status::{CheckMode, StatusChecker};
use crate::surface::{MarkerIcon, RenderSurface};
use finder_telemetry::record_status_poll_cycle;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// 可取消的周期任务句柄；取消是停止周期的唯一方式。
pub struct PollHandle {
    cancel_token: CancellationToken,
    handle: JoinHandle<()>,
}

impl PollHandle {
    /// 第一次执行在一个周期之后。
    pub fn spawn<F, Fut>(period: Duration, mut cycle: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = cycle() => {}
                }
            }
        });
        Self {
            cancel_token,
            handle,
        }
    }

    /// 取消并等待任务退出；返回后不会再有新的周期执行。
    pub async fn cancel(self) {
        self.cancel_token.cancel();
        if let Err(err) = self.handle.await {
            warn!(target: "finder.client", error = %err, "poll_task_join_failed");
        }
    }
}

/// 轮询器状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Inactive,
    Active,
}

/// 一轮轮询的统计。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub checked: usize,
    /// 本轮检查失败的设施 ID（按渲染顺序）。
    pub failed: Vec<String>,
}

pub struct StatusPoller {
    checker: Arc<StatusChecker>,
    surface: Arc<dyn RenderSurface>,
    session: SharedSession,
    interval: Duration,
    handle: Option<PollHandle>,
}

impl StatusPoller {
    pub fn new(
        checker: Arc<StatusChecker>,
        surface: Arc<dyn RenderSurface>,
        session: SharedSession,
        interval: Duration,
    ) -> Self {
        Self {
            checker,
            surface,
            session,
            interval,
            handle: None,
        }
    }

    pub fn state(&self) -> PollerState {
        if self.handle.is_some() {
            PollerState::Active
        } else {
            PollerState::Inactive
        }
    }

    pub async fn toggle(&mut self) -> PollerState {
        match self.state() {
            PollerState::Inactive => self.activate().await,
            PollerState::Active => self.deactivate().await,
        }
        self.state()
    }

    pub async fn activate(&mut self) {
        if self.handle.is_some() {
            return;
        }
        info!(target: "finder.client", interval_secs = self.interval.as_secs(), "status_polling_started");
        run_cycle(&self.checker, &self.session).await;

        let checker = self.checker.clone();
        let session = self.session.clone();
        self.handle = Some(PollHandle::spawn(self.interval, move || {
            let checker = checker.clone();
            let session = session.clone();
            async move {
                run_cycle(&checker, &session).await;
            }
        }));
    }

    pub async fn deactivate(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        handle.cancel().await;
        self.session.with(|session| {
            for marker in session.marker_handles() {
                self.surface.set_marker_icon(marker, MarkerIcon::Default);
            }
        });
        info!(target: "finder.client", "status_polling_stopped");
    }
}

/// 对当前渲染的每个设施并发执行一次静默检查，单项失败互不影响。
pub async fn run_cycle(checker: &StatusChecker, session: &SharedSession) -> CycleReport {
    record_status_poll_cycle();
    let facilities = session.with(|session| session.rendered_ids());

    let settled = gather_settled(facilities.iter().map(|(place_id, name)| {
        checker.check_open_status(place_id, name, CheckMode::Silent)
    }))
    .await;

    let mut report = CycleReport::default();
    for ((place_id, name), result) in facilities.iter().zip(settled) {
        report.checked += 1;
        if let Settled::Rejected(err) = result {
            report.failed.push(place_id.clone());
            warn!(target: "finder.client", place_id = %place_id, name = %name, error = %err, "status_poll_item_failed");
        }
    }
    report
}
