// ==========================================
// 考勤表客户端 - 二维码考勤会话
// ==========================================
// 教师端: 开启会话 → 轮询当前码与已扫人数 → 倒计时 → 结束会话
// 学生端扫码见 StudentApi::scan_qr
// ==========================================
// 并发: 轮询任务与倒计时任务各自独立，经 watch 通道发布状态
// 会话结束或被丢弃时两个任务均被中止
// ==========================================

use crate::api::error::ApiResult;
use crate::api::validator;
use crate::domain::{QrPayload, QrSessionInfo, QrStopSummary};
use crate::exporter::render_qr_svg;
use crate::remote::QrBackend;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

/// 默认轮询间隔
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

const TICK: Duration = Duration::from_secs(1);

/// 当前展示的二维码
#[derive(Debug, Clone, PartialEq)]
pub struct QrView {
    pub code: String,
    pub svg: String,
    pub scanned_count: usize,
    pub attendance_date: String,
}

impl QrView {
    fn from_session(info: &QrSessionInfo) -> ApiResult<Self> {
        let payload = QrPayload::new(info.class_id.clone(), info.current_code.clone());
        Ok(Self {
            code: info.current_code.clone(),
            svg: render_qr_svg(&payload)?,
            scanned_count: info.scanned_count(),
            attendance_date: info.attendance_date.clone(),
        })
    }
}

pub struct QrAttendanceSession {
    backend: Arc<dyn QrBackend>,
    class_id: String,
    rotation_interval: u64,
    view_rx: watch::Receiver<QrView>,
    countdown_rx: watch::Receiver<u64>,
    poll_task: JoinHandle<()>,
    countdown_task: JoinHandle<()>,
}

impl QrAttendanceSession {
    /// 开启会话并启动轮询、倒计时任务
    ///
    /// # 参数
    /// - rotation_interval: 换码间隔（秒），0 视为 1
    /// - poll_interval: 轮询后端的间隔
    #[instrument(skip(backend))]
    pub async fn start(
        backend: Arc<dyn QrBackend>,
        class_id: &str,
        rotation_interval: u64,
        poll_interval: Duration,
    ) -> ApiResult<Self> {
        validator::validate_class_id(class_id)?;
        let rotation_interval = rotation_interval.max(1);
        let class_id = class_id.trim().to_string();

        let info = backend.start_session(&class_id, rotation_interval).await?;
        let rotation_interval = if info.rotation_interval > 0 {
            info.rotation_interval
        } else {
            rotation_interval
        };
        let view = QrView::from_session(&info)?;
        info!(class_id = %class_id, date = %view.attendance_date, "二维码考勤会话已开启");

        let (code_tx, code_rx) = watch::channel(view.code.clone());
        let (view_tx, view_rx) = watch::channel(view);
        let (countdown_tx, countdown_rx) = watch::channel(rotation_interval);

        let poll_task = tokio::spawn(poll_loop(
            Arc::clone(&backend),
            class_id.clone(),
            poll_interval,
            view_tx,
            code_tx,
        ));
        let countdown_task = tokio::spawn(countdown_loop(rotation_interval, countdown_tx, code_rx));

        Ok(Self {
            backend,
            class_id,
            rotation_interval,
            view_rx,
            countdown_rx,
            poll_task,
            countdown_task,
        })
    }

    pub fn class_id(&self) -> &str {
        &self.class_id
    }

    pub fn rotation_interval(&self) -> u64 {
        self.rotation_interval
    }

    /// 当前二维码
    pub fn view(&self) -> QrView {
        self.view_rx.borrow().clone()
    }

    pub fn subscribe_view(&self) -> watch::Receiver<QrView> {
        self.view_rx.clone()
    }

    /// 距下次换码的秒数
    pub fn countdown(&self) -> u64 {
        *self.countdown_rx.borrow()
    }

    pub fn subscribe_countdown(&self) -> watch::Receiver<u64> {
        self.countdown_rx.clone()
    }

    /// 结束会话: 后端将未扫码学生记为缺勤并返回汇总
    #[instrument(skip(self), fields(class_id = %self.class_id))]
    pub async fn stop(self) -> ApiResult<QrStopSummary> {
        self.abort_tasks();
        let summary = self.backend.stop_session(&self.class_id).await?;
        info!(
            scanned = summary.scanned_count,
            absent = summary.absent_count,
            date = %summary.date,
            "二维码考勤会话已结束"
        );
        Ok(summary)
    }

    fn abort_tasks(&self) {
        self.poll_task.abort();
        self.countdown_task.abort();
    }
}

impl Drop for QrAttendanceSession {
    fn drop(&mut self) {
        self.abort_tasks();
    }
}

/// 轮询: 码变化时重新生成图片，并通知倒计时重置
async fn poll_loop(
    backend: Arc<dyn QrBackend>,
    class_id: String,
    poll_interval: Duration,
    view_tx: watch::Sender<QrView>,
    code_tx: watch::Sender<String>,
) {
    let mut ticker = interval_at(Instant::now() + poll_interval, poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let info = match backend.session_status(&class_id).await {
            Ok(Some(info)) => info,
            Ok(None) => {
                debug!(class_id = %class_id, "后端会话未激活");
                continue;
            }
            Err(e) => {
                warn!(class_id = %class_id, error = %e, "轮询二维码会话失败");
                continue;
            }
        };

        let code_changed = view_tx.borrow().code != info.current_code;
        if code_changed {
            match QrView::from_session(&info) {
                Ok(view) => {
                    debug!(class_id = %class_id, "二维码已轮换");
                    let _ = view_tx.send(view);
                    let _ = code_tx.send(info.current_code.clone());
                }
                Err(e) => warn!(error = %e, "二维码图片生成失败"),
            }
        } else {
            let scanned = info.scanned_count();
            view_tx.send_if_modified(|view| {
                if view.scanned_count == scanned {
                    return false;
                }
                view.scanned_count = scanned;
                true
            });
        }
    }
}

/// 倒计时: 每秒减一，将到 0 时回到换码间隔；收到新码时立即重置
async fn countdown_loop(
    rotation_interval: u64,
    countdown_tx: watch::Sender<u64>,
    mut code_rx: watch::Receiver<String>,
) {
    let mut remaining = rotation_interval;
    let mut ticker = interval_at(Instant::now() + TICK, TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                remaining = if remaining <= 1 { rotation_interval } else { remaining - 1 };
            }
            changed = code_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                remaining = rotation_interval;
                ticker.reset();
            }
        }
        let _ = countdown_tx.send(remaining);
    }
}
