// ==========================================
// 二维码考勤会话集成测试
// ==========================================
// 测试目标: 轮询换码、倒计时重置、已扫人数、结束汇总
// 时间: tokio 暂停时钟（sleep 自动推进）
// ==========================================

mod helpers;

use attendance_sheets::api::{ApiError, QrAttendanceSession, StudentApi};
use attendance_sheets::domain::QrPayload;
use attendance_sheets::logging;
use helpers::mock_backends::{MockQrBackend, MockStudentBackend};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

const POLL: Duration = Duration::from_secs(1);

async fn start(backend: &Arc<MockQrBackend>, rotation: u64) -> QrAttendanceSession {
    QrAttendanceSession::start(backend.clone(), "1700", rotation, POLL)
        .await
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_initial_view_and_countdown() {
    logging::init_test();
    let backend = Arc::new(MockQrBackend::new("CODE-A"));
    let session = start(&backend, 5).await;

    let view = session.view();
    assert_eq!(view.code, "CODE-A");
    assert_eq!(view.attendance_date, MockQrBackend::DATE);
    assert_eq!(view.scanned_count, 0);
    assert!(view.svg.contains("<svg"));
    assert_eq!(session.countdown(), 5);

    sleep(Duration::from_millis(1500)).await;
    assert_eq!(session.countdown(), 4);
    assert!(backend.status_calls() >= 1);
}

#[tokio::test(start_paused = true)]
async fn test_countdown_wraps_without_new_code() {
    let backend = Arc::new(MockQrBackend::new("CODE-A"));
    let session = start(&backend, 3).await;

    // 3 → 2 → 1 → 3
    sleep(Duration::from_millis(3500)).await;
    assert_eq!(session.countdown(), 3);
    assert_eq!(session.view().code, "CODE-A");
}

#[tokio::test(start_paused = true)]
async fn test_new_code_updates_view_and_resets_countdown() {
    let backend = Arc::new(MockQrBackend::new("CODE-A"));
    let session = start(&backend, 5).await;
    let first_svg = session.view().svg;

    sleep(Duration::from_millis(1500)).await;
    assert_eq!(session.countdown(), 4);

    backend.rotate("CODE-B");
    sleep(Duration::from_secs(1)).await;

    let view = session.view();
    assert_eq!(view.code, "CODE-B");
    assert_ne!(view.svg, first_svg);
    assert_eq!(session.countdown(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_scanned_count_follows_backend() {
    let backend = Arc::new(MockQrBackend::new("CODE-A"));
    let session = start(&backend, 5).await;
    let mut views = session.subscribe_view();

    backend.add_scan(1);
    backend.add_scan(2);
    views.changed().await.unwrap();
    assert_eq!(views.borrow().scanned_count, 2);
    // 码未变化，图片保持不变
    assert_eq!(views.borrow().code, "CODE-A");
}

#[tokio::test(start_paused = true)]
async fn test_stop_returns_summary_and_halts_polling() {
    let backend = Arc::new(MockQrBackend::new("CODE-A"));
    let session = start(&backend, 5).await;
    backend.add_scan(1);

    sleep(Duration::from_millis(2500)).await;
    let summary = session.stop().await.unwrap();
    assert!(backend.is_stopped());
    assert_eq!(summary.scanned_count, 1);
    assert_eq!(summary.absent_count, 9);
    assert_eq!(summary.date, MockQrBackend::DATE);

    let calls = backend.status_calls();
    sleep(Duration::from_secs(5)).await;
    assert_eq!(backend.status_calls(), calls);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_session_aborts_tasks() {
    let backend = Arc::new(MockQrBackend::new("CODE-A"));
    let session = start(&backend, 5).await;
    sleep(Duration::from_millis(1500)).await;
    drop(session);

    let calls = backend.status_calls();
    sleep(Duration::from_secs(5)).await;
    assert_eq!(backend.status_calls(), calls);
    assert!(!backend.is_stopped());
}

#[tokio::test(start_paused = true)]
async fn test_start_requires_class_id() {
    let backend = Arc::new(MockQrBackend::new("CODE-A"));
    let result = QrAttendanceSession::start(backend, "  ", 5, POLL).await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
}

// ==========================================
// 学生扫码
// ==========================================

#[tokio::test]
async fn test_student_scans_displayed_payload() {
    let backend = Arc::new(MockStudentBackend::new().with_class("1700", "Physics"));
    let api = StudentApi::new(backend.clone());

    let payload = QrPayload::new("1700", "CODE-A").to_json();
    let result = api.scan_qr(&payload).await.unwrap();
    assert_eq!(result.date, MockQrBackend::DATE);
    assert_eq!(
        backend.scans(),
        vec![("1700".to_string(), "CODE-A".to_string())]
    );
}

#[tokio::test]
async fn test_student_scan_rejects_garbage() {
    let backend = Arc::new(MockStudentBackend::new().with_class("1700", "Physics"));
    let api = StudentApi::new(backend.clone());

    let err = api.scan_qr("https://example.com").await.unwrap_err();
    assert!(err.is_validation());

    let err = api.scan_qr(r#"{"class_id": "1700", "code": ""}"#).await.unwrap_err();
    assert!(err.is_validation());
    assert!(backend.scans().is_empty());
}
