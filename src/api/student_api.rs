// ==========================================
// 考勤表客户端 - 学生端 API
// ==========================================
// 职责: 验证班级 / 加入 / 退出 / 查看已加入班级 / 扫码签到
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator;
use crate::domain::{
    AttendanceThresholds, ClassVerification, EnrolledClass, EnrollmentRequest, QrPayload,
    QrScanResult, StatusTier, Student, User,
};
use crate::engine::{classify, AttendanceAggregator, AttendanceSummary};
use crate::i18n::t;
use crate::remote::StudentBackend;
use std::sync::Arc;
use tracing::{info, instrument};

pub struct StudentApi {
    backend: Arc<dyn StudentBackend>,
    aggregator: AttendanceAggregator,
}

impl StudentApi {
    pub fn new(backend: Arc<dyn StudentBackend>) -> Self {
        Self {
            backend,
            aggregator: AttendanceAggregator::new(),
        }
    }

    /// 加入前确认班级存在（公开接口，无需登录）
    pub async fn verify_class(&self, class_id: &str) -> ApiResult<ClassVerification> {
        validator::validate_class_id(class_id)?;
        let verification = self.backend.verify_class(class_id.trim()).await?;
        if !verification.exists {
            return Err(ApiError::NotFound(t("student.class_not_found")));
        }
        Ok(verification)
    }

    /// 加入班级；姓名与邮箱取自当前登录用户
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn enroll(&self, user: &User, class_id: &str, roll_no: &str) -> ApiResult<String> {
        validator::validate_class_id(class_id)?;
        validator::validate_roll_no(roll_no)?;

        let request = EnrollmentRequest {
            class_id: class_id.trim().to_string(),
            name: user.name.clone(),
            roll_no: roll_no.trim().to_string(),
            email: user.email.clone(),
        };
        let message = self.backend.enroll(&request).await?;
        info!("已加入班级");
        Ok(message)
    }

    pub async fn unenroll(&self, class_id: &str) -> ApiResult<String> {
        validator::validate_class_id(class_id)?;
        Ok(self.backend.unenroll(class_id.trim()).await?)
    }

    pub async fn enrolled_classes(&self) -> ApiResult<Vec<EnrolledClass>> {
        Ok(self.backend.enrolled_classes().await?)
    }

    /// 扫码签到
    ///
    /// # 参数
    /// - raw_payload: 二维码文本 {"class_id": "...", "code": "..."}
    #[instrument(skip(self, raw_payload))]
    pub async fn scan_qr(&self, raw_payload: &str) -> ApiResult<QrScanResult> {
        let payload = QrPayload::parse(raw_payload)
            .map_err(|_| ApiError::Validation(t("validation.invalid_qr")))?;
        validator::validate_class_id(&payload.class_id)?;
        validator::validate_code(&payload.code)?;

        let result = self.backend.scan_qr(&payload.class_id, &payload.code).await?;
        info!(class_id = %payload.class_id, date = %result.date, "扫码签到成功");
        Ok(result)
    }

    /// 学生本人在某月的出勤汇总与分级
    pub fn month_summary(
        &self,
        class: &EnrolledClass,
        year: i32,
        month: u32,
    ) -> (AttendanceSummary, StatusTier) {
        let record = &class.student_record;
        let mut student = Student::with_name(0, record.name.clone(), record.roll_no.clone().unwrap_or_default());
        student.attendance = record.marks();

        let summary = self.aggregator.summarize(&student, year, month);
        let thresholds = class.thresholds.unwrap_or_else(AttendanceThresholds::default);
        let tier = classify(summary.percentage(), &thresholds);
        (summary, tier)
    }
}
