// ==========================================
// 考勤表客户端 - 命令行入口
// ==========================================

use crate::api::{ApiError, ApiResult, DashboardApi, ExportRequest, QrView};
use crate::app::state::AppState;
use crate::domain::{AttendanceThresholds, DayKey, UserRole};
use crate::exporter::{ExportFormat, ExportOptions, Orientation};
use crate::i18n::t;
use chrono::Datelike;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// 考勤表命令行客户端
#[derive(Parser)]
#[command(name = "attendance-sheets")]
#[command(author, version, about)]
pub struct Cli {
    /// 以 JSON 行输出日志
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 注册账号（随后用 verify 验证邮箱）
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// teacher 或 student
        #[arg(long, default_value = "teacher")]
        role: String,
    },

    /// 验证邮箱
    Verify {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: String,
    },

    /// 登录（教师或学生）
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// 注销
    Logout,

    /// 班级管理
    #[command(subcommand)]
    Classes(ClassCommands),

    /// 从名单文件新建班级（.csv / .xlsx / .xls / .txt）
    Import {
        /// 班级名称
        #[arg(long)]
        name: String,
        file: PathBuf,
    },

    /// 导出月度报表
    Export {
        class_id: String,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
        /// csv / excel / pdf
        #[arg(long, default_value = "csv")]
        format: String,
        /// PDF 方向: landscape / portrait
        #[arg(long, default_value = "landscape")]
        orientation: String,
        /// 导出整月（默认只导出有考勤记录的日期）
        #[arg(long)]
        full_month: bool,
        /// 输出目录
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// 月度概览
    Summary {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },

    /// 切换某学生某日考勤（未标记 → P → A → L → 未标记）
    Toggle {
        class_id: String,
        student_id: i64,
        /// 日期，如 2026-10-19（默认今天）
        #[arg(long)]
        date: Option<String>,
    },

    /// 查看或设置默认阈值
    Thresholds {
        #[arg(long)]
        excellent: Option<f64>,
        #[arg(long)]
        good: Option<f64>,
        #[arg(long)]
        moderate: Option<f64>,
        #[arg(long)]
        at_risk: Option<f64>,
        /// 同时应用到这些班级
        #[arg(long = "apply", value_delimiter = ',')]
        apply_to: Vec<String>,
    },

    /// 二维码考勤（运行指定秒数后结束会话）
    Qr {
        class_id: String,
        #[arg(long)]
        rotation: Option<u64>,
        #[arg(long, default_value_t = 60)]
        duration: u64,
        /// 每次换码时写出 SVG
        #[arg(long)]
        svg_out: Option<PathBuf>,
    },

    /// 学生: 加入班级
    Enroll {
        class_id: String,
        #[arg(long)]
        roll_no: String,
    },

    /// 学生: 扫码签到（二维码文本）
    Scan { payload: String },

    /// 学生: 已加入的班级
    MyClasses,

    /// 提交联系表单
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        subject: String,
        #[arg(long)]
        message: String,
    },
}

#[derive(Subcommand)]
pub enum ClassCommands {
    /// 列出班级
    List,
    /// 新建空班级
    Create { name: String },
    /// 重命名
    Rename { class_id: String, name: String },
    /// 删除
    Delete { class_id: String },
    /// 添加空白学生
    AddStudent { class_id: String },
}

/// 执行命令
pub async fn run(state: &AppState, command: Commands) -> ApiResult<()> {
    let today = chrono::Local::now().date_naive();

    match command {
        command @ (Commands::Classes(_)
        | Commands::Import { .. }
        | Commands::Export { .. }
        | Commands::Summary { .. }
        | Commands::Toggle { .. }
        | Commands::Thresholds { .. }) => {
            let dashboard = load_teacher_dashboard(state).await?;
            run_dashboard_command(state, &dashboard, command).await?;
        }
        Commands::Signup { name, email, password, role } => {
            let role = UserRole::parse_lenient(&role);
            let message = state.auth_api.signup(&name, &email, &password, &password, role).await?;
            println!("{}", message);
        }
        Commands::Verify { email, code } => {
            let session = state.auth_api.verify_email(&email, &code).await?;
            println!("{} ({})", session.user.email, session.role());
        }
        Commands::Login { email, password } => {
            let session = state.auth_api.login(&email, &password).await?;
            println!("{} ({})", session.user.email, session.role());
        }
        Commands::Logout => {
            state.auth_api.logout().await?;
        }
        Commands::Qr { class_id, rotation, duration, svg_out } => {
            require_teacher(state)?;
            run_qr_session(state, &class_id, rotation, duration, svg_out).await?;
        }
        Commands::Enroll { class_id, roll_no } => {
            let session = state.auth_api.session().ok_or(ApiError::NotAuthenticated)?;
            let verification = state.student_api.verify_class(&class_id).await?;
            println!("{} - {}", verification.class_name, verification.teacher_name);
            let message = state.student_api.enroll(&session.user, &class_id, &roll_no).await?;
            println!("{}", message);
        }
        Commands::Scan { payload } => {
            state.auth_api.session().ok_or(ApiError::NotAuthenticated)?;
            let result = state.student_api.scan_qr(&payload).await?;
            println!("{}\t{}", result.date, result.message);
        }
        Commands::MyClasses => {
            state.auth_api.session().ok_or(ApiError::NotAuthenticated)?;
            for class in state.student_api.enrolled_classes().await? {
                let (summary, tier) = state.student_api.month_summary(&class, today.year(), today.month());
                println!(
                    "{}\t{}\t{}%\t{}",
                    class.class_id,
                    class.class_name,
                    summary.percentage_text(),
                    tier
                );
            }
        }
        Commands::Contact { name, email, subject, message } => {
            let reply = state.contact_api.submit(&name, &email, &subject, &message).await?;
            println!("{}", reply);
        }
    }
    Ok(())
}

/// 在已加载的班级 API 上执行教师端命令
///
/// 无论成功与否，返回前都等待后台同步（含加载时的回推任务）结束
pub async fn run_dashboard_command(
    state: &AppState,
    dashboard: &DashboardApi,
    command: Commands,
) -> ApiResult<()> {
    let result = dispatch_dashboard(state, dashboard, command);
    finish(dashboard).await;
    result
}

fn dispatch_dashboard(state: &AppState, dashboard: &DashboardApi, command: Commands) -> ApiResult<()> {
    let today = chrono::Local::now().date_naive();

    match command {
        Commands::Classes(action) => match action {
            ClassCommands::List => {
                for class in dashboard.classes()? {
                    println!("{}\t{}\t{}", class.id, class.name, class.students.len());
                }
            }
            ClassCommands::Create { name } => {
                let class = dashboard.create_class(&name)?;
                println!("{}", class.id);
            }
            ClassCommands::Rename { class_id, name } => {
                dashboard.rename_class(&class_id, &name)?;
            }
            ClassCommands::Delete { class_id } => {
                dashboard.delete_class(&class_id)?;
            }
            ClassCommands::AddStudent { class_id } => {
                println!("{}", dashboard.add_student(&class_id)?);
            }
        },
        Commands::Import { name, file } => {
            let class = state.import_api.import_class(dashboard, &name, &file)?;
            println!("{}\t{}\t{}", class.id, class.name, class.students.len());
        }
        Commands::Export { class_id, year, month, format, orientation, full_month, out } => {
            let format: ExportFormat = format.parse().map_err(ApiError::Validation)?;
            let orientation: Orientation = orientation.parse().map_err(ApiError::Validation)?;
            let mut request = ExportRequest::new(
                year.unwrap_or(today.year()),
                month.unwrap_or(today.month()),
                format,
            );
            request.orientation = orientation;
            request.options = ExportOptions { only_class_days: !full_month };

            let class = dashboard.class(&class_id)?;
            let path = state
                .export_api
                .export_to_dir(&class, &dashboard.default_thresholds()?, &request, &out)?;
            println!("{}", path.display());
        }
        Commands::Summary { year, month } => {
            let snapshot = dashboard.snapshot(year.unwrap_or(today.year()), month.unwrap_or(today.month()))?;
            let overall = &snapshot.overall;
            println!(
                "classes={} students={} attendance={}% at_risk={} excellent={}",
                overall.total_classes,
                overall.total_students,
                overall.overall_attendance_text(),
                overall.at_risk_count,
                overall.excellent_count
            );
            for class in &snapshot.classes {
                println!(
                    "{}\t{}%\tE{} G{} M{} R{}",
                    class.class_name,
                    class.avg_attendance_text(),
                    class.excellent_count,
                    class.good_count,
                    class.moderate_count,
                    class.at_risk_count
                );
            }
        }
        Commands::Toggle { class_id, student_id, date } => {
            let day = match date {
                Some(raw) => DayKey::parse(&raw)
                    .ok_or_else(|| ApiError::Validation(t("validation.invalid_date")))?,
                None => DayKey::from_date(today),
            };
            let mark = dashboard.toggle_attendance(&class_id, student_id, day)?;
            println!("{}\t{}", day, mark.map(|m| m.code()).unwrap_or("-"));
        }
        Commands::Thresholds { excellent, good, moderate, at_risk, apply_to } => {
            let current = dashboard.default_thresholds()?;
            if excellent.is_none() && good.is_none() && moderate.is_none() && at_risk.is_none() && apply_to.is_empty() {
                print_thresholds(&current);
                return Ok(());
            }
            let updated = AttendanceThresholds::new(
                excellent.unwrap_or(current.excellent),
                good.unwrap_or(current.good),
                moderate.unwrap_or(current.moderate),
                at_risk.unwrap_or(current.at_risk),
            );
            let applied = dashboard.save_default_thresholds(updated, &apply_to)?;
            print_thresholds(&dashboard.default_thresholds()?);
            println!("applied_to={}", applied);
        }
        _ => {
            return Err(ApiError::InternalError("该命令不使用班级列表".to_string()));
        }
    }
    Ok(())
}

fn require_teacher(state: &AppState) -> ApiResult<crate::domain::AuthSession> {
    let session = state.auth_api.session().ok_or(ApiError::NotAuthenticated)?;
    if !session.is_teacher() {
        return Err(ApiError::Validation(t("auth.teacher_only")));
    }
    Ok(session)
}

async fn load_teacher_dashboard(state: &AppState) -> ApiResult<DashboardApi> {
    let session = require_teacher(state)?;
    let dashboard = state.load_dashboard(&session).await?;
    if let Some(banner) = dashboard.sync_banner() {
        eprintln!("{}", banner);
    }
    Ok(dashboard)
}

/// 等待后台同步并提示失败
async fn finish(dashboard: &DashboardApi) {
    dashboard.flush_sync().await;
    if let Some(banner) = dashboard.sync_banner() {
        eprintln!("{}", banner);
    }
}

fn print_thresholds(thresholds: &AttendanceThresholds) {
    println!(
        "excellent={:.3} good={:.3} moderate={:.3} atRisk={:.3}",
        thresholds.excellent, thresholds.good, thresholds.moderate, thresholds.at_risk
    );
}

async fn run_qr_session(
    state: &AppState,
    class_id: &str,
    rotation: Option<u64>,
    duration: u64,
    svg_out: Option<PathBuf>,
) -> ApiResult<()> {
    let session = state.start_qr_session(class_id, rotation).await?;
    let mut views = session.subscribe_view();
    write_view(&session.view(), svg_out.as_deref())?;

    let deadline = tokio::time::sleep(Duration::from_secs(duration));
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            _ = &mut deadline => break,
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                write_view(&view, svg_out.as_deref())?;
            }
        }
    }

    let summary = session.stop().await?;
    println!(
        "date={} scanned={} absent={}",
        summary.date, summary.scanned_count, summary.absent_count
    );
    Ok(())
}

fn write_view(view: &QrView, svg_out: Option<&std::path::Path>) -> ApiResult<()> {
    println!("code={} scanned={}", view.code, view.scanned_count);
    if let Some(path) = svg_out {
        std::fs::write(path, &view.svg).map_err(crate::exporter::ExportError::from)?;
    }
    Ok(())
}
