// ==========================================
// 考勤表客户端 - 二维码图片
// ==========================================
// SVG，翠绿前景 + 白色背景，最小 300x300
// ==========================================

use crate::domain::qr::QrPayload;
use crate::exporter::error::ExportResult;
use qrcode::render::svg;
use qrcode::QrCode;

pub const QR_DARK: &str = "#059669";
pub const QR_LIGHT: &str = "#ffffff";
pub const QR_MIN_SIZE: u32 = 300;

/// 将会话码渲染为 SVG
pub fn render_qr_svg(payload: &QrPayload) -> ExportResult<String> {
    let code = QrCode::new(payload.to_json().as_bytes())?;
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(QR_MIN_SIZE, QR_MIN_SIZE)
        .dark_color(svg::Color(QR_DARK))
        .light_color(svg::Color(QR_LIGHT))
        .build())
}
