// ==========================================
// 考勤表客户端 - 导出模块错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("月份非法: {0}（应为 1~12）")]
    InvalidMonth(u32),

    #[error("文件写入失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel 生成失败: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("PDF 生成失败: {0}")]
    Pdf(String),

    #[error("二维码生成失败: {0}")]
    QrCode(String),
}

impl From<printpdf::Error> for ExportError {
    fn from(err: printpdf::Error) -> Self {
        ExportError::Pdf(err.to_string())
    }
}

impl From<qrcode::types::QrError> for ExportError {
    fn from(err: qrcode::types::QrError) -> Self {
        ExportError::QrCode(err.to_string())
    }
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
