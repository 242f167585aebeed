use serde::{Deserialize, Serialize};
use std::fmt;

/// Upload failure taxonomy. Every variant is surfaced to the caller as
/// HTTP 400 with the user-facing message below; there is no partial success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppError {
    /// No `file` field in the multipart form.
    MissingFile,
    /// A `file` field was sent but no file was chosen.
    EmptySelection,
    /// Legacy binary workbook (.xls); only .xlsx is supported.
    UnsupportedFormat,
    /// The workbook could not be decoded; carries the underlying cause.
    ParseError(String),
    /// The workbook decoded successfully but holds zero data rows.
    EmptyTable,
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MissingFile => write!(f, "未找到上传的文件"),
            AppError::EmptySelection => write!(f, "请选择要上传的 Excel 文件"),
            AppError::UnsupportedFormat => {
                write!(f, "暂不支持该类型的 Excel 文件，请使用 .xlsx 格式")
            }
            AppError::ParseError(msg) => write!(f, "解析 Excel 失败: {}", msg),
            AppError::EmptyTable => write!(f, "Excel 文件为空"),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
