use thiserror::Error;

/// # Summary
/// 渲染与编码域错误枚举。
///
/// # Invariants
/// - 不重试、不吞掉：任意一帧失败即终止整个批次。
#[derive(Error, Debug)]
pub enum RenderError {
    // 调度参数非法
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    // 单帧渲染失败
    #[error("Rendering failure on frame {frame}: {message}")]
    Rendering { frame: usize, message: String },
    // 视频编码失败
    #[error("Encoding failure: {0}")]
    Encoding(String),
    // 目录或文件操作失败
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError::Io(e.to_string())
    }
}
