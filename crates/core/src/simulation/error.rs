use thiserror::Error;

/// # Summary
/// 模拟与采样域错误枚举。
///
/// # Invariants
/// - 输入错误立即返回给调用方，不做任何重试。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    // 价格序列为空或非法、定投金额非正、帧数非正等
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
