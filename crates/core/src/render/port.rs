use crate::render::entity::EncodeSettings;
use crate::render::error::RenderError;
use crate::simulation::entity::SimulationRow;
use async_trait::async_trait;
use std::path::Path;

/// # Summary
/// 单帧渲染能力接口 (Port)，按行类型参数化：定投增长动画使用 `SimulationRow`，
/// 一次性投入对比动画使用 `ComparisonRow`。
///
/// # Invariants
/// - 实现类必须保证线程安全 (`Send` + `Sync`)，批次驱动器会在多个工作线程上并发调用。
/// - 只读访问传入的前缀，不得依赖调用顺序。
pub trait FrameRenderer<R = SimulationRow>: Send + Sync {
    /// # Summary
    /// 将结果表前缀渲染为一张图片并写入 `path`。
    ///
    /// # Arguments
    /// * `rows`: 结果表的前缀（至少一行）。
    /// * `frame_index`: 帧序号（从 1 开始）。
    /// * `path`: 目标文件路径。
    ///
    /// # Returns
    /// 成功返回 `Ok(())`，失败返回 `RenderError::Rendering`。
    fn render(&self, rows: &[R], frame_index: usize, path: &Path) -> Result<(), RenderError>;
}

/// # Summary
/// 视频编码能力接口 (Port)。
///
/// # Invariants
/// - 按文件名排序消费目录中的帧。
/// - 编码失败必须返回错误，不得静默成功。
#[async_trait]
pub trait VideoEncoder: Send + Sync {
    /// # Summary
    /// 将帧目录编码为单个视频文件。
    ///
    /// # Arguments
    /// * `frames_dir`: 帧所在目录。
    /// * `output`: 视频输出路径。
    /// * `settings`: 帧率与编码器。
    ///
    /// # Returns
    /// 成功返回 `Ok(())`，失败返回 `RenderError::Encoding`。
    async fn encode(
        &self,
        frames_dir: &Path,
        output: &Path,
        settings: &EncodeSettings,
    ) -> Result<(), RenderError>;
}
