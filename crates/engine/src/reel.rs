use crate::sampler::frame_schedule;
use sipreel_core::render::entity::{EncodeSettings, FrameJob, FrameSchedule};
use sipreel_core::render::error::RenderError;
use sipreel_core::render::port::{FrameRenderer, VideoEncoder};
use sipreel_core::simulation::entity::SimulationRow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::{Id, JoinSet};
use tracing::{debug, info, warn};

/// # Summary
/// 一次成片的产物。
#[derive(Debug, Clone)]
pub struct ReelOutput {
    // 按帧序号排序的帧文件
    pub frames: Vec<PathBuf>,
    pub video: PathBuf,
}

/// # Summary
/// ReelDriver：成片驱动器，负责把结果表切分为帧任务、并发渲染、最后交给编码器。
/// 行类型 `R` 决定动画内容（定投增长或一次性投入对比）。
///
/// # Invariants
/// - 每个帧任务在派发时即携带显式帧序号，文件名与完成顺序无关。
/// - 工作池有界：同时运行的渲染任务不超过 `workers`。
/// - 任意一帧失败即中止整个批次并返回首个错误，不会继续编码。
/// - 已经开始执行的阻塞渲染无法被 abort，会在后台运行至结束；
///   因此批次失败后帧目录中仍可能出现新写入的帧，下一次运行前会被清空。
pub struct ReelDriver<R = SimulationRow> {
    renderer: Arc<dyn FrameRenderer<R>>,
    encoder: Arc<dyn VideoEncoder>,
    workers: usize,
}

impl<R: Send + Sync + 'static> ReelDriver<R> {
    /// # Summary
    /// 创建一个新的成片驱动器实例
    ///
    /// # Arguments
    /// * `renderer`: 单帧渲染实现。
    /// * `encoder`: 视频编码实现。
    /// * `workers`: 并发渲染上限，0 按 1 处理。
    pub fn new(
        renderer: Arc<dyn FrameRenderer<R>>,
        encoder: Arc<dyn VideoEncoder>,
        workers: usize,
    ) -> Self {
        Self {
            renderer,
            encoder,
            workers: workers.max(1),
        }
    }

    /// # Summary
    /// 渲染并编码完整的成片。
    ///
    /// # Logic
    /// 1. 根据结果表行数与目标帧数生成截断点。
    /// 2. 清空帧目录并并发渲染全部帧。
    /// 3. 调用编码器把帧目录编码为视频。
    pub async fn run(
        &self,
        rows: Arc<[R]>,
        num_frames: usize,
        frames_dir: &Path,
        output: &Path,
        settings: &EncodeSettings,
    ) -> Result<ReelOutput, RenderError> {
        let schedule = frame_schedule(rows.len(), num_frames)
            .map_err(|e| RenderError::InvalidInput(e.to_string()))?;

        let frames = self.render_frames(rows, &schedule, frames_dir).await?;

        info!(
            "Encoding {} frames from {} into {} at {} fps",
            frames.len(),
            frames_dir.display(),
            output.display(),
            settings.fps
        );
        self.encoder.encode(frames_dir, output, settings).await?;
        info!("Reel saved to {}", output.display());

        Ok(ReelOutput {
            frames,
            video: output.to_path_buf(),
        })
    }

    /// # Summary
    /// 按截断点并发渲染全部帧。
    ///
    /// # Logic
    /// 1. 校验截断点均落在 `[1, n]` 内。
    /// 2. 删除并重建帧目录（目录原有内容会被直接删除）。
    /// 3. 以 `JoinSet` 作为有界工作池，每个任务在阻塞线程上渲染一个前缀，
    ///    任务 Id 到帧序号的映射保证 worker panic 时也能报告正确的帧。
    /// 4. 收到首个失败立即 abort 尚未开始的任务并返回。
    ///
    /// # Returns
    /// 按帧序号排序的帧文件路径。
    pub async fn render_frames(
        &self,
        rows: Arc<[R]>,
        schedule: &FrameSchedule,
        frames_dir: &Path,
    ) -> Result<Vec<PathBuf>, RenderError> {
        if schedule.is_empty() {
            return Err(RenderError::InvalidInput("frame schedule is empty".to_string()));
        }
        if let Some(bad) = schedule
            .cut_points()
            .iter()
            .find(|&&k| k == 0 || k > rows.len())
        {
            return Err(RenderError::InvalidInput(format!(
                "cut point {bad} outside [1, {}]",
                rows.len()
            )));
        }

        reset_dir(frames_dir).await?;
        info!(
            "Rendering {} frames into {} with {} workers",
            schedule.len(),
            frames_dir.display(),
            self.workers
        );

        let mut pending = schedule.jobs().into_iter();
        let mut join_set: JoinSet<Result<PathBuf, RenderError>> = JoinSet::new();
        let mut in_flight: HashMap<Id, usize> = HashMap::new();
        let mut rendered: Vec<(usize, PathBuf)> = Vec::with_capacity(schedule.len());

        loop {
            while join_set.len() < self.workers {
                let Some(job) = pending.next() else {
                    break;
                };
                let id = self.spawn_job(&mut join_set, rows.clone(), job, frames_dir);
                in_flight.insert(id, job.frame_index);
            }

            let Some(joined) = join_set.join_next_with_id().await else {
                break;
            };

            match joined {
                Ok((id, Ok(path))) => {
                    let index = in_flight.remove(&id).unwrap_or_default();
                    debug!("Saved frame {}: {}", index, path.display());
                    rendered.push((index, path));
                }
                Ok((id, Err(e))) => {
                    let index = in_flight.remove(&id).unwrap_or_default();
                    warn!("Frame {} failed, aborting batch: {}", index, e);
                    join_set.abort_all();
                    return Err(e);
                }
                Err(join_err) => {
                    let index = in_flight.remove(&join_err.id()).unwrap_or_default();
                    warn!("Render worker for frame {} crashed, aborting batch: {}", index, join_err);
                    join_set.abort_all();
                    return Err(RenderError::Rendering {
                        frame: index,
                        message: join_err.to_string(),
                    });
                }
            }
        }

        rendered.sort_by_key(|(index, _)| *index);
        info!("Generated {} frames in {}", rendered.len(), frames_dir.display());
        Ok(rendered.into_iter().map(|(_, path)| path).collect())
    }

    fn spawn_job(
        &self,
        join_set: &mut JoinSet<Result<PathBuf, RenderError>>,
        rows: Arc<[R]>,
        job: FrameJob,
        frames_dir: &Path,
    ) -> Id {
        let renderer = self.renderer.clone();
        let path = frames_dir.join(job.file_name());
        join_set
            .spawn_blocking(move || {
                let prefix = rows.get(..job.cut_point).ok_or_else(|| RenderError::Rendering {
                    frame: job.frame_index,
                    message: format!("cut point {} exceeds {} rows", job.cut_point, rows.len()),
                })?;
                renderer.render(prefix, job.frame_index, &path)?;
                Ok(path)
            })
            .id()
    }
}

/// 删除并重建目录
async fn reset_dir(dir: &Path) -> Result<(), RenderError> {
    if tokio::fs::try_exists(dir).await? {
        debug!("Clearing frame directory {}", dir.display());
        tokio::fs::remove_dir_all(dir).await?;
    }
    tokio::fs::create_dir_all(dir).await?;
    Ok(())
}
