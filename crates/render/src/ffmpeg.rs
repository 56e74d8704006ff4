use async_trait::async_trait;
use sipreel_core::render::entity::{EncodeSettings, FRAME_EXTENSION};
use sipreel_core::render::error::RenderError;
use sipreel_core::render::port::VideoEncoder;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

// 错误信息中保留的 stderr 末尾行数
const STDERR_TAIL_LINES: usize = 20;

/// # Summary
/// 基于系统 `ffmpeg` 的视频编码器。
///
/// # Invariants
/// - `ffmpeg` 必须在 PATH 中（或通过 `with_binary` 指定），且需支持 SVG 解码 (librsvg)。
/// - 帧按文件名字典序读取，帧文件名的零填充保证其与帧序号一致。
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    binary: PathBuf,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("ffmpeg"),
        }
    }
}

impl FfmpegEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Summary
    /// 使用指定路径的 ffmpeg 可执行文件。
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// # Summary
    /// 构建 ffmpeg 命令行参数。
    ///
    /// # Logic
    /// 使用 glob 模式读取 `{frames_dir}/*.svg`，输出 yuv420p 像素格式且不含音轨，`-y` 覆盖已有输出。
    pub fn command_args(
        frames_dir: &Path,
        output: &Path,
        settings: &EncodeSettings,
    ) -> Vec<OsString> {
        let pattern = frames_dir.join(format!("*.{FRAME_EXTENSION}"));
        let fps = settings.fps.to_string();
        let mut args: Vec<OsString> = ["-y", "-framerate", fps.as_str(), "-pattern_type", "glob", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(pattern.into_os_string());
        args.extend(
            ["-c:v", settings.codec.as_str(), "-pix_fmt", "yuv420p", "-an"]
                .into_iter()
                .map(OsString::from),
        );
        args.push(output.as_os_str().to_os_string());
        args
    }
}

/// 统计目录中的帧文件数量
async fn count_frames(frames_dir: &Path) -> Result<usize, RenderError> {
    let mut entries = tokio::fs::read_dir(frames_dir).await.map_err(|e| {
        RenderError::Encoding(format!(
            "cannot read frames directory {}: {}",
            frames_dir.display(),
            e
        ))
    })?;

    let mut count = 0usize;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == FRAME_EXTENSION) {
            count += 1;
        }
    }
    Ok(count)
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

#[async_trait]
impl VideoEncoder for FfmpegEncoder {
    /// # Summary
    /// 将帧目录编码为视频文件。
    ///
    /// # Logic
    /// 1. 目录中至少要有一帧，否则直接报错。
    /// 2. 创建输出文件的父目录。
    /// 3. 运行 ffmpeg 并等待退出；启动失败或非零退出码均映射为 `RenderError::Encoding`，并附带 stderr。
    async fn encode(
        &self,
        frames_dir: &Path,
        output: &Path,
        settings: &EncodeSettings,
    ) -> Result<(), RenderError> {
        let frames = count_frames(frames_dir).await?;
        if frames == 0 {
            return Err(RenderError::Encoding(format!(
                "no .{} frames found in {}",
                FRAME_EXTENSION,
                frames_dir.display()
            )));
        }

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let args = Self::command_args(frames_dir, output, settings);
        debug!("Running {} {:?}", self.binary.display(), args);

        let result = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                RenderError::Encoding(format!(
                    "failed to start {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        if !result.status.success() {
            return Err(RenderError::Encoding(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                result.status,
                stderr_tail(&result.stderr)
            )));
        }

        info!(
            "Encoded {} frames at {} fps into {}",
            frames,
            settings.fps,
            output.display()
        );
        Ok(())
    }
}
