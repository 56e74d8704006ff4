use sipreel_core::render::entity::EncodeSettings;
use sipreel_core::render::error::RenderError;
use sipreel_core::render::port::VideoEncoder;
use sipreel_render::ffmpeg::FfmpegEncoder;
use std::ffi::OsString;
use std::path::Path;

fn write_frames(dir: &Path, count: usize) {
    for i in 1..=count {
        std::fs::write(dir.join(format!("frame_{i:03}.svg")), "<svg/>").unwrap();
    }
}

#[test]
fn test_command_uses_glob_over_svg_frames() {
    let settings = EncodeSettings {
        fps: 24,
        codec: "libx265".to_string(),
    };
    let args = FfmpegEncoder::command_args(Path::new("frames"), Path::new("out.mp4"), &settings);
    let expected: Vec<OsString> = [
        "-y",
        "-framerate",
        "24",
        "-pattern_type",
        "glob",
        "-i",
        Path::new("frames").join("*.svg").to_str().unwrap(),
        "-c:v",
        "libx265",
        "-pix_fmt",
        "yuv420p",
        "-an",
        "out.mp4",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    assert_eq!(args, expected);
}

#[tokio::test]
async fn test_empty_directory_is_an_encoding_error() {
    let dir = tempfile::tempdir().unwrap();
    // 非帧文件不计入
    std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

    let err = FfmpegEncoder::new()
        .encode(dir.path(), &dir.path().join("out.mp4"), &EncodeSettings::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RenderError::Encoding(msg) if msg.contains("no .svg frames")));
}

#[tokio::test]
async fn test_missing_binary_is_an_encoding_error() {
    let dir = tempfile::tempdir().unwrap();
    write_frames(dir.path(), 2);

    let err = FfmpegEncoder::with_binary("/nonexistent/bin/ffmpeg")
        .encode(dir.path(), &dir.path().join("out.mp4"), &EncodeSettings::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RenderError::Encoding(msg) if msg.contains("failed to start")));
}

#[cfg(unix)]
fn fake_ffmpeg(dir: &Path, script: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-ffmpeg");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
#[tokio::test]
async fn test_non_zero_exit_carries_stderr() {
    let bin_dir = tempfile::tempdir().unwrap();
    let frames = tempfile::tempdir().unwrap();
    write_frames(frames.path(), 3);
    let binary = fake_ffmpeg(
        bin_dir.path(),
        "#!/bin/sh\necho 'No decoder for codec svg' >&2\nexit 1\n",
    );

    let err = FfmpegEncoder::with_binary(binary)
        .encode(
            frames.path(),
            &frames.path().join("out.mp4"),
            &EncodeSettings::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RenderError::Encoding(msg) if msg.contains("No decoder for codec svg")));
}

#[cfg(unix)]
#[tokio::test]
async fn test_successful_encode_creates_output_directory() -> anyhow::Result<()> {
    let bin_dir = tempfile::tempdir()?;
    let frames = tempfile::tempdir()?;
    write_frames(frames.path(), 3);
    // 最后一个参数是输出路径
    let binary = fake_ffmpeg(
        bin_dir.path(),
        "#!/bin/sh\nfor last; do :; done\ntouch \"$last\"\n",
    );

    let output = frames.path().join("video").join("reel.mp4");
    FfmpegEncoder::with_binary(binary)
        .encode(frames.path(), &output, &EncodeSettings::default())
        .await?;
    assert!(output.exists());
    Ok(())
}
