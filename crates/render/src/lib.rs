pub mod chart;
pub mod ffmpeg;
pub mod svg;
