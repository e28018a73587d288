use async_trait::async_trait;
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::errors::{AppError, AppResult};
use crate::models::VideoDimensions;

/// One invocation of the transcoder: inputs, filter graph, codec options, output.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeJob {
    pub inputs: Vec<PathBuf>,
    /// Passed as `-vf`
    pub video_filter: Option<String>,
    /// Stream mapping and codec flags, in order
    pub options: Vec<String>,
    /// Passed as `-t` (seconds)
    pub duration: Option<f64>,
    pub output: PathBuf,
}

impl TranscodeJob {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            inputs: Vec::new(),
            video_filter: None,
            options: Vec::new(),
            duration: None,
            output: output.into(),
        }
    }

    pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
        self.inputs.push(path.into());
        self
    }

    pub fn video_filter(mut self, filter: impl Into<String>) -> Self {
        self.video_filter = Some(filter.into());
        self
    }

    pub fn option(mut self, flag: &str, value: &str) -> Self {
        self.options.push(flag.to_string());
        self.options.push(value.to_string());
        self
    }

    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// ffmpeg argument vector (without the program name)
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["-y".to_string()];
        for input in &self.inputs {
            args.push("-i".to_string());
            args.push(input.to_string_lossy().into_owned());
        }
        if let Some(filter) = &self.video_filter {
            args.push("-vf".to_string());
            args.push(filter.clone());
        }
        args.extend(self.options.iter().cloned());
        if let Some(duration) = self.duration {
            args.push("-t".to_string());
            args.push(format!("{:.3}", duration));
        }
        args.push(self.output.to_string_lossy().into_owned());
        args
    }
}

/// External media utility: stream inspection plus transcoding.
#[async_trait]
pub trait MediaTool: Send + Sync {
    async fn probe(&self, path: &Path) -> AppResult<VideoDimensions>;

    async fn transcode(&self, job: &TranscodeJob) -> AppResult<()>;
}

/// `MediaTool` backed by the ffmpeg / ffprobe binaries
#[derive(Debug, Clone)]
pub struct FfmpegTool {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl FfmpegTool {
    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }
}

#[async_trait]
impl MediaTool for FfmpegTool {
    async fn probe(&self, path: &Path) -> AppResult<VideoDimensions> {
        let output = Command::new(&self.ffprobe)
            .args([
                "-v", "error",
                "-select_streams", "v:0",
                "-show_entries", "stream=width,height",
                "-of", "csv=s=x:p=0",
            ])
            .arg(path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("ffprobe failed on {}: {}", path.display(), stderr.trim());
            return Err(AppError::MediaTool(format!(
                "ffprobe exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let dims = parse_resolution(&String::from_utf8_lossy(&output.stdout))?;
        debug!("Probed {}: {}x{}", path.display(), dims.width, dims.height);
        Ok(dims)
    }

    async fn transcode(&self, job: &TranscodeJob) -> AppResult<()> {
        let args = job.to_args();
        debug!("Executing {} {}", self.ffmpeg.display(), args.join(" "));

        let output = Command::new(&self.ffmpeg)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("ffmpeg error: {}", stderr.trim());
            return Err(AppError::MediaTool(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                last_lines(&stderr, 5)
            )));
        }

        info!("ffmpeg wrote {}", job.output.display());
        Ok(())
    }
}

/// Parses ffprobe's `WIDTHxHEIGHT` csv line
fn parse_resolution(raw: &str) -> AppResult<VideoDimensions> {
    let line = raw.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    let parts: Vec<&str> = line.trim_end_matches('x').split('x').collect();

    if parts.len() != 2 {
        return Err(AppError::MediaTool(format!(
            "Failed to parse video resolution: {:?}",
            raw.trim()
        )));
    }

    let width = parts[0]
        .parse::<u32>()
        .map_err(|_| AppError::MediaTool(format!("Failed to parse video width: {}", parts[0])))?;
    let height = parts[1]
        .parse::<u32>()
        .map_err(|_| AppError::MediaTool(format!("Failed to parse video height: {}", parts[1])))?;

    if width == 0 || height == 0 {
        return Err(AppError::MediaTool(format!("Invalid video resolution {}x{}", width, height)));
    }

    Ok(VideoDimensions::new(width, height))
}

fn last_lines(text: &str, count: usize) -> String {
    let lines: Vec<&str> = text.trim().lines().collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].join("\n")
}
