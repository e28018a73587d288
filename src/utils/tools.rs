use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use regex::Regex;
use semver::Version;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Oldest ffmpeg known to handle every option the pipeline passes
pub const MIN_FFMPEG_VERSION: Version = Version::new(4, 0, 0);

/// Resolves `name` from an explicit override or PATH.
///
/// Falls back to the bare name so a missing binary surfaces as a stage
/// failure on first use rather than a startup failure.
pub fn locate_tool(name: &str, override_path: Option<&Path>) -> PathBuf {
    if let Some(path) = override_path {
        info!("Using {} from configuration: {}", name, path.display());
        return path.to_path_buf();
    }

    match which::which(name) {
        Ok(path) => {
            info!("Found {} at {}", name, path.display());
            path
        }
        Err(e) => {
            warn!("{} not found in PATH ({}); media operations will fail until it is installed", name, e);
            PathBuf::from(name)
        }
    }
}

/// Locate ffmpeg and log its version
pub fn discover_ffmpeg(override_path: Option<&Path>) -> PathBuf {
    let path = locate_tool("ffmpeg", override_path);
    match check_ffmpeg_version(&path) {
        Ok(version) if version < MIN_FFMPEG_VERSION => {
            warn!("FFmpeg {} is older than {}", version, MIN_FFMPEG_VERSION);
        }
        Ok(version) => info!("FFmpeg version: {}", version),
        Err(e) => warn!("Could not determine ffmpeg version: {}", e),
    }
    path
}

/// Check ffmpeg version
pub fn check_ffmpeg_version(path: &Path) -> Result<Version> {
    let output = Command::new(path)
        .args(["-version"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .context("Failed to execute ffmpeg")?;

    if output.status.success() {
        parse_ffmpeg_version(&String::from_utf8_lossy(&output.stdout))
    } else {
        Err(anyhow!("Failed to get ffmpeg version"))
    }
}

fn parse_ffmpeg_version(version_output: &str) -> Result<Version> {
    let re = Regex::new(r"ffmpeg version n?(\d+\.\d+(?:\.\d+)?)")?;
    if let Some(caps) = re.captures(version_output) {
        let version = caps.get(1).map_or("", |m| m.as_str());
        let parts: Vec<&str> = version.split('.').collect();
        let version_str = match parts.len() {
            1 => format!("{}.0.0", parts[0]),
            2 => format!("{}.{}.0", parts[0], parts[1]),
            _ => version.to_string(),
        };
        Ok(Version::parse(&version_str)?)
    } else {
        // git builds report e.g. "ffmpeg version N-113000-g1234"
        debug!("Could not parse ffmpeg version, using default");
        Ok(MIN_FFMPEG_VERSION)
    }
}
