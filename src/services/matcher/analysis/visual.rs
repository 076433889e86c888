//! Visual similarity between a prompt's reference image and a candidate's
//! first frame (images decode directly, videos go through `ffmpeg`).
//!
//! Frames are decoded once per run into a `VisualIndex`, converted to
//! grayscale and resized to a fixed square. Window statistics are kept
//! per frame so each pair only pays for the covariance pass.

use image::{imageops::FilterType, GrayImage};
use rayon::prelude::*;
use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::services::config::VisualConfig;
use crate::services::matcher::analysis::strategies::ScoringStrategy;
use crate::services::matcher::{AssetHandle, CandidateFile, MatchStrategy, Prompt};
use crate::types::errors::{MatchError, MatchResult};

/// Extensions decoded through `ffmpeg` instead of the image decoder.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "webm", "mkv", "avi", "m4v"];

const SSIM_WINDOW: u32 = 8;
const SSIM_STRIDE: u32 = 4;
const SSIM_C1: f64 = (0.01 * 255.0) * (0.01 * 255.0);
const SSIM_C2: f64 = (0.03 * 255.0) * (0.03 * 255.0);

/// Decode image bytes into a grayscale `size`×`size` frame.
pub fn prepare_frame(bytes: &[u8], size: u32) -> MatchResult<GrayImage> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| MatchError::Decode(format!("Invalid image data: {e}")))?;
    let gray = decoded.to_luma8();
    Ok(image::imageops::resize(&gray, size, size, FilterType::Triangle))
}

pub fn is_video_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
}

/// Decode the first frame of a candidate (first video frame, or the image itself).
pub fn decode_candidate_frame(
    candidate: &CandidateFile,
    config: &VisualConfig,
) -> MatchResult<GrayImage> {
    let bytes = if is_video_name(&candidate.original_name) {
        extract_first_frame(&candidate.handle, &candidate.original_name, &config.ffmpeg_path)?
    } else {
        candidate
            .handle
            .read_bytes()
            .map_err(|e| MatchError::io(&candidate.original_name, e))?
            .to_vec()
    };
    prepare_frame(&bytes, config.frame_size)
}

/// Run `ffmpeg` to grab frame 0 as PNG bytes.
pub fn extract_first_frame(handle: &AssetHandle, name: &str, ffmpeg: &str) -> MatchResult<Vec<u8>> {
    // In-memory uploads need a real file for the demuxer to seek in.
    let mut spooled = None;
    let input = match handle {
        AssetHandle::Path(path) => path.clone(),
        AssetHandle::Memory(bytes) => {
            let suffix = Path::new(name)
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_default();
            let mut file = tempfile::Builder::new()
                .suffix(&suffix)
                .tempfile()
                .map_err(|e| MatchError::io(name, e))?;
            file.write_all(bytes).map_err(|e| MatchError::io(name, e))?;
            let path = file.path().to_path_buf();
            spooled = Some(file);
            path
        }
    };

    let output = Command::new(ffmpeg)
        .arg("-v")
        .arg("error")
        .arg("-i")
        .arg(&input)
        .args(["-frames:v", "1", "-f", "image2pipe", "-vcodec", "png", "-"])
        .stdin(Stdio::null())
        .output()
        .map_err(|error| {
            if error.kind() == ErrorKind::NotFound {
                MatchError::Decode(format!("ffmpeg executable not found (resolved_path={ffmpeg})"))
            } else {
                MatchError::Decode(format!("Failed to spawn ffmpeg for {name}: {error}"))
            }
        })?;
    drop(spooled);

    if !output.status.success() || output.stdout.is_empty() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MatchError::Decode(format!(
            "ffmpeg could not extract a frame from {name} (status {}): {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(output.stdout)
}

/// Fetch reference image bytes from an `http(s)://` URL, `file://` URL or local path.
pub fn load_reference(reference: &str) -> MatchResult<Vec<u8>> {
    let reference = reference.trim();
    if reference.starts_with("http://") || reference.starts_with("https://") {
        let response = reqwest::blocking::get(reference)
            .and_then(|r| r.error_for_status())
            .map_err(|e| MatchError::Decode(format!("Failed to fetch {reference}: {e}")))?;
        let bytes = response
            .bytes()
            .map_err(|e| MatchError::Decode(format!("Failed to read {reference}: {e}")))?;
        return Ok(bytes.to_vec());
    }

    let path = reference.strip_prefix("file://").unwrap_or(reference);
    std::fs::read(path).map_err(|e| MatchError::io(path, e))
}

/// Per-window luminance statistics, computed once per frame.
#[derive(Debug, Clone, Copy)]
struct WindowStats {
    x: u32,
    y: u32,
    mean: f64,
    var: f64,
}

/// A prepared grayscale frame with its SSIM window means and variances.
#[derive(Debug, Clone)]
pub struct Frame {
    pixels: GrayImage,
    win_w: u32,
    win_h: u32,
    windows: Vec<WindowStats>,
}

impl Frame {
    pub fn new(pixels: GrayImage) -> Self {
        let (width, height) = pixels.dimensions();
        let win_w = SSIM_WINDOW.min(width);
        let win_h = SSIM_WINDOW.min(height);
        let mut windows = Vec::new();

        if width > 0 && height > 0 {
            let n = f64::from(win_w * win_h);
            for y in (0..=height - win_h).step_by(SSIM_STRIDE as usize) {
                for x in (0..=width - win_w).step_by(SSIM_STRIDE as usize) {
                    let mut sum = 0.0;
                    for py in y..y + win_h {
                        for px in x..x + win_w {
                            sum += f64::from(pixels.get_pixel(px, py).0[0]);
                        }
                    }
                    let mean = sum / n;
                    let mut var = 0.0;
                    for py in y..y + win_h {
                        for px in x..x + win_w {
                            let d = f64::from(pixels.get_pixel(px, py).0[0]) - mean;
                            var += d * d;
                        }
                    }
                    windows.push(WindowStats {
                        x,
                        y,
                        mean,
                        var: var / n,
                    });
                }
            }
        }

        Self {
            pixels,
            win_w,
            win_h,
            windows,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Mean structural similarity over sliding windows, clamped to `[0, 1]`.
    ///
    /// Both frames must have equal dimensions; mismatched frames score 0.
    /// Only the cross-covariance is computed per pair.
    pub fn ssim(&self, other: &Frame) -> f64 {
        if self.dimensions() != other.dimensions() || self.windows.is_empty() {
            return 0.0;
        }
        let n = f64::from(self.win_w * self.win_h);

        let total: f64 = self
            .windows
            .iter()
            .zip(&other.windows)
            .map(|(a, b)| {
                let mut cov = 0.0;
                for py in a.y..a.y + self.win_h {
                    for px in a.x..a.x + self.win_w {
                        let da = f64::from(self.pixels.get_pixel(px, py).0[0]) - a.mean;
                        let db = f64::from(other.pixels.get_pixel(px, py).0[0]) - b.mean;
                        cov += da * db;
                    }
                }
                cov /= n;
                ((2.0 * a.mean * b.mean + SSIM_C1) * (2.0 * cov + SSIM_C2))
                    / ((a.mean * a.mean + b.mean * b.mean + SSIM_C1) * (a.var + b.var + SSIM_C2))
            })
            .sum();

        (total / self.windows.len() as f64).clamp(0.0, 1.0)
    }
}

/// Frames decoded for one run, keyed by prompt sequence index / candidate id.
#[derive(Debug, Default)]
pub struct VisualIndex {
    pub prompt_frames: HashMap<usize, Frame>,
    pub candidate_frames: HashMap<usize, Frame>,
}

impl VisualIndex {
    pub fn build(prompts: &[Prompt], candidates: &[CandidateFile], config: &VisualConfig) -> Self {
        let prompt_frames = prompts
            .par_iter()
            .filter_map(|prompt| {
                let reference = prompt.reference.as_deref()?;
                match load_reference(reference).and_then(|b| prepare_frame(&b, config.frame_size)) {
                    Ok(frame) => Some((prompt.sequence_index, Frame::new(frame))),
                    Err(e) => {
                        log::warn!(
                            "Reference for prompt {} unusable: {e}",
                            prompt.sequence_index
                        );
                        None
                    }
                }
            })
            .collect::<HashMap<_, _>>();

        // Nothing to compare against: skip decoding candidates entirely.
        if prompt_frames.is_empty() {
            log::info!("No usable reference images; visual scoring disabled for this run");
            return Self::default();
        }

        let candidate_frames = candidates
            .par_iter()
            .filter_map(|candidate| match decode_candidate_frame(candidate, config) {
                Ok(frame) => Some((candidate.id, Frame::new(frame))),
                Err(e) => {
                    log::warn!("Skipping {} for visual scoring: {e}", candidate.original_name);
                    None
                }
            })
            .collect();

        Self {
            prompt_frames,
            candidate_frames,
        }
    }
}

/// SSIM of reference image vs first frame, gated by `threshold`.
#[derive(Debug)]
pub struct VisualStrategy {
    config: VisualConfig,
    index: VisualIndex,
}

impl VisualStrategy {
    pub fn new(config: VisualConfig) -> Self {
        Self {
            config,
            index: VisualIndex::default(),
        }
    }
}

impl ScoringStrategy for VisualStrategy {
    fn tier(&self) -> MatchStrategy {
        MatchStrategy::Visual
    }

    fn evaluate(&self, prompt: &Prompt, candidate: &CandidateFile) -> Option<f64> {
        let reference = self.index.prompt_frames.get(&prompt.sequence_index)?;
        let frame = self.index.candidate_frames.get(&candidate.id)?;
        Some(reference.ssim(frame))
    }

    fn accepts(&self, score: f64) -> bool {
        score >= self.config.threshold
    }

    fn can_score(&self, candidate: &CandidateFile) -> bool {
        self.index.candidate_frames.contains_key(&candidate.id)
    }

    fn prepare(&mut self, prompts: &[Prompt], candidates: &[CandidateFile]) {
        self.index = VisualIndex::build(prompts, candidates, &self.config);
        log::info!(
            "Visual index ready: {} reference(s), {}/{} frame(s) decoded",
            self.index.prompt_frames.len(),
            self.index.candidate_frames.len(),
            candidates.len()
        );
    }
}

#[cfg(test)]
#[path = "../tests/analysis/visual_tests.rs"]
mod tests;
