use serde::{Deserialize, Serialize};

/// Default parameter suffixes appended by image/video generators.
pub const DEFAULT_NOISE_SUFFIXES: &[&str] = &[
    "--ar 16:9",
    "--ar 9:16",
    "--ar 1:1",
    "--ar 4:3",
    "--ar 3:2",
    "--v 6",
    "--v 6.1",
    "--style raw",
    "___ar_16:9___v_6___style_raw",
];

/// Default asset extensions picked up by the scanner.
pub const DEFAULT_ASSET_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "webp", "gif", "mp4", "mov", "webm", "mkv",
];

/// Character-level similarity used by the fuzzy tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuzzyMetric {
    /// Ratcliff/Obershelp longest-matching-blocks ratio.
    SequenceRatio,
    /// Normalized Levenshtein distance (older renamer variant).
    Levenshtein,
}

/// Where the visual tier sits in the strategy ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualMode {
    /// Visual scoring disabled.
    Off,
    /// Appended after the text strategies.
    Fallback,
    /// Visual scoring only (video matching against reference stills).
    Only,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct VisualConfig {
    pub mode: VisualMode,
    pub threshold: f64,
    /// Square edge both frames are resized to before SSIM.
    pub frame_size: u32,
    pub ffmpeg_path: String,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            mode: VisualMode::Off,
            threshold: 0.5,
            frame_size: 256,
            ffmpeg_path: "ffmpeg".into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DecomposeConfig {
    pub author_pattern: String,
    pub min_segments_for_prefix: usize,
    pub min_prefix_len: usize,
}

impl Default for DecomposeConfig {
    fn default() -> Self {
        Self {
            author_pattern: "^[A-Za-z0-9]+$".into(),
            min_segments_for_prefix: 3,
            min_prefix_len: 3,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EmitOptions {
    /// Prepended to every target name (sanitized).
    pub prefix: String,
    /// Used when the matched file has no extension.
    pub default_extension: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            default_extension: "png".into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ScanOptions {
    pub extensions: Vec<String>,
    pub recursive: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_ASSET_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            recursive: false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MatchConfig {
    pub fuzzy_threshold: f64,
    pub fuzzy_metric: FuzzyMetric,
    pub noise_suffixes: Vec<String>,
    pub decompose: DecomposeConfig,
    pub visual: VisualConfig,
    pub emit: EmitOptions,
    pub scan: ScanOptions,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.85,
            fuzzy_metric: FuzzyMetric::SequenceRatio,
            noise_suffixes: DEFAULT_NOISE_SUFFIXES
                .iter()
                .map(|suffix| suffix.to_string())
                .collect(),
            decompose: DecomposeConfig::default(),
            visual: VisualConfig::default(),
            emit: EmitOptions::default(),
            scan: ScanOptions::default(),
        }
    }
}
