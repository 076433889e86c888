use super::*;
use crate::services::config::MatchConfig;
use crate::test_utils::{init_test_logger, png_bytes};
use crate::services::matcher::build_candidates;
use std::sync::Arc;

fn gradient(x: u32, y: u32) -> u8 {
    ((x * 3 + y * 5) % 256) as u8
}

fn checker(x: u32, y: u32) -> u8 {
    if (x / 4 + y / 4) % 2 == 0 {
        0
    } else {
        255
    }
}

fn frame(size: u32, frame_size: u32, shade: fn(u32, u32) -> u8) -> Frame {
    Frame::new(prepare_frame(&png_bytes(size, shade), frame_size).unwrap())
}

#[test]
fn test_ssim_identical_frames_is_one() {
    let a = frame(64, 32, gradient);
    assert!((a.ssim(&a) - 1.0).abs() < 1e-9);
}

#[test]
fn test_ssim_different_frames_is_lower() {
    let a = frame(64, 32, gradient);
    let b = frame(64, 32, checker);
    let value = a.ssim(&b);
    assert!(value < 0.5, "ssim was {value}");
    assert!(value >= 0.0);
    assert!((value - b.ssim(&a)).abs() < 1e-12);
}

#[test]
fn test_ssim_mismatched_dimensions_is_zero() {
    let a = frame(16, 16, gradient);
    let b = frame(16, 32, gradient);
    assert_eq!(a.ssim(&b), 0.0);
}

#[test]
fn test_frame_precomputes_window_stats() {
    // 32px with an 8px window at stride 4: 7 positions per axis.
    let a = frame(64, 32, gradient);
    assert_eq!(a.windows.len(), 49);

    let flat = Frame::new(GrayImage::from_pixel(16, 16, image::Luma([200])));
    assert!(flat.windows.iter().all(|w| (w.mean - 200.0).abs() < 1e-9 && w.var == 0.0));
}

#[test]
fn test_prepare_frame_resizes_to_square() {
    let frame = prepare_frame(&png_bytes(40, gradient), 256).unwrap();
    assert_eq!(frame.dimensions(), (256, 256));
}

#[test]
fn test_prepare_frame_rejects_garbage() {
    let err = prepare_frame(b"definitely not an image", 32).unwrap_err();
    assert!(matches!(err, MatchError::Decode(_)));
}

#[test]
fn test_is_video_name() {
    assert!(is_video_name("clip_01.MP4"));
    assert!(is_video_name("a.webm"));
    assert!(!is_video_name("a.png"));
    assert!(!is_video_name("noext"));
}

#[test]
fn test_load_reference_from_path_and_file_url() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("ref.png");
    std::fs::write(&path, png_bytes(8, gradient)).unwrap();

    let plain = load_reference(path.to_str().unwrap()).unwrap();
    let url = load_reference(&format!("file://{}", path.display())).unwrap();
    assert_eq!(plain, url);
    assert!(load_reference("/definitely/missing/ref.png").is_err());
}

#[test]
fn test_missing_ffmpeg_is_a_decode_error() {
    let handle = AssetHandle::Memory(Arc::from(vec![0u8; 16]));
    let err = extract_first_frame(&handle, "clip.mp4", "/nonexistent/ffmpeg-binary").unwrap_err();
    assert!(matches!(err, MatchError::Decode(_)));
}

#[test]
fn test_visual_strategy_scores_decoded_frames() {
    init_test_logger();
    let dir = tempfile::TempDir::new().unwrap();
    let reference = dir.path().join("ref.png");
    std::fs::write(&reference, png_bytes(64, gradient)).unwrap();

    let config = MatchConfig::default();
    let prompts = vec![Prompt::new(1, "clip", &config).with_reference(reference.to_string_lossy())];
    let candidates = build_candidates(
        vec![
            (
                "same.png".to_string(),
                AssetHandle::Memory(Arc::from(png_bytes(64, gradient))),
            ),
            (
                "broken.png".to_string(),
                AssetHandle::Memory(Arc::from(b"nope".to_vec())),
            ),
        ],
        &config,
    )
    .unwrap();

    let mut strategy = VisualStrategy::new(VisualConfig {
        frame_size: 32,
        ..VisualConfig::default()
    });
    strategy.prepare(&prompts, &candidates);

    assert!(strategy.can_score(&candidates[0]));
    assert!(!strategy.can_score(&candidates[1]));

    let score = strategy.evaluate(&prompts[0], &candidates[0]).unwrap();
    assert!((score - 1.0).abs() < 1e-9);
    assert!(strategy.accepts(score));
    assert_eq!(strategy.evaluate(&prompts[0], &candidates[1]), None);
}

#[test]
fn test_visual_strategy_without_references_decodes_nothing() {
    let config = MatchConfig::default();
    let prompts = vec![Prompt::new(1, "clip", &config)];
    let candidates = build_candidates(
        vec![(
            "same.png".to_string(),
            AssetHandle::Memory(Arc::from(png_bytes(16, gradient))),
        )],
        &config,
    )
    .unwrap();

    let mut strategy = VisualStrategy::new(VisualConfig::default());
    strategy.prepare(&prompts, &candidates);
    assert!(!strategy.can_score(&candidates[0]));
    assert_eq!(strategy.evaluate(&prompts[0], &candidates[0]), None);
}
