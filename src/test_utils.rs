use std::sync::{Arc, Once};

use crate::services::config::MatchConfig;
use crate::services::matcher::{build_candidates, AssetHandle, CandidateFile, Prompt};

static INIT: Once = Once::new();

pub fn init_test_logger() {
    INIT.call_once(|| {
        // Initialize logger only once
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Prompts 1..=n with the default config.
pub fn prompts(texts: &[&str]) -> Vec<Prompt> {
    init_test_logger();
    Prompt::from_texts(texts, &MatchConfig::default())
}

/// In-memory candidates whose bytes are their own names.
pub fn candidates(names: &[&str]) -> Vec<CandidateFile> {
    candidates_with(names, &MatchConfig::default())
}

pub fn candidates_with(names: &[&str], config: &MatchConfig) -> Vec<CandidateFile> {
    init_test_logger();
    let items = names.iter().map(|name| {
        (
            name.to_string(),
            AssetHandle::Memory(Arc::from(name.as_bytes().to_vec())),
        )
    });
    build_candidates(items, config).expect("default decompose rules are valid")
}

/// PNG bytes of a `size`×`size` image filled by `shade(x, y)`.
pub fn png_bytes(size: u32, shade: impl Fn(u32, u32) -> u8) -> Vec<u8> {
    let img = image::GrayImage::from_fn(size, size, |x, y| image::Luma([shade(x, y)]));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageLuma8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}
