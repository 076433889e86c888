pub mod walker;

pub use walker::{build_candidates, scan_assets, AssetEntry};
