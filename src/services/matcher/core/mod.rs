pub mod decomposer;
pub mod normalizer;
