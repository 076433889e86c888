pub mod scorer;
pub mod sequence;
pub mod strategies;
pub mod visual;
