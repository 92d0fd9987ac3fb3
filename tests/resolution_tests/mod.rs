pub mod test_utils;

pub mod degradation;
pub mod mapping_resolution;
pub mod positional_resolution;
pub mod sequence_resolution;
