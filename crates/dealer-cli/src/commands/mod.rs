pub mod deal;
pub mod normalize;
pub mod project;
