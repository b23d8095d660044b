pub mod bridge;
pub mod constants;
pub mod mode;
pub mod motion;
pub mod pacing;
pub mod random;
pub mod scene;

pub static CUBE_WGSL: &str = include_str!("../shaders/cube.wgsl");

pub use bridge::*;
pub use constants::*;
pub use mode::*;
pub use motion::*;
pub use pacing::*;
pub use random::*;
pub use scene::*;
