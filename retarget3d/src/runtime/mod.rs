mod retargeter;
mod skeleton;

pub use retargeter::*;
pub use skeleton::*;
