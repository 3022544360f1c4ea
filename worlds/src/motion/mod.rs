pub mod action;
pub mod easing;
pub mod plan;
pub mod timeline;

pub use action::*;
pub use easing::*;
pub use plan::*;
pub use timeline::*;
