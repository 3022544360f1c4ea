pub mod config;
pub mod core;
pub mod io;
pub mod motion;
pub mod prelude;
pub mod runtime;
pub mod scene;

pub use crate::config::WorldsConfig;
pub use crate::core::error::WorldsError;
pub use crate::runtime::choreographer::{Choreographer, ChoreographerState};
pub use crate::runtime::stage::{SceneRuntime, Stage};
