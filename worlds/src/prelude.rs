pub use crate::config::*;
pub use crate::core::error::WorldsError;
pub use crate::core::logging::init_logger;
pub use crate::core::logging::{debug, error, info, trace, warn};
pub use crate::core::random::{RandomRange, SeededRandom};
pub use crate::core::util::HashMap;
pub use crate::core::util::ensure_finite_positive;
pub use crate::io::audio::*;
pub use crate::motion::*;
pub use crate::runtime::choreographer::*;
pub use crate::runtime::completion::*;
pub use crate::runtime::events::*;
pub use crate::runtime::frame_clock::{FrameClock, Tick};
pub use crate::runtime::stage::*;
pub use crate::scene::*;
pub use glam::Vec3;
