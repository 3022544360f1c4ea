pub mod error;
pub mod logging;
pub mod random;
pub mod util;
