pub mod graph;
pub mod layout;
pub mod node;

pub use graph::*;
pub use layout::*;
pub use node::*;
