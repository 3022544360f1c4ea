pub mod choreographer;
pub mod completion;
pub mod events;
pub mod frame_clock;
pub mod stage;
pub mod storage;
