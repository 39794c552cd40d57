//! Mock implementations for testing

pub mod ai;
pub mod storage;

pub use ai::ScriptedAiProvider;
pub use storage::FailingLiveStateStore;
