//! # Roundtable
//!
//! Deterministic multi-round interview orchestration. An AI capability writes
//! questions and scores answers; the decision engine alone decides verdicts.
//!
//! ## Usage
//!
//! ```bash
//! roundtable serve [--bind 0.0.0.0:3001]
//! ```
//!
//! ## Modules
//!
//! - `ai` - Question/evaluation capability with optional resume and profile extensions
//! - `app` - Configuration, logging and runtime wiring for the binary
//! - `domain` - Candidates, sessions, rounds and the audit log
//! - `error` - Crate error type and its stable classification
//! - `server` - HTTP boundary over the orchestrator
//! - `storage` - Repositories and the live-state cache, with pluggable backends
//! - `workflow` - State machine, scoring, memory and the orchestrator
//! - `testing` - Scripted collaborators for tests
pub mod ai;
pub mod app;
pub mod domain;
pub mod error;
pub mod server;
pub mod storage;
pub mod workflow;

pub mod testing;

pub use error::{Error, ErrorKind, Result};
pub use workflow::{InterviewOrchestrator, PublicState, ResultView, StartInterview, SubmitAnswer};
