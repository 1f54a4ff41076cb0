//! # Execution
//!
//! Scheduling collaborators for interaction handler tasks and form timeout
//! timers.

pub mod scheduler;

pub use scheduler::{
    InlineScheduler, Scheduler, TaskFuture, TimerCallback, TimerHandle, TokioScheduler,
};
