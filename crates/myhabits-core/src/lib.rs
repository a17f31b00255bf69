//! # myhabits Core Library
//!
//! Core logic for the myhabits habit tracker. Every operation is available
//! through the standalone CLI binary, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Habit Store**: users, habits and per-day entries persisted over a
//!   key/value substrate (SQLite or in-memory), rewritten on every mutation
//! - **Schedule**: whether a habit is due on a date (daily, weekly, monthly)
//! - **Progress**: completion rates, today's progress and list filters
//! - **Session**: login, registration and logout as explicit session values
//!
//! ## Key Components
//!
//! - [`HabitStore`]: persistence of users, habits and entries
//! - [`is_due`]: schedule evaluation
//! - [`AuthGate`]: session transitions
//! - [`Config`]: application configuration management
//!
//! Nothing here spawns threads or holds locks. Calls are synchronous and
//! assume a single writer.

pub mod error;
pub mod habit;
pub mod progress;
pub mod schedule;
pub mod session;
pub mod storage;

pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use habit::{Habit, HabitEntry, HabitStatus, HabitWithEntries, RepeatType};
pub use progress::{completion_rate, DailyProgress, HabitFilter};
pub use schedule::is_due;
pub use session::{AuthGate, AuthOutcome, AuthRejection, Session, User};
pub use storage::{Config, Database, HabitStore, KvStore, MemoryKv};
