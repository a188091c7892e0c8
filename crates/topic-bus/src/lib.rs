//! # Topic Bus - In-Memory Publish/Subscribe
//!
//! Named topics carrying typed messages between endpoints in one process.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  Publisher   │                    │  Subscriber  │
//! │              │    publish()       │              │
//! │              │ ──────┐            │  callbacks   │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │ spin_once()
//!                  │   TopicBus   │          │
//!                  │  "/topic"    │ ─────────┘
//!                  └──────────────┘
//! ```
//!
//! ## Dispatch Model
//!
//! Publishing never blocks. Messages queue per subscriber and are delivered
//! to its callbacks when the owning thread calls `spin_once()`, so every
//! callback runs on the host's own dispatch thread.
//!
//! ## Topic Typing
//!
//! The first endpoint on a topic fixes its message type. Later endpoints
//! with a different type are rejected with `BusError::TypeMismatch`.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod bus;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use bus::{BusError, TopicBus};
pub use publisher::{MessagePublisher, Publisher};
pub use subscriber::{MessageCallback, MessageSubscriber, Subscriber};

/// Maximum messages buffered per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

