//! # Diagnostic Message Types
//!
//! Types shared by every crate in the workspace:
//!
//! - **Time**: `Time` stamps and the `Clock` abstraction used for delay and
//!   frequency computation.
//! - **Header**: `Header`, the `HasHeader` capability and the generic
//!   `Stamped<T>` message.
//! - **Diagnostics**: `Level`, `KeyValue`, `DiagnosticStatus` and
//!   `DiagnosticArray`, the payloads published by the updater.
//!
//! ## Design Principles
//!
//! - Only messages implementing `HasHeader` can be diagnosed; the constraint
//!   is checked where a diagnosed endpoint is instantiated, not at runtime.

pub mod diagnostics;
pub mod header;
pub mod time;

pub use diagnostics::{DiagnosticArray, DiagnosticStatus, KeyValue, Level};
pub use header::{HasHeader, Header, Stamped};
pub use time::{Clock, ManualClock, SystemClock, Time};
