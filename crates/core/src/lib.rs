// crates/core/src/lib.rs
//! Analytics aggregation engine for the siteview dashboard.
//!
//! Pure, synchronous calendar math over immutable event slices: the window
//! builder produces current/previous bucket lists for a range keyword, the
//! bucketed counter maps events onto them, and the stat composer derives the
//! headline value + trend pairs the dashboard cards render. No I/O anywhere
//! in this crate; every computation takes an explicit `now`.

pub mod breakdown;
pub mod bucketize;
pub mod events;
pub mod format;
pub mod range;
pub mod stats;
pub mod window;

pub use breakdown::*;
pub use bucketize::*;
pub use events::*;
pub use format::*;
pub use range::*;
pub use stats::*;
pub use window::*;
