//! Transfer progress reporting.
//!
//! A single bar tracks the body of the artifact being written. It is drawn
//! on stderr by indicatif, which stays silent when stderr is not a terminal.
//!
//! ```rust
//! use privy::progress::ProgressBarOpts;
//!
//! let quiet = ProgressBarOpts::hidden();
//! assert!(!quiet.is_enabled());
//! ```

pub(crate) mod style;

pub use style::ProgressBarOpts;
