//! Shared building blocks for the `subrecon` workspace.
//!
//! Everything in here is free of network I/O: the run [`config`], the
//! [`hostname`] model, the concurrently written [`store`] and the brute-force
//! [`wordlist`].

pub mod config;
pub mod hostname;
pub mod log;
pub mod store;
pub mod wordlist;

#[doc(hidden)]
pub use tracing as __tracing;
