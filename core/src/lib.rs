//! # subrecon core
//!
//! The enumeration engine. [`enumeration::EnumerationService`] drives a run
//! through its stages and composes everything else in this crate:
//!
//! * [`resolver`]: DNS resolution strategies behind the [`resolver::Resolve`] trait.
//! * [`sources`]: passive data sources behind the [`sources::Collector`] trait.
//! * [`pool`]: the bounded worker pool every DNS probe runs on.
//! * [`zone`], [`bruteforce`], [`hidden`], [`validation`]: the active stages.
//!
//! Nothing in here prints; status goes through `tracing` and results leave
//! through a [`report::ReportSink`].

pub mod bruteforce;
pub mod enumeration;
pub mod hidden;
pub mod http;
pub mod pool;
pub mod probe;
pub mod progress;
pub mod report;
pub mod resolver;
pub mod sources;
pub mod validation;
pub mod zone;
