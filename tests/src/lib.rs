//! End-to-end runs of the enumeration service against in-process stubs.

pub mod stubs;

mod enumeration;
