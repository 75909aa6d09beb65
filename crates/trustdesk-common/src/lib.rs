//! Shared plumbing for the trustdesk crates: the wire error envelope,
//! capability reporting for the unified status surface, runtime platform
//! selection, and the on-disk data layout.

pub mod api;
pub mod error;
pub mod http;
pub mod paths;
pub mod platform;
pub mod proc;
