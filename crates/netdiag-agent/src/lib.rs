//! # netdiag-agent
//!
//! Command routing for netdiag.
//!
//! This crate provides:
//! - Input normalization and exact command matching
//! - Dispatch to the diagnostic registry
//! - Approval workflow for diagnostics that change system state
//! - Lifecycle callbacks for front ends

pub mod permission;
pub mod router;

pub use permission::{
    AutoApproveHandler, DenyAllHandler, NoOpEventHandler, PermissionHandler, RouterEventHandler,
};
pub use router::{Reply, Router, RouterBuilder};
