// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Security audit trail for the credvault credential subsystem.
//!
//! Records credential access, mutation, and failure events into a bounded,
//! time-pruned log persisted through a [`credvault_core::KeyValueStore`], and
//! derives threshold-based security concerns from recent activity.
//!
//! Audit writes never fail the operation that produced them.

pub mod event;
pub mod log;

pub use event::{LogOptions, SecurityEvent, SecurityEventType};
pub use log::{AuditLog, AuditSummary, SecurityConcern};
