// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded, persisted security event log.
//!
//! Events are pruned by age and count on every write, then the whole list is
//! persisted as JSON under a single key. If the backing store rejects the
//! write, the list is cut down to the most recent `fallback_events` and
//! written once more; a second failure is logged and dropped.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use credvault_config::model::AuditConfig;
use credvault_core::{KeyValueStore, Severity};
use credvault_security::redact;
use serde::Serialize;
use tracing::{debug, warn};

use crate::event::{LogOptions, SecurityEvent, SecurityEventType};

/// A derived alert from recent audit activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityConcern {
    pub concern: String,
    pub severity: Severity,
    pub recommendation: String,
}

/// Aggregate counts over the retained event list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    pub total_events: usize,
    pub events_by_type: BTreeMap<SecurityEventType, usize>,
    pub events_by_severity: BTreeMap<Severity, usize>,
    pub oldest_event: Option<DateTime<Utc>>,
    pub newest_event: Option<DateTime<Utc>>,
    pub events_last_24h: usize,
}

/// Security audit log backed by a [`KeyValueStore`].
pub struct AuditLog {
    store: Arc<dyn KeyValueStore>,
    config: AuditConfig,
    events: Mutex<Vec<SecurityEvent>>,
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLog")
            .field("storage_key", &self.config.storage_key)
            .field("events", &self.len())
            .finish_non_exhaustive()
    }
}

impl AuditLog {
    /// Open the log, loading any previously persisted events.
    ///
    /// Unreadable or corrupt persisted state starts an empty log.
    pub fn new(store: Arc<dyn KeyValueStore>, config: &AuditConfig) -> Self {
        let mut events = match store.get(&config.storage_key) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<SecurityEvent>>(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "discarding unreadable audit log");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to load audit log");
                Vec::new()
            }
        };
        prune(&mut events, config, Utc::now());
        debug!(events = events.len(), "audit log loaded");

        Self {
            store,
            config: config.clone(),
            events: Mutex::new(events),
        }
    }

    /// Record an event. Never fails.
    pub fn log(&self, event_type: SecurityEventType, message: &str, options: LogOptions) {
        let event = SecurityEvent {
            event_type,
            timestamp: Utc::now(),
            severity: options
                .severity
                .unwrap_or_else(|| event_type.default_severity()),
            key_type: options.key_type,
            provider: options.provider,
            message: redact(message, &[]),
            metadata: options.metadata,
        };

        let mut events = self.lock();
        events.push(event);
        prune(&mut events, &self.config, Utc::now());
        self.persist(&mut events);
    }

    /// Threshold alerts over the configured window.
    pub fn check_security_concerns(&self) -> Vec<SecurityConcern> {
        let window = Duration::from_secs(self.config.alert_window_secs);
        let since = cutoff(Utc::now(), window);
        let events = self.lock();
        let count = |t: SecurityEventType| {
            events
                .iter()
                .filter(|e| e.event_type == t && e.timestamp >= since)
                .count()
        };

        let mut concerns = Vec::new();
        let window_label = describe_window(window);

        let failures = count(SecurityEventType::DecryptionFailure);
        if failures >= self.config.decryption_failure_threshold {
            concerns.push(SecurityConcern {
                concern: format!("{failures} decryption failures in the last {window_label}"),
                severity: Severity::Warning,
                recommendation: "Stored keys may be corrupted or the device identity changed; \
                                 re-enter the affected API keys"
                    .to_string(),
            });
        }

        let suspicious = count(SecurityEventType::SuspiciousAccess);
        if suspicious >= self.config.suspicious_access_threshold {
            concerns.push(SecurityConcern {
                concern: format!(
                    "{suspicious} suspicious access attempts in the last {window_label}"
                ),
                severity: Severity::Critical,
                recommendation: "Review recent credential access and rotate all API keys"
                    .to_string(),
            });
        }

        concerns
    }

    pub fn get_summary(&self) -> AuditSummary {
        let events = self.lock();
        let day_ago = Utc::now() - TimeDelta::hours(24);
        let mut summary = AuditSummary {
            total_events: events.len(),
            oldest_event: events.iter().map(|e| e.timestamp).min(),
            newest_event: events.iter().map(|e| e.timestamp).max(),
            ..AuditSummary::default()
        };
        for event in events.iter() {
            *summary.events_by_type.entry(event.event_type).or_default() += 1;
            *summary.events_by_severity.entry(event.severity).or_default() += 1;
            if event.timestamp >= day_ago {
                summary.events_last_24h += 1;
            }
        }
        summary
    }

    pub fn get_events_by_type(&self, event_type: SecurityEventType) -> Vec<SecurityEvent> {
        self.lock()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    /// Events recorded within `window` of now, oldest first.
    pub fn get_events_in_window(&self, window: Duration) -> Vec<SecurityEvent> {
        let since = cutoff(Utc::now(), window);
        self.lock()
            .iter()
            .filter(|e| e.timestamp >= since)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop all events, in memory and persisted.
    pub fn clear(&self) {
        self.lock().clear();
        if let Err(e) = self.store.remove(&self.config.storage_key) {
            warn!(error = %e, "failed to clear persisted audit log");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SecurityEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, events: &mut Vec<SecurityEvent>) {
        if self.write(events).is_ok() {
            return;
        }

        let keep = self.config.fallback_events;
        if events.len() > keep {
            let excess = events.len() - keep;
            events.drain(..excess);
        }
        if let Err(e) = self.write(events) {
            warn!(error = %e, events = events.len(), "audit log not persisted");
        } else {
            debug!(events = events.len(), "audit log persisted after truncation");
        }
    }

    fn write(&self, events: &[SecurityEvent]) -> Result<(), credvault_core::CredvaultError> {
        let json = serde_json::to_string(events)
            .map_err(|e| credvault_core::CredvaultError::Internal(e.to_string()))?;
        self.store.set(&self.config.storage_key, &json)
    }
}

fn prune(events: &mut Vec<SecurityEvent>, config: &AuditConfig, now: DateTime<Utc>) {
    let retention = Duration::from_secs(u64::from(config.retention_days) * 86_400);
    let oldest = cutoff(now, retention);
    events.retain(|e| e.timestamp >= oldest);
    if events.len() > config.max_events {
        let excess = events.len() - config.max_events;
        events.drain(..excess);
    }
}

/// `now - window`, saturating at the earliest representable time.
fn cutoff(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(window)
        .ok()
        .and_then(|delta| now.checked_sub_signed(delta))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn describe_window(window: Duration) -> String {
    let secs = window.as_secs();
    match secs {
        3600 => "hour".to_string(),
        s if s % 3600 == 0 => format!("{} hours", s / 3600),
        s if s % 60 == 0 => format!("{} minutes", s / 60),
        s => format!("{s} seconds"),
    }
}
