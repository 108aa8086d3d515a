// SPDX-FileCopyrightText: 2026 Credvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret redaction for log output, audit messages, and error text.
//!
//! Two passes run over every input:
//! 1. **Pattern**: known provider key shapes (Gemini, Groq, OpenAI, Anthropic)
//!    and Bearer tokens.
//! 2. **Exact-match**: secrets registered at runtime, such as keys that were
//!    just stored or decrypted.

use std::io::Write;
use std::sync::{Arc, LazyLock, RwLock};

use regex::Regex;

/// Shared list of secret values registered for exact-match redaction.
pub type KnownSecrets = Arc<RwLock<Vec<String>>>;

static REDACTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // Google AI Studio keys: AIza + 35
        Regex::new(r"AIza[0-9A-Za-z_\-]{30,}").unwrap(),
        // Groq keys: gsk_...
        Regex::new(r"gsk_[0-9A-Za-z]{20,}").unwrap(),
        // Anthropic keys: sk-ant-api03-...
        Regex::new(r"sk-ant-[0-9A-Za-z_\-]{20,}").unwrap(),
        // OpenAI style keys: sk-... / sk-proj-...
        Regex::new(r"sk-[0-9A-Za-z_\-]{20,}").unwrap(),
        Regex::new(r"Bearer\s+[0-9A-Za-z._\-]{10,}").unwrap(),
    ]
});

/// The redaction placeholder.
pub const REDACTED: &str = "[REDACTED]";

/// Redact secrets from `input` using the built-in patterns and `known`
/// exact values.
pub fn redact(input: &str, known: &[String]) -> String {
    let mut result = input.to_string();

    for pattern in REDACTION_PATTERNS.iter() {
        result = pattern.replace_all(&result, REDACTED).into_owned();
    }

    // Longest first so a secret that contains another is replaced whole.
    let mut sorted: Vec<&String> = known.iter().collect();
    sorted.sort_by_key(|v| std::cmp::Reverse(v.len()));
    for value in sorted {
        if !value.is_empty() {
            result = result.replace(value.as_str(), REDACTED);
        }
    }

    result
}

/// Register `value` for exact-match redaction. Duplicates and empty values
/// are ignored.
pub fn register_secret(known: &KnownSecrets, value: &str) {
    if value.is_empty() {
        return;
    }
    if let Ok(mut values) = known.write()
        && !values.iter().any(|v| v == value)
    {
        values.push(value.to_string());
    }
}

/// Remove `value` from the exact-match list.
pub fn forget_secret(known: &KnownSecrets, value: &str) {
    if let Ok(mut values) = known.write() {
        values.retain(|v| v != value);
    }
}

/// A writer that redacts secrets before forwarding to `inner`.
///
/// Used as the tracing subscriber's writer so no formatted event reaches the
/// terminal with a key in it.
pub struct RedactingWriter<W> {
    inner: W,
    known: KnownSecrets,
}

impl<W: Write> RedactingWriter<W> {
    pub fn new(inner: W, known: KnownSecrets) -> Self {
        Self { inner, known }
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let input = String::from_utf8_lossy(buf);
        let known = self.known.read().map(|v| v.clone()).unwrap_or_default();
        let redacted = redact(&input, &known);
        self.inner.write_all(redacted.as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
