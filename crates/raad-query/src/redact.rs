// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret redaction for error messages shown in chat turns and logs.
//!
//! Known key formats are matched by regex; the configured key is matched
//! exactly.

use std::sync::LazyLock;

use regex::Regex;

static REDACTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // OpenRouter keys: sk-or-v1-...
        r"sk-or-[a-zA-Z0-9_\-]{16,}",
        // Anthropic keys: sk-ant-...
        r"sk-ant-[a-zA-Z0-9_\-]{20,}",
        // Generic sk- keys
        r"sk-[a-zA-Z0-9]{20,}",
        r"Bearer\s+[a-zA-Z0-9._\-]{10,}",
        // key=... / api_key: ... in URLs and dumps
        r"(?i)(api[_-]?key|token)=[^\s&]{8,}",
    ]
    .into_iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

pub const REDACTED: &str = "[REDACTED]";

/// Masks known key formats and every non-empty value in `secrets`.
pub fn redact(input: &str, secrets: &[&str]) -> String {
    let mut result = input.to_string();

    // Exact values first, longest first, so a key is never partially masked.
    let mut values: Vec<&str> = secrets.iter().copied().filter(|s| !s.is_empty()).collect();
    values.sort_by_key(|v| std::cmp::Reverse(v.len()));
    for value in values {
        result = result.replace(value, REDACTED);
    }

    for pattern in REDACTION_PATTERNS.iter() {
        result = pattern.replace_all(&result, REDACTED).into_owned();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_openrouter_key() {
        let out = redact("auth failed for sk-or-v1-0123456789abcdef0123", &[]);
        assert_eq!(out, "auth failed for [REDACTED]");
    }

    #[test]
    fn redacts_bearer_header() {
        let out = redact("header: Bearer abcdefghijklmnop", &[]);
        assert!(!out.contains("abcdefghijklmnop"));
    }

    #[test]
    fn redacts_exact_secret() {
        let out = redact("sent key my-custom-key-123 to service", &["my-custom-key-123"]);
        assert_eq!(out, "sent key [REDACTED] to service");
    }

    #[test]
    fn redacts_query_param() {
        let out = redact("GET /q?api_key=supersecretvalue&x=1", &[]);
        assert_eq!(out, "GET /q?[REDACTED]&x=1");
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(redact("timeout", &[""]), "timeout");
    }
}
