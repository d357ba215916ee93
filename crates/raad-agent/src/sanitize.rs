// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Normalization and screening of questions before they reach a session.
//!
//! Control characters are stripped and whitespace runs collapse to one space.
//! Injection-looking input is logged, not rejected: the engine runs in its
//! own sandbox and financial questions legitimately mention words like
//! "import".

use std::sync::LazyLock;

use raad_core::RaadError;
use regex::Regex;
use tracing::warn;

/// Shortest accepted question, in characters, after normalization.
pub const MIN_QUESTION_LEN: usize = 3;

static SUSPICIOUS_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("script tag", r"(?i)<script\b"),
        ("javascript url", r"(?i)javascript:"),
        ("event handler", r"(?i)\bon\w+\s*="),
        ("eval call", r"(?i)\beval\s*\("),
        ("exec call", r"(?i)\bexec\s*\("),
        ("dunder import", r"__import__"),
        ("subprocess", r"(?i)subprocess"),
        ("os.system", r"(?i)\bos\s*\.\s*system"),
        ("import os", r"(?i)\bimport\s+os\b"),
        ("from os import", r"(?i)\bfrom\s+os\s+import\b"),
    ]
    .into_iter()
    .filter_map(|(label, p)| Regex::new(p).ok().map(|re| (label, re)))
    .collect()
});

/// C0 controls other than tab, newline and carriage return, plus DEL and C1 controls.
fn is_stripped_control(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{7f}'..='\u{9f}')
}

/// Validates and normalizes a raw question.
///
/// Fails with [`RaadError::InvalidQuestion`] when the question is blank,
/// longer than `max_len` characters, or shorter than [`MIN_QUESTION_LEN`]
/// once normalized.
pub fn sanitize_question(raw: &str, max_len: usize) -> Result<String, RaadError> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if len > max_len {
        return Err(RaadError::InvalidQuestion(format!(
            "question is {len} characters, the limit is {max_len}"
        )));
    }

    let cleaned: String = trimmed.chars().filter(|c| !is_stripped_control(*c)).collect();
    let question = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if question.is_empty() {
        return Err(RaadError::InvalidQuestion("question is empty".into()));
    }
    let len = question.chars().count();
    if len < MIN_QUESTION_LEN {
        return Err(RaadError::InvalidQuestion(format!(
            "question is {len} characters, the minimum is {MIN_QUESTION_LEN}"
        )));
    }

    let flagged = suspicious_patterns(&question);
    if !flagged.is_empty() {
        warn!(patterns = ?flagged, "question contains suspicious patterns");
    }
    Ok(question)
}

/// Labels of the injection-looking patterns found in `text`.
pub fn suspicious_patterns(text: &str) -> Vec<&'static str> {
    SUSPICIOUS_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(label, _)| *label)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn strips_controls_and_collapses_whitespace() {
        let q = sanitize_question("  top\u{0}  10\u{7}\t\n  by revenue\u{85} ", 2000).unwrap();
        assert_eq!(q, "top 10 by revenue");
    }

    #[test]
    fn short_questions_are_rejected() {
        for raw in ["ab", " a ", "a\u{0}b", "\u{1}\u{2}\u{3}x"] {
            let err = sanitize_question(raw, 2000).unwrap_err();
            assert!(
                matches!(&err, RaadError::InvalidQuestion(m) if m.contains("minimum is 3")),
                "{raw:?}: {err}"
            );
        }
        assert_eq!(sanitize_question("abc", 2000).unwrap(), "abc");
    }

    #[test]
    fn blank_and_control_only_questions_are_empty() {
        for raw in ["", "   ", "\u{0}\u{0}\u{0}\u{0}"] {
            assert!(matches!(
                sanitize_question(raw, 2000),
                Err(RaadError::InvalidQuestion(m)) if m == "question is empty"
            ));
        }
    }

    #[test]
    fn length_limit_counts_characters() {
        assert!(sanitize_question(&"é".repeat(10), 10).is_ok());
        assert!(matches!(
            sanitize_question(&"é".repeat(11), 10),
            Err(RaadError::InvalidQuestion(m)) if m.contains("limit is 10")
        ));
    }

    #[test]
    fn detects_injection_patterns() {
        assert_eq!(suspicious_patterns("<SCRIPT>alert(1)</script>"), vec!["script tag"]);
        assert_eq!(
            suspicious_patterns("__import__('os').system('ls')"),
            vec!["dunder import"]
        );
        assert_eq!(suspicious_patterns("run os . system ( 'x' )"), vec!["os.system"]);
        assert!(suspicious_patterns("import os; exec(open('x'))").contains(&"exec call"));
        assert!(suspicious_patterns("Which sector imports the most?").is_empty());
        assert!(suspicious_patterns("Top 10 companies by revenue in 2024").is_empty());
    }

    #[test]
    #[traced_test]
    fn suspicious_questions_pass_but_are_logged() {
        let q = sanitize_question("eval(revenue) for SABIC", 2000).unwrap();
        assert_eq!(q, "eval(revenue) for SABIC");
        assert!(logs_contain("suspicious patterns"));
    }
}
