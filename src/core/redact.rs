//! Secret redaction
//!
//! A fixed, ordered list of rules, each matching one secret shape and
//! replacing only the secret part with [`PLACEHOLDER`]. Labels,
//! separators, quotes and PEM delimiters are kept so the redacted
//! text still reads as what it was.
//!
//! Every rule is idempotent on its own output (the placeholder is
//! either re-matched and replaced with itself, or falls outside the
//! rule's value character class), which makes [`redact`] idempotent.
//!
//! [`RedactedText`] can only be built by this module. Response
//! envelopes accept nothing else, so output that skipped redaction
//! does not type-check.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;

/// Replacement for every redacted value
pub const PLACEHOLDER: &str = "[REDACTED]";

/// One redaction rule
#[derive(Debug)]
pub struct RedactionRule {
    pub name: &'static str,
    pub pattern: Regex,
    /// Regex replacement template (may reference capture groups)
    pub replacement: &'static str,
}

impl RedactionRule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            // Patterns are compile-time constants covered by tests.
            pattern: Regex::new(pattern).expect("redaction pattern must compile"),
            replacement,
        }
    }
}

static DEFAULT_REDACTOR: Lazy<Redactor> = Lazy::new(Redactor::with_default_rules);

/// Stateless text scrubber
#[derive(Debug)]
pub struct Redactor {
    rules: Vec<RedactionRule>,
}

impl Redactor {
    fn with_default_rules() -> Self {
        // Labels also match as the suffix of an env-style name such as
        // OPENAI_API_KEY, where '_' leaves no word boundary.
        let rules = vec![
            RedactionRule::new(
                "pem_private_key",
                // An unterminated block (e.g. a read cut at the byte cap) is
                // redacted to end of text.
                r"(?s)(-----BEGIN [A-Z ]*PRIVATE KEY-----).*?(-----END [A-Z ]*PRIVATE KEY-----|\z)",
                "${1}\n[REDACTED]\n${2}",
            ),
            RedactionRule::new(
                "cloud_secret_key",
                r"(?i)((?:\b|_)(?:AWS_)?SECRET_ACCESS_KEY[\x22']?[ \t]*[:=][ \t]*)[^\r\n]+",
                "${1}[REDACTED]",
            ),
            RedactionRule::new(
                "api_key",
                r"(?i)((?:\b|_)(?:x-)?api[_-]?key[\x22']?[ \t]*[:=][ \t]*)[^\r\n]+",
                "${1}[REDACTED]",
            ),
            RedactionRule::new(
                "bearer_token",
                r"(?i)(\bbearer[ \t]+)[A-Za-z0-9\-_.~+/]+=*",
                "${1}[REDACTED]",
            ),
            RedactionRule::new(
                "password_field",
                r#"(?i)(["']?(?:\b|_)passw(?:or)?d["']?[ \t]*[:=][ \t]*["'])[^"'\r\n]+(["'])"#,
                "${1}[REDACTED]${2}",
            ),
            RedactionRule::new(
                "token_assignment",
                r#"(?i)((?:\b|_)(?:jwt|id_token|access_token|refresh_token)["']?[ \t]*[:=][ \t]*["']?)[A-Za-z0-9\-_.~+/=]+"#,
                "${1}[REDACTED]",
            ),
            RedactionRule::new(
                "bare_jwt",
                r"\beyJ[A-Za-z0-9_-]{4,}\.[A-Za-z0-9_-]{4,}\.[A-Za-z0-9_-]+",
                "[REDACTED]",
            ),
        ];

        Self { rules }
    }

    /// Shared instance with the fixed rule set
    pub fn global() -> &'static Redactor {
        &DEFAULT_REDACTOR
    }

    pub fn rules(&self) -> &[RedactionRule] {
        &self.rules
    }

    /// Apply every rule once, in order
    pub fn redact(&self, text: &str) -> String {
        let mut out = Cow::Borrowed(text);
        for rule in &self.rules {
            if let Cow::Owned(replaced) = rule.pattern.replace_all(&out, rule.replacement) {
                tracing::trace!("Redaction rule '{}' matched", rule.name);
                out = Cow::Owned(replaced);
            }
        }
        out.into_owned()
    }

    /// Redact and seal for the output boundary
    pub fn seal(&self, text: &str) -> RedactedText {
        RedactedText(self.redact(text))
    }

    /// Redact every string inside `value`, then serialize it.
    ///
    /// Rules that run to end of line would eat closing quotes and
    /// brackets if applied to serialized JSON, so structured output is
    /// redacted leaf by leaf instead.
    pub fn seal_json<T: Serialize>(&self, value: &T) -> serde_json::Result<RedactedText> {
        let mut value = serde_json::to_value(value)?;
        self.redact_value(&mut value);
        serde_json::to_string_pretty(&value).map(RedactedText)
    }

    fn redact_value(&self, value: &mut Value) {
        match value {
            Value::String(s) => *s = self.redact(s),
            Value::Array(items) => items.iter_mut().for_each(|v| self.redact_value(v)),
            Value::Object(map) => map.values_mut().for_each(|v| self.redact_value(v)),
            _ => {}
        }
    }
}

/// Redact `text` with the fixed rule set
pub fn redact(text: &str) -> String {
    Redactor::global().redact(text)
}

/// Text that has been through [`Redactor::redact`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RedactedText(String);

impl RedactedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for RedactedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
