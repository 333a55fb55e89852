//! Sensitive Data Filter
//!
//! Masks the values of sensitive keys (`password`, `secret`, `token`, ...)
//! in rendered argument lists before they reach the log sink.

use regex::Regex;
use tracing::warn;

/// Marker written in place of a redacted value.
pub const REDACTED: &str = "***";

/// Key names masked when no configuration overrides them.
pub const DEFAULT_SENSITIVE_KEYS: [&str; 3] = ["password", "secret", "token"];

// == Sensitive Keys ==
/// Ordered set of sensitive key names, each with an enabled flag.
///
/// Names are matched case-insensitively. Disabled entries are kept so a
/// deployment can switch off one of the defaults explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensitiveKeys {
    keys: Vec<(String, bool)>,
}

impl SensitiveKeys {
    /// Builds a key set where every name is enabled.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: names.into_iter().map(|n| (n.into(), true)).collect(),
        }
    }

    /// Parses a comma separated `name[=true|false]` list.
    ///
    /// Blank entries are skipped. A later entry for the same name (compared
    /// case-insensitively) overrides the earlier one in place, so
    /// `password,token,token=false` leaves `token` disabled.
    pub fn parse(list: &str) -> Self {
        let mut keys = Self { keys: Vec::new() };

        for raw in list.split(',') {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }

            let (name, enabled) = match raw.split_once('=') {
                Some((name, flag)) => (name.trim(), !flag.trim().eq_ignore_ascii_case("false")),
                None => (raw, true),
            };

            if name.is_empty() {
                continue;
            }
            keys.set(name, enabled);
        }

        keys
    }

    /// Enables or disables a key, appending it when it is not present yet.
    pub fn set(&mut self, name: &str, enabled: bool) {
        match self
            .keys
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = enabled,
            None => self.keys.push((name.to_string(), enabled)),
        }
    }

    /// Enabled key names in configuration order.
    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.keys
            .iter()
            .filter(|(_, enabled)| *enabled)
            .map(|(name, _)| name.as_str())
    }
}

impl Default for SensitiveKeys {
    fn default() -> Self {
        Self::new(DEFAULT_SENSITIVE_KEYS)
    }
}

// == Sensitive Data Filter ==
/// Redaction engine with one compiled pattern per enabled key.
///
/// A pattern matches an optionally quoted key, a `:` or `=` separator and a
/// value that is either a quoted run or everything up to the next `,`, `}`
/// or `]`. Only the value is replaced; key and separator are kept.
#[derive(Debug, Clone)]
pub struct SensitiveDataFilter {
    patterns: Vec<Regex>,
}

impl SensitiveDataFilter {
    /// Compiles one pattern for every enabled key.
    pub fn new(keys: &SensitiveKeys) -> Self {
        let patterns = keys
            .enabled()
            .filter_map(|key| match compile_key_pattern(key) {
                Ok(regex) => Some(regex),
                Err(err) => {
                    warn!(key = %key, error = %err, "Skipping sensitive key with invalid pattern");
                    None
                }
            })
            .collect();

        Self { patterns }
    }

    // == Filter ==
    /// Returns `input` with every sensitive value replaced by [`REDACTED`].
    ///
    /// Input that matches no pattern comes back unchanged.
    pub fn filter(&self, input: &str) -> String {
        let mut filtered = input.to_string();
        for pattern in &self.patterns {
            filtered = pattern
                .replace_all(&filtered, format!("${{prefix}}{}", REDACTED).as_str())
                .into_owned();
        }
        filtered
    }

    /// Number of active key patterns.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

impl Default for SensitiveDataFilter {
    fn default() -> Self {
        Self::new(&SensitiveKeys::default())
    }
}

fn compile_key_pattern(key: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r#"(?i)(?P<prefix>"?{}"?\s*[:=]\s*)(?:".*?"|[^,}}\]]+)"#,
        regex::escape(key)
    ))
}
