//! Extraction of instance ids and addresses from provider CLI output.
//!
//! The provider prints free-form text by default. `TextOutputParser` reads it
//! with a small, fixed grammar; `JsonOutputParser` reads the machine-readable
//! variant. Both sit behind `ProviderOutputParser` so the provisioning
//! service never sees the raw format.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::domain::config::OutputFormat;

#[allow(clippy::expect_used)] // Patterns are compile-time constants
static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\b")
        .expect("valid uuid regex")
});

#[allow(clippy::expect_used)]
static IPV4_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,3})\.(\d{1,3})\.(\d{1,3})\.(\d{1,3})\b").expect("valid ipv4 regex")
});

/// Reads identifiers and addresses out of provider output.
pub trait ProviderOutputParser {
    /// Instance id from the output of the create call.
    fn instance_id(&self, creation_output: &str) -> Option<String>;
    /// Id of the instance called `name` in the output of the list call.
    fn id_for_name(&self, listing: &str, name: &str) -> Option<String>;
    /// Reachable network address from the output of the describe call.
    fn address(&self, details: &str) -> Option<String>;
}

/// Returns the parser matching the configured output format.
#[must_use]
pub fn parser_for(format: OutputFormat) -> Box<dyn ProviderOutputParser> {
    match format {
        OutputFormat::Text => Box::new(TextOutputParser),
        OutputFormat::Json => Box::new(JsonOutputParser),
    }
}

// ── Text ─────────────────────────────────────────────────────────────────────

/// Grammar:
/// - id: the first UUID-shaped token anywhere in the output;
/// - listing: the first line with a whitespace-separated token equal to the
///   name; its id is the UUID on that line, else its first other token;
/// - address: the first usable IPv4 on a line mentioning "public", else on a
///   line mentioning "ip", else anywhere. Loopback and `0.0.0.0` are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextOutputParser;

impl ProviderOutputParser for TextOutputParser {
    fn instance_id(&self, creation_output: &str) -> Option<String> {
        UUID_RE
            .find(creation_output)
            .map(|m| m.as_str().to_string())
    }

    fn id_for_name(&self, listing: &str, name: &str) -> Option<String> {
        listing.lines().find_map(|line| {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if !tokens.contains(&name) {
                return None;
            }
            UUID_RE
                .find(line)
                .map(|m| m.as_str().to_string())
                .or_else(|| {
                    tokens
                        .iter()
                        .find(|t| **t != name)
                        .map(|t| (*t).to_string())
                })
        })
    }

    fn address(&self, details: &str) -> Option<String> {
        labelled_ipv4(details, "public")
            .or_else(|| labelled_ipv4(details, "ip"))
            .or_else(|| first_ipv4(details))
    }
}

/// First usable address on a line whose lowercase text contains `label`.
fn labelled_ipv4(details: &str, label: &str) -> Option<String> {
    details
        .lines()
        .filter(|line| line.to_ascii_lowercase().contains(label))
        .find_map(first_ipv4)
}

fn first_ipv4(text: &str) -> Option<String> {
    IPV4_RE.captures_iter(text).find_map(|caps| {
        let octets: Option<Vec<u8>> = (1..=4).map(|i| caps[i].parse::<u8>().ok()).collect();
        let octets = octets?;
        if octets == [0, 0, 0, 0] || octets[0] == 127 {
            return None;
        }
        Some(caps[0].to_string())
    })
}

// ── JSON ─────────────────────────────────────────────────────────────────────

const ID_KEYS: &[&str] = &["id", "uuid", "instance_id"];
const ADDRESS_KEYS: &[&str] = &[
    "public_ip",
    "public_ipv4",
    "ip_address",
    "ipv4",
    "ip",
    "main_ip",
    "address",
];
const WRAPPER_KEYS: &[&str] = &["instance", "data", "result", "network", "networking"];
const LIST_KEYS: &[&str] = &["instances", "data", "items", "results"];

/// Reads the JSON output variant. Objects may be wrapped one level deep in
/// `instance`, `data` or `result`; lists may be bare arrays or sit under
/// `instances`, `data` or `items`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOutputParser;

impl ProviderOutputParser for JsonOutputParser {
    fn instance_id(&self, creation_output: &str) -> Option<String> {
        let value: Value = serde_json::from_str(creation_output).ok()?;
        find_string(&value, ID_KEYS)
    }

    fn id_for_name(&self, listing: &str, name: &str) -> Option<String> {
        let value: Value = serde_json::from_str(listing).ok()?;
        let items = match &value {
            Value::Array(items) => items,
            Value::Object(map) => LIST_KEYS
                .iter()
                .find_map(|k| map.get(*k).and_then(Value::as_array))?,
            _ => return None,
        };
        items
            .iter()
            .find(|item| item.get("name").and_then(Value::as_str) == Some(name))
            .and_then(|item| find_string(item, ID_KEYS))
    }

    fn address(&self, details: &str) -> Option<String> {
        let value: Value = serde_json::from_str(details).ok()?;
        find_string(&value, ADDRESS_KEYS).filter(|a| !a.is_empty())
    }
}

/// First non-empty string (or first string of an array) under any of `keys`,
/// looking at the object itself and then one level of wrapper objects.
fn find_string(value: &Value, keys: &[&str]) -> Option<String> {
    let direct = |v: &Value| {
        keys.iter().find_map(|k| match v.get(*k)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Array(arr) => arr.first().and_then(Value::as_str).map(String::from),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    };
    direct(value).or_else(|| {
        WRAPPER_KEYS
            .iter()
            .filter_map(|k| value.get(*k))
            .find_map(|inner| direct(inner))
    })
}
