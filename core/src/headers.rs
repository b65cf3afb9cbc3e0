//! Case-insensitive, multi-valued, insertion-ordered header container.
//!
//! # Design
//! `Headers` keeps two ordered stores keyed by the lower-cased header name:
//! one holding the value sequence, one holding the display name (the casing
//! first seen for that key). The stores are maintained separately and their
//! orders can diverge: `set(name, [])` records a display name without
//! storing a value, and a later `append` then adds the value entry at the
//! end. `keys()` follows the display store; `values()`, `entries()`,
//! `for_each()` and `to_json()` follow the value store.
//!
//! Two behaviours look odd but are kept for wire compatibility:
//! - `set` with a list stores the list joined by `,` as a single value.
//! - `to_json` splits every stored value on `,`, which undoes that join
//!   and also splits scalar values that happen to contain a comma.

use std::fmt;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::trace;

/// Value argument for `Headers::set` and plain-mapping construction.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Single(String),
    Many(Vec<String>),
}

impl HeaderValue {
    /// Values in order, a scalar becoming a one-element list.
    pub fn into_values(self) -> Vec<String> {
        match self {
            HeaderValue::Single(value) => vec![value],
            HeaderValue::Many(values) => values,
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Single(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Single(value)
    }
}

impl From<&String> for HeaderValue {
    fn from(value: &String) -> Self {
        HeaderValue::Single(value.clone())
    }
}

impl From<Vec<String>> for HeaderValue {
    fn from(values: Vec<String>) -> Self {
        HeaderValue::Many(values)
    }
}

impl From<Vec<&str>> for HeaderValue {
    fn from(values: Vec<&str>) -> Self {
        HeaderValue::Many(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for HeaderValue {
    fn from(values: [&str; N]) -> Self {
        HeaderValue::Many(values.iter().map(|v| v.to_string()).collect())
    }
}

/// Source a `Request` copies its headers from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadersInit {
    /// A plain name to value(s) mapping, in iteration order.
    Map(Vec<(String, HeaderValue)>),
    /// An existing container.
    Headers(Headers),
}

impl From<Headers> for HeadersInit {
    fn from(headers: Headers) -> Self {
        HeadersInit::Headers(headers)
    }
}

impl<K, V> FromIterator<(K, V)> for HeadersInit
where
    K: Into<String>,
    V: Into<HeaderValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        HeadersInit::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Ordered multi-map of HTTP headers with case-insensitive names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    values: Vec<(String, Vec<String>)>,
    names: Vec<(String, String)>,
}

fn normalize(name: &str) -> String {
    name.to_lowercase()
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy another container. Each stored value is replayed through
    /// `append` under the source's display name, so the copy shares nothing
    /// with `source`. Display names with no stored value are not carried.
    pub fn from_headers(source: &Headers) -> Self {
        let mut headers = Headers::new();
        for (key, values) in &source.values {
            let name = source.display_name(key).unwrap_or(key.as_str());
            for value in values {
                headers.append(name, value.clone());
            }
        }
        headers
    }

    /// Build from a plain mapping. For each name, any earlier entry under the
    /// same normalized name is dropped before its values are appended, so
    /// when two names differ only in case the later one wins.
    pub fn from_map<I, K, V>(map: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<HeaderValue>,
    {
        let mut headers = Headers::new();
        for (name, value) in map {
            let name = name.as_ref();
            headers.delete(name);
            for value in value.into().into_values() {
                headers.append(name, value);
            }
        }
        headers
    }

    /// Build from an optional configuration source; absent yields an empty
    /// container.
    pub fn from_init(init: Option<&HeadersInit>) -> Self {
        match init {
            None => Headers::new(),
            Some(HeadersInit::Headers(source)) => Headers::from_headers(source),
            Some(HeadersInit::Map(entries)) => {
                Headers::from_map(entries.iter().map(|(name, value)| (name, value.clone())))
            }
        }
    }

    /// Replace the values stored under `name`.
    ///
    /// A list is joined with `,` into a single value. An empty list stores
    /// nothing, but still records `name` as the display name.
    pub fn set(&mut self, name: &str, value: impl Into<HeaderValue>) {
        let key = normalize(name);
        match value.into() {
            HeaderValue::Single(value) => self.store(&key, vec![value]),
            HeaderValue::Many(values) => {
                if !values.is_empty() {
                    self.store(&key, vec![values.join(",")]);
                }
            }
        }
        self.record_name(key, name);
    }

    /// First value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values stored under `name`, in insertion order.
    pub fn get_all(&self, name: &str) -> Option<&[String]> {
        let key = normalize(name);
        self.values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, values)| values.as_slice())
    }

    pub fn delete(&mut self, name: &str) {
        let key = normalize(name);
        self.values.retain(|(k, _)| *k != key);
        self.names.retain(|(k, _)| *k != key);
    }

    /// Add a value under `name`, keeping any already stored.
    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        let key = normalize(name);
        match self.values.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value.into()),
            None => self.set(name, HeaderValue::Single(value.into())),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        let key = normalize(name);
        self.values.iter().any(|(k, _)| *k == key)
    }

    /// Visit each stored entry as `(values, display name, container)`.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&[String], &str, &Headers),
    {
        for (key, values) in &self.values {
            f(values, self.display_name(key).unwrap_or(key.as_str()), self);
        }
    }

    /// Serializable view: display name to values, every value split on `,`.
    pub fn to_json(&self) -> Vec<(String, Vec<String>)> {
        self.values
            .iter()
            .map(|(key, values)| {
                let split = values
                    .iter()
                    .flat_map(|value| value.split(','))
                    .map(str::to_string)
                    .collect();
                (self.display_name(key).unwrap_or(key.as_str()).to_string(), split)
            })
            .collect()
    }

    /// Display names in first-insertion order.
    pub fn keys(&self) -> Vec<&str> {
        self.names.iter().map(|(_, name)| name.as_str()).collect()
    }

    /// Stored value sequences, in storage order.
    pub fn values(&self) -> Vec<&[String]> {
        self.values.iter().map(|(_, values)| values.as_slice()).collect()
    }

    /// `(normalized name, values)` pairs in storage order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.values
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse a raw response header block, one `Name: value` per line.
    ///
    /// The name is everything before the first colon, untrimmed; the value
    /// is the rest with surrounding whitespace removed. Lines without a
    /// colon, or starting with one, are skipped. Repeated names overwrite.
    pub fn from_response_header_string(text: &str) -> Headers {
        let mut headers = Headers::new();
        for line in text.split('\n') {
            match line.find(':') {
                Some(index) if index > 0 => {
                    headers.set(&line[..index], line[index + 1..].trim());
                }
                _ => trace!(line, "skipping response header line"),
            }
        }
        headers
    }

    fn display_name(&self, key: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, name)| name.as_str())
    }

    fn store(&mut self, key: &str, values: Vec<String>) {
        match self.values.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = values,
            None => self.values.push((key.to_string(), values)),
        }
    }

    fn record_name(&mut self, key: String, name: &str) {
        if !self.names.iter().any(|(k, _)| *k == key) {
            self.names.push((key, name.to_string()));
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: AsRef<str>,
    V: Into<HeaderValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Headers::from_map(iter)
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, values)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str("\r\n")?;
            }
            let name = self.display_name(key).unwrap_or(key.as_str());
            write!(f, "{name}: {}", values.join(", "))?;
        }
        Ok(())
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let json = self.to_json();
        let mut map = serializer.serialize_map(Some(json.len()))?;
        for (name, values) in &json {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

/// Collects a JSON object's entries in document order.
struct EntriesVisitor;

impl<'de> Visitor<'de> for EntriesVisitor {
    type Value = Vec<(String, HeaderValue)>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of header names to a string or list of strings")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, value)) = access.next_entry::<String, HeaderValue>()? {
            entries.push((name, value));
        }
        Ok(entries)
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = deserializer.deserialize_map(EntriesVisitor)?;
        Ok(Headers::from_map(entries))
    }
}

impl<'de> Deserialize<'de> for HeadersInit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntriesVisitor).map(HeadersInit::Map)
    }
}
