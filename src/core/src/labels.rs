//! Image labels.
//!
//! [`Labels`] is the insertion-ordered map behind the `LABEL` directive.
//! Render order is observable in the generated Dockerfile, so order is part
//! of the type's contract rather than a property of the container.
//!
//! [`OciLabels`] fills in the standard `org.opencontainers.image.*`
//! annotation keys.
//!
//! # Example
//!
//! ```dockerfile
//! LABEL \
//!       org.opencontainers.image.title="my-service" \
//!       org.opencontainers.image.version="1.0.0"
//! ```

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::directive::Label;

/// Insertion-ordered string map.
///
/// Inserting an existing key replaces its value without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels {
    entries: Vec<(String, String)>,
}

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key-value pair, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Labels {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Labels {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut labels = Labels::new();
        labels.extend(iter);
        labels
    }
}

impl Serialize for Labels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Labels {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LabelsVisitor;

        impl<'de> Visitor<'de> for LabelsVisitor {
            type Value = Labels;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of label keys to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Labels, A::Error> {
                let mut labels = Labels::new();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    labels.insert(k, v);
                }
                Ok(labels)
            }
        }

        deserializer.deserialize_map(LabelsVisitor)
    }
}

/// Standard OCI image annotations.
///
/// Only fields that are set are emitted. `extra` is merged last, so it can
/// override a standard key in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OciLabels {
    pub title: Option<String>,
    pub version: Option<String>,
    pub vendor: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
    pub licenses: Option<String>,
    pub revision: Option<String>,
    pub created: Option<String>,
    pub extra: Labels,
}

impl OciLabels {
    /// Collect the set annotations in their canonical order.
    pub fn to_labels(&self) -> Labels {
        let standard = [
            ("org.opencontainers.image.title", &self.title),
            ("org.opencontainers.image.version", &self.version),
            ("org.opencontainers.image.vendor", &self.vendor),
            ("org.opencontainers.image.description", &self.description),
            ("org.opencontainers.image.url", &self.url),
            ("org.opencontainers.image.source", &self.source),
            ("org.opencontainers.image.licenses", &self.licenses),
            ("org.opencontainers.image.revision", &self.revision),
            ("org.opencontainers.image.created", &self.created),
        ];

        let mut labels: Labels = standard
            .into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (key, v.clone())))
            .collect();
        labels.extend(self.extra.iter());
        labels
    }

    /// Build a `LABEL` directive from the set annotations.
    pub fn to_label(&self) -> Label {
        Label::new(self.to_labels())
    }
}
