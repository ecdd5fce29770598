//! Structural records: one row per retained TEI element

use serde::{Deserialize, Serialize};
use std::fmt;

/// Element names the pipeline interprets
pub mod tag {
    pub const TEXT: &str = "text";
    pub const BODY: &str = "body";
    pub const HEAD: &str = "head";
    pub const SPEAKER: &str = "speaker";
    pub const SPEECH: &str = "sp";
    pub const STAGE: &str = "stage";
    pub const WORD: &str = "w";
    pub const CAST_ITEM: &str = "castItem";
}

/// Attribute names the pipeline interprets
pub mod attr {
    pub const TYPE: &str = "type";
    pub const N: &str = "n";
    pub const WHO: &str = "who";
    pub const ID: &str = "xml:id";
    pub const CORRESP: &str = "corresp";
}

/// Values of the `type` attribute that carry structure
pub mod kind {
    pub const ACT: &str = "act";
    pub const SCENE: &str = "scene";
    pub const INDUCTION: &str = "induction";
    pub const PROLOGUE: &str = "prologue";
    pub const EPILOGUE: &str = "epilogue";
    pub const ENTRANCE: &str = "entrance";
    pub const EXIT: &str = "exit";
}

/// Sparse attribute bag, kept in document order.
///
/// Keys vary per element; lookups return `None` for absent keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an attribute value by name
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Attribute names in document order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (k, v) in iter {
            attributes.insert(k, v);
        }
        attributes
    }
}

/// A retained TEI element: tag, attributes, and text for leaves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralRecord {
    /// Element name without namespace prefix
    pub tag: String,
    /// Element attributes
    pub attributes: Attributes,
    /// Concatenated text, present only for leaf elements
    pub text: Option<String>,
}

impl StructuralRecord {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Attributes::new(),
            text: None,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key)
    }

    /// The `xml:id` attribute
    pub fn id(&self) -> Option<&str> {
        self.attribute(attr::ID)
    }

    /// The `type` attribute
    pub fn kind(&self) -> Option<&str> {
        self.attribute(attr::TYPE)
    }

    /// The `n` attribute (act/scene number, or line number on words)
    pub fn number(&self) -> Option<&str> {
        self.attribute(attr::N)
    }

    /// The raw `who` attribute
    pub fn who(&self) -> Option<&str> {
        self.attribute(attr::WHO)
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag == tag
    }

    pub fn has_kind(&self, kind: &str) -> bool {
        self.kind() == Some(kind)
    }
}

/// Locates a record in error messages: position, tag, and `xml:id` if any.
pub struct RecordLocator<'a> {
    pub position: usize,
    pub record: &'a StructuralRecord,
}

impl<'a> RecordLocator<'a> {
    pub fn new(position: usize, record: &'a StructuralRecord) -> Self {
        Self { position, record }
    }
}

impl fmt::Display for RecordLocator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record #{} <{}", self.position, self.record.tag)?;
        if let Some(kind) = self.record.kind() {
            write!(f, " type=\"{}\"", kind)?;
        }
        if let Some(id) = self.record.id() {
            write!(f, " xml:id=\"{}\"", id)?;
        }
        write!(f, ">")
    }
}
