//! Which schools, programs or academic years an election applies to.
//!
//! Stored in a text column as either the sentinel `all` or a JSON array of
//! identifiers. Older rows may hold a bare identifier such as `BIO`; those
//! decode to a one-element selection.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sentinel meaning "every value".
pub const ALL_SENTINEL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    All,
    /// Identifiers in selection order. May be empty.
    Selected(Vec<String>),
}

impl Scope {
    /// Build a scope from raw multi-select values.
    ///
    /// Any `all` among the values wins. Blank entries are dropped.
    pub fn from_selection<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ids: Vec<String> = Vec::new();
        for value in values {
            let value = value.as_ref().trim();
            if value == ALL_SENTINEL {
                return Scope::All;
            }
            if !value.is_empty() && !ids.iter().any(|id| id == value) {
                ids.push(value.to_string());
            }
        }
        Scope::Selected(ids)
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Scope::All)
    }

    /// Column text for this scope.
    pub fn encode(&self) -> String {
        match self {
            Scope::All => ALL_SENTINEL.to_string(),
            Scope::Selected(ids) if ids.is_empty() => String::new(),
            Scope::Selected(ids) => {
                serde_json::to_string(ids).unwrap_or_else(|_| String::new())
            }
        }
    }

    /// Parse column text. Never fails: unparseable text becomes a
    /// single-element selection. A stored JSON array is kept as written.
    pub fn decode(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed == ALL_SENTINEL {
            return Scope::All;
        }
        if trimmed.is_empty() {
            return Scope::Selected(Vec::new());
        }

        match serde_json::from_str::<Vec<serde_json::Value>>(trimmed) {
            Ok(values) => Scope::Selected(values.iter().map(json_id).collect()),
            Err(e) => {
                tracing::debug!(value = %trimmed, error = %e, "Scope text is not a JSON array, keeping raw value");
                Scope::Selected(vec![trimmed.to_string()])
            }
        }
    }

    /// Values for re-populating a multi-select: `["all"]` or the identifiers.
    pub fn form_values(&self) -> Vec<String> {
        match self {
            Scope::All => vec![ALL_SENTINEL.to_string()],
            Scope::Selected(ids) => ids.clone(),
        }
    }

    /// Whether the identifier falls inside this scope.
    pub fn includes(&self, id: &str) -> bool {
        match self {
            Scope::All => true,
            Scope::Selected(ids) => ids.iter().any(|candidate| candidate == id),
        }
    }
}

fn json_id(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.form_values().serialize(serializer)
    }
}

/// One multi-select value as submitted: lookup ids may arrive as JSON
/// numbers or as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum SelectionItem {
    Text(String),
    Number(serde_json::Number),
}

impl From<SelectionItem> for String {
    fn from(item: SelectionItem) -> Self {
        match item {
            SelectionItem::Text(s) => s,
            SelectionItem::Number(n) => n.to_string(),
        }
    }
}

/// `deserialize_with` helper for multi-select fields: a list of strings or
/// numbers, numbers kept as their decimal text.
pub fn deserialize_selection<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<String>, D::Error> {
    let items = Vec::<SelectionItem>::deserialize(deserializer)?;
    Ok(items.into_iter().map(String::from).collect())
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(SelectionItem),
            Many(Vec<SelectionItem>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::One(value) => Scope::from_selection([String::from(value)]),
            Raw::Many(values) => Scope::from_selection(values.into_iter().map(String::from)),
        })
    }
}
