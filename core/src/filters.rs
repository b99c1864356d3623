//! Query filters for GET requests.
//!
//! Absent values and empty strings are pruned before the query string is
//! built, so callers can pass optional form fields straight through.

use url::form_urlencoded;

/// A single filter value.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Absent,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl FilterValue {
    /// String form sent on the wire, or `None` when the key is pruned.
    fn to_query(&self) -> Option<String> {
        match self {
            FilterValue::Absent => None,
            FilterValue::Str(s) if s.is_empty() => None,
            FilterValue::Str(s) => Some(s.clone()),
            FilterValue::Int(n) => Some(n.to_string()),
            FilterValue::Float(n) => Some(n.to_string()),
            FilterValue::Bool(b) => Some(b.to_string()),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Str(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Str(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Int(value.into())
    }
}

impl From<u32> for FilterValue {
    fn from(value: u32) -> Self {
        FilterValue::Int(value.into())
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Float(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FilterValue::Absent, Into::into)
    }
}

/// Ordered key/value filters. Repeated keys are all sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    entries: Vec<(String, FilterValue)>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Form-encoded query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.entries {
            if let Some(value) = value.to_query() {
                serializer.append_pair(key, &value);
            }
        }
        serializer.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Filters
where
    K: Into<String>,
    V: Into<FilterValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = Filters::new();
        for (key, value) in iter {
            filters.push(key, value);
        }
        filters
    }
}
