//! Query-string encoding for option bags.
//!
//! Every options type lists its own fields through [`ToQuery`], pairing a wire name with a
//! value. Values equal to their type's zero value are skipped, so on the wire an unset
//! field and a zero field look the same.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Canonical text of a single scalar. Also used for the elements of a sequence field.
pub trait QueryScalar {
    fn to_query_text(&self) -> String;
}

/// A field value that can be placed in a query string.
pub trait QueryValue {
    /// Encoded text, or `None` when the value is its type's zero value.
    fn query_value(&self) -> Option<String>;
}

macro_rules! scalar_impls {
    ($zero:expr; $($t:ty),*) => {
        $(
            impl QueryScalar for $t {
                fn to_query_text(&self) -> String {
                    self.to_string()
                }
            }

            impl QueryValue for $t {
                fn query_value(&self) -> Option<String> {
                    if *self == $zero {
                        None
                    } else {
                        Some(self.to_query_text())
                    }
                }
            }
        )*
    };
}

scalar_impls!(0; i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
// Display for floats is the shortest round-trip decimal and never uses an exponent.
scalar_impls!(0.0; f32, f64);
scalar_impls!(false; bool);

impl QueryScalar for str {
    fn to_query_text(&self) -> String {
        self.to_owned()
    }
}

impl QueryValue for str {
    fn query_value(&self) -> Option<String> {
        (!self.is_empty()).then(|| self.to_owned())
    }
}

impl QueryScalar for String {
    fn to_query_text(&self) -> String {
        self.clone()
    }
}

impl QueryValue for String {
    fn query_value(&self) -> Option<String> {
        self.as_str().query_value()
    }
}

impl<T: QueryScalar + ?Sized> QueryScalar for &T {
    fn to_query_text(&self) -> String {
        (**self).to_query_text()
    }
}

impl<T: QueryValue + ?Sized> QueryValue for &T {
    fn query_value(&self) -> Option<String> {
        (**self).query_value()
    }
}

impl<T: QueryScalar> QueryValue for [T] {
    fn query_value(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let items: Vec<String> = self.iter().map(QueryScalar::to_query_text).collect();
        Some(items.join(","))
    }
}

impl<T: QueryScalar> QueryValue for Vec<T> {
    fn query_value(&self) -> Option<String> {
        self.as_slice().query_value()
    }
}

impl<T: QueryValue> QueryValue for Option<T> {
    fn query_value(&self) -> Option<String> {
        self.as_ref().and_then(QueryValue::query_value)
    }
}

/// The Unix epoch (`DateTime::default()`) is the zero timestamp.
impl QueryValue for DateTime<Utc> {
    fn query_value(&self) -> Option<String> {
        if *self == DateTime::<Utc>::default() {
            return None;
        }
        Some(self.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

/// Encode `value` as a single URL path segment. `/`, `?`, `#` and spaces are escaped.
pub fn path_segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Ordered list of query parameters built from an options value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `name` when `value` is not its zero value.
    pub fn push<V: QueryValue + ?Sized>(&mut self, name: &str, value: &V) -> &mut Self {
        if let Some(text) = value.query_value() {
            self.pairs.push((name.to_string(), text));
        }
        self
    }

    /// Append `name` as a compact JSON fragment. Null, empty objects, empty arrays and empty
    /// strings are skipped.
    pub fn push_json<T: Serialize + ?Sized>(
        &mut self,
        name: &str,
        value: &T,
    ) -> Result<&mut Self, serde_json::Error> {
        let json = serde_json::to_value(value)?;
        let empty = match &json {
            serde_json::Value::Null => true,
            serde_json::Value::Object(map) => map.is_empty(),
            serde_json::Value::Array(items) => items.is_empty(),
            serde_json::Value::String(s) => s.is_empty(),
            _ => false,
        };
        if !empty {
            self.pairs.push((name.to_string(), json.to_string()));
        }
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `application/x-www-form-urlencoded` string with keys sorted.
    pub fn encode(&self) -> String {
        let mut sorted: Vec<&(String, String)> = self.pairs.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(sorted.into_iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .finish()
    }
}

/// Options types that can be sent as URL query parameters.
pub trait ToQuery {
    /// Fails only when a structured field cannot be serialized to JSON.
    fn query_params(&self) -> Result<QueryParams, serde_json::Error>;

    fn to_query(&self) -> Result<String, serde_json::Error> {
        Ok(self.query_params()?.encode())
    }
}

/// `path` with the encoded query appended, or `path` unchanged when nothing is set.
pub fn with_query<Q: ToQuery + ?Sized>(
    path: &str,
    options: &Q,
) -> Result<String, serde_json::Error> {
    let query = options.to_query()?;
    if query.is_empty() {
        Ok(path.to_string())
    } else {
        Ok(format!("{}?{}", path, query))
    }
}
