/// A single query parameter value.
///
/// Booleans are sent as `1` / `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl ParamValue {
    /// Wire form of the value, or `None` when it must not be sent at all.
    fn to_query_value(&self) -> Option<String> {
        match self {
            Self::Text(text) if text.is_empty() => None,
            Self::Text(text) => Some(text.clone()),
            Self::Int(value) => Some(value.to_string()),
            Self::Bool(value) => Some(if *value { "1" } else { "0" }.to_owned()),
        }
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Ordered command parameters for `rest.api`.
///
/// Absent values and empty strings are kept in the set but never reach the
/// query string. Zero and `false` are real values and are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiParameters {
    entries: Vec<(String, Option<ParamValue>)>,
}

impl ApiParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`ApiParameters::insert`] for a present value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, Some(value.into()));
        self
    }

    /// Builder-style [`ApiParameters::insert`] for an optional value.
    pub fn with_opt<V: Into<ParamValue>>(
        mut self,
        name: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        self.insert(name, value.map(Into::into));
        self
    }

    /// Set `name`, replacing an earlier value in place so the original order is kept.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<ParamValue>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        let idx = self.entries.iter().position(|(key, _)| key == name)?;
        self.entries.remove(idx).1
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name/value pairs that will be serialized, in insertion order.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter_map(|(key, value)| {
                let value = value.as_ref()?.to_query_value()?;
                Some((key.clone(), value))
            })
            .collect()
    }

    /// `application/x-www-form-urlencoded` query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_query_pairs())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_empty_values_are_stripped() {
        let params = ApiParameters::new()
            .with("phones", "79001234567")
            .with("text", "")
            .with_opt("charset", None::<String>)
            .with_opt("rep", Some(1));

        assert_eq!(
            params.to_query_pairs(),
            vec![
                ("phones".to_owned(), "79001234567".to_owned()),
                ("rep".to_owned(), "1".to_owned()),
            ]
        );
        assert!(!params.to_query_string().contains("text="));
        assert!(!params.to_query_string().contains("charset="));
    }

    #[test]
    fn zero_and_false_are_sent() {
        let params = ApiParameters::new().with("rep", 0).with("flash", false);
        assert_eq!(params.to_query_string(), "rep=0&flash=0");
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut params = ApiParameters::new().with("a", "1").with("b", "2");
        params.insert("a", Some("3".into()));
        assert_eq!(params.to_query_string(), "a=3&b=2");

        params.insert("a", None);
        assert_eq!(params.get("a"), None);
        assert_eq!(params.to_query_string(), "b=2");
    }

    #[test]
    fn remove_returns_previous_value() {
        let mut params = ApiParameters::new().with("cmd", "send");
        assert_eq!(params.remove("cmd"), Some(ParamValue::Text("send".to_owned())));
        assert_eq!(params.remove("cmd"), None);
        assert!(params.is_empty());
    }

    #[test]
    fn query_string_is_url_encoded() {
        let params = ApiParameters::new()
            .with("phones", "79001234567;79001234568")
            .with("text", "Тестовое сообщение & more");
        assert_eq!(
            params.to_query_string(),
            "phones=79001234567%3B79001234568&text=%D0%A2%D0%B5%D1%81%D1%82%D0%BE%D0%B2%D0%BE%D0%B5+%D1%81%D0%BE%D0%BE%D0%B1%D1%89%D0%B5%D0%BD%D0%B8%D0%B5+%26+more"
        );
    }
}
