use serde::de::DeserializeOwned;
use serde::de::value::{Error as ValueError, MapDeserializer};

/// One line of a gateway answer: `key=value&key=value...`, URL-decoded.
///
/// Field order follows the line. A repeated key keeps its first position and
/// its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseRecord {
    fields: Vec<(String, String)>,
}

impl ResponseRecord {
    /// Parse one line. Never fails: anything that does not look like a pair
    /// becomes a key with an empty value, and pairs with an empty key are dropped.
    ///
    /// Percent-escapes are decoded as UTF-8. Bytes that are not valid UTF-8
    /// (for example an `err_msg` sent in windows-1251) come out as U+FFFD and
    /// the original bytes are lost.
    pub fn parse_line(line: &str) -> Self {
        url::form_urlencoded::parse(line.as_bytes())
            .filter(|(key, _)| !key.is_empty())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encode back into the gateway line format.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }

    /// Read the record into a typed line struct; unknown keys are ignored.
    pub(crate) fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ValueError> {
        let deserializer: MapDeserializer<'_, _, ValueError> = MapDeserializer::new(self.iter());
        T::deserialize(deserializer)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResponseRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::default();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

/// Split a response body into records, one per non-blank line.
///
/// `\r\n`, `\n` and bare `\r` all end a line.
pub fn parse_records(body: &str) -> Vec<ResponseRecord> {
    body.split(['\r', '\n'])
        .filter(|line| !line.trim().is_empty())
        .map(ResponseRecord::parse_line)
        .collect()
}
