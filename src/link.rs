use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;
use url::Url;

use crate::selection::{DateField, DateSelection};

/// Unreserved characters plus `:`, which stays readable in timestamps.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b':');

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("invalid link '{input}': {source}")]
    Parse {
        input: String,
        #[source]
        source: url::ParseError,
    },
}

/// The shareable link: an absolute URL whose query holds the current
/// selection. Parameters keep their order; `set` replaces a value in place or
/// appends a new parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkState {
    base: Url,
    params: Vec<(String, String)>,
}

impl LinkState {
    pub fn parse(input: &str) -> Result<Self, LinkError> {
        let url = Url::parse(input.trim()).map_err(|source| LinkError::Parse {
            input: input.to_string(),
            source,
        })?;
        let params = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let mut base = url;
        base.set_query(None);
        base.set_fragment(None);
        Ok(Self { base, params })
    }

    /// Link on `base` carrying raw date values, in `fromDate`, `toDate`
    /// order. Values are stored trimmed but unchecked; missing ones are left
    /// out and defaulted at load.
    pub fn with_selection(
        base: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Self, LinkError> {
        let mut link = Self::parse(base)?;
        for (field, value) in [(DateField::From, from), (DateField::To, to)] {
            if let Some(value) = value {
                link.set(field.param(), value.trim());
            }
        }
        Ok(link)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, name: &str, value: &str) {
        let mut found = false;
        self.params.retain_mut(|(k, v)| {
            if k != name {
                return true;
            }
            if found {
                return false;
            }
            found = true;
            *v = value.to_string();
            true
        });
        if !found {
            self.params.push((name.to_string(), value.to_string()));
        }
    }

    pub fn field(&self, field: DateField) -> Option<&str> {
        self.get(field.param())
    }

    pub fn set_field(&mut self, field: DateField, selection: &DateSelection) {
        self.set(field.param(), &selection.to_param());
    }

    /// Full link text. Values produced by `DateSelection` are left readable
    /// (`:` is legal in a query); anything else is percent-encoded.
    pub fn to_url(&self) -> Url {
        let mut url = self.base.clone();
        if !self.params.is_empty() {
            let query = self
                .params
                .iter()
                .map(|(k, v)| {
                    format!(
                        "{}={}",
                        utf8_percent_encode(k, QUERY_VALUE),
                        utf8_percent_encode(v, QUERY_VALUE)
                    )
                })
                .collect::<Vec<_>>()
                .join("&");
            url.set_query(Some(&query));
        }
        url
    }

    pub fn as_string(&self) -> String {
        self.to_url().to_string()
    }
}

/// Where the current link lives between launches. Writing always replaces
/// the previous link; there is no history stack.
pub trait Location {
    fn replace(&mut self, link: &LinkState);
}

/// Keeps the last link in memory only.
#[derive(Debug, Default)]
pub struct MemoryLocation {
    pub current: Option<String>,
    pub writes: usize,
}

impl Location for MemoryLocation {
    fn replace(&mut self, link: &LinkState) {
        self.current = Some(link.as_string());
        self.writes += 1;
    }
}
