use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Normalized proxy mapping handed to a [`Transport`](crate::Transport): always a single
/// `"https"` entry.
pub type Proxies = BTreeMap<String, String>;

/// How a caller asks for a proxy.
///
/// Accepts nothing, a bare address (`"1.2.3.4:8080"`), or a scheme→address mapping
/// (`{"https": "1.2.3.4:8080"}`). Everything is reduced to a single `"https"` entry by
/// [`ProxySpec::normalize`] before it reaches the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProxySpec {
    /// No proxy.
    #[default]
    None,
    /// A single proxy address.
    Address(String),
    /// A mapping from URL scheme to proxy address.
    Map(BTreeMap<String, String>),
}

impl ProxySpec {
    /// Reduce this proxy request to `{"https": address}`, or `None` when no proxy applies.
    ///
    /// A mapping without an `"https"` entry falls back to its `"http"` entry; a mapping with
    /// neither yields no proxy.
    #[must_use]
    pub fn normalize(&self) -> Option<Proxies> {
        let address = match self {
            Self::None => return None,
            Self::Address(addr) => addr.clone(),
            Self::Map(map) => map.get("https").or_else(|| map.get("http"))?.clone(),
        };
        Some(BTreeMap::from([("https".to_string(), address)]))
    }

    /// Returns `true` if no proxy was requested.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl From<&str> for ProxySpec {
    fn from(addr: &str) -> Self {
        Self::Address(addr.to_string())
    }
}

impl From<String> for ProxySpec {
    fn from(addr: String) -> Self {
        Self::Address(addr)
    }
}

impl From<&String> for ProxySpec {
    fn from(addr: &String) -> Self {
        Self::Address(addr.clone())
    }
}

impl From<BTreeMap<String, String>> for ProxySpec {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self::Map(map)
    }
}

impl From<HashMap<String, String>> for ProxySpec {
    fn from(map: HashMap<String, String>) -> Self {
        Self::Map(map.into_iter().collect())
    }
}

impl<T: Into<ProxySpec>> From<Option<T>> for ProxySpec {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::None, Into::into)
    }
}
