use std::collections::BTreeMap;

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};

pub type Fields = BTreeMap<String, String>;

/// A fully specified outbound HTTP request.
///
/// Every field takes part in equality and hashing, so a `Request` is its
/// own cache key.  The maps are ordered, which makes the identity
/// independent of the order fields were added in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Fields,
    pub data: Fields,
    pub params: Fields,
    pub cookies: Fields,
}

impl Request {
    pub fn new<S: ToString>(method: Method, url: S) -> Self {
        Request {
            method,
            url: url.to_string(),
            headers: Fields::new(),
            data: Fields::new(),
            params: Fields::new(),
            cookies: Fields::new(),
        }
    }

    pub fn get<S: ToString>(url: S) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post<S: ToString>(url: S) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn header<K: ToString, V: ToString>(mut self, k: K, v: V) -> Self {
        self.headers.insert(k.to_string(), v.to_string());
        self
    }

    pub fn data<K: ToString, V: ToString>(mut self, k: K, v: V) -> Self {
        self.data.insert(k.to_string(), v.to_string());
        self
    }

    pub fn param<K: ToString, V: ToString>(mut self, k: K, v: V) -> Self {
        self.params.insert(k.to_string(), v.to_string());
        self
    }

    pub fn headers(mut self, h: Fields) -> Self {
        self.headers.extend(h);
        self
    }

    pub fn form(mut self, data: Fields) -> Self {
        self.data.extend(data);
        self
    }

    pub fn query(mut self, params: Fields) -> Self {
        self.params.extend(params);
        self
    }

    pub fn cookies(mut self, cookies: Fields) -> Self {
        self.cookies.extend(cookies);
        self
    }

    /// The cookies rendered as a single `Cookie` header value.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let s = self
            .cookies
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("; ");
        Some(s)
    }
}

/// What came back for a [`Request`].  The body is read eagerly so the
/// response can be cached and shared.
#[derive(Debug, Clone)]
pub struct Response {
    pub url: String,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub cookies: Fields,
    pub body: String,
}

impl Response {
    pub fn new<S: ToString>(url: S, status: StatusCode) -> Self {
        Response {
            url: url.to_string(),
            status,
            headers: HeaderMap::new(),
            cookies: Fields::new(),
            body: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity_ignores_insertion_order() {
        let a = Request::get("https://open.kattis.com/problems")
            .header("User-Agent", "kattis-cli-submit")
            .header("Accept", "text/html")
            .param("page", "2")
            .param("order", "name");
        let b = Request::get("https://open.kattis.com/problems")
            .param("order", "name")
            .header("Accept", "text/html")
            .param("page", "2")
            .header("User-Agent", "kattis-cli-submit");
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_cookies_change_identity() {
        let anon = Request::get("https://open.kattis.com/users/alice");
        let mut jar = Fields::new();
        jar.insert(String::from("EduSiteCookie"), String::from("xyz"));
        let authed = anon.clone().cookies(jar);
        assert_ne!(anon, authed);
        assert_ne!(anon, Request::post("https://open.kattis.com/users/alice"));
    }

    #[test]
    fn test_cookie_header() {
        assert_eq!(Request::get("u").cookie_header(), None);
        let r = Request::get("u").cookies(
            [("b", "2"), ("a", "1")]
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        assert_eq!(r.cookie_header().as_deref(), Some("a=1; b=2"));
    }
}
