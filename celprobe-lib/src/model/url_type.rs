use core::fmt;
use core::str::FromStr;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

/// A URL decomposed into the components visible to rule expressions.
///
/// An empty component means "absent". The string form produced by [`Display`](fmt::Display)
/// rebuilds a URL from the components and never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct UrlType {
    pub scheme: String,
    pub host: String,
    pub path: String,
    pub query: String,
    pub fragment: String,
}

impl UrlType {
    #[must_use]
    pub fn new(
        scheme: impl Into<String>,
        host: impl Into<String>,
        path: impl Into<String>,
        query: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            path: path.into(),
            query: query.into(),
            fragment: fragment.into(),
        }
    }

    /// Decompose an already parsed absolute URL. A non-default port stays part of the host.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        };

        Self {
            scheme: url.scheme().to_string(),
            host,
            path: url.path().to_string(),
            query: url.query().unwrap_or_default().to_string(),
            fragment: url.fragment().unwrap_or_default().to_string(),
        }
    }

    /// Split a relative reference verbatim, without normalizing the path.
    fn from_relative(s: &str) -> Self {
        let (rest, fragment) = s.split_once('#').unwrap_or((s, ""));
        let (rest, query) = rest.split_once('?').unwrap_or((rest, ""));

        let (host, path) = match rest.strip_prefix("//") {
            Some(authority) => authority.find('/').map_or((authority, ""), |i| authority.split_at(i)),
            None => ("", rest),
        };

        Self::new("", host, path, query, fragment)
    }
}

impl fmt::Display for UrlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut emitted = false;

        if !self.scheme.is_empty() {
            write!(f, "{}:", self.scheme)?;
            emitted = true;
        }

        if !self.scheme.is_empty() || !self.host.is_empty() {
            if !self.host.is_empty() || !self.path.is_empty() {
                f.write_str("//")?;
                emitted = true;
            }
            if !self.host.is_empty() {
                f.write_str(&self.host)?;
            }
        }

        let path = self.path.as_str();
        if !path.is_empty() && !path.starts_with('/') && !self.host.is_empty() {
            f.write_str("/")?;
            emitted = true;
        }

        // a leading "seg:" would read back as a scheme
        if !emitted
            && let Some(colon) = path.find(':')
            && !path.as_bytes().iter().take(colon).any(|&b| b == b'/')
        {
            f.write_str("./")?;
        }

        f.write_str(path)?;

        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }

        if !self.fragment.is_empty() {
            write!(f, "#{}", self.fragment)?;
        }

        Ok(())
    }
}

impl FromStr for UrlType {
    type Err = url::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("./") || s.starts_with('/') || s.starts_with('?') || s.starts_with('#') {
            return Ok(Self::from_relative(s));
        }

        match Url::parse(s) {
            Ok(url) => Ok(Self::from_url(&url)),
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Self::from_relative(s)),
            Err(e) => Err(e),
        }
    }
}

impl Serialize for UrlType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UrlType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|e| D::Error::custom(format!("invalid URL '{s}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(scheme: &str, host: &str, path: &str, query: &str, fragment: &str) -> UrlType {
        UrlType::new(scheme, host, path, query, fragment)
    }

    #[test]
    fn test_full_url() {
        let u = url("http", "example.com", "/a", "x=1", "");
        assert_eq!(u.to_string(), "http://example.com/a?x=1");
    }

    #[test]
    fn test_fragment() {
        let u = url("https", "example.com:8443", "/index.html", "a=b", "top");
        assert_eq!(u.to_string(), "https://example.com:8443/index.html?a=b#top");
    }

    #[test]
    fn test_colon_path_is_disambiguated() {
        assert_eq!(url("", "", "a:b", "", "").to_string(), "./a:b");
    }

    #[test]
    fn test_colon_after_slash_is_left_alone() {
        assert_eq!(url("", "", "a/b:c", "", "").to_string(), "a/b:c");
        assert_eq!(url("", "", "/a:b", "", "").to_string(), "/a:b");
    }

    #[test]
    fn test_relative_path_gets_slash_after_host() {
        assert_eq!(url("http", "example.com", "a", "", "").to_string(), "http://example.com/a");
    }

    #[test]
    fn test_host_without_scheme() {
        assert_eq!(url("", "example.com", "/x", "", "").to_string(), "//example.com/x");
    }

    #[test]
    fn test_scheme_only() {
        assert_eq!(url("http", "", "", "", "").to_string(), "http:");
    }

    #[test]
    fn test_scheme_with_host_and_no_path() {
        assert_eq!(url("http", "example.com", "", "q", "").to_string(), "http://example.com?q");
    }

    #[test]
    fn test_empty() {
        assert_eq!(UrlType::default().to_string(), "");
    }

    #[test]
    fn test_query_and_fragment_only() {
        assert_eq!(url("", "", "", "a=1", "f").to_string(), "?a=1#f");
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let u = url("http", "example.com", "p:q", "x", "y");
        assert_eq!(u.to_string(), u.to_string());
        assert_eq!(u.to_string(), "http://example.com/p:q?x#y");
    }

    #[test]
    fn test_parse_absolute() {
        let u: UrlType = "http://example.com:8080/a/b?x=1#frag".parse().unwrap();
        assert_eq!(u, url("http", "example.com:8080", "/a/b", "x=1", "frag"));
    }

    #[test]
    fn test_parse_drops_default_port() {
        let u: UrlType = "https://example.com:443/".parse().unwrap();
        assert_eq!(u.host, "example.com");
    }

    #[test]
    fn test_parse_relative() {
        let u: UrlType = "./a:b".parse().unwrap();
        assert_eq!(u, url("", "", "./a:b", "", ""));

        let u: UrlType = "/path?q=1#f".parse().unwrap();
        assert_eq!(u, url("", "", "/path", "q=1", "f"));

        let u: UrlType = "//cdn.example.com/lib.js".parse().unwrap();
        assert_eq!(u, url("", "cdn.example.com", "/lib.js", "", ""));
    }

    #[test]
    fn test_round_trip_is_idempotent() {
        for s in [
            "http://example.com/a?x=1",
            "https://example.com:8443/index.html?a=b#top",
            "http://example.com/",
            "./a:b",
            "/p/q?r#s",
            "//example.com/x",
        ] {
            let once = s.parse::<UrlType>().unwrap().to_string();
            let twice = once.parse::<UrlType>().unwrap().to_string();
            assert_eq!(once, s);
            assert_eq!(twice, once);
        }
    }

    #[test]
    fn test_serde_uses_string_form() {
        #[derive(Deserialize, Serialize)]
        struct Holder {
            url: UrlType,
        }

        let holder: Holder = toml::from_str("url = \"http://example.com/a?x=1\"").unwrap();
        assert_eq!(holder.url.path, "/a");

        let text = toml::to_string(&holder).unwrap();
        assert_eq!(text.trim(), "url = \"http://example.com/a?x=1\"");
    }
}
