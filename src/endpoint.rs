use std::fmt;

pub const CURRENT_BASE_PATH: &str = "/admin/api/v1";
pub const LEGACY_BASE_PATH: &str = "/fmi/admin/api/v1";

const LOOPBACK: &str = "127.0.0.1";

/// Server edition installed next to the CLI when no host is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edition {
    Current,
    Legacy,
}

impl Edition {
    pub fn detect() -> Self {
        match std::env::consts::OS {
            "linux" => Edition::Current,
            _ => Edition::Legacy,
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            Edition::Current => 8080,
            Edition::Legacy => 16001,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: &'static str,
    pub host: String,
    pub port: Option<u16>,
}

impl Endpoint {
    pub fn url(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{port}", self.scheme, self.host),
            None => format!("{}://{}", self.scheme, self.host),
        }
    }

    pub fn base_path(&self) -> &'static str {
        base_path(&self.url())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

pub fn resolve(fqdn: &str) -> Endpoint {
    resolve_for(fqdn, Edition::detect())
}

pub fn resolve_for(fqdn: &str, edition: Edition) -> Endpoint {
    let fqdn = fqdn.trim();
    if fqdn.is_empty() {
        Endpoint {
            scheme: "http",
            host: LOOPBACK.to_string(),
            port: Some(edition.default_port()),
        }
    } else {
        Endpoint {
            scheme: "https",
            host: fqdn.to_string(),
            port: None,
        }
    }
}

/// Picks the API base path from a resolved host URL. Only the legacy
/// edition's loopback address uses the legacy path.
pub fn base_path(url: &str) -> &'static str {
    let legacy = format!("http://{LOOPBACK}:{}", Edition::Legacy.default_port());
    if url.trim_end_matches('/') == legacy {
        LEGACY_BASE_PATH
    } else {
        CURRENT_BASE_PATH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_empty_is_loopback() {
        let current = resolve_for("", Edition::Current);
        assert_eq!(current.url(), "http://127.0.0.1:8080");
        assert_eq!(current.base_path(), CURRENT_BASE_PATH);

        let legacy = resolve_for("", Edition::Legacy);
        assert_eq!(legacy.url(), "http://127.0.0.1:16001");
        assert_eq!(legacy.base_path(), LEGACY_BASE_PATH);
    }

    #[test]
    fn resolve_detected_edition() {
        let endpoint = resolve("");
        assert_eq!(endpoint.scheme, "http");
        assert_eq!(endpoint.host, "127.0.0.1");
        assert!([CURRENT_BASE_PATH, LEGACY_BASE_PATH].contains(&endpoint.base_path()));
        if cfg!(target_os = "linux") {
            assert_eq!(endpoint.url(), "http://127.0.0.1:8080");
        } else {
            assert_eq!(endpoint.url(), "http://127.0.0.1:16001");
        }
    }

    #[test]
    fn resolve_fqdn_is_https() {
        let endpoint = resolve("example.jp");
        assert_eq!(endpoint.url(), "https://example.jp");
        assert_eq!(endpoint.port, None);
        assert_eq!(endpoint.base_path(), CURRENT_BASE_PATH);
    }

    #[test]
    fn base_path_by_host() {
        assert_eq!(base_path("http://127.0.0.1:8080"), "/admin/api/v1");
        assert_eq!(base_path("https://example.jp"), "/admin/api/v1");
        assert_eq!(base_path("http://127.0.0.1:16001"), "/fmi/admin/api/v1");
    }
}
