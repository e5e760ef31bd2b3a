//! Post-login callback URL handling.

use serde::Deserialize;

const DEFAULT_CALLBACK: &str = "/";

/// A same-origin path the browser is sent to after sign-in or sign-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackUrl(String);

impl CallbackUrl {
    /// Accept `raw` only if it is a local path, otherwise fall back to `/`.
    ///
    /// Rejects absolute URLs, protocol-relative `//host` forms, backslashes
    /// (browsers treat `/\host` like `//host`) and control characters.
    pub fn sanitize(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(path) if is_local_path(path) => CallbackUrl(path.to_string()),
            _ => CallbackUrl(DEFAULT_CALLBACK.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CallbackUrl {
    fn default() -> Self {
        CallbackUrl(DEFAULT_CALLBACK.to_string())
    }
}

impl std::fmt::Display for CallbackUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.chars().any(char::is_control)
}

/// `?callbackUrl=` query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

impl CallbackQuery {
    pub fn callback(&self) -> CallbackUrl {
        CallbackUrl::sanitize(self.callback_url.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_root() {
        assert_eq!(CallbackUrl::sanitize(None).as_str(), "/");
        assert_eq!(CallbackUrl::sanitize(Some("")).as_str(), "/");
        assert_eq!(CallbackQuery::default().callback().as_str(), "/");
    }

    #[test]
    fn keeps_local_paths() {
        assert_eq!(
            CallbackUrl::sanitize(Some("/notes?id=3#top")).as_str(),
            "/notes?id=3#top"
        );
    }

    #[test]
    fn rejects_off_site_targets() {
        for raw in [
            "https://evil.example/",
            "//evil.example",
            "/\\evil.example",
            "javascript:alert(1)",
            "notes",
            "/a\nb",
        ] {
            assert_eq!(CallbackUrl::sanitize(Some(raw)).as_str(), "/", "{raw}");
        }
    }
}
