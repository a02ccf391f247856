pub const DEFAULT_PUBLIC_HOST: &str = "http://127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Scheme and authority of the storefront backend, optionally with a path
    /// prefix. The payment route is appended to it verbatim.
    pub public_host: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            public_host: DEFAULT_PUBLIC_HOST.into(),
        }
    }
}

impl ClientSettings {
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    pub fn from_env_with(env: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(v) = env("STOREFRONT_PUBLIC_HOST").filter(|v| !v.trim().is_empty()) {
            settings.public_host = v.trim().to_string();
        }
        settings
    }
}
