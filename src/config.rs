//! Process-level configuration for the HTTP editor host.

const DEFAULT_PORT: u16 = 3000;

/// Listener settings, read once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
}

impl ServerConfig {
    /// Read `PORT`, falling back to 3000 when unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        Self { port }
    }

    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
