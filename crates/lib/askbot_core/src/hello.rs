//! Greeting helpers.

/// Opening line the assistant shows before the user has asked anything.
pub const GREETING: &str = "Yow, what can I help you with today?";

/// Returns a greeting string with the crate version, used by health checks.
pub fn hello_world() -> String {
    format!("Hello from askbot_core v{}", super::version())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_world_contains_version() {
        let greeting = hello_world();
        assert!(greeting.starts_with("Hello from askbot_core v"));
        assert!(greeting.contains(env!("CARGO_PKG_VERSION")));
    }
}
