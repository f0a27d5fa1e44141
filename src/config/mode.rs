//! Execution mode, read once from the environment.

/// Variables consulted, in order. The first non-empty one wins.
const ENV_VARS: [&str; 2] = ["KILN_ENV", "NODE_ENV"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    #[default]
    Development,
    Production,
}

impl ExecutionMode {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        ENV_VARS
            .iter()
            .find_map(|key| lookup(key).filter(|value| !value.trim().is_empty()))
            .map_or(Self::Development, |value| Self::parse(&value))
    }

    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }

    /// Production builds are minified unless told otherwise.
    pub const fn minify_by_default(self) -> bool {
        matches!(self, Self::Production)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    #[test]
    fn test_default_is_development() {
        let mode = ExecutionMode::from_lookup(env(&[]));
        assert_eq!(mode, ExecutionMode::Development);
        assert!(!mode.minify_by_default());
    }

    #[test]
    fn test_node_env_fallback() {
        let mode = ExecutionMode::from_lookup(env(&[("NODE_ENV", "production")]));
        assert_eq!(mode, ExecutionMode::Production);
        assert!(mode.minify_by_default());
    }

    #[test]
    fn test_kiln_env_wins() {
        let mode = ExecutionMode::from_lookup(env(&[
            ("KILN_ENV", "development"),
            ("NODE_ENV", "production"),
        ]));
        assert_eq!(mode, ExecutionMode::Development);

        let mode = ExecutionMode::from_lookup(env(&[("KILN_ENV", " "), ("NODE_ENV", "Production")]));
        assert_eq!(mode, ExecutionMode::Production);
    }
}
