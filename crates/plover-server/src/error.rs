use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {env_var}")]
    MissingEnvVar { env_var: String },

    #[error(transparent)]
    Other(#[from] config::ConfigError),
}

/// Map a settings field path like `server.port` to its environment variable
pub fn to_env_var(field: &str) -> String {
    format!("PLOVER_{}", field.replace('.', "__").to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_env_var() {
        assert_eq!(to_env_var("server.port"), "PLOVER_SERVER__PORT");
        assert_eq!(to_env_var("host"), "PLOVER_HOST");
    }
}
