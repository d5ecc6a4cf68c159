use anyhow::{Context, Result, bail};
use std::env;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
const DEFAULT_DATABASE: &str = "tourism";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000"; // Next.js dev server

/// Process configuration, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub bind_address: String,
    pub mongodb_uri: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
    pub ip_salt: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = non_empty("PORT")
            .context("PORT not set")?
            .parse::<u16>()
            .context("PORT is not a valid port number")?;

        let mongodb_uri = non_empty("MONGODB_URI").context("MONGODB_URI not set")?;
        let jwt_secret = non_empty("JWT_SECRET").context("JWT_SECRET not set")?;

        let cors_origins: Vec<String> = non_empty("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        if cors_origins.is_empty() {
            bail!("CORS_ORIGINS must name at least one origin");
        }

        Ok(Self {
            port,
            bind_address: non_empty("BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            mongodb_uri,
            database_name: non_empty("MONGODB_DATABASE")
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            jwt_secret,
            cors_origins,
            ip_salt: non_empty("VIEW_IP_SALT"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("PORT", "8080"),
        ("MONGODB_URI", "mongodb://localhost:27017"),
        ("JWT_SECRET", "s3cret"),
    ];

    #[test]
    fn applies_defaults() {
        let s = settings(&REQUIRED).unwrap();
        assert_eq!(s.port, 8080);
        assert_eq!(s.bind_address, "127.0.0.1");
        assert_eq!(s.database_name, "tourism");
        assert_eq!(s.cors_origins, vec!["http://localhost:3000".to_string()]);
        assert!(s.ip_salt.is_none());
    }

    #[test]
    fn reads_optional_values() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("CORS_ORIGINS", "https://example.com, https://admin.example.com"));
        vars.push(("MONGODB_DATABASE", "site"));
        vars.push(("VIEW_IP_SALT", "pepper"));

        let s = settings(&vars).unwrap();
        assert_eq!(s.database_name, "site");
        assert_eq!(s.cors_origins.len(), 2);
        assert_eq!(s.cors_origins[1], "https://admin.example.com");
        assert_eq!(s.ip_salt.as_deref(), Some("pepper"));
    }

    #[test]
    fn blank_salt_disables_hashing() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("VIEW_IP_SALT", "  "));
        assert!(settings(&vars).unwrap().ip_salt.is_none());
    }

    #[test]
    fn missing_required_values_fail() {
        assert!(settings(&REQUIRED[1..]).is_err());
        assert!(settings(&[("PORT", "8080"), ("JWT_SECRET", "x")]).is_err());
        assert!(settings(&[("PORT", "eighty"), REQUIRED[1], REQUIRED[2]]).is_err());
    }
}
