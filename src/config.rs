// src/config.rs

use anyhow::{Context, Result};
use std::{env, path::PathBuf};

use crate::dates::NativeDateBasis;

pub const DEFAULT_API_URL: &str = "https://makhanchor-backend-production.up.railway.app/api";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_url: String,
    pub session_file: PathBuf,
    pub native_date_basis: NativeDateBasis,
}

impl AppConfig {
    /// Read the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = get("MAKHANCHOR_API_URL")
            .or_else(|| get("REACT_APP_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let session_file = get("MAKHANCHOR_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| home_dir(&lookup).join(".makhanchor").join("session.json"));

        let native_date_basis = match get("MAKHANCHOR_NATIVE_DATE_BASIS") {
            Some(v) => v
                .parse::<NativeDateBasis>()
                .context("reading MAKHANCHOR_NATIVE_DATE_BASIS")?,
            None => NativeDateBasis::default(),
        };

        Ok(Self {
            api_url,
            session_file,
            native_date_basis,
        })
    }
}

fn home_dir<F: Fn(&str) -> Option<String>>(lookup: &F) -> PathBuf {
    lookup("HOME")
        .or_else(|| lookup("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults() -> Result<()> {
        let cfg = config(&[("HOME", "/home/ops")])?;
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.session_file, PathBuf::from("/home/ops/.makhanchor/session.json"));
        assert_eq!(cfg.native_date_basis, NativeDateBasis::Local);
        Ok(())
    }

    #[test]
    fn own_url_wins_over_fallback_name() -> Result<()> {
        let cfg = config(&[
            ("REACT_APP_API_URL", "http://fallback/api"),
            ("MAKHANCHOR_API_URL", "http://localhost:5000/api"),
        ])?;
        assert_eq!(cfg.api_url, "http://localhost:5000/api");

        let cfg = config(&[("REACT_APP_API_URL", "http://fallback/api"), ("MAKHANCHOR_API_URL", " ")])?;
        assert_eq!(cfg.api_url, "http://fallback/api");
        Ok(())
    }

    #[test]
    fn date_basis_is_validated() {
        let cfg = config(&[("MAKHANCHOR_NATIVE_DATE_BASIS", "utc")]).unwrap();
        assert_eq!(cfg.native_date_basis, NativeDateBasis::Utc);
        assert!(config(&[("MAKHANCHOR_NATIVE_DATE_BASIS", "mars")]).is_err());
    }
}
