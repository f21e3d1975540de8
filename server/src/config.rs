use anyhow::{Result, bail};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub cors_allowed_origins: Vec<String>,
    pub seed_on_start: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cors_allowed_origins: vec!["http://localhost:5173".into()],
            seed_on_start: false,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let cors_allowed_origins = parse_origins(
            &std::env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let seed_on_start = match std::env::var("SEED_ON_START") {
            Ok(raw) => parse_flag(&raw)?,
            Err(_) => false,
        };

        Ok(Self {
            cors_allowed_origins,
            seed_on_start,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "" | "0" | "false" | "no" => Ok(false),
        other => bail!("SEED_ON_START must be a boolean, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_skip_blanks() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert!(parse_flag("YES").unwrap());
        assert!(parse_flag("1").unwrap());
        assert!(!parse_flag("false").unwrap());
        assert!(parse_flag("maybe").is_err());
    }
}
