use crate::config::types::{Config, CrawlerConfig, FilterConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_filter_config(&config.filter)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_http_url("seed-url", &config.seed_url)?;

    if let Some(base_url) = &config.base_url {
        validate_http_url("base-url", base_url)?;
    }

    // generations >= 0 is always true for u32; zero means "seed round only"

    if config.max_concurrent_workers < 1 || config.max_concurrent_workers > 256 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_workers must be between 1 and 256, got {}",
            config.max_concurrent_workers
        )));
    }

    if config.fetch_timeout_secs < 1 || config.fetch_timeout_secs > 600 {
        return Err(ConfigError::Validation(format!(
            "fetch_timeout_secs must be between 1 and 600, got {}",
            config.fetch_timeout_secs
        )));
    }

    Ok(())
}

/// Validates relevance filter configuration
fn validate_filter_config(config: &FilterConfig) -> Result<(), ConfigError> {
    if config.keywords.iter().all(|k| k.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "keywords must contain at least one non-blank word".to_string(),
        ));
    }

    if let Some(word) = config
        .keywords
        .iter()
        .chain(&config.exclusion_words)
        .find(|w| w.split_whitespace().count() > 1)
    {
        return Err(ConfigError::Validation(format!(
            "filter words are matched against single tokens, '{}' contains whitespace",
            word
        )));
    }

    if config.word_window < 1 {
        return Err(ConfigError::Validation(
            "word_window must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    // Validate contact URL
    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    // Validate contact email (basic validation)
    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.index_path.is_empty() {
        return Err(ConfigError::Validation(
            "index_path cannot be empty".to_string(),
        ));
    }

    if config.content_dir.is_empty() {
        return Err(ConfigError::Validation(
            "content_dir cannot be empty".to_string(),
        ));
    }

    if matches!(&config.summary_path, Some(path) if path.is_empty()) {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

/// Checks that a URL parses and is fetchable over HTTP(S)
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use an HTTP or HTTPS scheme",
            field, value
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    // Basic email format check: must contain @ and have text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    // Domain part should contain at least one dot
    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            crawler: CrawlerConfig {
                seed_url: "https://attack.mitre.org/techniques/T1587/001/".to_string(),
                base_url: Some("https://attack.mitre.org/".to_string()),
                generations: 10,
                max_concurrent_workers: 8,
                fetch_timeout_secs: 30,
            },
            filter: FilterConfig {
                keywords: vec!["malware".to_string()],
                exclusion_words: vec!["Template".to_string()],
                word_window: 200,
            },
            user_agent: UserAgentConfig {
                crawler_name: "TestCrawler".to_string(),
                crawler_version: "1.0".to_string(),
                contact_url: "https://example.com/about".to_string(),
                contact_email: "admin@example.com".to_string(),
            },
            output: OutputConfig::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_seed_url_must_be_http() {
        let mut config = valid_config();
        config.crawler.seed_url = "ftp://example.com/".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::Validation(_)
        ));

        config.crawler.seed_url = "not a url".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::InvalidUrl(_)
        ));
    }

    #[test]
    fn test_worker_pool_bounds() {
        let mut config = valid_config();
        config.crawler.max_concurrent_workers = 0;
        assert!(validate(&config).is_err());

        config.crawler.max_concurrent_workers = 257;
        assert!(validate(&config).is_err());

        config.crawler.max_concurrent_workers = 1;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_generations_allowed() {
        let mut config = valid_config();
        config.crawler.generations = 0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_keywords_required() {
        let mut config = valid_config();
        config.filter.keywords = vec![];
        assert!(validate(&config).is_err());

        config.filter.keywords = vec!["  ".to_string()];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_multi_word_filter_terms_rejected() {
        let mut config = valid_config();
        config.filter.exclusion_words = vec!["Talk page".to_string()];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_summary_path_rejected() {
        let mut config = valid_config();
        config.output.summary_path = Some(String::new());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("admin@sub.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@domain").is_err());
    }
}
