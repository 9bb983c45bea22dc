use serde::Deserialize;

/// Main configuration structure for the crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub filter: FilterConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the seed round starts from
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Base every discovered href is resolved against.
    /// When absent, links resolve against the page they were found on.
    #[serde(rename = "base-url", default)]
    pub base_url: Option<String>,

    /// Number of generations to run after the seed round
    pub generations: u32,

    /// Maximum number of workers running at once within a generation
    #[serde(rename = "max-concurrent-workers")]
    pub max_concurrent_workers: u32,

    /// Per-request timeout in seconds
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

/// Relevance filter configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// A page is relevant if any of these appears in its leading words
    pub keywords: Vec<String>,

    /// A page is rejected if its title contains any of these as a whole word
    #[serde(rename = "exclusion-words", default)]
    pub exclusion_words: Vec<String>,

    /// How many leading words of the page text are searched for keywords
    #[serde(rename = "word-window", default = "default_word_window")]
    pub word_window: usize,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// File receiving one `title:url` line per accepted page
    #[serde(rename = "index-path", default = "default_index_path")]
    pub index_path: String,

    /// Directory receiving one text file per accepted page
    #[serde(rename = "content-dir", default = "default_content_dir")]
    pub content_dir: String,

    /// Optional markdown run summary
    #[serde(rename = "summary-path", default)]
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            index_path: default_index_path(),
            content_dir: default_content_dir(),
            summary_path: None,
        }
    }
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_word_window() -> usize {
    200
}

fn default_index_path() -> String {
    "urls.csv".to_string()
}

fn default_content_dir() -> String {
    "text".to_string()
}
