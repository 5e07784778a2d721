pub mod dataset;
pub mod domain;
pub mod report;
pub mod screen;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub dataset_path: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                dataset_path: std::env::var("SCREENER_DATASET").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_dataset_path(&self) -> anyhow::Result<&str> {
            self.dataset_path
                .as_deref()
                .context("SCREENER_DATASET is required")
        }
    }
}
