use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::http::{ensure_success, ClientOptions};
use crate::{ApiError, Result};

const GENERATE_PATH: &str = "load_fake_data/";
const RESET_PATH: &str = "reset_database/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    GenerateData,
    ResetDatabase,
}

impl AdminAction {
    pub fn progress_message(self) -> &'static str {
        match self {
            AdminAction::GenerateData => "Starting data load...",
            AdminAction::ResetDatabase => "Cleaning database...",
        }
    }

    pub fn failure_message(self, err: &ApiError) -> String {
        match self {
            AdminAction::GenerateData => format!("Error loading data: {err}"),
            AdminAction::ResetDatabase => format!("Error resetting database: {err}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub users: u64,
    pub companies: u64,
    pub customers: u64,
    pub interactions: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    #[serde(default)]
    pub statistics: Option<Statistics>,
}

impl GenerationReport {
    pub fn summary(&self) -> String {
        match &self.statistics {
            Some(stats) => format!(
                "Data loaded: {} users, {} companies, {} customers, {} interactions",
                stats.users, stats.companies, stats.customers, stats.interactions
            ),
            None => "Data loaded successfully".to_string(),
        }
    }
}

/// One-shot maintenance calls against the backend. Never retried.
#[derive(Debug, Clone)]
pub struct AdminClient {
    client: Client,
    generate_url: Url,
    reset_url: Url,
}

impl AdminClient {
    pub fn new(options: &ClientOptions) -> Result<Self> {
        Ok(Self {
            client: options.build_client()?,
            generate_url: options.endpoint(GENERATE_PATH)?,
            reset_url: options.endpoint(RESET_PATH)?,
        })
    }

    pub fn generate_data(&self) -> Result<GenerationReport> {
        debug!(url = %self.generate_url, "requesting data generation");
        let response = self
            .client
            .post(self.generate_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .send()?;
        let body = ensure_success(response)?.text()?;
        let report: GenerationReport =
            serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))?;
        info!(summary = %report.summary(), "data generation finished");
        Ok(report)
    }

    pub fn reset_database(&self) -> Result<()> {
        debug!(url = %self.reset_url, "requesting database reset");
        let response = self
            .client
            .post(self.reset_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .send()?;
        ensure_success(response)?;
        info!("database reset finished");
        Ok(())
    }

    /// Runs `action` and returns the status line to show on success.
    pub fn perform(&self, action: AdminAction) -> Result<String> {
        match action {
            AdminAction::GenerateData => Ok(self.generate_data()?.summary()),
            AdminAction::ResetDatabase => {
                self.reset_database()?;
                Ok("Database cleaned successfully".to_string())
            }
        }
    }
}
