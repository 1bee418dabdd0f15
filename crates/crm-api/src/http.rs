use std::time::Duration;

use crm_core::domain::Customer;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;
use url::Url;

use crate::source::CustomerSource;
use crate::wire::parse_customers;
use crate::{ApiError, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_USER_AGENT: &str = "crm-dash";

/// Connection settings shared by the customer source and the admin client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: Url,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl ClientOptions {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub(crate) fn build_client(&self) -> Result<Client> {
        Ok(Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()?)
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }
}

/// Rejects non-2xx responses with the status code kept for the caller.
pub(crate) fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(ApiError::Status {
        endpoint: response.url().path().to_string(),
        status: status.as_u16(),
    })
}

#[derive(Debug, Clone)]
pub struct HttpCustomerSource {
    client: Client,
    url: Url,
}

impl HttpCustomerSource {
    pub fn new(options: &ClientOptions) -> Result<Self> {
        Ok(Self {
            client: options.build_client()?,
            url: options.base_url.clone(),
        })
    }
}

impl CustomerSource for HttpCustomerSource {
    fn source_name(&self) -> &'static str {
        "http"
    }

    fn fetch_customers(&self) -> Result<Vec<Customer>> {
        debug!(url = %self.url, "fetching customers");
        let response = self
            .client
            .get(self.url.clone())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .send()?;
        let response = ensure_success(response)?;
        let body = response.text()?;
        let customers = parse_customers(&body)?;
        debug!(count = customers.len(), "customers fetched");
        Ok(customers)
    }
}

#[cfg(test)]
mod tests {
    use super::ClientOptions;
    use url::Url;

    #[test]
    fn endpoints_join_onto_base_path() {
        let base = Url::parse("http://127.0.0.1:8000/api/clientes/").unwrap();
        let options = ClientOptions::new(base);
        assert_eq!(
            options.endpoint("load_fake_data/").unwrap().as_str(),
            "http://127.0.0.1:8000/api/clientes/load_fake_data/"
        );
        assert_eq!(
            options.endpoint("reset_database/").unwrap().as_str(),
            "http://127.0.0.1:8000/api/clientes/reset_database/"
        );
    }
}
