use std::time::Duration;

use crate::config::ProbeConfig;

/// Result of the liveness probe. The probe is advisory: any HTTP answer, whatever
/// its status, counts as available. Only transport failures and timeouts do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unreachable,
}

#[derive(Debug, Clone)]
pub struct StreamProbe {
    client: reqwest::Client,
    enabled: bool,
    trusted_hosts: Vec<String>,
}

impl StreamProbe {
    pub fn new(config: &ProbeConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(format!("camterm/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            enabled: config.enabled,
            trusted_hosts: config.trusted_hosts.clone(),
        })
    }

    fn is_trusted(&self, url: &str) -> bool {
        self.trusted_hosts
            .iter()
            .any(|host| !host.is_empty() && url.contains(host.as_str()))
    }

    pub async fn check(&self, url: &str) -> Availability {
        if !self.enabled || self.is_trusted(url) {
            return Availability::Available;
        }

        match self.client.head(url).send().await {
            Ok(res) => {
                tracing::debug!(url = %url, status = %res.status(), "stream probe answered");
                Availability::Available
            }
            Err(e) => {
                tracing::warn!(url = %url, timeout = e.is_timeout(), error = %e, "stream probe failed");
                Availability::Unreachable
            }
        }
    }
}
