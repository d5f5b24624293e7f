//! Ken French data library client.

use super::factors::FamaFrenchFactors;
use crate::error::{DataError, Result};
use std::io::{Cursor, Read};
use std::time::Duration;
use zip::ZipArchive;

/// Monthly research factors archive on the Ken French data library.
pub const RESEARCH_FACTORS_URL: &str = "https://mba.tuck.dartmouth.edu/pages/faculty/ken.french/ftp/F-F_Research_Data_Factors_CSV.zip";

/// User agent sent with data library requests.
const USER_AGENT: &str = "Carhart-Research/0.1";

/// Downloads the Fama-French research factors.
#[derive(Debug, Clone)]
pub struct FamaFrenchClient {
    client: reqwest::Client,
    url: String,
}

impl FamaFrenchClient {
    /// Client for the public data library.
    pub fn new() -> Result<Self> {
        Self::with_url(RESEARCH_FACTORS_URL)
    }

    /// Client for a mirror of the research factors archive.
    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Download and parse the monthly three-factor series.
    ///
    /// # Example
    /// ```no_run
    /// use carhart_data::french::FamaFrenchClient;
    ///
    /// # async fn example() -> carhart_data::Result<()> {
    /// let factors = FamaFrenchClient::new()?.fetch_monthly().await?;
    /// println!("{} months of factor data", factors.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch_monthly(&self) -> Result<FamaFrenchFactors> {
        tracing::debug!(url = %self.url, "downloading Fama-French factors");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(DataError::Network)?;

        if !response.status().is_success() {
            return Err(DataError::Http(format!(
                "Failed to download factor archive: HTTP {}",
                response.status()
            )));
        }

        let bytes = response.bytes().await.map_err(DataError::Network)?;
        let csv = extract_csv(&bytes)?;
        let factors = FamaFrenchFactors::parse(csv.as_slice())?;

        tracing::info!(months = factors.len(), "loaded Fama-French factors");
        Ok(factors)
    }
}

/// Pull the first CSV member out of a data library zip archive.
pub fn extract_csv(archive: &[u8]) -> Result<Vec<u8>> {
    let mut zip = ZipArchive::new(Cursor::new(archive))?;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        if !entry.name().to_ascii_lowercase().ends_with(".csv") {
            continue;
        }
        let mut buf = Vec::new();
        entry.read_to_end(&mut buf)?;
        return Ok(buf);
    }

    Err(DataError::MissingData {
        symbol: "Fama-French".to_string(),
        reason: "archive contains no CSV file".to_string(),
    })
}
