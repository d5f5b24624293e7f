//! Fama-French research factors from the Ken French data library.
//!
//! # Example
//!
//! ```no_run
//! use carhart_data::french::{FamaFrenchClient, FamaFrenchFactors};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Download the monthly factors...
//!     let factors = FamaFrenchClient::new()?.fetch_monthly().await?;
//!
//!     // ...or read a local copy of the CSV.
//!     let local = FamaFrenchFactors::from_path("data/ff_monthly.csv")?;
//!
//!     println!("{} / {} months", factors.len(), local.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod factors;

pub use client::{FamaFrenchClient, RESEARCH_FACTORS_URL, extract_csv};
pub use factors::{FamaFrenchFactors, FamaFrenchRow, period_key};
