//! Momentum factors
//!
//! Momentum captures the tendency of securities with strong trailing returns
//! to keep outperforming. [`MomentumFactor`] scores every security on its
//! skip-lagged trailing return; [`UmdFactor`] turns monthly scores into the
//! winners-minus-losers return series used in the Carhart model.

pub mod trailing;
pub mod umd;

pub use trailing::{MomentumFactor, MomentumFactorConfig};
pub use umd::{UmdConfig, UmdFactor};
