//! Return and risk calculations: simple and holding-period returns, XIRR,
//! time-weighted chaining, volatility/Sharpe/drawdown and attribution.

mod attribution;
mod flow_classifier;
mod performance_model;
mod performance_service;
mod returns;
mod risk_metrics;
mod xirr;

pub use attribution::*;
pub use flow_classifier::{cash_flows_for, classify_flow};
pub use performance_model::*;
pub use performance_service::*;
pub use returns::*;
pub use risk_metrics::*;
pub use xirr::*;
