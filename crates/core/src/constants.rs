use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Reporting currency used when none is configured
pub const DEFAULT_REPORTING_CURRENCY: &str = "CAD";

/// A holding at or above this share of the portfolio (in percent) is flagged
pub const DEFAULT_CONCENTRATION_THRESHOLD_PCT: Decimal = dec!(20);

/// HHI above this marks the portfolio as concentrated
pub const HHI_CONCENTRATION_THRESHOLD: Decimal = dec!(2500);

/// Annual risk-free rate used by the Sharpe ratio, in percent
pub const DEFAULT_RISK_FREE_RATE_ANNUAL_PCT: Decimal = dec!(4.0);

/// Return series are monthly
pub const PERIODS_PER_YEAR: Decimal = dec!(12);

/// Day count base for XIRR discounting
pub const DAYS_PER_YEAR: Decimal = dec!(365);

/// Rate used by the FX normalizer when nothing else is known
pub const DEFAULT_FALLBACK_FX_RATE: Decimal = Decimal::ONE;

/// Allocation drift (in points) that triggers a rebalancing suggestion
pub const DEFAULT_REBALANCE_THRESHOLD_PCT: Decimal = dec!(5);

/// Maximum simultaneous quote requests during a refresh
pub const DEFAULT_REFRESH_CONCURRENCY: usize = 4;

pub const ONE_HUNDRED: Decimal = dec!(100);
