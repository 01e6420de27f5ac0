//! Provider capabilities.

use crate::models::AssetKind;

/// Describes what a market data provider can price.
#[derive(Clone, Debug)]
pub struct ProviderCapabilities {
    /// Asset kinds this provider supports.
    pub asset_kinds: &'static [AssetKind],
}

impl ProviderCapabilities {
    pub fn supports(&self, kind: AssetKind) -> bool {
        self.asset_kinds.contains(&kind)
    }
}
