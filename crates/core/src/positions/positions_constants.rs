use super::positions_model::AssetClass;

/// Import aliases for asset classes, matched case-insensitively after trimming.
pub const ASSET_CLASS_MAPPING: &[(&str, AssetClass)] = &[
    ("stock", AssetClass::PublicEquities),
    ("stocks", AssetClass::PublicEquities),
    ("equity", AssetClass::PublicEquities),
    ("equities", AssetClass::PublicEquities),
    ("public equity", AssetClass::PublicEquities),
    ("public equities", AssetClass::PublicEquities),
    ("etf", AssetClass::PublicEquities),
    ("private", AssetClass::PrivateBusiness),
    ("private equity", AssetClass::PrivateBusiness),
    ("private business", AssetClass::PrivateBusiness),
    ("venture", AssetClass::VentureFund),
    ("vc", AssetClass::VentureFund),
    ("venture capital", AssetClass::VentureFund),
    ("venture fund", AssetClass::VentureFund),
    ("venture entity", AssetClass::VentureEntity),
    ("startup", AssetClass::VentureEntity),
    ("property", AssetClass::RealEstate),
    ("real estate", AssetClass::RealEstate),
    ("precious metals", AssetClass::Gold),
    ("gold", AssetClass::Gold),
    ("bitcoin", AssetClass::Crypto),
    ("btc", AssetClass::Crypto),
    ("crypto", AssetClass::Crypto),
    ("cryptocurrency", AssetClass::Crypto),
    ("cash", AssetClass::CashEquivalents),
    ("money market", AssetClass::CashEquivalents),
    ("cash & equivalents", AssetClass::CashEquivalents),
    ("bond", AssetClass::Bonds),
    ("bonds", AssetClass::Bonds),
    ("fixed income", AssetClass::Bonds),
    ("fund", AssetClass::Fund),
    ("derivative", AssetClass::Derivatives),
    ("derivatives", AssetClass::Derivatives),
    ("options", AssetClass::Derivatives),
    ("other", AssetClass::Other),
];

/// Prices younger than this many days are fresh
pub const FRESH_MAX_DAYS: i64 = 7;

/// Prices younger than this many days are aging
pub const AGING_MAX_DAYS: i64 = 30;

/// Prices younger than this many days are stale; anything older is very stale
pub const STALE_MAX_DAYS: i64 = 120;
