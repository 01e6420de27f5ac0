use super::transactions_model::TransactionType;

/// Import aliases for transaction types, matched case-insensitively after trimming.
pub const TRANSACTION_TYPE_MAPPING: &[(&str, TransactionType)] = &[
    ("buy", TransactionType::Buy),
    ("purchase", TransactionType::Buy),
    ("bought", TransactionType::Buy),
    ("acquired", TransactionType::Buy),
    ("sell", TransactionType::Sell),
    ("sold", TransactionType::Sell),
    ("sale", TransactionType::Sell),
    ("dividend", TransactionType::Dividend),
    ("div", TransactionType::Dividend),
    ("distribution", TransactionType::Distribution),
    ("dist", TransactionType::Distribution),
    ("capital call", TransactionType::CapitalCall),
    ("call", TransactionType::CapitalCall),
    ("capital return", TransactionType::CapitalReturn),
    ("return of capital", TransactionType::CapitalReturn),
    ("interest", TransactionType::Interest),
    ("fee", TransactionType::Fee),
    ("fees", TransactionType::Fee),
    ("expense", TransactionType::Fee),
    ("transfer in", TransactionType::TransferIn),
    ("transfer out", TransactionType::TransferOut),
    ("valuation", TransactionType::Valuation),
    ("mark", TransactionType::Valuation),
];
