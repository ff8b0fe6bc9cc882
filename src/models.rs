use serde::Deserialize;

// Full node transaction list models
#[derive(Debug, Deserialize)]
pub struct TransactionApiResponse {
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    pub tx_id: String,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TxInput {
    pub value: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TxOutput {
    pub value: u64,
    pub token: String,
}
