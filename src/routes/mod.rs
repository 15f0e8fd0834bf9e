pub(crate) mod health;
pub(crate) mod hyperliquid;
pub(crate) mod token;
