pub mod insight_service;
pub mod llm_service;
pub mod pnl_service;
