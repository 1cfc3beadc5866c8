pub mod allocation_service;
pub mod indicators;
pub mod llm_service;
pub mod price_service;
pub mod savings_service;
pub mod signal_service;
pub mod suggestion_service;
