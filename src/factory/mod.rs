// ============================================================================
// Factory Module
// Number factories and configuration-driven factory selection
// ============================================================================

mod config;
mod decimal_factory;
mod double_factory;
mod nan_factory;

pub use config::{create_from_config, NumBackend, NumConfig};
pub use decimal_factory::{DecimalNumFactory, DEFAULT_PRECISION, MAX_PRECISION};
pub use double_factory::DoubleNumFactory;
pub use nan_factory::NaNFactory;
