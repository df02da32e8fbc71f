// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod num_factory;

pub use num_factory::NumFactory;
