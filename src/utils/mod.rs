//! Utility functions for the pricing crate.
//!
//! - [`conversion`] - Address/hex helpers and `BigDecimal` conversions

mod conversion;

// ============================================
// Re-exports
// ============================================

pub use conversion::{
    address_id, convert_token_to_decimal, hex_encode, parse_address, safe_div,
};
