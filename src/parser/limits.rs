//! Implementation limits for decoding.
//!
//! These limits are aligned with V8's limits from src/wasm/wasm-limits.h.
//! They prevent OOM attacks from malformed input claiming unrealistic counts,
//! and bound how much text the formatter can be asked to produce.

use super::error::DecodeError;

/// Maximum number of type definitions in a module
pub const MAX_TYPES: u32 = 1_000_000;

/// Maximum number of defined functions in a module
pub const MAX_FUNCTIONS: u32 = 1_000_000;

/// Maximum number of exports in a module
pub const MAX_EXPORTS: u32 = 1_000_000;

/// Maximum number of function parameters
pub const MAX_FUNCTION_PARAMS: u32 = 1_000;

/// Maximum number of function return values
pub const MAX_FUNCTION_RETURNS: u32 = 1_000;

/// Maximum number of local variables in a function
pub const MAX_FUNCTION_LOCALS: u32 = 50_000;

/// Maximum number of local variables across all function bodies. The text
/// format prints one line per local, so this caps the output of a module
/// whose bodies each declare many locals in a few bytes.
pub const MAX_MODULE_LOCALS: u32 = 1_000_000;

/// Maximum number of labels in a br_table instruction
pub const MAX_BR_TABLE_LABELS: u32 = 65_536;

/// Fails with [`DecodeError::LimitExceeded`] when `count` is above `limit`.
pub fn check(
    what: &'static str,
    count: u64,
    limit: u32,
    offset: usize,
) -> Result<(), DecodeError> {
    if count > u64::from(limit) {
        return Err(DecodeError::LimitExceeded {
            what,
            count,
            limit,
            offset,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_is_inclusive() {
        assert_eq!(check("locals", 50_000, MAX_FUNCTION_LOCALS, 0), Ok(()));
        assert_eq!(
            check("locals", 50_001, MAX_FUNCTION_LOCALS, 12),
            Err(DecodeError::LimitExceeded {
                what: "locals",
                count: 50_001,
                limit: MAX_FUNCTION_LOCALS,
                offset: 12,
            })
        );
    }
}
