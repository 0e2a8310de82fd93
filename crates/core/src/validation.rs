//! Boundary validation for entity creation inputs.
//!
//! Malformed names, sizes, and capacity sequences are rejected here, before
//! any store access happens.

use crate::error::AllocationError;
use crate::types::BoxSize;

/// Maximum number of boxes a locker may hold.
pub const MAX_BOXES_PER_LOCKER: usize = 64;

/// Maximum length of a locker or shipment display name.
const MAX_NAME_LEN: usize = 128;

/// Validate a display name.
///
/// Rules:
/// - Must not be empty or whitespace-only.
/// - Must not exceed `MAX_NAME_LEN` characters.
pub fn validate_name(name: &str) -> Result<(), AllocationError> {
    if name.trim().is_empty() {
        return Err(AllocationError::InvalidInput("name must not be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AllocationError::InvalidInput(format!(
            "name must not exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a shipment size or single box capacity. Must be positive.
pub fn validate_size(size: BoxSize) -> Result<(), AllocationError> {
    if size < 1 {
        return Err(AllocationError::InvalidInput(format!(
            "size must be positive, got {size}"
        )));
    }
    Ok(())
}

/// Validate a locker's box-capacity sequence.
///
/// Rules:
/// - At least one box, at most `MAX_BOXES_PER_LOCKER`.
/// - Every capacity positive.
pub fn validate_capacities(capacities: &[BoxSize]) -> Result<(), AllocationError> {
    if capacities.is_empty() {
        return Err(AllocationError::InvalidInput(
            "locker must have at least one box".into(),
        ));
    }
    if capacities.len() > MAX_BOXES_PER_LOCKER {
        return Err(AllocationError::InvalidInput(format!(
            "locker must not exceed {MAX_BOXES_PER_LOCKER} boxes"
        )));
    }
    for &capacity in capacities {
        validate_size(capacity)?;
    }
    Ok(())
}
