/// Maximum length of a mod name
pub const MAX_MOD_NAME_LENGTH: u64 = 200;

/// Maximum length of free-form notes on a car mod entry
pub const MAX_NOTES_LENGTH: u64 = 5000;

/// Maximum length of a category tag
pub const MAX_CATEGORY_LENGTH: u64 = 50;

// =============================================================================
// GARAGE CONSTANTS
// =============================================================================

/// Earliest model year accepted for a car
pub const MIN_CAR_YEAR: i32 = 1886;

/// Latest model year accepted for a car
pub const MAX_CAR_YEAR: i32 = 2100;

/// Maximum length of a car's make, model or color
pub const MAX_CAR_FIELD_LENGTH: u64 = 100;
