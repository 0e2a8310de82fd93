/// All entity identifiers are random 128-bit UUIDs, generated at creation
/// and immutable afterwards.
pub type EntityId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Box capacities and shipment sizes share one integer domain, stored as
/// SMALLINT in the database.
pub type BoxSize = i16;

/// Small size class.
pub const SIZE_SMALL: BoxSize = 1;

/// Medium size class.
pub const SIZE_MEDIUM: BoxSize = 2;

/// Large size class.
pub const SIZE_LARGE: BoxSize = 3;

/// All size classes, smallest first. Harness data generation draws
/// uniformly from this set for both box capacities and shipment sizes.
pub const SIZE_CLASSES: [BoxSize; 3] = [SIZE_SMALL, SIZE_MEDIUM, SIZE_LARGE];
