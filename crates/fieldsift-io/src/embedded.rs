//! Sample dataset compiled into the crate, used when no other source has data.

/// Employee records.
pub const EMPLOYEES: &str = include_str!("../assets/employees.json");

/// Field definitions matching [`EMPLOYEES`].
pub const FIELDS: &str = include_str!("../assets/fields.json");
