//! Data-pipeline metadata keys that may be attached to a field or type
//! document as extra attributes.

/// Length of a bit type.
pub const BIT_LEN: &str = "bitlen";
/// Whether the value is a date in ISO 8601 format.
pub const DATE: &str = "date";
/// Whether the value is a datetime in ISO 8601 format.
pub const DATETIME: &str = "datetime";
/// Fixed-point numeric type.
pub const FIXED_POINT: &str = "fixed_pt";
/// Length of a char type.
pub const FIX_LEN: &str = "fixlen";
/// Length of a varchar type.
pub const MAX_LEN: &str = "maxlen";
/// Precision of a numeric type.
pub const PRECISION: &str = "precision";
/// Whether the field is part of the primary key.
pub const PRIMARY_KEY: &str = "pkey";
/// Scale of a numeric type.
pub const SCALE: &str = "scale";
/// Whether the value is a time in ISO 8601 format.
pub const TIME: &str = "time";
/// Whether the field is a timestamp.
pub const TIMESTAMP: &str = "timestamp";
/// Whether an int type is unsigned.
pub const UNSIGNED: &str = "unsigned";
/// Whether the field is a year.
pub const YEAR: &str = "year";
/// Sort key derived from a Redshift schema.
pub const SORT_KEY: &str = "sortkey";
/// Dist key derived from a Redshift schema.
pub const DIST_KEY: &str = "distkey";
/// Column encoding derived from a Redshift schema.
pub const ENCODE: &str = "encode";
/// Dist style derived from a Redshift schema.
pub const DISTSTYLE: &str = "diststyle";
/// Symbols belonging to an enum type.
pub const SYMBOLS: &str = "symbols";
/// Fractional seconds precision of date/time values.
pub const FSP: &str = "fsp";

/// Every key above.
pub const ALL: [&str; 19] = [
    BIT_LEN,
    DATE,
    DATETIME,
    FIXED_POINT,
    FIX_LEN,
    MAX_LEN,
    PRECISION,
    PRIMARY_KEY,
    SCALE,
    TIME,
    TIMESTAMP,
    UNSIGNED,
    YEAR,
    SORT_KEY,
    DIST_KEY,
    ENCODE,
    DISTSTYLE,
    SYMBOLS,
    FSP,
];
