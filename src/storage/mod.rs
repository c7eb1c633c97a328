//!  Storage is organized through [record_store::JsonRecordStore].
//!  The basic idea is:
//!   - All records live in a single JSON array inside the application directory.
//!   - The whole array is loaded and saved at once. There are no partial updates.
//!   - A file that can't be read is treated as an empty set of records.

pub mod entities;
pub mod record_store;
