//! Domain layer - Core relay types with no external dependencies.
//!
//! - `rules`: Declarative filter rules derived from the tracked-author list
//! - `record`: Decoded stream records
//! - `notification`: Outbound notification payloads

pub mod notification;
pub mod record;
pub mod rules;
