//! Fact records and value coercion
//!
//! A fact record is the read-only JSON document a rule condition is
//! evaluated against (shipment, customer, driver and environment attributes).

mod coerce;
mod record;

pub use coerce::*;
pub use record::*;
