//! Schema-driven serialization core: one declarative per-type schema drives
//! both a JSON codec and a compact length-prefixed binary codec.

/// Value model, schema tables, and the JSON and binary codecs.
pub mod codec;
