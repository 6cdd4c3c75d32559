mod bin;
mod bytes;
mod error;
mod json;
mod schema;
mod value;

/// Binary encode/decode entry points and limits.
pub use bin::{BinOptions, decode, decode_value, encode, encode_value};
/// Bounded little-endian byte cursor used by the binary decoder.
pub use bytes::Cursor;
/// Error and result aliases.
pub use error::{CodecError, Result};
/// JSON parse/serialize entry points and presentation options.
pub use json::{JsonOptions, from_json, parse, read_json, serialize, write_json};
/// Schema declaration, field capability tables, and value conversion.
pub use schema::{Facet, FieldShape, FromValueOptions, Kind, Schema, SchemaBuilder, Shape};
/// Decoded runtime value type.
pub use value::Value;
