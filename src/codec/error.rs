use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors produced while building schemas and encoding or decoding data.
#[derive(Debug, Error)]
pub enum CodecError {
	/// Duplicate field name inside one schema declaration.
	#[error("schema duplicate field {field} on {type_name}")]
	DuplicateField {
		/// Owning type name.
		type_name: &'static str,
		/// Field name declared more than once.
		field: &'static str,
	},
	/// Malformed JSON text.
	#[error("json syntax error at byte {at}: {msg}")]
	Syntax {
		/// Byte offset of the offending input.
		at: usize,
		/// Short description of the defect.
		msg: &'static str,
	},
	/// Parser nesting depth exceeded the fixed ceiling.
	#[error("json nesting depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Value tag disagrees with the declared field type.
	#[error("type mismatch: expected {expected}, got {got}")]
	TypeMismatch {
		/// Expected logical value kind.
		expected: &'static str,
		/// Actual logical value kind.
		got: String,
	},
	/// Fixed-size array value has the wrong element count.
	#[error("arity mismatch: expected {expected} elements, got {got}")]
	ArityMismatch {
		/// Declared element count.
		expected: usize,
		/// Actual element count.
		got: usize,
	},
	/// Object key not present in the schema, under strict assignment.
	#[error("unknown field {field} on {type_name}")]
	UnknownField {
		/// Target type name.
		type_name: String,
		/// Offending key.
		field: String,
	},
	/// Object value is missing a field the schema requires for encoding.
	#[error("missing field {field} on {type_name}")]
	MissingField {
		/// Target type name.
		type_name: String,
		/// Absent key.
		field: String,
	},
	/// Not enough bytes remained for a requested read.
	#[error("truncated input at offset {at}, need {need} bytes, remaining {rem}")]
	Truncated {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Declared length prefix exceeded the configured limit.
	#[error("length prefix {len} exceeds limit {max}")]
	LengthOverflow {
		/// Declared length.
		len: usize,
		/// Maximum permitted length.
		max: usize,
	},
	/// Decoded string bytes were not valid UTF-8.
	#[error("invalid utf-8 in string at offset {at}")]
	InvalidUtf8 {
		/// Byte offset of the string payload.
		at: usize,
	},
}
