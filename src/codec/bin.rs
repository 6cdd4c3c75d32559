use crate::codec::bytes::Cursor;
use crate::codec::schema::{Facet, FromValueOptions, Kind};
use crate::codec::value::Value;
use crate::codec::{CodecError, Result};

/// Runtime limits for binary decoding.
#[derive(Debug, Clone)]
pub struct BinOptions {
	/// Maximum accepted string or sequence length prefix, in elements/bytes.
	/// Bounds allocation when a corrupted prefix declares a huge length.
	pub max_len: usize,
}

impl Default for BinOptions {
	fn default() -> Self {
		Self { max_len: 256 << 20 }
	}
}

/// Encode a typed instance to the compact binary form.
///
/// The format is little-endian and not self-describing: decoding requires
/// the same schema. Scalars are fixed width (bool 1 byte, `i32`/`f32` 4,
/// `i64`/`f64` 8); strings and sequences carry a `u32` length prefix;
/// fixed-arity arrays and struct fields are laid out back to back with no
/// prefix, markers, or field names.
pub fn encode<T: Facet>(host: &T) -> Result<Vec<u8>> {
	let mut out = Vec::new();
	encode_value(&host.to_value(), &T::kind(), &mut out)?;
	Ok(out)
}

/// Decode the compact binary form into a fresh typed instance.
pub fn decode<T: Facet>(bytes: &[u8], opt: &BinOptions) -> Result<T> {
	let mut cursor = Cursor::new(bytes);
	let value = decode_value(&mut cursor, &T::kind(), opt)?;

	let mut host = T::default();
	host.assign(value, &FromValueOptions::default())?;
	Ok(host)
}

/// Encode one value against its declared kind, appending to `out`.
pub fn encode_value(value: &Value, kind: &Kind, out: &mut Vec<u8>) -> Result<()> {
	match kind {
		Kind::Bool => match value {
			Value::Bool(v) => {
				out.push(u8::from(*v));
				Ok(())
			}
			other => Err(mismatch("bool", other)),
		},
		Kind::I32 => {
			let wide = expect_integer(value, "32-bit integer")?;
			let narrow = i32::try_from(wide).map_err(|_| CodecError::TypeMismatch {
				expected: "32-bit integer",
				got: format!("out-of-range integer {wide}"),
			})?;
			out.extend_from_slice(&narrow.to_le_bytes());
			Ok(())
		}
		Kind::I64 => {
			let wide = expect_integer(value, "64-bit integer")?;
			out.extend_from_slice(&wide.to_le_bytes());
			Ok(())
		}
		Kind::F32 => {
			let v = expect_number(value, "number")?;
			out.extend_from_slice(&(v as f32).to_le_bytes());
			Ok(())
		}
		Kind::F64 => {
			let v = expect_number(value, "number")?;
			out.extend_from_slice(&v.to_le_bytes());
			Ok(())
		}
		Kind::Str => match value {
			Value::String(s) => {
				write_len(s.len(), out)?;
				out.extend_from_slice(s.as_bytes());
				Ok(())
			}
			other => Err(mismatch("string", other)),
		},
		Kind::Seq(elem) => match value {
			Value::Array(items) => {
				write_len(items.len(), out)?;
				for item in items {
					encode_value(item, elem, out)?;
				}
				Ok(())
			}
			other => Err(mismatch("array", other)),
		},
		Kind::Fixed(elem, arity) => match value {
			Value::Array(items) => {
				if items.len() != *arity {
					return Err(CodecError::ArityMismatch {
						expected: *arity,
						got: items.len(),
					});
				}
				for item in items {
					encode_value(item, elem, out)?;
				}
				Ok(())
			}
			other => Err(mismatch("array", other)),
		},
		Kind::Struct(shape_fn) => {
			let shape = shape_fn();
			let Value::Object(_) = value else {
				return Err(mismatch("object", value));
			};
			for field in &shape.fields {
				let entry = value.get(field.name).ok_or_else(|| CodecError::MissingField {
					type_name: shape.type_name.to_owned(),
					field: field.name.to_owned(),
				})?;
				encode_value(entry, &field.kind, out)?;
			}
			Ok(())
		}
	}
}

/// Decode one value by walking its declared kind.
pub fn decode_value(cursor: &mut Cursor<'_>, kind: &Kind, opt: &BinOptions) -> Result<Value> {
	match kind {
		Kind::Bool => Ok(Value::Bool(cursor.read_u8()? != 0)),
		Kind::I32 => Ok(Value::I64(i64::from(cursor.read_i32_le()?))),
		Kind::I64 => Ok(Value::I64(cursor.read_i64_le()?)),
		Kind::F32 => Ok(Value::F64(f64::from(cursor.read_f32_le()?))),
		Kind::F64 => Ok(Value::F64(cursor.read_f64_le()?)),
		Kind::Str => {
			let len = read_len(cursor, opt)?;
			let at = cursor.pos();
			let raw = cursor.read_exact(len)?;
			let s = std::str::from_utf8(raw).map_err(|_| CodecError::InvalidUtf8 { at })?;
			Ok(Value::String(s.into()))
		}
		Kind::Seq(elem) => {
			let len = read_len(cursor, opt)?;
			// Every element consumes at least one byte, so the remaining
			// input bounds a sane pre-allocation.
			let mut items = Vec::with_capacity(len.min(cursor.remaining()));
			for _ in 0..len {
				items.push(decode_value(cursor, elem, opt)?);
			}
			Ok(Value::Array(items))
		}
		Kind::Fixed(elem, arity) => {
			let mut items = Vec::with_capacity(*arity);
			for _ in 0..*arity {
				items.push(decode_value(cursor, elem, opt)?);
			}
			Ok(Value::Array(items))
		}
		Kind::Struct(shape_fn) => {
			let shape = shape_fn();
			let mut entries = Vec::with_capacity(shape.fields.len());
			for field in &shape.fields {
				entries.push((field.name.into(), decode_value(cursor, &field.kind, opt)?));
			}
			Ok(Value::Object(entries))
		}
	}
}

fn write_len(len: usize, out: &mut Vec<u8>) -> Result<()> {
	let prefix = u32::try_from(len).map_err(|_| CodecError::LengthOverflow {
		len,
		max: u32::MAX as usize,
	})?;
	out.extend_from_slice(&prefix.to_le_bytes());
	Ok(())
}

fn read_len(cursor: &mut Cursor<'_>, opt: &BinOptions) -> Result<usize> {
	let len = cursor.read_u32_le()? as usize;
	if len > opt.max_len {
		return Err(CodecError::LengthOverflow { len, max: opt.max_len });
	}
	Ok(len)
}

fn expect_integer(value: &Value, expected: &'static str) -> Result<i64> {
	match value {
		Value::I64(v) => Ok(*v),
		other => Err(mismatch(expected, other)),
	}
}

fn expect_number(value: &Value, expected: &'static str) -> Result<f64> {
	match value {
		Value::F64(v) => Ok(*v),
		Value::I64(v) => Ok(*v as f64),
		other => Err(mismatch(expected, other)),
	}
}

fn mismatch(expected: &'static str, value: &Value) -> CodecError {
	CodecError::TypeMismatch {
		expected,
		got: value.kind_name().to_owned(),
	}
}
