use std::fmt;

use crate::codec::value::Value;
use crate::codec::{CodecError, Result};

/// Declared wire type of one field.
#[derive(Debug, Clone)]
pub enum Kind {
	/// One-byte boolean.
	Bool,
	/// 32-bit signed integer.
	I32,
	/// 64-bit signed integer.
	I64,
	/// 32-bit float.
	F32,
	/// 64-bit float.
	F64,
	/// Length-prefixed UTF-8 string.
	Str,
	/// Variable-length sequence of one element kind.
	Seq(Box<Kind>),
	/// Fixed-arity sequence, encoded without a length prefix.
	Fixed(Box<Kind>, usize),
	/// Nested struct, resolved lazily through its shape accessor.
	Struct(fn() -> &'static Shape),
}

/// Type-erased ordered field list for one struct type.
///
/// This is what the binary codec walks; it carries no accessors.
#[derive(Debug)]
pub struct Shape {
	/// Declared type name, used in diagnostics.
	pub type_name: &'static str,
	/// Field declarations in schema order.
	pub fields: Vec<FieldShape>,
}

/// One field's name and declared kind.
#[derive(Debug)]
pub struct FieldShape {
	/// Unique field name within the owning shape.
	pub name: &'static str,
	/// Declared wire type.
	pub kind: Kind,
}

/// Behavior switches for `Value` to typed-instance assignment.
#[derive(Debug, Clone, Default)]
pub struct FromValueOptions {
	/// Error on object keys absent from the schema instead of ignoring them.
	pub deny_unknown_fields: bool,
}

/// Conversion capability between a Rust type and the value model.
///
/// Implemented for scalars, strings, and containers; struct types implement
/// it by delegating to their `Schema`, typically cached in a `OnceLock`
/// static so the schema is built once per process and shared afterwards.
pub trait Facet: Default {
	/// Declared wire type of this Rust type.
	fn kind() -> Kind;
	/// Convert to the intermediate value model.
	fn to_value(&self) -> Value;
	/// Assign from the intermediate value model, in place.
	fn assign(&mut self, value: Value, opt: &FromValueOptions) -> Result<()>;
}

struct Field<T> {
	get: Box<dyn Fn(&T) -> Value + Send + Sync>,
	set: Box<dyn Fn(&mut T, Value, &FromValueOptions) -> Result<()> + Send + Sync>,
}

/// Ordered field capability table for one host type.
///
/// Built once via [`Schema::builder`], immutable afterwards. All encode and
/// decode calls for the host type share it read-only.
pub struct Schema<T> {
	shape: Shape,
	fields: Vec<Field<T>>,
}

impl<T> fmt::Debug for Schema<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Schema").field("shape", &self.shape).finish_non_exhaustive()
	}
}

impl<T: 'static> Schema<T> {
	/// Start declaring a schema for the host type.
	pub fn builder(type_name: &'static str) -> SchemaBuilder<T> {
		SchemaBuilder {
			type_name,
			shape_fields: Vec::new(),
			fields: Vec::new(),
			duplicate: None,
		}
	}
}

impl<T> Schema<T> {
	/// Declared type name.
	pub fn type_name(&self) -> &'static str {
		self.shape.type_name
	}

	/// Type-erased field list, in declaration order.
	pub fn shape(&self) -> &Shape {
		&self.shape
	}

	/// Convert a host instance into an object value, fields in schema order.
	pub fn to_value(&self, host: &T) -> Value {
		let entries = self
			.shape
			.fields
			.iter()
			.zip(&self.fields)
			.map(|(decl, field)| (decl.name.into(), (field.get)(host)))
			.collect();
		Value::Object(entries)
	}

	/// Assign an object value onto a host instance.
	///
	/// Keys absent from the schema are ignored unless
	/// `opt.deny_unknown_fields` is set; schema fields absent from the value
	/// are left untouched.
	pub fn assign(&self, host: &mut T, value: Value, opt: &FromValueOptions) -> Result<()> {
		let Value::Object(entries) = value else {
			return Err(mismatch("object", &value));
		};

		for (key, item) in entries {
			match self.shape.fields.iter().position(|decl| decl.name == &*key) {
				Some(idx) => (self.fields[idx].set)(host, item, opt)?,
				None if opt.deny_unknown_fields => {
					return Err(CodecError::UnknownField {
						type_name: self.shape.type_name.to_owned(),
						field: key.into(),
					});
				}
				None => {}
			}
		}
		Ok(())
	}
}

/// Incremental schema declaration, finished with [`SchemaBuilder::finish`].
pub struct SchemaBuilder<T> {
	type_name: &'static str,
	shape_fields: Vec<FieldShape>,
	fields: Vec<Field<T>>,
	duplicate: Option<&'static str>,
}

impl<T: 'static> SchemaBuilder<T> {
	/// Declare one field by name and a read/write accessor pair.
	///
	/// The field's wire kind is derived from the accessed type.
	pub fn field<F: Facet + 'static>(mut self, name: &'static str, get: fn(&T) -> &F, get_mut: fn(&mut T) -> &mut F) -> Self {
		if self.shape_fields.iter().any(|decl| decl.name == name) {
			self.duplicate.get_or_insert(name);
			return self;
		}

		self.shape_fields.push(FieldShape { name, kind: F::kind() });
		self.fields.push(Field {
			get: Box::new(move |host| get(host).to_value()),
			set: Box::new(move |host, value, opt| get_mut(host).assign(value, opt)),
		});
		self
	}

	/// Validate the declaration and produce the immutable schema.
	pub fn finish(self) -> Result<Schema<T>> {
		if let Some(field) = self.duplicate {
			return Err(CodecError::DuplicateField {
				type_name: self.type_name,
				field,
			});
		}

		Ok(Schema {
			shape: Shape {
				type_name: self.type_name,
				fields: self.shape_fields,
			},
			fields: self.fields,
		})
	}
}

fn mismatch(expected: &'static str, value: &Value) -> CodecError {
	CodecError::TypeMismatch {
		expected,
		got: value.kind_name().to_owned(),
	}
}

fn f64_to_i64(v: f64) -> Option<i64> {
	// -(i64::MIN as f64) is exactly 2^63; i64::MAX as f64 rounds up past it.
	if !v.is_finite() || v.fract() != 0.0 {
		return None;
	}
	if v < i64::MIN as f64 || v >= -(i64::MIN as f64) {
		return None;
	}
	Some(v as i64)
}

impl Facet for bool {
	fn kind() -> Kind {
		Kind::Bool
	}

	fn to_value(&self) -> Value {
		Value::Bool(*self)
	}

	fn assign(&mut self, value: Value, _opt: &FromValueOptions) -> Result<()> {
		match value {
			Value::Bool(v) => {
				*self = v;
				Ok(())
			}
			other => Err(mismatch("bool", &other)),
		}
	}
}

impl Facet for i32 {
	fn kind() -> Kind {
		Kind::I32
	}

	fn to_value(&self) -> Value {
		Value::I64(i64::from(*self))
	}

	fn assign(&mut self, value: Value, _opt: &FromValueOptions) -> Result<()> {
		let wide = match value {
			Value::I64(v) => v,
			Value::F64(v) => f64_to_i64(v).ok_or_else(|| mismatch("32-bit integer", &Value::F64(v)))?,
			other => return Err(mismatch("32-bit integer", &other)),
		};
		*self = i32::try_from(wide).map_err(|_| CodecError::TypeMismatch {
			expected: "32-bit integer",
			got: format!("out-of-range integer {wide}"),
		})?;
		Ok(())
	}
}

impl Facet for i64 {
	fn kind() -> Kind {
		Kind::I64
	}

	fn to_value(&self) -> Value {
		Value::I64(*self)
	}

	fn assign(&mut self, value: Value, _opt: &FromValueOptions) -> Result<()> {
		match value {
			Value::I64(v) => {
				*self = v;
				Ok(())
			}
			Value::F64(v) => {
				*self = f64_to_i64(v).ok_or_else(|| mismatch("64-bit integer", &Value::F64(v)))?;
				Ok(())
			}
			other => Err(mismatch("64-bit integer", &other)),
		}
	}
}

impl Facet for f32 {
	fn kind() -> Kind {
		Kind::F32
	}

	fn to_value(&self) -> Value {
		Value::F64(f64::from(*self))
	}

	fn assign(&mut self, value: Value, _opt: &FromValueOptions) -> Result<()> {
		match value {
			Value::F64(v) => {
				*self = v as f32;
				Ok(())
			}
			Value::I64(v) => {
				*self = v as f32;
				Ok(())
			}
			other => Err(mismatch("number", &other)),
		}
	}
}

impl Facet for f64 {
	fn kind() -> Kind {
		Kind::F64
	}

	fn to_value(&self) -> Value {
		Value::F64(*self)
	}

	fn assign(&mut self, value: Value, _opt: &FromValueOptions) -> Result<()> {
		match value {
			Value::F64(v) => {
				*self = v;
				Ok(())
			}
			Value::I64(v) => {
				*self = v as f64;
				Ok(())
			}
			other => Err(mismatch("number", &other)),
		}
	}
}

impl Facet for String {
	fn kind() -> Kind {
		Kind::Str
	}

	fn to_value(&self) -> Value {
		Value::String(self.as_str().into())
	}

	fn assign(&mut self, value: Value, _opt: &FromValueOptions) -> Result<()> {
		match value {
			Value::String(v) => {
				*self = v.into();
				Ok(())
			}
			other => Err(mismatch("string", &other)),
		}
	}
}

impl<T: Facet + 'static> Facet for Vec<T> {
	fn kind() -> Kind {
		Kind::Seq(Box::new(T::kind()))
	}

	fn to_value(&self) -> Value {
		Value::Array(self.iter().map(Facet::to_value).collect())
	}

	fn assign(&mut self, value: Value, opt: &FromValueOptions) -> Result<()> {
		let Value::Array(items) = value else {
			return Err(mismatch("array", &value));
		};

		self.clear();
		self.reserve(items.len());
		for item in items {
			let mut slot = T::default();
			slot.assign(item, opt)?;
			self.push(slot);
		}
		Ok(())
	}
}

impl<T: Facet + 'static, const N: usize> Facet for [T; N]
where
	[T; N]: Default,
{
	fn kind() -> Kind {
		Kind::Fixed(Box::new(T::kind()), N)
	}

	fn to_value(&self) -> Value {
		Value::Array(self.iter().map(Facet::to_value).collect())
	}

	fn assign(&mut self, value: Value, opt: &FromValueOptions) -> Result<()> {
		let Value::Array(items) = value else {
			return Err(mismatch("array", &value));
		};
		if items.len() != N {
			return Err(CodecError::ArityMismatch {
				expected: N,
				got: items.len(),
			});
		}

		for (slot, item) in self.iter_mut().zip(items) {
			slot.assign(item, opt)?;
		}
		Ok(())
	}
}
