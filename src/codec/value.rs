/// Intermediate representation of any JSON- or binary-expressible value.
///
/// Objects keep their entries in insertion order; key order is preserved
/// through a round-trip but carries no meaning on decode.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// JSON `null`.
	Null,
	/// Boolean.
	Bool(bool),
	/// Integer-form number.
	I64(i64),
	/// Fraction- or exponent-form number.
	F64(f64),
	/// UTF-8 string.
	String(Box<str>),
	/// Ordered sequence of values.
	Array(Vec<Value>),
	/// Ordered key/value entries.
	Object(Vec<(Box<str>, Value)>),
}

impl Value {
	/// Short name of the value's tag, for diagnostics.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Value::Null => "null",
			Value::Bool(_) => "bool",
			Value::I64(_) => "integer",
			Value::F64(_) => "number",
			Value::String(_) => "string",
			Value::Array(_) => "array",
			Value::Object(_) => "object",
		}
	}

	/// Look up an object entry by key. Returns `None` on non-objects.
	pub fn get(&self, key: &str) -> Option<&Value> {
		match self {
			Value::Object(entries) => entries.iter().find(|(name, _)| &**name == key).map(|(_, value)| value),
			_ => None,
		}
	}
}
