#![allow(missing_docs)]

use std::sync::OnceLock;

use biform::codec::{BinOptions, CodecError, Facet, FromValueOptions, JsonOptions, Kind, Schema, from_json, read_json, write_json};

mod bin {
	pub use biform::codec::{decode, encode};
}

const DEMO_JSON: &str = r#"
{
   "fixed_object": {
      "int_array": [0, 1, 2, 3, 4, 5, 6],
      "float_array": [0.1, 0.2, 0.3, 0.4, 0.5, 0.6],
      "double_array": [3288398.238, 233e22, 289e-1, 0.928759872, 0.22222848, 0.1, 0.2, 0.3, 0.4]
   },
   "fixed_name_object": {
      "name0": "James",
      "name1": "Abraham",
      "name2": "Susan",
      "name3": "Frank",
      "name4": "Alicia"
   },
   "another_object": {
      "string": "here is some text",
      "another_string": "Hello World",
      "boolean": false,
      "nested_object": {
         "v3s": [[0.12345, 0.23456, 0.001345],
                  [0.3894675, 97.39827, 297.92387],
                  [18.18, 87.289, 2988.298]],
         "id": "298728949872"
      }
   },
   "string_array": ["Cat", "Dog", "Elephant", "Tiger"],
   "string": "Hello world",
   "number": 3.14,
   "boolean": true,
   "another_bool": false
}
"#;

#[derive(Debug, Default, PartialEq)]
struct FixedObject {
	int_array: Vec<i32>,
	float_array: Vec<f32>,
	double_array: Vec<f64>,
}

#[derive(Debug, Default, PartialEq)]
struct FixedNameObject {
	name0: String,
	name1: String,
	name2: String,
	name3: String,
	name4: String,
}

#[derive(Debug, Default, PartialEq)]
struct NestedObject {
	v3s: Vec<[f64; 3]>,
	id: String,
}

#[derive(Debug, Default, PartialEq)]
struct AnotherObject {
	string: String,
	another_string: String,
	boolean: bool,
	nested_object: NestedObject,
}

#[derive(Debug, Default, PartialEq)]
struct Document {
	fixed_object: FixedObject,
	fixed_name_object: FixedNameObject,
	another_object: AnotherObject,
	string_array: Vec<String>,
	string: String,
	number: f64,
	boolean: bool,
	another_bool: bool,
}

impl FixedObject {
	fn schema() -> &'static Schema<Self> {
		static SCHEMA: OnceLock<Schema<FixedObject>> = OnceLock::new();
		SCHEMA.get_or_init(|| {
			Schema::builder("fixed_object")
				.field("int_array", |t: &FixedObject| &t.int_array, |t| &mut t.int_array)
				.field("float_array", |t: &FixedObject| &t.float_array, |t| &mut t.float_array)
				.field("double_array", |t: &FixedObject| &t.double_array, |t| &mut t.double_array)
				.finish()
				.expect("fixed_object schema builds")
		})
	}
}

impl Facet for FixedObject {
	fn kind() -> Kind {
		Kind::Struct(|| FixedObject::schema().shape())
	}

	fn to_value(&self) -> biform::codec::Value {
		FixedObject::schema().to_value(self)
	}

	fn assign(&mut self, value: biform::codec::Value, opt: &FromValueOptions) -> biform::codec::Result<()> {
		FixedObject::schema().assign(self, value, opt)
	}
}

impl FixedNameObject {
	fn schema() -> &'static Schema<Self> {
		static SCHEMA: OnceLock<Schema<FixedNameObject>> = OnceLock::new();
		SCHEMA.get_or_init(|| {
			Schema::builder("fixed_name_object")
				.field("name0", |t: &FixedNameObject| &t.name0, |t| &mut t.name0)
				.field("name1", |t: &FixedNameObject| &t.name1, |t| &mut t.name1)
				.field("name2", |t: &FixedNameObject| &t.name2, |t| &mut t.name2)
				.field("name3", |t: &FixedNameObject| &t.name3, |t| &mut t.name3)
				.field("name4", |t: &FixedNameObject| &t.name4, |t| &mut t.name4)
				.finish()
				.expect("fixed_name_object schema builds")
		})
	}
}

impl Facet for FixedNameObject {
	fn kind() -> Kind {
		Kind::Struct(|| FixedNameObject::schema().shape())
	}

	fn to_value(&self) -> biform::codec::Value {
		FixedNameObject::schema().to_value(self)
	}

	fn assign(&mut self, value: biform::codec::Value, opt: &FromValueOptions) -> biform::codec::Result<()> {
		FixedNameObject::schema().assign(self, value, opt)
	}
}

impl NestedObject {
	fn schema() -> &'static Schema<Self> {
		static SCHEMA: OnceLock<Schema<NestedObject>> = OnceLock::new();
		SCHEMA.get_or_init(|| {
			Schema::builder("nested_object")
				.field("v3s", |t: &NestedObject| &t.v3s, |t| &mut t.v3s)
				.field("id", |t: &NestedObject| &t.id, |t| &mut t.id)
				.finish()
				.expect("nested_object schema builds")
		})
	}
}

impl Facet for NestedObject {
	fn kind() -> Kind {
		Kind::Struct(|| NestedObject::schema().shape())
	}

	fn to_value(&self) -> biform::codec::Value {
		NestedObject::schema().to_value(self)
	}

	fn assign(&mut self, value: biform::codec::Value, opt: &FromValueOptions) -> biform::codec::Result<()> {
		NestedObject::schema().assign(self, value, opt)
	}
}

impl AnotherObject {
	fn schema() -> &'static Schema<Self> {
		static SCHEMA: OnceLock<Schema<AnotherObject>> = OnceLock::new();
		SCHEMA.get_or_init(|| {
			Schema::builder("another_object")
				.field("string", |t: &AnotherObject| &t.string, |t| &mut t.string)
				.field("another_string", |t: &AnotherObject| &t.another_string, |t| &mut t.another_string)
				.field("boolean", |t: &AnotherObject| &t.boolean, |t| &mut t.boolean)
				.field("nested_object", |t: &AnotherObject| &t.nested_object, |t| &mut t.nested_object)
				.finish()
				.expect("another_object schema builds")
		})
	}
}

impl Facet for AnotherObject {
	fn kind() -> Kind {
		Kind::Struct(|| AnotherObject::schema().shape())
	}

	fn to_value(&self) -> biform::codec::Value {
		AnotherObject::schema().to_value(self)
	}

	fn assign(&mut self, value: biform::codec::Value, opt: &FromValueOptions) -> biform::codec::Result<()> {
		AnotherObject::schema().assign(self, value, opt)
	}
}

impl Document {
	fn schema() -> &'static Schema<Self> {
		static SCHEMA: OnceLock<Schema<Document>> = OnceLock::new();
		SCHEMA.get_or_init(|| {
			Schema::builder("document")
				.field("fixed_object", |t: &Document| &t.fixed_object, |t| &mut t.fixed_object)
				.field("fixed_name_object", |t: &Document| &t.fixed_name_object, |t| &mut t.fixed_name_object)
				.field("another_object", |t: &Document| &t.another_object, |t| &mut t.another_object)
				.field("string_array", |t: &Document| &t.string_array, |t| &mut t.string_array)
				.field("string", |t: &Document| &t.string, |t| &mut t.string)
				.field("number", |t: &Document| &t.number, |t| &mut t.number)
				.field("boolean", |t: &Document| &t.boolean, |t| &mut t.boolean)
				.field("another_bool", |t: &Document| &t.another_bool, |t| &mut t.another_bool)
				.finish()
				.expect("document schema builds")
		})
	}
}

impl Facet for Document {
	fn kind() -> Kind {
		Kind::Struct(|| Document::schema().shape())
	}

	fn to_value(&self) -> biform::codec::Value {
		Document::schema().to_value(self)
	}

	fn assign(&mut self, value: biform::codec::Value, opt: &FromValueOptions) -> biform::codec::Result<()> {
		Document::schema().assign(self, value, opt)
	}
}

#[test]
fn demo_json_decodes_into_typed_document() {
	let doc: Document = from_json(DEMO_JSON, &FromValueOptions::default()).expect("demo json decodes");

	assert_eq!(doc.fixed_object.int_array, [0, 1, 2, 3, 4, 5, 6]);
	assert_eq!(doc.fixed_object.float_array.len(), 6);
	assert_eq!(doc.fixed_object.double_array[1], 233e22);
	assert_eq!(doc.fixed_name_object.name4, "Alicia");
	assert_eq!(doc.another_object.nested_object.id, "298728949872");
	assert_eq!(doc.another_object.nested_object.v3s[1], [0.3894675, 97.39827, 297.92387]);
	assert_eq!(doc.string_array, ["Cat", "Dog", "Elephant", "Tiger"]);
	assert_eq!(doc.number, 3.14);
	assert!(doc.boolean);
	assert!(!doc.another_bool);
	assert!(!doc.another_object.boolean);
}

#[test]
fn json_to_binary_to_json_pipeline_preserves_the_document() {
	let original: Document = from_json(DEMO_JSON, &FromValueOptions::default()).expect("demo json decodes");

	let bytes = bin::encode(&original).expect("binary encode succeeds");
	let restored: Document = bin::decode(&bytes, &BinOptions::default()).expect("binary decode succeeds");
	assert_eq!(restored, original);

	let first = write_json(&restored, &JsonOptions::default());
	let second = write_json(&restored, &JsonOptions::default());
	assert_eq!(first, second, "serialization is idempotent");

	let reread: Document = from_json(&first, &FromValueOptions::default()).expect("own output reparses");
	assert_eq!(reread, original);
}

#[test]
fn binary_encode_is_deterministic() {
	let doc: Document = from_json(DEMO_JSON, &FromValueOptions::default()).expect("demo json decodes");
	assert_eq!(bin::encode(&doc).unwrap(), bin::encode(&doc).unwrap());
}

#[test]
fn partial_name_object_leaves_missing_fields_at_default() {
	let mut names = FixedNameObject::default();
	read_json(&mut names, r#"{"name0":"James","name1":"Abraham"}"#, &FromValueOptions::default()).expect("partial json decodes");

	assert_eq!(names.name0, "James");
	assert_eq!(names.name1, "Abraham");
	assert_eq!(names.name2, "");
	assert_eq!(names.name3, "");
	assert_eq!(names.name4, "");
}

#[test]
fn seven_integers_round_trip_through_binary_in_order() {
	let original: Vec<i32> = vec![0, 1, 2, 3, 4, 5, 6];
	let bytes = bin::encode(&original).expect("encode succeeds");
	// u32 count prefix + 7 fixed-width elements
	assert_eq!(bytes.len(), 4 + 7 * 4);

	let restored: Vec<i32> = bin::decode(&bytes, &BinOptions::default()).expect("decode succeeds");
	assert_eq!(restored, original);
}

#[test]
fn truncated_binary_document_fails_with_truncated() {
	let doc: Document = from_json(DEMO_JSON, &FromValueOptions::default()).expect("demo json decodes");
	let bytes = bin::encode(&doc).expect("encode succeeds");

	let err = bin::decode::<Document>(&bytes[..bytes.len() - 2], &BinOptions::default()).unwrap_err();
	assert!(matches!(err, CodecError::Truncated { .. }), "got {err:?}");
}

#[test]
fn strict_assignment_rejects_extra_keys() {
	let text = r#"{"name0":"James","nickname":"Jim"}"#;

	let mut permissive = FixedNameObject::default();
	read_json(&mut permissive, text, &FromValueOptions::default()).expect("permissive decode succeeds");
	assert_eq!(permissive.name0, "James");

	let strict = FromValueOptions { deny_unknown_fields: true };
	let err = read_json(&mut FixedNameObject::default(), text, &strict).unwrap_err();
	match err {
		CodecError::UnknownField { type_name, field } => {
			assert_eq!(type_name, "fixed_name_object");
			assert_eq!(field, "nickname");
		}
		other => panic!("expected UnknownField, got {other:?}"),
	}
}

#[test]
fn wrong_schema_misreads_are_surfaced_not_silent() {
	// A v3 triple is 24 bytes with no prefix; decoding it as a
	// length-prefixed string trips the length guard or truncation,
	// never a quiet wrong value.
	let mut bytes = Vec::new();
	biform::codec::encode_value(
		&biform::codec::Value::Array(vec![
			biform::codec::Value::F64(0.12345),
			biform::codec::Value::F64(0.23456),
			biform::codec::Value::F64(0.001345),
		]),
		&Kind::Fixed(Box::new(Kind::F64), 3),
		&mut bytes,
	)
	.expect("encode succeeds");

	let mut cursor = biform::codec::Cursor::new(&bytes);
	let result = biform::codec::decode_value(&mut cursor, &Kind::Str, &BinOptions::default());
	assert!(matches!(
		result,
		Err(CodecError::Truncated { .. } | CodecError::LengthOverflow { .. } | CodecError::InvalidUtf8 { .. })
	));
}
