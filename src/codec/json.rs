use std::fmt::Write as _;

use crate::codec::schema::{Facet, FromValueOptions};
use crate::codec::value::Value;
use crate::codec::{CodecError, Result};

/// Fixed ceiling on parser nesting depth.
const MAX_DEPTH: u32 = 128;

/// Presentation options for JSON serialization.
#[derive(Debug, Clone)]
pub struct JsonOptions {
	/// Spaces per nesting level; 0 selects compact single-line output.
	pub indent: usize,
}

impl Default for JsonOptions {
	fn default() -> Self {
		Self { indent: 2 }
	}
}

impl JsonOptions {
	/// Single-line output without insignificant whitespace.
	pub fn compact() -> Self {
		Self { indent: 0 }
	}
}

/// Parse JSON text into the value model.
pub fn parse(text: &str) -> Result<Value> {
	let mut parser = Parser {
		text,
		bytes: text.as_bytes(),
		pos: 0,
	};
	parser.skip_ws();
	let value = parser.parse_value(0)?;
	parser.skip_ws();
	if parser.pos < parser.bytes.len() {
		return Err(parser.err("trailing characters after value"));
	}
	Ok(value)
}

/// Serialize the value model to JSON text.
///
/// Output is deterministic: object keys keep their stored order and floats
/// use the shortest form that reparses to the identical bit pattern.
/// Non-finite floats have no JSON spelling and emit `null`.
pub fn serialize(value: &Value, opt: &JsonOptions) -> String {
	let mut out = String::new();
	write_value(&mut out, value, opt.indent, 0);
	out
}

/// Parse JSON text and assign it onto an existing typed instance.
pub fn read_json<T: Facet>(host: &mut T, text: &str, opt: &FromValueOptions) -> Result<()> {
	let value = parse(text)?;
	host.assign(value, opt)
}

/// Parse JSON text into a fresh typed instance.
pub fn from_json<T: Facet>(text: &str, opt: &FromValueOptions) -> Result<T> {
	let mut host = T::default();
	read_json(&mut host, text, opt)?;
	Ok(host)
}

/// Serialize a typed instance to JSON text through its schema.
pub fn write_json<T: Facet>(host: &T, opt: &JsonOptions) -> String {
	serialize(&host.to_value(), opt)
}

struct Parser<'a> {
	text: &'a str,
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Parser<'a> {
	fn err(&self, msg: &'static str) -> CodecError {
		CodecError::Syntax { at: self.pos, msg }
	}

	fn peek(&self) -> Option<u8> {
		self.bytes.get(self.pos).copied()
	}

	fn skip_ws(&mut self) {
		while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
			self.pos += 1;
		}
	}

	fn parse_value(&mut self, depth: u32) -> Result<Value> {
		if depth >= MAX_DEPTH {
			return Err(CodecError::DepthExceeded { max_depth: MAX_DEPTH });
		}

		match self.peek() {
			None => Err(self.err("unexpected end of input")),
			Some(b'{') => self.parse_object(depth),
			Some(b'[') => self.parse_array(depth),
			Some(b'"') => Ok(Value::String(self.parse_string()?)),
			Some(b't') => self.parse_literal("true", Value::Bool(true)),
			Some(b'f') => self.parse_literal("false", Value::Bool(false)),
			Some(b'n') => self.parse_literal("null", Value::Null),
			Some(b'-' | b'0'..=b'9') => self.parse_number(),
			Some(_) => Err(self.err("unexpected token")),
		}
	}

	fn parse_object(&mut self, depth: u32) -> Result<Value> {
		self.pos += 1;
		let mut entries = Vec::new();

		self.skip_ws();
		if self.peek() == Some(b'}') {
			self.pos += 1;
			return Ok(Value::Object(entries));
		}

		loop {
			self.skip_ws();
			if self.peek() == Some(b'}') {
				return Err(self.err("trailing comma"));
			}
			if self.peek() != Some(b'"') {
				return Err(self.err("expected string key"));
			}
			let key = self.parse_string()?;

			self.skip_ws();
			if self.peek() != Some(b':') {
				return Err(self.err("expected ':'"));
			}
			self.pos += 1;

			self.skip_ws();
			let value = self.parse_value(depth + 1)?;
			entries.push((key, value));

			self.skip_ws();
			match self.peek() {
				Some(b',') => self.pos += 1,
				Some(b'}') => {
					self.pos += 1;
					return Ok(Value::Object(entries));
				}
				_ => return Err(self.err("expected ',' or '}'")),
			}
		}
	}

	fn parse_array(&mut self, depth: u32) -> Result<Value> {
		self.pos += 1;
		let mut items = Vec::new();

		self.skip_ws();
		if self.peek() == Some(b']') {
			self.pos += 1;
			return Ok(Value::Array(items));
		}

		loop {
			self.skip_ws();
			if self.peek() == Some(b']') {
				return Err(self.err("trailing comma"));
			}
			items.push(self.parse_value(depth + 1)?);

			self.skip_ws();
			match self.peek() {
				Some(b',') => self.pos += 1,
				Some(b']') => {
					self.pos += 1;
					return Ok(Value::Array(items));
				}
				_ => return Err(self.err("expected ',' or ']'")),
			}
		}
	}

	fn parse_string(&mut self) -> Result<Box<str>> {
		self.pos += 1;
		let mut out = String::new();
		let mut run = self.pos;

		loop {
			let Some(byte) = self.peek() else {
				return Err(self.err("unterminated string"));
			};
			match byte {
				b'"' => {
					out.push_str(&self.text[run..self.pos]);
					self.pos += 1;
					return Ok(out.into_boxed_str());
				}
				b'\\' => {
					out.push_str(&self.text[run..self.pos]);
					self.pos += 1;
					self.parse_escape(&mut out)?;
					run = self.pos;
				}
				0x00..=0x1f => return Err(self.err("control character in string")),
				_ => self.pos += 1,
			}
		}
	}

	fn parse_escape(&mut self, out: &mut String) -> Result<()> {
		let Some(byte) = self.peek() else {
			return Err(self.err("unterminated string"));
		};
		self.pos += 1;

		match byte {
			b'"' => out.push('"'),
			b'\\' => out.push('\\'),
			b'/' => out.push('/'),
			b'b' => out.push('\u{0008}'),
			b'f' => out.push('\u{000c}'),
			b'n' => out.push('\n'),
			b'r' => out.push('\r'),
			b't' => out.push('\t'),
			b'u' => {
				let c = self.parse_unicode_escape()?;
				out.push(c);
			}
			_ => {
				self.pos -= 1;
				return Err(self.err("invalid escape"));
			}
		}
		Ok(())
	}

	fn parse_unicode_escape(&mut self) -> Result<char> {
		let unit = self.parse_hex4()?;

		if (0xdc00..=0xdfff).contains(&unit) {
			return Err(self.err("unpaired surrogate"));
		}
		if (0xd800..=0xdbff).contains(&unit) {
			if self.peek() != Some(b'\\') || self.bytes.get(self.pos + 1) != Some(&b'u') {
				return Err(self.err("unpaired surrogate"));
			}
			self.pos += 2;
			let low = self.parse_hex4()?;
			if !(0xdc00..=0xdfff).contains(&low) {
				return Err(self.err("unpaired surrogate"));
			}

			let combined = 0x10000 + ((u32::from(unit) - 0xd800) << 10) + (u32::from(low) - 0xdc00);
			return char::from_u32(combined).ok_or_else(|| self.err("invalid unicode escape"));
		}

		char::from_u32(u32::from(unit)).ok_or_else(|| self.err("invalid unicode escape"))
	}

	fn parse_hex4(&mut self) -> Result<u16> {
		let mut value = 0_u16;
		for _ in 0..4 {
			let digit = self
				.peek()
				.and_then(|byte| char::from(byte).to_digit(16))
				.ok_or_else(|| self.err("invalid unicode escape"))?;
			value = value * 16 + digit as u16;
			self.pos += 1;
		}
		Ok(value)
	}

	fn parse_number(&mut self) -> Result<Value> {
		let start = self.pos;
		if self.peek() == Some(b'-') {
			self.pos += 1;
		}

		match self.peek() {
			Some(b'0') => {
				self.pos += 1;
				if matches!(self.peek(), Some(b'0'..=b'9')) {
					return Err(self.err("leading zero in number"));
				}
			}
			Some(b'1'..=b'9') => {
				self.pos += 1;
				self.digits();
			}
			_ => return Err(self.err("invalid number")),
		}

		let mut is_float = false;
		if self.peek() == Some(b'.') {
			self.pos += 1;
			if !matches!(self.peek(), Some(b'0'..=b'9')) {
				return Err(self.err("invalid number"));
			}
			self.digits();
			is_float = true;
		}
		if matches!(self.peek(), Some(b'e' | b'E')) {
			self.pos += 1;
			if matches!(self.peek(), Some(b'+' | b'-')) {
				self.pos += 1;
			}
			if !matches!(self.peek(), Some(b'0'..=b'9')) {
				return Err(self.err("invalid number"));
			}
			self.digits();
			is_float = true;
		}

		let slice = &self.text[start..self.pos];
		if !is_float {
			// Integer form outside i64 range falls back to f64.
			if let Ok(v) = slice.parse::<i64>() {
				return Ok(Value::I64(v));
			}
		}
		slice.parse::<f64>().map(Value::F64).map_err(|_| CodecError::Syntax {
			at: start,
			msg: "invalid number",
		})
	}

	fn digits(&mut self) {
		while matches!(self.peek(), Some(b'0'..=b'9')) {
			self.pos += 1;
		}
	}

	fn parse_literal(&mut self, word: &'static str, value: Value) -> Result<Value> {
		if self.bytes[self.pos..].starts_with(word.as_bytes()) {
			self.pos += word.len();
			Ok(value)
		} else {
			Err(self.err("invalid literal"))
		}
	}
}

fn write_value(out: &mut String, value: &Value, indent: usize, level: usize) {
	match value {
		Value::Null => out.push_str("null"),
		Value::Bool(true) => out.push_str("true"),
		Value::Bool(false) => out.push_str("false"),
		Value::I64(v) => {
			let _ = write!(out, "{v}");
		}
		Value::F64(v) => write_f64(out, *v),
		Value::String(s) => write_string(out, s),
		Value::Array(items) => write_array(out, items, indent, level),
		Value::Object(entries) => write_object(out, entries, indent, level),
	}
}

fn write_f64(out: &mut String, v: f64) {
	if v.is_finite() {
		// Debug keeps a decimal point or exponent, so integers and floats
		// stay distinguishable, and it is shortest-round-trip.
		let _ = write!(out, "{v:?}");
	} else {
		out.push_str("null");
	}
}

fn write_string(out: &mut String, s: &str) {
	out.push('"');
	for c in s.chars() {
		match c {
			'"' => out.push_str("\\\""),
			'\\' => out.push_str("\\\\"),
			'\u{0008}' => out.push_str("\\b"),
			'\u{000c}' => out.push_str("\\f"),
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			'\t' => out.push_str("\\t"),
			c if (c as u32) < 0x20 => {
				let _ = write!(out, "\\u{:04x}", c as u32);
			}
			c => out.push(c),
		}
	}
	out.push('"');
}

fn write_array(out: &mut String, items: &[Value], indent: usize, level: usize) {
	if items.is_empty() {
		out.push_str("[]");
		return;
	}

	out.push('[');
	for (i, item) in items.iter().enumerate() {
		if i > 0 {
			out.push(',');
		}
		break_line(out, indent, level + 1);
		write_value(out, item, indent, level + 1);
	}
	break_line(out, indent, level);
	out.push(']');
}

fn write_object(out: &mut String, entries: &[(Box<str>, Value)], indent: usize, level: usize) {
	if entries.is_empty() {
		out.push_str("{}");
		return;
	}

	out.push('{');
	for (i, (key, item)) in entries.iter().enumerate() {
		if i > 0 {
			out.push(',');
		}
		break_line(out, indent, level + 1);
		write_string(out, key);
		out.push(':');
		if indent > 0 {
			out.push(' ');
		}
		write_value(out, item, indent, level + 1);
	}
	break_line(out, indent, level);
	out.push('}');
}

fn break_line(out: &mut String, indent: usize, level: usize) {
	if indent == 0 {
		return;
	}
	out.push('\n');
	for _ in 0..indent * level {
		out.push(' ');
	}
}
