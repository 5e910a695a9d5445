//! Schema files describing the argument and result records of an oracle
//! method.
//!
//! ```json
//! {
//!   "schemas": {
//!     "Request": { "fields": [
//!       { "name": "n", "ty": { "type": "Primitive", "name": "u32" } },
//!       { "name": "xs", "ty": { "type": "Array", "item_type": { "type": "Primitive", "name": "i64" } } }
//!     ] },
//!     "Response": { "fields": [
//!       { "name": "sum", "ty": { "type": "Primitive", "name": "i64" } }
//!     ] }
//!   },
//!   "input": "Request",
//!   "output": "Response"
//! }
//! ```
//!
//! Fields are listed in wire order. Struct references may nest but never
//! cycle back to a struct that is still being resolved.

use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::descriptor::{Descriptor, FieldDescriptor, RecordDescriptor};
use crate::types::BitWidth;

/// Type reference inside a schema field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SchemaType {
    /// `u8..u128`, `i8..i128`, `felt252`, `bool`, `ByteArray` or `F64`.
    Primitive { name: String },
    Array { item_type: Box<SchemaType> },
    /// Same wire form as `Array`.
    Span { item_type: Box<SchemaType> },
    Struct { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    pub ty: SchemaType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDef {
    pub fields: Vec<SchemaField>,
}

/// Parsed schema file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub schemas: BTreeMap<String, SchemaDef>,
    /// Record sent as the request arguments.
    pub input: String,
    /// Record returned as the response results.
    pub output: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to parse schema: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown primitive type `{0}`")]
    UnknownPrimitive(String),
    #[error("struct `{0}` is not defined in the schema")]
    UnknownStruct(String),
    #[error("recursive struct reference: {}", .0.join(" -> "))]
    Recursive(Vec<String>),
    #[error("array item `{0}` takes no words on the wire")]
    EmptyItem(String),
    #[error("struct `{schema}` declares field `{field}` more than once")]
    DuplicateField { schema: String, field: String },
}

impl Schema {
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Descriptor of the request argument record.
    pub fn input_descriptor(&self) -> Result<Descriptor, SchemaError> {
        self.resolve(&self.input)
    }

    /// Descriptor of the response result record.
    pub fn output_descriptor(&self) -> Result<Descriptor, SchemaError> {
        self.resolve(&self.output)
    }

    /// Resolve a named struct into a record descriptor.
    pub fn resolve(&self, name: &str) -> Result<Descriptor, SchemaError> {
        let mut stack = Vec::new();
        let descriptor = self.resolve_struct(name, &mut stack)?;
        debug!("resolved schema `{name}` to {descriptor}");
        Ok(descriptor)
    }

    fn resolve_struct<'a>(
        &'a self,
        name: &'a str,
        stack: &mut Vec<&'a str>,
    ) -> Result<Descriptor, SchemaError> {
        if stack.contains(&name) {
            let mut cycle: Vec<String> = stack.iter().map(|s| s.to_string()).collect();
            cycle.push(name.to_string());
            return Err(SchemaError::Recursive(cycle));
        }
        let def = self
            .schemas
            .get(name)
            .ok_or_else(|| SchemaError::UnknownStruct(name.to_string()))?;

        stack.push(name);
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(def.fields.len());
        for field in &def.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    schema: name.to_string(),
                    field: field.name.clone(),
                });
            }
            let descriptor = self.resolve_type(&field.ty, stack)?;
            fields.push(FieldDescriptor::new(field.name.clone(), descriptor));
        }
        stack.pop();

        Ok(Descriptor::Record(RecordDescriptor::new(name, fields)))
    }

    fn resolve_type<'a>(
        &'a self,
        ty: &'a SchemaType,
        stack: &mut Vec<&'a str>,
    ) -> Result<Descriptor, SchemaError> {
        match ty {
            SchemaType::Primitive { name } => primitive(name),
            SchemaType::Array { item_type } | SchemaType::Span { item_type } => {
                let item = self.resolve_type(item_type, stack)?;
                if item.fixed_words() == Some(0) {
                    return Err(SchemaError::EmptyItem(item.to_string()));
                }
                Ok(Descriptor::sequence(item))
            }
            SchemaType::Struct { name } => self.resolve_struct(name, stack),
        }
    }
}

impl FromStr for Schema {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Schema::from_json_str(s)
    }
}

fn primitive(name: &str) -> Result<Descriptor, SchemaError> {
    let descriptor = match name {
        "u8" => Descriptor::Unsigned(BitWidth::U8),
        "u16" => Descriptor::Unsigned(BitWidth::U16),
        "u32" => Descriptor::Unsigned(BitWidth::U32),
        "u64" => Descriptor::Unsigned(BitWidth::U64),
        "u128" => Descriptor::Unsigned(BitWidth::U128),
        "i8" => Descriptor::Signed(BitWidth::U8),
        "i16" => Descriptor::Signed(BitWidth::U16),
        "i32" => Descriptor::Signed(BitWidth::U32),
        "i64" => Descriptor::Signed(BitWidth::U64),
        "i128" => Descriptor::Signed(BitWidth::U128),
        "felt252" => Descriptor::Felt,
        "bool" => Descriptor::Bool,
        "ByteArray" => Descriptor::ByteString,
        "F64" => Descriptor::fixed64(),
        other => return Err(SchemaError::UnknownPrimitive(other.to_string())),
    };
    Ok(descriptor)
}
