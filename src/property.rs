//! Property descriptors and the three builder variants.
//!
//! Each builder variant wraps a located member plus its bean-property
//! metadata into a [`PropertyBuilder`], the mutable projection the plugin
//! pipeline is allowed to rewrite. [`PropertyBuilder::build`] freezes the
//! result into a [`PropertyDescriptor`]; descriptors are never mutated after
//! the engine returns them.

use serde::Serialize;
use serde_json::Value;

use crate::member::{CandidateMember, PropertyMeta, ResolvedAccessor, ResolvedField, ResolvedParameter};
use crate::types::{AllowableValues, ResolutionContext, TypeDescriptor};

/// Schema-type reference stamped onto a property by the plugin stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaTypeRef {
    /// Pointer to a named schema.
    Named(String),
    /// Inline scalar type.
    Scalar(String),
}

/// One resolved property of a structured type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDescriptor {
    /// Final name, unique within one resolve call.
    pub name: String,
    pub declared_type: TypeDescriptor,
    /// Attached by the plugin pipeline; `None` when no plugin stamped one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_ref: Option<SchemaTypeRef>,
    pub required: bool,
    pub position: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowable_values: Option<AllowableValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Hidden descriptors are filtered out before the engine returns.
    pub hidden: bool,
}

/// Mutable property-in-progress handed to the plugin pipeline.
///
/// Every field is fair game for plugins.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyBuilder {
    pub name: String,
    pub declared_type: TypeDescriptor,
    pub schema_ref: Option<SchemaTypeRef>,
    pub required: bool,
    pub position: u32,
    pub description: Option<String>,
    pub allowable_values: Option<AllowableValues>,
    pub example: Option<Value>,
    pub hidden: bool,
}

impl PropertyBuilder {
    pub fn new(name: impl Into<String>, declared_type: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            declared_type,
            schema_ref: None,
            required: false,
            position: 0,
            description: None,
            allowable_values: None,
            example: None,
            hidden: false,
        }
    }

    /// Freeze into an immutable descriptor.
    pub fn build(self) -> PropertyDescriptor {
        PropertyDescriptor {
            name: self.name,
            declared_type: self.declared_type,
            schema_ref: self.schema_ref,
            required: self.required,
            position: self.position,
            description: self.description,
            allowable_values: self.allowable_values,
            example: self.example,
            hidden: self.hidden,
        }
    }
}

fn from_meta(name: String, declared_type: TypeDescriptor, meta: &PropertyMeta) -> PropertyBuilder {
    let mut builder = PropertyBuilder::new(name, declared_type);
    builder.required = meta.required;
    builder.position = meta.position.unwrap_or(0);
    builder.description = meta.description.clone();
    builder.allowable_values = meta.allowable_values.clone();
    builder.example = meta.example.clone();
    builder
}

/// Build a property from a located accessor method.
///
/// Accessor-backed properties are never pre-hidden; only the plugin stage can
/// hide them.
pub fn accessor_property(
    name: String,
    accessor: &ResolvedAccessor,
    candidate: &CandidateMember,
    context: &ResolutionContext,
) -> PropertyBuilder {
    let mut builder = from_meta(
        name,
        context.alternate_for(&accessor.value_type),
        &candidate.meta,
    );
    builder.hidden = false;
    builder
}

/// Build a property from a located field.
///
/// Unlike the other variants, field visibility honors the enumerator's
/// metadata: a pre-hidden field stays hidden unless a plugin reveals it.
pub fn field_property(
    name: String,
    field: &ResolvedField,
    candidate: &CandidateMember,
    context: &ResolutionContext,
) -> PropertyBuilder {
    let mut builder = from_meta(
        name,
        context.alternate_for(&field.value_type),
        &candidate.meta,
    );
    builder.hidden = candidate.meta.hidden;
    builder
}

/// Build a property from a located constructor/factory parameter.
///
/// Position defaults to the parameter's index when metadata carries none.
pub fn parameter_property(
    name: String,
    parameter: &ResolvedParameter,
    candidate: &CandidateMember,
    context: &ResolutionContext,
) -> PropertyBuilder {
    let mut builder = from_meta(
        name,
        context.alternate_for(&parameter.value_type),
        &candidate.meta,
    );
    if candidate.meta.position.is_none() {
        builder.position = parameter.index as u32;
    }
    builder.hidden = false;
    builder
}
