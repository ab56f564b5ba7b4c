//! Declarative model registry.
//!
//! Rust has no runtime reflection, so something has to tell the engine what
//! members a type has. [`StaticModel`] is that something for the common case:
//! callers declare each type's properties once and the registry serves both
//! the enumerator and the introspector views of them, guaranteed consistent.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::member::{
    CandidateMember, FactorySignature, MethodRef, ParameterRef, PropertyMeta, RawMember,
    ResolvedAccessor, ResolvedFactory, ResolvedField, ResolvedParameter, Unwrap,
};
use crate::provider::{MemberEnumerator, TypeIntrospector};
use crate::types::{AllowableValues, Direction, TypeDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpecKind {
    Accessor,
    Field,
    Parameter,
}

/// Declaration of one property of a type.
#[derive(Debug, Clone)]
pub struct PropertySpec {
    kind: SpecKind,
    internal_name: String,
    value_type: String,
    unwrapped: Option<Unwrap>,
    views: Vec<String>,
    meta: PropertyMeta,
    only_direction: Option<Direction>,
}

impl PropertySpec {
    fn new(kind: SpecKind, name: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            kind,
            internal_name: name.into(),
            value_type: value_type.into(),
            unwrapped: None,
            views: Vec::new(),
            meta: PropertyMeta::default(),
            only_direction: None,
        }
    }

    /// Property surfaced through an accessor method.
    pub fn accessor(name: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self::new(SpecKind::Accessor, name, value_type)
    }

    /// Property surfaced through a field.
    pub fn field(name: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self::new(SpecKind::Field, name, value_type)
    }

    /// Property surfaced through a parameter of the type's designated
    /// factory. All parameter specs of a type aggregate into one factory, in
    /// declaration order.
    pub fn parameter(name: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self::new(SpecKind::Parameter, name, value_type)
    }

    /// Flatten this member's value-type properties into the parent.
    pub fn unwrapped(mut self, unwrap: Unwrap) -> Self {
        self.unwrapped = Some(unwrap);
        self
    }

    /// Restrict visibility to the given scope tokens.
    pub fn views(mut self, views: &[&str]) -> Self {
        self.views = views.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Explicit rename, preferred by the naming resolver.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.meta.explicit_name = Some(name.into());
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.meta.description = Some(text.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.meta.required = required;
        self
    }

    pub fn position(mut self, position: u32) -> Self {
        self.meta.position = Some(position);
        self
    }

    /// Pre-hide the property. Only honored for field-backed properties.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.meta.hidden = hidden;
        self
    }

    pub fn example(mut self, value: Value) -> Self {
        self.meta.example = Some(value);
        self
    }

    pub fn allowable(mut self, values: AllowableValues) -> Self {
        self.meta.allowable_values = Some(values);
        self
    }

    /// Surface this property only when resolving in `direction`.
    pub fn only_for(mut self, direction: Direction) -> Self {
        self.only_direction = Some(direction);
        self
    }
}

/// Declaration of one structured type.
#[derive(Debug, Clone)]
pub struct TypeSpec {
    name: String,
    properties: Vec<PropertySpec>,
}

impl TypeSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn property(mut self, spec: PropertySpec) -> Self {
        self.properties.push(spec);
        self
    }

    /// Shorthand for a plain accessor property.
    pub fn accessor(self, name: impl Into<String>, value_type: impl Into<String>) -> Self {
        self.property(PropertySpec::accessor(name, value_type))
    }

    /// Shorthand for a plain field property.
    pub fn field(self, name: impl Into<String>, value_type: impl Into<String>) -> Self {
        self.property(PropertySpec::field(name, value_type))
    }

    fn factory_signature(&self) -> FactorySignature {
        FactorySignature {
            owner: self.name.clone(),
            param_types: self
                .properties
                .iter()
                .filter(|p| p.kind == SpecKind::Parameter)
                .map(|p| p.value_type.clone())
                .collect(),
        }
    }
}

/// Registry of type declarations implementing both discovery seams.
#[derive(Debug, Clone, Default)]
pub struct StaticModel {
    types: HashMap<String, TypeSpec>,
}

impl StaticModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type, replacing any earlier declaration under the same name.
    pub fn define(&mut self, spec: TypeSpec) {
        self.types.insert(spec.name.clone(), spec);
    }
}

impl MemberEnumerator for StaticModel {
    fn describe(
        &self,
        ty: &TypeDescriptor,
        direction: Direction,
    ) -> BTreeMap<String, CandidateMember> {
        let Some(spec) = self.types.get(&ty.name) else {
            return BTreeMap::new();
        };
        let factory = spec.factory_signature();

        let mut candidates = BTreeMap::new();
        let mut parameter_index = 0usize;
        for property in &spec.properties {
            let member = match property.kind {
                SpecKind::Accessor => RawMember::Accessor(MethodRef::getter(
                    &property.internal_name,
                    &property.value_type,
                )),
                SpecKind::Field => RawMember::Field(property.internal_name.clone()),
                SpecKind::Parameter => {
                    let index = parameter_index;
                    parameter_index += 1;
                    RawMember::Parameter(ParameterRef {
                        factory: factory.clone(),
                        index,
                    })
                }
            };
            // Parameter indices count every declared parameter, so the index
            // stays aligned with the factory even when a direction filter
            // drops the candidate below.
            if let Some(only) = property.only_direction {
                if only != direction {
                    continue;
                }
            }
            let candidate = CandidateMember {
                internal_name: property.internal_name.clone(),
                unwrapped: property.unwrapped.clone(),
                views: property.views.clone(),
                member,
                meta: property.meta.clone(),
            };
            candidates.insert(property.internal_name.clone(), candidate);
        }
        candidates
    }
}

impl TypeIntrospector for StaticModel {
    fn accessors_in(&self, ty: &TypeDescriptor) -> Vec<ResolvedAccessor> {
        let Some(spec) = self.types.get(&ty.name) else {
            return Vec::new();
        };
        spec.properties
            .iter()
            .filter(|p| p.kind == SpecKind::Accessor)
            .map(|p| ResolvedAccessor {
                raw: MethodRef::getter(&p.internal_name, &p.value_type),
                value_type: TypeDescriptor::new(&p.value_type),
            })
            .collect()
    }

    fn fields_in(&self, ty: &TypeDescriptor) -> Vec<ResolvedField> {
        let Some(spec) = self.types.get(&ty.name) else {
            return Vec::new();
        };
        spec.properties
            .iter()
            .filter(|p| p.kind == SpecKind::Field)
            .map(|p| ResolvedField {
                name: p.internal_name.clone(),
                value_type: TypeDescriptor::new(&p.value_type),
            })
            .collect()
    }

    fn factories_in(&self, ty: &TypeDescriptor) -> Vec<ResolvedFactory> {
        let Some(spec) = self.types.get(&ty.name) else {
            return Vec::new();
        };
        let parameters: Vec<ResolvedParameter> = spec
            .properties
            .iter()
            .filter(|p| p.kind == SpecKind::Parameter)
            .enumerate()
            .map(|(index, p)| ResolvedParameter {
                index,
                name: p.internal_name.clone(),
                value_type: TypeDescriptor::new(&p.value_type),
            })
            .collect();
        if parameters.is_empty() {
            return Vec::new();
        }
        vec![ResolvedFactory {
            signature: spec.factory_signature(),
            parameters,
        }]
    }
}
