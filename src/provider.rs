//! Collaborator contracts consumed by the resolution engine, plus default
//! implementations for the naming and plugin seams.
//!
//! The engine is deliberately thin on policy: member discovery, naming and
//! post-hoc property adjustment all live behind these traits so an embedding
//! documentation generator can swap in its own implementations.

use std::collections::BTreeMap;

use crate::member::{
    CandidateMember, PropertyMeta, RawMember, ResolvedAccessor, ResolvedFactory, ResolvedField,
};
use crate::property::{PropertyBuilder, SchemaTypeRef};
use crate::types::{Direction, DocFormat, TypeDescriptor};

/// Enumerates the candidate members of a type for one direction.
///
/// Keys are canonical internal names and must be unique; one logical property
/// surfaces at most once even when it is visible through several raw forms.
pub trait MemberEnumerator {
    fn describe(
        &self,
        ty: &TypeDescriptor,
        direction: Direction,
    ) -> BTreeMap<String, CandidateMember>;
}

/// Enumerates the concretely resolved members of a type.
///
/// The engine does the matching (structural signature equality for accessors,
/// exact name for fields, signature equality for factories); implementations
/// only list what the type has.
pub trait TypeIntrospector {
    fn accessors_in(&self, ty: &TypeDescriptor) -> Vec<ResolvedAccessor>;
    fn fields_in(&self, ty: &TypeDescriptor) -> Vec<ResolvedField>;
    fn factories_in(&self, ty: &TypeDescriptor) -> Vec<ResolvedFactory>;
}

/// Computes the final property name.
///
/// Must be pure and deterministic. `previous` is the enclosing unwrapped
/// member when the property is being flattened into a parent; implementations
/// use it to keep flattened names from colliding with the parent's own.
pub trait NamingResolver {
    fn name(
        &self,
        property: &CandidateMember,
        is_return_type: bool,
        previous: Option<&CandidateMember>,
    ) -> String;
}

/// Context handed to plugins alongside the property under construction.
pub struct MemberContext<'a> {
    pub member: &'a RawMember,
    pub meta: &'a PropertyMeta,
    pub direction: Direction,
    pub format: DocFormat,
}

/// Post-hoc property adjustment.
///
/// Applied uniformly to every discovery variant. May rewrite any field of the
/// builder; the pipeline as a whole is responsible for attaching the
/// schema-type reference.
pub trait PropertyPlugin {
    fn apply(&self, property: &mut PropertyBuilder, context: &MemberContext<'_>);
}

/// Default naming: explicit rename when present, else the internal name,
/// wrapped in the enclosing unwrap's prefix/suffix when flattening.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNaming;

impl NamingResolver for DefaultNaming {
    fn name(
        &self,
        property: &CandidateMember,
        _is_return_type: bool,
        previous: Option<&CandidateMember>,
    ) -> String {
        let base = property
            .meta
            .explicit_name
            .clone()
            .unwrap_or_else(|| property.internal_name.clone());
        match previous.and_then(|p| p.unwrapped.as_ref()) {
            Some(unwrap) => format!("{}{}{}", unwrap.prefix, base, unwrap.suffix),
            None => base,
        }
    }
}

/// Type names stamped as inline scalars rather than named schema pointers.
const SCALAR_TYPES: &[&str] = &[
    "bool", "char", "i8", "i16", "i32", "i64", "i128", "u8", "u16", "u32", "u64", "u128", "f32",
    "f64", "str", "String",
];

/// Terminal plugin attaching a schema-type reference from the declared type,
/// unless an earlier plugin already stamped one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaRefPlugin;

impl PropertyPlugin for SchemaRefPlugin {
    fn apply(&self, property: &mut PropertyBuilder, _context: &MemberContext<'_>) {
        if property.schema_ref.is_none() {
            let name = property.declared_type.name.clone();
            property.schema_ref = Some(if SCALAR_TYPES.contains(&name.as_str()) {
                SchemaTypeRef::Scalar(name)
            } else {
                SchemaTypeRef::Named(name)
            });
        }
    }
}

/// Ordered plugin pipeline; plugins are applied first to last.
#[derive(Default)]
pub struct PluginChain {
    plugins: Vec<Box<dyn PropertyPlugin>>,
}

impl PluginChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, plugin: impl PropertyPlugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    pub fn push(&mut self, plugin: Box<dyn PropertyPlugin>) {
        self.plugins.push(plugin);
    }
}

impl PropertyPlugin for PluginChain {
    fn apply(&self, property: &mut PropertyBuilder, context: &MemberContext<'_>) {
        for plugin in &self.plugins {
            plugin.apply(property, context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::{MethodRef, RawMember, Unwrap};

    fn accessor_candidate(name: &str) -> CandidateMember {
        CandidateMember::new(name, RawMember::Accessor(MethodRef::getter(name, "i32")))
    }

    fn member_context<'a>(member: &'a RawMember, meta: &'a PropertyMeta) -> MemberContext<'a> {
        MemberContext {
            member,
            meta,
            direction: Direction::Read,
            format: DocFormat::OpenApi3,
        }
    }

    #[test]
    fn default_naming_prefers_explicit_name() {
        let mut candidate = accessor_candidate("internal_id");
        candidate.meta.explicit_name = Some("id".into());
        assert_eq!(DefaultNaming.name(&candidate, true, None), "id");

        let candidate = accessor_candidate("plain");
        assert_eq!(DefaultNaming.name(&candidate, true, None), "plain");
    }

    #[test]
    fn default_naming_applies_unwrap_affixes() {
        let mut previous = accessor_candidate("address");
        previous.unwrapped = Some(Unwrap::with_affixes("addr_", "_v1"));

        let candidate = accessor_candidate("city");
        let name = DefaultNaming.name(&candidate, true, Some(&previous));
        assert_eq!(name, "addr_city_v1");
    }

    #[test]
    fn default_naming_ignores_non_unwrapped_previous() {
        let previous = accessor_candidate("address");
        let candidate = accessor_candidate("city");
        assert_eq!(DefaultNaming.name(&candidate, true, Some(&previous)), "city");
    }

    #[test]
    fn schema_ref_plugin_distinguishes_scalars() {
        let member = RawMember::Field("age".into());
        let meta = PropertyMeta::default();

        let mut scalar = PropertyBuilder::new("age", TypeDescriptor::new("u32"));
        SchemaRefPlugin.apply(&mut scalar, &member_context(&member, &meta));
        assert_eq!(scalar.schema_ref, Some(SchemaTypeRef::Scalar("u32".into())));

        let mut named = PropertyBuilder::new("home", TypeDescriptor::new("Address"));
        SchemaRefPlugin.apply(&mut named, &member_context(&member, &meta));
        assert_eq!(
            named.schema_ref,
            Some(SchemaTypeRef::Named("Address".into()))
        );
    }

    #[test]
    fn schema_ref_plugin_keeps_existing_stamp() {
        let member = RawMember::Field("age".into());
        let meta = PropertyMeta::default();

        let mut builder = PropertyBuilder::new("age", TypeDescriptor::new("u32"));
        builder.schema_ref = Some(SchemaTypeRef::Named("Age".into()));
        SchemaRefPlugin.apply(&mut builder, &member_context(&member, &meta));
        assert_eq!(builder.schema_ref, Some(SchemaTypeRef::Named("Age".into())));
    }

    #[test]
    fn plugin_chain_applies_in_order() {
        struct SetDescription(&'static str);
        impl PropertyPlugin for SetDescription {
            fn apply(&self, property: &mut PropertyBuilder, _context: &MemberContext<'_>) {
                property.description = Some(self.0.to_string());
            }
        }

        let chain = PluginChain::new()
            .with(SetDescription("first"))
            .with(SetDescription("second"));

        let member = RawMember::Field("x".into());
        let meta = PropertyMeta::default();
        let mut builder = PropertyBuilder::new("x", TypeDescriptor::new("i32"));
        chain.apply(&mut builder, &member_context(&member, &meta));
        assert_eq!(builder.description.as_deref(), Some("second"));
    }
}
