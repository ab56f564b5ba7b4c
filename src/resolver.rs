//! The property resolution engine.
//!
//! Orchestrates enumerator -> locator -> view filter -> unwrap recursion ->
//! builder -> plugin pipeline for one type and context, returning the
//! deduplicated, name-sorted property list.

use log::{debug, warn};

use crate::error::ResolveError;
use crate::member::{CandidateMember, FactorySignature, MethodRef, RawMember, ResolvedAccessor, ResolvedFactory, ResolvedField};
use crate::property::{self, PropertyDescriptor};
use crate::provider::{MemberContext, MemberEnumerator, NamingResolver, PropertyPlugin, TypeIntrospector};
use crate::types::{ResolutionContext, TypeDescriptor};
use crate::view::{member_passes_view, ScopeRegistry};

/// Hard bound on unwrap nesting. Deeper chains fail with
/// [`ResolveError::UnwrapDepthExceeded`] instead of walking forever.
pub const MAX_UNWRAP_DEPTH: usize = 32;

/// Resolves the ordered property set of a structured type.
///
/// All collaborators arrive at construction and are treated as read-only, so
/// a resolver can be shared across concurrent resolve calls. Member-lookup
/// failures are never fatal: the affected property is skipped with a
/// diagnostic and resolution continues, favoring a best-effort schema over a
/// hard failure.
pub struct PropertyResolver<'a> {
    enumerator: &'a dyn MemberEnumerator,
    introspector: &'a dyn TypeIntrospector,
    naming: &'a dyn NamingResolver,
    plugins: &'a dyn PropertyPlugin,
    scopes: &'a ScopeRegistry,
}

impl<'a> PropertyResolver<'a> {
    pub fn new(
        enumerator: &'a dyn MemberEnumerator,
        introspector: &'a dyn TypeIntrospector,
        naming: &'a dyn NamingResolver,
        plugins: &'a dyn PropertyPlugin,
        scopes: &'a ScopeRegistry,
    ) -> Self {
        Self {
            enumerator,
            introspector,
            naming,
            plugins,
            scopes,
        }
    }

    /// Resolve the properties of `ty` under `context`, sorted by name.
    ///
    /// # Errors
    ///
    /// Only the unwrap recursion guards error: [`ResolveError::CyclicUnwrap`]
    /// when a type flattens back into itself, and
    /// [`ResolveError::UnwrapDepthExceeded`] past [`MAX_UNWRAP_DEPTH`] levels.
    pub fn resolve(
        &self,
        ty: &TypeDescriptor,
        context: &ResolutionContext,
    ) -> Result<Vec<PropertyDescriptor>, ResolveError> {
        self.resolve_with_previous(ty, context, None)
    }

    fn resolve_with_previous(
        &self,
        ty: &TypeDescriptor,
        context: &ResolutionContext,
        previous: Option<&CandidateMember>,
    ) -> Result<Vec<PropertyDescriptor>, ResolveError> {
        let candidates = self.enumerator.describe(ty, context.direction());

        let mut properties = Vec::new();
        for (key, candidate) in &candidates {
            debug!("reading property {key} of {}", ty.name);
            if !member_passes_view(&candidate.views, context.view(), self.scopes) {
                debug!("property {key} not visible under view {:?}", context.view());
                continue;
            }
            properties.extend(self.candidate_properties(ty, candidate, previous, context)?);
        }

        properties.retain(|p| !p.hidden);
        properties.sort_by(|a, b| a.name.cmp(&b.name));
        collapse_duplicates(&mut properties);
        Ok(properties)
    }

    /// Resolve the zero or more properties one candidate contributes.
    ///
    /// Dispatch is exhaustive over the closed member variants; an enumerator
    /// and introspector disagreeing about a member suppresses that one
    /// property, nothing more.
    fn candidate_properties(
        &self,
        ty: &TypeDescriptor,
        candidate: &CandidateMember,
        previous: Option<&CandidateMember>,
        context: &ResolutionContext,
    ) -> Result<Vec<PropertyDescriptor>, ResolveError> {
        match &candidate.member {
            RawMember::Accessor(raw) => {
                let Some(accessor) = self.find_accessor(ty, raw) else {
                    warn!(
                        "no accessor on {} matches {}, skipping property {}",
                        ty.name, raw.name, candidate.internal_name
                    );
                    return Ok(Vec::new());
                };
                let value_type = context.alternate_for(&accessor.value_type);
                if candidate.is_unwrapped() {
                    return self.unwrap_into(&value_type, context, candidate);
                }
                Ok(vec![self.build_accessor(&accessor, candidate, previous, context)])
            }
            RawMember::Field(_) => {
                let Some(field) = self.find_field(ty, &candidate.internal_name) else {
                    warn!(
                        "no field {} on {}, skipping property",
                        candidate.internal_name, ty.name
                    );
                    return Ok(Vec::new());
                };
                let value_type = context.alternate_for(&field.value_type);
                if candidate.is_unwrapped() {
                    return self.unwrap_into(&value_type, context, candidate);
                }
                Ok(vec![self.build_field(&field, candidate, previous, context)])
            }
            RawMember::Parameter(param) => {
                let Some(factory) = self.find_factory(ty, &param.factory) else {
                    warn!(
                        "no factory on {} matches parameter {}, skipping property",
                        ty.name, candidate.internal_name
                    );
                    return Ok(Vec::new());
                };
                let Some(parameter) = factory.parameters.get(param.index).cloned() else {
                    warn!(
                        "factory on {} has no parameter {}, skipping property {}",
                        ty.name, param.index, candidate.internal_name
                    );
                    return Ok(Vec::new());
                };
                let value_type = context.alternate_for(&parameter.value_type);
                if candidate.is_unwrapped() {
                    return self.unwrap_into(&value_type, context, candidate);
                }
                Ok(vec![self.build_parameter(&parameter, candidate, previous, context)])
            }
        }
    }

    /// Flatten the value type's properties in place of a single property.
    fn unwrap_into(
        &self,
        value_type: &TypeDescriptor,
        context: &ResolutionContext,
        candidate: &CandidateMember,
    ) -> Result<Vec<PropertyDescriptor>, ResolveError> {
        if context.has_seen(value_type) {
            let mut chain: Vec<&str> = context.ancestry().iter().map(String::as_str).collect();
            chain.push(&value_type.name);
            return Err(ResolveError::CyclicUnwrap {
                type_name: value_type.name.clone(),
                chain: chain.join(" -> "),
            });
        }
        let child = ResolutionContext::from_parent(context, value_type.clone());
        if child.depth() > MAX_UNWRAP_DEPTH {
            return Err(ResolveError::UnwrapDepthExceeded {
                type_name: value_type.name.clone(),
                limit: MAX_UNWRAP_DEPTH,
            });
        }
        self.resolve_with_previous(value_type, &child, Some(candidate))
    }

    fn build_accessor(
        &self,
        accessor: &ResolvedAccessor,
        candidate: &CandidateMember,
        previous: Option<&CandidateMember>,
        context: &ResolutionContext,
    ) -> PropertyDescriptor {
        let name = self.naming.name(candidate, context.is_return_type(), previous);
        debug!("adding property {name} to model");
        let builder = property::accessor_property(name, accessor, candidate, context);
        self.finish(builder, candidate, context)
    }

    fn build_field(
        &self,
        field: &ResolvedField,
        candidate: &CandidateMember,
        previous: Option<&CandidateMember>,
        context: &ResolutionContext,
    ) -> PropertyDescriptor {
        let name = self.naming.name(candidate, context.is_return_type(), previous);
        debug!("adding property {name} to model");
        let builder = property::field_property(name, field, candidate, context);
        self.finish(builder, candidate, context)
    }

    fn build_parameter(
        &self,
        parameter: &crate::member::ResolvedParameter,
        candidate: &CandidateMember,
        previous: Option<&CandidateMember>,
        context: &ResolutionContext,
    ) -> PropertyDescriptor {
        let name = self.naming.name(candidate, context.is_return_type(), previous);
        debug!("adding property {name} to model");
        let builder = property::parameter_property(name, parameter, candidate, context);
        self.finish(builder, candidate, context)
    }

    fn finish(
        &self,
        mut builder: crate::property::PropertyBuilder,
        candidate: &CandidateMember,
        context: &ResolutionContext,
    ) -> PropertyDescriptor {
        let member_context = MemberContext {
            member: &candidate.member,
            meta: &candidate.meta,
            direction: context.direction(),
            format: context.format(),
        };
        self.plugins.apply(&mut builder, &member_context);
        builder.build()
    }

    fn find_accessor(&self, ty: &TypeDescriptor, raw: &MethodRef) -> Option<ResolvedAccessor> {
        self.introspector
            .accessors_in(ty)
            .into_iter()
            .find(|accessor| &accessor.raw == raw)
    }

    fn find_field(&self, ty: &TypeDescriptor, name: &str) -> Option<ResolvedField> {
        self.introspector
            .fields_in(ty)
            .into_iter()
            .find(|field| field.name == name)
    }

    fn find_factory(
        &self,
        ty: &TypeDescriptor,
        signature: &FactorySignature,
    ) -> Option<ResolvedFactory> {
        self.introspector
            .factories_in(ty)
            .into_iter()
            .find(|factory| &factory.signature == signature)
    }
}

/// Collapse same-named neighbors in a name-sorted list, keeping the first.
///
/// Exact duplicates collapse silently; differing descriptors under one name
/// are a modeling bug worth hearing about.
fn collapse_duplicates(properties: &mut Vec<PropertyDescriptor>) {
    properties.dedup_by(|next, prev| {
        if next.name != prev.name {
            return false;
        }
        if next != prev {
            warn!(
                "duplicate property name {:?}: keeping the first definition",
                prev.name
            );
        }
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PropertySpec, StaticModel, TypeSpec};
    use crate::property::PropertyBuilder;
    use crate::provider::{DefaultNaming, PluginChain, SchemaRefPlugin};
    use crate::types::Direction;

    fn resolve_with(
        model: &StaticModel,
        scopes: &ScopeRegistry,
        ty: &str,
        direction: Direction,
    ) -> Vec<PropertyDescriptor> {
        let plugins = SchemaRefPlugin;
        let resolver = PropertyResolver::new(model, model, &DefaultNaming, &plugins, scopes);
        let root = TypeDescriptor::new(ty);
        let context = ResolutionContext::new(root.clone(), direction);
        resolver.resolve(&root, &context).unwrap()
    }

    #[test]
    fn accessor_only_type_sorted_by_name() {
        let mut model = StaticModel::new();
        model.define(TypeSpec::new("Point").accessor("y", "i32").accessor("x", "i32"));
        let scopes = ScopeRegistry::new();

        let properties = resolve_with(&model, &scopes, "Point", Direction::Read);
        let names: Vec<&str> = properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["x", "y"]);
        assert!(properties.iter().all(|p| !p.hidden));
    }

    #[test]
    fn unwrap_flattens_value_type_properties() {
        let mut model = StaticModel::new();
        model.define(TypeSpec::new("Point").accessor("x", "i32").accessor("y", "i32"));
        model.define(
            TypeSpec::new("Wrapper").property(
                PropertySpec::accessor("inner", "Point").unwrapped(crate::member::Unwrap::bare()),
            ),
        );
        let scopes = ScopeRegistry::new();

        let properties = resolve_with(&model, &scopes, "Wrapper", Direction::Read);
        let names: Vec<&str> = properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["x", "y"]);
    }

    #[test]
    fn cyclic_unwrap_fails_with_dedicated_error() {
        let mut model = StaticModel::new();
        model.define(
            TypeSpec::new("Node")
                .property(PropertySpec::accessor("next", "Node").unwrapped(crate::member::Unwrap::bare())),
        );
        let scopes = ScopeRegistry::new();
        let plugins = SchemaRefPlugin;
        let resolver = PropertyResolver::new(&model, &model, &DefaultNaming, &plugins, &scopes);
        let root = TypeDescriptor::new("Node");
        let context = ResolutionContext::new(root.clone(), Direction::Read);

        let err = resolver.resolve(&root, &context).unwrap_err();
        match err {
            ResolveError::CyclicUnwrap { type_name, chain } => {
                assert_eq!(type_name, "Node");
                assert_eq!(chain, "Node -> Node");
            }
            other => panic!("expected CyclicUnwrap, got {other}"),
        }
    }

    #[test]
    fn enumerator_without_introspector_match_is_tolerated() {
        // Enumerator reports an accessor the introspector cannot locate: the
        // property vanishes, the rest of the list resolves.
        struct Disagreeing(StaticModel);
        impl MemberEnumerator for Disagreeing {
            fn describe(
                &self,
                ty: &TypeDescriptor,
                direction: Direction,
            ) -> std::collections::BTreeMap<String, CandidateMember> {
                let mut candidates = self.0.describe(ty, direction);
                candidates.insert(
                    "ghost".into(),
                    CandidateMember::new(
                        "ghost",
                        RawMember::Accessor(MethodRef::getter("ghost", "i32")),
                    ),
                );
                candidates
            }
        }

        let mut model = StaticModel::new();
        model.define(TypeSpec::new("Point").accessor("x", "i32"));
        let enumerator = Disagreeing(model.clone());
        let scopes = ScopeRegistry::new();
        let plugins = PluginChain::new().with(SchemaRefPlugin);
        let resolver = PropertyResolver::new(&enumerator, &model, &DefaultNaming, &plugins, &scopes);

        let root = TypeDescriptor::new("Point");
        let context = ResolutionContext::new(root.clone(), Direction::Read);
        let properties = resolver.resolve(&root, &context).unwrap();
        let names: Vec<&str> = properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["x"]);
    }

    #[test]
    fn plugin_hidden_property_filtered_from_output() {
        struct HideBalance;
        impl PropertyPlugin for HideBalance {
            fn apply(&self, property: &mut PropertyBuilder, _context: &MemberContext<'_>) {
                if property.name == "balance" {
                    property.hidden = true;
                }
            }
        }

        let mut model = StaticModel::new();
        model.define(
            TypeSpec::new("Account")
                .accessor("id", "String")
                .field("balance", "i64"),
        );
        let scopes = ScopeRegistry::new();
        let plugins = PluginChain::new().with(HideBalance).with(SchemaRefPlugin);
        let resolver = PropertyResolver::new(&model, &model, &DefaultNaming, &plugins, &scopes);

        let root = TypeDescriptor::new("Account");
        let context = ResolutionContext::new(root.clone(), Direction::Read);
        let properties = resolver.resolve(&root, &context).unwrap();
        let names: Vec<&str> = properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["id"]);
    }

    #[test]
    fn duplicate_names_keep_first_definition() {
        // Two members renamed onto the same final name.
        let mut model = StaticModel::new();
        model.define(
            TypeSpec::new("Clash")
                .property(PropertySpec::accessor("a", "i32").renamed("value"))
                .property(PropertySpec::accessor("b", "String").renamed("value")),
        );
        let scopes = ScopeRegistry::new();

        let properties = resolve_with(&model, &scopes, "Clash", Direction::Read);
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].name, "value");
        // Candidates iterate in internal-name order, so "a" wins.
        assert_eq!(properties[0].declared_type.name, "i32");
    }
}
