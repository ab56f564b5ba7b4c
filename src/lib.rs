//! Schema Property Resolver
//!
//! Resolves, for a structured type, the ordered set of semantic properties
//! that should appear in a generated schema or API documentation model.
//!
//! Given a type and a [`ResolutionContext`] describing how it is used
//! (request vs. response payload, under a visibility scope, nested at some
//! depth), the [`PropertyResolver`] discovers every contributing member
//! through three strategies (accessor methods, fields, constructor/factory
//! parameters), computes each property's effective name, type, required-ness,
//! description and example, flattens unwrapped members into the parent, runs
//! every property through a plugin pipeline, and returns the deduplicated,
//! name-sorted list.
//!
//! # Example
//!
//! ```
//! use schema_props::{
//!     DefaultNaming, Direction, PropertyResolver, ResolutionContext, SchemaRefPlugin,
//!     ScopeRegistry, StaticModel, TypeDescriptor, TypeSpec,
//! };
//!
//! let mut model = StaticModel::new();
//! model.define(TypeSpec::new("Point").accessor("x", "i32").accessor("y", "i32"));
//!
//! let scopes = ScopeRegistry::new();
//! let resolver = PropertyResolver::new(&model, &model, &DefaultNaming, &SchemaRefPlugin, &scopes);
//!
//! let point = TypeDescriptor::new("Point");
//! let context = ResolutionContext::new(point.clone(), Direction::Read);
//! let properties = resolver.resolve(&point, &context).unwrap();
//!
//! assert_eq!(properties.len(), 2);
//! assert_eq!(properties[0].name, "x");
//! assert_eq!(properties[1].name, "y");
//! ```
//!
//! # Discovery strategies
//!
//! | Member form | Located by | Pre-hidden? |
//! |-------------|-----------|-------------|
//! | Accessor method | structural signature equality | never |
//! | Field | exact internal-name match | per metadata |
//! | Factory parameter | owning factory signature + index | never |
//!
//! Lookup failures are never fatal: a member the introspector cannot locate
//! contributes zero properties, with a `log` diagnostic, and resolution
//! continues. Only the unwrap recursion guards ([`ResolveError`]) error out.

mod error;
mod member;
mod model;
mod property;
mod provider;
mod resolver;
mod types;
mod view;

pub use error::ResolveError;
pub use member::{
    CandidateMember, FactorySignature, MethodRef, ParameterRef, PropertyMeta, RawMember,
    ResolvedAccessor, ResolvedFactory, ResolvedField, ResolvedParameter, Unwrap,
};
pub use model::{PropertySpec, StaticModel, TypeSpec};
pub use property::{
    accessor_property, field_property, parameter_property, PropertyBuilder, PropertyDescriptor,
    SchemaTypeRef,
};
pub use provider::{
    DefaultNaming, MemberContext, MemberEnumerator, NamingResolver, PluginChain, PropertyPlugin,
    SchemaRefPlugin, TypeIntrospector,
};
pub use resolver::{PropertyResolver, MAX_UNWRAP_DEPTH};
pub use types::{
    AllowableValues, Direction, DocFormat, ResolutionContext, TypeDescriptor,
};
pub use view::{member_passes_view, ScopeRegistry};
