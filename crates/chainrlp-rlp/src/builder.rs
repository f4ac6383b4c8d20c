//! Kind dispatch for RLP strategies.

use crate::containers::{
    composite_strategies, nilable_strategies, optional_strategies, sequence_strategies,
    tail_strategies,
};
use crate::primitives::{bool_strategies, bytes_strategies, string_strategies, uint_strategies};
use chainrlp_core::{
    ModifierSet, NestedResolver, ResolveError, Strategies, StrategyBuilder, TypeKind, TypeRef,
};
use tracing::trace;

/// Builds RLP strategies. Stateless; share one instance per registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct RlpStrategyBuilder;

impl StrategyBuilder for RlpStrategyBuilder {
    fn build(
        &self,
        ty: &TypeRef,
        modifiers: ModifierSet,
        resolver: &mut dyn NestedResolver,
    ) -> Result<Strategies, ResolveError> {
        let name = ty.identity().to_string();
        let kind = ty.kind();
        trace!("deriving {kind} strategies for {name}");

        if modifiers.tail && kind != TypeKind::Sequence {
            return Err(ResolveError::build(&name, "tail modifier requires a sequence"));
        }

        // the empty form `nil` decodes from and writes
        let mut list_like = kind.is_list_like();

        let base = match kind {
            TypeKind::Bool => bool_strategies(name),
            TypeKind::Uint => uint_strategies(name),
            TypeKind::Bytes => bytes_strategies(),
            TypeKind::String => string_strategies(name),
            TypeKind::Sequence => {
                let elem = element_type(ty, &name)?;
                let elem = resolver.resolve(&elem, ModifierSet::NONE)?;
                if modifiers.tail {
                    tail_strategies(elem)
                } else {
                    sequence_strategies(elem)
                }
            }
            TypeKind::Optional => {
                let elem = element_type(ty, &name)?;
                list_like = elem.kind().is_list_like();
                let elem = resolver.resolve(&elem, ModifierSet::NONE)?;
                optional_strategies(elem, list_like)
            }
            TypeKind::Composite => {
                let fields = resolver.fields(ty)?;
                composite_strategies(name, fields)
            }
        };

        // a tail field has no item of its own to be empty, so `nil` is a no-op
        if modifiers.nilable && !modifiers.tail {
            Ok(nilable_strategies(base, list_like))
        } else {
            Ok(base)
        }
    }
}

fn element_type(ty: &TypeRef, name: &str) -> Result<TypeRef, ResolveError> {
    ty.element_type()
        .ok_or_else(|| ResolveError::build(name, "descriptor reports no element type"))
}
