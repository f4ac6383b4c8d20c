//! Field enumeration for composite types.

use chainrlp_core::{FieldDescriptor, ModifierParser, NestedResolver, ResolveError, TypeRef};

/// Walks a composite's declared fields and resolves the ones the codec uses.
pub struct FieldEnumerator;

impl FieldEnumerator {
    /// Codec fields of `ty` in declaration order.
    ///
    /// Non-public fields are skipped without looking at their annotation.
    /// Fields annotated `-` are skipped after parsing. Every other field is
    /// resolved through `resolver`; the first failure aborts enumeration.
    pub fn enumerate(
        ty: &TypeRef,
        resolver: &mut dyn NestedResolver,
    ) -> Result<Vec<FieldDescriptor>, ResolveError> {
        let owner = ty.identity();
        let decls = ty.describe_fields();
        let mut fields = Vec::with_capacity(decls.len());
        for (index, decl) in decls.iter().enumerate() {
            if !decl.is_visible() {
                continue;
            }
            let modifiers = ModifierParser::parse(&owner, &decls, index)?;
            if modifiers.ignored {
                continue;
            }
            let metadata = resolver.resolve(&decl.ty(), modifiers)?;
            fields.push(FieldDescriptor {
                index,
                name: decl.name.clone(),
                metadata,
            });
        }
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainrlp_core::{
        CompositeType, FieldDecl, MetadataHandle, ModifierSet, Primitive, TypeKey, TypeMetadata,
    };

    /// Records every nested resolution instead of building anything.
    #[derive(Default)]
    struct Recorder {
        seen: Vec<TypeKey>,
    }

    impl NestedResolver for Recorder {
        fn resolve(
            &mut self,
            ty: &TypeRef,
            modifiers: ModifierSet,
        ) -> Result<MetadataHandle, ResolveError> {
            let key = TypeKey::new(ty, modifiers);
            self.seen.push(key.clone());
            Ok(TypeMetadata::placeholder(key))
        }

        fn fields(&mut self, ty: &TypeRef) -> Result<Vec<FieldDescriptor>, ResolveError> {
            FieldEnumerator::enumerate(ty, self)
        }
    }

    #[test]
    fn filters_hidden_and_ignored_fields() {
        let ty = CompositeType::new("tests::Mixed")
            .field(FieldDecl::new("Visible", Primitive::uint()))
            .field(FieldDecl::new("hiddenField", Primitive::bytes()).private())
            .field(FieldDecl::new("IgnoredTagged", Primitive::string()).annotated("-"))
            .build();
        let mut rec = Recorder::default();
        let fields = FieldEnumerator::enumerate(&ty, &mut rec).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].index, 0);
        assert_eq!(fields[0].name, "Visible");
        assert_eq!(rec.seen.len(), 1);
    }

    #[test]
    fn hidden_fields_are_not_parsed() {
        let ty = CompositeType::new("tests::Hidden")
            .field(FieldDecl::new("secret", Primitive::uint()).private().annotated("bogus"))
            .field(FieldDecl::new("Public", Primitive::uint()))
            .build();
        let fields = FieldEnumerator::enumerate(&ty, &mut Recorder::default()).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].index, 1);
    }

    #[test]
    fn preserves_order_and_modifiers() {
        let ty = CompositeType::new("tests::Ordered")
            .field(FieldDecl::new("C", Primitive::uint()))
            .field(FieldDecl::new("A", Primitive::bytes()).annotated("nil"))
            .field(FieldDecl::new("B", Primitive::bool()))
            .build();
        let mut rec = Recorder::default();
        let fields = rec.fields(&ty).unwrap();
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["C", "A", "B"]);
        assert_eq!(rec.seen[1].modifiers, ModifierSet::NILABLE);
        assert_eq!(fields[1].metadata.key().modifiers, ModifierSet::NILABLE);
    }

    #[test]
    fn first_error_aborts() {
        let ty = CompositeType::new("tests::Broken")
            .field(FieldDecl::new("Good", Primitive::uint()))
            .field(FieldDecl::new("Bad", Primitive::uint()).annotated("nil, oops"))
            .field(FieldDecl::new("Never", Primitive::uint()))
            .build();
        let mut rec = Recorder::default();
        let err = FieldEnumerator::enumerate(&ty, &mut rec).unwrap_err();
        assert_eq!(err.to_string(), "rlp: unknown modifier \"oops\" on tests::Broken.Bad");
        assert_eq!(rec.seen.len(), 1);
    }
}
