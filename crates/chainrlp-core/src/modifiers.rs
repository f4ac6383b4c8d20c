//! Per-field modifier sets and the annotation parser.
//!
//! A field annotation is a comma-separated list of tokens:
//!
//! | token  | effect                                                    |
//! |--------|-----------------------------------------------------------|
//! | (empty)| nothing                                                   |
//! | `-`    | the field is ignored by the codec                         |
//! | `nil`  | empty input decodes to [`Value::Nil`](crate::Value::Nil)  |
//! | `tail` | the last, sequence-typed field swallows remaining elements|

use crate::error::{ResolveError, TailViolation};
use crate::types::{FieldDecl, TypeIdentity, TypeKind};
use serde::{Deserialize, Serialize};

/// Resolved modifiers of one field. Part of the cache key, since the same
/// type with different modifiers gets different strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModifierSet {
    pub nilable: bool,
    pub tail: bool,
    pub ignored: bool,
}

impl ModifierSet {
    pub const NONE: ModifierSet = ModifierSet {
        nilable: false,
        tail: false,
        ignored: false,
    };

    pub const NILABLE: ModifierSet = ModifierSet {
        nilable: true,
        tail: false,
        ignored: false,
    };

    pub const TAIL: ModifierSet = ModifierSet {
        nilable: false,
        tail: true,
        ignored: false,
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

impl std::fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tokens = Vec::new();
        if self.ignored {
            tokens.push("-");
        }
        if self.nilable {
            tokens.push("nil");
        }
        if self.tail {
            tokens.push("tail");
        }
        write!(f, "{}", tokens.join(","))
    }
}

/// Parser for field modifier annotations.
pub struct ModifierParser;

impl ModifierParser {
    /// Parse the annotation of `fields[index]`, declared on `owner`.
    ///
    /// `fields` must be the owner's full declared field list (visible or
    /// not): `tail` is only accepted on the last one.
    ///
    /// # Panics
    /// Panics if `index` is not a valid position in `fields`.
    pub fn parse(
        owner: &TypeIdentity,
        fields: &[FieldDecl],
        index: usize,
    ) -> Result<ModifierSet, ResolveError> {
        let field = &fields[index];
        let mut set = ModifierSet::NONE;
        for token in field.annotation.split(',') {
            match token.trim() {
                "" => {}
                "-" => set.ignored = true,
                "nil" => set.nilable = true,
                "tail" => {
                    set.tail = true;
                    if index + 1 != fields.len() {
                        return Err(placement(owner, field, TailViolation::NotLastField));
                    }
                    if field.ty().kind() != TypeKind::Sequence {
                        return Err(placement(owner, field, TailViolation::NotSequence));
                    }
                }
                other => {
                    return Err(ResolveError::ModifierSyntax {
                        token: other.to_string(),
                        owner: owner.to_string(),
                        field: field.name.clone(),
                    })
                }
            }
        }
        Ok(set)
    }
}

fn placement(owner: &TypeIdentity, field: &FieldDecl, reason: TailViolation) -> ResolveError {
    ResolveError::ModifierPlacement {
        owner: owner.to_string(),
        field: field.name.clone(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Primitive, SequenceType};
    use std::sync::Arc;

    fn owner() -> TypeIdentity {
        TypeIdentity::Named {
            path: Arc::from("tests::Owner"),
            args: vec![],
        }
    }

    fn parse_single(annotation: &str) -> Result<ModifierSet, ResolveError> {
        let fields = vec![FieldDecl::new("A", Primitive::bytes()).annotated(annotation)];
        ModifierParser::parse(&owner(), &fields, 0)
    }

    #[test]
    fn empty_and_plain_tokens() {
        assert_eq!(parse_single("").unwrap(), ModifierSet::NONE);
        assert_eq!(parse_single(" , ").unwrap(), ModifierSet::NONE);
        assert_eq!(parse_single("nil").unwrap(), ModifierSet::NILABLE);
        let ignored = parse_single("-").unwrap();
        assert!(ignored.ignored && !ignored.nilable && !ignored.tail);
    }

    #[test]
    fn tokens_are_trimmed_and_combined() {
        let set = parse_single(" nil , - ").unwrap();
        assert!(set.nilable);
        assert!(set.ignored);
        assert_eq!(set.to_string(), "-,nil");
    }

    #[test]
    fn unknown_token_rejected() {
        let err = parse_single("bogus").unwrap_err();
        match &err {
            ResolveError::ModifierSyntax { token, owner, field } => {
                assert_eq!(token, "bogus");
                assert_eq!(owner, "tests::Owner");
                assert_eq!(field, "A");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "rlp: unknown modifier \"bogus\" on tests::Owner.A"
        );
    }

    #[test]
    fn tail_on_last_sequence_field() {
        let fields = vec![
            FieldDecl::new("Head", Primitive::uint()),
            FieldDecl::new("Rest", SequenceType::of(Primitive::uint())).annotated("tail"),
        ];
        assert_eq!(
            ModifierParser::parse(&owner(), &fields, 1).unwrap(),
            ModifierSet::TAIL
        );
    }

    #[test]
    fn tail_on_non_last_field_rejected() {
        let fields = vec![
            FieldDecl::new("Rest", SequenceType::of(Primitive::uint())).annotated("tail"),
            FieldDecl::new("After", Primitive::uint()),
        ];
        let err = ModifierParser::parse(&owner(), &fields, 0).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::ModifierPlacement {
                reason: TailViolation::NotLastField,
                ..
            }
        ));
        assert!(err.to_string().contains("must be on last field"));
    }

    #[test]
    fn tail_on_non_sequence_rejected() {
        let fields = vec![FieldDecl::new("Last", Primitive::bytes()).annotated("tail")];
        let err = ModifierParser::parse(&owner(), &fields, 0).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::ModifierPlacement {
                reason: TailViolation::NotSequence,
                ..
            }
        ));
    }

    #[test]
    #[should_panic]
    fn index_out_of_range_panics() {
        let fields = vec![FieldDecl::new("A", Primitive::uint())];
        let _ = ModifierParser::parse(&owner(), &fields, 1);
    }

    #[test]
    fn modifier_set_serde() {
        let json = serde_json::to_string(&ModifierSet::NILABLE).unwrap();
        assert_eq!(json, r#"{"nilable":true,"tail":false,"ignored":false}"#);
    }
}
