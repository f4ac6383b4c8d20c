//! Strategies for sequences, optionals, composites, and the `nil` wrapper.
//!
//! Container strategies hold the element or field metadata handles they
//! were built with. Those handles may still be placeholders while the
//! registry is building a recursive type; they are only invoked after the
//! outer resolution completes them.

use crate::primitives::mismatch;
use chainrlp_core::{CodecError, FieldDescriptor, ItemKind, MetadataHandle, Strategies, Value};
use std::sync::Arc;

/// RLP list of `elem` values.
pub fn sequence_strategies(elem: MetadataHandle) -> Strategies {
    let writer = Arc::clone(&elem);
    Strategies::new(
        move |s| {
            s.list()?;
            let mut items = Vec::new();
            while !s.at_list_end() {
                items.push(elem.decode(s)?);
            }
            s.list_end()?;
            Ok(Value::List(items))
        },
        move |v, buf| match v {
            Value::List(items) => {
                let mark = buf.list_start();
                for item in items {
                    writer.write(item, buf)?;
                }
                buf.list_end(mark);
                Ok(())
            }
            other => Err(mismatch("list", other)),
        },
    )
}

/// A `tail` sequence: the elements are spliced into the enclosing list,
/// and decoding takes whatever elements that list has left.
pub fn tail_strategies(elem: MetadataHandle) -> Strategies {
    let writer = Arc::clone(&elem);
    Strategies::new(
        move |s| {
            let mut items = Vec::new();
            while !s.at_list_end() {
                items.push(elem.decode(s)?);
            }
            Ok(Value::List(items))
        },
        move |v, buf| match v {
            Value::List(items) => {
                for item in items {
                    writer.write(item, buf)?;
                }
                Ok(())
            }
            other => Err(mismatch("list", other)),
        },
    )
}

/// An optional without `nil`: input always decodes through the element
/// (empty input gives the element's empty value). `Nil` writes the
/// element's empty form.
pub fn optional_strategies(elem: MetadataHandle, list_like: bool) -> Strategies {
    let writer = Arc::clone(&elem);
    Strategies::new(
        move |s| elem.decode(s),
        move |v, buf| match v {
            Value::Nil => {
                write_empty(buf, list_like);
                Ok(())
            }
            other => writer.write(other, buf),
        },
    )
}

/// Wraps `inner` so that an empty string or empty list decodes to `Nil`,
/// and `Nil` is written as the empty form.
pub fn nilable_strategies(inner: Strategies, list_like: bool) -> Strategies {
    let Strategies { decode, write } = inner;
    Strategies::new(
        move |s| {
            let (kind, size) = s.kind()?;
            if size == 0 && kind != ItemKind::Byte {
                if kind == ItemKind::List {
                    s.list()?;
                    s.list_end()?;
                } else {
                    s.bytes()?;
                }
                return Ok(Value::Nil);
            }
            decode(s)
        },
        move |v, buf| match v {
            Value::Nil => {
                write_empty(buf, list_like);
                Ok(())
            }
            other => write(other, buf),
        },
    )
}

/// RLP list of the composite's codec fields, in declaration order.
pub fn composite_strategies(ty: String, fields: Vec<FieldDescriptor>) -> Strategies {
    let fields = Arc::new(fields);
    let writer_fields = Arc::clone(&fields);
    let writer_ty = ty.clone();
    Strategies::new(
        move |s| {
            s.list()?;
            let mut values = Vec::with_capacity(fields.len());
            for field in fields.iter() {
                if s.at_list_end() && !field.metadata.key().modifiers.tail {
                    return Err(CodecError::TooFewElements { ty: ty.clone() });
                }
                values.push(field.metadata.decode(s)?);
            }
            if !s.at_list_end() {
                return Err(CodecError::TooManyElements { ty: ty.clone() });
            }
            s.list_end()?;
            Ok(Value::Struct(values))
        },
        move |v, buf| match v {
            Value::Struct(values) if values.len() == writer_fields.len() => {
                let mark = buf.list_start();
                for (field, value) in writer_fields.iter().zip(values) {
                    field.metadata.write(value, buf)?;
                }
                buf.list_end(mark);
                Ok(())
            }
            Value::Struct(values) => Err(CodecError::TypeMismatch {
                expected: format!("{writer_ty} ({} fields)", writer_fields.len()),
                got: format!("struct ({} fields)", values.len()),
            }),
            other => Err(mismatch(&writer_ty, other)),
        },
    )
}

fn write_empty(buf: &mut chainrlp_core::EncodeBuffer, list_like: bool) {
    if list_like {
        buf.write_empty_list();
    } else {
        buf.write_empty_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{bytes_strategies, uint_strategies};
    use chainrlp_core::{ModifierSet, Primitive, SequenceType, TypeKey, TypeMetadata, TypeRef};

    fn handle(ty: TypeRef, modifiers: ModifierSet, strategies: Strategies) -> MetadataHandle {
        let meta = TypeMetadata::placeholder(TypeKey::new(&ty, modifiers));
        meta.complete(strategies);
        meta
    }

    fn uint_handle() -> MetadataHandle {
        handle(Primitive::uint(), ModifierSet::NONE, uint_strategies("uint".into()))
    }

    fn hx(s: &str) -> Vec<u8> {
        hex::decode(s).unwrap()
    }

    #[test]
    fn sequence_roundtrip() {
        let seq = handle(
            SequenceType::of(Primitive::uint()),
            ModifierSet::NONE,
            sequence_strategies(uint_handle()),
        );
        let v = Value::List(vec![Value::Uint(1), Value::Uint(2), Value::Uint(1024)]);
        let bytes = seq.encode_to_vec(&v).unwrap();
        assert_eq!(hex::encode(&bytes), "c50102820400");
        assert_eq!(seq.decode_bytes(&bytes).unwrap(), v);
        assert_eq!(seq.decode_bytes(&hx("c0")).unwrap(), Value::List(vec![]));
    }

    #[test]
    fn composite_with_tail() {
        let tail = handle(
            SequenceType::of(Primitive::uint()),
            ModifierSet::TAIL,
            tail_strategies(uint_handle()),
        );
        let fields = vec![
            FieldDescriptor {
                index: 0,
                name: "Head".into(),
                metadata: uint_handle(),
            },
            FieldDescriptor {
                index: 1,
                name: "Rest".into(),
                metadata: tail,
            },
        ];
        let st = composite_strategies("tests::Tail".into(), fields);
        let meta = handle(Primitive::bytes(), ModifierSet::NONE, st);

        let v = meta.decode_bytes(&hx("c3010203")).unwrap();
        assert_eq!(
            v,
            Value::Struct(vec![
                Value::Uint(1),
                Value::List(vec![Value::Uint(2), Value::Uint(3)])
            ])
        );
        assert_eq!(hex::encode(meta.encode_to_vec(&v).unwrap()), "c3010203");

        // the tail may be empty
        let v = meta.decode_bytes(&hx("c101")).unwrap();
        assert_eq!(v, Value::Struct(vec![Value::Uint(1), Value::List(vec![])]));

        // but the head may not
        assert!(matches!(
            meta.decode_bytes(&hx("c0")),
            Err(CodecError::TooFewElements { .. })
        ));
    }

    #[test]
    fn composite_element_count_checks() {
        let fields = vec![FieldDescriptor {
            index: 0,
            name: "A".into(),
            metadata: uint_handle(),
        }];
        let meta = handle(
            Primitive::bytes(),
            ModifierSet::NONE,
            composite_strategies("tests::One".into(), fields),
        );
        assert!(matches!(
            meta.decode_bytes(&hx("c20102")),
            Err(CodecError::TooManyElements { .. })
        ));
        assert!(matches!(
            meta.decode_bytes(&hx("c0")),
            Err(CodecError::TooFewElements { .. })
        ));
        assert!(matches!(
            meta.encode_to_vec(&Value::Struct(vec![])),
            Err(CodecError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn nilable_wrapper() {
        let st = nilable_strategies(bytes_strategies(), false);
        let meta = handle(Primitive::bytes(), ModifierSet::NILABLE, st);
        assert_eq!(meta.decode_bytes(&hx("80")).unwrap(), Value::Nil);
        assert_eq!(meta.decode_bytes(&hx("c0")).unwrap(), Value::Nil);
        assert_eq!(meta.decode_bytes(&hx("00")).unwrap(), Value::Bytes(vec![0]));
        assert_eq!(meta.encode_to_vec(&Value::Nil).unwrap(), hx("80"));
    }

    #[test]
    fn optional_without_nil_decodes_empty_as_element() {
        let st = optional_strategies(uint_handle(), false);
        let meta = handle(Primitive::uint(), ModifierSet::NONE, st);
        assert_eq!(meta.decode_bytes(&hx("80")).unwrap(), Value::Uint(0));
        assert_eq!(meta.encode_to_vec(&Value::Nil).unwrap(), hx("80"));
        assert_eq!(meta.encode_to_vec(&Value::Uint(5)).unwrap(), hx("05"));
    }
}
