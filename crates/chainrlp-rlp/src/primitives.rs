//! Strategies for scalar kinds.

use chainrlp_core::{CodecError, Strategies, Value};

pub(crate) fn mismatch(expected: &str, got: &Value) -> CodecError {
    CodecError::TypeMismatch {
        expected: expected.to_string(),
        got: got.kind_name().to_string(),
    }
}

/// `false` is the empty string, `true` is `0x01`.
pub fn bool_strategies(ty: String) -> Strategies {
    Strategies::new(
        move |s| match s.bytes()? {
            [] => Ok(Value::Bool(false)),
            [1] => Ok(Value::Bool(true)),
            _ => Err(CodecError::InvalidBool { ty: ty.clone() }),
        },
        |v, buf| match v {
            Value::Bool(b) => {
                buf.write_bool(*b);
                Ok(())
            }
            other => Err(mismatch("bool", other)),
        },
    )
}

/// Minimal big-endian unsigned integers up to 128 bits.
pub fn uint_strategies(ty: String) -> Strategies {
    Strategies::new(
        move |s| {
            let raw = s.bytes()?;
            if raw.len() > 16 {
                return Err(CodecError::UintOverflow { ty: ty.clone() });
            }
            if raw.first() == Some(&0) {
                return Err(CodecError::LeadingZero { ty: ty.clone() });
            }
            Ok(Value::Uint(
                raw.iter().fold(0u128, |acc, b| (acc << 8) | *b as u128),
            ))
        },
        |v, buf| match v {
            Value::Uint(n) => {
                buf.write_uint(*n);
                Ok(())
            }
            other => Err(mismatch("uint", other)),
        },
    )
}

pub fn bytes_strategies() -> Strategies {
    Strategies::new(
        |s| Ok(Value::Bytes(s.bytes()?.to_vec())),
        |v, buf| match v {
            Value::Bytes(b) => {
                buf.write_bytes(b);
                Ok(())
            }
            other => Err(mismatch("bytes", other)),
        },
    )
}

/// Like bytes, but the content must be UTF-8.
pub fn string_strategies(ty: String) -> Strategies {
    Strategies::new(
        move |s| {
            let raw = s.bytes()?;
            let text = std::str::from_utf8(raw)
                .map_err(|_| CodecError::InvalidUtf8 { ty: ty.clone() })?;
            Ok(Value::Str(text.to_string()))
        },
        |v, buf| match v {
            Value::Str(text) => {
                buf.write_bytes(text.as_bytes());
                Ok(())
            }
            other => Err(mismatch("string", other)),
        },
    )
}
