//! Type registry lookup benchmarks.
//!
//! # Running
//! ```bash
//! cargo bench --package chainrlp-registry
//! ```

use chainrlp_core::{CompositeType, FieldDecl, ModifierSet, Primitive, SequenceType, TypeRef, Value};
use chainrlp_registry::TypeRegistry;
use chainrlp_rlp::RlpStrategyBuilder;
use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

fn header() -> TypeRef {
    CompositeType::new("bench::Header")
        .field(FieldDecl::new("ParentHash", Primitive::bytes()))
        .field(FieldDecl::new("Number", Primitive::uint()))
        .field(FieldDecl::new("GasLimit", Primitive::uint()))
        .field(FieldDecl::new("Extra", Primitive::bytes()).annotated("nil"))
        .field(FieldDecl::deferred("Uncles", || SequenceType::of(header())))
        .build()
}

fn bench_warm_lookup(c: &mut Criterion) {
    let reg = TypeRegistry::new(Arc::new(RlpStrategyBuilder));
    let ty = header();
    reg.resolve(&ty, ModifierSet::NONE).expect("warm up");

    c.bench_function("resolve_warm", |b| {
        b.iter(|| reg.resolve(&ty, ModifierSet::NONE).expect("cached"))
    });
}

fn bench_cold_lookup(c: &mut Criterion) {
    let ty = header();
    c.bench_function("resolve_cold", |b| {
        b.iter(|| {
            let reg = TypeRegistry::new(Arc::new(RlpStrategyBuilder));
            reg.resolve(&ty, ModifierSet::NONE).expect("build")
        })
    });
}

fn bench_encode(c: &mut Criterion) {
    let reg = TypeRegistry::new(Arc::new(RlpStrategyBuilder));
    let meta = reg.resolve(&header(), ModifierSet::NONE).expect("build");
    let value = Value::Struct(vec![
        Value::Bytes(vec![0x11; 32]),
        Value::Uint(19_000_000),
        Value::Uint(30_000_000),
        Value::Nil,
        Value::List(vec![]),
    ]);
    let encoded = meta.encode_to_vec(&value).expect("encode");

    c.bench_function("encode_header", |b| b.iter(|| meta.encode_to_vec(&value)));
    c.bench_function("decode_header", |b| b.iter(|| meta.decode_bytes(&encoded)));
}

criterion_group!(benches, bench_warm_lookup, bench_cold_lookup, bench_encode);
criterion_main!(benches);
