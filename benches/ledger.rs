//! Benchmarks for the like path
//!
//! ensure_stock + record_like_if_absent + count_likes against both stores.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use stock_price_checker::core::{LikeLedger, StockRegistry, Symbol};
use stock_price_checker::storage::{LikeStore, MemoryStore, SqliteStore};

fn like_path<S: LikeStore>(store: Arc<S>, c: &mut Criterion, name: &str) {
    let registry = StockRegistry::new(store.clone());
    let ledger = LikeLedger::new(store.clone());
    let symbol = Symbol::parse("GOOG").unwrap();
    let identity = store.upsert_identity("bench-caller").unwrap();

    c.bench_function(name, |b| {
        b.iter(|| {
            let stock = registry.ensure_stock(black_box(&symbol)).unwrap();
            ledger.record_like_if_absent(identity.id, stock.id).unwrap();
            ledger.count_likes(stock.id).unwrap()
        })
    });
}

fn bench_memory(c: &mut Criterion) {
    like_path(Arc::new(MemoryStore::new()), c, "like_path_memory");
}

fn bench_sqlite(c: &mut Criterion) {
    like_path(Arc::new(SqliteStore::open_in_memory().unwrap()), c, "like_path_sqlite");
}

criterion_group!(benches, bench_memory, bench_sqlite);
criterion_main!(benches);
