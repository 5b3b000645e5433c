//! Plan compilation benchmarks.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use quarry_common::types::{LogicalType, TableId};
use quarry_core::expression::{ColumnRef, Expression, FuncKind};
use quarry_core::meta::TableInfo;
use quarry_core::schema::{ColumnInfo, Schema};
use quarry_core::storage::{MemoryClient, MemoryTransaction};
use quarry_engine::query::plan::{JoinPlan, SelectionPlan, TableScanPlan};
use quarry_engine::{CompileContext, JoinType, MemoryCatalog, PlanCompiler, PlanNode, compose_condition};

const TABLES: u64 = 16;

/// Returns the compiler and its client, whose query log the benches keep clearing.
fn compiler() -> (PlanCompiler, Arc<MemoryClient>) {
    let catalog: MemoryCatalog = (0..TABLES)
        .map(|i| {
            TableInfo::new(TableId::new(i), "bench", format!("t{i}"))
                .with_column("k", LogicalType::Int64)
                .with_column("v", LogicalType::Int64)
        })
        .collect();
    let client = Arc::new(MemoryClient::full());
    let txn = MemoryTransaction::new(1, client.clone());
    let ctx = CompileContext::new(Arc::new(catalog)).with_transaction(Arc::new(txn));
    (PlanCompiler::new(ctx), client)
}

fn table_schema(i: u64) -> Schema {
    Schema::new(vec![
        ColumnInfo::new("k", LogicalType::Int64).with_table(format!("t{i}")),
        ColumnInfo::new("v", LogicalType::Int64).with_table(format!("t{i}")),
    ])
}

fn key(i: u64) -> Expression {
    Expression::Column(ColumnRef::new("k", 0, LogicalType::Int64).with_qualifier(format!("t{i}")))
}

fn filtered_scan(i: u64, conditions: usize) -> PlanNode {
    let scan = PlanNode::TableScan(TableScanPlan {
        table_id: TableId::new(i),
        db_name: "bench".into(),
        table_as_name: None,
        columns: Vec::new(),
        ranges: Vec::new(),
        schema: table_schema(i),
    });
    let conditions = (0..conditions as i64)
        .map(|c| {
            Expression::binary(
                FuncKind::Gt,
                Expression::column("v", 1, LogicalType::Int64),
                Expression::constant(c),
            )
        })
        .collect();
    PlanNode::Selection(SelectionPlan {
        input: Box::new(scan),
        conditions,
        schema: table_schema(i),
    })
}

/// Left-deep chain of inner joins over every table.
fn join_chain() -> PlanNode {
    let mut plan = filtered_scan(0, 4);
    let mut schema = table_schema(0);
    for i in 1..TABLES {
        schema = schema.merge(&table_schema(i));
        plan = PlanNode::Join(JoinPlan {
            left: Box::new(plan),
            right: Box::new(filtered_scan(i, 4)),
            join_type: JoinType::Inner,
            equal_conditions: vec![Expression::eq(key(i - 1), key(i))],
            left_conditions: Vec::new(),
            right_conditions: Vec::new(),
            other_conditions: Vec::new(),
            schema: schema.clone(),
        });
    }
    plan
}

fn compose_benchmark(c: &mut Criterion) {
    let conditions: Vec<Expression> = (0..1024)
        .map(|i| Expression::binary(FuncKind::Lt, key(0), Expression::constant(i)))
        .collect();
    c.bench_function("compose_condition_1024", |b| {
        b.iter(|| black_box(compose_condition(black_box(&conditions))))
    });
}

fn pushdown_benchmark(c: &mut Criterion) {
    let (compiler, client) = compiler();
    let plan = filtered_scan(0, 64);
    c.bench_function("compile_selection_64_pushed", |b| {
        b.iter(|| {
            client.clear_queries();
            black_box(compiler.compile(black_box(&plan)))
        })
    });
}

fn join_chain_benchmark(c: &mut Criterion) {
    let (compiler, client) = compiler();
    let plan = join_chain();
    c.bench_function("compile_join_chain_16", |b| {
        b.iter(|| {
            client.clear_queries();
            black_box(compiler.compile(black_box(&plan)))
        })
    });
}

criterion_group!(
    benches,
    compose_benchmark,
    pushdown_benchmark,
    join_chain_benchmark
);
criterion_main!(benches);
