//! Predicate push-down negotiation.
//!
//! Splits a selection's conditions into the part the storage layer will
//! evaluate (as one wire expression) and the part that stays local. A filter
//! already pushed into the scan counts as pushed conditions, so stacked
//! selections go through the same AND capability check.

use quarry_common::utils::error::{Error, Result};
use quarry_core::expression::{Expression, compose_balanced};
use quarry_core::storage::{RequestSubType, RequestType};
use quarry_core::wire::{ExprType, ScanTarget, WireCompiler, WireExpr};
use tracing::debug;

use crate::context::CompileContext;

/// Outcome of a push-down negotiation.
#[derive(Debug, Clone, PartialEq)]
pub struct Pushdown {
    /// Balanced AND of the scan's existing filter and every newly pushed
    /// condition. `None` when no new condition was pushed.
    pub pushed: Option<WireExpr>,
    /// Conditions left for local evaluation, in input order.
    pub remaining: Vec<Expression>,
}

/// Negotiates push-down with the transaction's storage client.
pub struct PushdownTranslator<'a> {
    ctx: &'a CompileContext,
    wire: &'a dyn WireCompiler,
}

impl<'a> PushdownTranslator<'a> {
    /// Creates a translator.
    pub fn new(ctx: &'a CompileContext, wire: &'a dyn WireCompiler) -> Self {
        Self { ctx, wire }
    }

    /// Splits `conditions` into pushed and remaining parts for a scan of
    /// `target` whose storage-side filter is currently `existing`.
    ///
    /// A condition is pushed when the wire compiler can convert it. If the
    /// result would hold more than one condition (counting those already in
    /// `existing`) but the storage layer cannot combine expressions with AND,
    /// only the first converted condition is pushed, and only onto a scan
    /// with no filter yet.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotStarted` without an active transaction,
    /// and propagates wire compiler errors.
    pub fn translate(
        &self,
        conditions: &[Expression],
        target: ScanTarget<'_>,
        existing: Option<&WireExpr>,
    ) -> Result<Pushdown> {
        let client = self.ctx.client()?;
        let conversion = self.wire.compile(conditions, client.as_ref(), target)?;
        if conversion.converted.len() != conditions.len() {
            return Err(Error::Internal(format!(
                "wire compiler returned {} results for {} conditions",
                conversion.converted.len(),
                conditions.len()
            )));
        }

        let mut pushed: Vec<WireExpr> = existing
            .map(|filter| filter.conjuncts().into_iter().cloned().collect())
            .unwrap_or_default();
        let already_pushed = pushed.len();

        let and_supported = already_pushed + conversion.pushable_count() > 1
            && client.supports_request_type(
                RequestType::Select,
                RequestSubType::Expr(ExprType::And),
            );

        let mut remaining = Vec::new();
        for (cond, wire) in conditions.iter().zip(conversion.converted) {
            match wire {
                Some(wire) if pushed.is_empty() || and_supported => pushed.push(wire),
                _ => remaining.push(cond.clone()),
            }
        }
        let newly_pushed = pushed.len() - already_pushed;

        debug!(
            table = %target.table.qualified_name(),
            alias = target.alias,
            pushed = newly_pushed,
            remaining = remaining.len(),
            "push-down negotiated"
        );

        let pushed = if newly_pushed == 0 {
            None
        } else {
            compose_balanced(&pushed, &mut WireExpr::and)
        };
        Ok(Pushdown { pushed, remaining })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::MemoryCatalog;
    use quarry_common::TransactionError;
    use quarry_common::types::{LogicalType, TableId};
    use quarry_core::expression::FuncKind;
    use quarry_core::meta::TableInfo;
    use quarry_core::storage::{MemoryClient, MemoryTransaction, StorageClient};
    use quarry_core::wire::{ExprToWire, WireConversion};

    fn table() -> TableInfo {
        TableInfo::new(TableId::new(1), "test", "t")
            .with_column("a", LogicalType::Int64)
            .with_column("b", LogicalType::Int64)
    }

    fn ctx(client: MemoryClient) -> CompileContext {
        CompileContext::new(Arc::new(MemoryCatalog::new()))
            .with_transaction(Arc::new(MemoryTransaction::new(1, Arc::new(client))))
    }

    fn gt(col: &str, v: i64) -> Expression {
        Expression::binary(
            FuncKind::Gt,
            Expression::column(col, 0, LogicalType::Int64),
            Expression::constant(v),
        )
    }

    fn rand_cond() -> Expression {
        Expression::binary(
            FuncKind::Lt,
            Expression::function(FuncKind::Rand, vec![], LogicalType::Float64),
            Expression::constant(0.5),
        )
    }

    #[test]
    fn test_mixed_conditions() {
        let ctx = ctx(MemoryClient::full());
        let translator = PushdownTranslator::new(&ctx, &ExprToWire);
        let conds = vec![gt("a", 1), rand_cond(), gt("b", 2)];

        let out = translator.translate(&conds, ScanTarget::new(&table()), None).unwrap();
        assert_eq!(out.remaining, vec![rand_cond()]);
        let pushed = out.pushed.unwrap();
        assert_eq!(pushed.tp, ExprType::And);
        assert_eq!(pushed.children[0].tp, ExprType::Gt);
        assert_eq!(pushed.children[1].tp, ExprType::Gt);
    }

    #[test]
    fn test_nothing_pushable() {
        let ctx = ctx(MemoryClient::new());
        let translator = PushdownTranslator::new(&ctx, &ExprToWire);
        let conds = vec![gt("a", 1), gt("b", 2)];

        let out = translator.translate(&conds, ScanTarget::new(&table()), None).unwrap();
        assert!(out.pushed.is_none());
        assert_eq!(out.remaining, conds);
    }

    #[test]
    fn test_without_and_only_first_is_pushed() {
        let client = MemoryClient::new()
            .with_expr(ExprType::ColumnRef)
            .with_expr(ExprType::Int64)
            .with_expr(ExprType::Gt);
        let ctx = ctx(client);
        let translator = PushdownTranslator::new(&ctx, &ExprToWire);
        let conds = vec![rand_cond(), gt("a", 1), gt("b", 2), gt("a", 3)];

        let out = translator.translate(&conds, ScanTarget::new(&table()), None).unwrap();
        assert_eq!(out.pushed.unwrap().tp, ExprType::Gt);
        assert_eq!(out.remaining, vec![rand_cond(), gt("b", 2), gt("a", 3)]);
    }

    #[test]
    fn test_balanced_wire_tree() {
        let ctx = ctx(MemoryClient::full());
        let translator = PushdownTranslator::new(&ctx, &ExprToWire);
        let conds: Vec<Expression> = (0..8).map(|i| gt("a", i)).collect();

        let pushed = translator.translate(&conds, ScanTarget::new(&table()), None).unwrap().pushed.unwrap();
        assert_eq!(pushed.and_depth(), 3);
        let bytes = pushed.encode_to_bytes().unwrap();
        assert_eq!(WireExpr::decode(&bytes).unwrap(), pushed);
    }

    #[test]
    fn test_existing_filter_is_rebalanced() {
        let ctx = ctx(MemoryClient::full());
        let translator = PushdownTranslator::new(&ctx, &ExprToWire);
        let table = table();
        let first = translator
            .translate(&[gt("a", 1), gt("a", 2)], ScanTarget::new(&table), None)
            .unwrap()
            .pushed
            .unwrap();
        let second = translator
            .translate(&[gt("b", 3), gt("b", 4)], ScanTarget::new(&table), Some(&first))
            .unwrap()
            .pushed
            .unwrap();

        assert_eq!(second.and_depth(), 2);
        let all = translator
            .translate(
                &[gt("a", 1), gt("a", 2), gt("b", 3), gt("b", 4)],
                ScanTarget::new(&table),
                None,
            )
            .unwrap()
            .pushed
            .unwrap();
        assert_eq!(second, all);
    }

    #[test]
    fn test_existing_filter_without_and_support() {
        let client = MemoryClient::new()
            .with_expr(ExprType::ColumnRef)
            .with_expr(ExprType::Int64)
            .with_expr(ExprType::Gt);
        let ctx = ctx(client);
        let translator = PushdownTranslator::new(&ctx, &ExprToWire);
        let table = table();
        let existing = translator
            .translate(&[gt("a", 1)], ScanTarget::new(&table), None)
            .unwrap()
            .pushed
            .unwrap();

        let out = translator
            .translate(&[gt("b", 2)], ScanTarget::new(&table), Some(&existing))
            .unwrap();
        assert!(out.pushed.is_none());
        assert_eq!(out.remaining, vec![gt("b", 2)]);
    }

    #[test]
    fn test_missing_transaction() {
        let ctx = CompileContext::new(Arc::new(MemoryCatalog::new()));
        let translator = PushdownTranslator::new(&ctx, &ExprToWire);
        let err = translator.translate(&[gt("a", 1)], ScanTarget::new(&table()), None).unwrap_err();
        assert!(matches!(
            err,
            Error::Transaction(TransactionError::NotStarted)
        ));
    }

    struct Failing;

    impl WireCompiler for Failing {
        fn compile(
            &self,
            _conditions: &[Expression],
            _client: &dyn StorageClient,
            _target: ScanTarget<'_>,
        ) -> Result<WireConversion> {
            Err(Error::Codec("boom".into()))
        }
    }

    #[test]
    fn test_wire_compiler_error_propagates() {
        let ctx = ctx(MemoryClient::full());
        let translator = PushdownTranslator::new(&ctx, &Failing);
        let err = translator.translate(&[gt("a", 1)], ScanTarget::new(&table()), None).unwrap_err();
        assert!(matches!(err, Error::Codec(_)));
    }
}
