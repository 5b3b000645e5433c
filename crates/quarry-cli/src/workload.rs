//! Workload files.
//!
//! A workload bundles what the compiler needs from its environment:
//!
//! ```json
//! {
//!   "catalog": [ { "id": 1, "name": "t", "db_name": "test", "columns": [...] } ],
//!   "capabilities": { "requests": [ { "req_type": "Select", "sub_type": "Basic" } ], "all_exprs": true },
//!   "config": { "enable_pushdown": true },
//!   "plan": { "node": "table_scan", ... }
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use quarry_core::meta::TableInfo;
use quarry_core::storage::{MemoryClient, MemoryTransaction, RequestSubType, RequestType};
use quarry_core::wire::ExprType;
use quarry_engine::{CompileContext, Config, MemoryCatalog, PlanNode};
use serde::Deserialize;

/// A parsed workload file.
#[derive(Debug, Deserialize)]
pub struct Workload {
    /// Tables known to the catalog.
    pub catalog: Vec<TableInfo>,
    /// What the storage client supports.
    #[serde(default)]
    pub capabilities: Capabilities,
    /// Compiler config overrides.
    #[serde(default)]
    pub config: Config,
    /// Start timestamp of the compiling transaction.
    #[serde(default = "default_start_ts")]
    pub start_ts: u64,
    /// The plan to compile.
    pub plan: PlanNode,
}

/// Storage capability profile.
#[derive(Debug, Default, Deserialize)]
pub struct Capabilities {
    /// Supported request kinds.
    #[serde(default)]
    pub requests: Vec<RequestCapability>,
    /// Supported expression types in select requests.
    #[serde(default)]
    pub exprs: Vec<ExprType>,
    /// Whether every expression type is supported.
    #[serde(default)]
    pub all_exprs: bool,
}

/// One supported request kind.
#[derive(Debug, Deserialize)]
pub struct RequestCapability {
    /// Request kind.
    pub req_type: RequestType,
    /// Refinement.
    pub sub_type: RequestSubType,
}

fn default_start_ts() -> u64 {
    1
}

impl Workload {
    /// Reads and parses a workload file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read workload {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse workload {}", path.display()))
    }

    /// Builds the storage client described by the capability profile.
    pub fn client(&self) -> MemoryClient {
        let caps = &self.capabilities;
        let mut client = caps
            .requests
            .iter()
            .fold(MemoryClient::new(), |client, req| {
                client.with_request(req.req_type, req.sub_type)
            });
        client = caps.exprs.iter().fold(client, |client, &tp| client.with_expr(tp));
        if caps.all_exprs {
            client = client.with_all_exprs();
        }
        client
    }

    /// Builds the catalog.
    pub fn memory_catalog(&self) -> MemoryCatalog {
        self.catalog.iter().cloned().collect()
    }

    /// Builds a compile context over `client`.
    pub fn context(&self, client: Arc<MemoryClient>, config: Config) -> CompileContext {
        let txn = MemoryTransaction::new(self.start_ts, client);
        CompileContext::new(Arc::new(self.memory_catalog()))
            .with_transaction(Arc::new(txn))
            .with_config(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use quarry_core::storage::StorageClient;

    const WORKLOAD: &str = r#"{
        "catalog": [
            {
                "id": 1,
                "name": "t",
                "db_name": "test",
                "columns": [
                    {"id": 1, "name": "a", "ty": "Int64", "offset": 0}
                ]
            }
        ],
        "capabilities": {
            "requests": [
                {"req_type": "Select", "sub_type": "Basic"},
                {"req_type": "Select", "sub_type": "Desc"}
            ],
            "exprs": ["ColumnRef", "Int64", "Gt"]
        },
        "config": {"max_plan_depth": 8},
        "plan": {
            "node": "selection",
            "conditions": [
                {"ScalarFunction": {
                    "func": "Gt",
                    "args": [
                        {"Column": {"name": "a", "ty": "Int64"}},
                        {"Constant": {"Int64": 3}}
                    ],
                    "ret_type": "Bool"
                }}
            ],
            "schema": [{"name": "a", "ty": "Int64"}],
            "input": {
                "node": "table_scan",
                "table_id": 1,
                "db_name": "test",
                "schema": [{"name": "a", "ty": "Int64"}]
            }
        }
    }"#;

    #[test]
    fn test_load_workload() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(WORKLOAD.as_bytes()).unwrap();

        let workload = Workload::load(file.path()).unwrap();
        assert_eq!(workload.catalog.len(), 1);
        assert_eq!(workload.start_ts, 1);
        assert_eq!(workload.config.max_plan_depth, 8);
        assert!(workload.config.enable_pushdown);

        let client = workload.client();
        assert!(client.supports_request_type(RequestType::Select, RequestSubType::Desc));
        assert!(client.supports_request_type(
            RequestType::Select,
            RequestSubType::Expr(ExprType::Gt)
        ));
        assert!(!client.supports_request_type(
            RequestType::Select,
            RequestSubType::Expr(ExprType::And)
        ));
    }

    #[test]
    fn test_demo_workload_compiles() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/join_workload.json");
        let workload = Workload::load(&path).unwrap();
        let client = Arc::new(workload.client());
        let ctx = workload.context(Arc::clone(&client), workload.config.clone());

        let exec = quarry_engine::PlanCompiler::new(ctx)
            .compile(&workload.plan)
            .unwrap();
        let names: Vec<_> = exec.explain().iter().map(|row| row.name).collect();
        assert_eq!(names, vec!["HashJoin", "TableScan", "Selection", "TableScan"]);
        assert!(
            client
                .queries()
                .iter()
                .all(|q| q.req_type == RequestType::Select)
        );
    }

    #[test]
    fn test_load_reports_path() {
        let err = Workload::load(Path::new("/nonexistent/workload.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/workload.json"));
    }
}
