//! Plan explain command.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use comfy_table::{Cell, Color};
use quarry_core::execution::ExplainRow;
use quarry_engine::PlanCompiler;
use serde::Serialize;

use crate::OutputFormat;
use crate::output::{self, Format};
use crate::workload::Workload;

/// Explain command switches.
pub struct Options {
    /// Force push-down off regardless of the workload config.
    pub no_pushdown: bool,
    /// Include the capability query log in the output.
    pub trace_capabilities: bool,
}

/// One capability query, as printed.
#[derive(Serialize)]
struct CapabilityQueryOutput {
    req_type: String,
    sub_type: String,
    supported: bool,
}

/// Explain output.
#[derive(Serialize)]
struct ExplainOutput {
    plan_height: usize,
    executor_count: usize,
    executors: Vec<ExplainRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    capability_queries: Option<Vec<CapabilityQueryOutput>>,
}

/// Run the explain command.
pub fn run(path: &Path, options: Options, format: OutputFormat, quiet: bool) -> Result<()> {
    let workload = Workload::load(path)?;
    let mut config = workload.config.clone();
    if options.no_pushdown {
        config = config.with_pushdown(false);
    }

    let client = Arc::new(workload.client());
    let compiler = PlanCompiler::new(workload.context(Arc::clone(&client), config));
    let exec = compiler.compile(&workload.plan)?;
    tracing::info!(
        plan = workload.plan.name(),
        executors = exec.node_count(),
        "plan compiled"
    );

    let output = ExplainOutput {
        plan_height: workload.plan.height(),
        executor_count: exec.node_count(),
        executors: exec.explain(),
        capability_queries: options.trace_capabilities.then(|| {
            client
                .queries()
                .into_iter()
                .map(|q| CapabilityQueryOutput {
                    req_type: format!("{:?}", q.req_type),
                    sub_type: q.sub_type.to_string(),
                    supported: q.supported,
                })
                .collect()
        }),
    };

    match Format::from(format) {
        Format::Json => output::print_json(&output, quiet)?,
        Format::Table => {
            let mut table = output::create_table();
            output::add_header(&mut table, &["Executor", "Details", "Schema"]);
            for row in &output.executors {
                table.add_row(vec![
                    Cell::new(format!("{}{}", "  ".repeat(row.depth), row.name)).fg(Color::Green),
                    Cell::new(&row.detail),
                    Cell::new(&row.schema),
                ]);
            }
            output::print_table(&table, quiet);

            if let Some(queries) = &output.capability_queries {
                let mut table = output::create_table();
                output::add_header(&mut table, &["Request", "Sub-type", "Supported"]);
                for q in queries {
                    table.add_row(vec![
                        Cell::new(&q.req_type),
                        Cell::new(&q.sub_type),
                        Cell::new(q.supported),
                    ]);
                }
                output::print_table(&table, quiet);
            }
            output::status(
                &format!(
                    "{} executors from a plan of height {}",
                    output.executor_count, output.plan_height
                ),
                quiet,
            );
        }
    }

    Ok(())
}
