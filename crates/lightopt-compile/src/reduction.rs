//! Per-invocation reduction state and gate-count reports.

use std::collections::BTreeMap;

use lightopt_ir::CircuitDag;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::CompileResult;
use crate::scanner::RewriteBatch;

/// State of one reduction pass invocation.
///
/// Snapshots the gate counts when created, holds the pending rewrites of the
/// current scan and turns into a [`ReductionReport`] when finished.
pub struct Reduction<'a> {
    pass: &'static str,
    dag: &'a mut CircuitDag,
    initial_counts: BTreeMap<String, usize>,
    batch: RewriteBatch,
}

impl<'a> Reduction<'a> {
    /// Start a reduction over `dag`.
    pub fn new(pass: &'static str, dag: &'a mut CircuitDag) -> Self {
        let initial_counts = dag.count_ops();
        Self {
            pass,
            dag,
            initial_counts,
            batch: RewriteBatch::new(),
        }
    }

    /// The graph being reduced.
    pub fn dag(&self) -> &CircuitDag {
        &*self.dag
    }

    /// Read access to the graph together with the pending batch.
    pub fn parts(&mut self) -> (&CircuitDag, &mut RewriteBatch) {
        (&*self.dag, &mut self.batch)
    }

    /// Apply the pending batch to the graph.
    pub fn commit(&mut self) -> CompileResult<()> {
        self.batch.apply(self.dag)
    }

    /// Apply anything still pending and report the gate-count changes.
    pub fn finish(mut self) -> CompileResult<ReductionReport> {
        self.commit()?;

        let report = ReductionReport::new(self.pass, &self.initial_counts, &self.dag.count_ops());
        for line in report.summary() {
            info!("{}", line);
        }
        Ok(report)
    }
}

/// Count of one gate kind before and after a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateCountChange {
    /// Count when the pass started.
    pub before: usize,
    /// Count when the pass finished.
    pub after: usize,
}

impl GateCountChange {
    /// Number of gates removed; zero if the count grew.
    pub fn removed(&self) -> usize {
        self.before.saturating_sub(self.after)
    }
}

/// Gate-count snapshot of one pass invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReductionReport {
    pass: String,
    counts: BTreeMap<String, GateCountChange>,
}

impl ReductionReport {
    /// Build a report from the counts before and after a pass.
    pub fn new(
        pass: impl Into<String>,
        before: &BTreeMap<String, usize>,
        after: &BTreeMap<String, usize>,
    ) -> Self {
        let mut counts = BTreeMap::new();
        for name in before.keys().chain(after.keys()) {
            let change = GateCountChange {
                before: before.get(name).copied().unwrap_or(0),
                after: after.get(name).copied().unwrap_or(0),
            };
            counts.insert(name.clone(), change);
        }
        Self {
            pass: pass.into(),
            counts,
        }
    }

    /// Name of the pass that produced this report.
    pub fn pass(&self) -> &str {
        &self.pass
    }

    /// Per-gate counts, keyed by gate name.
    pub fn counts(&self) -> &BTreeMap<String, GateCountChange> {
        &self.counts
    }

    /// Counts for one gate name.
    pub fn get(&self, gate: &str) -> Option<GateCountChange> {
        self.counts.get(gate).copied()
    }

    /// Total number of gates removed across all kinds.
    pub fn total_removed(&self) -> usize {
        self.counts.values().map(GateCountChange::removed).sum()
    }

    /// Whether the pass changed no gate count.
    pub fn is_unchanged(&self) -> bool {
        self.counts.values().all(|c| c.before == c.after)
    }

    /// Human-readable lines for every gate kind the pass reduced.
    pub fn summary(&self) -> Vec<String> {
        self.counts
            .iter()
            .filter(|(_, c)| c.before > c.after)
            .map(|(name, c)| {
                if c.after == 0 {
                    format!("Successfully eliminated all {} {} gates.", c.before, name)
                } else {
                    format!(
                        "Reduced the number of {name} gates by {} \
                         (Before reduction: {}, After reduction: {})",
                        c.removed(),
                        c.before,
                        c.after
                    )
                }
            })
            .collect()
    }
}

/// Reports of every pass run by a pass manager, in execution order.
///
/// Stored in the [`PropertySet`](crate::PropertySet) by the reduction passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReductionLog {
    reports: Vec<ReductionReport>,
}

impl ReductionLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a report.
    pub fn push(&mut self, report: ReductionReport) {
        self.reports.push(report);
    }

    /// All reports in execution order.
    pub fn reports(&self) -> &[ReductionReport] {
        &self.reports
    }

    /// Gates removed over the whole run.
    pub fn total_removed(&self) -> usize {
        self.reports.iter().map(|r| r.total_removed()).sum()
    }

    /// Serialize the log as pretty-printed JSON.
    pub fn to_json(&self) -> CompileResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightopt_ir::{Circuit, QubitId};

    fn counts(pairs: &[(&str, usize)]) -> BTreeMap<String, usize> {
        pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_summary_lines() {
        let report = ReductionReport::new(
            "hadamard_reduction",
            &counts(&[("h", 6), ("cx", 2), ("s", 1)]),
            &counts(&[("h", 2), ("cx", 2), ("sdg", 2)]),
        );

        assert_eq!(
            report.summary(),
            vec![
                "Reduced the number of h gates by 4 (Before reduction: 6, After reduction: 2)"
                    .to_string(),
                "Successfully eliminated all 1 s gates.".to_string(),
            ]
        );
        let sdg = report.get("sdg").unwrap();
        assert_eq!((sdg.before, sdg.after), (0, 2));
        assert_eq!(report.total_removed(), 5);
    }

    #[test]
    fn test_unchanged_report_has_no_summary() {
        let report = ReductionReport::new(
            "cx_reduction",
            &counts(&[("cx", 3)]),
            &counts(&[("cx", 3)]),
        );
        assert!(report.is_unchanged());
        assert!(report.summary().is_empty());
    }

    #[test]
    fn test_finish_applies_pending_batch() {
        let mut circuit = Circuit::with_size("test", 1);
        circuit.h(QubitId(0)).unwrap().h(QubitId(0)).unwrap();
        let mut dag = circuit.into_dag();

        let mut reduction = Reduction::new("test", &mut dag);
        let (graph, batch) = reduction.parts();
        for node in graph.nodes_on_wire(QubitId(0), true).unwrap() {
            batch.delete(node);
        }
        let report = reduction.finish().unwrap();

        let h = report.get("h").unwrap();
        assert_eq!((h.before, h.after), (2, 0));
        assert_eq!(dag.num_ops(), 0);
    }

    #[test]
    fn test_log_to_json() {
        let mut log = ReductionLog::new();
        log.push(ReductionReport::new(
            "rz_reduction",
            &counts(&[("rz", 2)]),
            &counts(&[("rz", 1)]),
        ));

        let json = log.to_json().unwrap();
        assert!(json.contains("\"rz_reduction\""));
        let parsed: ReductionLog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, log);
        assert_eq!(parsed.total_removed(), 1);
    }
}
