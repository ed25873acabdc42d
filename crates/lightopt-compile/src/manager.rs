//! Pass manager for orchestrating reduction runs.

use tracing::{debug, info, instrument};

use lightopt_ir::CircuitDag;

use crate::error::{CompileError, CompileResult};
use crate::pass::Pass;
use crate::passes::ReductionKind;
use crate::property::PropertySet;
use crate::unitary;

/// Manages and executes a sequence of passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
    /// How many times the whole sequence is repeated.
    rounds: usize,
    /// Run `verify_integrity` after every pass.
    verify_integrity: bool,
    /// Compare unitaries before and after every pass.
    check_equivalence: bool,
}

impl PassManager {
    /// Create a new empty pass manager running a single round.
    pub fn new() -> Self {
        Self {
            passes: vec![],
            rounds: 1,
            verify_integrity: false,
            check_equivalence: false,
        }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given DAG, repeated for the configured rounds.
    #[instrument(skip(self, dag, properties))]
    pub fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes x {} rounds on circuit with {} qubits",
            self.passes.len(),
            self.rounds,
            dag.num_qubits()
        );
        let initial_ops = dag.num_ops();

        for round in 0..self.rounds {
            for pass in &self.passes {
                if !pass.should_run(dag, properties) {
                    debug!("Skipping pass: {}", pass.name());
                    continue;
                }

                debug!("Running pass: {} (round {})", pass.name(), round + 1);
                let before = self.check_equivalence.then(|| dag.clone());
                pass.run(dag, properties)?;

                if self.verify_integrity {
                    dag.verify_integrity()?;
                }
                if let Some(before) = before {
                    if !unitary::equivalent_up_to_phase(&before, dag)? {
                        return Err(CompileError::EquivalenceViolation {
                            pass: pass.name().to_string(),
                        });
                    }
                }
                debug!("Pass {} completed, ops: {}", pass.name(), dag.num_ops());
            }
        }

        info!(
            "Pass manager completed, ops: {} -> {}",
            initial_ops,
            dag.num_ops()
        );

        Ok(())
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Number of rounds the pass sequence runs.
    pub fn rounds(&self) -> usize {
        self.rounds
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating pass managers from a reduction schedule.
pub struct PassManagerBuilder {
    schedule: Vec<ReductionKind>,
    rounds: usize,
    verify_integrity: bool,
    check_equivalence: bool,
    properties: PropertySet,
}

impl PassManagerBuilder {
    /// Default number of rounds.
    pub const DEFAULT_ROUNDS: usize = 2;

    /// Create a builder for the light optimization schedule run twice.
    pub fn new() -> Self {
        Self {
            schedule: ReductionKind::LIGHT_SCHEDULE.to_vec(),
            rounds: Self::DEFAULT_ROUNDS,
            verify_integrity: false,
            check_equivalence: false,
            properties: PropertySet::new(),
        }
    }

    /// Set how many times the schedule is repeated.
    #[must_use]
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    /// Replace the pass schedule.
    #[must_use]
    pub fn with_schedule(mut self, schedule: Vec<ReductionKind>) -> Self {
        self.schedule = schedule;
        self
    }

    /// Verify the DAG structure after every pass.
    #[must_use]
    pub fn with_integrity_check(mut self, enabled: bool) -> Self {
        self.verify_integrity = enabled;
        self
    }

    /// Check after every pass that the circuit unitary is unchanged up to
    /// global phase.
    ///
    /// Uses dense simulation and fails with
    /// [`CompileError::TooManyQubits`] on wide circuits.
    #[must_use]
    pub fn with_equivalence_check(mut self, enabled: bool) -> Self {
        self.check_equivalence = enabled;
        self
    }

    /// Set the initial properties.
    #[must_use]
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    /// Build the pass manager and return it with the properties.
    pub fn build(self) -> (PassManager, PropertySet) {
        let pm = PassManager {
            passes: self.schedule.into_iter().map(ReductionKind::pass).collect(),
            rounds: self.rounds,
            verify_integrity: self.verify_integrity,
            check_equivalence: self.check_equivalence,
        };
        (pm, self.properties)
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass::PassKind;
    use crate::reduction::ReductionLog;
    use lightopt_ir::{Circuit, QubitId, StandardGate};

    #[test]
    fn test_empty_pass_manager() {
        let pm = PassManager::new();
        assert!(pm.is_empty());
        assert_eq!(pm.len(), 0);
    }

    #[test]
    fn test_pass_manager_run() {
        let pm = PassManager::new();
        let mut props = PropertySet::new();

        let mut circuit = Circuit::with_size("test", 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        let mut dag = circuit.into_dag();
        pm.run(&mut dag, &mut props).unwrap();

        assert_eq!(dag.num_ops(), 2);
    }

    #[test]
    fn test_pass_manager_builder_defaults() {
        let (pm, _props) = PassManagerBuilder::new().build();
        assert_eq!(pm.len(), 8);
        assert_eq!(pm.rounds(), 2);
    }

    #[test]
    fn test_reports_are_logged_per_pass() {
        let (pm, mut props) = PassManagerBuilder::new()
            .with_schedule(vec![ReductionKind::Hadamard, ReductionKind::Cx])
            .with_rounds(3)
            .with_integrity_check(true)
            .build();

        let mut circuit = Circuit::with_size("test", 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap();
        let mut dag = circuit.into_dag();
        pm.run(&mut dag, &mut props).unwrap();

        assert_eq!(dag.num_ops(), 0);
        let log = props.get::<ReductionLog>().unwrap();
        assert_eq!(log.reports().len(), 6);
        assert_eq!(log.reports()[0].pass(), "hadamard_reduction");
        assert_eq!(log.total_removed(), 4);
    }

    #[test]
    fn test_seeded_properties_are_kept() {
        let mut seeded = PropertySet::new();
        seeded.update_or_default(|log: &mut ReductionLog| {
            log.push(crate::reduction::ReductionReport::new(
                "earlier_run",
                &[("h".to_string(), 2)].into_iter().collect(),
                &Default::default(),
            ));
        });

        let (pm, mut props) = PassManagerBuilder::new()
            .with_schedule(vec![ReductionKind::Cx])
            .with_rounds(1)
            .with_properties(seeded)
            .build();

        let mut circuit = Circuit::with_size("test", 2);
        circuit
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap();
        let mut dag = circuit.into_dag();
        pm.run(&mut dag, &mut props).unwrap();

        let log = props.get::<ReductionLog>().unwrap();
        assert_eq!(log.reports().len(), 2);
        assert_eq!(log.reports()[0].pass(), "earlier_run");
        assert_eq!(log.reports()[1].pass(), "cx_reduction");
        assert_eq!(log.total_removed(), 4);
    }

    /// Replaces every H with X, which is never equivalent.
    struct BreakingPass;

    impl Pass for BreakingPass {
        fn name(&self) -> &'static str {
            "breaking"
        }

        fn kind(&self) -> PassKind {
            PassKind::Transformation
        }

        fn run(&self, dag: &mut CircuitDag, _properties: &mut PropertySet) -> CompileResult<()> {
            let nodes: Vec<_> = dag.op_nodes().collect();
            for node in nodes {
                dag.substitute_node(node, StandardGate::X)?;
            }
            Ok(())
        }
    }

    #[test]
    fn test_equivalence_check_names_pass() {
        let mut pm = PassManager::new();
        pm.check_equivalence = true;
        pm.add_pass(BreakingPass);

        let mut circuit = Circuit::with_size("test", 1);
        circuit.h(QubitId(0)).unwrap();
        let mut dag = circuit.into_dag();

        match pm.run(&mut dag, &mut PropertySet::new()) {
            Err(CompileError::EquivalenceViolation { pass }) => assert_eq!(pass, "breaking"),
            other => panic!("Expected EquivalenceViolation, got {other:?}"),
        }
    }
}
