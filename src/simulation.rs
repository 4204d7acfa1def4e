//! Bottom-up node simulation.

use log::trace;

use crate::network::Network;
use crate::patterns::PatternStore;
use crate::truth_table::{TableRef, TruthTable};

/// Produces simulation values for constants and primary inputs.
pub trait Simulator {
    fn compute_constant(&self, value: bool) -> TruthTable;
    fn compute_pi(&self, index: u32) -> TruthTable;
}

/// Simulates every input as a projection over a fixed number of variables.
#[derive(Debug, Copy, Clone)]
pub struct TruthTableSimulator {
    num_vars: u32,
}

impl TruthTableSimulator {
    pub fn new(num_vars: u32) -> Self {
        Self { num_vars }
    }
}

impl Simulator for TruthTableSimulator {
    fn compute_constant(&self, value: bool) -> TruthTable {
        TruthTable::constant(self.num_vars, value)
    }

    fn compute_pi(&self, index: u32) -> TruthTable {
        TruthTable::nth_var(self.num_vars, index)
    }
}

/// Simulates all nodes of `ntk` that have no pattern yet.
///
/// Existing entries (typically the primary inputs) are kept as they are, so callers
/// can pin inputs to arbitrary values before simulating. Fanin values are borrowed
/// from the store, so each gate costs exactly one new table.
pub fn simulate_nodes<N, S>(ntk: &N, patterns: &mut PatternStore<N::Node>, sim: &S)
where
    N: Network,
    S: Simulator,
{
    for node in ntk.constants() {
        if !patterns.contains(node) {
            patterns.set(node, sim.compute_constant(ntk.constant_value(node)));
        }
    }
    for (i, node) in ntk.pis().enumerate() {
        if !patterns.contains(node) {
            patterns.set(node, sim.compute_pi(i as u32));
        }
    }
    for node in ntk.gates() {
        if patterns.contains(node) {
            continue;
        }
        let tt = {
            let values: Vec<TableRef<'_>> = ntk
                .fanins(node)
                .map(|fanin| TableRef::new(&patterns[ntk.get_node(fanin)], ntk.is_complemented(fanin)))
                .collect();
            ntk.compute(node, &values)
        };
        trace!("simulate({:?}) = {:?}", node, tt);
        patterns.set(node, tt);
    }
}

/// Simulates `ntk` from scratch and returns the output values.
pub fn simulate<N, S>(ntk: &N, sim: &S) -> Vec<TruthTable>
where
    N: Network,
    S: Simulator,
{
    let mut patterns = PatternStore::new();
    simulate_nodes(ntk, &mut patterns, sim);
    ntk.pos()
        .map(|f| TableRef::new(&patterns[ntk.get_node(f)], ntk.is_complemented(f)).to_table())
        .collect()
}
