//! Simulation-based combinational equivalence checking.
//!
//! Two networks are combined into a [miter][crate::miter::miter], whose outputs are
//! constant zero iff the networks are equivalent. The miter is then simulated
//! exhaustively: the first `split_var` inputs are simulated bit-parallel as
//! projection functions inside one truth table of `2^split_var` bits, and the
//! remaining inputs are enumerated across `2^(n - split_var)` rounds, each round
//! fixing them to the constant values given by the binary digits of the round index.
//! Every point of the input space is therefore visited exactly once.
//!
//! The split is chosen so that the estimated working set of one round,
//! `(32 + 2^(split_var - 3)) * size` bytes, stays within a fixed budget.
//!
//! # Example
//!
//! ```
//! use sim_cec::cec::simulation_cec;
//! use sim_cec::network::LogicNetwork;
//!
//! let mut a = LogicNetwork::new();
//! let x = a.add_input();
//! let y = a.add_input();
//! let f = a.create_or(x, y);
//! a.add_output(f);
//!
//! // De Morgan: x | y == !(!x & !y)
//! let mut b = LogicNetwork::new();
//! let x = b.add_input();
//! let y = b.add_input();
//! let g = b.create_and(!x, !y);
//! b.add_output(!g);
//!
//! let report = simulation_cec(&a, &b);
//! assert_eq!(report.result.as_bool(), Some(true));
//! assert_eq!(report.stats.split_var, 2);
//! assert_eq!(report.stats.rounds, 1);
//! ```

use std::fmt::{Display, Formatter};

use log::{debug, trace};
use thiserror::Error;

use crate::miter::{miter, MiterError};
use crate::network::{Network, NetworkBuilder};
use crate::patterns::{init_patterns, PatternStore};
use crate::simulation::{simulate_nodes, TruthTableSimulator};
use crate::truth_table::{TableRef, TruthTable};

/// Default input-count ceiling.
pub const MAX_INPUTS: u32 = 40;

/// Default per-round working-set budget, in bytes.
pub const MEMORY_BUDGET: u64 = 1 << 29;

/// Input count up to which every input is simulated in parallel.
const FULL_SPLIT_INPUTS: u32 = 6;

/// Parameters of [`simulation_cec_with_params`].
///
/// # Examples
///
/// ```
/// use sim_cec::cec::CecParams;
///
/// let params = CecParams {
///     memory_budget: 1 << 20,
///     ..CecParams::default()
/// };
/// assert_eq!(params.max_inputs, 40);
/// ```
#[derive(Debug, Clone)]
pub struct CecParams {
    /// Networks with more inputs are not checked (default: 40, values above 40 are clamped).
    pub max_inputs: u32,
    /// Working-set budget of one simulation round, in bytes (default: 2^29).
    pub memory_budget: u64,
}

impl Default for CecParams {
    fn default() -> Self {
        Self {
            max_inputs: MAX_INPUTS,
            memory_budget: MEMORY_BUDGET,
        }
    }
}

/// Statistics of one check.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct SimulationCecStats {
    /// Number of inputs simulated in parallel.
    pub split_var: u32,
    /// Number of simulation rounds.
    pub rounds: u64,
}

/// Why a check produced no verdict.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum UndeterminedReason {
    #[error("{num_pis} inputs exceed the limit of {limit}")]
    TooManyInputs { num_pis: usize, limit: u32 },

    #[error("miter construction failed: {0}")]
    Miter(#[from] MiterError),
}

/// Outcome of a check.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum CecResult {
    Equivalent,
    Different,
    Undetermined(UndeterminedReason),
}

impl CecResult {
    pub fn is_equivalent(&self) -> bool {
        matches!(self, CecResult::Equivalent)
    }

    pub fn is_different(&self) -> bool {
        matches!(self, CecResult::Different)
    }

    pub fn is_undetermined(&self) -> bool {
        matches!(self, CecResult::Undetermined(_))
    }

    /// `Some(true)` if equivalent, `Some(false)` if different, `None` if undetermined.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CecResult::Equivalent => Some(true),
            CecResult::Different => Some(false),
            CecResult::Undetermined(_) => None,
        }
    }
}

impl Display for CecResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CecResult::Equivalent => write!(f, "EQUIVALENT"),
            CecResult::Different => write!(f, "DIFFERENT"),
            CecResult::Undetermined(reason) => write!(f, "UNDETERMINED ({})", reason),
        }
    }
}

/// Result of a check together with its statistics.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CecReport {
    pub result: CecResult,
    pub stats: SimulationCecStats,
}

/// Estimated working set, in bytes, of one round with `split_var` parallel inputs.
pub fn memory_cost(split_var: u32, size: usize) -> u128 {
    let table_bytes = if split_var >= 3 { 1u128 << (split_var - 3) } else { 1 };
    (32 + table_bytes) * size as u128
}

/// Number of inputs to simulate in parallel.
///
/// Up to 6 inputs everything fits in one word. Beyond that, the split grows from 7
/// while the next width stays within `budget`, and never exceeds `num_pis`. When even
/// 7 exceeds the budget, 7 is returned.
pub fn compute_split_var(num_pis: u32, size: usize, budget: u64) -> u32 {
    if num_pis <= FULL_SPLIT_INPUTS {
        return num_pis;
    }
    let mut m = FULL_SPLIT_INPUTS + 1;
    while m < num_pis && memory_cost(m + 1, size) <= budget as u128 {
        m += 1;
    }
    m
}

/// Number of rounds covering the inputs beyond the split.
pub fn compute_rounds(num_pis: u32, split_var: u32) -> u64 {
    assert!(split_var <= num_pis, "split_var {} exceeds {} inputs", split_var, num_pis);
    1u64 << (num_pis - split_var)
}

/// Bit `position` of `round`, the value of input `split_var + position` in that round.
pub fn bit_of(round: u64, position: u32) -> bool {
    (round >> position) & 1 == 1
}

/// A set output bit.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct Mismatch {
    /// Ordinal of the output.
    pub output: usize,
    /// Position of the set bit in the simulation vector.
    pub bit: u64,
}

/// Finds an output whose (possibly complemented) pattern is not constant zero.
pub(crate) fn find_mismatch<N>(ntk: &N, patterns: &PatternStore<N::Node>) -> Option<Mismatch>
where
    N: Network,
{
    for (output, f) in ntk.pos().enumerate() {
        let pattern = TableRef::new(&patterns[ntk.get_node(f)], ntk.is_complemented(f));
        if let Some(bit) = pattern.first_one() {
            return Some(Mismatch { output, bit });
        }
    }
    None
}

/// Input values for point `bit` of round `round`.
pub(crate) fn input_assignment(num_pis: u32, split_var: u32, round: u64, bit: u64) -> Vec<bool> {
    (0..num_pis)
        .map(|p| {
            if p < split_var {
                (bit >> p) & 1 == 1
            } else {
                bit_of(round, p - split_var)
            }
        })
        .collect()
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum RoundOutcome {
    Equivalent,
    Different { round: u64, mismatch: Mismatch },
}

/// Round driver over a miter network.
pub(crate) struct SimulationCec<'a, N> {
    ntk: &'a N,
    split_var: u32,
    rounds: u64,
}

impl<'a, N> SimulationCec<'a, N>
where
    N: Network,
{
    pub fn new(ntk: &'a N, params: &CecParams) -> Self {
        let num_pis = ntk.num_pis() as u32;
        let split_var = compute_split_var(num_pis, ntk.size(), params.memory_budget);
        let rounds = compute_rounds(num_pis, split_var);
        debug!(
            "plan(pis = {}, size = {}, budget = {}) -> split_var = {}, rounds = {}",
            num_pis,
            ntk.size(),
            params.memory_budget,
            split_var,
            rounds
        );
        Self { ntk, split_var, rounds }
    }

    pub fn stats(&self) -> SimulationCecStats {
        SimulationCecStats {
            split_var: self.split_var,
            rounds: self.rounds,
        }
    }

    pub fn run(&self) -> RoundOutcome {
        let sim = TruthTableSimulator::new(self.split_var);
        let zero = TruthTable::zero(self.split_var);
        let one = TruthTable::one(self.split_var);

        let mut patterns = init_patterns(self.ntk, self.split_var);
        for round in 0..self.rounds {
            if round > 0 {
                patterns.discard_derived(self.ntk);
                self.assign_round(round, &mut patterns, &zero, &one);
            }
            trace!("round {} of {} ({} inputs pinned)", round, self.rounds, patterns.len());
            simulate_nodes(self.ntk, &mut patterns, &sim);

            if let Some(mismatch) = find_mismatch(self.ntk, &patterns) {
                let witness = input_assignment(self.ntk.num_pis() as u32, self.split_var, round, mismatch.bit);
                let witness: String = witness.iter().map(|&b| if b { '1' } else { '0' }).collect();
                debug!(
                    "output {} differs in round {} at bit {} (inputs {})",
                    mismatch.output, round, mismatch.bit, witness
                );
                return RoundOutcome::Different { round, mismatch };
            }
        }
        RoundOutcome::Equivalent
    }

    /// Pins the inputs beyond the split to the digits of `round`.
    fn assign_round(&self, round: u64, patterns: &mut PatternStore<N::Node>, zero: &TruthTable, one: &TruthTable) {
        for (p, node) in self.ntk.pis().enumerate().skip(self.split_var as usize) {
            let position = p as u32 - self.split_var;
            let value = if bit_of(round, position) { one } else { zero };
            patterns.set(node, value.clone());
        }
    }
}

/// Checks `ntk1` and `ntk2` for equivalence with the default [`CecParams`].
pub fn simulation_cec<N>(ntk1: &N, ntk2: &N) -> CecReport
where
    N: NetworkBuilder,
{
    simulation_cec_with_params(ntk1, ntk2, &CecParams::default())
}

/// Checks `ntk1` and `ntk2` for equivalence.
///
/// Returns [`CecResult::Undetermined`] without simulating when the networks have more
/// than `params.max_inputs` inputs or cannot be combined into a miter; the statistics
/// are zero in that case.
pub fn simulation_cec_with_params<N>(ntk1: &N, ntk2: &N, params: &CecParams) -> CecReport
where
    N: NetworkBuilder,
{
    let limit = params.max_inputs.min(MAX_INPUTS);
    if ntk1.num_pis() > limit as usize {
        debug!("simulation_cec: {} inputs exceed the limit of {}", ntk1.num_pis(), limit);
        return CecReport {
            result: CecResult::Undetermined(UndeterminedReason::TooManyInputs {
                num_pis: ntk1.num_pis(),
                limit,
            }),
            stats: SimulationCecStats::default(),
        };
    }

    let ntk = match miter(ntk1, ntk2) {
        Ok(ntk) => ntk,
        Err(e) => {
            debug!("simulation_cec: {}", e);
            return CecReport {
                result: CecResult::Undetermined(e.into()),
                stats: SimulationCecStats::default(),
            };
        }
    };

    let engine = SimulationCec::new(&ntk, params);
    let result = match engine.run() {
        RoundOutcome::Equivalent => CecResult::Equivalent,
        RoundOutcome::Different { .. } => CecResult::Different,
    };
    debug!("simulation_cec -> {}", result);
    CecReport {
        result,
        stats: engine.stats(),
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::network::LogicNetwork;
    use crate::signal::Signal;
    use crate::simulation::simulate;

    /// Network whose single output is 1 only at input point `point`.
    fn minterm_network(num_inputs: u32, point: u64) -> LogicNetwork {
        let mut ntk = LogicNetwork::new();
        let literals: Vec<Signal> = (0..num_inputs)
            .map(|p| {
                let x = ntk.add_input();
                x ^ ((point >> p) & 1 == 0)
            })
            .collect();
        let f = ntk.create_nary_and(&literals);
        ntk.add_output(f);
        ntk
    }

    fn zero_network(num_inputs: u32) -> LogicNetwork {
        let mut ntk = LogicNetwork::new();
        for _ in 0..num_inputs {
            ntk.add_input();
        }
        ntk.add_output(Signal::zero());
        ntk
    }

    #[test]
    fn test_split_small() {
        for n in 0..=6 {
            for size in [1, 1000, usize::MAX] {
                let s = compute_split_var(n, size, MEMORY_BUDGET);
                assert_eq!(s, n);
                assert_eq!(compute_rounds(n, s), 1);
            }
        }
    }

    #[test]
    fn test_split_fits_budget() {
        assert_eq!(compute_split_var(8, 20, MEMORY_BUDGET), 8);
        // (32 + 2^(m-3)) * 100 <= 2^29  <=>  m <= 25
        assert_eq!(compute_split_var(40, 100, MEMORY_BUDGET), 25);
        assert_eq!(compute_split_var(20, 100, MEMORY_BUDGET), 20);
    }

    #[test]
    fn test_split_exact_cover() {
        for n in 0..=40 {
            for size in [1, 13, 1_000, 1_000_000, 100_000_000] {
                let s = compute_split_var(n, size, MEMORY_BUDGET);
                assert!(n.min(6) <= s && s <= n, "n={} size={} s={}", n, size, s);
                let rounds = compute_rounds(n, s);
                assert_eq!(rounds as u128 * (1u128 << s), 1u128 << n, "n={} size={}", n, size);
            }
        }
    }

    #[test]
    fn test_split_memory_budget() {
        for size in [1_000, 1_000_000, 10_000_000, 11_000_000, 100_000_000] {
            for n in 7..=40 {
                let s = compute_split_var(n, size, MEMORY_BUDGET);
                assert!(
                    memory_cost(s, size) <= MEMORY_BUDGET as u128 || s == 7,
                    "n={} size={} s={}",
                    n,
                    size,
                    s
                );
                if s < n {
                    assert!(memory_cost(s + 1, size) > MEMORY_BUDGET as u128);
                }
            }
        }
    }

    #[test]
    fn test_split_budget_unreachable() {
        // Even the minimum width exceeds the budget: terminates at s = n for n = 7.
        assert_eq!(compute_split_var(7, 100_000_000, MEMORY_BUDGET), 7);
        assert_eq!(compute_split_var(7, usize::MAX, MEMORY_BUDGET), 7);
        assert_eq!(compute_split_var(40, usize::MAX, MEMORY_BUDGET), 7);
        assert_eq!(compute_split_var(40, usize::MAX, 0), 7);
    }

    #[test]
    fn test_bit_of() {
        assert!(!bit_of(0b1010, 0));
        assert!(bit_of(0b1010, 1));
        assert!(!bit_of(0b1010, 2));
        assert!(bit_of(0b1010, 3));
        assert!(bit_of(1 << 33, 33));
    }

    #[test]
    fn test_assign_round_is_direct() {
        let ntk = zero_network(10);
        let params = CecParams {
            memory_budget: 0,
            ..CecParams::default()
        };
        let engine = SimulationCec::new(&ntk, &params);
        assert_eq!(engine.split_var, 7);
        let zero = TruthTable::zero(7);
        let one = TruthTable::one(7);
        let pis: Vec<_> = ntk.pis().collect();

        let mut patterns = init_patterns(&ntk, 7);
        // Rounds visited out of order still yield the round's own digits.
        for round in [5, 2, 7, 0, 3] {
            engine.assign_round(round, &mut patterns, &zero, &one);
            for position in 0..3 {
                let expected = if bit_of(round, position) { &one } else { &zero };
                assert_eq!(&patterns[pis[7 + position as usize]], expected);
            }
            for p in 0..7 {
                assert_eq!(patterns[pis[p]], TruthTable::nth_var(7, p as u32));
            }
        }
    }

    #[test]
    fn test_find_mismatch_honors_complement() {
        let mut ntk = LogicNetwork::new();
        let a = ntk.add_input();
        let b = ntk.add_input();
        let f = ntk.create_or(a, b);
        ntk.add_output(Signal::zero());
        ntk.add_output(!f);

        let mut patterns = PatternStore::new();
        simulate_nodes(&ntk, &mut patterns, &TruthTableSimulator::new(2));
        // !(a | b) is 1 only at point 0.
        assert_eq!(find_mismatch(&ntk, &patterns), Some(Mismatch { output: 1, bit: 0 }));
    }

    #[test]
    fn test_witness_reconstruction() {
        let n = 10;
        let params = CecParams {
            memory_budget: 800,
            ..CecParams::default()
        };
        for point in [0u64, 1, 127, 128, 300, 777, 1023] {
            let a = minterm_network(n, point);
            let b = zero_network(n);
            let m = miter(&a, &b).unwrap();
            let engine = SimulationCec::new(&m, &params);
            assert_eq!(engine.stats(), SimulationCecStats { split_var: 7, rounds: 8 });

            match engine.run() {
                RoundOutcome::Different { round, mismatch } => {
                    assert_eq!(round, point >> 7);
                    assert_eq!(mismatch.bit, point & 127);
                    let witness = input_assignment(n, 7, round, mismatch.bit);
                    let expected: Vec<bool> = (0..n).map(|p| (point >> p) & 1 == 1).collect();
                    assert_eq!(witness, expected);

                    // Both networks disagree on the witness.
                    let full = TruthTableSimulator::new(n);
                    let fa = &simulate(&a, &full)[0];
                    let fb = &simulate(&b, &full)[0];
                    assert_ne!(fa.bit(point), fb.bit(point));
                }
                RoundOutcome::Equivalent => panic!("point {} not detected", point),
            }
        }
    }

    #[test]
    fn test_early_exit() {
        // Differs everywhere: detected in round 0 even with 2^27 rounds planned.
        let mut a = LogicNetwork::new();
        let mut b = LogicNetwork::new();
        for _ in 0..40 {
            a.add_input();
            b.add_input();
        }
        a.add_output(a.input(0));
        b.add_output(!b.input(0));
        let m = miter(&a, &b).unwrap();
        let params = CecParams {
            memory_budget: 1 << 16,
            ..CecParams::default()
        };
        let engine = SimulationCec::new(&m, &params);
        assert_eq!(engine.stats().split_var, 13);
        assert!(matches!(engine.run(), RoundOutcome::Different { round: 0, .. }));
    }

    #[test]
    fn test_too_many_inputs() {
        let a = zero_network(41);
        let report = simulation_cec(&a, &a);
        assert_eq!(
            report.result,
            CecResult::Undetermined(UndeterminedReason::TooManyInputs { num_pis: 41, limit: 40 })
        );
        assert_eq!(report.stats, SimulationCecStats::default());
    }

    #[test]
    fn test_miter_failure_is_undetermined() {
        let a = zero_network(3);
        let mut b = zero_network(3);
        b.add_output(Signal::one());
        let report = simulation_cec(&a, &b);
        assert!(report.result.is_undetermined());
        assert_eq!(report.result.as_bool(), None);
        assert_eq!(report.stats, SimulationCecStats::default());
    }

    #[test]
    fn test_result_display() {
        assert_eq!(CecResult::Equivalent.to_string(), "EQUIVALENT");
        assert_eq!(CecResult::Different.to_string(), "DIFFERENT");
        let r = CecResult::Undetermined(UndeterminedReason::TooManyInputs { num_pis: 41, limit: 40 });
        assert_eq!(r.to_string(), "UNDETERMINED (41 inputs exceed the limit of 40)");
    }
}
