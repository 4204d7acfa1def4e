//! Per-node simulation patterns.

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Index;

use crate::network::Network;
use crate::truth_table::TruthTable;

/// Mapping from network node to its simulation vector.
#[derive(Debug, Clone)]
pub struct PatternStore<K> {
    patterns: HashMap<K, TruthTable>,
}

impl<K> Default for PatternStore<K> {
    fn default() -> Self {
        Self {
            patterns: HashMap::new(),
        }
    }
}

impl<K> PatternStore<K>
where
    K: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn contains(&self, node: K) -> bool {
        self.patterns.contains_key(&node)
    }

    /// Assigns the pattern of `node`, replacing any previous one.
    pub fn set(&mut self, node: K, pattern: TruthTable) {
        self.patterns.insert(node, pattern);
    }

    /// Discards every entry that is not a primary input of `ntk`.
    pub fn discard_derived<N>(&mut self, ntk: &N)
    where
        N: Network<Node = K>,
    {
        self.patterns.retain(|&node, _| ntk.is_pi(node));
    }
}

impl<K> Index<K> for PatternStore<K>
where
    K: Copy + Eq + Hash + std::fmt::Debug,
{
    type Output = TruthTable;

    fn index(&self, node: K) -> &Self::Output {
        match self.patterns.get(&node) {
            Some(pattern) => pattern,
            None => panic!("No pattern for node {:?}", node),
        }
    }
}

/// Seeds the input patterns for a split of `split_var` variables.
///
/// The input at ordinal `p < split_var` gets the projection of variable `p`;
/// inputs beyond the split get constant zero, to be fixed per round.
pub fn init_patterns<N>(ntk: &N, split_var: u32) -> PatternStore<N::Node>
where
    N: Network,
{
    let mut patterns = PatternStore::new();
    for (p, node) in ntk.pis().enumerate() {
        let p = p as u32;
        let tt = if p < split_var {
            TruthTable::nth_var(split_var, p)
        } else {
            TruthTable::zero(split_var)
        };
        patterns.set(node, tt);
    }
    patterns
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::network::LogicNetwork;

    fn network(num_inputs: usize) -> LogicNetwork {
        let mut ntk = LogicNetwork::new();
        let inputs: Vec<_> = (0..num_inputs).map(|_| ntk.add_input()).collect();
        let f = ntk.create_nary_xor(&inputs);
        ntk.add_output(f);
        ntk
    }

    #[test]
    fn test_init_within_split() {
        let ntk = network(3);
        let patterns = init_patterns(&ntk, 3);
        assert_eq!(patterns.len(), 3);
        for (p, node) in ntk.pis().enumerate() {
            assert_eq!(patterns[node], TruthTable::nth_var(3, p as u32));
        }
    }

    #[test]
    fn test_init_beyond_split() {
        let ntk = network(9);
        let patterns = init_patterns(&ntk, 7);
        let pis: Vec<_> = ntk.pis().collect();
        for p in 0..7 {
            assert_eq!(patterns[pis[p]], TruthTable::nth_var(7, p as u32));
        }
        for p in 7..9 {
            assert!(patterns[pis[p]].is_const0());
            assert_eq!(patterns[pis[p]].num_vars(), 7);
        }
    }

    #[test]
    fn test_discard_derived() {
        let ntk = network(2);
        let mut patterns = init_patterns(&ntk, 2);
        let gate = ntk.gates().next().unwrap();
        patterns.set(gate, TruthTable::one(2));
        patterns.set(crate::signal::Node::new(0), TruthTable::zero(2));
        assert_eq!(patterns.len(), 4);

        patterns.discard_derived(&ntk);
        assert_eq!(patterns.len(), 2);
        assert!(!patterns.contains(gate));
        for node in ntk.pis() {
            assert!(patterns.contains(node));
        }
    }
}
