//! Miter construction.
//!
//! The miter of two networks shares their primary inputs and has one output per
//! output pair, equal to the XOR of the pair. Its outputs are constant zero exactly
//! when the two networks are equivalent.

use std::collections::HashMap;

use log::debug;
use thiserror::Error;

use crate::network::NetworkBuilder;

/// Reasons two networks cannot be combined into a miter.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum MiterError {
    #[error("networks have different numbers of inputs: {left} vs {right}")]
    InputCountMismatch { left: usize, right: usize },

    #[error("networks have different numbers of outputs: {left} vs {right}")]
    OutputCountMismatch { left: usize, right: usize },
}

/// Builds the miter of `a` and `b`.
pub fn miter<N>(a: &N, b: &N) -> Result<N, MiterError>
where
    N: NetworkBuilder,
{
    if a.num_pis() != b.num_pis() {
        return Err(MiterError::InputCountMismatch {
            left: a.num_pis(),
            right: b.num_pis(),
        });
    }
    if a.num_pos() != b.num_pos() {
        return Err(MiterError::OutputCountMismatch {
            left: a.num_pos(),
            right: b.num_pos(),
        });
    }

    let mut dest = N::default();
    let pis: Vec<_> = (0..a.num_pis()).map(|_| dest.create_pi()).collect();

    let outputs_a = copy_network(a, &mut dest, &pis);
    let outputs_b = copy_network(b, &mut dest, &pis);

    for (fa, fb) in outputs_a.into_iter().zip(outputs_b) {
        let diff = dest.create_xor(fa, fb);
        dest.create_po(diff);
    }

    debug!(
        "miter(size = {}, {}) -> size = {}, outputs = {}",
        a.size(),
        b.size(),
        dest.size(),
        dest.num_pos()
    );
    Ok(dest)
}

/// Copies the logic of `source` into `dest` on top of the given inputs and returns
/// the copied outputs.
fn copy_network<N>(source: &N, dest: &mut N, pis: &[N::Signal]) -> Vec<N::Signal>
where
    N: NetworkBuilder,
{
    let mut map: HashMap<N::Node, N::Signal> = HashMap::new();
    for node in source.constants() {
        map.insert(node, dest.get_constant(source.constant_value(node)));
    }
    for (node, &pi) in source.pis().zip(pis) {
        map.insert(node, pi);
    }

    let remap = |map: &HashMap<N::Node, N::Signal>, dest: &N, signal: N::Signal| {
        let mapped = map[&source.get_node(signal)];
        if source.is_complemented(signal) {
            dest.create_not(mapped)
        } else {
            mapped
        }
    };

    let mut fanins = Vec::new();
    for node in source.gates() {
        fanins.clear();
        for fanin in source.fanins(node) {
            fanins.push(remap(&map, &*dest, fanin));
        }
        let copy = dest.clone_node(source, node, &fanins);
        map.insert(node, copy);
    }

    source.pos().map(|f| remap(&map, &*dest, f)).collect()
}
