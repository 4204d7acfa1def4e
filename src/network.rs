//! Logic networks.
//!
//! The checker is written against the [`Network`] trait, the set of capabilities it
//! needs from a network: enumerate primary inputs, outputs and gates, map signals to
//! nodes, query output complementation, report a size, and evaluate a gate over
//! simulation vectors. [`NetworkBuilder`] adds what the miter needs to construct a
//! new network of the same type.
//!
//! [`LogicNetwork`] is the network shipped with this crate: a topologically ordered
//! list of nodes with complemented edges and multi-input gates.

use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

use crate::gate::Gate;
use crate::signal::{Node, Signal};
use crate::truth_table::{TableRef, TruthTable};

/// Read access required by simulation-based checking.
pub trait Network {
    type Node: Copy + Eq + Hash + Debug;
    type Signal: Copy + Eq + Debug;

    fn num_pis(&self) -> usize;
    fn num_pos(&self) -> usize;
    /// Total number of nodes, including constants and inputs.
    fn size(&self) -> usize;

    fn get_node(&self, signal: Self::Signal) -> Self::Node;
    fn is_complemented(&self, signal: Self::Signal) -> bool;
    fn is_constant(&self, node: Self::Node) -> bool;
    fn is_pi(&self, node: Self::Node) -> bool;
    /// Value of a constant node.
    fn constant_value(&self, node: Self::Node) -> bool;

    /// Constant nodes.
    fn constants(&self) -> impl Iterator<Item = Self::Node> + '_;
    /// Primary inputs in ordinal order.
    fn pis(&self) -> impl Iterator<Item = Self::Node> + '_;
    /// Primary outputs in ordinal order.
    fn pos(&self) -> impl Iterator<Item = Self::Signal> + '_;
    /// Gates in topological order.
    fn gates(&self) -> impl Iterator<Item = Self::Node> + '_;
    /// Fanin signals of a gate.
    fn fanins(&self, node: Self::Node) -> impl Iterator<Item = Self::Signal> + '_;

    /// Evaluates the function of gate `node`, given views of its fanin values with
    /// complements applied.
    fn compute(&self, node: Self::Node, values: &[TableRef<'_>]) -> TruthTable;
}

/// Construction capabilities used to derive new networks.
pub trait NetworkBuilder: Network + Default {
    fn get_constant(&self, value: bool) -> Self::Signal;
    fn create_pi(&mut self) -> Self::Signal;
    fn create_po(&mut self, signal: Self::Signal);
    fn create_not(&self, signal: Self::Signal) -> Self::Signal;
    fn create_xor(&mut self, a: Self::Signal, b: Self::Signal) -> Self::Signal;
    /// Creates a gate with the same function as `node` of `source`, over new fanins.
    fn clone_node(&mut self, source: &Self, node: Self::Node, fanins: &[Self::Signal]) -> Self::Signal;
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum NodeKind {
    Constant,
    Input,
    Gate(Gate),
}

/// A multi-gate logic network with complemented edges.
///
/// Node 0 is constant zero. Nodes can only reference nodes created before them,
/// so index order is a topological order.
#[derive(Clone)]
pub struct LogicNetwork {
    nodes: Vec<NodeKind>,
    inputs: Vec<Node>,
    outputs: Vec<Signal>,
}

impl Default for LogicNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl LogicNetwork {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeKind::Constant],
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    pub fn num_gates(&self) -> usize {
        self.nodes.len() - self.inputs.len() - 1
    }

    pub fn inputs(&self) -> &[Node] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Signal] {
        &self.outputs
    }

    /// Signal of the `index`-th primary input.
    pub fn input(&self, index: usize) -> Signal {
        Signal::from_node(self.inputs[index])
    }

    pub fn gate(&self, node: Node) -> Option<&Gate> {
        match &self.nodes[node.index() as usize] {
            NodeKind::Gate(gate) => Some(gate),
            _ => None,
        }
    }

    fn next_node(&self) -> Node {
        Node::new(self.nodes.len() as u32)
    }

    fn contains(&self, signal: Signal) -> bool {
        (signal.index() as usize) < self.nodes.len()
    }

    pub fn add_input(&mut self) -> Signal {
        let node = self.next_node();
        self.nodes.push(NodeKind::Input);
        self.inputs.push(node);
        Signal::from_node(node)
    }

    pub fn add_output(&mut self, output: Signal) {
        assert!(self.contains(output), "Output {} refers to an unknown node", output);
        self.outputs.push(output);
    }

    /// Adds a gate whose inputs must already exist in the network.
    pub fn add_gate(&mut self, gate: Gate) -> Signal {
        for &input in gate.inputs() {
            assert!(self.contains(input), "Gate input {} refers to an unknown node", input);
        }
        let node = self.next_node();
        self.nodes.push(NodeKind::Gate(gate));
        Signal::from_node(node)
    }

    pub fn create_and(&mut self, a: Signal, b: Signal) -> Signal {
        self.add_gate(Gate::and(a, b))
    }

    pub fn create_nand(&mut self, a: Signal, b: Signal) -> Signal {
        !self.create_and(a, b)
    }

    pub fn create_or(&mut self, a: Signal, b: Signal) -> Signal {
        !self.create_and(!a, !b)
    }

    pub fn create_nor(&mut self, a: Signal, b: Signal) -> Signal {
        self.create_and(!a, !b)
    }

    pub fn create_xnor(&mut self, a: Signal, b: Signal) -> Signal {
        !self.add_gate(Gate::xor(a, b))
    }

    pub fn create_and3(&mut self, a: Signal, b: Signal, c: Signal) -> Signal {
        self.add_gate(Gate::and3(a, b, c))
    }

    pub fn create_xor3(&mut self, a: Signal, b: Signal, c: Signal) -> Signal {
        self.add_gate(Gate::xor3(a, b, c))
    }

    pub fn create_maj(&mut self, a: Signal, b: Signal, c: Signal) -> Signal {
        self.add_gate(Gate::maj(a, b, c))
    }

    pub fn create_ite(&mut self, cond: Signal, then: Signal, otherwise: Signal) -> Signal {
        self.add_gate(Gate::ite(cond, then, otherwise))
    }

    pub fn create_nary_and(&mut self, signals: &[Signal]) -> Signal {
        self.add_gate(Gate::andn(signals))
    }

    pub fn create_nary_or(&mut self, signals: &[Signal]) -> Signal {
        self.add_gate(Gate::orn(signals))
    }

    pub fn create_nary_xor(&mut self, signals: &[Signal]) -> Signal {
        self.add_gate(Gate::xorn(signals))
    }
}

impl Network for LogicNetwork {
    type Node = Node;
    type Signal = Signal;

    fn num_pis(&self) -> usize {
        self.inputs.len()
    }

    fn num_pos(&self) -> usize {
        self.outputs.len()
    }

    fn size(&self) -> usize {
        self.nodes.len()
    }

    fn get_node(&self, signal: Signal) -> Node {
        signal.node()
    }

    fn is_complemented(&self, signal: Signal) -> bool {
        signal.is_complemented()
    }

    fn is_constant(&self, node: Node) -> bool {
        matches!(self.nodes[node.index() as usize], NodeKind::Constant)
    }

    fn is_pi(&self, node: Node) -> bool {
        matches!(self.nodes[node.index() as usize], NodeKind::Input)
    }

    fn constant_value(&self, node: Node) -> bool {
        assert!(self.is_constant(node), "{} is not a constant", node);
        false
    }

    fn constants(&self) -> impl Iterator<Item = Node> + '_ {
        std::iter::once(Node::new(0))
    }

    fn pis(&self) -> impl Iterator<Item = Node> + '_ {
        self.inputs.iter().copied()
    }

    fn pos(&self) -> impl Iterator<Item = Signal> + '_ {
        self.outputs.iter().copied()
    }

    fn gates(&self) -> impl Iterator<Item = Node> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, kind)| matches!(kind, NodeKind::Gate(_)))
            .map(|(i, _)| Node::new(i as u32))
    }

    fn fanins(&self, node: Node) -> impl Iterator<Item = Signal> + '_ {
        self.gate(node).map(|g| g.inputs()).unwrap_or(&[]).iter().copied()
    }

    fn compute(&self, node: Node, values: &[TableRef<'_>]) -> TruthTable {
        match self.gate(node) {
            Some(gate) => gate.compute(values),
            None => panic!("{} is not a gate", node),
        }
    }
}

impl NetworkBuilder for LogicNetwork {
    fn get_constant(&self, value: bool) -> Signal {
        Signal::from(value)
    }

    fn create_pi(&mut self) -> Signal {
        self.add_input()
    }

    fn create_po(&mut self, signal: Signal) {
        self.add_output(signal)
    }

    fn create_not(&self, signal: Signal) -> Signal {
        !signal
    }

    fn create_xor(&mut self, a: Signal, b: Signal) -> Signal {
        self.add_gate(Gate::xor(a, b))
    }

    fn clone_node(&mut self, source: &Self, node: Node, fanins: &[Signal]) -> Signal {
        match source.gate(node) {
            Some(gate) => self.add_gate(gate.with_inputs(fanins)),
            None => panic!("{} is not a gate", node),
        }
    }
}

impl Debug for LogicNetwork {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogicNetwork")
            .field("inputs", &self.num_inputs())
            .field("outputs", &self.num_outputs())
            .field("gates", &self.num_gates())
            .finish()
    }
}

impl Display for LogicNetwork {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, kind) in self.nodes.iter().enumerate() {
            if let NodeKind::Gate(gate) = kind {
                writeln!(f, "{} = {:?}", Node::new(i as u32), gate)?;
            }
        }
        for (i, output) in self.outputs.iter().enumerate() {
            writeln!(f, "o{} = {}", i, output)?;
        }
        Ok(())
    }
}
