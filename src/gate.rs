use crate::signal::Signal;
use crate::truth_table::{TableRef, TruthTable};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BinaryType {
    And,
    Xor,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TernaryType {
    And,
    Xor,
    Maj,
    Ite,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum NaryType {
    And,
    Or,
    Xor,
    Nand,
    Nor,
    Xnor,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Gate {
    Binary(BinaryType, [Signal; 2]),
    Ternary(TernaryType, [Signal; 3]),
    Nary(NaryType, Box<[Signal]>),
}

// Constructors
impl Gate {
    pub fn and(a: Signal, b: Signal) -> Gate {
        Gate::Binary(BinaryType::And, [a, b])
    }

    pub fn xor(a: Signal, b: Signal) -> Gate {
        Gate::Binary(BinaryType::Xor, [a, b])
    }

    pub fn and3(a: Signal, b: Signal, c: Signal) -> Gate {
        Gate::Ternary(TernaryType::And, [a, b, c])
    }

    pub fn xor3(a: Signal, b: Signal, c: Signal) -> Gate {
        Gate::Ternary(TernaryType::Xor, [a, b, c])
    }

    pub fn maj(a: Signal, b: Signal, c: Signal) -> Gate {
        Gate::Ternary(TernaryType::Maj, [a, b, c])
    }

    /// `if a then b else c`.
    pub fn ite(a: Signal, b: Signal, c: Signal) -> Gate {
        Gate::Ternary(TernaryType::Ite, [a, b, c])
    }

    /// N-ary gate.
    ///
    /// # Panics
    ///
    /// Panics if `signals` is empty.
    pub fn nary(kind: NaryType, signals: &[Signal]) -> Gate {
        assert!(!signals.is_empty(), "N-ary gate needs at least one input");
        Gate::Nary(kind, signals.into())
    }

    pub fn andn(signals: &[Signal]) -> Gate {
        Gate::nary(NaryType::And, signals)
    }

    pub fn orn(signals: &[Signal]) -> Gate {
        Gate::nary(NaryType::Or, signals)
    }

    pub fn xorn(signals: &[Signal]) -> Gate {
        Gate::nary(NaryType::Xor, signals)
    }

    pub fn nandn(signals: &[Signal]) -> Gate {
        Gate::nary(NaryType::Nand, signals)
    }

    pub fn norn(signals: &[Signal]) -> Gate {
        Gate::nary(NaryType::Nor, signals)
    }

    pub fn xnorn(signals: &[Signal]) -> Gate {
        Gate::nary(NaryType::Xnor, signals)
    }
}

// Getters
impl Gate {
    pub fn inputs(&self) -> &[Signal] {
        match self {
            Gate::Binary(_, inputs) => inputs,
            Gate::Ternary(_, inputs) => inputs,
            Gate::Nary(_, inputs) => inputs,
        }
    }

    /// Same gate kind over different input signals.
    pub fn with_inputs(&self, inputs: &[Signal]) -> Gate {
        assert_eq!(inputs.len(), self.inputs().len(), "Gate arity mismatch");
        match self {
            Gate::Binary(kind, _) => Gate::Binary(*kind, [inputs[0], inputs[1]]),
            Gate::Ternary(kind, _) => Gate::Ternary(*kind, [inputs[0], inputs[1], inputs[2]]),
            Gate::Nary(kind, _) => Gate::Nary(*kind, inputs.into()),
        }
    }
}

// Evaluation
impl Gate {
    /// Evaluates the gate function bit-parallel.
    ///
    /// `values[i]` is the value of `inputs()[i]`, viewed with its complement applied.
    /// Only the result table is allocated.
    pub fn compute(&self, values: &[TableRef<'_>]) -> TruthTable {
        assert_eq!(values.len(), self.inputs().len(), "Gate arity mismatch");
        match self {
            Gate::Binary(kind, _) => {
                let mut acc = values[0].to_table();
                match kind {
                    BinaryType::And => acc &= values[1],
                    BinaryType::Xor => acc ^= values[1],
                }
                acc
            }
            Gate::Ternary(kind, _) => {
                let (a, b, c) = (values[0], values[1], values[2]);
                match kind {
                    TernaryType::And => TruthTable::ternary(a, b, c, |a, b, c| a & b & c),
                    TernaryType::Xor => TruthTable::ternary(a, b, c, |a, b, c| a ^ b ^ c),
                    TernaryType::Maj => TruthTable::ternary(a, b, c, |a, b, c| (a & b) | (a & c) | (b & c)),
                    TernaryType::Ite => TruthTable::ternary(a, b, c, |a, b, c| (a & b) | (!a & c)),
                }
            }
            Gate::Nary(kind, _) => {
                let mut acc = values[0].to_table();
                for &v in &values[1..] {
                    match kind {
                        NaryType::And | NaryType::Nand => acc &= v,
                        NaryType::Or | NaryType::Nor => acc |= v,
                        NaryType::Xor | NaryType::Xnor => acc ^= v,
                    }
                }
                if matches!(kind, NaryType::Nand | NaryType::Nor | NaryType::Xnor) {
                    acc.complement_in_place();
                }
                acc
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Node;

    fn input(i: u32) -> Signal {
        Signal::from_node(Node::new(i + 1))
    }

    fn vars(n: u32) -> Vec<TruthTable> {
        (0..n).map(|i| TruthTable::nth_var(n, i)).collect()
    }

    fn refs(tables: &[TruthTable]) -> Vec<TableRef<'_>> {
        tables.iter().map(TableRef::from).collect()
    }

    #[test]
    fn test_gate_and() {
        let a = input(0);
        let b = input(1);
        let gate = Gate::and(a, b);
        assert_eq!(gate.inputs(), &[a, b]);
        assert_eq!(gate.compute(&refs(&vars(2))).words(), &[0b1000]);
    }

    #[test]
    fn test_gate_xor() {
        let a = input(0);
        let b = input(1);
        let gate = Gate::xor(a, b);
        assert_eq!(gate.inputs(), &[a, b]);
        assert_eq!(gate.compute(&refs(&vars(2))).words(), &[0b0110]);
    }

    #[test]
    fn test_gate_and3_xor3() {
        let (a, b, c) = (input(0), input(1), input(2));
        let tables = vars(3);
        let v = refs(&tables);
        assert_eq!(Gate::and3(a, b, c).compute(&v).words(), &[0x80]);
        assert_eq!(Gate::xor3(a, b, c).compute(&v).words(), &[0x96]);
    }

    #[test]
    fn test_gate_maj_ite() {
        let (a, b, c) = (input(0), input(1), input(2));
        let tables = vars(3);
        let v = refs(&tables);
        // maj: minterms 3, 5, 6, 7
        assert_eq!(Gate::maj(a, b, c).compute(&v).words(), &[0xE8]);
        // ite(x0, x1, x2): x0=1 -> x1, x0=0 -> x2
        assert_eq!(Gate::ite(a, b, c).compute(&v).words(), &[0xD8]);
    }

    #[test]
    fn test_gate_nary() {
        let s: Vec<_> = (0..3).map(input).collect();
        let tables = vars(3);
        let v = refs(&tables);
        assert_eq!(Gate::andn(&s).compute(&v).words(), &[0x80]);
        assert_eq!(Gate::orn(&s).compute(&v).words(), &[0xFE]);
        assert_eq!(Gate::xorn(&s).compute(&v).words(), &[0x96]);
        assert_eq!(Gate::nandn(&s).compute(&v).words(), &[0x7F]);
        assert_eq!(Gate::norn(&s).compute(&v).words(), &[0x01]);
        assert_eq!(Gate::xnorn(&s).compute(&v).words(), &[0x69]);
    }

    #[test]
    fn test_gate_complemented_operands() {
        let tables = vars(2);
        let v = [TableRef::from(&tables[0]), TableRef::new(&tables[1], true)];
        // x0 & !x1
        assert_eq!(Gate::and(input(0), !input(1)).compute(&v).words(), &[0b0010]);
        // x0 ^ !x1
        assert_eq!(Gate::xor(input(0), !input(1)).compute(&v).words(), &[0b1001]);
        // Operands are read, not consumed.
        assert_eq!(tables[1], TruthTable::nth_var(2, 1));

        let c = TruthTable::nth_var(2, 0);
        let w = [TableRef::new(&tables[0], true), TableRef::new(&tables[1], true), TableRef::from(&c)];
        // maj(!x0, !x1, x0) = !x1
        assert_eq!(Gate::maj(!input(0), !input(1), input(0)).compute(&w).words(), &[0b0011]);
        // nand(!x0, !x1, x0) = 1, within the 4 valid bits
        assert_eq!(Gate::nandn(&[!input(0), !input(1), input(0)]).compute(&w).words(), &[0b1111]);
    }

    #[test]
    fn test_with_inputs() {
        let gate = Gate::maj(input(0), input(1), input(2));
        let other = gate.with_inputs(&[input(3), !input(4), input(5)]);
        assert_eq!(other, Gate::maj(input(3), !input(4), input(5)));
    }

    #[test]
    #[should_panic]
    fn test_empty_nary() {
        Gate::andn(&[]);
    }
}
