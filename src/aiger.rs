//! Reader for the ASCII AIGER format (`aag`).
//!
//! ```text
//! aag M I L O A
//! <I input literals>
//! <L latches: current next [init]>
//! <O output literals>
//! <A and gates: lhs rhs0 rhs1>
//! [symbols: i<pos> name | l<pos> name | o<pos> name]
//! [c
//!  comments]
//! ```
//!
//! Literal `2v` is variable `v`, literal `2v + 1` its complement; literal 0 is
//! constant false and 1 constant true.
//!
//! # Examples
//!
//! ```
//! use sim_cec::aiger::{read_network, Reader};
//! use sim_cec::network::Network;
//!
//! let text = "aag 3 2 0 1 1\n2\n4\n6\n6 2 4\n";
//! let reader = Reader::from_reader(text.as_bytes()).unwrap();
//! let ntk = read_network(reader).unwrap();
//! assert_eq!(ntk.num_pis(), 2);
//! assert_eq!(ntk.num_pos(), 1);
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};
use std::io::{BufRead, BufReader, Lines, Read};

use log::debug;
use thiserror::Error;

use crate::network::LogicNetwork;
use crate::signal::Signal;

#[derive(Debug, Error)]
pub enum AigerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("literal {literal} exceeds the maximum variable index {max}")]
    LiteralOutOfRange { literal: Literal, max: u32 },

    #[error("sequential networks are not supported ({0} latches)")]
    Sequential(usize),

    #[error("literal {0} is never defined")]
    Undefined(Literal),

    #[error("input or AND gate defined by negated literal {0}")]
    NegatedDefinition(Literal),

    #[error("variable {0} is defined more than once")]
    Redefined(u32),

    #[error("combinational cycle through variable {0}")]
    Cycle(u32),
}

pub type Result<T, E = AigerError> = std::result::Result<T, E>;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Literal(u32);

impl Literal {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn variable(self) -> u32 {
        self.0 >> 1
    }

    pub const fn is_negated(self) -> bool {
        self.0 & 1 != 0
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The `M I L O A` header line.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Header {
    /// Maximum variable index.
    pub m: usize,
    /// Number of inputs.
    pub i: usize,
    /// Number of latches.
    pub l: usize,
    /// Number of outputs.
    pub o: usize,
    /// Number of AND gates.
    pub a: usize,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SymbolKind {
    Input,
    Latch,
    Output,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Record {
    Input(Literal),
    Latch {
        output: Literal,
        next: Literal,
        init: Option<Literal>,
    },
    Output(Literal),
    AndGate {
        output: Literal,
        inputs: [Literal; 2],
    },
    Symbol {
        kind: SymbolKind,
        position: usize,
        name: String,
    },
}

pub struct Reader<R> {
    header: Header,
    lines: Lines<BufReader<R>>,
}

impl<R: Read> Reader<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut lines = BufReader::new(reader).lines();
        let first = match lines.next() {
            Some(line) => line?,
            None => return Err(AigerError::InvalidHeader("empty input".to_string())),
        };
        let header = parse_header(&first)?;
        debug!("aiger header = {:?}", header);
        Ok(Self { header, lines })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Iterates over the records following the header.
    pub fn records(self) -> Records<R> {
        Records {
            header: self.header,
            lines: self.lines,
            line: 1,
            index: 0,
            done: false,
        }
    }
}

fn parse_header(line: &str) -> Result<Header> {
    let mut tokens = line.split_whitespace();
    match tokens.next() {
        Some("aag") => {}
        Some("aig") => return Err(AigerError::InvalidHeader("binary AIGER is not supported".to_string())),
        _ => return Err(AigerError::InvalidHeader(format!("expected 'aag', got {:?}", line))),
    }
    let mut numbers = Vec::with_capacity(5);
    for token in tokens {
        let value = token
            .parse::<usize>()
            .map_err(|_| AigerError::InvalidHeader(format!("bad number {:?}", token)))?;
        numbers.push(value);
    }
    // AIGER 1.9 may append B C J F counts; only their absence is supported.
    if numbers.len() < 5 {
        return Err(AigerError::InvalidHeader(format!("expected M I L O A, got {:?}", line)));
    }
    if numbers[5..].iter().any(|&n| n != 0) {
        return Err(AigerError::InvalidHeader("properties and constraints are not supported".to_string()));
    }
    let header = Header {
        m: numbers[0],
        i: numbers[1],
        l: numbers[2],
        o: numbers[3],
        a: numbers[4],
    };
    if header.i + header.l + header.a > header.m {
        return Err(AigerError::InvalidHeader(format!("M = {} is smaller than I + L + A", header.m)));
    }
    Ok(header)
}

pub struct Records<R> {
    header: Header,
    lines: Lines<BufReader<R>>,
    line: usize,
    index: usize,
    done: bool,
}

impl<R: Read> Records<R> {
    fn error(&self, message: impl Into<String>) -> AigerError {
        AigerError::Parse {
            line: self.line,
            message: message.into(),
        }
    }

    fn literals(&self, text: &str, min: usize, max: usize) -> Result<Vec<Literal>> {
        let mut literals = Vec::new();
        for token in text.split_whitespace() {
            let raw = token
                .parse::<u32>()
                .map_err(|_| self.error(format!("bad literal {:?}", token)))?;
            let literal = Literal::new(raw);
            if literal.variable() as usize > self.header.m {
                return Err(AigerError::LiteralOutOfRange {
                    literal,
                    max: self.header.m as u32,
                });
            }
            literals.push(literal);
        }
        if literals.len() < min || literals.len() > max {
            return Err(self.error(format!("expected {}..={} literals, got {}", min, max, literals.len())));
        }
        Ok(literals)
    }

    fn parse_line(&self, text: &str) -> Result<Option<Record>> {
        let h = &self.header;
        let index = self.index;
        if index < h.i {
            let lits = self.literals(text, 1, 1)?;
            return Ok(Some(Record::Input(lits[0])));
        }
        if index < h.i + h.l {
            let lits = self.literals(text, 2, 3)?;
            return Ok(Some(Record::Latch {
                output: lits[0],
                next: lits[1],
                init: lits.get(2).copied(),
            }));
        }
        if index < h.i + h.l + h.o {
            let lits = self.literals(text, 1, 1)?;
            return Ok(Some(Record::Output(lits[0])));
        }
        if index < h.i + h.l + h.o + h.a {
            let lits = self.literals(text, 3, 3)?;
            return Ok(Some(Record::AndGate {
                output: lits[0],
                inputs: [lits[1], lits[2]],
            }));
        }

        // Symbol table, terminated by the comment section.
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        if text == "c" || text.starts_with("c ") {
            return Ok(None);
        }
        let (head, name) = text.split_once(' ').ok_or_else(|| self.error("symbol without a name"))?;
        let kind = match head.as_bytes()[0] {
            b'i' => SymbolKind::Input,
            b'l' => SymbolKind::Latch,
            b'o' => SymbolKind::Output,
            _ => return Err(self.error(format!("unexpected line {:?}", text))),
        };
        let position = head[1..]
            .parse::<usize>()
            .map_err(|_| self.error(format!("bad symbol position {:?}", head)))?;
        Ok(Some(Record::Symbol {
            kind,
            position,
            name: name.to_string(),
        }))
    }
}

impl<R: Read> Iterator for Records<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let expected = self.header.i + self.header.l + self.header.o + self.header.a;
        let text = match self.lines.next() {
            Some(Ok(text)) => text,
            Some(Err(e)) => {
                self.done = true;
                return Some(Err(e.into()));
            }
            None => {
                self.done = true;
                if self.index < expected {
                    return Some(Err(self.error(format!("expected {} records, got {}", expected, self.index))));
                }
                return None;
            }
        };
        self.line += 1;
        match self.parse_line(&text) {
            Ok(Some(record)) => {
                self.index += 1;
                Some(Ok(record))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Builds a combinational network from an AIGER reader.
///
/// Inputs keep their file order; AND gates may appear in any order.
pub fn read_network<R: Read>(reader: Reader<R>) -> Result<LogicNetwork> {
    let header = reader.header().clone();
    if header.l > 0 {
        return Err(AigerError::Sequential(header.l));
    }

    let mut inputs = Vec::new();
    let mut outputs = Vec::new();
    let mut ands: HashMap<u32, [Literal; 2]> = HashMap::new();
    // Variable 0 is the constant.
    let mut defined: HashSet<u32> = HashSet::from([0]);
    for record in reader.records() {
        match record? {
            Record::Input(literal) => {
                define(&mut defined, literal)?;
                inputs.push(literal);
            }
            Record::Output(literal) => outputs.push(literal),
            Record::AndGate { output, inputs } => {
                define(&mut defined, output)?;
                ands.insert(output.variable(), inputs);
            }
            Record::Latch { .. } => return Err(AigerError::Sequential(header.l)),
            Record::Symbol { .. } => {}
        }
    }

    let mut ntk = LogicNetwork::new();
    let mut signals: HashMap<u32, Signal> = HashMap::new();
    signals.insert(0, Signal::zero());
    for literal in inputs {
        signals.insert(literal.variable(), ntk.add_input());
    }

    // Iterative DFS, so deep netlists do not exhaust the stack.
    let mut in_progress: HashSet<u32> = HashSet::new();
    for root in &outputs {
        let mut stack = vec![root.variable()];
        while let Some(&var) = stack.last() {
            if signals.contains_key(&var) {
                stack.pop();
                continue;
            }
            let Some(&[left, right]) = ands.get(&var) else {
                return Err(AigerError::Undefined(Literal::new(var << 1)));
            };
            let pending: Vec<u32> = [left.variable(), right.variable()]
                .into_iter()
                .filter(|v| !signals.contains_key(v))
                .collect();
            if pending.is_empty() {
                let l = literal_signal(&signals, left);
                let r = literal_signal(&signals, right);
                signals.insert(var, ntk.create_and(l, r));
                in_progress.remove(&var);
                stack.pop();
            } else {
                if !in_progress.insert(var) {
                    return Err(AigerError::Cycle(var));
                }
                for v in pending {
                    if in_progress.contains(&v) {
                        return Err(AigerError::Cycle(v));
                    }
                    stack.push(v);
                }
            }
        }
    }

    for literal in outputs {
        let signal = literal_signal(&signals, literal);
        ntk.add_output(signal);
    }
    debug!("read_network -> {:?}", ntk);
    Ok(ntk)
}

/// Records the variable defined by `literal`, which must be positive and fresh.
fn define(defined: &mut HashSet<u32>, literal: Literal) -> Result<()> {
    if literal.is_negated() {
        return Err(AigerError::NegatedDefinition(literal));
    }
    if !defined.insert(literal.variable()) {
        return Err(AigerError::Redefined(literal.variable()));
    }
    Ok(())
}

fn literal_signal(signals: &HashMap<u32, Signal>, literal: Literal) -> Signal {
    signals[&literal.variable()] ^ literal.is_negated()
}
