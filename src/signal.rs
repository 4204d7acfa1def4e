use std::fmt::{Debug, Display, Formatter};
use std::ops::{BitXor, Not};

/// A node of a [`LogicNetwork`][crate::network::LogicNetwork].
///
/// Node 0 is the constant-zero node.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Node(u32);

impl Node {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn index(self) -> u32 {
        self.0
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl Debug for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// A possibly complemented edge pointing to a [`Node`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Signal(u32);

// Constructors
impl Signal {
    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn one() -> Self {
        Self(1)
    }

    pub const fn new(node: Node, complemented: bool) -> Self {
        Self((node.0 << 1) | complemented as u32)
    }

    pub const fn from_node(node: Node) -> Self {
        Self::new(node, false)
    }
}

// Getters
impl Signal {
    pub const fn node(self) -> Node {
        Node(self.0 >> 1)
    }

    pub const fn index(self) -> u32 {
        self.0 >> 1
    }
}

// Checks
impl Signal {
    pub const fn is_const(self) -> bool {
        self.index() == 0
    }

    pub const fn is_complemented(self) -> bool {
        // False for zero, true for one.
        self.0 & 1 != 0
    }
}

impl From<bool> for Signal {
    fn from(b: bool) -> Self {
        if b {
            Self::one()
        } else {
            Self::zero()
        }
    }
}

impl Not for Signal {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self(self.0 ^ 1)
    }
}

impl Not for &Signal {
    type Output = Signal;

    fn not(self) -> Self::Output {
        Signal(self.0 ^ 1)
    }
}

impl BitXor<bool> for Signal {
    type Output = Self;

    /// Complements the signal when `rhs` is true.
    fn bitxor(self, rhs: bool) -> Self::Output {
        Self(self.0 ^ rhs as u32)
    }
}

impl Display for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_const() {
            write!(f, "{}", self.0 & 1)
        } else {
            if self.is_complemented() {
                write!(f, "!")?;
            }
            write!(f, "{}", self.node())
        }
    }
}

impl Debug for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_const() {
        let zero = Signal::zero();
        let one = Signal::one();

        assert!(zero.is_const());
        assert!(one.is_const());

        assert_eq!(zero, !one);
        assert_eq!(one, !zero);

        assert!(!zero.is_complemented());
        assert!(one.is_complemented());
        assert_eq!(zero.node(), Node::new(0));
        assert_eq!(one.node(), Node::new(0));
    }

    #[test]
    fn test_node_signal() {
        let node = Node::new(7);
        let s = Signal::from_node(node);
        assert_eq!(s.node(), node);
        assert!(!s.is_complemented());
        assert!((!s).is_complemented());
        assert_eq!((!s).node(), node);
        assert_eq!(s ^ true, !s);
        assert_eq!(s ^ false, s);
    }

    #[test]
    fn test_display() {
        let s = Signal::from_node(Node::new(3));
        assert_eq!(s.to_string(), "n3");
        assert_eq!((!s).to_string(), "!n3");
        assert_eq!(Signal::one().to_string(), "1");
    }
}
