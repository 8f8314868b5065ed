use crate::engines::generation::genome::{Operator, Symbol};
use std::fmt;

/// Index of a node inside an `ExpressionTree`.
pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprNode {
    /// Leaf; evaluates to the input variable.
    Terminal(Symbol),
    Function {
        op: Operator,
        left: NodeId,
        right: NodeId,
    },
}

/// Expression tree decoded from a chromosome.
///
/// Nodes are stored in level order, so `nodes[i]` came from chromosome
/// position `i` and every child index is greater than its parent's.
/// The root is always node 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionTree {
    nodes: Vec<ExprNode>,
}

impl ExpressionTree {
    pub(crate) fn from_nodes(nodes: Vec<ExprNode>) -> Self {
        debug_assert!(!nodes.is_empty());
        Self { nodes }
    }

    pub fn terminal(symbol: Symbol) -> Self {
        Self {
            nodes: vec![ExprNode::Terminal(symbol)],
        }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn node(&self, id: NodeId) -> &ExprNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[ExprNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of chromosome symbols the decoder consumed (the coding region).
    pub fn coding_length(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.nodes[0], ExprNode::Terminal(_))
    }

    /// Depth in levels; a bare terminal has depth 1.
    pub fn depth(&self) -> usize {
        let mut depths = vec![1usize; self.nodes.len()];
        let mut deepest = 1;
        for (id, node) in self.nodes.iter().enumerate() {
            if let ExprNode::Function { left, right, .. } = *node {
                depths[left] = depths[id] + 1;
                depths[right] = depths[id] + 1;
                deepest = deepest.max(depths[id] + 1);
            }
        }
        deepest
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        crate::engines::evaluation::expression::evaluate(self, x)
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId) -> fmt::Result {
        match self.nodes[id] {
            ExprNode::Terminal(symbol) => write!(f, "{}", symbol as char),
            ExprNode::Function { op, left, right } => {
                write!(f, "(")?;
                self.write_node(f, left)?;
                write!(f, " {} ", op.symbol() as char)?;
                self.write_node(f, right)?;
                write!(f, ")")
            }
        }
    }
}

/// Fully parenthesised infix, e.g. `((a * a) - a)`.
impl fmt::Display for ExpressionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.root())
    }
}
