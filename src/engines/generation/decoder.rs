//! Karva decoding: chromosome -> expression tree.
//!
//! Symbols are assigned to tree slots in level order. The root comes from
//! position 0; every following symbol fills the next empty child slot of the
//! oldest function node still waiting for children. Decoding stops as soon
//! as no slot is open, so everything after the coding region is ignored.

use crate::engines::generation::{
    ast::{ExprNode, ExpressionTree, NodeId},
    gene_consumer::GeneConsumer,
    genome::{GenomeSpec, Symbol, SymbolKind},
};
use crate::error::DecodeError;
use std::collections::VecDeque;
use std::sync::Arc;

/// Node whose children may not be attached yet.
enum PendingNode {
    Terminal(Symbol),
    Function {
        kind: SymbolKind,
        left: Option<NodeId>,
        right: Option<NodeId>,
    },
}

pub struct KarvaDecoder {
    genome: Arc<GenomeSpec>,
}

impl KarvaDecoder {
    pub fn new(genome: Arc<GenomeSpec>) -> Self {
        Self { genome }
    }

    pub fn genome(&self) -> &GenomeSpec {
        &self.genome
    }

    /// Decode one chromosome.
    ///
    /// Fails if a symbol is outside the alphabet or if the chromosome runs
    /// out before every open slot is filled. Neither happens for chromosomes
    /// built by this crate's initialisation and operators.
    pub fn decode(&self, chromosome: &[Symbol]) -> Result<ExpressionTree, DecodeError> {
        let mut consumer = GeneConsumer::new(chromosome);

        let (position, first) = consumer.consume().ok_or(DecodeError::Empty)?;
        let root_kind = self.classify(first, position)?;
        let root_arity = match root_kind {
            SymbolKind::Terminal => return Ok(ExpressionTree::terminal(first)),
            SymbolKind::Function(op) => op.arity(),
        };

        let mut nodes = vec![PendingNode::Function {
            kind: root_kind,
            left: None,
            right: None,
        }];
        let mut waiting: VecDeque<NodeId> = VecDeque::from([0]);
        let mut open_slots = root_arity;

        while open_slots > 0 {
            let (position, symbol) = consumer.consume().ok_or(DecodeError::Exhausted {
                consumed: consumer.position(),
                open_slots,
            })?;
            let kind = self.classify(symbol, position)?;

            let id = nodes.len();
            let parent = *waiting
                .front()
                .ok_or(DecodeError::IncompleteNode { node: id })?;

            match kind {
                SymbolKind::Terminal => {
                    nodes.push(PendingNode::Terminal(symbol));
                    open_slots -= 1;
                }
                SymbolKind::Function(op) => {
                    nodes.push(PendingNode::Function {
                        kind,
                        left: None,
                        right: None,
                    });
                    open_slots += op.arity() - 1;
                    waiting.push_back(id);
                }
            }

            if let PendingNode::Function { left, right, .. } = &mut nodes[parent] {
                if left.is_none() {
                    *left = Some(id);
                } else {
                    *right = Some(id);
                    waiting.pop_front();
                }
            }
        }

        Self::finish(nodes)
    }

    fn classify(&self, symbol: Symbol, position: usize) -> Result<SymbolKind, DecodeError> {
        self.genome
            .classify(symbol)
            .ok_or(DecodeError::UnknownSymbol {
                symbol: symbol as char,
                position,
            })
    }

    fn finish(nodes: Vec<PendingNode>) -> Result<ExpressionTree, DecodeError> {
        let nodes = nodes
            .into_iter()
            .enumerate()
            .map(|(id, node)| match node {
                PendingNode::Terminal(symbol) => Ok(ExprNode::Terminal(symbol)),
                PendingNode::Function {
                    kind: SymbolKind::Function(op),
                    left: Some(left),
                    right: Some(right),
                } => Ok(ExprNode::Function { op, left, right }),
                PendingNode::Function { .. } => Err(DecodeError::IncompleteNode { node: id }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ExpressionTree::from_nodes(nodes))
    }
}
