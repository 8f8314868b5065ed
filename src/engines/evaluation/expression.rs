use crate::engines::generation::{
    ast::{ExprNode, ExpressionTree, NodeId},
    genome::Operator,
};

/// Result of a division by zero or a negative exponent.
///
/// Evaluation never fails; degenerate arithmetic just scores very badly.
pub const PENALTY: f64 = -1_000_000.0;

/// Evaluate `tree` with every terminal bound to `x`.
pub fn evaluate(tree: &ExpressionTree, x: f64) -> f64 {
    evaluate_node(tree, tree.root(), x)
}

/// Evaluate `tree` once per input.
pub fn evaluate_all(tree: &ExpressionTree, inputs: &[f64]) -> Vec<f64> {
    inputs.iter().map(|&x| evaluate(tree, x)).collect()
}

fn evaluate_node(tree: &ExpressionTree, id: NodeId, x: f64) -> f64 {
    match *tree.node(id) {
        ExprNode::Terminal(_) => x,
        ExprNode::Function { op, left, right } => {
            let l = evaluate_node(tree, left, x);
            let r = evaluate_node(tree, right, x);
            apply(op, l, r)
        }
    }
}

pub fn apply(op: Operator, l: f64, r: f64) -> f64 {
    match op {
        Operator::Add => l + r,
        Operator::Sub => l - r,
        Operator::Mul => l * r,
        Operator::Div => {
            if r == 0.0 {
                PENALTY
            } else {
                l / r
            }
        }
        Operator::Pow => {
            if r < 0.0 {
                PENALTY
            } else {
                l.powf(r)
            }
        }
    }
}
