use crate::condition::{Condition, OperandSpace};
use crate::context::{GenerationContext, indent};
use log::debug;

/// A node of the stateless decision tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyNode {
    Branch {
        condition: Condition,
        then: Box<BodyNode>,
        otherwise: Box<BodyNode>,
    },
    /// an always-failing assertion tagged with its failure id
    Leaf(u32),
}

enum Op {
    SubTree(u32),
    Branch(Condition),
}

/// Builds a random binary decision tree. A branch point becomes a leaf when
/// the remaining depth is exhausted, or with probability `return_probability`
/// otherwise. Subtrees are built depth first, "then" before "else", which
/// fixes the numbering of the leaves for a given seed.
pub fn build_tree(
    ctx: &mut GenerationContext,
    space: &OperandSpace<'_>,
    max_depth: u32,
    return_probability: f64,
) -> BodyNode {
    let mut value_stack = Vec::<BodyNode>::new();
    let mut op_stack = vec![Op::SubTree(max_depth)];

    while let Some(op) = op_stack.pop() {
        match op {
            Op::Branch(condition) => {
                let otherwise = value_stack.pop().expect("internal error, empty stack");
                let then = value_stack.pop().expect("internal error, empty stack");
                value_stack.push(BodyNode::Branch {
                    condition,
                    then: Box::new(then),
                    otherwise: Box::new(otherwise),
                });
            }
            Op::SubTree(depth) => {
                // the probability draw only happens when there is depth left
                if depth < 1 || ctx.rng.unit() < return_probability {
                    value_stack.push(BodyNode::Leaf(ctx.failures.next_id()));
                    continue;
                }
                let condition = space.random_condition(&mut ctx.rng);
                op_stack.push(Op::Branch(condition));
                op_stack.push(Op::SubTree(depth - 1));
                op_stack.push(Op::SubTree(depth - 1));
            }
        }
    }
    assert_eq!(value_stack.len(), 1);
    let root = value_stack.remove(0);
    debug!(
        "decision tree: depth {}, {} leaves",
        root.depth(),
        root.leaves().len()
    );
    root
}

enum Emit<'a> {
    Node(&'a BodyNode, usize),
    Text(String),
}

impl BodyNode {
    /// the number of nested conditionals on the longest path
    pub fn depth(&self) -> u32 {
        let mut max = 0;
        let mut stack = vec![(self, 0)];
        while let Some((node, d)) = stack.pop() {
            match node {
                BodyNode::Leaf(_) => max = max.max(d),
                BodyNode::Branch {
                    then, otherwise, ..
                } => {
                    stack.push((otherwise.as_ref(), d + 1));
                    stack.push((then.as_ref(), d + 1));
                }
            }
        }
        max
    }

    /// leaf ids in depth-first, then-before-else order
    pub fn leaves(&self) -> Vec<u32> {
        self.paths().into_iter().map(|(_, id)| id).collect()
    }

    /// every leaf together with the branch outcomes leading to it (`true`
    /// for the "then" arm)
    pub fn paths(&self) -> Vec<(Vec<bool>, u32)> {
        let mut ret = Vec::new();
        let mut stack = vec![(self, Vec::new())];
        while let Some((node, path)) = stack.pop() {
            match node {
                BodyNode::Leaf(id) => ret.push((path, *id)),
                BodyNode::Branch {
                    then, otherwise, ..
                } => {
                    let mut else_path = path.clone();
                    else_path.push(false);
                    let mut then_path = path;
                    then_path.push(true);
                    stack.push((otherwise.as_ref(), else_path));
                    stack.push((then.as_ref(), then_path));
                }
            }
        }
        ret
    }

    /// renders the tree as nested Solidity `if`/`else` statements, starting
    /// at nesting level `level`
    pub fn render(&self, level: usize) -> String {
        let mut out = String::new();
        let mut stack = vec![Emit::Node(self, level)];
        while let Some(item) = stack.pop() {
            match item {
                Emit::Text(text) => out.push_str(&text),
                Emit::Node(BodyNode::Leaf(id), level) => {
                    out.push_str(&format!(
                        "{}emit AssertionFailed(\"{id}\"); assert(false); return 0;",
                        indent(level)
                    ));
                }
                Emit::Node(
                    BodyNode::Branch {
                        condition,
                        then,
                        otherwise,
                    },
                    level,
                ) => {
                    let ind = indent(level);
                    stack.push(Emit::Text(format!("\n{ind}}}")));
                    stack.push(Emit::Node(otherwise, level + 1));
                    stack.push(Emit::Text(format!("\n{ind}}} else {{\n")));
                    stack.push(Emit::Node(then, level + 1));
                    stack.push(Emit::Text(format!("{ind}if ({condition}) {{\n")));
                }
            }
        }
        out
    }
}
