use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Binary connective between two conditions.
///
/// `AND` and `OR` bind equally tight: a chain such as `a AND b OR c` folds
/// left into `(a AND b) OR c`. Parentheses are the only way to regroup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    /// Apply the connective to two already-evaluated operands.
    #[must_use]
    pub fn apply(self, left: bool, right: bool) -> bool {
        match self {
            Operator::And => left && right,
            Operator::Or => left || right,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index of a node inside an [`Expression`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One node of the expression tree. Children are referenced by [`NodeId`]
/// into the owning [`Expression`].
///
/// Positions are 0-based character offsets into the source text. Nodes built
/// programmatically (see [`condition()`]) carry position `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionNode {
    /// A named condition, e.g. `rsi_oversold`.
    Leaf { name: String, position: usize },
    /// Two operands joined by an operator. `position` is the operator's.
    Binary {
        op: Operator,
        left: NodeId,
        right: NodeId,
        position: usize,
    },
    /// An explicit parenthesization. `position` is the opening paren's.
    Group { inner: NodeId, position: usize },
}

impl ExpressionNode {
    #[must_use]
    pub fn position(&self) -> usize {
        match self {
            ExpressionNode::Leaf { position, .. }
            | ExpressionNode::Binary { position, .. }
            | ExpressionNode::Group { position, .. } => *position,
        }
    }
}

/// An immutable, parsed boolean expression over named conditions.
///
/// Nodes live in a flat arena owned by the expression; the tree has no
/// back-references. A fresh `Expression` is produced by every parse and is
/// never patched in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    nodes: Vec<ExpressionNode>,
    root: NodeId,
}

impl Expression {
    /// Assemble an expression from an arena whose last pushed node is `root`.
    pub(crate) fn from_parts(nodes: Vec<ExpressionNode>, root: NodeId) -> Self {
        Self { nodes, root }
    }

    pub(crate) fn push(nodes: &mut Vec<ExpressionNode>, node: ExpressionNode) -> NodeId {
        nodes.push(node);
        NodeId(nodes.len() - 1)
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this expression.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &ExpressionNode {
        &self.nodes[id.0]
    }

    #[must_use]
    pub fn root_node(&self) -> &ExpressionNode {
        self.node(self.root)
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes in arena order, children before their parents.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &ExpressionNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Every leaf occurrence as `(name, position)`, left to right.
    #[must_use]
    pub fn leaves(&self) -> Vec<(&str, usize)> {
        let mut out = Vec::new();
        self.collect_leaves(self.root, &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, id: NodeId, out: &mut Vec<(&'a str, usize)>) {
        let (first, links) = self.chain(id);
        for operand in std::iter::once(first).chain(links.into_iter().map(|(_, right)| right)) {
            match self.node(operand) {
                ExpressionNode::Leaf { name, position } => out.push((name.as_str(), *position)),
                ExpressionNode::Group { inner, .. } => self.collect_leaves(*inner, out),
                ExpressionNode::Binary { .. } => self.collect_leaves(operand, out),
            }
        }
    }

    /// Split the chain rooted at `id` into its first operand and the
    /// `(operator, right operand)` links that follow it, left to right.
    ///
    /// The left spine is walked with a loop. Only groups recurse, and the
    /// parser caps those at [`MAX_NESTING`](crate::MAX_NESTING).
    pub(crate) fn chain(&self, id: NodeId) -> (NodeId, Vec<(Operator, NodeId)>) {
        let mut links = Vec::new();
        let mut cur = id;
        while let ExpressionNode::Binary {
            op, left, right, ..
        } = self.node(cur)
        {
            links.push((*op, *right));
            cur = *left;
        }
        links.reverse();
        (cur, links)
    }

    /// Distinct condition names in order of first appearance.
    #[must_use]
    pub fn conditions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for (name, _) in self.leaves() {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Compare tree shape, operators and names, ignoring positions and arena
    /// layout.
    #[must_use]
    pub fn structurally_eq(&self, other: &Expression) -> bool {
        self.shape_eq(self.root, other, other.root)
    }

    fn shape_eq(&self, a: NodeId, other: &Expression, b: NodeId) -> bool {
        let (first_a, links_a) = self.chain(a);
        let (first_b, links_b) = other.chain(b);
        links_a.len() == links_b.len()
            && self.operand_eq(first_a, other, first_b)
            && links_a
                .iter()
                .zip(&links_b)
                .all(|(&(op_a, ra), &(op_b, rb))| op_a == op_b && self.shape_eq(ra, other, rb))
    }

    fn operand_eq(&self, a: NodeId, other: &Expression, b: NodeId) -> bool {
        match (self.node(a), other.node(b)) {
            (ExpressionNode::Leaf { name: x, .. }, ExpressionNode::Leaf { name: y, .. }) => x == y,
            (ExpressionNode::Group { inner: ia, .. }, ExpressionNode::Group { inner: ib, .. }) => {
                self.shape_eq(*ia, other, *ib)
            }
            _ => false,
        }
    }

    /// Join with `AND`. A chain on the right is wrapped in a group, so
    /// `a.and(b.or(c))` is `a AND (b OR c)` both in the tree and as text.
    #[must_use]
    pub fn and(self, other: Expression) -> Expression {
        self.combine(Operator::And, other)
    }

    /// Join with `OR`. Right-hand chains are grouped as in [`Expression::and`].
    #[must_use]
    pub fn or(self, other: Expression) -> Expression {
        self.combine(Operator::Or, other)
    }

    /// Wrap the whole expression in an explicit group.
    #[must_use]
    pub fn grouped(mut self) -> Expression {
        let inner = self.root;
        self.root = Self::push(&mut self.nodes, ExpressionNode::Group { inner, position: 0 });
        self
    }

    fn combine(mut self, op: Operator, other: Expression) -> Expression {
        let other = if matches!(other.root_node(), ExpressionNode::Binary { .. }) {
            other.grouped()
        } else {
            other
        };
        let offset = self.nodes.len();
        let shift = |id: NodeId| NodeId(id.0 + offset);
        self.nodes.extend(other.nodes.into_iter().map(|node| match node {
            ExpressionNode::Leaf { .. } => node,
            ExpressionNode::Binary {
                op,
                left,
                right,
                position,
            } => ExpressionNode::Binary {
                op,
                left: shift(left),
                right: shift(right),
                position,
            },
            ExpressionNode::Group { inner, position } => ExpressionNode::Group {
                inner: shift(inner),
                position,
            },
        }));
        let left = self.root;
        let right = shift(other.root);
        self.root = Self::push(
            &mut self.nodes,
            ExpressionNode::Binary {
                op,
                left,
                right,
                position: 0,
            },
        );
        self
    }

    fn fmt_node(&self, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (first, links) = self.chain(id);
        self.fmt_operand(first, f)?;
        for (op, right) in links {
            write!(f, " {op} ")?;
            self.fmt_operand(right, f)?;
        }
        Ok(())
    }

    fn fmt_operand(&self, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node(id) {
            ExpressionNode::Leaf { name, .. } => f.write_str(name),
            ExpressionNode::Group { inner, .. } => {
                f.write_str("(")?;
                self.fmt_node(*inner, f)?;
                f.write_str(")")
            }
            ExpressionNode::Binary { .. } => {
                f.write_str("(")?;
                self.fmt_node(id, f)?;
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(self.root, f)
    }
}

/// Build a single-condition expression.
#[must_use]
pub fn condition(name: &str) -> Expression {
    Expression {
        nodes: vec![ExpressionNode::Leaf {
            name: name.to_owned(),
            position: 0,
        }],
        root: NodeId(0),
    }
}
