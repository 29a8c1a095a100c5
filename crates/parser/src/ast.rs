use std::fmt;

use lexer::token::Token;

/// The grammar production a node was built by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    UpStatement,
    DownStatement,
    Statement,
    AddColumn,
    TableName,
    DataType,
    OptionsBlock,
    Option,
    DefaultValue,
    Boolean,
    Integer,
    Float,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Root => "Root",
            NodeKind::UpStatement => "UpStatement",
            NodeKind::DownStatement => "DownStatement",
            NodeKind::Statement => "Statement",
            NodeKind::AddColumn => "AddColumn",
            NodeKind::TableName => "TableName",
            NodeKind::DataType => "DataType",
            NodeKind::OptionsBlock => "OptionsBlock",
            NodeKind::Option => "Option",
            NodeKind::DefaultValue => "DefaultValue",
            NodeKind::Boolean => "Boolean",
            NodeKind::Integer => "Integer",
            NodeKind::Float => "Float",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeChild {
    Leaf(Token),
    Branch(Node),
}

impl NodeChild {
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            NodeChild::Leaf(token) => Some(token),
            NodeChild::Branch(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            NodeChild::Leaf(_) => None,
            NodeChild::Branch(node) => Some(node),
        }
    }
}

impl From<Token> for NodeChild {
    fn from(token: Token) -> Self {
        NodeChild::Leaf(token)
    }
}

impl From<Node> for NodeChild {
    fn from(node: Node) -> Self {
        NodeChild::Branch(node)
    }
}

/// A node of the syntax tree.
///
/// There are no named fields: the children appear exactly in the order of
/// the production that built the node, so consumers switch on `kind` and
/// index into `children`. For `AddColumn` that is the `add` token, the
/// `column` token, a `TableName` node, a comma, a `DataType` node and then,
/// optionally, a comma and an `OptionsBlock` node.
///
/// Nodes can only be built by the parser and are never changed afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    kind: NodeKind,
    children: Vec<NodeChild>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            children: vec![],
        }
    }

    pub(crate) fn push(&mut self, child: impl Into<NodeChild>) {
        self.children.push(child.into());
    }

    pub(crate) fn into_children(self) -> Vec<NodeChild> {
        self.children
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn children(&self) -> &[NodeChild] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&NodeChild> {
        self.children.get(index)
    }

    /// Every token held under this node, in input order.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = vec![];
        self.collect_tokens(&mut out);

        out
    }

    pub fn token_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                NodeChild::Leaf(_) => 1,
                NodeChild::Branch(node) => node.token_count(),
            })
            .sum()
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token>) {
        for child in &self.children {
            match child {
                NodeChild::Leaf(token) => out.push(token),
                NodeChild::Branch(node) => node.collect_tokens(out),
            }
        }
    }
}

#[cfg(test)]
mod ast_tests {
    use super::*;
    use lexer::token::{Keyword, TokenKind, Value};
    use pretty_assertions::assert_eq;

    fn keyword(start: usize, keyword: Keyword) -> Token {
        let text = keyword.as_str();
        Token::new(
            start,
            start + text.len(),
            TokenKind::Keyword(keyword),
            text,
            Value::Str(text.to_string()),
        )
    }

    fn sample() -> Node {
        let mut boolean = Node::new(NodeKind::Boolean);
        boolean.push(keyword(6, Keyword::True));

        let mut option = Node::new(NodeKind::Option);
        option.push(keyword(0, Keyword::Null));
        option.push(Token::new(4, 5, TokenKind::Colon, ":", Value::Empty));
        option.push(boolean);

        option
    }

    #[test]
    fn test_tokens_in_order() {
        let node = sample();
        let raws: Vec<_> = node.tokens().iter().map(|t| t.raw()).collect();

        assert_eq!(raws, vec!["null", ":", "true"]);
        assert_eq!(node.token_count(), 3);
    }

    #[test]
    fn test_child_access() {
        let node = sample();

        assert_eq!(node.kind(), NodeKind::Option);
        assert!(node.child(0).and_then(NodeChild::as_token).is_some());
        assert!(node.child(0).and_then(NodeChild::as_node).is_none());
        assert_eq!(
            node.child(2).and_then(NodeChild::as_node).map(Node::kind),
            Some(NodeKind::Boolean)
        );
        assert!(node.child(3).is_none());
    }

    #[test]
    fn test_empty_node() {
        let node = Node::new(NodeKind::Statement);

        assert!(node.tokens().is_empty());
        assert_eq!(node.token_count(), 0);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(NodeKind::AddColumn.to_string(), "AddColumn");
        assert_eq!(NodeKind::OptionsBlock.to_string(), "OptionsBlock");
    }
}
