use std::fmt::{self, Write};

use lexer::token::Token;

use crate::ast::{Node, NodeChild};

/// Callbacks for a depth-first walk of the tree. Parents are visited before
/// their children; `depth` is 0 for the node the walk started at.
pub trait Visitor {
    fn visit_node(&mut self, _node: &Node, _depth: usize) {}

    fn visit_token(&mut self, _token: &Token, _depth: usize) {}
}

pub fn walk<V: Visitor + ?Sized>(node: &Node, visitor: &mut V) {
    walk_at(node, 0, visitor);
}

fn walk_at<V: Visitor + ?Sized>(node: &Node, depth: usize, visitor: &mut V) {
    visitor.visit_node(node, depth);

    for child in node.children() {
        match child {
            NodeChild::Leaf(token) => visitor.visit_token(token, depth + 1),
            NodeChild::Branch(node) => walk_at(node, depth + 1, visitor),
        }
    }
}

/// Renders a tree as an indented outline, two spaces per level.
#[derive(Default)]
pub struct TreePrinter {
    out: String,
}

impl TreePrinter {
    pub fn render(node: &Node) -> String {
        let mut printer = TreePrinter::default();
        walk(node, &mut printer);

        printer.out
    }

    fn line(&mut self, depth: usize, item: &dyn fmt::Display) {
        // Writing into a String cannot fail
        let _ = writeln!(self.out, "{:indent$}{item}", "", indent = depth * 2);
    }
}

impl Visitor for TreePrinter {
    fn visit_node(&mut self, node: &Node, depth: usize) {
        self.line(depth, &node.kind());
    }

    fn visit_token(&mut self, token: &Token, depth: usize) {
        self.line(depth, token);
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&TreePrinter::render(self))
    }
}

#[cfg(test)]
mod walk_tests {
    use super::*;
    use crate::{ast::NodeKind, parse_str};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Depths {
        nodes: Vec<(NodeKind, usize)>,
        tokens: usize,
    }

    impl Visitor for Depths {
        fn visit_node(&mut self, node: &Node, depth: usize) {
            self.nodes.push((node.kind(), depth));
        }

        fn visit_token(&mut self, _token: &Token, _depth: usize) {
            self.tokens += 1;
        }
    }

    #[test]
    fn test_walk_order() {
        let root = parse_str("up end down end").unwrap();
        let mut depths = Depths::default();
        walk(&root, &mut depths);

        assert_eq!(
            depths.nodes,
            vec![
                (NodeKind::Root, 0),
                (NodeKind::UpStatement, 1),
                (NodeKind::DownStatement, 1)
            ]
        );
        assert_eq!(depths.tokens, 5);
    }

    #[test]
    fn test_tree_printer() {
        let root = parse_str(r#"up add column "users", integer, {default: 1.5} end down end"#)
            .unwrap();

        let expected = r#"Root
  UpStatement
    "up"
    Statement
      AddColumn
        "add"
        "column"
        TableName
          users
        ,
        DataType
          "integer"
        ,
        OptionsBlock
          {
          Option
            "default"
            :
            DefaultValue
              1.50
          }
    "end"
  DownStatement
    "down"
    "end"
  ""
"#;

        assert_eq!(root.to_string(), expected);
    }
}
