//! Selection of answer nodes from a game tree.
//!
//! Both policies are plain iterators over [`NodeId`]s. Calling
//! [`Traversal::answers`] again restarts from the root.

use crate::pgn::{GameTree, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    /// First child at every node, one answer per ply.
    Mainline,
    /// Depth-first over every recorded line.
    #[default]
    AllVariations,
}

impl Traversal {
    pub fn answers(self, tree: &GameTree) -> Answers<'_> {
        let children = tree.node(tree.root()).children();
        let state = match self {
            Traversal::Mainline => State::Mainline(children.first().copied()),
            Traversal::AllVariations => State::Variations(children.iter().rev().copied().collect()),
        };
        Answers { tree, state }
    }
}

#[derive(Debug, Clone)]
enum State {
    Mainline(Option<NodeId>),
    Variations(Vec<NodeId>),
}

/// Lazy, finite sequence of answer nodes.
#[derive(Debug, Clone)]
pub struct Answers<'a> {
    tree: &'a GameTree,
    state: State,
}

/// The child continuing the line at a branch point is not an answer there.
/// Every alternative continuation is, so a node with three or more children
/// asks the same question once per alternative.
fn is_answer(tree: &GameTree, id: NodeId) -> bool {
    match tree.node(id).parent() {
        Some(parent) => {
            let siblings = tree.node(parent).children();
            !(siblings.len() > 1 && siblings[0] == id)
        }
        None => false,
    }
}

impl Iterator for Answers<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let tree = self.tree;
        match &mut self.state {
            State::Mainline(cursor) => {
                let id = (*cursor)?;
                *cursor = tree.node(id).children().first().copied();
                Some(id)
            }
            State::Variations(stack) => loop {
                let id = stack.pop()?;
                stack.extend(tree.node(id).children().iter().rev().copied());
                if is_answer(tree, id) {
                    return Some(id);
                }
            },
        }
    }
}

impl GameTree {
    pub fn answers(&self, traversal: Traversal) -> Answers<'_> {
        traversal.answers(self)
    }
}
