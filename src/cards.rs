//! Question/answer generation for answer nodes.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use shakmaty::Color;

use crate::{
    deck::model::{NoteModel, IMAGE_MODEL, NOTATION_MODEL},
    error::Result,
    identity::node_hash,
    pgn::{GameTree, NodeId},
    render::DiagramRenderer,
    traversal::Traversal,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    question: String,
    answer: String,
    media: Vec<String>,
}

impl Card {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            media: Vec::new(),
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Artifact file names the card refers to.
    pub fn media(&self) -> &[String] {
        &self.media
    }
}

/// Artifact names already produced in this run, keyed by node identity.
#[derive(Debug, Default)]
pub struct ArtifactCache {
    names: HashMap<String, String>,
}

impl ArtifactCache {
    pub fn get(&self, hash: &str) -> Option<&str> {
        self.names.get(hash).map(String::as_str)
    }

    pub fn insert(&mut self, hash: String, name: String) {
        self.names.insert(hash, name);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Diagram cards: the parent position as question, the position after the
/// move as answer. Each distinct identity is rendered at most once.
pub struct DiagramPipeline<R> {
    renderer: R,
    work_dir: PathBuf,
    cache: ArtifactCache,
}

impl<R: DiagramRenderer> DiagramPipeline<R> {
    pub fn new(renderer: R, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            work_dir: work_dir.into(),
            cache: ArtifactCache::default(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn cache(&self) -> &ArtifactCache {
        &self.cache
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Returns the file name of the diagram for `id`, rendering it on first use.
    pub fn write_diagram(&mut self, tree: &GameTree, id: NodeId) -> Result<String> {
        let node = tree.node(id);
        let hash = node_hash(node);
        if let Some(name) = self.cache.get(&hash) {
            debug!("Reusing diagram {}", name);
            return Ok(name.to_string());
        }
        let name = format!("{}.svg", hash);
        let svg = self.renderer.render(node.position(), node.last_move())?;
        fs::write(self.work_dir.join(&name), svg)?;
        debug!("Rendered diagram {}", name);
        self.cache.insert(hash, name.clone());
        Ok(name)
    }

    pub fn card(&mut self, tree: &GameTree, id: NodeId) -> Result<Card> {
        let parent = tree.node(id).parent().unwrap_or(id);
        let question = self.write_diagram(tree, parent)?;
        let answer = self.write_diagram(tree, id)?;
        Ok(Card {
            question: format!("<img src='{}'>", question),
            answer: format!("<img src='{}'>", answer),
            media: vec![question, answer],
        })
    }

    pub fn cards(&mut self, tree: &GameTree, traversal: Traversal) -> Result<Vec<Card>> {
        tree.answers(traversal)
            .map(|id| self.card(tree, id))
            .collect()
    }
}

/// Text card for the move leading to `id`, e.g. `("1... ?", "1... e5")`.
pub fn notation_card(tree: &GameTree, id: NodeId) -> Card {
    let node = tree.node(id);
    let parent = tree.node(node.parent().unwrap_or(id));
    let number = parent.ply() / 2 + 1;
    let san = node.san().unwrap_or_default();
    match parent.turn() {
        Color::White => Card::new(format!("{}. ?", number), format!("{}.{}", number, san)),
        Color::Black => Card::new(format!("{}... ?", number), format!("{}... {}", number, san)),
    }
}

/// Text cards for the mainline. Variations are never studied blindfold.
pub fn notation_cards(tree: &GameTree) -> Vec<Card> {
    tree.answers(Traversal::Mainline)
        .map(|id| notation_card(tree, id))
        .collect()
}

/// The card generator of a run, chosen by [`crate::config::CardMode`].
pub enum CardPipeline<R> {
    Diagram(DiagramPipeline<R>),
    Notation,
}

impl<R: DiagramRenderer> CardPipeline<R> {
    pub fn cards(&mut self, tree: &GameTree, traversal: Traversal) -> Result<Vec<Card>> {
        match self {
            CardPipeline::Diagram(pipeline) => pipeline.cards(tree, traversal),
            CardPipeline::Notation => Ok(notation_cards(tree)),
        }
    }

    pub fn model(&self) -> &'static NoteModel {
        match self {
            CardPipeline::Diagram(_) => &IMAGE_MODEL,
            CardPipeline::Notation => &NOTATION_MODEL,
        }
    }

    /// Where media artifacts are written, if the mode produces any.
    pub fn work_dir(&self) -> Option<&Path> {
        match self {
            CardPipeline::Diagram(pipeline) => Some(pipeline.work_dir()),
            CardPipeline::Notation => None,
        }
    }
}
