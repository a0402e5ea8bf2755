//! Deck assembly and packaging.
//!
//! A run collects the cards of one game into a [`Deck`], writes it as an
//! `.apkg` through [`package::Package`] and then deletes the media files it
//! referenced.

pub mod model;
pub mod package;
pub mod schema;

use std::{collections::BTreeSet, fs, path::Path};

use log::{debug, info};
use rand::Rng;

use crate::{
    cards::{Card, CardPipeline},
    error::Result,
    pgn::GameTree,
    render::DiagramRenderer,
    traversal::Traversal,
};

use self::{model::NoteModel, package::Package};

/// Random deck id in `[2^30, 2^31)`.
pub fn gen_id() -> i64 {
    rand::thread_rng().gen_range((1 << 30)..(1 << 31))
}

#[derive(Debug, Clone)]
pub struct Deck {
    id: i64,
    title: String,
    model: &'static NoteModel,
    cards: Vec<Card>,
    media: BTreeSet<String>,
}

impl Deck {
    pub fn new(title: impl Into<String>, model: &'static NoteModel) -> Self {
        Self::with_id(gen_id(), title, model)
    }

    pub fn with_id(id: i64, title: impl Into<String>, model: &'static NoteModel) -> Self {
        Self {
            id,
            title: title.into(),
            model,
            cards: Vec::new(),
            media: BTreeSet::new(),
        }
    }

    pub fn add_card(&mut self, card: Card) {
        self.media.extend(card.media().iter().cloned());
        self.cards.push(card);
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn model(&self) -> &'static NoteModel {
        self.model
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Distinct artifact names referenced by the cards.
    pub fn media(&self) -> &BTreeSet<String> {
        &self.media
    }
}

/// Builds the deck for `tree`, writes it to `out` and deletes its media.
pub fn generate<R: DiagramRenderer>(
    tree: &GameTree,
    out: &Path,
    title: &str,
    traversal: Traversal,
    pipeline: &mut CardPipeline<R>,
) -> Result<Deck> {
    let mut deck = Deck::new(title, pipeline.model());
    for card in pipeline.cards(tree, traversal)? {
        deck.add_card(card);
    }
    info!(
        "Deck {} \"{}\": {} cards, {} media files",
        deck.id(),
        deck.title(),
        deck.cards().len(),
        deck.media().len()
    );

    let media: Vec<_> = match pipeline.work_dir() {
        Some(dir) => deck.media().iter().map(|name| dir.join(name)).collect(),
        None => Vec::new(),
    };
    Package::new(&deck, media.clone()).write_to_file(out)?;

    for path in &media {
        fs::remove_file(path)?;
        debug!("Removed {}", path.display());
    }
    Ok(deck)
}
