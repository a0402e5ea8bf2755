//! Anki flashcards from chess PGN files.
//!
//! A game is read into a [`pgn::GameTree`], its answer nodes are selected by a
//! [`traversal::Traversal`], turned into [`cards::Card`]s and written as an
//! `.apkg` deck by [`deck::generate`].

pub mod cards;
pub mod config;
pub mod deck;
pub mod error;
pub mod identity;
pub mod logging;
pub mod pgn;
pub mod render;
pub mod traversal;
pub mod workdir;

pub use cards::{ArtifactCache, Card, CardPipeline, DiagramPipeline};
pub use config::{CardMode, GenerateOptions};
pub use deck::{generate, Deck};
pub use error::{Error, Result};
pub use identity::node_hash;
pub use pgn::{count_games, load_game, GameNode, GameTree, NodeId};
pub use render::{DiagramRenderer, SvgRenderer};
pub use traversal::Traversal;
pub use workdir::WorkDir;

use std::path::Path;

use log::warn;

/// Loads game `index` from `pgn` and writes its deck to `out`.
pub fn run(
    pgn: &Path,
    index: i64,
    out: &Path,
    title: &str,
    options: &GenerateOptions,
) -> Result<Deck> {
    let tree = load_game(pgn, index)?;
    if tree.is_empty() {
        warn!("Game {} in {} has no moves", index, pgn.display());
    }

    match options.card_mode() {
        CardMode::Notation => {
            let mut pipeline: CardPipeline<SvgRenderer> = CardPipeline::Notation;
            generate(&tree, out, title, options.traversal(), &mut pipeline)
        }
        CardMode::Diagram => {
            let work_dir = WorkDir::create(options.work_dir())?;
            let renderer = SvgRenderer::new(options.pixel_size);
            let mut pipeline = CardPipeline::Diagram(DiagramPipeline::new(renderer, work_dir.path()));
            let deck = generate(&tree, out, title, options.traversal(), &mut pipeline)?;
            work_dir.remove()?;
            Ok(deck)
        }
    }
}
