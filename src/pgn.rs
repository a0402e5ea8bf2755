//! Game trees read from PGN records.
//!
//! Nodes live in an arena owned by [`GameTree`]. Children are stored top-down
//! as [`NodeId`]s and the parent link is a plain index, so the tree owns every
//! node exactly once.

use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use log::{debug, info, warn};
use pgn_reader::{BufferedReader, RawHeader, Skip, Visitor};
use shakmaty::{
    fen::Fen,
    san::{San, SanPlus},
    CastlingMode, Chess, Color, EnPassantMode, Move, Position,
};

use crate::error::{Error, Result};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct GameNode {
    position: Chess,
    last_move: Option<Move>,
    san: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    ply: u32,
}

impl GameNode {
    pub fn position(&self) -> &Chess {
        &self.position
    }

    /// Canonical board-state descriptor of this node.
    pub fn fen(&self) -> String {
        Fen::from_setup(self.position.clone().into_setup(EnPassantMode::Legal)).to_string()
    }

    /// The move that led here, `None` for the root.
    pub fn last_move(&self) -> Option<&Move> {
        self.last_move.as_ref()
    }

    /// SAN of the move that led here, including any check or mate suffix.
    pub fn san(&self) -> Option<&str> {
        self.san.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn ply(&self) -> u32 {
        self.ply
    }

    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct GameTree {
    nodes: Vec<GameNode>,
    headers: Vec<(String, String)>,
}

impl Default for GameTree {
    fn default() -> Self {
        Self::new(Chess::default())
    }
}

impl GameTree {
    pub fn new(start: Chess) -> Self {
        let ply = start_ply(&start);
        Self {
            nodes: vec![GameNode {
                position: start,
                last_move: None,
                san: None,
                parent: None,
                children: Vec::new(),
                ply,
            }],
            headers: Vec::new(),
        }
    }

    /// Builds the tree of the first record in `pgn`.
    pub fn from_pgn(pgn: &str) -> Result<Self> {
        let mut reader = BufferedReader::new_cursor(pgn.as_bytes());
        let mut builder = TreeBuilder::default();
        reader.read_game(&mut builder)?.ok_or(Error::NoGame)?
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &GameNode {
        &self.nodes[id.0]
    }

    /// Every node id in insertion order, root first.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Number of positions, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the record holds no moves.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Plays `san` from `parent` and appends the resulting node as its last child.
    pub fn play(&mut self, parent: NodeId, san: &San) -> Result<NodeId> {
        let mut position = self.nodes[parent.0].position.clone();
        let mv = san
            .to_move(&position)
            .map_err(|e| Error::IllegalMove(format!("{}: {}", san, e)))?;
        let san_plus = SanPlus::from_move_and_play_unchecked(&mut position, &mv);
        Ok(self.add_child(parent, position, mv, san_plus.to_string()))
    }

    fn add_child(&mut self, parent: NodeId, position: Chess, mv: Move, san: String) -> NodeId {
        let id = NodeId(self.nodes.len());
        let ply = self.nodes[parent.0].ply + 1;
        self.nodes.push(GameNode {
            position,
            last_move: Some(mv),
            san: Some(san),
            parent: Some(parent),
            children: Vec::new(),
            ply,
        });
        self.nodes[parent.0].children.push(id);
        id
    }
}

fn start_ply(position: &Chess) -> u32 {
    let black = u32::from(position.turn() == Color::Black);
    2 * (position.fullmoves().get() - 1) + black
}

/// Visitor that builds a [`GameTree`] from one PGN record.
///
/// A SAN that cannot be played is reported and the rest of its line is
/// dropped until the enclosing variation closes.
#[derive(Default)]
struct TreeBuilder {
    tree: GameTree,
    current: NodeId,
    lines: Vec<NodeId>,
    broken_at: Option<usize>,
    error: Option<Error>,
}

impl Visitor for TreeBuilder {
    type Result = crate::error::Result<GameTree>;

    fn begin_game(&mut self) {
        *self = Self::default();
    }

    fn header(&mut self, key: &[u8], value: RawHeader<'_>) {
        let key = String::from_utf8_lossy(key).into_owned();
        if key == "FEN" {
            match Fen::from_ascii(value.as_bytes()) {
                Ok(fen) => match fen.into_position::<Chess>(CastlingMode::Standard) {
                    Ok(position) => {
                        let headers = std::mem::take(&mut self.tree.headers);
                        self.tree = GameTree::new(position);
                        self.tree.headers = headers;
                    }
                    Err(e) => self.error = Some(e.into()),
                },
                Err(e) => self.error = Some(e.into()),
            }
        }
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        self.tree.headers.push((key, value));
    }

    fn end_headers(&mut self) -> Skip {
        Skip(self.error.is_some())
    }

    fn san(&mut self, san_plus: SanPlus) {
        if self.broken_at.is_some() || self.error.is_some() {
            return;
        }
        match self.tree.play(self.current, &san_plus.san) {
            Ok(id) => self.current = id,
            Err(e) => {
                warn!("{}, skipping the rest of this line", e);
                self.broken_at = Some(self.lines.len());
            }
        }
    }

    fn begin_variation(&mut self) -> Skip {
        self.lines.push(self.current);
        if self.broken_at.is_none() {
            self.current = self.tree.node(self.current).parent().unwrap_or(self.current);
        }
        Skip(false)
    }

    fn end_variation(&mut self) {
        if let Some(id) = self.lines.pop() {
            self.current = id;
        }
        if self.broken_at.is_some_and(|depth| self.lines.len() < depth) {
            self.broken_at = None;
        }
    }

    fn end_game(&mut self) -> Self::Result {
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(std::mem::take(&mut self.tree)),
        }
    }
}

/// Visitor that only skims records, used to step over earlier games.
struct Skimmer;

impl Visitor for Skimmer {
    type Result = ();

    fn end_headers(&mut self) -> Skip {
        Skip(true)
    }

    fn end_game(&mut self) -> Self::Result {}
}

fn open_pgn(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::PgnNotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })
}

/// Reads the `index`-th record (1-based) from `reader`.
///
/// Returns `Ok(None)` when `index` is not positive or the input holds fewer
/// records.
pub fn read_game_at<R: Read>(reader: R, index: i64) -> Result<Option<GameTree>> {
    if index < 1 {
        return Ok(None);
    }
    let mut reader = BufferedReader::new(reader);
    for _ in 1..index {
        if reader.read_game(&mut Skimmer)?.is_none() {
            return Ok(None);
        }
    }
    let mut builder = TreeBuilder::default();
    reader.read_game(&mut builder)?.transpose()
}

/// Loads the `index`-th game (1-based) of the PGN file at `path`.
pub fn load_game(path: &Path, index: i64) -> Result<GameTree> {
    let file = open_pgn(path)?;
    let Some(tree) = read_game_at(file, index)? else {
        if let Ok(count) = count_games(path) {
            debug!("{} holds {} games", path.display(), count);
        }
        return Err(Error::GameIndexOutOfRange {
            index,
            path: path.to_path_buf(),
        });
    };
    info!(
        "Loaded game {} from {} ({} positions)",
        index,
        path.display(),
        tree.len()
    );
    if let Some(event) = tree.header("Event") {
        debug!("Event: {}", event);
    }
    Ok(tree)
}

/// Counts the records in the PGN file at `path`.
pub fn count_games(path: &Path) -> Result<usize> {
    let mut reader = BufferedReader::new(open_pgn(path)?);
    let mut count = 0;
    while reader.read_game(&mut Skimmer)?.is_some() {
        count += 1;
    }
    Ok(count)
}
