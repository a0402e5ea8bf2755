use quick_xml::{events::BytesText, Writer};
use shakmaty::{uci::UciMove, CastlingMode, Chess, Color, File, Move, Piece, Position, Rank, Role, Square};

use crate::error::{Error, Result};

/// Default width and height of a rendered diagram.
pub const PIXEL_SIZE: u32 = 400;

const MARGIN: u32 = 15;
const SQUARE: u32 = 45;
const BOARD: u32 = 2 * MARGIN + 8 * SQUARE;

const LIGHT: &str = "#ffce9e";
const DARK: &str = "#d18b47";
const LIGHT_LASTMOVE: &str = "#cdd16a";
const DARK_LASTMOVE: &str = "#aaa23b";
const BORDER: &str = "#212121";
const COORD: &str = "#e5e5e5";

/// Turns a position into a diagram document.
pub trait DiagramRenderer {
    fn render(&mut self, position: &Chess, last_move: Option<&Move>) -> Result<String>;
}

/// Renders diagrams as standalone SVG documents, White at the bottom.
#[derive(Debug, Clone, Copy)]
pub struct SvgRenderer {
    size: u32,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new(PIXEL_SIZE)
    }
}

impl SvgRenderer {
    pub fn new(size: u32) -> Self {
        Self { size }
    }
}

impl DiagramRenderer for SvgRenderer {
    fn render(&mut self, position: &Chess, last_move: Option<&Move>) -> Result<String> {
        let highlighted = last_move.map(highlighted_squares).unwrap_or_default();
        let board = position.board();
        let size = self.size.to_string();
        let view_box = format!("0 0 {} {}", BOARD, BOARD);

        let mut writer = Writer::new(Vec::new());
        writer
            .create_element("svg")
            .with_attribute(("xmlns", "http://www.w3.org/2000/svg"))
            .with_attribute(("version", "1.2"))
            .with_attribute(("viewBox", view_box.as_str()))
            .with_attribute(("width", size.as_str()))
            .with_attribute(("height", size.as_str()))
            .write_inner_content(|w| {
                let edge = BOARD.to_string();
                w.create_element("rect")
                    .with_attribute(("x", "0"))
                    .with_attribute(("y", "0"))
                    .with_attribute(("width", edge.as_str()))
                    .with_attribute(("height", edge.as_str()))
                    .with_attribute(("fill", BORDER))
                    .write_empty()?;

                for rank in Rank::ALL {
                    for file in File::ALL {
                        let square = Square::from_coords(file, rank);
                        let (x, y) = origin(square);
                        let light = (u32::from(file) + u32::from(rank)) % 2 == 1;
                        let fill = match (light, highlighted.contains(&square)) {
                            (true, false) => LIGHT,
                            (false, false) => DARK,
                            (true, true) => LIGHT_LASTMOVE,
                            (false, true) => DARK_LASTMOVE,
                        };
                        let (x, y, edge) = (x.to_string(), y.to_string(), SQUARE.to_string());
                        w.create_element("rect")
                            .with_attribute(("x", x.as_str()))
                            .with_attribute(("y", y.as_str()))
                            .with_attribute(("width", edge.as_str()))
                            .with_attribute(("height", edge.as_str()))
                            .with_attribute(("fill", fill))
                            .write_empty()?;
                    }
                }

                for (i, (file, rank)) in File::ALL.into_iter().zip(Rank::ALL).enumerate() {
                    let offset = (MARGIN + SQUARE * i as u32 + SQUARE / 2).to_string();
                    let low = (MARGIN / 2).to_string();
                    let high = (BOARD - MARGIN / 2).to_string();
                    coordinate(w, &offset, &low, file.char())?;
                    coordinate(w, &offset, &high, file.char())?;
                    let row = (MARGIN + SQUARE * (7 - i as u32) + SQUARE / 2).to_string();
                    coordinate(w, &low, &row, rank.char())?;
                    coordinate(w, &high, &row, rank.char())?;
                }

                for square in Square::ALL {
                    let Some(piece) = board.piece_at(square) else {
                        continue;
                    };
                    let (x, y) = origin(square);
                    let (x, y) = ((x + SQUARE / 2).to_string(), (y + SQUARE / 2).to_string());
                    let glyph = glyph(piece).to_string();
                    w.create_element("text")
                        .with_attribute(("x", x.as_str()))
                        .with_attribute(("y", y.as_str()))
                        .with_attribute(("font-size", "38"))
                        .with_attribute(("text-anchor", "middle"))
                        .with_attribute(("dominant-baseline", "central"))
                        .with_attribute(("fill", "#000000"))
                        .write_text_content(BytesText::new(&glyph))?;
                }
                Ok::<(), quick_xml::Error>(())
            })?;

        String::from_utf8(writer.into_inner()).map_err(|e| Error::Render(e.to_string()))
    }
}

/// Top-left corner of `square` in board coordinates.
fn origin(square: Square) -> (u32, u32) {
    let file = u32::from(square.file());
    let rank = u32::from(square.rank());
    (MARGIN + SQUARE * file, MARGIN + SQUARE * (7 - rank))
}

// Castling is shown king-to-destination, not king-takes-rook.
fn highlighted_squares(mv: &Move) -> Vec<Square> {
    match mv.to_uci(CastlingMode::Standard) {
        UciMove::Normal { from, to, .. } => vec![from, to],
        UciMove::Put { to, .. } => vec![to],
        UciMove::Null => Vec::new(),
    }
}

fn coordinate(w: &mut Writer<Vec<u8>>, x: &str, y: &str, label: char) -> quick_xml::Result<()> {
    let label = label.to_string();
    w.create_element("text")
        .with_attribute(("x", x))
        .with_attribute(("y", y))
        .with_attribute(("font-size", "10"))
        .with_attribute(("text-anchor", "middle"))
        .with_attribute(("dominant-baseline", "central"))
        .with_attribute(("fill", COORD))
        .write_text_content(BytesText::new(&label))?;
    Ok(())
}

fn glyph(piece: Piece) -> char {
    match (piece.color, piece.role) {
        (Color::White, Role::King) => '♔',
        (Color::White, Role::Queen) => '♕',
        (Color::White, Role::Rook) => '♖',
        (Color::White, Role::Bishop) => '♗',
        (Color::White, Role::Knight) => '♘',
        (Color::White, Role::Pawn) => '♙',
        (Color::Black, Role::King) => '♚',
        (Color::Black, Role::Queen) => '♛',
        (Color::Black, Role::Rook) => '♜',
        (Color::Black, Role::Bishop) => '♝',
        (Color::Black, Role::Knight) => '♞',
        (Color::Black, Role::Pawn) => '♟',
    }
}
