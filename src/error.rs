use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("could not find pgn file {}", .0.display())]
    PgnNotFound(PathBuf),

    #[error("could not load game {index} from pgn file {}", path.display())]
    GameIndexOutOfRange { index: i64, path: PathBuf },

    #[error("no game found in pgn input")]
    NoGame,

    #[error("illegal move {0}")]
    IllegalMove(String),

    #[error(transparent)]
    FenError(#[from] shakmaty::fen::ParseFenError),

    #[error(transparent)]
    PositionError(#[from] shakmaty::PositionError<shakmaty::Chess>),

    #[error("work directory {} already exists", .0.display())]
    WorkDirExists(PathBuf),

    #[error("failed to render diagram: {0}")]
    Render(String),

    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Rusqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, Error>;
