use std::{path::PathBuf, process::ExitCode};

use clap::Parser;

use ankichess_lib::{logging, render::PIXEL_SIZE, run, GenerateOptions};

/// Generate an Anki deck from a game in a PGN file.
#[derive(Parser, Debug)]
#[command(name = "ankichess", version, about)]
struct Args {
    /// PGN file to read
    #[arg(value_name = "PGN_FILE")]
    pgn: PathBuf,

    /// Path of the .apkg to write
    #[arg(value_name = "OUT_FILE")]
    out: PathBuf,

    /// Deck title
    #[arg(value_name = "TITLE")]
    title: String,

    /// Only quiz the main line
    #[arg(long)]
    mainline: bool,

    /// Text-only cards without diagrams, implies --mainline
    #[arg(long)]
    blindfold: bool,

    /// 1-based index of the game in the file
    #[arg(long, value_name = "NUM", default_value_t = 1, allow_negative_numbers = true)]
    game: i64,

    /// Diagram size in pixels
    #[arg(long, value_name = "PX", default_value_t = PIXEL_SIZE)]
    size: u32,
}

impl Args {
    fn options(&self) -> GenerateOptions {
        GenerateOptions {
            blindfold: self.blindfold,
            mainline: self.mainline,
            pixel_size: self.size,
            work_dir: None,
        }
    }
}

fn execute(args: &Args) -> ExitCode {
    match run(&args.pgn, args.game, &args.out, &args.title, &args.options()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    logging::init();
    execute(&Args::parse())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ankichess_lib::Traversal;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["ankichess", "games.pgn", "out.apkg", "Title"]).unwrap();
        assert_eq!(args.game, 1);
        assert_eq!(args.size, PIXEL_SIZE);
        assert_eq!(args.options(), GenerateOptions::default());
    }

    #[test]
    fn test_negative_game_accepted() {
        let args =
            Args::try_parse_from(["ankichess", "games.pgn", "out.apkg", "Title", "--game", "-1"])
                .unwrap();
        assert_eq!(args.game, -1);
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "ankichess",
            "games.pgn",
            "out.apkg",
            "Title",
            "--blindfold",
            "--size",
            "200",
        ])
        .unwrap();
        let options = args.options();
        assert!(options.blindfold);
        assert_eq!(options.pixel_size, 200);
        assert_eq!(options.traversal(), Traversal::Mainline);
    }

    #[test]
    fn test_missing_title_rejected() {
        assert!(Args::try_parse_from(["ankichess", "games.pgn", "out.apkg"]).is_err());
    }

    #[test]
    fn test_failures_exit_non_zero() {
        let scratch = tempfile::tempdir().unwrap();
        let out = scratch.path().join("out.apkg");
        let missing = scratch.path().join("missing.pgn");
        let args = Args::try_parse_from([
            "ankichess",
            missing.to_str().unwrap(),
            out.to_str().unwrap(),
            "Title",
        ])
        .unwrap();
        assert_eq!(execute(&args), ExitCode::FAILURE);

        let pgn = scratch.path().join("games.pgn");
        std::fs::write(&pgn, "1. f3 e6 2. g4 Qh4# 0-1\n").unwrap();
        let args = Args::try_parse_from([
            "ankichess",
            pgn.to_str().unwrap(),
            out.to_str().unwrap(),
            "Title",
            "--blindfold",
            "--game",
            "-1",
        ])
        .unwrap();
        assert_eq!(execute(&args), ExitCode::FAILURE);
        assert!(!out.exists());

        let args = Args::try_parse_from([
            "ankichess",
            pgn.to_str().unwrap(),
            out.to_str().unwrap(),
            "Title",
            "--blindfold",
        ])
        .unwrap();
        assert_eq!(execute(&args), ExitCode::SUCCESS);
        assert!(out.exists());
    }
}
