use std::path::PathBuf;

use crate::{render::PIXEL_SIZE, traversal::Traversal, workdir::WorkDir};

/// How questions and answers are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardMode {
    /// Board diagrams before and after the move.
    Diagram,
    /// Move numbers and SAN only.
    Notation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Notation cards only. Implies `mainline`.
    pub blindfold: bool,
    pub mainline: bool,
    pub pixel_size: u32,
    /// Where diagrams are staged. Defaults to [`WorkDir::default_path`].
    pub work_dir: Option<PathBuf>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            blindfold: false,
            mainline: false,
            pixel_size: PIXEL_SIZE,
            work_dir: None,
        }
    }
}

impl GenerateOptions {
    pub fn card_mode(&self) -> CardMode {
        if self.blindfold {
            CardMode::Notation
        } else {
            CardMode::Diagram
        }
    }

    pub fn work_dir(&self) -> PathBuf {
        self.work_dir.clone().unwrap_or_else(WorkDir::default_path)
    }

    pub fn traversal(&self) -> Traversal {
        if self.mainline || self.blindfold {
            Traversal::Mainline
        } else {
            Traversal::AllVariations
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GenerateOptions::default();
        assert_eq!(options.card_mode(), CardMode::Diagram);
        assert_eq!(options.traversal(), Traversal::AllVariations);
        assert_eq!(options.pixel_size, 400);
    }

    #[test]
    fn test_blindfold_implies_mainline() {
        let options = GenerateOptions {
            blindfold: true,
            ..Default::default()
        };
        assert_eq!(options.card_mode(), CardMode::Notation);
        assert_eq!(options.traversal(), Traversal::Mainline);
    }

    #[test]
    fn test_mainline_keeps_diagrams() {
        let options = GenerateOptions {
            mainline: true,
            ..Default::default()
        };
        assert_eq!(options.card_mode(), CardMode::Diagram);
        assert_eq!(options.traversal(), Traversal::Mainline);
    }
}
