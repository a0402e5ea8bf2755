use crate::pgn::GameNode;

/// Identity key of a node, safe to use as a file stem.
///
/// The root is keyed by its FEN alone; every other node by its FEN joined with
/// the SAN of the move that reached it. Two move orders reaching the same
/// position through a different final move therefore get different keys.
pub fn node_hash(node: &GameNode) -> String {
    let key = match node.san() {
        Some(san) if !node.is_root() => format!("{}_{}", node.fen(), san),
        _ => node.fen(),
    };
    key.chars()
        .map(|c| if c == '/' || c.is_whitespace() { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pgn::GameTree;
    use shakmaty::Position;

    #[test]
    fn test_root_hash_is_fen() {
        let tree = GameTree::default();
        assert_eq!(
            node_hash(tree.node(tree.root())),
            "rnbqkbnr_pppppppp_8_8_8_8_PPPPPPPP_RNBQKBNR_w_KQkq_-_0_1"
        );
    }

    #[test]
    fn test_hash_includes_move() {
        let tree = GameTree::from_pgn("1. f3 *").unwrap();
        let f3 = tree.node(tree.root()).children()[0];
        assert_eq!(
            node_hash(tree.node(f3)),
            "rnbqkbnr_pppppppp_8_8_8_5P2_PPPPP1PP_RNBQKBNR_b_KQkq_-_0_1_f3"
        );
    }

    #[test]
    fn test_hash_is_stable() {
        let tree = GameTree::from_pgn("1. e4 e5 2. Nf3 *").unwrap();
        for id in tree.ids() {
            let node = tree.node(id);
            assert_eq!(node_hash(node), node_hash(node));
        }
    }

    #[test]
    fn test_hash_is_file_name_safe() {
        let tree = GameTree::from_pgn("1. e4 (1. d4 d5) e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O *").unwrap();
        for id in tree.ids() {
            let hash = node_hash(tree.node(id));
            assert!(!hash.contains('/'));
            assert!(!hash.chars().any(char::is_whitespace));
        }
    }

    #[test]
    fn test_sibling_moves_differ() {
        let tree = GameTree::from_pgn("1. e4 (1. d4) (1. c4) *").unwrap();
        let children = tree.node(tree.root()).children();
        assert_eq!(children.len(), 3);
        let hashes: Vec<_> = children.iter().map(|&id| node_hash(tree.node(id))).collect();
        assert_ne!(hashes[0], hashes[1]);
        assert_ne!(hashes[1], hashes[2]);
        assert_ne!(hashes[0], hashes[2]);
    }

    #[test]
    fn test_transpositions_are_kept_apart() {
        // Same final position, different last move.
        let tree = GameTree::from_pgn("1. e4 e5 2. Nf3 Nc6 (2... Nf6 3. Nc3 Nc6) 3. Nc3 Nf6 *").unwrap();
        let nodes: Vec<_> = tree.ids().map(|id| tree.node(id)).collect();
        let ending_nf6 = nodes.iter().find(|n| n.san() == Some("Nf6") && n.ply() == 6).unwrap();
        let ending_nc6 = nodes.iter().find(|n| n.san() == Some("Nc6") && n.ply() == 6).unwrap();
        assert_eq!(ending_nf6.position().board(), ending_nc6.position().board());
        assert_ne!(node_hash(ending_nf6), node_hash(ending_nc6));
    }
}
