//! Static evaluation: material count over every four-cell window.

use crate::game::{Board, Player, Window};

/// Score of one window for `player`: +1 per own piece, -1 per opponent piece.
fn score_window<const R: usize, const C: usize>(
    board: &Board<R, C>,
    window: Window,
    player: Player,
) -> i32 {
    let own = player.to_cell();
    let opp = player.other().to_cell();
    window
        .cells()
        .map(|(row, col)| match board.get(row, col) {
            c if c == own => 1,
            c if c == opp => -1,
            _ => 0,
        })
        .sum()
}

/// Sum of window scores for `player` across the whole board.
pub fn evaluate_player<const R: usize, const C: usize>(board: &Board<R, C>, player: Player) -> i32 {
    Board::<R, C>::windows()
        .map(|window| score_window(board, window, player))
        .sum()
}

/// Position score from `maximizer`'s point of view. Positive favours the
/// maximizer.
pub fn evaluate_board<const R: usize, const C: usize>(
    board: &Board<R, C>,
    maximizer: Player,
) -> i32 {
    evaluate_player(board, maximizer) - evaluate_player(board, maximizer.other())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::StandardBoard;

    #[test]
    fn empty_board_is_zero() {
        let board = StandardBoard::new();
        assert_eq!(evaluate_board(&board, Player::Red), 0);
        assert_eq!(evaluate_board(&board, Player::Yellow), 0);
    }

    #[test]
    fn score_is_antisymmetric() {
        let board: StandardBoard = "
            .......
            .......
            .......
            ..Y....
            ..RR...
            .RYYR..
            "
        .parse()
        .unwrap();
        assert_eq!(
            evaluate_board(&board, Player::Red),
            -evaluate_board(&board, Player::Yellow)
        );
    }

    #[test]
    fn single_piece_counts_its_windows() {
        // A bottom-left piece belongs to one horizontal, one vertical and one
        // diagonal window.
        let mut board = StandardBoard::new();
        board.apply_move(0, Player::Red).unwrap();
        assert_eq!(evaluate_player(&board, Player::Red), 3);
        assert_eq!(evaluate_player(&board, Player::Yellow), -3);
        assert_eq!(evaluate_board(&board, Player::Red), 6);
    }

    #[test]
    fn center_piece_outscores_edge_piece() {
        let mut center = StandardBoard::new();
        center.apply_move(3, Player::Red).unwrap();
        let mut edge = StandardBoard::new();
        edge.apply_move(0, Player::Red).unwrap();

        let score_center = evaluate_board(&center, Player::Red);
        let score_edge = evaluate_board(&edge, Player::Red);
        assert!(
            score_center > score_edge,
            "Center ({score_center}) should score higher than edge ({score_edge})"
        );
    }
}
