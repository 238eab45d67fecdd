//! Tests for placement validation and commit
//!
//! Test categories:
//! - Anchor lookup
//! - Fit verdicts (bounds and overlap)
//! - Preview highlighting
//! - Commit and the placement token
//! - Scenarios on the classic 9x9 board

use block_drop::{
    commit, evaluate, test_helpers::*, CellPos, GridError, Piece, PieceId, PieceKind, Point,
    Verdict,
};

const VERTICAL_TRIPLE: &[&[u8]] = &[&[1, 0, 0], &[1, 0, 0], &[1, 0, 0]];

fn cells(list: &[(usize, usize)]) -> Vec<CellPos> {
    list.iter().map(|&p| CellPos::from(p)).collect()
}

// ============================================================================
// Anchor Tests
// ============================================================================

mod anchor {
    use super::*;

    #[test]
    fn anchor_is_cell_under_drag_position() {
        let mut grid = laid_out_grid(9, 9);
        let mut piece = dragged_at(&[&[1]], 4, 7);

        let verdict = evaluate(&mut piece, &mut grid).unwrap();

        assert_eq!(verdict.anchor(), Some(CellPos::new(4, 7)));
    }

    #[test]
    fn cell_edge_belongs_to_the_cell_starting_there() {
        let mut grid = laid_out_grid(9, 9);
        let mut piece = dragged_at(&[&[1]], 0, 0);
        // x = CELL_W is the right edge of column 0 and the left edge of column 1
        piece.move_to(Point::new(CELL_W, 3));

        let verdict = evaluate(&mut piece, &mut grid).unwrap();

        assert_eq!(verdict.anchor(), Some(CellPos::new(3, 1)));
    }

    #[test]
    fn unlaid_grid_has_no_anchor() {
        let mut grid = block_drop::Grid::new(9, 9);
        let mut piece = dragged_at(&[&[1]], 0, 0);

        assert_eq!(evaluate(&mut piece, &mut grid).unwrap(), Verdict::OffGrid);
    }
}

// ============================================================================
// Verdict Tests
// ============================================================================

mod verdict {
    use super::*;

    #[test]
    fn single_cell_fits_at_last_row_and_column() {
        let mut grid = laid_out_grid(9, 9);
        let mut piece = dragged_at(&[&[1]], 8, 8);

        let verdict = evaluate(&mut piece, &mut grid).unwrap();

        assert!(verdict.fits());
        assert!(piece.fits_current_position);
        assert_eq!(grid.highlighted_cells(), cells(&[(8, 8)]));
    }

    #[test]
    fn one_past_the_last_column_is_off_grid() {
        let mut grid = laid_out_grid(9, 9);
        let mut piece = dragged_at(&[&[1]], 0, 0);
        piece.move_to(point_in(8, 9));

        let verdict = evaluate(&mut piece, &mut grid).unwrap();

        assert_eq!(verdict, Verdict::OffGrid);
        assert!(!piece.fits_current_position);
    }

    #[test]
    fn overflow_past_right_edge_is_blocked() {
        let mut grid = laid_out_grid(9, 9);
        let mut piece = dragged_at(&[&[1, 1, 1]], 2, 7);

        let verdict = evaluate(&mut piece, &mut grid).unwrap();

        assert_eq!(
            verdict,
            Verdict::Blocked {
                anchor: CellPos::new(2, 7),
                conflicts: vec![],
                out_of_bounds: 1,
            }
        );
        assert_eq!(grid.highlighted_cells(), cells(&[(2, 7), (2, 8)]));
    }

    #[test]
    fn overlap_and_overflow_are_both_reported() {
        let mut grid = laid_out_grid(9, 9);
        occupy(&mut grid, &[(8, 4)]);
        let mut piece = dragged_at(&[&[1, 1], &[1, 1]], 7, 4);
        piece.move_to(point_in(8, 4));

        match evaluate(&mut piece, &mut grid).unwrap() {
            Verdict::Blocked {
                anchor,
                conflicts,
                out_of_bounds,
            } => {
                assert_eq!(anchor, CellPos::new(8, 4));
                assert_eq!(conflicts, cells(&[(8, 4)]));
                assert_eq!(out_of_bounds, 2);
            }
            other => panic!("expected blocked verdict, got {other:?}"),
        }
        assert_eq!(grid.highlighted_cells(), cells(&[(8, 5)]));
    }

    #[test]
    fn unfilled_sub_cells_may_hang_off_the_grid() {
        let mut grid = laid_out_grid(9, 9);
        // Only column 0 of the 3x3 matrix is filled
        let mut piece = dragged_at(VERTICAL_TRIPLE, 0, 8);

        assert!(evaluate(&mut piece, &mut grid).unwrap().fits());
    }

    #[test]
    fn unfilled_sub_cells_may_cover_occupied_cells() {
        let mut grid = laid_out_grid(9, 9);
        occupy(&mut grid, &[(1, 1)]);
        let mut piece = dragged_at(&[&[1, 1], &[1, 0]], 0, 0);

        assert!(evaluate(&mut piece, &mut grid).unwrap().fits());
        assert_eq!(grid.highlighted_cells(), cells(&[(0, 0), (0, 1), (1, 0)]));
    }
}

// ============================================================================
// Highlight Tests
// ============================================================================

mod highlighting {
    use super::*;

    #[test]
    fn moving_the_piece_clears_stale_highlights() {
        let mut grid = laid_out_grid(9, 9);
        let mut piece = dragged_at(&[&[1, 1]], 0, 0);
        evaluate(&mut piece, &mut grid).unwrap();

        piece.move_to(point_in(5, 5));
        evaluate(&mut piece, &mut grid).unwrap();

        assert_eq!(grid.highlighted_cells(), cells(&[(5, 5), (5, 6)]));
    }

    #[test]
    fn leaving_the_grid_clears_highlights() {
        let mut grid = laid_out_grid(9, 9);
        let mut piece = dragged_at(&[&[1, 1]], 0, 0);
        evaluate(&mut piece, &mut grid).unwrap();

        piece.move_to(Point::new(-5, -5));
        evaluate(&mut piece, &mut grid).unwrap();

        assert!(grid.highlighted_cells().is_empty());
    }

    #[test]
    fn evaluate_is_idempotent() {
        let mut grid = laid_out_grid(9, 9);
        occupy(&mut grid, &[(3, 4)]);
        let mut piece = dragged_at(&[&[1, 1, 1], &[0, 1, 0]], 2, 3);

        let first = evaluate(&mut piece, &mut grid).unwrap();
        let first_highlights = grid.highlighted_cells();
        let second = evaluate(&mut piece, &mut grid).unwrap();

        assert_eq!(first, second);
        assert_eq!(first_highlights, grid.highlighted_cells());
        assert!(!second.fits());
    }

    #[test]
    fn evaluate_never_changes_occupancy() {
        let mut grid = laid_out_grid(9, 9);
        occupy(&mut grid, &[(0, 0), (4, 4)]);
        let revision = grid.revision();
        let mut piece = dragged_at(&[&[1, 1], &[1, 1]], 3, 3);

        evaluate(&mut piece, &mut grid).unwrap();

        assert_eq!(grid.revision(), revision);
        assert_eq!(grid.occupied_cells(), cells(&[(0, 0), (4, 4)]));
    }
}

// ============================================================================
// Commit Tests
// ============================================================================

mod committing {
    use super::*;

    #[test]
    fn commit_occupies_exactly_the_highlighted_cells() {
        let mut grid = laid_out_grid(9, 9);
        occupy(&mut grid, &[(0, 0)]);
        let mut piece = dragged_at(&[&[1, 0], &[1, 1]], 4, 4);

        let placement = evaluate(&mut piece, &mut grid)
            .unwrap()
            .into_placement()
            .expect("piece should fit");
        let highlighted = grid.highlighted_cells();
        assert_eq!(placement.cells(), highlighted.as_slice());

        let filled = commit(placement, &mut grid).unwrap();

        assert_eq!(filled, 3);
        let mut expected = highlighted.clone();
        expected.insert(0, CellPos::new(0, 0));
        assert_eq!(grid.occupied_cells(), expected);
    }

    #[test]
    fn commit_leaves_highlights_in_place() {
        let mut grid = laid_out_grid(9, 9);
        let mut piece = dragged_at(&[&[1]], 2, 2);

        let placement = evaluate(&mut piece, &mut grid).unwrap().into_placement().unwrap();
        commit(placement, &mut grid).unwrap();

        assert_eq!(grid.highlighted_cells(), cells(&[(2, 2)]));
    }

    #[test]
    fn placed_cell_blocks_later_pieces() {
        let mut grid = laid_out_grid(9, 9);
        let mut first = dragged_at(&[&[1, 1]], 6, 6);
        let placement = evaluate(&mut first, &mut grid).unwrap().into_placement().unwrap();
        commit(placement, &mut grid).unwrap();

        let mut second = dragged_at(&[&[1], &[1]], 5, 7);
        let verdict = evaluate(&mut second, &mut grid).unwrap();

        assert!(!verdict.fits());
        assert_eq!(grid.highlighted_cells(), cells(&[(5, 7)]));
    }

    #[test]
    fn stale_placement_is_rejected() {
        let mut grid = laid_out_grid(9, 9);
        let mut piece = dragged_at(&[&[1, 1]], 0, 0);
        let placement = evaluate(&mut piece, &mut grid).unwrap().into_placement().unwrap();

        occupy(&mut grid, &[(0, 1)]);
        let err = commit(placement, &mut grid).unwrap_err();

        assert_eq!(err, GridError::StalePlacement { expected: 0, actual: 1 });
        assert_eq!(grid.occupied_cells(), cells(&[(0, 1)]));
    }

    #[test]
    fn placement_remembers_piece_and_anchor() {
        let mut grid = laid_out_grid(9, 9);
        let mut piece = Piece::from_kind(PieceId(42), PieceKind::Square);
        piece.begin_drag();
        piece.move_to(point_in(1, 2));

        let placement = evaluate(&mut piece, &mut grid).unwrap().into_placement().unwrap();

        assert_eq!(placement.piece(), PieceId(42));
        assert_eq!(placement.anchor(), CellPos::new(1, 2));
        assert_eq!(placement.cells(), cells(&[(1, 2), (1, 3), (2, 2), (2, 3)]).as_slice());
    }
}

// ============================================================================
// Scenarios
// ============================================================================

mod scenarios {
    use super::*;

    #[test]
    fn vertical_triple_fits_against_bottom_edge() {
        let mut grid = laid_out_grid(9, 9);
        let mut piece = dragged_at(VERTICAL_TRIPLE, 6, 0);

        let verdict = evaluate(&mut piece, &mut grid).unwrap();

        assert!(verdict.fits());
        assert_eq!(grid.highlighted_cells(), cells(&[(6, 0), (7, 0), (8, 0)]));
    }

    #[test]
    fn vertical_triple_one_row_lower_overflows() {
        let mut grid = laid_out_grid(9, 9);
        let mut piece = dragged_at(VERTICAL_TRIPLE, 7, 0);

        let verdict = evaluate(&mut piece, &mut grid).unwrap();

        assert!(!verdict.fits());
        assert_eq!(grid.highlighted_cells(), cells(&[(7, 0), (8, 0)]));
    }

    #[test]
    fn single_cell_on_occupied_cell_is_not_highlighted() {
        let mut grid = laid_out_grid(9, 9);
        occupy(&mut grid, &[(5, 5)]);
        let mut piece = dragged_at(&[&[1]], 5, 5);

        let verdict = evaluate(&mut piece, &mut grid).unwrap();

        assert!(!verdict.fits());
        assert!(grid.highlighted_cells().is_empty());
    }

    #[test]
    fn drag_outside_every_cell_highlights_nothing() {
        let mut grid = laid_out_grid(9, 9);
        let mut piece = dragged_at(VERTICAL_TRIPLE, 0, 0);
        piece.move_to(Point::new(500, 500));

        let verdict = evaluate(&mut piece, &mut grid).unwrap();

        assert_eq!(verdict, Verdict::OffGrid);
        assert!(grid.highlighted_cells().is_empty());
    }

    #[test]
    fn filling_the_board_with_big_squares() {
        let mut grid = laid_out_grid(9, 9);
        let mut placed = 0;
        for row in (0..9).step_by(3) {
            for col in (0..9).step_by(3) {
                let mut piece = Piece::from_kind(PieceId(placed), PieceKind::BigSquare);
                piece.begin_drag();
                piece.move_to(point_in(row, col));
                let placement = evaluate(&mut piece, &mut grid).unwrap().into_placement().unwrap();
                commit(placement, &mut grid).unwrap();
                placed += 1;
            }
        }

        assert_eq!(grid.occupied_count(), 81);
        let mut last = dragged_at(&[&[1]], 4, 4);
        assert!(!evaluate(&mut last, &mut grid).unwrap().fits());
    }
}
