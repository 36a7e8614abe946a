//! Tests for the tic-tac-toe engine and pair keys.

use strictly_rollup::{
    Address, Board, GameRegistry, GameState, Mark, MoveError, PairKey, Position, RoundOutcome,
    Square,
};

fn alice() -> Address {
    "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap()
}

fn bob() -> Address {
    "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".parse().unwrap()
}

#[test]
fn test_pair_key_symmetric_for_many_pairs() {
    let addresses: Vec<Address> = (1u8..=6)
        .map(|n| Address::from_bytes([n.wrapping_mul(37); 20]))
        .collect();
    for a in &addresses {
        for b in &addresses {
            assert_eq!(PairKey::new(a, b), PairKey::new(b, a));
        }
    }
}

#[test]
fn test_top_row_win_scenario() {
    let mut game = GameState::new(alice(), bob());
    let moves = [
        (alice(), 0, 0),
        (bob(), 1, 1),
        (alice(), 0, 1),
        (bob(), 2, 2),
    ];
    for (mover, row, col) in moves {
        let outcome = game.play(&mover, row, col).expect("Valid move");
        assert!(matches!(outcome, RoundOutcome::Continue { .. }));
    }

    let outcome = game.play(&alice(), 0, 2).expect("Winning move");
    assert_eq!(
        outcome,
        RoundOutcome::Won {
            placement: strictly_rollup::Placement {
                mover: alice(),
                position: Position::TopRight,
                mark: Mark::X,
                turn_count: 5,
            },
            winner: alice(),
        }
    );

    assert_eq!(game.score_of(&alice()), 1);
    assert_eq!(game.score_of(&bob()), 0);
    assert_eq!(*game.board(), Board::new());
    assert_eq!(*game.turn_count(), 0);
    assert_eq!(*game.current_turn(), None);
    assert_eq!(*game.games_count(), 1);
}

#[test]
fn test_turn_alternation_on_fresh_game() {
    let mut game = GameState::new(alice(), bob());

    game.play(&bob(), 2, 0).expect("Either player may open");
    assert_eq!(game.board().get(Position::BottomLeft), Square::Occupied(Mark::X));
    assert_eq!(*game.current_turn(), Some(alice()));

    game.play(&alice(), 0, 0).expect("Second move");
    assert_eq!(game.board().get(Position::TopLeft), Square::Occupied(Mark::O));
    assert_eq!(*game.turn_count(), 2);
}

#[test]
fn test_rejections_leave_state_unchanged() {
    let mut game = GameState::new(alice(), bob());
    game.play(&alice(), 1, 1).expect("Opening move");
    let snapshot = game.clone();

    assert!(matches!(
        game.play(&alice(), 0, 0),
        Err(MoveError::NotYourTurn { .. })
    ));
    assert_eq!(game, snapshot);

    assert_eq!(
        game.play(&bob(), 1, 1),
        Err(MoveError::SlotTaken(Position::Center))
    );
    assert_eq!(game, snapshot);

    assert_eq!(
        game.play(&bob(), 0, -1),
        Err(MoveError::OutOfBounds { row: 0, col: -1 })
    );
    assert_eq!(game, snapshot);
}

#[test]
fn test_score_accumulates_across_rounds() {
    let mut registry = GameRegistry::new();
    for _ in 0..2 {
        for (mover, opponent, row, col) in [
            (alice(), bob(), 0, 0),
            (bob(), alice(), 1, 0),
            (alice(), bob(), 1, 1),
            (bob(), alice(), 2, 0),
            (alice(), bob(), 2, 2),
        ] {
            registry.play(&mover, &opponent, row, col).expect("Valid move");
        }
    }

    let game = registry.get(&alice(), &bob()).expect("Game exists");
    assert_eq!(game.score_of(&alice()), 2);
    assert_eq!(*game.games_count(), 2);
}
