use board::component::{CastleSide, Color, DrawKind, Move, PieceKind, Position};
use board::error::{ErrorKind, MoveError};
use board::loader::load_from_ascii;
use board::logic::board::ChessBoard;
use board::logic::game::{GameState, GameStatus};
use board::logic::movement::all_legal_moves;
use board::logic::status::is_in_check;

fn mv(from: &str, to: &str) -> Move {
    Move::parse(from, to).unwrap()
}

fn play(state: &GameState, moves: &[(&str, &str)]) -> GameState {
    moves.iter().fold(state.clone(), |state, (from, to)| {
        state.submit_move(mv(from, to)).unwrap().0
    })
}

#[test]
fn italian_opening_keeps_castling_rights() {
    let state = play(
        &GameState::new(),
        &[("e2", "e4"), ("e7", "e5"), ("f1", "c4"), ("b8", "c6")],
    );

    assert_eq!(state.current_turn, Color::White);
    assert_eq!(state.move_count, 4);
    assert_eq!(state.board.en_passant, None);
    assert!(state.board.castling.get(Color::White, CastleSide::Kingside));
    assert!(state.board.castling.get(Color::Black, CastleSide::Kingside));
    assert_eq!(state.status, GameStatus::InProgress);
    assert!(
        state
            .board
            .pieces()
            .all(|(_, piece)| !piece.is_en_passant_target)
    );
}

#[test]
fn turn_alternates_and_wrong_side_is_rejected() {
    let state = GameState::new();
    let err = state.submit_move(mv("e7", "e5")).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::Move(MoveError::WrongTurn {
            expected: Color::White,
            ..
        })
    ));

    let (state, _) = state.submit_move(mv("e2", "e4")).unwrap();
    assert_eq!(state.current_turn, Color::Black);
    assert!(state.submit_move(mv("d2", "d4")).is_err());
}

#[test]
fn illegal_geometry_is_rejected_without_mutation() {
    let state = GameState::new();
    let before = state.clone();
    let err = state.submit_move(mv("e2", "e5")).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Move(MoveError::Illegal { .. })));
    assert_eq!(state, before);
    assert!(state.submit_move(mv("e4", "e5")).is_err());
}

#[test]
fn fools_mate() {
    let state = play(
        &GameState::new(),
        &[("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")],
    );
    assert!(state.in_check);
    assert!(state.is_checkmate());
    assert_eq!(
        state.status,
        GameStatus::Checkmate {
            winner: Color::Black
        }
    );
    // 將死代表沒有任何走法能解除將軍
    assert!(all_legal_moves(&state.board, Color::White).is_empty());
    assert!(is_in_check(&state.board, Color::White));

    let err = state.submit_move(mv("a2", "a3")).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Move(MoveError::GameFinished)));
}

#[test]
fn en_passant_only_on_next_ply() {
    let state = play(
        &GameState::new(),
        &[("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5")],
    );
    assert_eq!(state.board.en_passant, Position::from_algebraic("d6"));
    let (captured, outcome) = state.submit_move(mv("e5", "d6")).unwrap();
    assert!(outcome.is_capture());
    assert_eq!(captured.board.piece_count(), state.board.piece_count() - 1);

    let later = play(&state, &[("h2", "h3"), ("h7", "h6")]);
    let err = later.submit_move(mv("e5", "d6")).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Move(MoveError::Illegal { .. })));
}

#[test]
fn stalemate_is_a_draw() {
    let board = load_from_ascii(
        r#"
        k . . . . . . .
        . . . . . . . .
        . K . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . Q . . . . .
        "#,
    )
    .unwrap();
    let state = GameState::from_board(board, Color::White);
    let (state, _) = state.submit_move(mv("c1", "c7")).unwrap();
    assert!(state.is_stalemate());
    assert!(!state.in_check);
    assert!(state.is_over());
}

#[test]
fn fifty_move_rule() {
    let board = load_from_ascii(
        r#"
        k . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        r . . . . . . .
        . . . . . . . K
        "#,
    )
    .unwrap();
    let mut state = GameState::from_board(board, Color::White);
    state.halfmove_clock = 98;
    let (state, _) = state.submit_move(mv("h1", "g1")).unwrap();
    assert_eq!(state.status, GameStatus::InProgress);
    let (state, _) = state.submit_move(mv("a2", "a3")).unwrap();
    assert_eq!(
        state.status,
        GameStatus::Draw {
            kind: DrawKind::FiftyMoveRule
        }
    );
}

#[test]
fn promotion_through_game_state() {
    let board = load_from_ascii(
        r#"
        . . . . . . . k
        . P . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . . . . .
        . . . . K . . .
        "#,
    )
    .unwrap();
    let state = GameState::from_board(board, Color::White);
    let (state, outcome) = state
        .submit_move(mv("b7", "b8").with_promotion(PieceKind::Knight))
        .unwrap();
    assert_eq!(outcome.promoted_to, Some(PieceKind::Knight));
    assert_eq!(state.halfmove_clock, 0);
    let b8 = Position::from_algebraic("b8").unwrap();
    assert_eq!(state.board.get(b8).map(|p| p.kind), Some(PieceKind::Knight));
}

#[test]
fn larger_board_keeps_chess_rules() {
    let state = GameState::from_board(ChessBoard::standard_with_size(10).unwrap(), Color::White);
    // 十格棋盤上八個行置中，b..i 行
    let moves = all_legal_moves(&state.board, Color::White);
    assert_eq!(moves.len(), 24);
    let (state, _) = state
        .submit_move(Move::new(Position::new(1, 1), Position::new(3, 1)))
        .unwrap();
    assert_eq!(state.board.en_passant, Some(Position::new(2, 1)));
}

#[test]
fn snapshot_round_trips_through_json() {
    let state = play(&GameState::new(), &[("e2", "e4"), ("d7", "d5")]);
    let json = serde_json::to_string(&state).unwrap();
    let restored: GameState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, state);
}
