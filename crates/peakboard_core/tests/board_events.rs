use peakboard_core::db::open_db_in_memory;
use peakboard_core::{
    AccountStore, Board, BoardEvent, CardDraft, CardStatus, CardStore, SqliteKvStore,
};
use uuid::Uuid;

#[test]
fn dispatch_routes_submit_drop_and_delete() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);
    AccountStore::new(store)
        .register("Ana", "ana@example.com", "pw")
        .unwrap();
    let board = Board::new(CardStore::new(store));

    let view = board
        .dispatch(BoardEvent::Submit(CardDraft::new("Acme")))
        .unwrap();
    assert_eq!(view.card_count(), 1);
    let card = view.column(CardStatus::New)[0].clone();

    let dropped_on: CardStatus = "in-progress".parse().unwrap();
    let view = board
        .dispatch(BoardEvent::Drop {
            card_id: card.id,
            status: dropped_on,
        })
        .unwrap();
    assert!(view.column(CardStatus::New).is_empty());
    assert_eq!(view.column(CardStatus::InProgress)[0].name, "Acme");

    let view = board.dispatch(BoardEvent::Delete(card.id)).unwrap();
    assert_eq!(view.card_count(), 0);
    assert_eq!(view.columns.len(), CardStatus::ALL.len());
}

#[test]
fn dropping_unknown_card_leaves_board_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);
    AccountStore::new(store)
        .register("Ana", "ana@example.com", "pw")
        .unwrap();
    let board = Board::new(CardStore::new(store));
    board
        .dispatch(BoardEvent::Submit(CardDraft::new("Acme")))
        .unwrap();
    let before = board.view().unwrap();

    let after = board
        .dispatch(BoardEvent::Drop {
            card_id: Uuid::new_v4(),
            status: CardStatus::Closed,
        })
        .unwrap();
    assert_eq!(after, before);
}

#[test]
fn view_without_session_has_empty_columns() {
    let conn = open_db_in_memory().unwrap();
    let board = Board::new(CardStore::new(SqliteKvStore::new(&conn)));

    let view = board.view().unwrap();
    assert_eq!(view.columns.len(), CardStatus::ALL.len());
    assert_eq!(view.card_count(), 0);
}

#[test]
fn stale_edit_after_delete_does_not_resurrect_card() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);
    AccountStore::new(store)
        .register("Ana", "ana@example.com", "pw")
        .unwrap();
    let board = Board::new(CardStore::new(store));

    let view = board
        .dispatch(BoardEvent::Submit(CardDraft::new("Acme")))
        .unwrap();
    let card_id = view.column(CardStatus::New)[0].id;
    board.dispatch(BoardEvent::Delete(card_id)).unwrap();

    let view = board
        .dispatch(BoardEvent::Submit(CardDraft {
            id: Some(card_id),
            ..CardDraft::new("Acme Ltda")
        }))
        .unwrap();
    assert_eq!(view.card_count(), 0);
}
