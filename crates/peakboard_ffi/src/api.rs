//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose account and board use-cases to Dart via FRB.
//! - Flatten core results into envelopes with a display-ready message.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call opens the configured database, runs one use-case, and
//!   releases the connection before returning.

use log::warn;
use peakboard_core::db::open_db;
use peakboard_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    init_logging_from_config, ping as ping_inner, AccountStore, Board, BoardEvent, BoardView,
    Card, CardDraft, CardId, CardStatus, CardStore, CoreConfig, SqliteKvStore, User,
};
use std::sync::OnceLock;
use uuid::Uuid;

static CORE_CONFIG: OnceLock<CoreConfig> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Initializes logging from `PEAKBOARD_LOG_LEVEL` / `PEAKBOARD_LOG_DIR`.
///
/// Returns empty string on success or when no log directory is configured.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging_from_env() -> String {
    match init_logging_from_config(core_config()) {
        Ok(_) => String::new(),
        Err(err) => err,
    }
}

/// Signed-in user as shown by the app header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

/// Result envelope for account forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountResponse {
    pub ok: bool,
    /// Current user after the call, when one is signed in.
    pub user: Option<UserProfile>,
    /// Human-readable message for the auth form.
    pub message: String,
}

impl AccountResponse {
    fn success(message: impl Into<String>, user: Option<User>) -> Self {
        Self {
            ok: true,
            user: user.map(to_user_profile),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            user: None,
            message: message.into(),
        }
    }
}

/// One card as rendered on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardItem {
    pub card_id: String,
    pub name: String,
    pub tax_id: String,
    pub ticket_value: String,
    pub city: String,
    pub phone: String,
    /// Column identifier (`new|contacted|in-progress|closed`).
    pub status: String,
}

/// One board column with its cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumnItem {
    pub status: String,
    pub cards: Vec<CardItem>,
}

/// Result envelope for board calls. Carries the refreshed board on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardResponse {
    pub ok: bool,
    pub columns: Vec<BoardColumnItem>,
    pub message: String,
}

impl BoardResponse {
    fn success(view: BoardView) -> Self {
        let card_count = view.card_count();
        Self {
            ok: true,
            columns: view
                .columns
                .into_iter()
                .map(|column| BoardColumnItem {
                    status: column.status.to_string(),
                    cards: column.cards.into_iter().map(to_card_item).collect(),
                })
                .collect(),
            message: format!("{card_count} card(s)."),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            columns: Vec::new(),
            message: message.into(),
        }
    }
}

/// Registers a user and signs them in.
#[flutter_rust_bridge::frb(sync)]
pub fn account_register(name: String, email: String, password: String) -> AccountResponse {
    let result = with_store(|store| {
        AccountStore::new(store)
            .register(&name, &email, &password)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(user) => AccountResponse::success("Account created.", Some(user)),
        Err(err) => AccountResponse::failure(format!("account_register failed: {err}")),
    }
}

/// Signs a user in by email and password.
#[flutter_rust_bridge::frb(sync)]
pub fn account_login(email: String, password: String) -> AccountResponse {
    let result = with_store(|store| {
        AccountStore::new(store)
            .login(&email, &password)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(user) => AccountResponse::success(format!("Hello, {}.", user.name), Some(user)),
        Err(err) => AccountResponse::failure(format!("account_login failed: {err}")),
    }
}

/// Replaces the password for an email. Does not sign anyone in.
#[flutter_rust_bridge::frb(sync)]
pub fn account_reset_password(email: String, new_password: String) -> AccountResponse {
    let result = with_store(|store| {
        AccountStore::new(store)
            .reset_password(&email, &new_password)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(()) => AccountResponse::success("Password reset. Please sign in.", None),
        Err(err) => AccountResponse::failure(format!("account_reset_password failed: {err}")),
    }
}

/// Clears the session. Succeeds when nobody is signed in.
#[flutter_rust_bridge::frb(sync)]
pub fn account_logout() -> AccountResponse {
    let result = with_store(|store| {
        AccountStore::new(store)
            .logout()
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(()) => AccountResponse::success("Signed out.", None),
        Err(err) => AccountResponse::failure(format!("account_logout failed: {err}")),
    }
}

/// Returns the signed-in user, used at app boot to pick login or board.
#[flutter_rust_bridge::frb(sync)]
pub fn account_current() -> AccountResponse {
    let result = with_store(|store| {
        AccountStore::new(store)
            .current_user()
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(Some(user)) => AccountResponse::success("Signed in.", Some(user)),
        Ok(None) => AccountResponse::success("Not signed in.", None),
        Err(err) => AccountResponse::failure(format!("account_current failed: {err}")),
    }
}

/// Returns the session user's board.
#[flutter_rust_bridge::frb(sync)]
pub fn board_view() -> BoardResponse {
    board_call("board_view", |board| board.view().map_err(|err| err.to_string()))
}

/// Saves the card form. `card_id = None` creates a card; otherwise the card
/// with that id is replaced in place and keeps its column. An id that no
/// longer matches a card leaves the board unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn board_submit_card(
    card_id: Option<String>,
    name: String,
    tax_id: String,
    ticket_value: String,
    city: String,
    phone: String,
) -> BoardResponse {
    let id = match card_id.as_deref().map(parse_card_id) {
        Some(Some(id)) => Some(id),
        Some(None) => return BoardResponse::failure("board_submit_card failed: invalid card id"),
        None => None,
    };
    let draft = CardDraft {
        id,
        name,
        tax_id,
        ticket_value,
        city,
        phone,
        status: None,
    };
    board_call("board_submit_card", |board| {
        board
            .dispatch(BoardEvent::Submit(draft))
            .map_err(|err| err.to_string())
    })
}

/// Moves a card to the column it was dropped on.
///
/// Unknown or malformed card ids leave the board unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn board_drop_card(card_id: String, status: String) -> BoardResponse {
    let status = match status.parse::<CardStatus>() {
        Ok(status) => status,
        Err(err) => return BoardResponse::failure(format!("board_drop_card failed: {err}")),
    };
    let Some(card_id) = parse_card_id(&card_id) else {
        return board_view();
    };
    board_call("board_drop_card", |board| {
        board
            .dispatch(BoardEvent::Drop { card_id, status })
            .map_err(|err| err.to_string())
    })
}

/// Deletes a card. Unknown or malformed card ids leave the board unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn board_delete_card(card_id: String) -> BoardResponse {
    let Some(card_id) = parse_card_id(&card_id) else {
        return board_view();
    };
    board_call("board_delete_card", |board| {
        board
            .dispatch(BoardEvent::Delete(card_id))
            .map_err(|err| err.to_string())
    })
}

fn core_config() -> &'static CoreConfig {
    CORE_CONFIG.get_or_init(CoreConfig::from_env)
}

fn with_store<T>(f: impl FnOnce(SqliteKvStore<'_>) -> Result<T, String>) -> Result<T, String> {
    let conn =
        open_db(&core_config().db_path).map_err(|err| format!("database open failed: {err}"))?;
    f(SqliteKvStore::new(&conn))
}

fn board_call(
    operation: &str,
    f: impl FnOnce(&Board<SqliteKvStore<'_>>) -> Result<BoardView, String>,
) -> BoardResponse {
    match with_store(|store| f(&Board::new(CardStore::new(store)))) {
        Ok(view) => BoardResponse::success(view),
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error operation={operation}");
            BoardResponse::failure(format!("{operation} failed: {err}"))
        }
    }
}

fn parse_card_id(raw: &str) -> Option<CardId> {
    Uuid::parse_str(raw.trim()).ok()
}

fn to_user_profile(user: User) -> UserProfile {
    UserProfile {
        user_id: user.id.to_string(),
        name: user.name,
        email: user.email,
    }
}

fn to_card_item(card: Card) -> CardItem {
    CardItem {
        card_id: card.id.to_string(),
        name: card.name,
        tax_id: card.tax_id,
        ticket_value: card.ticket_value,
        city: card.city,
        phone: card.phone,
        status: card.status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        account_current, account_login, account_logout, account_register,
        account_reset_password, board_delete_card, board_drop_card, board_submit_card,
        board_view, core_version, init_logging, init_logging_from_env, ping,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn board_drop_card_rejects_unknown_column() {
        let response = board_drop_card("not-a-uuid".to_string(), "archived".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("archived"));
    }

    #[test]
    fn init_logging_from_env_without_log_dir_is_noop() {
        if std::env::var_os("PEAKBOARD_LOG_DIR").is_some() {
            return;
        }
        assert_eq!(init_logging_from_env(), "");
    }

    #[test]
    fn malformed_ids_on_drop_and_delete_return_current_board() {
        let dropped = board_drop_card("not-a-uuid".to_string(), "closed".to_string());
        assert!(dropped.ok, "{}", dropped.message);
        assert_eq!(dropped.columns.len(), 4);

        let deleted = board_delete_card("  ".to_string());
        assert!(deleted.ok, "{}", deleted.message);
        assert_eq!(deleted.columns.len(), 4);
    }

    #[test]
    fn board_submit_card_rejects_malformed_id() {
        let response = board_submit_card(
            Some("not-a-uuid".to_string()),
            "Acme".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        );
        assert!(!response.ok);
        assert!(response.message.contains("invalid card id"));
    }

    // Session state is process-wide on disk, so the whole flow runs in one test.
    #[test]
    fn account_and_board_flow() {
        let email = format!("{}@example.com", unique_token("ffi"));

        let registered =
            account_register("Ana".to_string(), email.clone(), "pw".to_string());
        assert!(registered.ok, "{}", registered.message);
        let duplicate =
            account_register("Ana".to_string(), email.to_uppercase(), "pw".to_string());
        assert!(!duplicate.ok);
        assert!(duplicate.message.contains("already registered"));

        let created = board_submit_card(
            None,
            "Acme".to_string(),
            "12.345.678/0001-90".to_string(),
            "1500".to_string(),
            "Recife".to_string(),
            "+55 81 3333-0000".to_string(),
        );
        assert!(created.ok, "{}", created.message);
        assert_eq!(created.columns.len(), 4);
        let card_id = created.columns[0].cards[0].card_id.clone();

        let moved = board_drop_card(card_id.clone(), "in-progress".to_string());
        assert!(moved.ok, "{}", moved.message);
        assert!(moved.columns[0].cards.is_empty());
        assert_eq!(moved.columns[2].status, "in-progress");
        assert_eq!(moved.columns[2].cards[0].city, "Recife");

        let edited = board_submit_card(
            Some(card_id.clone()),
            "Acme Ltda".to_string(),
            String::new(),
            String::new(),
            "Olinda".to_string(),
            String::new(),
        );
        assert!(edited.ok, "{}", edited.message);
        assert_eq!(edited.columns[2].cards[0].name, "Acme Ltda");

        let reset = account_reset_password(email.clone(), "pw2".to_string());
        assert!(reset.ok, "{}", reset.message);
        assert!(account_logout().ok);
        assert!(account_current().user.is_none());
        assert!(board_view().columns.iter().all(|column| column.cards.is_empty()));

        let old = account_login(email.clone(), "pw".to_string());
        assert!(!old.ok);
        let login = account_login(email.clone(), "pw2".to_string());
        assert!(login.ok, "{}", login.message);
        assert_eq!(login.user.map(|user| user.email), Some(email));

        let deleted = board_delete_card(card_id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert!(deleted.columns.iter().all(|column| column.cards.is_empty()));

        let stale_edit = board_submit_card(
            Some(card_id),
            "Acme Ltda".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        );
        assert!(stale_edit.ok, "{}", stale_edit.message);
        assert!(stale_edit.columns.iter().all(|column| column.cards.is_empty()));
        assert!(account_logout().ok);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
