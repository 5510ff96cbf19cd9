use std::sync::{Arc, Mutex};

use contas_core::{
    auth::{SessionIdentity, UserId},
    core::ledger_manager::LedgerManager,
    store::JsonStore,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated manager over a unique store directory, signed in as
/// `test-user`.
pub fn setup_test_env() -> (LedgerManager, Arc<SessionIdentity>) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let store = JsonStore::new(base).expect("create json store backend");
    let identity = Arc::new(SessionIdentity::signed_in(UserId::from("test-user")));
    let manager = LedgerManager::new(Box::new(store), identity.clone());
    (manager, identity)
}
