//! Process-wide memo of the loaded tables.
//!
//! Populated once on first use and never invalidated; tables are immutable
//! after load so readers never race.

use once_cell::sync::OnceCell;

use crate::data::loader::KpiSource;
use crate::data::store::{DataStore, LoadOptions};

static STORE: OnceCell<DataStore> = OnceCell::new();

/// The loaded store, loading it from `source` on first call.
///
/// Later calls return the first store regardless of their arguments.
pub fn get_or_load<S: KpiSource + ?Sized>(source: &S, options: &LoadOptions) -> &'static DataStore {
    STORE.get_or_init(|| DataStore::load(source, options))
}

/// The loaded store, if any call has populated it
pub fn get() -> Option<&'static DataStore> {
    STORE.get()
}
