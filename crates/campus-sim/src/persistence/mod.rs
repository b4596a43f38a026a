//! Save records and the stores that hold them.

pub mod save_load;

pub use save_load::{
    autosave, now_timestamp, FileSaveStore, MemorySaveStore, PersistenceError, SaveData, SaveStore,
};
