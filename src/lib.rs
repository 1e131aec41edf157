pub mod args;
pub mod error;
pub mod handicap;
pub mod model;
pub mod record;
pub mod score;
pub mod server;
pub mod storage;
pub mod controller {
    pub mod repair;
    pub mod standings;
    pub mod submit;
    pub mod update;
}

pub use error::LeagueError;
pub use storage::{SqliteStorage, Storage, StorageError};
