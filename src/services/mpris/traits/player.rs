use async_trait::async_trait;

use crate::services::mpris::PlayerId;

/// Presence and version of the control program
#[async_trait]
pub trait Installation: Send + Sync {
    /// Whether the program is on the search path
    async fn is_installed(&self) -> bool;

    /// Version string; informational only
    async fn version(&self) -> Option<String>;

    /// Program name, for user-facing guidance
    fn binary(&self) -> &str;
}

/// Listing of currently available players
#[async_trait]
pub trait RosterQuery: Send + Sync {
    /// Players in the order the control program reports them.
    ///
    /// `Some(vec![])` means nothing is running; `None` means the
    /// listing itself failed.
    async fn list_players(&self) -> Option<Vec<PlayerId>>;
}
