use libris_engine::AuthorLinkPolicy;
use libris_store::StoreHandle;

/// Shared per-process state handed to every handler
#[derive(Clone, Debug)]
pub struct AppState {
    pub store: StoreHandle,
    pub author_link_policy: AuthorLinkPolicy,
}

impl AppState {
    pub fn new(store: StoreHandle, author_link_policy: AuthorLinkPolicy) -> Self {
        Self {
            store,
            author_link_policy,
        }
    }
}
