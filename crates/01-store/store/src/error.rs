use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("dispatch attempted while the store's reducer is running")]
    DispatchInReducer,

    #[error("store was dropped")]
    StoreDropped,

    #[error("forward cycle detected at depth {depth}")]
    ForwardCycle { depth: usize },

    #[error("invalid store configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("listener failed: {0}")]
    Listener(String),
}

impl StoreError {
    pub fn listener(msg: impl Into<String>) -> Self {
        StoreError::Listener(msg.into())
    }
}
