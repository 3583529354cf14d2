use crate::types::token::Token;

/// Lifecycle of the token held by the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    /// The endpoint answered; the body may carry no token.
    Loaded(Option<Token>),
    Failed,
}

impl LoadState {
    pub fn token(&self) -> Option<&Token> {
        match self {
            LoadState::Loaded(token) => token.as_ref(),
            _ => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, LoadState::Loaded(_) | LoadState::Failed)
    }
}

/// How a load task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Redirected,
    Cancelled,
}
