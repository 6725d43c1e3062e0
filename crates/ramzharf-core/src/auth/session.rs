//! Client-side session holding the current token pair.
//!
//! A protected call that fails with a token error triggers exactly one
//! refresh followed by exactly one retry. Anything after that is handed back
//! to the caller, who has to log in again.

use tracing::debug;

use super::service::AuthService;
use super::tokens::TokenPair;
use crate::error::Result;

/// Something that can exchange a refresh token for a new pair.
pub trait TokenRefresher {
    fn refresh(&self, refresh_token: &str) -> Result<TokenPair>;
}

impl TokenRefresher for AuthService {
    fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        self.rotate_refresh(refresh_token)
    }
}

#[derive(Debug, Clone)]
pub struct ClientSession {
    tokens: TokenPair,
    refreshed: bool,
}

impl ClientSession {
    pub fn new(tokens: TokenPair) -> Self {
        Self {
            tokens,
            refreshed: false,
        }
    }

    pub fn tokens(&self) -> &TokenPair {
        &self.tokens
    }

    pub fn into_tokens(self) -> TokenPair {
        self.tokens
    }

    /// True once any call on this session rotated the pair; the caller should
    /// persist [`tokens`](Self::tokens) again.
    pub fn was_refreshed(&self) -> bool {
        self.refreshed
    }

    /// Run `call` with the current access token, refreshing and retrying
    /// once on `InvalidToken` or `ExpiredToken`.
    pub fn call<T, F>(&mut self, refresher: &dyn TokenRefresher, mut call: F) -> Result<T>
    where
        F: FnMut(&str) -> Result<T>,
    {
        match call(&self.tokens.access_token) {
            Err(e) if e.is_token_error() => {
                debug!(error = %e, "Access token rejected, refreshing once");
                self.tokens = refresher.refresh(&self.tokens.refresh_token)?;
                self.refreshed = true;
                call(&self.tokens.access_token)
            }
            other => other,
        }
    }
}
