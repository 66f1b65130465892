//! Global nickname uniqueness ledger.

use std::collections::HashSet;

use super::{error::NicknameError, value_object::Nickname};

/// Set of nicknames currently claimed by live sessions.
///
/// Comparison is case-sensitive: `alice` and `Alice` are distinct claims.
#[derive(Debug, Default)]
pub struct NicknameLedger {
    claimed: HashSet<Nickname>,
}

impl NicknameLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `candidate` and reserve it.
    ///
    /// # Errors
    ///
    /// Any [`NicknameError`] produced by [`Nickname::parse`], or
    /// `NicknameError::Taken` when another session already holds the name.
    pub fn claim(&mut self, candidate: &str) -> Result<Nickname, NicknameError> {
        let nickname = Nickname::parse(candidate)?;
        if self.claimed.contains(&nickname) {
            return Err(NicknameError::Taken(nickname.into_string()));
        }
        self.claimed.insert(nickname.clone());
        Ok(nickname)
    }

    /// Give a nickname back. No-op when it is not claimed.
    pub fn release(&mut self, nickname: &Nickname) {
        self.claimed.remove(nickname);
    }

    pub fn is_claimed(&self, nickname: &Nickname) -> bool {
        self.claimed.contains(nickname)
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}
