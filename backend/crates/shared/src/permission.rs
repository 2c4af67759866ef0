//! Access rules shared by the resource endpoints

use crate::error::app_error::{AppError, AppResult};
use crate::id::UserId;

/// Whether a request only reads or also changes state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// Caller must be signed in
pub fn require_authenticated(caller: Option<UserId>) -> AppResult<UserId> {
    caller.ok_or_else(|| {
        AppError::unauthorized("Authentication credentials were not provided.")
            .with_action("Sign in and retry")
    })
}

/// Anyone may read, only the owner may write
///
/// Anonymous writers get 401, signed-in non-owners get 403.
pub fn author_or_read_only(access: Access, caller: Option<UserId>, owner: UserId) -> AppResult<()> {
    if access == Access::Read {
        return Ok(());
    }

    let caller = require_authenticated(caller)?;
    if caller != owner {
        return Err(AppError::forbidden(
            "You do not have permission to perform this action.",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_are_public() {
        let owner = UserId::from_raw(1);
        assert!(author_or_read_only(Access::Read, None, owner).is_ok());
        assert!(author_or_read_only(Access::Read, Some(UserId::from_raw(2)), owner).is_ok());
    }

    #[test]
    fn test_writes_need_owner() {
        let owner = UserId::from_raw(1);

        let anonymous = author_or_read_only(Access::Write, None, owner).unwrap_err();
        assert_eq!(anonymous.status_code(), 401);

        let stranger =
            author_or_read_only(Access::Write, Some(UserId::from_raw(2)), owner).unwrap_err();
        assert_eq!(stranger.status_code(), 403);

        assert!(author_or_read_only(Access::Write, Some(owner), owner).is_ok());
    }
}
