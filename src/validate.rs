//! Input validation for wallet addresses, nicknames, scores and paging

use crate::error::ValidationError;

/// Largest page size the leaderboard will serve
pub const MAX_PAGE_LIMIT: u32 = 100;

/// `0x` followed by exactly 40 hex digits
pub fn wallet_address(address: &str) -> Result<(), ValidationError> {
    if address.is_empty() {
        return Err(ValidationError::MissingField("walletAddress"));
    }
    let valid = address
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if valid {
        Ok(())
    } else {
        Err(ValidationError::WalletAddress(address.to_string()))
    }
}

/// 3-20 characters drawn from letters, digits, `_` and `-`
pub fn nickname(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::MissingField("nickname"));
    }
    let len = name.chars().count();
    let charset_ok = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if (3..=20).contains(&len) && charset_ok {
        Ok(())
    } else {
        Err(ValidationError::Nickname(name.to_string()))
    }
}

pub fn score(score: i64) -> Result<u64, ValidationError> {
    u64::try_from(score).map_err(|_| ValidationError::Score(score))
}

pub fn pagination(page: u32, limit: u32) -> Result<(), ValidationError> {
    if page < 1 || limit < 1 || limit > MAX_PAGE_LIMIT {
        return Err(ValidationError::Pagination { page, limit });
    }
    Ok(())
}
