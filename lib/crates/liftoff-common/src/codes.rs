//! Backend error codes the CLI interprets.
//!
//! Codes travel as strings because the platform reports them as numbers in
//! some bodies and as strings in others; callers compare against these
//! constants after normalisation.

/// The application's droplet has not finished staging yet.
pub const APP_NOT_STAGED: &str = "170002";

/// Staging ran and failed.
pub const STAGING_ERROR: &str = "170001";

/// Returns `true` for the code that means "keep waiting, staging in progress".
#[must_use]
pub fn is_not_staged(code: &str) -> bool {
    code == APP_NOT_STAGED
}
