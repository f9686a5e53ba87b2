/// Identifier of the immutable Administrator profile.
///
/// The administrator can never be renamed or deleted, and its access
/// overrides are not manipulable through the merge path.
pub const ADMIN_PROFILE_ID: &str = "PF0001";

/// Returns whether an identifier names the Administrator profile.
#[must_use]
pub fn is_admin_profile(profile_id: &str) -> bool {
    profile_id == ADMIN_PROFILE_ID
}

/// Allocates the successor of a sequential entity code.
///
/// Codes are an alphabetic prefix followed by a zero-padded counter
/// (`PF0007` -> `PF0008`). The padding width follows the stored counter, so
/// a saturated counter grows a digit (`PF9999` -> `PF10000`) instead of
/// wrapping. A code without digits counts from zero.
#[must_use]
pub fn next_code(code: &str) -> String {
    let prefix: String = code
        .chars()
        .take_while(|character| character.is_ascii_alphabetic())
        .collect();
    let digits: String = code
        .chars()
        .filter(|character| character.is_ascii_digit())
        .collect();

    let width = digits.len().max(1);
    let next = digits.parse::<u64>().unwrap_or(0) + 1;

    format!("{prefix}{next:0width$}")
}
