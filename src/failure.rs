use remote_authority::RemoteError;

/// Shown when a failed login carries no usable server message.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";

/// Derives the user-facing message for a failed authenticate call.
///
/// Only text the authority sent back in its error body is surfaced. Transport
/// and decoding failures fall back to [`LOGIN_FAILED_MESSAGE`].
#[must_use]
pub fn login_failure_message(error: &RemoteError) -> String {
    error
        .server_message()
        .map(str::trim)
        .unwrap_or(LOGIN_FAILED_MESSAGE)
        .to_string()
}
