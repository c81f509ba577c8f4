/// Single account state: balance and passcode.
/// State is modified using events, which are created by handling commands.
pub mod account;

/// Well-formed account commands and the input types they are built from,
/// later handled by [`account`].
pub mod command;

/// Account registry interface, plus "in memory" implementation.
/// Owns every account, hands out credentials and resolves ids.
pub mod registry;

/// Console front end: an explicit login session and a menu driven service
/// over any reader/writer pair. Kept in the library so integration tests
/// can drive it.
pub mod bin_utils;
