use rand::Rng;
use std::fmt::Write;

/// Fresh 128-bit custom id rendered as 32 lowercase hex characters.
///
/// Randomness comes from the thread-local CSPRNG; nothing else is shared
/// between calls.
pub fn new_dispatch_token() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    bytes
        .iter()
        .fold(String::with_capacity(32), |mut token, byte| {
            let _ = write!(token, "{byte:02x}");
            token
        })
}
