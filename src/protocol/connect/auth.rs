use sha1::{Digest, Sha1};

/// Computes the `mysql_native_password` scramble.
///
/// `SHA1(password) ^ SHA1(challenge[..20] ++ SHA1(SHA1(password)))`, where
/// the challenge is the concatenated auth data from the server handshake;
/// anything past the first 20 bytes (typically a trailing NUL) is discarded.
///
/// https://mariadb.com/kb/en/connection/#mysql_native_password-plugin
pub(crate) fn native_password(password: &str, challenge: &[u8]) -> Vec<u8> {
    let challenge = &challenge[..challenge.len().min(20)];

    let mut ctx = Sha1::new();

    ctx.update(password);
    let mut pw_hash = ctx.finalize_reset();

    ctx.update(&pw_hash);
    let pw_hash_hash = ctx.finalize_reset();

    ctx.update(challenge);
    ctx.update(pw_hash_hash);
    let pw_challenge_hash = ctx.finalize();

    for (a, b) in pw_hash.iter_mut().zip(pw_challenge_hash) {
        *a ^= b;
    }

    pw_hash.to_vec()
}
