use anyhow::{anyhow, Context, Result};
use std::{fs, path::Path};
use zeroize::Zeroizing;

/// Maximum size of a key file. Hex keys are well under 1 KB.
pub const MAX_KEY_FILE_BYTES: u64 = 4 * 1024;

/// Reads a file after verifying it is not a symlink and is within `max_bytes`.
///
/// NOTE: narrow TOCTOU window between `symlink_metadata()` and `fs::read()`.
/// Closing it fully requires `O_NOFOLLOW` on the open.
pub fn read_validated(path: &Path, max_bytes: u64) -> Result<Vec<u8>> {
    let meta = fs::symlink_metadata(path).with_context(|| format!("stat {}", path.display()))?;
    if meta.file_type().is_symlink() {
        return Err(anyhow!("Refusing to read symlink: {}", path.display()));
    }
    if !meta.is_file() {
        return Err(anyhow!("Not a regular file: {}", path.display()));
    }
    if meta.len() > max_bytes {
        return Err(anyhow!(
            "File too large: {} ({} bytes, max {max_bytes} bytes)",
            path.display(),
            meta.len(),
        ));
    }
    fs::read(path).with_context(|| format!("read {}", path.display()))
}

/// Reads a hex key file into memory that is wiped on drop.
///
/// Surrounding whitespace is trimmed. On Unix a file readable by group or
/// others is still accepted, but logged at `warn`.
pub fn read_key_file(path: &Path) -> Result<Zeroizing<String>> {
    let bytes = Zeroizing::new(read_validated(path, MAX_KEY_FILE_BYTES)?);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(path)
            .with_context(|| format!("stat {}", path.display()))?
            .permissions()
            .mode();
        if mode & 0o077 != 0 {
            tracing::warn!(
                path = %path.display(),
                mode = %format!("{:o}", mode & 0o777),
                "key file is accessible by other users"
            );
        }
    }

    let text = std::str::from_utf8(&bytes)
        .with_context(|| format!("key file is not UTF-8: {}", path.display()))?;
    Ok(Zeroizing::new(text.trim().to_string()))
}
