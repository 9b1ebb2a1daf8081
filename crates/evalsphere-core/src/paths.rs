use anyhow::Result;
use std::path::PathBuf;

const EVALSPHERE_DIR: &str = ".evalsphere";
const DB_FILE: &str = "evalsphere.db";

/// Environment variable to override the EvalSphere directory.
const EVALSPHERE_DIR_ENV: &str = "EVALSPHERE_DIR";

/// Resolve the EvalSphere data directory.
/// Priority: EVALSPHERE_DIR env var > ~/.evalsphere/
pub fn resolve_evalsphere_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(EVALSPHERE_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|h| h.join(EVALSPHERE_DIR))
        .ok_or_else(|| anyhow::anyhow!("Failed to determine home directory"))
}

/// Ensure the EvalSphere directory exists and return its path.
pub fn ensure_evalsphere_dir() -> Result<PathBuf> {
    let dir = resolve_evalsphere_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the database path: ~/.evalsphere/evalsphere.db
pub fn database_path() -> Result<PathBuf> {
    Ok(resolve_evalsphere_dir()?.join(DB_FILE))
}

/// Ensure the parent directory exists and return the database path.
pub fn ensure_database_path() -> Result<PathBuf> {
    Ok(ensure_evalsphere_dir()?.join(DB_FILE))
}

/// Convenience helper returning the database path as a UTF-8 string.
pub fn ensure_database_path_string() -> Result<String> {
    Ok(ensure_database_path()?.to_string_lossy().into_owned())
}
