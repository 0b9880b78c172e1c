use tokio::sync::Mutex as AsyncMutex;

/// Process-wide lock for tests that mutate environment variables.
/// Use `.blocking_lock()` in sync tests and `.lock().await` in async tests.
pub static ENV_LOCK: AsyncMutex<()> = AsyncMutex::const_new(());

/// Removes every variable this crate reads. Call with `ENV_LOCK` held.
pub fn clear_giftwrap_env() {
    let names: Vec<String> = std::env::vars()
        .map(|(name, _)| name)
        .filter(|name| name.starts_with("GIFTWRAP_") || name == "GEMINI_API_KEY")
        .collect();
    for name in names {
        std::env::remove_var(name);
    }
}
