use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub type DbPool = Pool<SqliteConnectionManager>;

pub const DEFAULT_DB_PATH: &str = "website/db/glowcopy.db";

/// Database file, overridable with `GLOWCOPY_DB`.
pub fn db_path() -> String {
    std::env::var("GLOWCOPY_DB")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string())
}

pub fn init_pool() -> Result<DbPool, Box<dyn std::error::Error>> {
    let manager = SqliteConnectionManager::file(db_path());
    let pool = Pool::builder().max_size(4).build(manager)?;

    let conn = pool.get()?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    conn.execute_batch(
        "
        -- Key/value settings (generation config, shop profile, API key)
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );
        ",
    )?;

    Ok(())
}

pub fn seed_defaults(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    let defaults = vec![
        // Gemini
        ("gemini_base_url", "https://generativelanguage.googleapis.com"),
        ("gemini_model", "gemini-2.5-flash"),
        ("gemini_temperature", "0.75"),
        ("gemini_top_p", "0.95"),
        ("gemini_top_k", "40"),
        ("gemini_max_tokens", "8192"),
        ("gemini_timeout_secs", "120"),
        // Shop profile used in social posts
        ("shop_name", "Finesse Glow"),
        ("shop_url", "https://finesseglow.com/"),
    ];

    for (key, value) in defaults {
        conn.execute(
            "INSERT OR IGNORE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
    }

    Ok(())
}
