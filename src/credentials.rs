use crate::db::DbPool;
use crate::models::settings::Setting;

/// Settings key the Gemini API key is stored under.
pub const API_KEY_SETTING: &str = "gemini_api_key";

pub fn load(pool: &DbPool) -> Option<String> {
    Setting::get(pool, API_KEY_SETTING).filter(|k| !k.trim().is_empty())
}

pub fn store(pool: &DbPool, api_key: &str) -> Result<(), String> {
    let key = api_key.trim();
    if key.is_empty() {
        return Err("API Key cannot be empty.".to_string());
    }
    Setting::set(pool, API_KEY_SETTING, key)?;
    log::info!("Gemini API key saved");
    Ok(())
}

pub fn clear(pool: &DbPool) -> Result<(), String> {
    Setting::delete(pool, API_KEY_SETTING)?;
    log::info!("Gemini API key cleared");
    Ok(())
}
