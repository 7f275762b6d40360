//! LocalStorage access
//!
//! Reads and writes JSON blobs under fixed keys. Natively there is no
//! storage: reads find nothing and writes are dropped.

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Raw string stored under `key`
#[cfg(target_arch = "wasm32")]
pub fn read(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok()?
}

#[cfg(not(target_arch = "wasm32"))]
pub fn read(_key: &str) -> Option<String> {
    None
}

/// Store `value` under `key`; false if storage is unavailable or full
#[cfg(target_arch = "wasm32")]
pub fn write(key: &str, value: &str) -> bool {
    local_storage()
        .map(|s| s.set_item(key, value).is_ok())
        .unwrap_or(false)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn write(_key: &str, _value: &str) -> bool {
    false
}

/// Deserialize the value under `key`, logging and discarding bad JSON
pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let json = read(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring malformed {}: {}", key, e);
            None
        }
    }
}

/// Serialize and store; logs on failure
pub fn save_json<T: Serialize>(key: &str, value: &T) -> bool {
    match serde_json::to_string(value) {
        Ok(json) => write(key, &json),
        Err(e) => {
            log::warn!("Could not serialize {}: {}", key, e);
            false
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_native_storage_is_empty() {
        assert!(!save_json("color_walls_test", &42u32));
        assert_eq!(load_json::<u32>("color_walls_test"), None);
    }
}
