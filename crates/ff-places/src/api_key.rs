use std::fmt;

/// Static key sent with every places API request.
#[derive(Clone)]
pub struct ApiKey {
    key: String,
}

impl ApiKey {
    /// From a raw API key string. Returns `None` for a blank key.
    pub fn from_raw(key: &str) -> Option<Self> {
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self {
            key: key.to_owned(),
        })
    }

    pub fn get(&self) -> &str {
        &self.key
    }
}

// Keys end up in logged configs, keep them out of Debug output.
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey").field("key", &"<redacted>").finish()
    }
}
