use rand::distributions::Alphanumeric;
use rand::Rng;

/// Default base domain for synthesized short links.
pub const DEFAULT_BASE: &str = "https://lkm.to";

/// Length of a synthesized short code.
pub const CODE_LEN: usize = 6;

/// Synthesizes placeholder short URLs when every provider has failed.
///
/// The result looks exactly like a real short link (base domain plus a
/// 6-character alphanumeric code) but is not registered anywhere and does
/// not redirect.
#[derive(Debug, Clone)]
pub struct FallbackGenerator {
    base: String,
}

impl FallbackGenerator {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn generate(&self) -> String {
        let code: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(CODE_LEN)
            .map(char::from)
            .collect();
        format!("{}/{}", self.base, code)
    }
}

impl Default for FallbackGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_BASE)
    }
}
