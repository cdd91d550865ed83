/// Host-side placeholder expansion, handed to the engine as a capability.
/// Hosts without a placeholder service pass [`NoPlaceholders`] and every
/// text goes through untouched.
pub trait PlaceholderResolver: Send + Sync {
    fn is_available(&self) -> bool;

    fn resolve(&self, text: &str) -> String;
}

/// Cheap presence probe used to decide whether a text is worth resolving
/// or refreshing at all.
pub fn contains_placeholders(text: &str) -> bool {
    text.contains('%')
}

pub struct NoPlaceholders;

impl PlaceholderResolver for NoPlaceholders {
    fn is_available(&self) -> bool {
        false
    }

    fn resolve(&self, text: &str) -> String {
        text.to_string()
    }
}
