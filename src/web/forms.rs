/// Url-encoded form body kept as ordered pairs, so checkbox groups that
/// repeat a field name survive decoding.
#[derive(Debug, Clone, Default)]
pub struct FormFields(pub Vec<(String, String)>);

impl FormFields {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    pub fn all(&self, name: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// HTML checkboxes are only posted when ticked.
    pub fn checked(&self, name: &str) -> bool {
        matches!(
            self.get(name).map(|v| v.trim().to_ascii_lowercase()).as_deref(),
            Some("on" | "true" | "1" | "yes")
        )
    }
}
