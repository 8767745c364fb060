/// Decides whether a live fingerprint sample corresponds to a stored template.
///
/// The comparison algorithm itself lives outside this backend; deployments
/// wire in whatever the scanner vendor ships. The default implementation
/// compares opaque template strings byte for byte, which is what the capture
/// SDK used on campus produces for identical fingers.
pub trait BiometricMatcher: Send + Sync {
    fn matches(&self, stored_template: &str, live_sample: &str) -> bool;
}

#[derive(Debug, Default)]
pub struct TemplateEqualityMatcher;

impl BiometricMatcher for TemplateEqualityMatcher {
    fn matches(&self, stored_template: &str, live_sample: &str) -> bool {
        !stored_template.is_empty() && stored_template == live_sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_templates_match() {
        assert!(TemplateEqualityMatcher.matches("tpl-a", "tpl-a"));
    }

    #[test]
    fn different_templates_do_not_match() {
        assert!(!TemplateEqualityMatcher.matches("tpl-a", "tpl-b"));
    }

    #[test]
    fn empty_stored_template_never_matches() {
        assert!(!TemplateEqualityMatcher.matches("", ""));
    }
}
