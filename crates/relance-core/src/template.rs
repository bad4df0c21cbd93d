//! Follow-up message rendering.

/// Substitution token accepted in stored follow-up messages.
pub const FIRST_NAME_TOKEN: &str = "{{prenom}}";

/// Substitute the client's first name into the stored template and trim
/// surrounding whitespace. An empty result is a validation failure on the
/// caller's side — the dispatcher never sends a blank message.
pub fn render(template: &str, prenom: &str) -> String {
    template.replace(FIRST_NAME_TOKEN, prenom).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_first_name() {
        let out = render("Bonjour {{prenom}}, votre rendez-vous approche.", "Léa");
        assert_eq!(out, "Bonjour Léa, votre rendez-vous approche.");
        assert!(!out.contains("{{prenom}}"));
    }

    #[test]
    fn template_without_token_is_untouched() {
        assert_eq!(render("Bonjour, à bientôt.", "Léa"), "Bonjour, à bientôt.");
    }

    #[test]
    fn empty_template_renders_empty() {
        assert_eq!(render("", "Léa"), "");
        assert_eq!(render("   ", "Léa"), "");
    }

    #[test]
    fn whitespace_is_trimmed() {
        assert_eq!(render("  Bonjour {{prenom}}  ", "Léa"), "Bonjour Léa");
    }
}
