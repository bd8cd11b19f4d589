use serde::{Deserialize, Serialize};

/// A catalog entry describing one simulated interviewer.
///
/// The start endpoint echoes only `id`, `name`, `title` and `company`, so
/// `emoji` and `description` default to empty on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    #[serde(default)]
    pub emoji: String,
    pub name: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub description: String,
}

impl Persona {
    /// Overlay the server's echo of this persona onto the catalog entry.
    ///
    /// Non-empty fields from `echo` win; empty ones keep the catalog value.
    pub fn merged_with(&self, echo: &Persona) -> Persona {
        fn pick(primary: &str, fallback: &str) -> String {
            if primary.is_empty() {
                fallback.to_string()
            } else {
                primary.to_string()
            }
        }

        Persona {
            id: pick(&echo.id, &self.id),
            emoji: pick(&echo.emoji, &self.emoji),
            name: pick(&echo.name, &self.name),
            title: pick(&echo.title, &self.title),
            company: pick(&echo.company, &self.company),
            description: pick(&echo.description, &self.description),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_start_echo_without_optional_fields() {
        let json = r#"{"id":"tech","name":"Alex Rivera","title":"CTO","company":"TechStart Inc"}"#;
        let persona: Persona = serde_json::from_str(json).unwrap();
        assert_eq!(persona.id, "tech");
        assert!(persona.emoji.is_empty());
        assert!(persona.description.is_empty());
    }

    #[test]
    fn test_merged_with_keeps_catalog_extras() {
        let catalog = Persona {
            id: "tech".to_string(),
            emoji: "💻".to_string(),
            name: "Alex Rivera".to_string(),
            title: "CTO & Co-Founder".to_string(),
            company: "TechStart Inc".to_string(),
            description: "Challenge your system design skills".to_string(),
        };
        let echo = Persona {
            id: "tech".to_string(),
            emoji: String::new(),
            name: "Alex Rivera".to_string(),
            title: "CTO".to_string(),
            company: "TechStartup Inc".to_string(),
            description: String::new(),
        };

        let merged = catalog.merged_with(&echo);
        assert_eq!(merged.title, "CTO");
        assert_eq!(merged.company, "TechStartup Inc");
        assert_eq!(merged.emoji, "💻");
        assert_eq!(merged.description, catalog.description);
    }
}
