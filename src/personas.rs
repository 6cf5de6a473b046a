//! Persona bar data: listing, naming, and ordering.

use crate::collation::compare_names;
use crate::host::{HostApi, PersonaDirectory};

/// A user-facing identity the operator can switch between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    /// Avatar filename, the host's key for this persona
    pub key: String,
    /// Resolved display name
    pub name: String,
}

/// Display name for a persona avatar: the user-assigned name when the
/// registry has one, else the avatar filename with its image extension
/// stripped.
pub fn display_name(avatar: &str, directory: &dyn PersonaDirectory) -> String {
    if let Some(name) = directory.persona_name(avatar) {
        if !name.is_empty() {
            return name;
        }
    }
    strip_image_extension(avatar).to_string()
}

fn strip_image_extension(avatar: &str) -> &str {
    for ext in [".png", ".jpg", ".webp"] {
        if let Some(stem) = avatar.strip_suffix(ext) {
            return stem;
        }
    }
    avatar
}

/// Resolve names for a list of persona avatars and sort for the bar
/// (digits, Latin, Hangul, then the rest).
pub fn build_personas(avatars: Vec<String>, directory: &dyn PersonaDirectory) -> Vec<Persona> {
    let mut personas: Vec<Persona> = avatars
        .into_iter()
        .map(|avatar| Persona {
            name: display_name(&avatar, directory),
            key: avatar,
        })
        .collect();
    personas.sort_by(|a, b| compare_names(&a.name, &b.name));
    personas
}

/// Fetch the persona list from the host. Failure degrades to an empty bar.
pub fn load_personas(api: &dyn HostApi, directory: &dyn PersonaDirectory) -> Vec<Persona> {
    match api.fetch_persona_avatars() {
        Ok(avatars) => build_personas(avatars, directory),
        Err(e) => {
            log::warn!("failed to load personas: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    pub(crate) struct FakeDirectory {
        pub names: HashMap<String, String>,
        pub current: Option<String>,
    }

    impl FakeDirectory {
        pub fn empty() -> Self {
            Self {
                names: HashMap::new(),
                current: None,
            }
        }
    }

    impl PersonaDirectory for FakeDirectory {
        fn persona_name(&self, avatar: &str) -> Option<String> {
            self.names.get(avatar).cloned()
        }

        fn current_persona(&self) -> Option<String> {
            self.current.clone()
        }

        fn set_persona(&self, _avatar: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn registry_name_wins_over_filename() {
        let mut directory = FakeDirectory::empty();
        directory
            .names
            .insert("user1.png".to_string(), "Captain".to_string());

        assert_eq!(display_name("user1.png", &directory), "Captain");
        assert_eq!(display_name("user2.png", &directory), "user2");
    }

    #[test]
    fn image_extensions_are_stripped_from_fallback_names() {
        let directory = FakeDirectory::empty();
        assert_eq!(display_name("me.png", &directory), "me");
        assert_eq!(display_name("me.jpg", &directory), "me");
        assert_eq!(display_name("me.webp", &directory), "me");
        assert_eq!(display_name("me.gif", &directory), "me.gif");
    }

    #[test]
    fn personas_sort_digits_latin_hangul_other() {
        let directory = FakeDirectory::empty();
        let personas = build_personas(
            vec![
                "소라.png".to_string(),
                "zoe.png".to_string(),
                "1st.png".to_string(),
                "Ésa.png".to_string(),
            ],
            &directory,
        );

        let names: Vec<&str> = personas.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["1st", "zoe", "소라", "Ésa"]);
    }
}
