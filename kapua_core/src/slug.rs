use sea_orm::{ActiveValue, DbErr};

/// Turn a display name into a URL slug.
///
/// Lowercases, keeps ASCII letters, digits and `_`, and joins the remaining
/// words with single hyphens. Anything else (punctuation, non-ASCII letters)
/// is dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_sep = true;
        }
    }

    slug
}

/// Derive a slug from `name` on first persist; on later saves drop any change
/// to the slug so it stays what it was at creation.
pub(crate) fn stamp(
    name: &ActiveValue<String>,
    slug: &mut ActiveValue<String>,
    insert: bool,
) -> Result<(), DbErr> {
    if insert {
        let name = match name {
            ActiveValue::Set(name) | ActiveValue::Unchanged(name) => name,
            ActiveValue::NotSet => return Err(DbErr::Custom("name is required".to_owned())),
        };
        *slug = ActiveValue::Set(slugify(name));
    } else if slug.is_set() {
        *slug = ActiveValue::NotSet;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Social Sciences"), "social-sciences");
        assert_eq!(slugify("Physical Education and Health"), "physical-education-and-health");
    }

    #[test]
    fn collapses_separators_and_trims() {
        assert_eq!(slugify("  Te Reo  -- Māori "), "te-reo-mori");
        assert_eq!(slugify("--Art--"), "art");
    }

    #[test]
    fn drops_punctuation() {
        assert_eq!(slugify("Maths & Statistics!"), "maths-statistics");
        assert_eq!(slugify("Year 9/10 Science"), "year-910-science");
        assert_eq!(slugify("snake_case name"), "snake_case-name");
    }

    #[test]
    fn stamp_sets_slug_on_insert_only() {
        let name = ActiveValue::Set("Visual Arts".to_owned());
        let mut slug: ActiveValue<String> = ActiveValue::NotSet;
        stamp(&name, &mut slug, true).unwrap();
        assert!(matches!(slug, ActiveValue::Set(ref s) if s == "visual-arts"));

        let renamed = ActiveValue::Set("Arts".to_owned());
        let mut changed = ActiveValue::Set("arts".to_owned());
        stamp(&renamed, &mut changed, false).unwrap();
        assert!(matches!(changed, ActiveValue::NotSet));
    }

    #[test]
    fn stamp_requires_a_name() {
        let mut slug: ActiveValue<String> = ActiveValue::NotSet;
        assert!(stamp(&ActiveValue::NotSet, &mut slug, true).is_err());
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(slugify("English"), slugify("English"));
        assert_eq!(slugify(""), "");
    }
}
