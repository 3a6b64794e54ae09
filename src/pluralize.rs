//! Singular/plural mapping of resource nouns.
//!
//! ZGW resources are Dutch nouns with largely irregular plurals
//! (`zaak` → `zaken`, `catalogus` → `catalogussen`), so a fixed table covers
//! the known resources and a simple Dutch rule covers the rest.

/// Irregular singular → plural pairs of known resources.
pub const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("zaak", "zaken"),
    ("zaaktype", "zaaktypen"),
    ("catalogus", "catalogussen"),
    ("rol", "rollen"),
    ("roltype", "roltypen"),
    ("status", "statussen"),
    ("statustype", "statustypen"),
    ("resultaat", "resultaten"),
    ("resultaattype", "resultaattypen"),
    ("eigenschap", "eigenschappen"),
    ("zaakeigenschap", "zaakeigenschappen"),
    ("zaakobject", "zaakobjecten"),
    ("zaakinformatieobject", "zaakinformatieobjecten"),
    ("informatieobjecttype", "informatieobjecttypen"),
    ("enkelvoudiginformatieobject", "enkelvoudiginformatieobjecten"),
    ("objectinformatieobject", "objectinformatieobjecten"),
    ("gebruiksrecht", "gebruiksrechten"),
    ("verzending", "verzendingen"),
    ("besluit", "besluiten"),
    ("besluittype", "besluittypen"),
    ("klant", "klanten"),
    ("klantcontact", "klantcontacten"),
    ("contactmoment", "contactmomenten"),
    ("verzoek", "verzoeken"),
    ("medewerker", "medewerkers"),
    ("adres", "adressen"),
];

/// Suffixes that mark a word as already plural.
const PLURAL_SUFFIXES: &[&str] = &["en", "s"];

/// Shortest stem left behind when stripping a plural suffix.
const MIN_STEM_LEN: usize = 3;

/// Pluralize a resource noun. Idempotent: plurals are returned unchanged.
pub fn pluralize(word: &str) -> String {
    Pluralizer::default().pluralize(word)
}

/// Singularize a resource noun, best-effort. Never fails.
pub fn singularize(word: &str) -> String {
    Pluralizer::default().singularize(word)
}

/// Pluralization rules: the static table plus optional extra pairs.
///
/// Extra pairs take precedence over the static table.
#[derive(Debug, Clone, Default)]
pub struct Pluralizer {
    extra: Vec<(String, String)>,
}

impl Pluralizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an additional irregular pair.
    pub fn with_irregular(mut self, singular: &str, plural: &str) -> Self {
        self.extra
            .push((singular.to_lowercase(), plural.to_lowercase()));
        self
    }

    fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.extra
            .iter()
            .map(|(s, p)| (s.as_str(), p.as_str()))
            .chain(IRREGULAR_PLURALS.iter().copied())
    }

    pub fn is_known_singular(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        self.pairs().any(|(s, _)| s == word)
    }

    pub fn is_known_plural(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        self.pairs().any(|(_, p)| p == word)
    }

    pub fn pluralize(&self, word: &str) -> String {
        let lower = word.to_lowercase();

        if let Some((_, plural)) = self.pairs().find(|(s, _)| *s == lower) {
            return plural.to_string();
        }
        // Plurals come back as given; only the lookup ignores case.
        if self.pairs().any(|(_, p)| p == lower) {
            return word.to_string();
        }
        if PLURAL_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix)) {
            return word.to_string();
        }

        if lower.ends_with('e') {
            format!("{lower}n")
        } else {
            format!("{lower}en")
        }
    }

    pub fn singularize(&self, word: &str) -> String {
        let lower = word.to_lowercase();

        if let Some((singular, _)) = self.pairs().find(|(_, p)| *p == lower) {
            return singular.to_string();
        }
        if self.pairs().any(|(s, _)| s == lower) {
            return word.to_string();
        }

        for suffix in PLURAL_SUFFIXES {
            if let Some(stem) = lower.strip_suffix(suffix) {
                if stem.len() >= MIN_STEM_LEN {
                    return stem.to_string();
                }
            }
        }

        word.to_string()
    }
}
