//! Prompt categories and gallery filters
//!
//! Categories are a coarse label derived from prompt keywords. They exist only
//! to filter the gallery.

use std::fmt;

/// Coarse classification of a generated image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Landscape,
    Portrait,
    Abstract,
    Animal,
    Other,
}

/// Keyword groups in match order. The first group with a hit wins.
const KEYWORD_GROUPS: [(Category, &[&str]); 4] = [
    (Category::Landscape, &["landscape", "nature", "scenery"]),
    (Category::Portrait, &["portrait", "person", "face"]),
    (Category::Abstract, &["abstract", "artistic"]),
    (Category::Animal, &["animal", "creature"]),
];

impl Category {
    pub fn all() -> [Category; 5] {
        [
            Category::Landscape,
            Category::Portrait,
            Category::Abstract,
            Category::Animal,
            Category::Other,
        ]
    }

    /// Tag used by the filter bar and in tile metadata
    pub fn tag(&self) -> &'static str {
        match self {
            Category::Landscape => "landscape",
            Category::Portrait => "portrait",
            Category::Abstract => "abstract",
            Category::Animal => "animal",
            Category::Other => "other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Landscape => "⛰",
            Category::Portrait => "☺",
            Category::Abstract => "◆",
            Category::Animal => "🐾",
            Category::Other => "•",
        }
    }

    /// Classify a prompt by case-insensitive keyword match
    pub fn classify(prompt: &str) -> Category {
        let lower = prompt.to_lowercase();
        KEYWORD_GROUPS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Filter applied to the gallery view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GalleryFilter {
    #[default]
    All,
    Only(Category),
}

impl GalleryFilter {
    /// Filters in the order they appear in the filter bar
    pub fn all() -> Vec<GalleryFilter> {
        let mut filters = vec![GalleryFilter::All];
        filters.extend(Category::all().into_iter().map(GalleryFilter::Only));
        filters
    }

    pub fn tag(&self) -> &'static str {
        match self {
            GalleryFilter::All => "all",
            GalleryFilter::Only(category) => category.tag(),
        }
    }

    /// `All` matches everything, otherwise the category must be equal
    pub fn matches(&self, category: Category) -> bool {
        match self {
            GalleryFilter::All => true,
            GalleryFilter::Only(wanted) => *wanted == category,
        }
    }

    pub fn next(&self) -> GalleryFilter {
        let filters = Self::all();
        let idx = filters.iter().position(|f| f == self).unwrap_or(0);
        filters[(idx + 1) % filters.len()]
    }

    pub fn previous(&self) -> GalleryFilter {
        let filters = Self::all();
        let idx = filters.iter().position(|f| f == self).unwrap_or(0);
        filters[(idx + filters.len() - 1) % filters.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_examples() {
        assert_eq!(
            Category::classify("a misty mountain landscape"),
            Category::Landscape
        );
        assert_eq!(Category::classify("portrait of a robot"), Category::Portrait);
        assert_eq!(Category::classify("a blue cube"), Category::Other);
    }

    #[test]
    fn test_classify_first_match_wins() {
        assert_eq!(
            Category::classify("portrait in front of a landscape"),
            Category::Landscape
        );
        assert_eq!(
            Category::classify("abstract creature with a face"),
            Category::Portrait
        );
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(Category::classify("ABSTRACT Shapes"), Category::Abstract);
        assert_eq!(Category::classify("Mythical Creature"), Category::Animal);
        assert_eq!(Category::classify("Untouched NATURE"), Category::Landscape);
    }

    #[test]
    fn test_classify_matches_substrings() {
        // "interface" contains "face"
        assert_eq!(Category::classify("retro user interface"), Category::Portrait);
    }

    #[test]
    fn test_filter_all_matches_everything() {
        for category in Category::all() {
            assert!(GalleryFilter::All.matches(category));
        }
    }

    #[test]
    fn test_filter_only_matches_exact_category() {
        let filter = GalleryFilter::Only(Category::Animal);
        assert!(filter.matches(Category::Animal));
        assert!(!filter.matches(Category::Other));
        assert!(!filter.matches(Category::Landscape));
    }

    #[test]
    fn test_filter_tags_are_unique() {
        let mut tags: Vec<&str> = GalleryFilter::all().iter().map(|f| f.tag()).collect();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), 6);
    }

    #[test]
    fn test_filter_cycles() {
        assert_eq!(
            GalleryFilter::All.next(),
            GalleryFilter::Only(Category::Landscape)
        );
        assert_eq!(
            GalleryFilter::All.previous(),
            GalleryFilter::Only(Category::Other)
        );
        assert_eq!(GalleryFilter::Only(Category::Other).next(), GalleryFilter::All);
    }
}
