//! List filtering shared by the dashboard views.
//!
//! A record exposes the free-text fields it can be searched by and a set of
//! named facets compared by exact equality (status, department, category).

/// Facet value meaning "no restriction" in the dashboard selects.
pub const ALL: &str = "all";

pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
    fn facet(&self, name: &str) -> Option<&str>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub search: String,
    pub equals: Vec<(String, String)>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn with(mut self, facet: &str, value: &str) -> Self {
        self.set(facet, value);
        self
    }

    /// Replaces the facet restriction; an empty value or `"all"` clears it.
    pub fn set(&mut self, facet: &str, value: &str) {
        self.equals.retain(|(name, _)| name != facet);
        if !value.is_empty() && value != ALL {
            self.equals.push((facet.to_string(), value.to_string()));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.equals.is_empty()
    }

    pub fn matches<T: Searchable>(&self, item: &T) -> bool {
        for (facet, expected) in &self.equals {
            if item.facet(facet) != Some(expected.as_str()) {
                return false;
            }
        }

        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        item.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn apply<'a, T: Searchable>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(*item)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: &'static str,
        email: &'static str,
        status: &'static str,
        department: &'static str,
    }

    impl Searchable for Row {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.name, self.email]
        }

        fn facet(&self, name: &str) -> Option<&str> {
            match name {
                "status" => Some(self.status),
                "department" => Some(self.department),
                _ => None,
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "Amina Yusuf", email: "amina@corp.io", status: "Rejected", department: "Sales" },
            Row { name: "Brian Otieno", email: "brian@corp.io", status: "Under Review", department: "IT" },
            Row { name: "Carla Mendes", email: "carla@corp.io", status: "rejected", department: "IT" },
            Row { name: "Dev Patel", email: "dev@corp.io", status: "Rejected", department: "IT" },
        ]
    }

    #[test]
    fn status_filter_is_exact_equality() {
        let rows = rows();
        let filter = ListFilter::new().with("status", "Rejected");
        let visible = filter.apply(&rows);
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|r| r.status == "Rejected"));
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let rows = rows();
        let by_name = ListFilter::new().search("  MENDES ");
        assert_eq!(by_name.apply(&rows).len(), 1);

        let by_email = ListFilter::new().search("brian@");
        assert_eq!(by_email.apply(&rows)[0].name, "Brian Otieno");
    }

    #[test]
    fn all_clears_a_facet() {
        let rows = rows();
        let mut filter = ListFilter::new().with("department", "IT");
        assert_eq!(filter.apply(&rows).len(), 3);
        filter.set("department", ALL);
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&rows).len(), 4);
    }

    #[test]
    fn facets_and_search_combine() {
        let rows = rows();
        let filter = ListFilter::new()
            .with("department", "IT")
            .with("status", "Rejected")
            .search("dev");
        let visible = filter.apply(&rows);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].email, "dev@corp.io");
    }

    #[test]
    fn unknown_facet_matches_nothing() {
        let rows = rows();
        let filter = ListFilter::new().with("category", "Engineering");
        assert!(filter.apply(&rows).is_empty());
    }
}
