use crate::catalog::models::{TemplateDescriptor, ALL_CATEGORIES};

/// `"all"` followed by every distinct category in first-seen order.
pub fn derive_categories(templates: &[TemplateDescriptor]) -> Vec<String> {
    let mut categories = vec![ALL_CATEGORIES.to_string()];
    for template in templates {
        if !categories.iter().any(|known| known == &template.category) {
            categories.push(template.category.clone());
        }
    }
    categories
}

pub fn category_label(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn filter_templates(
    templates: &[TemplateDescriptor],
    category: &str,
    search_term: &str,
) -> Vec<TemplateDescriptor> {
    let needle = search_term.to_lowercase();
    templates
        .iter()
        .filter(|template| category == ALL_CATEGORIES || template.category == category)
        .filter(|template| needle.is_empty() || template.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(name: &str, category: &str) -> TemplateDescriptor {
        TemplateDescriptor {
            name: name.to_string(),
            category: category.to_string(),
            thumbnail: format!("thumbs/{name}.jpg"),
            path: format!("templates/{name}.jpg"),
        }
    }

    fn sample() -> Vec<TemplateDescriptor> {
        vec![
            template("Diwali Lamps", "diwali"),
            template("Snowy Pines", "christmas"),
            template("Rangoli Burst", "diwali"),
            template("Lantern Night", "eid"),
            template("Gift Boxes", "christmas"),
        ]
    }

    fn names(templates: &[TemplateDescriptor]) -> Vec<&str> {
        templates.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn categories_start_with_all_in_first_seen_order() {
        assert_eq!(
            derive_categories(&sample()),
            vec!["all", "diwali", "christmas", "eid"]
        );
        assert_eq!(derive_categories(&[]), vec!["all"]);
    }

    #[test]
    fn labels_capitalize_the_first_letter() {
        assert_eq!(category_label("all"), "All");
        assert_eq!(category_label("christmas"), "Christmas");
        assert_eq!(category_label(""), "");
    }

    #[test]
    fn empty_search_returns_the_category_in_source_order() {
        let templates = sample();
        assert_eq!(names(&filter_templates(&templates, "all", "")), names(&templates));
        assert_eq!(
            names(&filter_templates(&templates, "diwali", "")),
            vec!["Diwali Lamps", "Rangoli Burst"]
        );
        assert!(filter_templates(&templates, "holi", "").is_empty());
    }

    #[test]
    fn search_is_a_case_insensitive_subset_of_the_category() {
        let templates = sample();
        for category in derive_categories(&templates) {
            let unfiltered = filter_templates(&templates, &category, "");
            for term in ["", "n", "LAN", "box", "zzz"] {
                let searched = filter_templates(&templates, &category, term);
                assert!(searched.iter().all(|t| unfiltered.contains(t)));
                assert!(searched
                    .iter()
                    .all(|t| t.name.to_lowercase().contains(&term.to_lowercase())));
            }
        }
        assert_eq!(
            names(&filter_templates(&templates, "all", "AN")),
            vec!["Rangoli Burst", "Lantern Night"]
        );
    }
}
