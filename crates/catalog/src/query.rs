/// Coarse search filters sent to the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub diet: Option<String>,
    pub exclude_ingredients: Vec<String>,
    pub cuisines: Vec<String>,
    pub max_ready_time: Option<u32>,
    pub number: u32,
}

impl CatalogQuery {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            ..Default::default()
        }
    }

    /// Same query without diet and cuisine filters. Ready time and
    /// exclusions are kept.
    pub fn without_diet(&self) -> Self {
        Self {
            diet: None,
            cuisines: vec![],
            ..self.clone()
        }
    }

    /// Page size only.
    pub fn unrestricted(&self) -> Self {
        Self::new(self.number)
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("number", self.number.to_string())];

        if let Some(diet) = &self.diet {
            params.push(("diet", diet.to_owned()));
        }

        if !self.exclude_ingredients.is_empty() {
            params.push(("excludeIngredients", self.exclude_ingredients.join(",")));
        }

        if !self.cuisines.is_empty() {
            params.push(("cuisine", self.cuisines.join(",")));
        }

        if let Some(max_ready_time) = self.max_ready_time {
            params.push(("maxReadyTime", max_ready_time.to_string()));
        }

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_query() -> CatalogQuery {
        CatalogQuery {
            diet: Some("vegan".to_owned()),
            exclude_ingredients: vec!["peanut".to_owned(), "shellfish".to_owned()],
            cuisines: vec!["italian".to_owned()],
            max_ready_time: Some(30),
            number: 15,
        }
    }

    #[test]
    fn test_params_include_every_filter() {
        let params = full_query().to_params();

        assert!(params.contains(&("number", "15".to_owned())));
        assert!(params.contains(&("diet", "vegan".to_owned())));
        assert!(params.contains(&("excludeIngredients", "peanut,shellfish".to_owned())));
        assert!(params.contains(&("cuisine", "italian".to_owned())));
        assert!(params.contains(&("maxReadyTime", "30".to_owned())));
    }

    #[test]
    fn test_without_diet_keeps_time_and_exclusions() {
        let relaxed = full_query().without_diet();

        assert_eq!(relaxed.diet, None);
        assert!(relaxed.cuisines.is_empty());
        assert_eq!(relaxed.max_ready_time, Some(30));
        assert_eq!(relaxed.exclude_ingredients.len(), 2);
        assert_eq!(relaxed.number, 15);
    }

    #[test]
    fn test_unrestricted_keeps_page_size_only() {
        let unrestricted = full_query().unrestricted();

        assert_eq!(unrestricted, CatalogQuery::new(15));
        assert_eq!(unrestricted.to_params(), vec![("number", "15".to_owned())]);
    }
}
