use std::collections::HashMap;

/// Case-insensitive name → position index. The first occurrence of a name wins.
#[derive(Debug, Clone, Default)]
pub struct CaseInsensitiveIndex {
    map: HashMap<String, usize>,
}

impl CaseInsensitiveIndex {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for (position, name) in names.into_iter().enumerate() {
            map.entry(fold(name.as_ref())).or_insert(position);
        }
        Self { map }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.map.get(&fold(name)).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&fold(name))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Case-folding key used for every column and table name comparison.
pub fn fold(name: &str) -> String {
    name.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_occurrence_wins() {
        let index = CaseInsensitiveIndex::new(["Id", "name", "ID"]);
        assert_eq!(index.position("id"), Some(0));
        assert_eq!(index.position("NAME"), Some(1));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn missing_name() {
        let index = CaseInsensitiveIndex::new(["A"]);
        assert!(!index.contains("B"));
        assert_eq!(index.position("b"), None);
    }
}
