use serde::Serialize;

/// Ordered set of columns the user chose to chart.
///
/// Order is toggle order: the first column selected becomes the category
/// axis, the second drives the Y bound. Every member is a column of the
/// schema the selection was made against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection {
    columns: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle `column` against `schema`.
    ///
    /// Returns `false` (and changes nothing) when the column is not part of
    /// the schema.
    pub fn toggle(&mut self, column: &str, schema: &[String]) -> bool {
        if !schema.iter().any(|c| c == column) {
            return false;
        }

        match self.columns.iter().position(|c| c == column) {
            Some(idx) => {
                self.columns.remove(idx);
            }
            None => self.columns.push(column.to_string()),
        }
        true
    }

    pub fn clear(&mut self) {
        self.columns.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Vec<String> {
        vec!["name".into(), "height".into(), "mass".into()]
    }

    #[test]
    fn toggle_adds_in_order_and_removes() {
        let mut sel = Selection::new();
        assert!(sel.toggle("height", &schema()));
        assert!(sel.toggle("name", &schema()));
        assert_eq!(sel.columns(), ["height", "name"]);

        assert!(sel.toggle("height", &schema()));
        assert_eq!(sel.columns(), ["name"]);
    }

    #[test]
    fn rejects_columns_outside_schema() {
        let mut sel = Selection::new();
        assert!(!sel.toggle("films", &schema()));
        assert!(sel.is_empty());
    }

    #[test]
    fn serializes_as_plain_list() {
        let mut sel = Selection::new();
        sel.toggle("mass", &schema());
        assert_eq!(serde_json::to_string(&sel).unwrap(), r#"["mass"]"#);
    }
}
