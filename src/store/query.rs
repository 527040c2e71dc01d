//! Table-scoped read query description.

/// A read query against a single table.
///
/// Built with a small fluent API:
///
/// ```
/// use codex_vivus::store::Query;
///
/// let q = Query::table("memories").order_desc("created_at").limit(100);
/// assert_eq!(q.table_name(), "memories");
/// assert_eq!(q.order_column(), Some("created_at"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    table: String,
    /// Newest-first sort column.
    order: Option<String>,
    limit: Option<usize>,
}

impl Query {
    /// Selects every column of `table`.
    pub fn table(table: &str) -> Self {
        Self {
            table: table.to_string(),
            order: None,
            limit: None,
        }
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some(column.to_string());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Name of the queried table.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Column the rows are sorted by, descending.
    pub fn order_column(&self) -> Option<&str> {
        self.order.as_deref()
    }

    pub fn row_limit(&self) -> Option<usize> {
        self.limit
    }

    /// Encodes the query as PostgREST URL parameters.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        if let Some(column) = &self.order {
            params.push(("order".to_string(), format!("{}.desc", column)));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_order_and_limit() {
        let q = Query::table("memories").order_desc("created_at").limit(100);
        assert_eq!(
            q.to_params(),
            vec![
                ("select".to_string(), "*".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
                ("limit".to_string(), "100".to_string()),
            ]
        );
    }

    #[test]
    fn later_order_replaces_earlier() {
        let q = Query::table("fluxos").order_desc("created_at").order_desc("id");
        assert_eq!(q.order_column(), Some("id"));
        assert_eq!(q.to_params()[1], ("order".to_string(), "id.desc".to_string()));
    }

    #[test]
    fn bare_query_selects_everything() {
        let q = Query::table("fluxos");
        assert_eq!(q.to_params().len(), 1);
        assert!(q.order_column().is_none());
        assert!(q.row_limit().is_none());
    }
}
