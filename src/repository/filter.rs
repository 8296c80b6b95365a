//! Parameterized id-membership filter builder.
//!
//! Builds the "select by id-membership" filter used by batch lookups. Ids are
//! always passed as bound parameters, never concatenated into the filter
//! text, so caller-supplied ids cannot inject query syntax.

/// A parameterized filter selecting records whose `id` belongs to a list.
///
/// Shapes:
/// - empty list: unrestricted, matches every record in the queried partition
/// - one id: equality on a single bound parameter
/// - many ids: `IN` membership with one uniquely named parameter per id, in
///   input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdFilter {
    text: String,
    parameters: Vec<(String, String)>,
}

impl IdFilter {
    /// Filter matching every record in the queried scope.
    pub fn unrestricted() -> Self {
        IdFilter {
            text: "SELECT * FROM c".to_string(),
            parameters: Vec::new(),
        }
    }

    /// Build a filter from a list of ids.
    pub fn from_ids(ids: &[String]) -> Self {
        match ids {
            [] => IdFilter::unrestricted(),
            [id] => IdFilter {
                text: "SELECT * FROM c WHERE c.id = @item_0".to_string(),
                parameters: vec![("@item_0".to_string(), id.clone())],
            },
            _ => {
                let parameters: Vec<(String, String)> = ids
                    .iter()
                    .enumerate()
                    .map(|(i, id)| (format!("@item_{i}"), id.clone()))
                    .collect();
                let name_list = parameters
                    .iter()
                    .map(|(name, _)| name.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                IdFilter {
                    text: format!("SELECT * FROM c WHERE c.id IN ({name_list})"),
                    parameters,
                }
            }
        }
    }

    /// Filter text with parameter placeholders.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Bound parameters as (name, id) pairs, in input order.
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// Whether this filter restricts by id at all.
    pub fn is_unrestricted(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Whether a record with the given id satisfies this filter.
    ///
    /// Mirror of the store-side semantics, used by in-memory backends.
    pub fn matches(&self, id: &str) -> bool {
        self.is_unrestricted() || self.parameters.iter().any(|(_, value)| value == id)
    }
}
