/// Lazy iterator over a dotted state name and its ancestors
///
/// For `editApplication.logs.tail`, yields:
/// `editApplication.logs.tail` → `editApplication.logs` → `editApplication`
///
/// Borrows from the input, allocates nothing, and stops as soon as the
/// caller stops pulling (`find`, `any`, ...).
///
/// # Examples
///
/// ```
/// use cu_router::path::StateHierarchy;
///
/// let names: Vec<&str> = StateHierarchy::new("editApplication.overview").collect();
/// assert_eq!(names, vec!["editApplication.overview", "editApplication"]);
/// ```
#[derive(Debug, Clone)]
pub struct StateHierarchy<'a> {
    current: Option<&'a str>,
}

impl<'a> StateHierarchy<'a> {
    /// Creates a hierarchy iterator starting from the given state name
    pub fn new(name: &'a str) -> Self {
        Self {
            current: (!name.is_empty()).then_some(name),
        }
    }
}

impl<'a> Iterator for StateHierarchy<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = parent_name(current);
        Some(current)
    }
}

/// Returns the parent of a dotted state name
///
/// ```
/// use cu_router::path::parent_name;
///
/// assert_eq!(parent_name("editApplication.deploy"), Some("editApplication"));
/// assert_eq!(parent_name("editApplication"), None);
/// ```
pub fn parent_name(name: &str) -> Option<&str> {
    name.rfind('.').map(|pos| &name[..pos])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_hierarchy() {
        let names: Vec<&str> = StateHierarchy::new("a.b.c").collect();
        assert_eq!(names, vec!["a.b.c", "a.b", "a"]);

        let names: Vec<&str> = StateHierarchy::new("root").collect();
        assert_eq!(names, vec!["root"]);

        assert_eq!(StateHierarchy::new("").next(), None);
    }

    #[test]
    fn test_state_hierarchy_short_circuit() {
        let mut iter = StateHierarchy::new("a.b.c.d");
        assert_eq!(iter.find(|&n| n == "a.b"), Some("a.b"));
        assert_eq!(iter.next(), Some("a"));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_parent_name() {
        assert_eq!(parent_name("editApplication.monitoringApp"), Some("editApplication"));
        assert_eq!(parent_name("a.b.c"), Some("a.b"));
        assert_eq!(parent_name("a"), None);
    }
}
