//! Title search over the task cache.

use super::cache::TaskCache;

/// Shown when a search matches nothing.
pub const NO_MATCHES: &str = "No tasks found.";

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Cache key, used to open the task.
    pub key: String,
    /// Human-facing id.
    pub id: String,
    /// Title.
    pub title: String,
}

impl SearchHit {
    /// `"<id> - <title>"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {}", self.id, self.title)
    }
}

/// Tasks whose title contains `query`, ignoring case.
///
/// Returns `None` for a blank query (no search), and `Some` of a possibly
/// empty list otherwise.
#[must_use]
pub fn search(cache: &TaskCache<'_>, query: &str) -> Option<Vec<SearchHit>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    Some(
        cache
            .iter()
            .filter(|(_, task)| task.title.to_lowercase().contains(&needle))
            .map(|(key, task)| SearchHit {
                key: key.to_string(),
                id: task.id.clone(),
                title: task.title.clone(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Api;
    use crate::model::Task;
    use crate::testing::ScriptedBackend;

    #[test]
    fn matches_titles_case_insensitively() {
        let backend = ScriptedBackend::new(vec![]);
        let mut cache = TaskCache::new(Api::new(&backend));
        cache.insert("k1", Task { id: "1".into(), title: "Write Docs".into(), ..Task::default() });
        cache.insert("k2", Task { id: "2".into(), title: "Fix login".into(), ..Task::default() });

        let hits = search(&cache, "DOC").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].label(), "1 - Write Docs");

        assert_eq!(search(&cache, "  "), None);
        assert_eq!(search(&cache, "nothing"), Some(vec![]));
    }
}
