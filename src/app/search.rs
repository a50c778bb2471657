use std::collections::HashSet;
use std::sync::Arc;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::dataset::Job;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

/// Job indices whose title or id fuzzy-matches `query`, best first.
pub(in crate::app) fn rank_jobs(jobs: &[Job], query: &str) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = jobs
        .iter()
        .enumerate()
        .filter_map(|(index, job)| {
            let title = fuzzy_match_score(&matcher, &job.title, query);
            let id = fuzzy_match_score(&matcher, &job.id, query);
            title.max(id).map(|score| (index, score))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    scored.into_iter().map(|(index, _)| index).collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct SearchKey {
    query: String,
    revision: u64,
}

#[derive(Debug, Default)]
pub(in crate::app) struct SearchMatchCache {
    key: Option<SearchKey>,
    ranked: Vec<usize>,
    matches: Arc<HashSet<usize>>,
}

impl SearchMatchCache {
    /// Re-ranks only when the trimmed query or the dataset revision changed.
    pub(in crate::app) fn refresh(&mut self, jobs: &[Job], query: &str, revision: u64) {
        let key = SearchKey {
            query: query.trim().to_owned(),
            revision,
        };
        if self.key.as_ref() == Some(&key) {
            return;
        }

        self.ranked = rank_jobs(jobs, &key.query);
        self.matches = Arc::new(self.ranked.iter().copied().collect());
        self.key = Some(key);
    }

    pub(in crate::app) fn ranked(&self) -> &[usize] {
        &self.ranked
    }

    pub(in crate::app) fn matches(&self) -> Option<Arc<HashSet<usize>>> {
        let active = self.key.as_ref().is_some_and(|key| !key.query.is_empty());
        active.then(|| Arc::clone(&self.matches))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use eframe::egui::Color32;

    use super::*;
    use crate::dataset::DomainPoint;

    fn jobs(titles: &[&str]) -> Vec<Job> {
        titles
            .iter()
            .enumerate()
            .map(|(index, title)| Job {
                id: format!("job-{index}"),
                title: (*title).to_owned(),
                position: DomainPoint::ORIGIN,
                cluster: 0,
                color: Color32::WHITE,
                affinities: BTreeMap::new(),
            })
            .collect()
    }

    #[test]
    fn blank_query_matches_nothing() {
        let jobs = jobs(&["Registered Nurse", "Data Engineer"]);
        assert!(rank_jobs(&jobs, "   ").is_empty());

        let mut cache = SearchMatchCache::default();
        cache.refresh(&jobs, "", 0);
        assert!(cache.matches().is_none());
    }

    #[test]
    fn titles_match_case_insensitively() {
        let jobs = jobs(&["Registered Nurse", "Data Engineer", "Nurse Practitioner"]);
        let ranked = rank_jobs(&jobs, "NURSE");
        assert_eq!(ranked.len(), 2);
        assert!(ranked.contains(&0) && ranked.contains(&2));
    }

    #[test]
    fn ids_are_searchable() {
        let jobs = jobs(&["Registered Nurse", "Data Engineer"]);
        assert_eq!(rank_jobs(&jobs, "job-1"), vec![1]);
    }

    #[test]
    fn cache_follows_query_and_revision() {
        let jobs = jobs(&["Registered Nurse", "Data Engineer"]);
        let mut cache = SearchMatchCache::default();

        cache.refresh(&jobs, "engineer", 1);
        let first = cache.matches().expect("active query");
        assert!(first.contains(&1));

        cache.refresh(&jobs, " engineer ", 1);
        let same = cache.matches().expect("active query");
        assert!(Arc::ptr_eq(&first, &same));

        cache.refresh(&jobs, "engineer", 2);
        let rebuilt = cache.matches().expect("active query");
        assert!(!Arc::ptr_eq(&first, &rebuilt));
        assert_eq!(cache.ranked(), &[1]);
    }
}
