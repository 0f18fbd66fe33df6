use super::filters::{matches_query, SearchFilters};
use super::profile::SmeProfile;

/// Stateful search over the SME directory. The candidate list is externally
/// supplied and may be replaced at any time; the filtered view is recomputed
/// whenever the query, the filters, or the candidates change, preserving
/// source order.
#[derive(Debug, Default)]
pub struct DirectorySearch {
    query: String,
    filters: SearchFilters,
    candidates: Vec<SmeProfile>,
    view: Vec<SmeProfile>,
}

impl DirectorySearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_candidates(candidates: Vec<SmeProfile>) -> Self {
        let mut search = Self::default();
        search.set_candidates(candidates);
        search
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    /// The derived filtered view, in source order.
    pub fn results(&self) -> &[SmeProfile] {
        &self.view
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.recompute();
    }

    pub fn set_filters(&mut self, filters: SearchFilters) {
        self.filters = filters;
        self.recompute();
    }

    pub fn update_filters(&mut self, update: impl FnOnce(&mut SearchFilters)) {
        update(&mut self.filters);
        self.recompute();
    }

    /// Replace the candidate list with a fresh snapshot. Last update wins.
    pub fn set_candidates(&mut self, candidates: Vec<SmeProfile>) {
        self.candidates = candidates;
        self.recompute();
    }

    /// Reset the query and every filter in one atomic update; the view
    /// returns to the full candidate list.
    pub fn clear(&mut self) {
        self.query.clear();
        self.filters = SearchFilters::default();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.view = self
            .candidates
            .iter()
            .filter(|profile| matches_query(profile, &self.query))
            .filter(|profile| self.filters.matches(profile))
            .cloned()
            .collect();
    }
}
