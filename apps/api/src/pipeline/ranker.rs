//! Opportunity ranking: which member companies to search, and in what order.

use crate::directory::{DirectoryEntry, DirectoryStore};
use crate::models::profile::SkillSet;

/// How many top-ranked companies get a job search.
pub const TOP_OPPORTUNITIES: usize = 5;

#[derive(Debug, Clone)]
pub struct RankedOpportunity<'a> {
    pub entry: &'a DirectoryEntry,
    pub match_count: usize,
}

/// Ranks every directory entry by how many candidate skills appear in its
/// industry/subsector text. The sort is stable, so equal counts keep the
/// directory's own order.
pub fn rank_opportunities<'a>(
    directory: &'a DirectoryStore,
    skills: &SkillSet,
) -> Vec<RankedOpportunity<'a>> {
    let mut ranked: Vec<RankedOpportunity<'a>> = directory
        .members()
        .iter()
        .map(|entry| {
            let keywords = format!("{} {}", entry.industry, entry.subsector).to_lowercase();
            let match_count = skills
                .iter()
                .filter(|skill| keywords.contains(&skill.to_lowercase()))
                .count();
            RankedOpportunity { entry, match_count }
        })
        .collect();
    ranked.sort_by(|a, b| b.match_count.cmp(&a.match_count));
    ranked
}

/// The top-ranked entries, in rank order.
pub fn top_opportunities<'a>(
    directory: &'a DirectoryStore,
    skills: &SkillSet,
) -> Vec<&'a DirectoryEntry> {
    rank_opportunities(directory, skills)
        .into_iter()
        .take(TOP_OPPORTUNITIES)
        .map(|ranked| ranked.entry)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::directory::DirectoryStore;

    fn make_entry(name: &'static str, industry: &'static str, subsector: &'static str) -> DirectoryEntry {
        DirectoryEntry {
            name,
            overview: "",
            website: "",
            careers_url: "https://example.org/careers",
            linkedin: "",
            industry,
            subsector,
        }
    }

    fn make_store(entries: Vec<DirectoryEntry>) -> DirectoryStore {
        DirectoryStore::new(entries, Vec::new(), Vec::new())
    }

    #[test]
    fn test_skill_match_is_case_insensitive_substring() {
        let store = make_store(vec![make_entry(
            "Agilitas Energy, Inc.",
            "Renewable Energy; Energy Storage",
            "Solar PV Systems; Battery Energy Storage Systems",
        )]);
        let skills: SkillSet = ["SOLAR PV", "battery energy storage", "accounting"]
            .into_iter()
            .collect();
        let ranked = rank_opportunities(&store, &skills);
        assert_eq!(ranked[0].match_count, 2);
    }

    #[test]
    fn test_ranking_is_descending_by_match_count() {
        let store = make_store(vec![
            make_entry("Low", "Accounting", "Tax"),
            make_entry("High", "Renewable Energy", "Solar; Wind; Storage"),
        ]);
        let skills: SkillSet = ["solar", "wind"].into_iter().collect();
        let ranked = rank_opportunities(&store, &skills);
        assert_eq!(ranked[0].entry.name, "High");
        assert_eq!(ranked[1].entry.name, "Low");
    }

    #[test]
    fn test_ties_keep_directory_order() {
        let store = make_store(vec![
            make_entry("First", "Clean Energy", "Solar"),
            make_entry("Second", "Clean Energy", "Solar"),
            make_entry("Third", "Clean Energy", "Solar"),
        ]);
        let skills: SkillSet = ["solar"].into_iter().collect();
        let ranked = rank_opportunities(&store, &skills);
        let names: Vec<&str> = ranked.iter().map(|r| r.entry.name).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_zero_skill_profile_keeps_directory_order() {
        let store = DirectoryStore::approved();
        let ranked = rank_opportunities(&store, &SkillSet::new());
        assert!(ranked.iter().all(|r| r.match_count == 0));
        assert_eq!(ranked[0].entry.name, "Abode Energy Management");
        assert_eq!(ranked.len(), 10);
    }

    #[test]
    fn test_top_opportunities_truncates_to_limit() {
        let store = DirectoryStore::approved();
        let skills: SkillSet = ["energy"].into_iter().collect();
        let top = top_opportunities(&store, &skills);
        assert_eq!(top.len(), TOP_OPPORTUNITIES);
    }

    #[test]
    fn test_energy_efficiency_skill_prefers_abode() {
        let store = DirectoryStore::approved();
        let skills: SkillSet = ["energy efficiency"].into_iter().collect();
        let ranked = rank_opportunities(&store, &skills);
        // "Energy efficiency" appears in Abode's subsector text.
        assert_eq!(ranked[0].entry.name, "Abode Energy Management");
        assert_eq!(ranked[0].match_count, 1);
    }
}
