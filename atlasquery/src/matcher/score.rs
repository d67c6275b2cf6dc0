//! Scoring region tables against a decoded region name.

use std::cmp::Ordering;

use serde::Serialize;

use super::chunk::RegionSpec;
use crate::atlas::RegionTable;

/// Most candidates offered as closest guesses when nothing matched.
pub const MAX_GUESSES: usize = 5;

const EXACT_CHUNK: i32 = 4;
const SHORTER_CHUNK: i32 = 2;
const LONGER_CHUNK: i32 = 1;
const UNMATCHED_CHUNK: i32 = -4;

/// Score of one user chunk against one table chunk; 0 when neither is a
/// prefix of the other.
pub fn chunk_score(user: &str, candidate: &str) -> i32 {
    let shared = user.len().min(candidate.len());
    if user.as_bytes()[..shared] != candidate.as_bytes()[..shared] {
        return 0;
    }
    match user.len().cmp(&candidate.len()) {
        Ordering::Equal => EXACT_CHUNK,
        Ordering::Less => SHORTER_CHUNK,
        Ordering::Greater => LONGER_CHUNK,
    }
}

/// Score of a whole table entry against `spec`.
pub fn score_region(spec: &RegionSpec, candidate: &RegionSpec) -> i32 {
    let mut score: i32 = spec
        .chunks
        .iter()
        .map(|user| {
            let best = candidate
                .chunks
                .iter()
                .map(|chunk| chunk_score(user, chunk))
                .max()
                .unwrap_or(0);
            if best == 0 {
                UNMATCHED_CHUNK
            } else {
                best
            }
        })
        .sum();

    let extra = candidate.chunk_count().saturating_sub(spec.chunk_count());
    score -= i32::try_from(extra).unwrap_or(i32::MAX);

    if spec.side.agrees_with(candidate.side) {
        score += 1;
    }
    score
}

/// A region table with every entry chunked, in table order.
#[derive(Debug, Clone, Default)]
pub struct ChunkedTable {
    regions: Vec<RegionSpec>,
}

impl ChunkedTable {
    pub fn new(table: &RegionTable) -> Self {
        let regions = table
            .entries()
            .iter()
            .map(|entry| {
                let mut spec = RegionSpec::from_label(entry.clean_name());
                spec.code = Some(entry.code);
                spec
            })
            .collect();
        Self { regions }
    }

    pub fn regions(&self) -> &[RegionSpec] {
        &self.regions
    }

    pub fn get(&self, index: usize) -> Option<&RegionSpec> {
        self.regions.get(index)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// How a ranking was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Numeric lookup; every entry with the code matched.
    Exact,
    /// One entry scored strictly best.
    Unique,
    /// Two entries tied that differ only by side.
    Pair,
    /// Several distinct entries share the best score.
    Ambiguous,
    /// Nothing reached the acceptance score.
    NotFound,
}

/// One ranked table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Position in the region table.
    pub index: usize,
    pub code: i32,
    /// Match score; 0 for numeric lookups.
    pub score: i32,
}

/// Outcome of matching one region name against one table.
///
/// The ranking is sorted by descending score, ties in table order. A match
/// needs a score of at least twice the number of query chunks, meaning every
/// chunk matched at least partially. The bound is inclusive: a score of
/// exactly twice the chunk count is a match. Among accepted rankings:
///
/// - a strictly best entry is [`MatchKind::Unique`]
/// - two tied entries with the same chunks (left/right of one structure),
///   clear of the third, are a [`MatchKind::Pair`]
/// - anything else tied at the top is [`MatchKind::Ambiguous`]
///
/// When nothing is accepted but the best score is positive, up to
/// [`MAX_GUESSES`] top-tied entries become closest guesses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Text that was matched.
    pub query: String,
    pub kind: MatchKind,
    /// Lowest accepted score.
    pub threshold: i32,
    ranking: Vec<Candidate>,
    matched: usize,
    guesses: usize,
}

impl SearchResult {
    pub fn ranking(&self) -> &[Candidate] {
        &self.ranking
    }

    /// Entries reported as matches.
    pub fn matches(&self) -> &[Candidate] {
        &self.ranking[..self.matched]
    }

    /// Suggestions offered when nothing matched.
    pub fn closest_guesses(&self) -> &[Candidate] {
        &self.ranking[..self.guesses]
    }

    pub fn is_match(&self) -> bool {
        self.matched > 0
    }

    pub fn best(&self) -> Option<&Candidate> {
        self.matches().first()
    }

    /// Distinct codes of the reported matches, in rank order.
    pub fn codes(&self) -> Vec<i32> {
        let mut codes: Vec<i32> = Vec::with_capacity(self.matched);
        for candidate in self.matches() {
            if !codes.contains(&candidate.code) {
                codes.push(candidate.code);
            }
        }
        codes
    }
}

/// Ranks every entry of `table` against `spec` and classifies the result.
pub fn find_regions(table: &ChunkedTable, spec: &RegionSpec) -> SearchResult {
    if spec.is_code() {
        return find_code(table, spec);
    }

    let mut ranking: Vec<Candidate> = table
        .regions
        .iter()
        .enumerate()
        .map(|(index, region)| Candidate {
            index,
            code: region.code.unwrap_or_default(),
            score: score_region(spec, region),
        })
        .collect();
    // sort_by is stable, keeping table order among equal scores
    ranking.sort_by(|a, b| b.score.cmp(&a.score));

    let threshold = i32::try_from(spec.chunk_count())
        .unwrap_or(i32::MAX / 2)
        .saturating_mul(2);
    let mut result = SearchResult {
        query: spec.original.clone(),
        kind: MatchKind::NotFound,
        threshold,
        ranking,
        matched: 0,
        guesses: 0,
    };

    let Some(top) = result.ranking.first().map(|c| c.score) else {
        return result;
    };
    let score_at = |i: usize| result.ranking.get(i).map(|c| c.score);
    let tied = result.ranking.iter().take_while(|c| c.score == top).count();

    if top < threshold {
        let few_enough = score_at(MAX_GUESSES).is_none_or(|s| s < top);
        if top > 0 && few_enough {
            result.guesses = tied.min(MAX_GUESSES);
        }
        return result;
    }

    let (kind, matched) = if score_at(1).is_none_or(|s| s < top) {
        (MatchKind::Unique, 1)
    } else if tied == 2 && is_side_pair(table, &result.ranking[0], &result.ranking[1]) {
        (MatchKind::Pair, 2)
    } else {
        (MatchKind::Ambiguous, tied)
    };
    result.kind = kind;
    result.matched = matched;
    result
}

fn is_side_pair(table: &ChunkedTable, a: &Candidate, b: &Candidate) -> bool {
    match (table.get(a.index), table.get(b.index)) {
        (Some(a), Some(b)) => a.same_chunks(b),
        _ => false,
    }
}

fn find_code(table: &ChunkedTable, spec: &RegionSpec) -> SearchResult {
    let ranking: Vec<Candidate> = table
        .regions
        .iter()
        .enumerate()
        .filter(|(_, region)| region.code == spec.code)
        .map(|(index, region)| Candidate {
            index,
            code: region.code.unwrap_or_default(),
            score: 0,
        })
        .collect();
    let matched = ranking.len();
    SearchResult {
        query: spec.original.clone(),
        kind: if matched > 0 {
            MatchKind::Exact
        } else {
            MatchKind::NotFound
        },
        threshold: 0,
        ranking,
        matched,
        guesses: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::{RegionEntry, RegionTable};
    use crate::matcher::decode;

    fn table(names: &[(i32, &str)]) -> ChunkedTable {
        ChunkedTable::new(&RegionTable::from_pairs(names.iter().copied()))
    }

    fn names<'a>(table: &'a ChunkedTable, found: &[Candidate]) -> Vec<&'a str> {
        found
            .iter()
            .map(|c| table.get(c.index).unwrap().original.as_str())
            .collect()
    }

    // =========================================================================
    // Chunk scores
    // =========================================================================

    #[test]
    fn test_chunk_score_rules() {
        assert_eq!(chunk_score("gyrus", "gyrus"), 4);
        assert_eq!(chunk_score("hippo", "hippocampus"), 2);
        assert_eq!(chunk_score("hippocampal", "hippo"), 1);
        assert_eq!(chunk_score("amygdala", "hippocampus"), 0);
        assert_eq!(chunk_score("ab", "ba"), 0);
    }

    #[test]
    fn test_score_region_penalties() {
        let spec = decode("superior gyrus").unwrap();
        let exact = RegionSpec::from_label("Superior Gyrus");
        let verbose = RegionSpec::from_label("Superior Temporal Gyrus");
        let wrong = RegionSpec::from_label("Inferior Gyrus");

        assert_eq!(score_region(&spec, &exact), 8);
        assert_eq!(score_region(&spec, &verbose), 7, "one extra chunk");
        assert_eq!(score_region(&spec, &wrong), 0, "unmatched chunk costs 4");
    }

    #[test]
    fn test_side_agreement_bonus() {
        let spec = decode("left amygdala").unwrap();
        assert_eq!(score_region(&spec, &RegionSpec::from_label("Left Amygdala")), 5);
        assert_eq!(score_region(&spec, &RegionSpec::from_label("Right Amygdala")), 4);

        let unknown = decode("amygdala").unwrap();
        assert_eq!(
            score_region(&unknown, &RegionSpec::from_label("Amygdala")),
            4,
            "unknown never agrees"
        );
    }

    // =========================================================================
    // Classification
    // =========================================================================

    #[test]
    fn test_unique_match() {
        let t = table(&[(1, "Left Amygdala"), (2, "Right Amygdala"), (3, "Insula")]);
        let result = find_regions(&t, &decode("left amygdala").unwrap());
        assert_eq!(result.kind, MatchKind::Unique);
        assert_eq!(names(&t, result.matches()), vec!["Left Amygdala"]);
        assert_eq!(result.codes(), vec![1]);
    }

    #[test]
    fn test_left_right_pair() {
        let t = table(&[(10, "Left Hippocampus"), (11, "Right Hippocampus")]);
        let result = find_regions(&t, &decode("hippocampus").unwrap());
        assert_eq!(result.kind, MatchKind::Pair, "two-entry table must pair");
        assert_eq!(result.matches().len(), 2);
        assert_eq!(result.codes(), vec![10, 11]);
    }

    #[test]
    fn test_pair_needs_clear_third() {
        let t = table(&[
            (1, "Left Hippocampus"),
            (2, "Right Hippocampus"),
            (3, "Hippocampus"),
        ]);
        let result = find_regions(&t, &decode("hippocampus").unwrap());
        assert_eq!(result.kind, MatchKind::Ambiguous);
        assert_eq!(result.matches().len(), 3);
    }

    #[test]
    fn test_pair_with_lower_third() {
        let t = table(&[
            (1, "Left Hippocampus"),
            (2, "Right Hippocampus"),
            (3, "Hippocampus Tail Region"),
        ]);
        let result = find_regions(&t, &decode("hippocampus").unwrap());
        assert_eq!(result.kind, MatchKind::Pair);
        assert_eq!(result.codes(), vec![1, 2]);
    }

    #[test]
    fn test_distinct_ties_are_ambiguous() {
        let t = table(&[(1, "Caudate Head"), (2, "Caudate Tail"), (3, "Putamen")]);
        let result = find_regions(&t, &decode("caudate").unwrap());
        assert_eq!(result.kind, MatchKind::Ambiguous);
        assert_eq!(names(&t, result.matches()), vec!["Caudate Head", "Caudate Tail"]);
    }

    #[test]
    fn test_partial_match_accepted_at_threshold() {
        let t = table(&[(1, "Thalamus"), (2, "Putamen")]);
        let result = find_regions(&t, &decode("thal").unwrap());
        assert_eq!(result.threshold, 2);
        assert_eq!(result.kind, MatchKind::Unique);
        assert_eq!(result.ranking()[0].score, 2);
    }

    #[test]
    fn test_unmatched_chunks_not_found() {
        let t = table(&[(1, "Thalamus"), (2, "Putamen")]);
        let result = find_regions(&t, &decode("cerebellum").unwrap());
        assert_eq!(result.kind, MatchKind::NotFound);
        assert!(result.matches().is_empty());
        assert!(result.closest_guesses().is_empty());
        assert!(result.ranking().iter().all(|c| c.score <= 0));
    }

    #[test]
    fn test_closest_guesses() {
        let t = table(&[(1, "Superior Temporal Gyrus"), (2, "Putamen")]);
        // "frontal" matches nothing: 4 - 4 + 4 is below the threshold of 6
        let result = find_regions(&t, &decode("superior frontal gyrus").unwrap());
        assert_eq!(result.kind, MatchKind::NotFound);
        assert_eq!(result.ranking()[0].score, 4);
        assert_eq!(names(&t, result.closest_guesses()), vec!["Superior Temporal Gyrus"]);
        assert!(!result.is_match());
    }

    #[test]
    fn test_ties_stay_in_table_order() {
        let t = table(&[(5, "Area B"), (4, "Area A"), (3, "Area C")]);
        let result = find_regions(&t, &decode("area").unwrap());
        let order: Vec<usize> = result.ranking().iter().map(|c| c.index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    // =========================================================================
    // Numeric lookup
    // =========================================================================

    #[test]
    fn test_numeric_single_exact() {
        let t = table(&[(41, "Putamen"), (42, "Thalamus")]);
        let result = find_regions(&t, &decode("42").unwrap());
        assert_eq!(result.kind, MatchKind::Exact);
        assert_eq!(result.matches().len(), 1);
        assert_eq!(result.best().unwrap().code, 42);
    }

    #[test]
    fn test_numeric_shared_code_returns_both() {
        let t = ChunkedTable::new(&RegionTable::new(vec![
            RegionEntry::new(7, "Left Caudate"),
            RegionEntry::new(7, "Right Caudate"),
            RegionEntry::new(8, "Insula"),
        ]));
        let result = find_regions(&t, &decode("7").unwrap());
        assert_eq!(result.kind, MatchKind::Exact);
        assert_eq!(result.matches().len(), 2);
        assert_eq!(result.codes(), vec![7], "codes are distinct");
    }

    #[test]
    fn test_numeric_missing_not_found() {
        let t = table(&[(1, "Putamen")]);
        let result = find_regions(&t, &decode("99").unwrap());
        assert_eq!(result.kind, MatchKind::NotFound);
        assert!(result.ranking().is_empty());
    }

    #[test]
    fn test_empty_table() {
        let result = find_regions(&ChunkedTable::default(), &decode("putamen").unwrap());
        assert_eq!(result.kind, MatchKind::NotFound);
    }
}
