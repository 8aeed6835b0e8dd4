//! Probability ranking and category filtering.
//!
//! Joins the model's flat probability vector with the tag metadata,
//! sorts by descending score, and partitions survivors into the three
//! reported groups. Each category code carries its own policy (group,
//! threshold rule, cap), kept as a table so new codes can be mapped
//! without touching the ranking loop.

use crate::error::TaggrError;
use crate::labels::OutputMap;
use crate::metadata::TagMetadata;
use crate::types::{TagInfo, TagOutput};

/// Output group a category code maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    General,
    Character,
    Rating,
}

/// Filtering policy for one category code.
struct CategoryPolicy {
    category: i32,
    group: Group,
    /// Whether `score > best_threshold` is required
    apply_threshold: bool,
    /// Maximum number of survivors, None for unbounded
    limit: Option<usize>,
}

/// Category codes this pipeline renders. Ratings are a small closed
/// category, so they are reported exhaustively with no threshold.
const POLICIES: [CategoryPolicy; 3] = [
    CategoryPolicy {
        category: 0,
        group: Group::General,
        apply_threshold: true,
        limit: Some(50),
    },
    CategoryPolicy {
        category: 4,
        group: Group::Character,
        apply_threshold: true,
        limit: Some(30),
    },
    CategoryPolicy {
        category: 9,
        group: Group::Rating,
        apply_threshold: false,
        limit: None,
    },
];

fn policy_for(category: i32) -> Option<&'static CategoryPolicy> {
    POLICIES.iter().find(|p| p.category == category)
}

/// Rank a probability vector against the output map and tag metadata.
///
/// `probs` must be positionally aligned with `map` (the engine adapter
/// validates the lengths before this runs). Ties sort by ascending
/// output index; this is observable in the result ordering and relied on
/// by downstream consumers.
///
/// Every name in the map must have a metadata record. A missing record
/// is fatal even if the prediction would have been filtered out, since
/// it means the vocabulary and output map do not belong together.
pub fn rank(
    probs: &[f32],
    map: &OutputMap,
    metadata: &TagMetadata,
) -> Result<TagOutput, TaggrError> {
    let mut scored: Vec<(f32, &str)> = probs
        .iter()
        .copied()
        .zip(map.names().iter().map(String::as_str))
        .collect();

    // Stable sort: equal scores keep ascending output-index order.
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut output = TagOutput::default();
    for (score, name) in scored {
        let record = metadata.get(name).ok_or_else(|| TaggrError::TagNotFound {
            name: name.to_string(),
        })?;

        let Some(policy) = policy_for(record.category) else {
            continue;
        };
        if policy.apply_threshold && score <= record.best_threshold {
            continue;
        }

        let group = match policy.group {
            Group::General => &mut output.general,
            Group::Character => &mut output.character,
            Group::Rating => &mut output.rating,
        };
        if policy.limit.is_some_and(|cap| group.len() >= cap) {
            continue;
        }
        group.push(TagInfo::new(name, score));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(rows: &[(&str, i32, f32)]) -> TagMetadata {
        let mut csv = String::from("name,category,best_threshold\n");
        for (name, category, threshold) in rows {
            csv.push_str(&format!("{name},{category},{threshold}\n"));
        }
        TagMetadata::from_reader(csv.as_bytes()).unwrap()
    }

    fn output_map(names: &[&str]) -> OutputMap {
        let json = serde_json::json!({ "tags": names }).to_string();
        OutputMap::from_reader(json.as_bytes()).unwrap()
    }

    #[test]
    fn test_end_to_end_scenario() {
        let meta = metadata(&[
            ("a", 0, 0.3),
            ("b", 0, 0.6),
            ("c", 4, 0.2),
            ("d", 9, 0.0),
        ]);
        let map = output_map(&["a", "b", "c", "d"]);
        let probs = [0.5, 0.7, 0.1, 0.9];

        let result = rank(&probs, &map, &meta).unwrap();
        assert_eq!(result.general.len(), 2);
        assert_eq!(result.general[0], TagInfo::new("b", 0.7));
        assert_eq!(result.general[1], TagInfo::new("a", 0.5));
        assert!(result.character.is_empty()); // 0.1 < 0.2
        assert_eq!(result.rating, vec![TagInfo::new("d", 0.9)]);
    }

    #[test]
    fn test_tie_breaks_by_output_index() {
        let meta = metadata(&[("late", 0, 0.1), ("early", 0, 0.1), ("top", 0, 0.1)]);
        let map = output_map(&["late", "early", "top"]);
        let probs = [0.5, 0.5, 0.8];

        let result = rank(&probs, &map, &meta).unwrap();
        let labels: Vec<&str> = result.general.iter().map(|t| t.label.as_str()).collect();
        // "late" has the lower output index, so it sorts before "early"
        assert_eq!(labels, ["top", "late", "early"]);
    }

    #[test]
    fn test_score_equal_to_threshold_excluded() {
        let meta = metadata(&[("edge", 0, 0.5)]);
        let map = output_map(&["edge"]);

        let result = rank(&[0.5], &map, &meta).unwrap();
        assert!(result.general.is_empty());
    }

    #[test]
    fn test_general_capped_at_50() {
        let names: Vec<String> = (0..60).map(|i| format!("g{i}")).collect();
        let rows: Vec<(&str, i32, f32)> = names.iter().map(|n| (n.as_str(), 0, 0.0)).collect();
        let meta = metadata(&rows);
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let map = output_map(&refs);
        let probs: Vec<f32> = (0..60).map(|i| 0.9 - i as f32 * 0.01).collect();

        let result = rank(&probs, &map, &meta).unwrap();
        assert_eq!(result.general.len(), 50);
        // Highest-scoring survivors are kept
        assert_eq!(result.general[0].label, "g0");
        assert_eq!(result.general[49].label, "g49");
    }

    #[test]
    fn test_character_capped_at_30() {
        let names: Vec<String> = (0..35).map(|i| format!("c{i}")).collect();
        let rows: Vec<(&str, i32, f32)> = names.iter().map(|n| (n.as_str(), 4, 0.0)).collect();
        let meta = metadata(&rows);
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let map = output_map(&refs);
        let probs: Vec<f32> = (0..35).map(|i| 0.9 - i as f32 * 0.01).collect();

        let result = rank(&probs, &map, &meta).unwrap();
        assert_eq!(result.character.len(), 30);
    }

    #[test]
    fn test_rating_unfiltered_and_uncapped() {
        // Thresholds above the scores would filter these out if the
        // rating policy applied thresholds at all.
        let meta = metadata(&[
            ("safe", 9, 0.9),
            ("questionable", 9, 0.9),
            ("explicit", 9, 0.9),
        ]);
        let map = output_map(&["safe", "questionable", "explicit"]);
        let probs = [0.8, 0.05, 0.001];

        let result = rank(&probs, &map, &meta).unwrap();
        assert_eq!(result.rating.len(), 3);
        assert_eq!(result.rating[0].label, "safe");
        assert_eq!(result.rating[2].label, "explicit");
    }

    #[test]
    fn test_unknown_category_produces_no_output() {
        let meta = metadata(&[("artist_tag", 1, 0.0), ("sky", 0, 0.0)]);
        let map = output_map(&["artist_tag", "sky"]);

        let result = rank(&[0.9, 0.8], &map, &meta).unwrap();
        assert_eq!(result.general.len(), 1);
        assert_eq!(result.general[0].label, "sky");
        assert!(result.character.is_empty());
        assert!(result.rating.is_empty());
    }

    #[test]
    fn test_missing_metadata_is_fatal() {
        let meta = metadata(&[("known", 0, 0.0)]);
        let map = output_map(&["known", "phantom"]);

        let err = rank(&[0.9, 0.1], &map, &meta).unwrap_err();
        match err {
            TaggrError::TagNotFound { name } => assert_eq!(name, "phantom"),
            other => panic!("expected TagNotFound, got {other}"),
        }
    }
}
