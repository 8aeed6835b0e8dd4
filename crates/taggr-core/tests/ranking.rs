//! Integration tests for the vocabulary-to-result join: tag metadata CSV
//! and output-map JSON loaded from disk, ranked against a synthetic
//! probability vector. The engine is exercised separately; its contract
//! here is just "a float vector aligned with the output map".

use std::fmt::Write as _;

use taggr_core::{ranker, OutputMap, TagMetadata, TaggrError};

struct Fixture {
    metadata: TagMetadata,
    map: OutputMap,
    probs: Vec<f32>,
}

/// 120 general tags with varied thresholds, 40 characters, 3 ratings,
/// plus a couple of category codes this pipeline does not render.
fn synthetic_vocabulary() -> Fixture {
    let dir = tempfile::tempdir().unwrap();

    let mut csv = String::from("name,category,best_threshold\n");
    let mut tags = Vec::new();
    let mut probs = Vec::new();

    for i in 0..120 {
        let threshold = (i % 10) as f32 / 10.0;
        writeln!(csv, "general_{i},0,{threshold}").unwrap();
        tags.push(format!("general_{i}"));
        probs.push(1.0 - i as f32 / 200.0);
    }
    for i in 0..40 {
        writeln!(csv, "character_{i},4,0.35").unwrap();
        tags.push(format!("character_{i}"));
        probs.push(0.9 - i as f32 / 100.0);
    }
    for (name, score) in [("safe", 0.91), ("questionable", 0.06), ("explicit", 0.002)] {
        writeln!(csv, "{name},9,0.5").unwrap();
        tags.push(name.to_string());
        probs.push(score);
    }
    // Artist (1) and meta (5) codes exist in real vocabularies
    for (name, category) in [("some_artist", 1), ("highres", 5)] {
        writeln!(csv, "{name},{category},0.3").unwrap();
        tags.push(name.to_string());
        probs.push(0.99);
    }

    let tags_path = dir.path().join("selected_tags.csv");
    let labels_path = dir.path().join("config.json");
    std::fs::write(&tags_path, &csv).unwrap();
    std::fs::write(
        &labels_path,
        serde_json::json!({ "tags": tags }).to_string(),
    )
    .unwrap();

    Fixture {
        metadata: TagMetadata::load(&tags_path).unwrap(),
        map: OutputMap::load(&labels_path).unwrap(),
        probs,
    }
}

#[test]
fn category_partition_honors_policies() {
    let f = synthetic_vocabulary();
    let result = ranker::rank(&f.probs, &f.map, &f.metadata).unwrap();

    // General: capped at 50, every survivor above its own threshold
    assert!(result.general.len() <= 50);
    for tag in &result.general {
        let record = f.metadata.get(&tag.label).unwrap();
        assert_eq!(record.category, 0);
        assert!(tag.score > record.best_threshold);
    }

    // Character: capped at 30, thresholded
    assert!(result.character.len() <= 30);
    for tag in &result.character {
        let record = f.metadata.get(&tag.label).unwrap();
        assert_eq!(record.category, 4);
        assert!(tag.score > record.best_threshold);
    }

    // Rating: all three present even though two score below the 0.5
    // threshold their rows carry
    assert_eq!(result.rating.len(), 3);
    assert_eq!(result.rating[0].label, "safe");
    assert_eq!(result.rating[1].label, "questionable");
    assert_eq!(result.rating[2].label, "explicit");

    // Unrendered categories never leak into any group
    for tag in result
        .general
        .iter()
        .chain(&result.character)
        .chain(&result.rating)
    {
        assert_ne!(tag.label, "some_artist");
        assert_ne!(tag.label, "highres");
    }
}

#[test]
fn groups_are_sorted_descending() {
    let f = synthetic_vocabulary();
    let result = ranker::rank(&f.probs, &f.map, &f.metadata).unwrap();

    for group in [&result.general, &result.character, &result.rating] {
        for pair in group.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}

#[test]
fn vocabulary_mismatch_is_fatal() {
    let f = synthetic_vocabulary();

    // An output map naming a tag the metadata has never heard of
    let mut names: Vec<String> = f.map.names().to_vec();
    names[0] = "not_in_metadata".to_string();
    let json = serde_json::json!({ "tags": names }).to_string();
    let bad_map = OutputMap::from_reader(json.as_bytes()).unwrap();

    let err = ranker::rank(&f.probs, &bad_map, &f.metadata).unwrap_err();
    assert!(matches!(err, TaggrError::TagNotFound { .. }));
}
