//! Integration tests for minification
//!
//! Graph building, entry point resolution, reachability and archive
//! rewriting over JARs built on the fly.

mod common;

use common::*;
use jarslim::analysis::{EntryPointResolver, ReachabilityAnalyzer, RemovableSet};
use jarslim::archive::ArchiveRewriter;
use jarslim::config::MinifyConfig;
use jarslim::graph::UnitGraphBuilder;
use jarslim::Error;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::CompressionMethod;

fn removable_for(archives: &[PathBuf], config: &MinifyConfig) -> RemovableSet {
    let mut builder = UnitGraphBuilder::new();
    for archive in archives {
        builder.process_archive(archive).unwrap();
    }
    let graph = builder.build();
    let entry_points = EntryPointResolver::new(config).resolve(archives).unwrap();
    ReachabilityAnalyzer::new().removable_set(&graph, &entry_points)
}

fn entry_config(entry_points: &[&str]) -> MinifyConfig {
    MinifyConfig {
        artifacts: names(&["*:*"]),
        entry_points: names(entry_points),
        ..MinifyConfig::default()
    }
}

/// A.jar: X → Y, Y; B.jar: Z
fn two_archives(dir: &Path) -> Vec<PathBuf> {
    let a = dir.join("A.jar");
    let b = dir.join("B.jar");
    write_class_jar(&a, &[("com.example.X", &["com.example.Y"]), ("com.example.Y", &[])]);
    write_class_jar(&b, &[("com.example.Z", &[])]);
    vec![a, b]
}

// ============================================================================
// Reachability over archives
// ============================================================================

#[test]
fn test_unreachable_class_in_other_archive_is_removed() {
    let temp_dir = TempDir::new().unwrap();
    let archives = two_archives(temp_dir.path());

    let removable = removable_for(&archives, &entry_config(&["com.example.X"]));
    assert_eq!(removable.sorted_names(), vec!["com.example.Z"]);

    let output = temp_dir.path().join("B-out.jar");
    let stats = ArchiveRewriter::new()
        .with_removable(&removable)
        .rewrite(&archives[1], &output)
        .unwrap();

    assert_eq!(stats.removed, 1);
    assert_eq!(stats.retained, 0);
    assert!(member_names(&output).is_empty());
}

#[test]
fn test_entry_point_in_dependency_keeps_its_closure() {
    let temp_dir = TempDir::new().unwrap();
    let app = temp_dir.path().join("app.jar");
    let lib = temp_dir.path().join("lib.jar");
    write_class_jar(&app, &[("app.Main", &["lib.Api"]), ("app.Unused", &["lib.Internal"])]);
    write_class_jar(
        &lib,
        &[("lib.Api", &["lib.Impl"]), ("lib.Impl", &["lib.Api"]), ("lib.Internal", &[])],
    );
    let archives = vec![app, lib];

    let removable = removable_for(&archives, &entry_config(&["app.Main"]));
    assert_eq!(removable.sorted_names(), vec!["app.Unused", "lib.Internal"]);
}

#[test]
fn test_unknown_entry_point_changes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let archives = two_archives(temp_dir.path());

    let with_ghost = removable_for(&archives, &entry_config(&["com.example.X", "com.example.Ghost"]));
    let without = removable_for(&archives, &entry_config(&["com.example.X"]));
    assert_eq!(with_ghost, without);
}

#[test]
fn test_adding_entry_points_is_monotonic() {
    let temp_dir = TempDir::new().unwrap();
    let archives = two_archives(temp_dir.path());

    let none = removable_for(&archives, &entry_config(&[]));
    let some = removable_for(&archives, &entry_config(&["com.example.Y"]));
    let more = removable_for(&archives, &entry_config(&["com.example.Y", "com.example.Z"]));

    assert_eq!(none.len(), 3);
    assert!(some.len() <= none.len());
    assert!(more.len() <= some.len());
    for name in ["com.example.Y", "com.example.Z"] {
        assert!(!more.contains(name));
    }
    assert_eq!(more.sorted_names(), vec!["com.example.X"]);
}

#[test]
fn test_descriptor_constants_create_edges() {
    let temp_dir = TempDir::new().unwrap();
    let jar = temp_dir.path().join("descriptors.jar");
    write_jar(
        &jar,
        &[
            (
                member("app.Main").as_str(),
                class_with_utf8(
                    "app.Main",
                    &["(Lapp/Arg;)V", "Ljava/util/List<Lapp/Item;>;", "app/NotADescriptor"],
                ),
            ),
            (member("app.Arg").as_str(), class_bytes("app.Arg", &[])),
            (member("app.Item").as_str(), class_bytes("app.Item", &[])),
            (member("app.NotADescriptor").as_str(), class_bytes("app.NotADescriptor", &[])),
        ],
        CompressionMethod::Deflated,
    );

    let removable = removable_for(&[jar], &entry_config(&["app.Main"]));
    assert_eq!(removable.sorted_names(), vec!["app.NotADescriptor"]);
}

#[test]
fn test_repeated_property_key_keeps_last_value() {
    let temp_dir = TempDir::new().unwrap();
    let jar = temp_dir.path().join("override.jar");
    write_jar(
        &jar,
        &[
            ("META-INF/app.properties", b"main=com.example.Old\nmain=com.example.New\n".to_vec()),
            (member("com.example.Old").as_str(), class_bytes("com.example.Old", &[])),
            (member("com.example.New").as_str(), class_bytes("com.example.New", &[])),
        ],
        CompressionMethod::Deflated,
    );

    let config = MinifyConfig {
        artifacts: names(&["*:*"]),
        property_entry_points: names(&["META-INF/app.properties"]),
        ..MinifyConfig::default()
    };

    let removable = removable_for(&[jar], &config);
    assert_eq!(removable.sorted_names(), vec!["com.example.Old"]);
}

#[test]
fn test_duplicate_unit_last_archive_wins() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("first.jar");
    let second = temp_dir.path().join("second.jar");
    write_class_jar(&first, &[("dup.Shared", &["dup.OnlyFirst"]), ("dup.OnlyFirst", &[])]);
    write_class_jar(&second, &[("dup.Shared", &[])]);

    let mut builder = UnitGraphBuilder::new();
    builder.process_archive(&first).unwrap();
    builder.process_archive(&second).unwrap();
    let graph = builder.build();

    let shared = graph.get_unit("dup.Shared").unwrap();
    assert_eq!(shared.archive, second);
    assert!(shared.references.is_empty());

    let entry_points: BTreeSet<String> = ["dup.Shared".to_string()].into_iter().collect();
    let removable = ReachabilityAnalyzer::new().removable_set(&graph, &entry_points);
    assert_eq!(removable.sorted_names(), vec!["dup.OnlyFirst"]);
}

// ============================================================================
// Embedded entry point sources
// ============================================================================

#[test]
fn test_service_file_comment_is_stripped() {
    let temp_dir = TempDir::new().unwrap();
    let jar = temp_dir.path().join("plugins.jar");
    write_jar(
        &jar,
        &[
            (member("com.example.Impl").as_str(), class_bytes("com.example.Impl", &[])),
            (member("com.example.Other").as_str(), class_bytes("com.example.Other", &[])),
            (
                "META-INF/services/com.example.Plugin",
                b"com.example.Impl # comment\n\n# nothing here\n".to_vec(),
            ),
        ],
        CompressionMethod::Deflated,
    );

    let config = MinifyConfig {
        artifacts: names(&["*:*"]),
        service_entry_points: names(&["META-INF/services/com.example.Plugin"]),
        ..MinifyConfig::default()
    };

    let entry_points = EntryPointResolver::new(&config).resolve(&[&jar]).unwrap();
    assert_eq!(entry_points.into_iter().collect::<Vec<_>>(), vec!["com.example.Impl"]);

    let removable = removable_for(&[jar], &config);
    assert_eq!(removable.sorted_names(), vec!["com.example.Other"]);
}

#[test]
fn test_property_values_are_deduplicated() {
    let temp_dir = TempDir::new().unwrap();
    let jar = temp_dir.path().join("props.jar");
    write_jar(
        &jar,
        &[(
            "META-INF/app.properties",
            b"# registry\nfirst=com.example.A\nsecond = com.example.A\nthird:com.example.B\n".to_vec(),
        )],
        CompressionMethod::Stored,
    );

    let config = MinifyConfig {
        artifacts: names(&["*:*"]),
        property_entry_points: names(&["META-INF/app.properties", "META-INF/absent.properties"]),
        ..MinifyConfig::default()
    };

    let entry_points = EntryPointResolver::new(&config).resolve(&[&jar]).unwrap();
    assert_eq!(
        entry_points.into_iter().collect::<Vec<_>>(),
        vec!["com.example.A", "com.example.B"]
    );
}

#[test]
fn test_invalid_utf8_service_file_is_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let jar = temp_dir.path().join("bad.jar");
    write_jar(
        &jar,
        &[("META-INF/services/x", vec![0xFF, 0xFE, b'\n'])],
        CompressionMethod::Stored,
    );

    let config = MinifyConfig {
        artifacts: names(&["*:*"]),
        service_entry_points: names(&["META-INF/services/x"]),
        ..MinifyConfig::default()
    };

    let err = EntryPointResolver::new(&config).resolve(&[&jar]).unwrap_err();
    assert!(matches!(err, Error::Parse { member: Some(_), .. }), "got {:?}", err);
}

// ============================================================================
// Archive rewriting
// ============================================================================

#[test]
fn test_non_class_members_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("mixed.jar");
    write_jar(
        &input,
        &[
            ("META-INF/", vec![]),
            ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\r\n".to_vec()),
            ("com/example/messages.properties", b"greeting=hello\n".to_vec()),
            (member("com.example.Dead").as_str(), class_bytes("com.example.Dead", &[])),
        ],
        CompressionMethod::Stored,
    );

    let removable = removable_for(&[input.clone()], &entry_config(&[]));
    let output = temp_dir.path().join("mixed-out.jar");
    ArchiveRewriter::new()
        .with_removable(&removable)
        .rewrite(&input, &output)
        .unwrap();

    let before: Vec<_> = read_members(&input)
        .into_iter()
        .filter(|(name, _, _)| !name.ends_with(".class"))
        .collect();
    let after = read_members(&output);

    assert_eq!(after, before);
    assert!(after.iter().all(|(_, method, _)| *method == CompressionMethod::Stored));
}

#[test]
fn test_deflated_members_survive_recompression() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("deflated.jar");
    let payload: Vec<u8> = (0..4096u32).flat_map(|i| (i % 251).to_le_bytes()).collect();
    write_jar(
        &input,
        &[
            ("data/blob.bin", payload.clone()),
            (member("com.example.Kept").as_str(), class_bytes("com.example.Kept", &[])),
        ],
        CompressionMethod::Deflated,
    );

    for level in [Some(1), Some(9), None] {
        let output = temp_dir.path().join(format!("out-{:?}.jar", level));
        ArchiveRewriter::new()
            .with_compression_level(level)
            .rewrite(&input, &output)
            .unwrap();

        assert_eq!(read_members(&output), read_members(&input));
    }
}

#[test]
fn test_level_zero_writes_deflated_members_uncompressed() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("deflated.jar");
    let payload = vec![b'a'; 100 * 1024];
    write_jar(
        &input,
        &[("data/run.txt", payload.clone())],
        CompressionMethod::Deflated,
    );

    let output = temp_dir.path().join("level0.jar");
    ArchiveRewriter::new()
        .with_compression_level(Some(0))
        .rewrite(&input, &output)
        .unwrap();

    let members = read_members(&output);
    assert_eq!(members[0].0, "data/run.txt");
    assert_eq!(members[0].1, CompressionMethod::Stored);
    assert_eq!(members[0].2, payload);
    assert!(std::fs::metadata(&output).unwrap().len() > payload.len() as u64);
}

#[test]
fn test_modification_times_are_kept() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("dated.jar");
    let modified = zip::DateTime::from_date_and_time(2019, 4, 12, 8, 30, 40).unwrap();
    write_dated_jar(
        &input,
        &[
            (member("com.example.Kept").as_str(), class_bytes("com.example.Kept", &[])),
            ("com/example/notes.txt", b"notes".to_vec()),
        ],
        modified,
    );

    let output = temp_dir.path().join("dated-out.jar");
    ArchiveRewriter::new().rewrite(&input, &output).unwrap();

    assert_eq!(modified_times(&output), vec![Some(modified), Some(modified)]);
}

#[test]
fn test_rewrite_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let archives = two_archives(temp_dir.path());
    let config = entry_config(&["com.example.Y"]);

    let removable = removable_for(&archives, &config);
    let once = temp_dir.path().join("A-once.jar");
    ArchiveRewriter::new()
        .with_removable(&removable)
        .rewrite(&archives[0], &once)
        .unwrap();
    assert_eq!(member_names(&once), vec!["com/example/Y.class"]);

    let removable_again = removable_for(&[once.clone(), archives[1].clone()], &config);
    let twice = temp_dir.path().join("A-twice.jar");
    let stats = ArchiveRewriter::new()
        .with_removable(&removable_again)
        .rewrite(&once, &twice)
        .unwrap();

    assert_eq!(stats.removed, 0);
    assert_eq!(read_members(&twice), read_members(&once));
}

#[test]
fn test_unsupported_storage_method_aborts() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("bzip.jar");
    write_jar(&input, &[("data.txt", b"payload".to_vec())], CompressionMethod::Stored);
    corrupt_storage_methods(&input, 12);

    let err = ArchiveRewriter::new()
        .rewrite(&input, &temp_dir.path().join("bzip-out.jar"))
        .unwrap_err();
    match err {
        Error::UnsupportedStorage { member, .. } => assert_eq!(member, "data.txt"),
        other => panic!("expected UnsupportedStorage, got {:?}", other),
    }
}

#[test]
fn test_unsupported_class_storage_fails_graph_building() {
    let temp_dir = TempDir::new().unwrap();
    let jar = temp_dir.path().join("bzip-classes.jar");
    write_class_jar(&jar, &[("com.example.A", &[])]);
    corrupt_storage_methods(&jar, 12);

    let err = UnitGraphBuilder::new().process_archive(&jar).unwrap_err();
    match err {
        Error::UnsupportedStorage { member, .. } => assert_eq!(member, "com/example/A.class"),
        other => panic!("expected UnsupportedStorage, got {:?}", other),
    }
}

#[test]
fn test_unsupported_property_storage_fails_resolution() {
    let temp_dir = TempDir::new().unwrap();
    let jar = temp_dir.path().join("bzip-props.jar");
    write_jar(
        &jar,
        &[("META-INF/app.properties", b"main=com.example.A\n".to_vec())],
        CompressionMethod::Stored,
    );
    corrupt_storage_methods(&jar, 12);

    let config = MinifyConfig {
        artifacts: names(&["*:*"]),
        property_entry_points: names(&["META-INF/app.properties"]),
        ..MinifyConfig::default()
    };

    let err = EntryPointResolver::new(&config).resolve(&[&jar]).unwrap_err();
    match err {
        Error::UnsupportedStorage { member, .. } => assert_eq!(member, "META-INF/app.properties"),
        other => panic!("expected UnsupportedStorage, got {:?}", other),
    }
}

#[test]
fn test_malformed_class_aborts_graph_building() {
    let temp_dir = TempDir::new().unwrap();
    let jar = temp_dir.path().join("broken.jar");
    write_jar(
        &jar,
        &[("com/example/Broken.class", b"\xCA\xFE\xBA\xBE\x00".to_vec())],
        CompressionMethod::Deflated,
    );

    let err = UnitGraphBuilder::new().process_archive(&jar).unwrap_err();
    match err {
        Error::Parse { member, .. } => assert_eq!(member.as_deref(), Some("com/example/Broken.class")),
        other => panic!("expected Parse, got {:?}", other),
    }
}

#[test]
fn test_non_zip_input_is_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let jar = temp_dir.path().join("text.jar");
    std::fs::write(&jar, "just text").unwrap();

    let err = UnitGraphBuilder::new().process_archive(&jar).unwrap_err();
    assert!(matches!(err, Error::Parse { member: None, .. }), "got {:?}", err);
}
