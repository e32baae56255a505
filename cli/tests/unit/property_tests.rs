//! Property-based tests for archive layout, manifest selection, descriptor
//! generation and config validation.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use proptest::prelude::*;

use mcphub_cli::domain::archive::{entry_target, flatten_prefix};
use mcphub_cli::domain::config::{VALID_CONFIG_KEYS, validate_config_key, validate_config_value};
use mcphub_cli::domain::descriptor::{Directive, generate};
use mcphub_cli::domain::manifest::select_manifest;
use mcphub_common::{RunConfig, ServerDescriptor};

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,7}"
}

fn relative_path() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment(), 1..4)
}

fn descriptor() -> impl Strategy<Value = ServerDescriptor> {
    (
        segment(),
        "[0-9]\\.[0-9]\\.[0-9]",
        "[ -~]{0,20}",
        prop::sample::select(vec!["node", "python", "python3", "go", "deno", "./server"]),
        prop::collection::vec("[a-z.-]{1,8}", 0..3),
        prop::sample::select(vec![0u16, 80, 5050, 8080]),
    )
        .prop_map(|(name, version, description, command, args, port)| ServerDescriptor {
            name,
            version,
            description,
            run: RunConfig {
                command: command.to_string(),
                args,
                port,
            },
            ..ServerDescriptor::default()
        })
}

// ============================================================================
// Archive flattening
// ============================================================================

proptest! {
    /// Files all under one top folder are written without that folder.
    #[test]
    fn prop_shared_top_folder_is_stripped(
        top in segment(),
        paths in prop::collection::vec(relative_path(), 1..6),
    ) {
        let entries: Vec<String> = paths
            .iter()
            .map(|p| format!("{top}/{}", p.join("/")))
            .collect();
        let prefix = flatten_prefix(entries.iter().map(String::as_str));
        prop_assert_eq!(prefix.as_deref(), Some(top.as_str()));

        for (entry, path) in entries.iter().zip(&paths) {
            let target = entry_target(entry, prefix.as_deref()).expect("target");
            let expected: PathBuf = path.iter().collect();
            prop_assert_eq!(target, expected);
        }
    }

    /// A root-level file cancels flattening and every path is kept as-is.
    #[test]
    fn prop_mixed_depths_keep_original_paths(
        root_file in segment(),
        paths in prop::collection::vec(relative_path(), 1..6),
    ) {
        let mut entries = vec![root_file.clone()];
        entries.extend(paths.iter().map(|p| p.join("/")));
        for order in [entries.clone(), entries.iter().rev().cloned().collect()] {
            let prefix = flatten_prefix(order.iter().map(String::as_str));
            prop_assert_eq!(prefix, None);
        }

        for entry in &entries {
            let target = entry_target(entry, None).expect("target");
            let expected: PathBuf = entry.split('/').collect();
            prop_assert_eq!(target, expected);
        }
    }

    /// Entries with `..` never resolve to a target.
    #[test]
    fn prop_parent_segments_rejected(before in relative_path(), after in relative_path()) {
        let entry = format!("{}/../{}", before.join("/"), after.join("/"));
        prop_assert!(entry_target(&entry, None).is_err());
    }
}

// ============================================================================
// Manifest selection
// ============================================================================

proptest! {
    /// The shallowest manifest wins no matter how candidates are ordered.
    #[test]
    fn prop_shallowest_manifest_selected(
        dirs in prop::collection::vec(relative_path(), 1..5),
        shuffle_seed in any::<u64>(),
    ) {
        let mut candidates: Vec<PathBuf> = dirs
            .iter()
            .map(|d| d.iter().map(String::as_str).chain(["mcp.json"]).collect())
            .collect();
        let expected = {
            let mut sorted = candidates.clone();
            sorted.sort_by_key(|p| (p.components().count(), p.to_string_lossy().replace('\\', "/")));
            sorted[0].clone()
        };
        let len = candidates.len();
        #[allow(clippy::cast_possible_truncation)]
        candidates.rotate_left((shuffle_seed % len as u64) as usize);

        let chosen = select_manifest(&candidates).expect("non-empty");
        prop_assert_eq!(chosen.components().count(), expected.components().count());
        prop_assert_eq!(chosen, &expected);
    }
}

// ============================================================================
// Descriptor generation
// ============================================================================

proptest! {
    /// Same descriptor in, byte-identical text out.
    #[test]
    fn prop_generate_is_deterministic(server in descriptor()) {
        prop_assert_eq!(generate(&server).render(), generate(&server.clone()).render());
    }

    /// Port exposure and health check appear together, and only for port > 0.
    #[test]
    fn prop_port_controls_expose_and_healthcheck(server in descriptor()) {
        let built = generate(&server);
        let expose = built.directives().filter(|d| matches!(d, Directive::Expose(_))).count();
        let health = built
            .directives()
            .filter(|d| matches!(d, Directive::Healthcheck(_)))
            .count();
        let expected = usize::from(server.run.port > 0);
        prop_assert_eq!(expose, expected);
        prop_assert_eq!(health, expected);
    }

    /// The descriptor always ends with the entrypoint.
    #[test]
    fn prop_cmd_is_last_directive(server in descriptor()) {
        let built = generate(&server);
        let last = built.directives().last().cloned();
        prop_assert_eq!(last, Some(Directive::Cmd(server.entrypoint())));
    }
}

// ============================================================================
// validate_config_key() and validate_config_value()
// ============================================================================

proptest! {
    /// Keys outside the whitelist are rejected.
    #[test]
    fn prop_arbitrary_keys_rejected(key in "[a-z]{1,20}\\.[a-z_]{1,20}") {
        if !VALID_CONFIG_KEYS.contains(&key.as_str()) {
            prop_assert!(validate_config_key(&key).is_err(), "accepted invalid key: {key}");
        }
    }

    /// Backends other than `fs` and `s3` are rejected.
    #[test]
    fn prop_arbitrary_backends_rejected(value in "[a-z]{1,10}") {
        if value != "fs" && value != "s3" {
            prop_assert!(validate_config_value("storage.backend", &value).is_err());
        }
    }

    /// Any positive archive limit is accepted.
    #[test]
    fn prop_positive_archive_limits_accepted(mb in 1u64..100_000) {
        prop_assert!(validate_config_value("limits.max_archive_mb", &mb.to_string()).is_ok());
    }
}

#[test]
fn test_every_whitelisted_key_is_accepted() {
    for key in VALID_CONFIG_KEYS {
        assert!(validate_config_key(key).is_ok(), "{key} rejected");
    }
}
