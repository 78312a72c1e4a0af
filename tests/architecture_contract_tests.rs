//! Architecture contract tests.

mod support;

use support::architecture::{find_non_export_lines_in_mod_files, find_production_lines_containing};

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = find_production_lines_containing(
        "src/domain",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "crate::port",
            "tokio::",
            "reqwest::",
            "diesel::",
            "teloxide::",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn application_layer_has_no_direct_adapter_imports() {
    let hits = find_production_lines_containing(
        "src/application",
        &["crate::adapter::", "crate::infrastructure::", "reqwest::", "diesel::"],
    );
    assert!(
        hits.is_empty(),
        "application layer should not import adapters directly: {hits:#?}"
    );
}

#[test]
fn ports_do_not_depend_on_adapters_or_services() {
    let hits = find_production_lines_containing(
        "src/port",
        &["crate::adapter::", "crate::application::", "crate::infrastructure::"],
    );
    assert!(hits.is_empty(), "ports should only use the domain: {hits:#?}");
}

#[test]
fn inbound_adapters_talk_to_the_request_port() {
    let hits = find_production_lines_containing(
        "src/adapter/inbound",
        &["crate::application::", "crate::infrastructure::"],
    );
    assert!(
        hits.is_empty(),
        "inbound adapters should go through port::inbound: {hits:#?}"
    );
}

#[test]
fn mod_rs_is_export_only() {
    let violations = find_non_export_lines_in_mod_files("src");
    assert!(
        violations.is_empty(),
        "found non-export content in mod.rs files: {violations:#?}"
    );
}
