//! End-to-end CLI integration tests
//!
//! These tests invoke the compiled binary as a subprocess to verify
//! that the CLI behaves correctly from a user's perspective.

use assert_cmd::Command;
use predicates::prelude::*;

/// Returns a Command configured to run our binary.
///
/// Note: `cargo_bin` is marked deprecated for edge cases involving custom
/// cargo build directories, but works correctly for standard project layouts.
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("Options:"));
}

#[test]
fn short_help_flag_shows_usage() {
    cmd()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn version_flag_shows_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn short_version_flag_shows_version() {
    cmd()
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_only_prints_bare_version() {
    cmd()
        .arg("--version-only")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "{}\n",
            env!("CARGO_PKG_VERSION")
        )));
}

// =============================================================================
// Info Command
// =============================================================================

#[test]
fn info_shows_package_name_and_version() {
    cmd()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_NAME")))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn info_json_outputs_valid_json() {
    let output = cmd().arg("info").arg("--json").assert().success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("info --json should output valid JSON");

    assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn info_json_contains_expected_fields() {
    cmd()
        .arg("info")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\""))
        .stdout(predicate::str::contains("\"version\""));
}

#[test]
fn info_help_shows_command_options() {
    cmd()
        .args(["info", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--json"));
}

// =============================================================================
// Global Flags
// =============================================================================

#[test]
fn quiet_flag_accepted() {
    cmd().args(["--quiet", "info"]).assert().success();
}

#[test]
fn short_quiet_flag_accepted() {
    cmd().args(["-q", "info"]).assert().success();
}

#[test]
fn verbose_flag_accepted() {
    cmd().args(["--verbose", "info"]).assert().success();
}

#[test]
fn short_verbose_flag_accepted() {
    cmd().args(["-v", "info"]).assert().success();
}

#[test]
fn multiple_verbose_flags_accepted() {
    cmd().args(["-vv", "info"]).assert().success();
}

#[test]
fn color_auto_accepted() {
    cmd().args(["--color", "auto", "info"]).assert().success();
}

#[test]
fn color_always_accepted() {
    cmd().args(["--color", "always", "info"]).assert().success();
}

#[test]
fn color_never_accepted() {
    cmd().args(["--color", "never", "info"]).assert().success();
}

#[test]
fn log_level_flag_accepted() {
    cmd().args(["--log-level", "debug", "info"]).assert().success();
}

// =============================================================================
// Helpers
// =============================================================================

/// Write `content` to `name` inside a fresh temp dir.
fn fixture(name: &str, content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    let path = path.to_str().unwrap().to_string();
    (dir, path)
}

fn stdout_json(assert: &assert_cmd::assert::Assert) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    serde_json::from_str(&stdout).expect("stdout should be valid JSON")
}

const SITE_GRAPH: &str = r#"[
  {"url": "/", "internalLinksTo": ["/a", "/b"]},
  {"url": "/a", "internalLinksTo": ["/"]},
  {"url": "/b", "internalLinksTo": []},
  {"url": "/lonely", "internalLinksTo": []}
]"#;

// =============================================================================
// Keywords
// =============================================================================

#[test]
fn keywords_json_reports_density() {
    let (_dir, path) = fixture("post.txt", "SEO tips. Good SEO takes time.");
    let assert = cmd()
        .args(["keywords", &path, "-k", "seo", "--json"])
        .assert()
        .success();

    let json = stdout_json(&assert);
    assert_eq!(json["total_words"], 6);
    assert_eq!(json["keywords"][0]["keyword"], "seo");
    assert_eq!(json["keywords"][0]["occurrences"], 2);
    assert_eq!(json["keywords"][0]["status"], "high");
}

#[test]
fn keywords_ignore_markdown_code() {
    let (_dir, path) = fixture(
        "post.md",
        "# SEO basics\n\nSEO tips help.\n\n```\nseo seo seo seo\n```\n",
    );
    let assert = cmd()
        .args(["keywords", &path, "-k", "seo", "--json"])
        .assert()
        .success();

    let json = stdout_json(&assert);
    assert_eq!(json["total_words"], 5);
    assert_eq!(json["keywords"][0]["occurrences"], 2);
    let kinds: Vec<&str> = json["suggestions"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["kind"].as_str())
        .collect();
    assert!(!kinds.contains(&"missing_headings"));
}

#[test]
fn keywords_text_lists_suggestions() {
    let (_dir, path) = fixture("post.txt", "SEO tips. Good SEO takes time.");
    cmd()
        .args(["keywords", &path, "-k", "seo,backlinks"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Keyword:"))
        .stdout(predicate::str::contains("Suggestions:"))
        .stdout(predicate::str::contains("backlinks"));
}

#[test]
fn keywords_strict_fails_on_suggestions() {
    let (_dir, path) = fixture("post.txt", "SEO tips. Good SEO takes time.");
    cmd()
        .args(["keywords", &path, "-k", "seo", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("keyword suggestion"));
}

#[test]
fn keywords_missing_file_fails() {
    cmd()
        .args(["keywords", "/nonexistent/post.md", "-k", "seo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

// =============================================================================
// Precision
// =============================================================================

#[test]
fn precision_enhance_writes_output_file() {
    let (dir, path) = fixture("post.txt", "This is very good advice.");
    let out = dir.path().join("enhanced.txt");
    cmd()
        .args([
            "precision",
            &path,
            "--enhance",
            "--output",
            out.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Precision:"));

    let written = std::fs::read_to_string(out).unwrap();
    assert_eq!(written, "This is excellent advice.");
}

#[test]
fn precision_enhance_keeps_markdown_links_and_code() {
    let source = "# Tips\n\nRead the [good guide](https://example.com/good-stuff) and run `let big = 1;`.\n\n```rust\nlet good = true;\n```\n";
    let (dir, path) = fixture("post.md", source);
    let out = dir.path().join("enhanced.md");
    cmd()
        .args([
            "precision",
            &path,
            "--enhance",
            "-o",
            out.to_str().unwrap(),
        ])
        .assert()
        .success();

    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        written,
        "# Tips\n\nRead the [effective guide](https://example.com/good-stuff) and run `let big = 1;`.\n\n```rust\nlet good = true;\n```\n"
    );
}

#[test]
fn precision_json_includes_changes_when_enhancing() {
    let (_dir, path) = fixture("post.txt", "We did this in order to win.");
    let assert = cmd()
        .args(["precision", &path, "--enhance", "--json"])
        .assert()
        .success();

    let json = stdout_json(&assert);
    assert!(json["score"].as_f64().unwrap() < 100.0);
    assert_eq!(json["enhancement"]["content"], "We did this to win.");
    assert_eq!(json["enhancement"]["changes"][0]["type"], "precision");
}

#[test]
fn precision_min_score_gate_fails() {
    let (_dir, path) = fixture("post.txt", "It is really very nice stuff.");
    cmd()
        .args(["precision", &path, "--min-score", "90"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("below minimum"));
}

#[test]
fn precision_clean_text_passes_gate() {
    let (_dir, path) = fixture("post.txt", "Compress images before upload.");
    cmd()
        .args(["precision", &path, "--min-score", "90"])
        .assert()
        .success();
}

// =============================================================================
// LSI
// =============================================================================

#[test]
fn lsi_with_keyword_file_inserts_term() {
    let (dir, path) = fixture("post.txt", "SEO is important.");
    let keywords = dir.path().join("keywords.json");
    std::fs::write(
        &keywords,
        r#"[{"term": "optimization", "relevance": 0.8, "semantic_score": 0.9, "context_strength": 0.7}]"#,
    )
    .unwrap();

    let assert = cmd()
        .args(["lsi", &path, "--keywords", keywords.to_str().unwrap(), "--json"])
        .assert()
        .success();

    let json = stdout_json(&assert);
    assert_eq!(
        json["integration"]["optimized_content"],
        "SEO is important, including optimization."
    );
    assert!(json.get("competitor_analysis").is_none());
}

#[test]
fn lsi_mines_competitor_pages() {
    let (dir, path) = fixture("post.txt", "Our guide covers the basics.");
    let mut args = vec!["lsi".to_string(), path.clone(), "--json".to_string()];
    for (i, body) in [
        "Keyword research drives traffic. Keyword research tools help.",
        "Good keyword research saves time and drives traffic.",
    ]
    .iter()
    .enumerate()
    {
        let competitor = dir.path().join(format!("competitor{i}.txt"));
        std::fs::write(&competitor, body).unwrap();
        args.push("--competitor".to_string());
        args.push(competitor.to_str().unwrap().to_string());
    }

    let assert = cmd().args(&args).assert().success();
    let json = stdout_json(&assert);
    assert_eq!(json["competitor_analysis"]["documents"], 2);
    let terms = json["competitor_analysis"]["terms"].as_array().unwrap();
    assert!(terms.iter().any(|t| t == "research"));
    assert!(json["integration"]["integrated_terms"].as_u64().unwrap() >= 1);
}

#[test]
fn lsi_without_sources_fails() {
    let (_dir, path) = fixture("post.txt", "SEO is important.");
    cmd()
        .args(["lsi", &path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to integrate"));
}

#[test]
fn lsi_rejects_malformed_keyword_file() {
    let (dir, path) = fixture("post.txt", "SEO is important.");
    let keywords = dir.path().join("keywords.json");
    std::fs::write(&keywords, r#"[{"term": "optimization"}]"#).unwrap();
    cmd()
        .args(["lsi", &path, "--keywords", keywords.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid keyword list"));
}

// =============================================================================
// Align
// =============================================================================

#[test]
fn align_json_reports_gaps() {
    let (_dir, path) = fixture(
        "post.txt",
        "Slow pages hurt sales. The solution: compress images first.",
    );
    let assert = cmd()
        .args([
            "align",
            &path,
            "-p",
            "slow pages",
            "-p",
            "broken forms",
            "--json",
        ])
        .assert()
        .success();

    let json = stdout_json(&assert);
    assert_eq!(json["problem_coverage"], 0.5);
    assert_eq!(json["gap_analysis"][0], "broken forms");
    assert_eq!(json["solution_sentences"], 1);
}

#[test]
fn align_requires_a_problem() {
    let (_dir, path) = fixture("post.txt", "Anything.");
    cmd()
        .args(["align", &path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--problem"));
}

#[test]
fn align_min_score_gate_fails() {
    let (_dir, path) = fixture("post.txt", "Nothing relevant here.");
    cmd()
        .args(["align", &path, "-p", "slow pages", "--min-score", "0.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("alignment score"));
}

// =============================================================================
// Links
// =============================================================================

#[test]
fn links_json_reports_structure() {
    let (_dir, path) = fixture("site.json", SITE_GRAPH);
    let assert = cmd()
        .args(["links", &path, "--homepage", "/", "--infer-backlinks", "--json"])
        .assert()
        .success();

    let json = stdout_json(&assert);
    assert_eq!(json["total_pages"], 4);
    assert_eq!(json["total_internal_links"], 3);
    assert_eq!(json["orphan_pages"], serde_json::json!(["/lonely"]));
    assert_eq!(json["unreachable_pages"], serde_json::json!(["/lonely"]));
    assert_eq!(json["max_depth"], 1);
}

#[test]
fn links_strict_fails_on_orphans() {
    let (_dir, path) = fixture("site.json", SITE_GRAPH);
    cmd()
        .args(["links", &path, "--homepage", "/", "--infer-backlinks", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("link structure problem"));
}

#[test]
fn links_rejects_duplicate_urls() {
    let (_dir, path) = fixture(
        "site.json",
        r#"[{"url": "/", "internalLinksTo": []}, {"url": "/", "internalLinksTo": []}]"#,
    );
    cmd()
        .args(["links", &path, "--homepage", "/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate page url"));
}

#[test]
fn links_rejects_malformed_graph() {
    let (_dir, path) = fixture("site.json", r#"[{"internalLinksTo": []}]"#);
    cmd()
        .args(["links", &path, "--homepage", "/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid link graph"));
}

// =============================================================================
// Broken Links
// =============================================================================

#[test]
fn broken_links_skips_non_http_targets() {
    let (_dir, path) = fixture(
        "site.json",
        r#"{"pages": [{"url": "https://example.com/", "internalLinksTo": ["mailto:team@example.com"]}]}"#,
    );
    cmd()
        .args(["broken-links", &path])
        .assert()
        .success()
        .stdout(predicate::str::contains("no broken links"));
}

#[test]
fn broken_links_unreachable_target_fails() {
    let (_dir, path) = fixture(
        "site.json",
        r#"[{"url": "http://127.0.0.1:9/", "internalLinksTo": ["/gone"]}]"#,
    );
    let assert = cmd()
        .args(["broken-links", &path, "--timeout-ms", "2000", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken link"));

    let json = stdout_json(&assert);
    assert_eq!(json["broken"][0]["target_url"], "http://127.0.0.1:9/gone");
    assert!(json["broken"][0]["status_code"].is_null());
}

#[test]
fn broken_links_resolves_site_relative_graph_with_base_url() {
    let (_dir, path) = fixture("site.json", r#"[{"url": "/", "internalLinksTo": ["/gone"]}]"#);
    let assert = cmd()
        .args([
            "broken-links",
            &path,
            "--base-url",
            "http://127.0.0.1:9",
            "--timeout-ms",
            "2000",
            "--json",
        ])
        .assert()
        .failure();

    let json = stdout_json(&assert);
    assert_eq!(json["broken"][0]["source_url"], "/");
    assert_eq!(json["broken"][0]["target_url"], "http://127.0.0.1:9/gone");
    assert!(json["broken"][0]["status_code"].is_null());
}

#[test]
fn broken_links_rejects_invalid_base_url() {
    let (_dir, path) = fixture("site.json", SITE_GRAPH);
    cmd()
        .args(["broken-links", &path, "--base-url", "not a url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("base_url"));
}

#[test]
fn broken_links_zero_concurrency_fails() {
    let (_dir, path) = fixture("site.json", SITE_GRAPH);
    cmd()
        .args(["broken-links", &path, "--concurrency", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("concurrency"));
}

// =============================================================================
// Analyze: --checks / --exclude
// =============================================================================

const DRAFT: &str = "Why are slow pages a problem? Slow pages lose visitors. \
                     The fix: first compress images, then cache assets.";

#[test]
fn analyze_runs_all_checks() {
    let (_dir, path) = fixture("post.txt", DRAFT);
    let assert = cmd()
        .args(["analyze", &path, "-k", "slow pages", "-p", "slow pages", "--json"])
        .assert()
        .success();

    let json = stdout_json(&assert);
    for check in ["keywords", "precision", "alignment", "lsi"] {
        assert!(json[check].is_object(), "missing {check}");
    }
    assert_eq!(json["pass"], true);
}

#[test]
fn unknown_check_name_fails() {
    let (_dir, path) = fixture("post.txt", DRAFT);
    cmd()
        .args(["analyze", &path, "--checks", "readablity"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown check"));
}

#[test]
fn exclude_skips_named_checks() {
    let (_dir, path) = fixture("post.txt", DRAFT);
    cmd()
        .args(["analyze", &path, "--exclude", "lsi", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"lsi\"").not());
}

#[test]
fn exclude_unknown_name_fails() {
    let (_dir, path) = fixture("post.txt", DRAFT);
    cmd()
        .args(["analyze", &path, "--exclude", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown check"));
}

#[test]
fn checks_and_exclude_conflict() {
    let (_dir, path) = fixture("post.txt", DRAFT);
    cmd()
        .args(["analyze", &path, "--checks", "keywords", "--exclude", "lsi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn analyze_min_precision_gate_fails() {
    let (_dir, path) = fixture("post.txt", "This is really very nice stuff, basically.");
    cmd()
        .args(["analyze", &path, "--min-precision", "95"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("precision score"));
}

#[test]
fn analyze_markdown_headings_count() {
    let (_dir, path) = fixture("post.md", &format!("# Slow pages\n\n{DRAFT}"));
    cmd()
        .args(["analyze", &path, "--checks", "keywords", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("missing_headings").not());
}

#[test]
fn analyze_empty_document_fails() {
    let (_dir, path) = fixture("post.md", "```\nfn main() {}\n```\n");
    cmd()
        .args(["analyze", &path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no scorable text"));
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn no_subcommand_shows_help() {
    // arg_required_else_help makes clap print help to stderr and exit 2
    cmd()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn invalid_subcommand_shows_error() {
    cmd()
        .arg("not-a-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn invalid_flag_shows_error() {
    cmd()
        .arg("--not-a-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// =============================================================================
// Chdir Flag
// =============================================================================

#[test]
fn chdir_flag_changes_directory() {
    // The -C flag should be accepted and work without error
    // We use a path that definitely exists
    cmd().args(["-C", "/tmp", "info"]).assert().success();
}

#[test]
fn chdir_nonexistent_fails() {
    cmd()
        .args(["-C", "/nonexistent/path/that/does/not/exist", "info"])
        .assert()
        .failure();
}
