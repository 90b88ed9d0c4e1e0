//! Integration tests for configuration loading and validation

use pagex::config::load_config;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Serializes tests that read or modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    std::env::remove_var("PAGEX_APPLICATION_LOG_LEVEL");
    std::env::remove_var("PAGEX_EXPORT_OUT_DIR");
    std::env::remove_var("PAGEX_EXPORT_THREADS");
    std::env::remove_var("PAGEX_EXPORT_SUBFOLDERS");
    std::env::remove_var("PAGEX_WORKER_COMMAND");
    std::env::remove_var("TEST_RENDER_WORKER");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"

[export]
dir = "site"
dist_dir = "build"
out_dir = "public_html"
threads = 6
subfolders = true
serverless = true
pages = ["/", "/about"]
asset_prefix = "https://cdn.example.com"
canonical_base = "https://example.com"
amp_skip_validation = true
runtime_config = { api_url = "https://api.example.com" }

[export.path_map]
merge_defaults = false

[export.path_map.entries."/p/hello"]
page = "/p/[slug]"
query = { slug = "hello" }

[worker]
command = "node"
args = ["render-worker.js", "--quiet"]
env = { NODE_ENV = "production" }

[logging]
local_enabled = false
local_path = "/tmp/pagex"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");

    assert_eq!(config.export.dir, "site");
    assert_eq!(config.export.dist_path(), std::path::PathBuf::from("site/build"));
    assert_eq!(config.export.out_path(), std::path::PathBuf::from("site/public_html"));
    assert_eq!(config.export.effective_threads(), 6);
    assert!(config.export.subfolders);
    assert!(config.export.serverless);
    assert!(!config.export.build_export);
    assert_eq!(config.export.pages.as_ref().map(Vec::len), Some(2));
    assert_eq!(config.export.asset_prefix, "https://cdn.example.com");
    assert!(config.export.amp_skip_validation);
    assert_eq!(
        config.export.runtime_config["api_url"],
        "https://api.example.com"
    );

    let path_map = config.export.path_map.as_ref().unwrap();
    assert!(!path_map.merge_defaults);
    let entry = &path_map.entries["/p/hello"];
    assert_eq!(entry.page, "/p/[slug]");
    assert_eq!(entry.query["slug"], "hello");

    assert_eq!(config.worker.command, "node");
    assert_eq!(config.worker.args, vec!["render-worker.js", "--quiet"]);
    assert_eq!(config.worker.env["NODE_ENV"], "production");

    assert_eq!(config.logging.local_path, "/tmp/pagex");
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[worker]
command = "node"
"#,
    );

    let config = load_config(file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.export.dir, ".");
    assert_eq!(config.export.dist_dir, ".next");
    assert_eq!(config.export.out_dir, "out");
    assert!(config.export.threads.is_none());
    assert!(config.export.effective_threads() >= 1);
    assert!(!config.export.subfolders);
    assert!(config.export.pages.is_none());
    assert!(config.export.path_map.is_none());
    assert!(config.export.runtime_config.is_object());
    assert!(config.worker.args.is_empty());
    assert!(!config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "daily");
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_RENDER_WORKER", "/opt/site/worker.js");

    let file = write_config(
        r#"
# args are resolved from ${TEST_RENDER_WORKER}
[worker]
command = "node"
args = ["${TEST_RENDER_WORKER}"]
"#,
    );

    let config = load_config(file.path()).expect("Failed to load config");
    assert_eq!(config.worker.args, vec!["/opt/site/worker.js"]);

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_is_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[worker]
command = "${TEST_RENDER_WORKER}"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("TEST_RENDER_WORKER"));
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("PAGEX_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("PAGEX_EXPORT_OUT_DIR", "dist");
    std::env::set_var("PAGEX_EXPORT_THREADS", "3");
    std::env::set_var("PAGEX_EXPORT_SUBFOLDERS", "true");
    std::env::set_var("PAGEX_WORKER_COMMAND", "bun");

    let file = write_config(
        r#"
[export]
out_dir = "out"

[worker]
command = "node"
"#,
    );

    let config = load_config(file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.export.out_dir, "dist");
    assert_eq!(config.export.threads, Some(3));
    assert!(config.export.subfolders);
    assert_eq!(config.worker.command, "bun");

    cleanup_env_vars();
}

#[test]
fn test_validation_errors() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let cases = [
        "[export]\nthreads = 0\n\n[worker]\ncommand = \"node\"\n",
        "[application]\nlog_level = \"loud\"\n\n[worker]\ncommand = \"node\"\n",
        "[worker]\ncommand = \"\"\n",
        "[logging]\nlocal_rotation = \"size\"\n\n[worker]\ncommand = \"node\"\n",
        "[export.path_map.entries.\"about\"]\npage = \"/about\"\n\n[worker]\ncommand = \"node\"\n",
    ];

    for contents in cases {
        let file = write_config(contents);
        let err = load_config(file.path()).unwrap_err();
        assert!(err.is_configuration(), "expected configuration error for {contents:?}");
    }
}

#[test]
fn test_missing_worker_section_is_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[export]\nout_dir = \"out\"\n");
    assert!(load_config(file.path()).is_err());
}

#[test]
fn test_missing_file_is_error() {
    let err = load_config("/nonexistent/pagex.toml").unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("not found"));
}
