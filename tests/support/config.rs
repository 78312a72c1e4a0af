use std::io::Write;

use tempfile::NamedTempFile;

/// Write `contents` to a temporary `.toml` file that lives as long as the
/// returned handle.
pub fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("tonmarket-config-")
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

/// Config on a SQLite file with the sweeper off.
pub fn sqlite_config(database_path: &std::path::Path) -> String {
    format!(
        "[store]\nbackend = \"sqlite\"\ndatabase_path = \"{}\"\n\n[settlement]\nsweep_enabled = false\n",
        database_path.display().to_string().replace('\\', "/")
    )
}
