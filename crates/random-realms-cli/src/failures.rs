use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Append `[<seed>] <message>` to the failed seeds log.
pub fn record_failed_seed(path: &Path, seed: &str, message: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let message = if message.is_empty() {
        "No error message"
    } else {
        message
    };
    writeln!(file, "[{seed}] {message}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_one_line_per_failure() {
        let path = std::env::temp_dir()
            .join(format!("random_realms_{}", uuid::Uuid::new_v4()))
            .join("failed-seeds.log");
        record_failed_seed(&path, "abc123", "duplicate primary key").expect("first");
        record_failed_seed(&path, "def456", "").expect("second");

        let content = std::fs::read_to_string(&path).expect("read log");
        assert_eq!(
            content,
            "[abc123] duplicate primary key\n[def456] No error message\n"
        );
    }
}
