use std::process::ExitCode;

use random_realms_generate::generate_seed;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::{CliError, GenerateArgs};

/// Set for every child so the native library skips analytics.
const ANALYTICS_ENV: (&str, &str) = ("REALM_DISABLE_ANALYTICS", "true");

/// Re-run this executable as `generate --seed <fresh seed>` until Ctrl-C.
///
/// Each run lives in its own process, so a crash only ends that run.
pub async fn run(args: &GenerateArgs) -> Result<ExitCode, CliError> {
    let executable = std::env::current_exe()?;
    let forwarded = forwarded_args(args);
    let mut runs: u64 = 0;

    loop {
        let seed = generate_seed();
        runs += 1;
        println!("Starting generator #{runs}");

        let mut child = Command::new(&executable)
            .arg("generate")
            .arg("--seed")
            .arg(&seed)
            .args(&forwarded)
            .env(ANALYTICS_ENV.0, ANALYTICS_ENV.1)
            .kill_on_drop(true)
            .spawn()?;

        tokio::select! {
            status = child.wait() => match status {
                Ok(status) => debug!(run = runs, seed = %seed, status = %status, "generator exited"),
                Err(err) => warn!(run = runs, seed = %seed, error = %err, "failed to wait for generator"),
            },
            _ = tokio::signal::ctrl_c() => {
                println!("Received SIGINT - stopping generators");
                if let Err(err) = child.kill().await {
                    warn!(error = %err, "failed to stop generator");
                }
                return Ok(ExitCode::SUCCESS);
            }
        }
    }
}

/// Every option of `args` except the seed and the loop flag, as child arguments.
pub fn forwarded_args(args: &GenerateArgs) -> Vec<String> {
    let mut forwarded = Vec::new();
    if let Some(path) = &args.output_directory {
        forwarded.push(path.display().to_string());
    }
    if args.verbose {
        forwarded.push("--verbose".to_string());
    }
    if args.check_upgrade {
        forwarded.push("--check-upgrade".to_string());
    }
    if let Some(config) = &args.config {
        forwarded.extend(["--config".to_string(), config.display().to_string()]);
    }
    let valued: [(&str, Option<String>); 6] = [
        (
            "--name-ridiculousness",
            args.name_ridiculousness.map(|level| level.to_string()),
        ),
        ("--max-object-count", args.max_object_count.map(|n| n.to_string())),
        ("--max-data-size", args.max_data_size.map(|n| n.to_string())),
        ("--max-list-elements", args.max_list_elements.map(|n| n.to_string())),
        ("--max-object-schemas", args.max_object_schemas.map(|n| n.to_string())),
        ("--max-properties", args.max_properties.map(|n| n.to_string())),
    ];
    for (flag, value) in valued {
        if let Some(value) = value {
            forwarded.extend([flag.to_string(), value]);
        }
    }
    forwarded
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use random_realms_generate::Ridiculousness;

    use super::*;

    #[test]
    fn forwards_everything_but_seed_and_loop() {
        let args = GenerateArgs {
            output_directory: Some(PathBuf::from("out")),
            endlessly: true,
            verbose: true,
            name_ridiculousness: Some(Ridiculousness::High),
            max_object_count: Some(5),
            ..GenerateArgs::default()
        };
        assert_eq!(
            forwarded_args(&args),
            vec![
                "out",
                "--verbose",
                "--name-ridiculousness",
                "high",
                "--max-object-count",
                "5"
            ]
        );
    }

    #[test]
    fn bare_loop_forwards_nothing() {
        let args = GenerateArgs {
            endlessly: true,
            ..GenerateArgs::default()
        };
        assert!(forwarded_args(&args).is_empty());
    }
}
