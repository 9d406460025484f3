use std::path::{Path, PathBuf};
use std::process::ExitCode;

use random_realms_diff::{DiffOutcome, UpgradeDiffer, render_report};
use random_realms_generate::{GenerateOptions, GenerationResult, generate_seed, run_generation};
use tracing::{info, warn};

use crate::config::{Settings, load_settings};
use crate::failures::record_failed_seed;
use crate::registry::{RunContext, RunOutcome, init_logging, write_run_record};
use crate::{CliError, GenerateArgs};

/// Name of the realm file inside the output directory.
pub const REALM_FILE_NAME: &str = "generated.realm";
/// Parent of randomly named output directories.
pub const RANDOM_OUTPUT_ROOT: &str = "realms";

const MAX_REPORTED_DIFFERENCES: usize = 20;

pub async fn run(args: GenerateArgs) -> Result<ExitCode, CliError> {
    let settings = load_settings(args.config.as_deref())?;
    let options = settings.generate.overlay(&args.overrides()).resolve();
    options.validate()?;
    init_logging(args.verbose, settings.log_file.as_deref())?;

    if args.endlessly {
        return super::endless::run(&args).await;
    }
    generate_once(&args, &settings, options)
}

fn generate_once(
    args: &GenerateArgs,
    settings: &Settings,
    options: GenerateOptions,
) -> Result<ExitCode, CliError> {
    let seed = args.seed.clone().unwrap_or_else(generate_seed);
    let output_directory = match &args.output_directory {
        Some(path) => std::path::absolute(path)?,
        None => random_output_directory()?,
    };
    std::fs::create_dir_all(&output_directory)?;

    let description = if args.verbose {
        describe_options(&seed, &options)
    } else {
        format!("seed = {seed}")
    };
    println!(
        "Generating Realm in \"{}\" ({description})",
        output_directory.display()
    );

    let realm_path = output_directory.join(REALM_FILE_NAME);
    let ctx = RunContext::new(&seed, &options, &realm_path);

    let outcome = run_generation(&realm_path, &seed, options)
        .map_err(|err| err.to_string())
        .and_then(|result| {
            println!(
                "Generated: {} object schemas, {} objects",
                result.schema.len(),
                result.total_objects()
            );
            let upgrade_check = if args.check_upgrade {
                Some(check_upgrade(settings, &realm_path)?)
            } else {
                None
            };
            Ok(succeeded(&result, upgrade_check))
        });

    let (record, exit_code) = match outcome {
        Ok(record) => (record, ExitCode::SUCCESS),
        Err(message) => {
            eprintln!("{message}");
            record_failed_seed(&settings.failed_seeds_log, &seed, &message)?;
            warn!(seed = %seed, log = %settings.failed_seeds_log.display(), "recorded failed seed");
            (RunOutcome::Failed { error: message }, ExitCode::FAILURE)
        }
    };

    let record_path = write_run_record(&ctx, &record)?;
    info!(run_id = %ctx.run_id, path = %record_path.display(), "run recorded");
    Ok(exit_code)
}

/// Run the upgrade check, printing the verdict. Any failure becomes the
/// run's error message.
fn check_upgrade(settings: &Settings, realm_path: &Path) -> Result<DiffOutcome, String> {
    let differ = UpgradeDiffer::new(settings.upgrade_check.clone());
    match differ.check(realm_path) {
        Ok(report) if report.passed() => {
            eprintln!("✓ Upgrade check succeeded!");
            Ok(DiffOutcome::Pass)
        }
        Ok(report) => {
            eprintln!("💥 Upgrade check failed!");
            eprintln!("{}", render_report(&report, MAX_REPORTED_DIFFERENCES));
            Err(format!(
                "upgrade check found {} difference(s)",
                report.difference_count()
            ))
        }
        Err(err) => {
            eprintln!("💥 Upgrade check failed!");
            Err(err.to_string())
        }
    }
}

fn succeeded(result: &GenerationResult, upgrade_check: Option<DiffOutcome>) -> RunOutcome {
    RunOutcome::Succeeded {
        object_schemas: result.schema.len(),
        objects: result.total_objects(),
        transactions: result.transactions,
        upgrade_check,
    }
}

/// `realms/<8 hex chars>` under the working directory.
fn random_output_directory() -> std::io::Result<PathBuf> {
    let seed = generate_seed();
    std::path::absolute(Path::new(RANDOM_OUTPUT_ROOT).join(&seed[..8]))
}

pub fn describe_options(seed: &str, options: &GenerateOptions) -> String {
    format!(
        "seed = {seed}, name_ridiculousness = {}, max_object_count = {}, max_data_size = {}, \
         max_list_elements = {}, max_object_schemas = {}, min_properties = {}, \
         max_properties = {}, max_unicode_string = {}",
        options.name_ridiculousness,
        options.max_object_count,
        options.max_data_size,
        options.max_list_elements,
        options.max_object_schemas,
        options.min_properties,
        options.max_properties,
        options.max_unicode_string
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::command_line_defaults;

    #[test]
    fn verbose_description_lists_every_option() {
        let description = describe_options("abc123", &command_line_defaults());
        assert_eq!(
            description,
            "seed = abc123, name_ridiculousness = low, max_object_count = 100, max_data_size = 10, \
             max_list_elements = 10, max_object_schemas = 3, min_properties = 1, \
             max_properties = 3, max_unicode_string = 20"
        );
    }
}
