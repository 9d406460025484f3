use std::process::ExitCode;

use random_realms_store::FileRealm;

use crate::{CliError, DumpArgs};

/// Print a realm file as JSON, in the shape the upgrade check compares.
pub fn run(args: DumpArgs) -> Result<ExitCode, CliError> {
    let realm = FileRealm::open(&args.path)?;
    println!("{}", serde_json::to_string_pretty(&realm.dump())?);
    Ok(ExitCode::SUCCESS)
}
