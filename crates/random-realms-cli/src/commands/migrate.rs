use std::process::ExitCode;

use random_realms_store::labels::REALM_FILE_TYPE;
use random_realms_store::{FileRealm, Realm, load_label_mapping, migrate_sync_labels};

use crate::registry::init_logging;
use crate::{CliError, MigrateLabelsArgs};

/// Rewrite sync labels in an admin realm file from a path to label mapping.
pub fn run(args: MigrateLabelsArgs) -> Result<ExitCode, CliError> {
    init_logging(args.verbose, None)?;
    let labels = load_label_mapping(&args.labels_path)?;

    let mut realm = FileRealm::open(&args.admin_realm)?;
    println!("Found {} Realm files", realm.object_count(REALM_FILE_TYPE)?);

    let migrated = migrate_sync_labels(&mut realm, &labels)?;
    realm.close()?;
    println!("Migrated {migrated} Realm files - all done");
    Ok(ExitCode::SUCCESS)
}
