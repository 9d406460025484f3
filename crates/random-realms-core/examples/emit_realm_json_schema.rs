use random_realms_core::RealmSchema;
use schemars::schema_for;

fn main() {
    let schema = schema_for!(RealmSchema);
    let json = serde_json::to_string_pretty(&schema).expect("serialize json schema");
    println!("{json}");
}
