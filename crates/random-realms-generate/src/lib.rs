//! Randomized realm generation for random-realms.
//!
//! Given a seed string, this crate synthesizes a constraint-respecting realm
//! schema, populates it with random objects and writes the result through the
//! store's [`Realm`](random_realms_store::Realm) boundary. Identical seeds and
//! options reproduce identical schemas and object populations.

pub mod engine;
pub mod errors;
pub mod model;
pub mod names;
pub mod pool;
pub mod populate;
pub mod schema;
pub mod values;

pub use engine::{RealmFactory, generate_seed, run_generation, seeded_rng};
pub use errors::GenerationError;
pub use model::{GenerateOptions, GenerationResult};
pub use names::{NameGenerator, Ridiculousness};
pub use pool::ObjectPool;
pub use populate::{ObjectPopulator, PopulationReport};
pub use schema::SchemaSynthesizer;
pub use values::ValueGenerator;
