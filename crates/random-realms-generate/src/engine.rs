use std::any::Any;
use std::path::Path;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use random_realms_core::RealmSchema;
use random_realms_store::{FileRealm, Realm};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::errors::GenerationError;
use crate::model::{GenerateOptions, GenerationResult};
use crate::populate::{ObjectPopulator, PopulationReport};
use crate::schema::SchemaSynthesizer;
use crate::values::ValueGenerator;

/// Derive the run's random number generator from a seed string.
pub fn seeded_rng(seed: &str) -> ChaCha8Rng {
    let digest: [u8; 32] = Sha256::digest(seed.as_bytes()).into();
    ChaCha8Rng::from_seed(digest)
}

/// A fresh 16 hex character seed.
pub fn generate_seed() -> String {
    let bytes: [u8; 8] = rand::rng().random();
    hex::encode(bytes)
}

/// Generates one realm from a seed.
///
/// Every random draw goes through the factory's own RNG, so two factories
/// built from the same seed and options make identical schemas and objects.
#[derive(Debug, Clone)]
pub struct RealmFactory {
    seed: String,
    options: GenerateOptions,
    rng: ChaCha8Rng,
    synthesizer: SchemaSynthesizer,
    populator: ObjectPopulator,
}

impl RealmFactory {
    pub fn new(seed: impl Into<String>, options: GenerateOptions) -> Result<Self, GenerationError> {
        options.validate()?;
        let seed = seed.into();
        Ok(Self {
            rng: seeded_rng(&seed),
            synthesizer: SchemaSynthesizer::new(&options),
            populator: ObjectPopulator::new(
                ValueGenerator::new(options.max_data_size, options.max_list_elements),
                options.max_object_count,
            ),
            seed,
            options,
        })
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    pub fn make_realm_schema(&mut self) -> Result<RealmSchema, GenerationError> {
        self.synthesizer.make_realm_schema(&mut self.rng)
    }

    pub fn make_objects<M: Realm>(
        &mut self,
        realm: &mut M,
    ) -> Result<PopulationReport, GenerationError> {
        self.populator.populate(realm, &mut self.rng)
    }

    /// Synthesize a schema, create a realm file at `path` and populate it.
    pub fn make_realm(&mut self, path: &Path) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        info!(
            seed = %self.seed,
            path = %path.display(),
            ridiculousness = %self.options.name_ridiculousness,
            "generation started"
        );

        let schema = self.make_realm_schema()?;
        let mut realm = FileRealm::create(path, schema.clone())?;
        let report = self.make_objects(&mut realm)?;
        realm.close()?;

        let result = GenerationResult {
            path: path.to_path_buf(),
            seed: self.seed.clone(),
            schema,
            objects_by_type: report.objects_by_type,
            transactions: report.transactions,
        };
        info!(
            seed = %self.seed,
            object_schemas = result.schema.len(),
            objects = result.total_objects(),
            transactions = result.transactions,
            duration_ms = start.elapsed().as_millis() as u64,
            "generation completed"
        );
        Ok(result)
    }
}

/// Run exactly one generation attempt, turning panics into errors.
pub fn run_generation(
    path: &Path,
    seed: &str,
    options: GenerateOptions,
) -> Result<GenerationResult, GenerationError> {
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        RealmFactory::new(seed, options)?.make_realm(path)
    }));
    match outcome {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(err)) => {
            warn!(seed = %seed, error = %err, "generation failed");
            Err(err)
        }
        Err(panic) => {
            let message = panic_message(panic);
            warn!(seed = %seed, panic = %message, "generation panicked");
            Err(GenerationError::Panicked(message))
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let a: [u64; 4] = seeded_rng("abc123").random();
        let b: [u64; 4] = seeded_rng("abc123").random();
        let c: [u64; 4] = seeded_rng("abc124").random();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn generated_seeds_are_hex() {
        let seed = generate_seed();
        assert_eq!(seed.len(), 16);
        assert!(seed.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn factory_rejects_invalid_options() {
        let options = GenerateOptions {
            max_unicode_string: 0,
            ..GenerateOptions::default()
        };
        assert!(matches!(
            RealmFactory::new("seed", options),
            Err(GenerationError::InvalidOptions(_))
        ));
    }
}
