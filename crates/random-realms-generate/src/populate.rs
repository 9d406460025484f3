use std::collections::BTreeMap;

use rand::Rng;
use random_realms_core::{GeneratedValue, ObjectSchema};
use random_realms_store::Realm;
use tracing::{debug, info, warn};

use crate::errors::GenerationError;
use crate::pool::ObjectPool;
use crate::values::ValueGenerator;

/// Chance that an object schema receives objects in a run.
pub const PARTICIPATION_LIKELIHOOD: f64 = 0.8;
/// Chance, per created object, of committing and starting a new transaction.
pub const COMMIT_LIKELIHOOD: f64 = 0.1;

/// What a population pass created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulationReport {
    /// Created objects per participating object schema.
    pub objects_by_type: BTreeMap<String, u64>,
    pub transactions: u64,
}

/// Fills an open realm with random objects.
#[derive(Debug, Clone, Copy)]
pub struct ObjectPopulator {
    values: ValueGenerator,
    max_object_count: u64,
}

impl ObjectPopulator {
    pub fn new(values: ValueGenerator, max_object_count: u64) -> Self {
        Self {
            values,
            max_object_count,
        }
    }

    /// Create `0..=max_object_count` objects spread over the participating
    /// object schemas. On error the open transaction is cancelled, so the
    /// realm keeps only what earlier commits made durable.
    pub fn populate<M: Realm, R: Rng + ?Sized>(
        &self,
        realm: &mut M,
        rng: &mut R,
    ) -> Result<PopulationReport, GenerationError> {
        let participating: Vec<ObjectSchema> = realm
            .schema()
            .iter()
            .filter(|_| rng.random_bool(PARTICIPATION_LIKELIHOOD))
            .cloned()
            .collect();
        let mut report = PopulationReport {
            objects_by_type: participating
                .iter()
                .map(|object_schema| (object_schema.name.clone(), 0))
                .collect(),
            transactions: 0,
        };
        if participating.is_empty() {
            debug!("no object schema participates, skipping population");
            return Ok(report);
        }

        let count = rng.random_range(0..=self.max_object_count);
        info!(
            participating = participating.len(),
            objects = count,
            "populating realm"
        );

        let mut pool = ObjectPool::for_schema(realm.schema());
        let outcome = self.fill(realm, rng, &participating, count, &mut pool, &mut report);
        if let Err(err) = outcome {
            if realm.is_in_transaction() {
                if let Err(cancel_err) = realm.cancel_transaction() {
                    warn!(error = %cancel_err, "failed to cancel population transaction");
                }
            }
            return Err(err);
        }
        Ok(report)
    }

    fn fill<M: Realm, R: Rng + ?Sized>(
        &self,
        realm: &mut M,
        rng: &mut R,
        participating: &[ObjectSchema],
        count: u64,
        pool: &mut ObjectPool,
        report: &mut PopulationReport,
    ) -> Result<(), GenerationError> {
        realm.begin_transaction()?;
        for _ in 0..count {
            if rng.random_bool(COMMIT_LIKELIHOOD) {
                realm.commit_transaction()?;
                report.transactions += 1;
                debug!(transactions = report.transactions, "committed transaction");
                realm.begin_transaction()?;
            }

            let object_schema = &participating[rng.random_range(0..participating.len())];
            let values = self.make_object_values(object_schema, pool, rng)?;
            let object = realm.create(&object_schema.name, values)?;
            *report
                .objects_by_type
                .entry(object.object_type.clone())
                .or_default() += 1;
            pool.insert(object);
        }
        if realm.is_in_transaction() {
            realm.commit_transaction()?;
            report.transactions += 1;
        }
        Ok(())
    }

    fn make_object_values<R: Rng + ?Sized>(
        &self,
        object_schema: &ObjectSchema,
        pool: &ObjectPool,
        rng: &mut R,
    ) -> Result<BTreeMap<String, GeneratedValue>, GenerationError> {
        object_schema
            .properties
            .iter()
            .map(|(name, property)| {
                let value = self.values.make_value(&property.property_type, pool, rng)?;
                Ok((name.clone(), value))
            })
            .collect()
    }
}
