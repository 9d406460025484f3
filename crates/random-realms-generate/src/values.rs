use chrono::DateTime;
use rand::Rng;
use random_realms_core::{GeneratedValue, PropertyDescriptor, PropertyType};

use crate::errors::GenerationError;
use crate::names::random_string;
use crate::pool::ObjectPool;

/// Bound of the symmetric float and double domain.
pub const FLOAT_BOUND: f64 = 1e9;
/// 2100-01-01T00:00:00Z in milliseconds since the epoch.
pub const MAX_DATE_MILLIS: i64 = 4_102_444_800_000;

/// Samples values for property types.
#[derive(Debug, Clone, Copy)]
pub struct ValueGenerator {
    max_data_size: usize,
    max_list_elements: usize,
}

impl ValueGenerator {
    pub fn new(max_data_size: usize, max_list_elements: usize) -> Self {
        Self {
            max_data_size,
            max_list_elements,
        }
    }

    /// Make a value of type `ty`, drawing references from `pool`.
    ///
    /// Links come out as `Null` when the coin says so or when no target
    /// exists yet. Lists stop at the first element that comes out `Null`.
    pub fn make_value<R: Rng + ?Sized>(
        &self,
        ty: &PropertyType,
        pool: &ObjectPool,
        rng: &mut R,
    ) -> Result<GeneratedValue, GenerationError> {
        let value = match ty {
            PropertyType::Bool => GeneratedValue::Bool(rng.random_bool(0.5)),
            PropertyType::Int => GeneratedValue::Int(rng.random::<i64>()),
            PropertyType::Float => {
                let bound = FLOAT_BOUND as f32;
                GeneratedValue::Float(rng.random_range(-bound..=bound))
            }
            PropertyType::Double => {
                GeneratedValue::Double(rng.random_range(-FLOAT_BOUND..=FLOAT_BOUND))
            }
            PropertyType::String => GeneratedValue::String(random_string(rng)),
            PropertyType::Data => {
                let len = self.draw_len(rng, self.max_data_size);
                GeneratedValue::Data((0..len).map(|_| rng.random::<u8>()).collect())
            }
            PropertyType::Date => {
                let millis = rng.random_range(0..MAX_DATE_MILLIS);
                let date = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
                    GenerationError::UnsupportedDescriptor(format!("date at {millis}ms"))
                })?;
                GeneratedValue::Date(date)
            }
            PropertyType::List(element) => {
                if element.is_list() {
                    return Err(GenerationError::UnsupportedDescriptor(ty.to_string()));
                }
                let len = self.draw_len(rng, self.max_list_elements);
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    let item = self.make_value(element, pool, rng)?;
                    if item.is_null() {
                        break;
                    }
                    items.push(item);
                }
                GeneratedValue::List(items)
            }
            PropertyType::Object(target) => {
                let objects = pool
                    .objects(target)
                    .ok_or_else(|| GenerationError::UnsupportedDescriptor(ty.to_string()))?;
                if rng.random_bool(0.5) && !objects.is_empty() {
                    let index = rng.random_range(0..objects.len());
                    GeneratedValue::Object(objects[index].clone())
                } else {
                    GeneratedValue::Null
                }
            }
        };
        Ok(value)
    }

    /// Maybe make a default for `property`. Only primitive types and lists of
    /// primitives are eligible.
    pub fn make_property_default<R: Rng + ?Sized>(
        &self,
        property: &PropertyDescriptor,
        rng: &mut R,
    ) -> Result<Option<GeneratedValue>, GenerationError> {
        let ty = &property.property_type;
        let eligible = match ty {
            PropertyType::List(element) => element.is_primitive(),
            other => other.is_primitive(),
        };
        if !eligible || !rng.random_bool(0.5) {
            return Ok(None);
        }
        self.make_value(ty, &ObjectPool::default(), rng).map(Some)
    }

    /// Zero half of the time, otherwise `1..=max`.
    fn draw_len<R: Rng + ?Sized>(&self, rng: &mut R, max: usize) -> usize {
        if rng.random_bool(0.5) || max == 0 {
            0
        } else {
            rng.random_range(1..=max)
        }
    }
}
