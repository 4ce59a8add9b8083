//! Decoding raw values into a record.

use std::collections::HashMap;

use tracing::trace;

use crate::error::{Error, Result};
use crate::metadata::{CatchAll, CatchAllKind, StructMetadata};
use crate::values::Values;

/// Suffix of array-style keys (`ids[]=1&ids[]=2`), ignored for lookup.
const ARRAY_SUFFIX: &str = "[]";

impl<R> StructMetadata<R> {
    /// Decodes `values` into `record`.
    ///
    /// A record with its own decoder gets the whole input and nothing else
    /// happens. Otherwise every decode hook sees the whole input, in order,
    /// then every key is routed to its field. Keys without a field go to
    /// the catch-all field when there is one and are dropped otherwise.
    pub fn decode(&self, record: &mut R, values: &Values) -> Result<()> {
        if let Some(decode) = self.decoder {
            return decode(record, values);
        }

        for hook in &self.hooks {
            (hook.decode)(record, values)?;
        }

        for (key, raw) in values.iter() {
            self.decode_entry(record, key, raw)?;
        }
        Ok(())
    }

    fn decode_entry(&self, record: &mut R, key: &str, raw: &[String]) -> Result<()> {
        let name = key.strip_suffix(ARRAY_SUFFIX).unwrap_or(key);

        if let Some(field) = self.find(name) {
            if field.no_decode() {
                trace!(key, "skipping nodecode field");
                return Ok(());
            }
            return field.scan(record, raw).map_err(|source| Error::Scan {
                key: key.to_string(),
                source,
            });
        }

        match &self.catch_all {
            Some(catch_all) => catch_all.store(record, key, raw),
            None => trace!(key, "dropping unmatched key"),
        }
        Ok(())
    }
}

impl<R> CatchAll<R> {
    fn store(&self, record: &mut R, key: &str, raw: &[String]) {
        let slot = (self.get_mut)(record);
        match self.kind {
            CatchAllKind::Values => {
                if let Some(map) = slot.downcast_mut::<Values>() {
                    map.insert(key, raw.to_vec());
                }
            }
            CatchAllKind::OptionValues => {
                if let Some(map) = slot.downcast_mut::<Option<Values>>() {
                    map.get_or_insert_with(Values::new).insert(key, raw.to_vec());
                }
            }
            CatchAllKind::HashMap => {
                if let Some(map) = slot.downcast_mut::<HashMap<String, Vec<String>>>() {
                    map.insert(key.to_string(), raw.to_vec());
                }
            }
        }
    }
}
