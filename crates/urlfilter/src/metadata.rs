//! Per-record metadata.
//!
//! [`StructMetadata`] is the table built once per record type: the ordered
//! field descriptors, the table name, the catch-all field and the decode
//! hooks. It is immutable once built and shared through the
//! [`Registry`](crate::Registry) cache.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;

use tracing::{trace, warn};

use crate::condition::Condition;
use crate::error::Result;
use crate::field::{DeclaredField, DeclaredKind, Field, Hook, Setter, Slot};
use crate::op::{split_column_operator, LOOKUP_SEPARATOR};
use crate::scan::ScanRegistry;
use crate::tag::{unquote, TagOptions};
use crate::traits::{DecodeFn, Record};
use crate::values::Values;
use crate::zero::ZeroRegistry;

/// Identifier of the sentinel field carrying the record's table name.
pub const TABLE_NAME_FIELD: &str = "table_name";

/// Map types accepted for the catch-all field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CatchAllKind {
    Values,
    OptionValues,
    HashMap,
}

impl CatchAllKind {
    fn of(ty: TypeId) -> Option<Self> {
        if ty == TypeId::of::<Values>() {
            Some(CatchAllKind::Values)
        } else if ty == TypeId::of::<Option<Values>>() {
            Some(CatchAllKind::OptionValues)
        } else if ty == TypeId::of::<HashMap<String, Vec<String>>>() {
            Some(CatchAllKind::HashMap)
        } else {
            None
        }
    }
}

pub(crate) struct CatchAll<R> {
    pub(crate) path: Vec<usize>,
    pub(crate) kind: CatchAllKind,
    pub(crate) get_mut: Setter<R>,
}

pub(crate) struct DecodeHook<R> {
    pub(crate) path: Vec<usize>,
    pub(crate) decode: Hook<R>,
}

/// Metadata describing how a record type maps onto query values.
pub struct StructMetadata<R> {
    pub(crate) table_name: Option<String>,
    pub(crate) fields: Vec<Field<R>>,
    pub(crate) catch_all: Option<CatchAll<R>>,
    pub(crate) hooks: Vec<DecodeHook<R>>,
    pub(crate) decoder: Option<DecodeFn<R>>,
}

impl<R: Record> StructMetadata<R> {
    /// Builds the metadata of `R`, resolving field types against the
    /// given registries.
    ///
    /// Fails if a field sets both `required` and `nowhere`.
    pub fn build(scans: &ScanRegistry, zeros: &ZeroRegistry) -> Result<Self> {
        let declared = R::declared_fields();
        let mut meta = StructMetadata {
            table_name: None,
            fields: Vec::with_capacity(declared.len()),
            catch_all: None,
            hooks: Vec::new(),
            decoder: R::values_decoder(),
        };
        meta.add_fields(declared, scans, zeros)?;
        Ok(meta)
    }
}

impl<R: 'static> StructMetadata<R> {
    fn add_fields(
        &mut self,
        declared: Vec<DeclaredField<R>>,
        scans: &ScanRegistry,
        zeros: &ZeroRegistry,
    ) -> Result<()> {
        for DeclaredField {
            path,
            ident,
            tag,
            kind,
        } in declared
        {
            let tag = TagOptions::parse(tag);
            if tag.is_ignored() {
                continue;
            }

            match kind {
                DeclaredKind::Embedded(embedded) => {
                    self.add_fields(embedded.fields, scans, zeros)?;
                    if let Some(decode) = embedded.decoder {
                        self.hooks.push(DecodeHook { path, decode });
                    }
                }
                DeclaredKind::Value(slot) => {
                    if ident == TABLE_NAME_FIELD {
                        let name = unquote(tag.name());
                        self.table_name = (!name.is_empty()).then(|| name.to_string());
                        continue;
                    }

                    if let Some(field) =
                        Field::new(self, ident, &tag, path.clone(), &slot, scans, zeros)?
                    {
                        self.fields.push(field);
                    }
                    if let Some(decode) = slot.hook {
                        self.hooks.push(DecodeHook { path, decode });
                    }
                }
            }
        }
        Ok(())
    }

    pub(crate) fn set_catch_all(&mut self, path: Vec<usize>, slot: &Slot<R>) {
        match CatchAllKind::of(slot.type_id) {
            Some(kind) => {
                self.catch_all = Some(CatchAll {
                    path,
                    kind,
                    get_mut: slot.get_mut.clone(),
                })
            }
            None => warn!(
                record = type_name::<R>(),
                ty = slot.type_name,
                "catch-all field must be Values, Option<Values> or HashMap<String, Vec<String>>"
            ),
        }
    }
}

impl<R> StructMetadata<R> {
    /// Looks up a field by an external key such as `age__gte`.
    ///
    /// The key is split on the double separator (`__`), so `age__gte`
    /// finds the `age`/`gte` field while `age_gte` does not. The first
    /// matching field wins.
    pub fn find(&self, name: &str) -> Option<&Field<R>> {
        let (column, op) = split_column_operator(name, LOOKUP_SEPARATOR);
        self.fields
            .iter()
            .find(|field| field.column() == column && field.op() == op)
    }

    /// Returns the table name carried by the `table_name` sentinel field.
    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    /// Returns the field descriptors in declaration order.
    pub fn fields(&self) -> &[Field<R>] {
        &self.fields
    }

    /// Returns the storage path of the catch-all field.
    pub fn catch_all_path(&self) -> Option<&[usize]> {
        self.catch_all.as_ref().map(|catch_all| catch_all.path.as_slice())
    }

    /// Returns the storage paths of the decode hooks, in call order.
    pub fn hook_paths(&self) -> impl Iterator<Item = &[usize]> {
        self.hooks.iter().map(|hook| hook.path.as_slice())
    }

    /// Returns `true` if the record decodes itself.
    pub fn has_custom_decode(&self) -> bool {
        self.decoder.is_some()
    }

    /// Returns the filter conditions of `record`: one per field that is not
    /// omitted, in field order.
    pub fn conditions<'a>(&'a self, record: &'a R) -> impl Iterator<Item = Condition<'a>> + 'a {
        self.fields.iter().filter_map(move |field| {
            let value = field.value(record);
            if field.omit(value) {
                trace!(column = field.column(), "omitting field from conditions");
                return None;
            }
            Some(Condition {
                column: field.column(),
                op: field.op(),
                value,
            })
        })
    }
}

impl<R> fmt::Debug for StructMetadata<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructMetadata")
            .field("table_name", &self.table_name)
            .field("fields", &self.fields)
            .field("catch_all", &self.catch_all_path())
            .field("hooks", &self.hook_paths().collect::<Vec<_>>())
            .field("has_custom_decode", &self.has_custom_decode())
            .finish()
    }
}
