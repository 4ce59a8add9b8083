//! Field declarations and field descriptors.
//!
//! A [`DeclaredField`] is what a record says about one of its struct fields:
//! its position, identifier, tag and how to reach it. `#[derive(Record)]`
//! produces them. A [`Field`] is the resolved descriptor built from a
//! declaration: column, operator, flags, and the scan and zero functions
//! bound for the field's type.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::error::{Error, Result, ScanError};
use crate::metadata::StructMetadata;
use crate::naming::underscore;
use crate::op::{split_column_operator, Op, FIELD_SEPARATOR};
use crate::scan::{ScanFn, ScanRegistry};
use crate::tag::{TagOptions, OPT_NO_DECODE, OPT_NO_WHERE, OPT_REQUIRED, OPT_UNKNOWN};
use crate::traits::{DecodeFn, Record};
use crate::values::Values;
use crate::zero::{ZeroFn, ZeroRegistry};

pub(crate) type Getter<R> = Arc<dyn Fn(&R) -> &(dyn Any) + Send + Sync>;
pub(crate) type Setter<R> = Arc<dyn Fn(&mut R) -> &mut (dyn Any) + Send + Sync>;
pub(crate) type Hook<R> = Arc<dyn Fn(&mut R, &Values) -> Result<()> + Send + Sync>;

fn getter<R: 'static, F>(f: F) -> Getter<R>
where
    F: Fn(&R) -> &(dyn Any) + Send + Sync + 'static,
{
    Arc::new(f)
}

fn setter<R: 'static, F>(f: F) -> Setter<R>
where
    F: Fn(&mut R) -> &mut (dyn Any) + Send + Sync + 'static,
{
    Arc::new(f)
}

fn hook<R: 'static, F>(f: F) -> Hook<R>
where
    F: Fn(&mut R, &Values) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// How raw values map onto a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A single value, scanned from the first raw string.
    Scalar,
    /// A sequence (`Vec<T>`), scanned from every raw string.
    Sequence,
}

/// One struct field as declared by a [`Record`].
///
/// Declarations are normally generated by `#[derive(Record)]`. A manual
/// implementation lists one declaration per struct field, in declaration
/// order, with `index` being the field's position in the struct:
///
/// ```
/// use urlfilter::{DeclaredField, Record, Registry, Shape, Values};
///
/// #[derive(Default)]
/// struct Filter {
///     id: i64,
///     name: String,
/// }
///
/// impl Record for Filter {
///     fn declared_fields() -> Vec<DeclaredField<Self>> {
///         vec![
///             DeclaredField::<Self>::value::<i64>(0, "id", "", Shape::Scalar, |f| &f.id, |f| &mut f.id),
///             DeclaredField::<Self>::value::<String>(
///                 1,
///                 "name",
///                 "name,required",
///                 Shape::Scalar,
///                 |f| &f.name,
///                 |f| &mut f.name,
///             ),
///         ]
///     }
/// }
///
/// let registry = Registry::new();
/// let values: Values = [("id", "5"), ("name", "bob")].into_iter().collect();
/// let mut filter = Filter::default();
/// registry.decode(&mut filter, &values).unwrap();
/// assert_eq!(filter.id, 5);
/// assert_eq!(filter.name, "bob");
/// ```
pub struct DeclaredField<R> {
    pub(crate) path: Vec<usize>,
    pub(crate) ident: &'static str,
    pub(crate) tag: &'static str,
    pub(crate) kind: DeclaredKind<R>,
}

pub(crate) enum DeclaredKind<R> {
    Value(Slot<R>),
    Embedded(Embedded<R>),
}

pub(crate) struct Slot<R> {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) shape: Shape,
    pub(crate) get: Getter<R>,
    pub(crate) get_mut: Setter<R>,
    pub(crate) hook: Option<Hook<R>>,
}

pub(crate) struct Embedded<R> {
    pub(crate) fields: Vec<DeclaredField<R>>,
    pub(crate) decoder: Option<Hook<R>>,
}

impl<R: 'static> DeclaredField<R> {
    /// Declares a value field of type `T`.
    pub fn value<T: Any>(
        index: usize,
        ident: &'static str,
        tag: &'static str,
        shape: Shape,
        get: fn(&R) -> &T,
        get_mut: fn(&mut R) -> &mut T,
    ) -> Self {
        DeclaredField {
            path: vec![index],
            ident,
            tag,
            kind: DeclaredKind::Value(Slot {
                type_id: TypeId::of::<T>(),
                type_name: type_name::<T>(),
                shape,
                get: getter(move |r| get(r) as &dyn Any),
                get_mut: setter(move |r| get_mut(r) as &mut dyn Any),
                hook: None,
            }),
        }
    }

    /// Declares an embedded record whose fields are flattened into `R`.
    ///
    /// If `E` has a values decoder, it becomes a decode hook of `R`.
    pub fn embedded<E: Record>(
        index: usize,
        ident: &'static str,
        tag: &'static str,
        get: fn(&R) -> &E,
        get_mut: fn(&mut R) -> &mut E,
    ) -> Self {
        let fields = E::declared_fields()
            .into_iter()
            .map(|field| field.lift(index, get, get_mut))
            .collect();
        let decoder = E::values_decoder()
            .map(|decode| hook(move |r: &mut R, values: &Values| decode(get_mut(r), values)));

        DeclaredField {
            path: vec![index],
            ident,
            tag,
            kind: DeclaredKind::Embedded(Embedded { fields, decoder }),
        }
    }

    /// Attaches a decode hook receiving the whole input.
    ///
    /// Used for fields whose type implements
    /// [`DecodeValues`](crate::DecodeValues) without being flattened.
    pub fn with_decoder(mut self, decode: DecodeFn<R>) -> Self {
        let decode = hook(decode);
        match &mut self.kind {
            DeclaredKind::Value(slot) => slot.hook = Some(decode),
            DeclaredKind::Embedded(embedded) => embedded.decoder = Some(decode),
        }
        self
    }

    /// Returns the field's identifier.
    pub fn ident(&self) -> &'static str {
        self.ident
    }

    /// Returns the raw tag.
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Returns the storage path of the field.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Rebases this declaration onto a record `P` embedding `R` at `index`.
    fn lift<P: 'static>(
        self,
        index: usize,
        outer: fn(&P) -> &R,
        outer_mut: fn(&mut P) -> &mut R,
    ) -> DeclaredField<P> {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.push(index);
        path.extend(self.path);

        let kind = match self.kind {
            DeclaredKind::Value(slot) => {
                let (get, get_mut) = (slot.get, slot.get_mut);
                DeclaredKind::Value(Slot {
                    type_id: slot.type_id,
                    type_name: slot.type_name,
                    shape: slot.shape,
                    get: getter(move |p| get(outer(p))),
                    get_mut: setter(move |p| get_mut(outer_mut(p))),
                    hook: slot.hook.map(|decode| lift_hook(decode, outer_mut)),
                })
            }
            DeclaredKind::Embedded(embedded) => DeclaredKind::Embedded(Embedded {
                fields: embedded
                    .fields
                    .into_iter()
                    .map(|field| field.lift(index, outer, outer_mut))
                    .collect(),
                decoder: embedded
                    .decoder
                    .map(|decode| lift_hook(decode, outer_mut)),
            }),
        };

        DeclaredField {
            path,
            ident: self.ident,
            tag: self.tag,
            kind,
        }
    }
}

fn lift_hook<P: 'static, R: 'static>(decode: Hook<R>, outer_mut: fn(&mut P) -> &mut R) -> Hook<P> {
    hook(move |p: &mut P, values: &Values| decode(outer_mut(p), values))
}

impl<R> fmt::Debug for DeclaredField<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            DeclaredKind::Value(slot) => slot.type_name,
            DeclaredKind::Embedded(_) => "embedded",
        };
        f.debug_struct("DeclaredField")
            .field("path", &self.path)
            .field("ident", &self.ident)
            .field("tag", &self.tag)
            .field("kind", &kind)
            .finish()
    }
}

/// Descriptor of one decodable field of a record.
pub struct Field<R> {
    type_id: TypeId,
    type_name: &'static str,
    name: String,
    path: Vec<usize>,
    column: String,
    op: Op,

    required: bool,
    no_decode: bool,
    no_where: bool,

    scan_value: ScanFn,
    is_zero_value: ZeroFn,
    get: Getter<R>,
    get_mut: Setter<R>,
}

impl<R: 'static> Field<R> {
    /// Builds the descriptor of a declared value field.
    ///
    /// Returns `Ok(None)` for ignored fields, for the catch-all field (which
    /// is registered on `meta` instead) and for fields whose type has no
    /// scan function or zero check.
    pub(crate) fn new(
        meta: &mut StructMetadata<R>,
        ident: &'static str,
        tag: &TagOptions,
        path: Vec<usize>,
        slot: &Slot<R>,
        scans: &ScanRegistry,
        zeros: &ZeroRegistry,
    ) -> Result<Option<Self>> {
        if tag.is_ignored() {
            return Ok(None);
        }

        if tag.has(OPT_UNKNOWN) {
            meta.set_catch_all(path, slot);
            return Ok(None);
        }

        let required = tag.has(OPT_REQUIRED);
        let no_decode = tag.has(OPT_NO_DECODE);
        let no_where = tag.has(OPT_NO_WHERE);
        if required && no_where {
            return Err(Error::RequiredNoWhere {
                record: type_name::<R>(),
                field: ident.to_string(),
            });
        }

        let name = tag.rename().unwrap_or(ident).to_string();
        let canonical = underscore(&name);
        let (column, op) = split_column_operator(&canonical, FIELD_SEPARATOR);

        let scan_value = match slot.shape {
            Shape::Sequence => scans.sequence(slot.type_id),
            Shape::Scalar => scans.scalar(slot.type_id),
        };
        let is_zero_value = zeros.get(slot.type_id);

        let (Some(scan_value), Some(is_zero_value)) = (scan_value, is_zero_value) else {
            trace!(
                record = type_name::<R>(),
                field = ident,
                ty = slot.type_name,
                "skipping field of unsupported type"
            );
            return Ok(None);
        };

        Ok(Some(Field {
            type_id: slot.type_id,
            type_name: slot.type_name,
            column: column.to_string(),
            op,
            name,
            path,
            required,
            no_decode,
            no_where,
            scan_value,
            is_zero_value,
            get: Arc::clone(&slot.get),
            get_mut: Arc::clone(&slot.get_mut),
        }))
    }
}

impl<R> Field<R> {
    /// Returns the declared or tag-renamed name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the column this field filters on.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Returns the comparison operator.
    pub fn op(&self) -> Op {
        self.op
    }

    /// Returns the storage path: the field's position, preceded by the
    /// positions of the embedded records it was flattened out of.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Returns the field's type identity.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the field's type name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn no_decode(&self) -> bool {
        self.no_decode
    }

    pub fn no_where(&self) -> bool {
        self.no_where
    }

    /// Returns the field's value in `record`.
    pub fn value<'a>(&self, record: &'a R) -> &'a dyn Any {
        (self.get)(record)
    }

    /// Scans raw values into the field of `record`.
    pub fn scan(&self, record: &mut R, values: &[String]) -> std::result::Result<(), ScanError> {
        (self.scan_value)((self.get_mut)(record), values)
    }

    /// Returns `true` if `value` is the zero value of the field's type.
    pub fn is_zero(&self, value: &dyn Any) -> bool {
        (self.is_zero_value)(value)
    }

    /// Decides whether a field holding `value` is left out of generated filters.
    ///
    /// A `nowhere` field is omitted unless it is also `required`. A zero
    /// value is always omitted, `required` or not.
    pub fn omit(&self, value: &dyn Any) -> bool {
        (!self.required && self.no_where) || self.is_zero(value)
    }

    /// Same as [`omit`](Self::omit), reading the value from `record`.
    pub fn omit_record(&self, record: &R) -> bool {
        self.omit(self.value(record))
    }
}

impl<R> fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("type_name", &self.type_name)
            .field("name", &self.name)
            .field("path", &self.path)
            .field("column", &self.column)
            .field("op", &self.op)
            .field("required", &self.required)
            .field("no_decode", &self.no_decode)
            .field("no_where", &self.no_where)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Default)]
    struct Sample {
        id: i64,
        created_at: u32,
        secret: String,
        elapsed: Duration,
    }

    fn id(tag: &'static str) -> DeclaredField<Sample> {
        DeclaredField::<Sample>::value::<i64>(0, "id", tag, Shape::Scalar, |s| &s.id, |s| &mut s.id)
    }

    fn created_at(tag: &'static str) -> DeclaredField<Sample> {
        DeclaredField::<Sample>::value::<u32>(
            1,
            "created_at",
            tag,
            Shape::Scalar,
            |s| &s.created_at,
            |s| &mut s.created_at,
        )
    }

    fn resolve(declared: DeclaredField<Sample>) -> Result<Option<Field<Sample>>> {
        let mut meta = StructMetadata {
            table_name: None,
            fields: Vec::new(),
            catch_all: None,
            hooks: Vec::new(),
            decoder: None,
        };
        let DeclaredKind::Value(slot) = &declared.kind else {
            panic!("expected a value field");
        };
        let tag = TagOptions::parse(declared.tag);
        Field::new(
            &mut meta,
            declared.ident,
            &tag,
            declared.path.clone(),
            slot,
            &ScanRegistry::builtin(),
            &ZeroRegistry::builtin(),
        )
    }

    #[test]
    fn column_from_identifier() {
        let field = resolve(created_at("")).unwrap().unwrap();
        assert_eq!(field.name(), "created_at");
        assert_eq!(field.column(), "created_at");
        assert_eq!(field.op(), Op::Eq);
        assert_eq!(field.path(), &[1]);
    }

    #[test]
    fn rename_is_underscored_then_split() {
        let field = resolve(created_at("CreatedAt_gte")).unwrap().unwrap();
        assert_eq!(field.name(), "CreatedAt_gte");
        assert_eq!(field.column(), "created_at");
        assert_eq!(field.op(), Op::Gte);
    }

    #[test]
    fn flags_from_tag() {
        let field = resolve(id(",required,nodecode")).unwrap().unwrap();
        assert!(field.is_required());
        assert!(field.no_decode());
        assert!(!field.no_where());
    }

    #[test]
    fn ignored_and_catch_all_give_no_field() {
        assert!(resolve(id("-")).unwrap().is_none());
        // An `i64` catch-all is unusable; it is dropped, not an error.
        assert!(resolve(id(",unknown")).unwrap().is_none());
    }

    #[test]
    fn required_and_nowhere_conflict() {
        let err = resolve(id(",required,nowhere")).unwrap_err();
        assert!(matches!(err, Error::RequiredNoWhere { field, .. } if field == "id"));
    }

    #[test]
    fn unsupported_type_gives_no_field() {
        let declared = DeclaredField::<Sample>::value::<Duration>(
            3,
            "elapsed",
            "",
            Shape::Scalar,
            |s| &s.elapsed,
            |s| &mut s.elapsed,
        );
        assert!(resolve(declared).unwrap().is_none());

        let declared = DeclaredField::<Sample>::value::<String>(
            2,
            "secret",
            "",
            Shape::Sequence,
            |s| &s.secret,
            |s| &mut s.secret,
        );
        assert!(resolve(declared).unwrap().is_none());
    }

    #[test]
    fn omit_zero_values() {
        let plain = resolve(id("")).unwrap().unwrap();
        assert!(plain.omit(&0i64));
        assert!(!plain.omit(&7i64));

        let required = resolve(id(",required")).unwrap().unwrap();
        assert!(required.omit(&0i64));
        assert!(!required.omit(&7i64));
    }

    #[test]
    fn omit_nowhere_fields() {
        let nowhere = resolve(id(",nowhere")).unwrap().unwrap();
        assert!(nowhere.omit(&7i64));

        let sample = Sample {
            id: 7,
            ..Sample::default()
        };
        assert!(nowhere.omit_record(&sample));
        assert!(!resolve(id("")).unwrap().unwrap().omit_record(&sample));
    }

    #[test]
    fn scan_writes_through_accessor() {
        let field = resolve(id("")).unwrap().unwrap();
        let mut sample = Sample::default();
        field.scan(&mut sample, &["42".to_string()]).unwrap();
        assert_eq!(sample.id, 42);
        assert_eq!(field.value(&sample).downcast_ref::<i64>(), Some(&42));
    }
}
