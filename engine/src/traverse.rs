//! The traversal shared by [`diff`] and [`merge`].
//!
//! # Algorithm
//!
//! 1. Check that both operands are present records of the same type
//! 2. Walk the fields of the pair in declaration order
//! 3. Embedded fields are walked into, depth first; an optional embedded record
//!    that is absent on the source side is skipped with everything below it
//! 4. Plain fields whose key passes the filter are compared with [`deep_eq`];
//!    unequal keys are collected and, when merging, the target field is
//!    replaced by a clone of the source field
//!
//! An absent optional embedded record on the target side is filled as a
//! detached zero value and only attached once a key inside it was written,
//! so a merge that reports no keys leaves the target as it was.
//!
//! A merge that fails halfway keeps the fields it already wrote. There is no
//! rollback.

use crate::{
    equal::deep_eq,
    error::{Error, Result},
    reflect::{type_id_of, Kind, KindMut, Reflect, Shape, Struct},
    FieldInfo, KeyFilter, Options,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Diff,
    Merge,
}

/// Report the keys whose values differ between `target` and `source`.
///
/// Both operands must be records of the same type, given directly or as a
/// present `Option`/`Box`. Only fields tagged under the default `json`
/// namespace and accepted by `keys` are compared. Neither operand is modified.
///
/// Keys are returned in declaration order, with embedded records expanded in
/// place. An absent optional embedded record on the `source` side contributes
/// nothing; an absent one on the `target` side is compared as its zero value.
pub fn diff<'k>(
    target: &dyn Reflect,
    source: &dyn Reflect,
    keys: impl Into<KeyFilter<'k>>,
) -> Result<Vec<String>> {
    diff_with(target, source, keys, &Options::default())
}

/// [`diff`] with explicit [`Options`].
pub fn diff_with<'k>(
    target: &dyn Reflect,
    source: &dyn Reflect,
    keys: impl Into<KeyFilter<'k>>,
    options: &Options,
) -> Result<Vec<String>> {
    check_same_type(target, source)?;
    let target = top_level(target, "target")?;
    let source = top_level(source, "source")?;

    let mut walker = Walker::new(options.effective_tag(), keys.into());
    walker.diff_record(target, source)?;
    Ok(walker.finish(Mode::Diff))
}

/// Copy the differing keyed fields of `update` into `target`.
///
/// Returns the same keys [`diff`] would have reported before the call. Fields
/// are replaced as a whole: nested records that are not embedded are never
/// merged field by field.
///
/// An absent optional embedded record in `target` is created with its zero
/// value when `update` has one and at least one of its keys is written. When
/// `update` has none, or the filter selects none of its changed keys, that
/// part of `target` is left untouched.
pub fn merge<'k>(
    target: &mut dyn Reflect,
    update: &dyn Reflect,
    keys: impl Into<KeyFilter<'k>>,
) -> Result<Vec<String>> {
    merge_with(target, update, keys, &Options::default())
}

/// [`merge`] with explicit [`Options`].
pub fn merge_with<'k>(
    target: &mut dyn Reflect,
    update: &dyn Reflect,
    keys: impl Into<KeyFilter<'k>>,
    options: &Options,
) -> Result<Vec<String>> {
    check_same_type(target, update)?;
    let update = top_level(update, "update")?;
    let target = top_level_mut(target, "target")?;

    let mut walker = Walker::new(options.effective_tag(), keys.into());
    walker.merge_record(target, update)?;
    Ok(walker.finish(Mode::Merge))
}

fn check_same_type(target: &dyn Reflect, source: &dyn Reflect) -> Result<()> {
    if type_id_of(target) != type_id_of(source) {
        return Err(Error::invalid_argument(format!(
            "target and source must be records of the same type, got {} and {}",
            target.type_name(),
            source.type_name()
        )));
    }
    Ok(())
}

fn top_level<'a>(value: &'a dyn Reflect, role: &str) -> Result<&'a dyn Struct> {
    let type_name = value.type_name();
    let record = match value.kind() {
        Kind::Record(record) => Some(record),
        Kind::Optional(slot) => match slot.get() {
            Some(inner) => match inner.kind() {
                Kind::Record(record) => Some(record),
                _ => None,
            },
            None => return Err(Error::invalid_argument(format!("{role} is absent"))),
        },
        _ => None,
    };
    record.ok_or_else(|| {
        Error::invalid_argument(format!("{role} must be a record, got {type_name}"))
    })
}

fn top_level_mut<'a>(value: &'a mut dyn Reflect, role: &str) -> Result<&'a mut dyn Struct> {
    let type_name = value.type_name();
    let record = match value.kind_mut() {
        KindMut::Record(record) => Some(record),
        KindMut::Optional(slot) => match slot.get_mut() {
            Some(inner) => match inner.kind_mut() {
                KindMut::Record(record) => Some(record),
                _ => None,
            },
            None => return Err(Error::invalid_argument(format!("{role} is absent"))),
        },
        KindMut::Value => None,
    };
    record.ok_or_else(|| {
        Error::invalid_argument(format!("{role} must be a record, got {type_name}"))
    })
}

fn record_of<'a>(value: &'a dyn Reflect, info: &FieldInfo) -> Result<&'a dyn Struct> {
    match value.kind() {
        Kind::Record(record) => Ok(record),
        _ => Err(Error::unsupported_field(info.name(), value.type_name())),
    }
}

fn record_of_mut<'a>(value: &'a mut dyn Reflect, info: &FieldInfo) -> Result<&'a mut dyn Struct> {
    let type_name = value.type_name();
    match value.kind_mut() {
        KindMut::Record(record) => Ok(record),
        _ => Err(Error::unsupported_field(info.name(), type_name)),
    }
}

struct Walker<'a> {
    tag: &'a str,
    keys: KeyFilter<'a>,
    changed: Vec<String>,
}

impl<'a> Walker<'a> {
    fn new(tag: &'a str, keys: KeyFilter<'a>) -> Self {
        Self {
            tag,
            keys,
            changed: Vec::new(),
        }
    }

    /// Key of a plain field, if it is keyed and passes the filter.
    fn selected_key(&self, info: &FieldInfo) -> Option<&'static str> {
        let key = info.key(self.tag)?;
        self.keys.contains(key).then_some(key)
    }

    fn finish(self, mode: Mode) -> Vec<String> {
        tracing::debug!(
            mode = ?mode,
            tag = %self.tag,
            changed = self.changed.len(),
            "traversal finished"
        );
        self.changed
    }

    fn diff_record(&mut self, target: &dyn Struct, source: &dyn Struct) -> Result<()> {
        for (t, s) in target.fields().into_iter().zip(source.fields()) {
            if s.info.is_embedded() {
                self.diff_embedded(s.info, t.value, s.value)?;
                continue;
            }

            let Some(key) = self.selected_key(s.info) else {
                continue;
            };
            if !deep_eq(t.value, s.value) {
                self.changed.push(key.to_string());
            }
        }
        Ok(())
    }

    fn diff_embedded(
        &mut self,
        info: &FieldInfo,
        target: &dyn Reflect,
        source: &dyn Reflect,
    ) -> Result<()> {
        match (target.kind(), source.kind()) {
            (Kind::Record(t), Kind::Record(s)) => self.diff_record(t, s),
            (Kind::Optional(t), Kind::Optional(s)) if s.element_shape() == Shape::Record => {
                let Some(s) = s.get() else {
                    tracing::trace!(field = info.name(), "source embedded record absent, skipping");
                    return Ok(());
                };
                let s = record_of(s, info)?;
                match t.get() {
                    Some(t) => self.diff_record(record_of(t, info)?, s),
                    None => {
                        // Compare against what a merge would create
                        let zero = t.element_zero().ok_or_else(|| {
                            Error::unsupported_field(info.name(), target.type_name())
                        })?;
                        let t = record_of(&*zero, info)?;
                        self.diff_record(t, s)
                    }
                }
            }
            _ => Err(Error::unsupported_field(info.name(), source.type_name())),
        }
    }

    fn merge_record(&mut self, target: &mut dyn Struct, source: &dyn Struct) -> Result<()> {
        for (t, s) in target.fields_mut().into_iter().zip(source.fields()) {
            if s.info.is_embedded() {
                self.merge_embedded(s.info, t.value, s.value)?;
                continue;
            }

            let Some(key) = self.selected_key(s.info) else {
                continue;
            };
            if deep_eq(&*t.value, s.value) {
                continue;
            }
            self.changed.push(key.to_string());
            t.value.assign(s.value)?;
        }
        Ok(())
    }

    fn merge_embedded(
        &mut self,
        info: &FieldInfo,
        target: &mut dyn Reflect,
        source: &dyn Reflect,
    ) -> Result<()> {
        let target_type = target.type_name();
        match (target.kind_mut(), source.kind()) {
            (KindMut::Record(t), Kind::Record(s)) => self.merge_record(t, s),
            (KindMut::Optional(t), Kind::Optional(s)) if s.element_shape() == Shape::Record => {
                let Some(s) = s.get() else {
                    tracing::trace!(field = info.name(), "update embedded record absent, skipping");
                    return Ok(());
                };
                let s = record_of(s, info)?;
                if let Some(t) = t.get_mut() {
                    return self.merge_record(record_of_mut(t, info)?, s);
                }

                // Fill a detached zero value and attach it only if a key was written
                let mut zero = t
                    .element_zero()
                    .ok_or_else(|| Error::unsupported_field(info.name(), target_type))?;
                let before = self.changed.len();
                self.merge_record(record_of_mut(&mut *zero, info)?, s)?;
                if self.changed.len() == before {
                    tracing::trace!(field = info.name(), "no keys written, target left absent");
                    return Ok(());
                }

                tracing::trace!(field = info.name(), "materializing target embedded record");
                t.materialize()
                    .ok_or_else(|| Error::unsupported_field(info.name(), target_type))?
                    .assign(&*zero)
            }
            _ => Err(Error::unsupported_field(info.name(), source.type_name())),
        }
    }
}
