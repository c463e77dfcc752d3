//! Deep structural equality over reflected values.

use crate::reflect::{type_id_of, Kind, Reflect};

/// Compare two values recursively.
///
/// Values of different concrete types are never equal. Optionals are equal
/// when both are absent or both are present with equal contents. Records are
/// compared field by field (embedded and untagged fields included), sequences
/// element by element, maps entry by entry. Scalars use `PartialEq`, so a
/// `NaN` is not equal to itself.
pub fn deep_eq(a: &dyn Reflect, b: &dyn Reflect) -> bool {
    if type_id_of(a) != type_id_of(b) {
        return false;
    }

    match (a.kind(), b.kind()) {
        (Kind::Scalar, Kind::Scalar) => a.scalar_eq(b),
        (Kind::Optional(x), Kind::Optional(y)) => match (x.get(), y.get()) {
            (None, None) => true,
            (Some(x), Some(y)) => deep_eq(x, y),
            _ => false,
        },
        (Kind::Record(x), Kind::Record(y)) => x
            .fields()
            .iter()
            .zip(y.fields().iter())
            .all(|(f, g)| deep_eq(f.value, g.value)),
        (Kind::Sequence(x), Kind::Sequence(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(v, w)| deep_eq(*v, *w))
        }
        (Kind::Map(x), Kind::Map(y)) => {
            x.len() == y.len()
                && x
                    .entries()
                    .into_iter()
                    .all(|(key, v)| y.get(key).is_some_and(|w| deep_eq(v, w)))
        }
        _ => false,
    }
}
