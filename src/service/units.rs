use bigdecimal::BigDecimal;

use crate::models::UnitType;

/// Known unit labels: (label, family, factor to the family's base unit)
const UNIT_TABLE: &[(&str, UnitType, i64)] = &[
    ("g", UnitType::Weight, 1),
    ("gram", UnitType::Weight, 1),
    ("grams", UnitType::Weight, 1),
    ("kg", UnitType::Weight, 1000),
    ("ml", UnitType::Volume, 1),
    ("l", UnitType::Volume, 1000),
    ("pieces", UnitType::Count, 1),
    ("piece", UnitType::Count, 1),
    ("pcs", UnitType::Count, 1),
    ("items", UnitType::Count, 1),
    ("item", UnitType::Count, 1),
    ("count", UnitType::Count, 1),
];

fn lookup(unit: &str) -> Option<(UnitType, i64)> {
    let label = unit.trim().to_ascii_lowercase();
    UNIT_TABLE
        .iter()
        .find(|(name, _, _)| *name == label)
        .map(|(_, family, factor)| (*family, *factor))
}

/// Unit family of a label, `None` for labels outside the table
pub fn unit_type(unit: &str) -> Option<UnitType> {
    lookup(unit).map(|(family, _)| family)
}

/// Convert `quantity` from `from` to `to`.
///
/// `None` when either label is unknown or the families differ.
pub fn try_convert(quantity: &BigDecimal, from: &str, to: &str) -> Option<BigDecimal> {
    let (from_family, from_factor) = lookup(from)?;
    let (to_family, to_factor) = lookup(to)?;
    if from_family != to_family {
        return None;
    }
    if from_factor == to_factor {
        return Some(quantity.clone());
    }

    Some(quantity * BigDecimal::from(from_factor) / BigDecimal::from(to_factor))
}

/// Best-effort conversion: unknown or incompatible pairs come back unchanged
pub fn convert(quantity: &BigDecimal, from: &str, to: &str) -> BigDecimal {
    try_convert(quantity, from, to).unwrap_or_else(|| quantity.clone())
}
