//! Property-based tests for the metadata container.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use proptest::prelude::*;

use clipmeta::core::container::{HasMetas, MetaContainer, MetaError};
use clipmeta::core::format;
use clipmeta::core::marker::{MarkerFlags, MarkerList};
use clipmeta::core::types::{MetaFlags, MetaKey};
use clipmeta::core::value::{MetaType, MetaValue};

/// Strategy for generating valid meta keys.
fn valid_key() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9/_.:+-]{0,15}"
}

/// Dates across nearly all of chrono's range, signed years included.
fn date() -> impl Strategy<Value = NaiveDate> {
    (-262_000i32..=262_000, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Date-times with sub-second precision and offsets down to the second.
fn date_time() -> impl Strategy<Value = DateTime<FixedOffset>> {
    (date(), 0u32..86_400, 0u32..1_000_000_000, -86_399i32..=86_399).prop_map(
        |(day, secs, nanos, offset)| {
            let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos).unwrap();
            FixedOffset::east_opt(offset)
                .unwrap()
                .from_local_datetime(&NaiveDateTime::new(day, time))
                .unwrap()
        },
    )
}

/// Strategy for values that are not marker lists.
fn scalar_value() -> impl Strategy<Value = MetaValue> {
    prop_oneof![
        any::<bool>().prop_map(MetaValue::Boolean),
        any::<i32>().prop_map(MetaValue::Int),
        any::<u32>().prop_map(MetaValue::UInt),
        any::<i64>().prop_map(MetaValue::Int64),
        any::<u64>().prop_map(MetaValue::UInt64),
        (prop::num::f32::NORMAL
            | prop::num::f32::SUBNORMAL
            | prop::num::f32::ZERO
            | prop::num::f32::INFINITE)
            .prop_map(MetaValue::Float),
        (prop::num::f64::NORMAL
            | prop::num::f64::SUBNORMAL
            | prop::num::f64::ZERO
            | prop::num::f64::INFINITE)
            .prop_map(MetaValue::Double),
        "[ -~]{0,24}".prop_map(MetaValue::String),
        date().prop_map(MetaValue::Date),
        date_time().prop_map(MetaValue::DateTime),
    ]
}

fn marker_list() -> impl Strategy<Value = MetaValue> {
    (
        any::<bool>(),
        prop::collection::vec(
            (any::<u64>(), prop::collection::btree_map(valid_key(), scalar_value(), 0..3)),
            0..4,
        ),
    )
        .prop_map(|(snappable, markers)| {
            let flags = if snappable {
                MarkerFlags::Snappable
            } else {
                MarkerFlags::None
            };
            let mut list = MarkerList::with_flags(flags);
            for (position, metas) in markers {
                let marker = list.add(position);
                for (key, value) in metas {
                    marker.metas_mut().set_meta(&key, Some(value)).unwrap();
                }
            }
            MetaValue::MarkerList(list)
        })
}

fn any_value() -> impl Strategy<Value = MetaValue> {
    prop_oneof![9 => scalar_value(), 1 => marker_list()]
}

fn container() -> impl Strategy<Value = MetaContainer> {
    prop::collection::btree_map(valid_key(), any_value(), 0..8).prop_map(|entries| {
        let mut metas = MetaContainer::new();
        for (key, value) in entries {
            metas.set_meta(&key, Some(value)).unwrap();
        }
        metas
    })
}

proptest! {
    /// Serializing then importing into a fresh container reproduces the entries.
    #[test]
    fn text_roundtrip(metas in container()) {
        let text = metas.metas_to_string();
        let mut parsed = MetaContainer::new();
        let report = parsed.add_metas_from_string(&text).unwrap();

        prop_assert!(report.is_clean());
        prop_assert_eq!(report.applied.len(), metas.len());
        prop_assert_eq!(&parsed, &metas);
        prop_assert_eq!(parsed.metas_to_string(), text);
    }

    /// Any value stored under a key is returned unchanged.
    #[test]
    fn set_then_get(key in valid_key(), value in any_value()) {
        let mut metas = MetaContainer::new();
        metas.set_meta(&key, Some(value.clone())).unwrap();
        prop_assert_eq!(metas.get_meta(&key), Some(&value));
    }

    /// A single value survives its own text form.
    #[test]
    fn value_roundtrip(value in scalar_value()) {
        let text = format::value_to_string(&value);
        prop_assert_eq!(format::parse_value(value.meta_type(), &text).unwrap(), value);
    }

    /// Removal always succeeds, even for read-only registered keys.
    #[test]
    fn removal_always_succeeds(key in valid_key(), value in scalar_value(), writable in any::<bool>()) {
        let flags = if writable { MetaFlags::READ_WRITE } else { MetaFlags::READABLE };
        let mut metas = MetaContainer::new();
        metas.register_meta(flags, &key, value).unwrap();

        prop_assert!(metas.set_meta(&key, None).is_ok());
        prop_assert!(metas.get_meta(&key).is_none());
        prop_assert!(metas.check_meta_registered(&key).is_ok());
    }

    /// Registered types are enforced and rejected writes change nothing.
    #[test]
    fn registered_type_enforced(key in valid_key(), first in scalar_value(), second in scalar_value()) {
        let mut metas = MetaContainer::new();
        metas.register_meta(MetaFlags::READ_WRITE, &key, first.clone()).unwrap();

        let result = metas.set_meta(&key, Some(second.clone()));
        if first.meta_type() == second.meta_type() {
            prop_assert!(result.is_ok());
            prop_assert_eq!(metas.get_meta(&key), Some(&second));
        } else {
            let is_type_conflict = matches!(result, Err(MetaError::TypeConflict { .. }));
            prop_assert!(is_type_conflict);
            prop_assert_eq!(metas.get_meta(&key), Some(&first));
        }
    }

    /// Malformed text leaves the container untouched.
    #[test]
    fn malformed_import_changes_nothing(metas in container(), garbage in "[=,;(]{1,4}") {
        let mut target = metas.clone();
        let text = format!("metadatas, {}", garbage);
        prop_assert!(target.add_metas_from_string(&text).is_err());
        prop_assert_eq!(&target, &metas);
    }

    /// Lookups of registrations ignore stored values.
    #[test]
    fn unregistered_lookup_fails(key in valid_key(), value in scalar_value()) {
        let mut metas = MetaContainer::new();
        metas.set_meta(&key, Some(value)).unwrap();
        let is_not_registered =
            matches!(metas.check_meta_registered(&key), Err(MetaError::NotRegistered { .. }));
        prop_assert!(is_not_registered);
    }

    /// Marker lists stay sorted whatever the insertion order.
    #[test]
    fn markers_sorted(positions in prop::collection::vec(any::<u64>(), 0..16)) {
        let mut list = MarkerList::new();
        for position in &positions {
            list.add(*position);
        }
        let stored: Vec<u64> = list.iter().map(|m| m.position()).collect();
        let mut expected = positions.clone();
        expected.sort_unstable();
        prop_assert_eq!(stored, expected);
    }

    /// Every generated key is accepted by key validation.
    #[test]
    fn generated_keys_valid(key in valid_key()) {
        prop_assert!(MetaKey::new(&key).is_ok());
    }

    /// Type names round-trip through their canonical name.
    #[test]
    fn type_names(index in 0usize..MetaType::ALL.len()) {
        let ty = MetaType::ALL[index];
        prop_assert_eq!(MetaType::from_name(ty.name()).unwrap(), ty);
    }
}
