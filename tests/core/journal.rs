use brewlog::core::error::{BrewlogError, PersistenceError};
use brewlog::core::ids::SequentialIds;
use brewlog::core::journal::Journal;
use brewlog::core::model::{BeanDraft, BeanId, BrewId, BrewRecordDraft, FlavorProfile};
use brewlog::core::schemas;
use brewlog::core::storage::{MemoryStorage, Storage};
use brewlog::core::time::FixedClock;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::cell::Cell;
use std::rc::Rc;

/// Storage whose saves can be switched off to simulate a full disk.
#[derive(Default)]
struct FlakyStorage {
    inner: MemoryStorage,
    failing: Rc<Cell<bool>>,
}

impl Storage for FlakyStorage {
    fn load(&self, collection: &str) -> Result<Option<String>, PersistenceError> {
        self.inner.load(collection)
    }

    fn save(&mut self, collection: &str, payload: &str) -> Result<(), PersistenceError> {
        if self.failing.get() {
            return Err(PersistenceError::Io(std::io::Error::other("quota exceeded")));
        }
        self.inner.save(collection, payload)
    }

    fn describe(&self) -> String {
        "flaky".to_string()
    }
}

fn start() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-10T08:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn journal() -> Journal<MemoryStorage> {
    journal_on(MemoryStorage::new())
}

fn journal_on<S: Storage>(storage: S) -> Journal<S> {
    Journal::with_parts(
        storage,
        Box::new(SequentialIds::new("id")),
        Box::new(FixedClock::stepping(start(), Duration::minutes(1))),
    )
}

fn ethiopia() -> BeanDraft {
    BeanDraft::new(
        "Ethiopia",
        "Yirgacheffe Coop",
        "Washed",
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
    )
}

fn brew(temp: f64, dripper: &str) -> BrewRecordDraft {
    BrewRecordDraft {
        dripper: dripper.to_string(),
        grinder: "Comandante C40".to_string(),
        grind_setting: "24 clicks".to_string(),
        water_temp: temp,
        brew_time: "2:45".to_string(),
        flavor_profile: FlavorProfile::new(4.0, 3.0, 2.0, 4.0, 3.0).unwrap(),
        notes: String::new(),
    }
}

#[test]
fn created_bean_is_found_with_assigned_identity() {
    let mut journal = journal();
    let bean = journal.create_bean(ethiopia()).into_result().unwrap();

    assert!(!bean.id.as_str().is_empty());
    assert_eq!(bean.created_at, start());
    let found = journal.view().find_bean(&bean.id).unwrap();
    assert_eq!(found.draft(), ethiopia());
    assert_eq!(found, &bean);
}

#[test]
fn duplicate_bean_fields_get_distinct_ids() {
    let mut journal = journal();
    let a = journal.create_bean(ethiopia()).into_value();
    let b = journal.create_bean(ethiopia()).into_value();
    assert_ne!(a.id, b.id);
    assert_eq!(journal.beans().len(), 2);
}

#[test]
fn update_replaces_fields_but_keeps_identity() {
    let mut journal = journal();
    let bean = journal
        .create_bean(ethiopia().with_photo("aGVsbG8="))
        .into_value();

    let replacement = BeanDraft::new(
        "Ethiopia",
        "Yirgacheffe Coop",
        "Natural",
        NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
    );
    let updated = journal
        .update_bean(&bean.id, replacement.clone())
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(updated.id, bean.id);
    assert_eq!(updated.created_at, bean.created_at);
    assert_eq!(updated.process, "Natural");
    // Full replace: the omitted photo is gone.
    assert!(updated.photo.is_none());
    assert_eq!(journal.view().find_bean(&bean.id).unwrap().draft(), replacement);
}

#[test]
fn update_of_unknown_bean_is_not_found() {
    let mut journal = journal();
    let err = journal
        .update_bean(&BeanId::new("missing"), ethiopia())
        .unwrap_err();
    assert!(matches!(err, BrewlogError::NotFound(_)));
    assert!(journal.beans().is_empty());
}

#[test]
fn brew_for_unknown_bean_is_invalid_reference() {
    let mut journal = journal();
    let bean = journal.create_bean(ethiopia()).into_value();
    journal
        .create_brew_record(&bean.id, brew(92.0, "V60"))
        .unwrap()
        .into_result()
        .unwrap();
    let before = journal.brew_records().to_vec();

    let err = journal
        .create_brew_record(&BeanId::new("nope"), brew(92.0, "V60"))
        .unwrap_err();
    assert!(matches!(err, BrewlogError::InvalidReference(_)));
    assert_eq!(journal.brew_records(), before.as_slice());
}

#[test]
fn bean_lifecycle_with_cascading_delete() {
    let mut journal = journal();
    let x = journal.create_bean(ethiopia()).into_value();

    let mut draft = brew(92.0, "V60");
    draft.flavor_profile = FlavorProfile::new(4.0, 3.0, 2.0, 4.0, 3.0).unwrap();
    let y = journal
        .create_brew_record(&x.id, draft)
        .unwrap()
        .into_value();
    assert_eq!(y.coffee_bean_id, x.id);
    assert_eq!(journal.view().brew_count_for_bean(&x.id), 1);

    let removal = journal.delete_bean(&x.id).into_result().unwrap();
    assert_eq!(removal.bean.map(|b| b.id), Some(x.id.clone()));
    assert_eq!(removal.brew_records.len(), 1);

    let view = journal.view();
    assert!(view.find_brew_record(&y.id).is_none());
    assert!(view.find_bean(&x.id).is_none());
    assert!(view.brew_records_for_bean(&x.id).is_empty());
}

#[test]
fn cascade_only_touches_records_of_the_deleted_bean() {
    let mut journal = journal();
    let a = journal.create_bean(ethiopia()).into_value();
    let b = journal
        .create_bean(BeanDraft::new(
            "Colombia",
            "La Palma",
            "Honey",
            NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
        ))
        .into_value();
    for _ in 0..3 {
        let _ = journal.create_brew_record(&a.id, brew(92.0, "V60")).unwrap();
    }
    let kept = journal
        .create_brew_record(&b.id, brew(94.0, "Origami"))
        .unwrap()
        .into_value();

    let _ = journal.delete_bean(&a.id);
    assert_eq!(journal.brew_records(), std::slice::from_ref(&kept));
    assert_eq!(journal.view().brew_count_for_bean(&b.id), 1);
}

#[test]
fn deletes_of_missing_ids_are_no_ops() {
    let mut journal = journal();
    let bean = journal.create_bean(ethiopia()).into_value();

    let removal = journal.delete_bean(&BeanId::new("ghost")).into_result().unwrap();
    assert!(removal.bean.is_none());
    assert!(removal.brew_records.is_empty());

    let removed = journal
        .delete_brew_record(&BrewId::new("ghost"))
        .into_result()
        .unwrap();
    assert!(removed.is_none());
    assert_eq!(journal.beans().len(), 1);
    assert_eq!(journal.beans()[0].id, bean.id);
}

#[test]
fn every_mutation_writes_through() {
    let mut journal = journal();
    let bean = journal.create_bean(ethiopia()).into_value();
    let record = journal
        .create_brew_record(&bean.id, brew(92.0, "V60"))
        .unwrap()
        .into_value();

    let stored_records = journal
        .storage()
        .raw(schemas::BREW_RECORDS_COLLECTION)
        .unwrap()
        .to_string();
    assert!(stored_records.contains(record.id.as_str()));
    assert!(stored_records.contains("\"coffeeBeanId\""));

    let _ = journal.delete_brew_record(&record.id);
    assert_eq!(
        journal.storage().raw(schemas::BREW_RECORDS_COLLECTION),
        Some("[]")
    );
}

#[test]
fn reopened_journal_sees_saved_state() {
    let mut journal = journal();
    let bean = journal.create_bean(ethiopia()).into_value();
    let record = journal
        .create_brew_record(&bean.id, brew(90.0, "Kalita Wave"))
        .unwrap()
        .into_value();
    let storage = journal.storage().clone();

    let reopened = journal_on(storage);
    assert!(reopened.load_warning().is_none());
    assert_eq!(reopened.beans(), &[bean]);
    assert_eq!(reopened.brew_records(), &[record]);
}

#[test]
fn failed_save_keeps_mutation_in_memory_and_reports_it() {
    let failing = Rc::new(Cell::new(false));
    let mut journal = journal_on(FlakyStorage {
        inner: MemoryStorage::new(),
        failing: Rc::clone(&failing),
    });
    let bean = journal.create_bean(ethiopia()).into_value();

    failing.set(true);
    let outcome = journal.create_brew_record(&bean.id, brew(92.0, "V60")).unwrap();
    assert!(!outcome.is_durable());
    let record_id = outcome.value.id.clone();
    assert!(matches!(
        outcome.into_result(),
        Err(BrewlogError::Persistence(PersistenceError::Io(_)))
    ));
    assert!(journal.view().find_brew_record(&record_id).is_some());
    assert!(journal.storage().inner.raw(schemas::BREW_RECORDS_COLLECTION).is_none());

    // The next successful save carries the earlier change with it.
    failing.set(false);
    let second = journal
        .create_brew_record(&bean.id, brew(94.0, "V60"))
        .unwrap()
        .into_result()
        .unwrap();
    let stored = journal
        .storage()
        .inner
        .raw(schemas::BREW_RECORDS_COLLECTION)
        .unwrap();
    assert!(stored.contains(record_id.as_str()));
    assert!(stored.contains(second.id.as_str()));
}

#[test]
fn load_failure_starts_empty_without_partial_state() {
    let storage = MemoryStorage::new()
        .with_entry(
            schemas::BEANS_COLLECTION,
            r#"[{"id":"1","origin":"Kenya","farm":"Gatomboya","process":"Washed","roastDate":"2024-02-01","createdAt":"2024-02-02T10:00:00.000Z"}]"#,
        )
        .with_entry(schemas::BREW_RECORDS_COLLECTION, "[{\"id\": ");
    let journal = journal_on(storage);

    assert!(journal.beans().is_empty());
    assert!(journal.brew_records().is_empty());
    match journal.load_warning() {
        Some(PersistenceError::Corrupt { collection, .. }) => {
            assert_eq!(collection, schemas::BREW_RECORDS_COLLECTION)
        }
        other => panic!("expected corrupt collection warning, got {:?}", other),
    }
}

#[test]
fn comparison_gate_counts_records_system_wide() {
    let mut journal = journal();
    let a = journal.create_bean(ethiopia()).into_value();
    let b = journal.create_bean(ethiopia()).into_value();
    let _ = journal.create_brew_record(&a.id, brew(92.0, "V60")).unwrap();
    assert!(!journal.view().can_compare());
    let _ = journal.create_brew_record(&b.id, brew(92.0, "V60")).unwrap();
    assert!(journal.view().can_compare());
}

#[test]
fn orphaned_records_are_dropped_on_load_and_cleaned_on_next_save() {
    let beans = r#"[{"id":"kenya","origin":"Kenya","farm":"Gatomboya","process":"Washed","roastDate":"2024-02-01","createdAt":"2024-02-02T10:00:00.000Z"}]"#;
    let records = r#"[
      {"id":"orphan","coffeeBeanId":"gone","brewDate":"2024-01-10T08:30:00.000Z","dripper":"V60","grinder":"C40",
       "grindSetting":"","waterTemp":92,"brewTime":"","flavorProfile":{"acidity":4,"sweetness":3,"body":2,"aroma":4,"aftertaste":3}},
      {"id":"kept","coffeeBeanId":"kenya","brewDate":"2024-02-03T08:30:00.000Z","dripper":"V60","grinder":"C40",
       "grindSetting":"","waterTemp":93,"brewTime":"","flavorProfile":{"acidity":4,"sweetness":3,"body":2,"aroma":4,"aftertaste":3}}
    ]"#;
    let mut journal = journal_on(
        MemoryStorage::new()
            .with_entry(schemas::BEANS_COLLECTION, beans)
            .with_entry(schemas::BREW_RECORDS_COLLECTION, records),
    );

    assert!(journal.load_warning().is_none());
    let view = journal.view();
    assert!(view.find_brew_record(&BrewId::new("orphan")).is_none());
    assert_eq!(view.brew_count_for_bean(&BeanId::new("gone")), 0);
    assert_eq!(view.brew_records().len(), 1);
    assert!(view.selection_labels().iter().all(|l| !l.label.starts_with("? - ?")));

    // The next unrelated mutation writes the cleaned record list back.
    let _ = journal.create_bean(ethiopia()).into_result().unwrap();
    let stored = journal
        .storage()
        .raw(schemas::BREW_RECORDS_COLLECTION)
        .unwrap();
    assert!(!stored.contains("orphan"));
    assert!(stored.contains("kept"));
}
