use brewlog::core::compare::{compare, difference_summary};
use brewlog::core::error::BrewlogError;
use brewlog::core::ids::SequentialIds;
use brewlog::core::journal::Journal;
use brewlog::core::model::{
    BeanDraft, BeanId, BrewId, BrewRecord, BrewRecordDraft, FlavorAttribute, FlavorProfile,
};
use brewlog::core::query::JournalView;
use brewlog::core::schemas;
use brewlog::core::storage::MemoryStorage;
use brewlog::core::time::FixedClock;
use chrono::{DateTime, Duration, NaiveDate, Utc};

struct Fixture {
    journal: Journal<MemoryStorage>,
    ethiopia: BeanId,
    colombia: BeanId,
}

fn fixture() -> Fixture {
    let start = DateTime::parse_from_rfc3339("2024-01-10T08:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    let mut journal = Journal::with_parts(
        MemoryStorage::new(),
        Box::new(SequentialIds::new("c")),
        Box::new(FixedClock::stepping(start, Duration::hours(1))),
    );
    let roast = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    let ethiopia = journal
        .create_bean(BeanDraft::new("Ethiopia", "Yirgacheffe Coop", "Washed", roast))
        .into_value()
        .id;
    let colombia = journal
        .create_bean(BeanDraft::new("Colombia", "La Palma", "Honey", roast))
        .into_value()
        .id;
    Fixture {
        journal,
        ethiopia,
        colombia,
    }
}

fn draft(dripper: &str, grinder: &str, temp: f64, scores: [f64; 5]) -> BrewRecordDraft {
    let [acidity, sweetness, body, aroma, aftertaste] = scores;
    BrewRecordDraft {
        dripper: dripper.to_string(),
        grinder: grinder.to_string(),
        grind_setting: "medium-fine".to_string(),
        water_temp: temp,
        brew_time: "2:30".to_string(),
        flavor_profile: FlavorProfile::new(acidity, sweetness, body, aroma, aftertaste).unwrap(),
        notes: String::new(),
    }
}

fn add(journal: &mut Journal<MemoryStorage>, bean: &BeanId, draft: BrewRecordDraft) -> BrewRecord {
    journal
        .create_brew_record(bean, draft)
        .unwrap()
        .into_result()
        .unwrap()
}

#[test]
fn same_bean_different_temperature() {
    let Fixture {
        mut journal,
        ethiopia,
        ..
    } = fixture();
    let a = add(&mut journal, &ethiopia, draft("V60", "C40", 90.0, [4.0, 3.0, 2.0, 4.0, 3.0]));
    let b = add(&mut journal, &ethiopia, draft("V60", "C40", 94.0, [3.0, 4.0, 3.0, 4.0, 4.0]));

    let cmp = compare(&journal.view(), &a.id, &b.id).unwrap();
    assert_eq!(cmp.diff.water_temp.delta, 4.0);
    assert!(!cmp.diff.water_temp.identical);
    assert!(cmp.diff.same_dripper);
    assert!(cmp.diff.same_grinder);
    assert!(cmp.diff.same_bean);

    let acidity = cmp
        .flavor
        .iter()
        .find(|pair| pair.attribute == FlavorAttribute::Acidity)
        .unwrap();
    assert_eq!((acidity.first, acidity.second), (4.0, 3.0));
    assert!(cmp.flavor.iter().all(|pair| pair.full_mark == 5.0));
}

#[test]
fn flavor_pairs_follow_radar_axis_order() {
    let Fixture {
        mut journal,
        ethiopia,
        colombia,
    } = fixture();
    let a = add(&mut journal, &ethiopia, draft("V60", "C40", 92.0, [1.0, 2.0, 3.0, 4.0, 5.0]));
    let b = add(&mut journal, &colombia, draft("V60", "C40", 92.0, [5.0, 4.0, 3.0, 2.0, 1.0]));

    let cmp = compare(&journal.view(), &a.id, &b.id).unwrap();
    let attributes: Vec<_> = cmp.flavor.iter().map(|pair| pair.attribute).collect();
    assert_eq!(attributes, FlavorAttribute::ALL.to_vec());
    let firsts: Vec<f64> = cmp.flavor.iter().map(|pair| pair.first).collect();
    assert_eq!(firsts, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    assert!(cmp.diff.water_temp.identical);
    assert!(!cmp.diff.same_bean);
    assert_eq!(cmp.first.origin, "Ethiopia");
    assert_eq!(cmp.second.farm, "La Palma");
}

#[test]
fn comparison_is_symmetric() {
    let Fixture {
        mut journal,
        ethiopia,
        colombia,
    } = fixture();
    let a = add(&mut journal, &ethiopia, draft("V60", "C40", 91.5, [4.0, 3.0, 2.0, 4.0, 3.0]));
    let b = add(&mut journal, &colombia, draft("Kalita", "Ode", 88.0, [2.5, 4.0, 3.5, 3.0, 4.0]));

    let view = journal.view();
    let ab = compare(&view, &a.id, &b.id).unwrap();
    let ba = compare(&view, &b.id, &a.id).unwrap();
    assert_eq!(ab.diff, ba.diff);
    for (x, y) in ab.flavor.iter().zip(ba.flavor.iter()) {
        assert_eq!(x.attribute, y.attribute);
        assert_eq!((x.first, x.second), (y.second, y.first));
    }
    assert!(!ab.diff.same_dripper);
    assert!(!ab.diff.same_grinder);
    assert_eq!(ab.diff.water_temp.delta, 3.5);
}

#[test]
fn comparison_is_deterministic() {
    let Fixture {
        mut journal,
        ethiopia,
        ..
    } = fixture();
    let a = add(&mut journal, &ethiopia, draft("V60", "C40", 90.0, [4.0, 3.0, 2.0, 4.0, 3.0]));
    let b = add(&mut journal, &ethiopia, draft("V60", "C40", 93.0, [4.0, 3.0, 2.0, 4.0, 3.0]));

    let view = journal.view();
    assert_eq!(
        compare(&view, &a.id, &b.id).unwrap(),
        compare(&view, &a.id, &b.id).unwrap()
    );
    assert_eq!(difference_summary(&a, &b), difference_summary(&a, &b));
}

#[test]
fn unknown_or_repeated_selection_is_rejected() {
    let Fixture {
        mut journal,
        ethiopia,
        ..
    } = fixture();
    let a = add(&mut journal, &ethiopia, draft("V60", "C40", 90.0, [4.0, 3.0, 2.0, 4.0, 3.0]));

    let view = journal.view();
    let missing = BrewId::new("nonexistent");
    assert!(matches!(
        compare(&view, &a.id, &missing),
        Err(BrewlogError::InvalidSelection(_))
    ));
    assert!(matches!(
        compare(&view, &missing, &a.id),
        Err(BrewlogError::InvalidSelection(_))
    ));
    assert!(matches!(
        compare(&view, &a.id, &a.id),
        Err(BrewlogError::InvalidSelection(_))
    ));
}

#[test]
fn out_of_range_stored_score_is_an_inconsistency() {
    let beans = r#"[{"id":"b1","origin":"Kenya","farm":"Gatomboya","process":"Washed","roastDate":"2024-02-01","createdAt":"2024-02-02T10:00:00.000Z"}]"#;
    let records = r#"[
      {"id":"r1","coffeeBeanId":"b1","brewDate":"2024-02-03T08:00:00.000Z","dripper":"V60","grinder":"C40",
       "grindSetting":"","waterTemp":92,"brewTime":"","flavorProfile":{"acidity":7,"sweetness":3,"body":2,"aroma":4,"aftertaste":3}},
      {"id":"r2","coffeeBeanId":"b1","brewDate":"2024-02-04T08:00:00.000Z","dripper":"V60","grinder":"C40",
       "grindSetting":"","waterTemp":92,"brewTime":"","flavorProfile":{"acidity":3,"sweetness":3,"body":2,"aroma":4,"aftertaste":3}}
    ]"#;
    let journal = Journal::open(
        MemoryStorage::new()
            .with_entry(schemas::BEANS_COLLECTION, beans)
            .with_entry(schemas::BREW_RECORDS_COLLECTION, records),
    );
    assert!(journal.load_warning().is_none());

    let err = compare(&journal.view(), &BrewId::new("r1"), &BrewId::new("r2")).unwrap_err();
    assert!(matches!(err, BrewlogError::Inconsistency(_)));
}

#[test]
fn comparison_over_a_bare_view() {
    let view = JournalView::new(&[], &[]);
    assert!(!view.can_compare());
    assert!(matches!(
        compare(&view, &BrewId::new("a"), &BrewId::new("b")),
        Err(BrewlogError::InvalidSelection(_))
    ));
}
