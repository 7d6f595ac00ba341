use rstest::rstest;

use super::*;

fn animated() -> BinderConfig {
    BinderConfig::default()
}
fn not_animated() -> BinderConfig {
    BinderConfig {
        animate_changes: false,
        ..BinderConfig::default()
    }
}

#[rstest]
fn first_value_always_reloads(#[values(animated(), not_animated())] config: BinderConfig) {
    assert_eq!(plan_update(None, &[1, 2], &config), ListUpdate::Reload);
    assert_eq!(plan_update::<i32>(None, &[], &config), ListUpdate::Reload);
}

#[rstest]
fn unchanged_is_no_update(#[values(animated(), not_animated())] config: BinderConfig) {
    assert_eq!(
        plan_update(Some(&[1, 2][..]), &[1, 2], &config),
        ListUpdate::None
    );
}

#[rstest]
#[case::insert(&[1, 2], &[1, 2, 3])]
#[case::delete(&[1, 2, 3], &[1, 3])]
#[case::mixed(&[1, 2, 3], &[2, 4])]
#[case::reorder(&[1, 2], &[2, 1])]
fn not_animated_reloads(#[case] old: &[i32], #[case] new: &[i32]) {
    assert_eq!(
        plan_update(Some(old), new, &not_animated()),
        ListUpdate::Reload
    );
}

#[test]
fn reorder_reloads() {
    assert_eq!(
        plan_update(Some(&[1, 2, 3][..]), &[3, 2, 1], &animated()),
        ListUpdate::Reload
    );
}

#[test]
fn mixed_is_one_batch() {
    let config = BinderConfig {
        animate_changes: true,
        insert_animation: RowAnimation::Top,
        delete_animation: RowAnimation::Fade,
    };
    let update = plan_update(Some(&["a", "b", "c"][..]), &["b", "d"], &config);
    assert_eq!(
        update,
        ListUpdate::Batch(RowBatch {
            deletions: vec![0, 2],
            delete_animation: RowAnimation::Fade,
            insertions: vec![1],
            insert_animation: RowAnimation::Top,
            rows_before: 3,
            rows_after: 2,
        })
    );
    let ops: Vec<String> = update.operations().map(|op| op.to_string()).collect();
    assert_eq!(ops, ["delete 0 (fade)", "delete 2 (fade)", "insert 1 (top)"]);
}

#[test]
fn operations_of_reload_and_none() {
    assert_eq!(
        ListUpdate::Reload.operations().collect::<Vec<_>>(),
        [RowOp::Reload]
    );
    assert_eq!(ListUpdate::None.operations().count(), 0);
}

#[test]
fn planned_batches_are_consistent() {
    let cases: [(&[i32], &[i32]); 4] = [
        (&[1, 2], &[1, 2, 3]),
        (&[1, 2, 3], &[1, 3]),
        (&[1, 2, 3], &[2, 4]),
        (&[], &[5, 6]),
    ];
    for (old, new) in cases {
        match plan_update(Some(old), new, &animated()) {
            ListUpdate::Batch(batch) => assert!(batch.is_consistent(), "{old:?} -> {new:?}"),
            update => panic!("expected batch for {old:?} -> {new:?}, got {update:?}"),
        }
    }
}

#[test]
fn inconsistent_batch_is_detected() {
    let batch = RowBatch {
        deletions: vec![0],
        delete_animation: RowAnimation::Automatic,
        insertions: vec![],
        insert_animation: RowAnimation::Automatic,
        rows_before: 2,
        rows_after: 2,
    };
    assert!(!batch.is_consistent());
}

#[test]
fn row_animation_parses_snake_case() {
    assert_eq!("fade".parse::<RowAnimation>().ok(), Some(RowAnimation::Fade));
    assert_eq!(RowAnimation::Automatic.to_string(), "automatic");
    assert!("Fade".parse::<RowAnimation>().is_err());
}
