// Behaviour of the SQLite backend through the RosterStore trait.

use chrono::NaiveDate;
use roster_core::{DateRange, MonthRef, NewTeam, RosterEntry, TeamUpdate};
use roster_store::{RosterStore, SqliteStore, StoreError};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn feb() -> MonthRef {
    MonthRef::new(2026, 2).unwrap()
}

async fn seeded() -> SqliteStore {
    let store = SqliteStore::in_memory().unwrap();
    for entry in [
        RosterEntry::new(d(2026, 2, 2), "Manoj", "09:00 - 18:00", "Ops"),
        RosterEntry::new(d(2026, 2, 1), "Manoj", "WO", "Ops"),
        RosterEntry::new(d(2026, 2, 1), "Ayush S", "18:00 - 03:00", "Ops"),
        RosterEntry::new(d(2026, 2, 1), "Kiran", "PL", "Billing"),
        RosterEntry::new(d(2026, 3, 1), "Manoj", "PL", "Ops"),
    ] {
        store.upsert_entry(&entry).await.unwrap();
    }
    store
}

#[tokio::test]
async fn fetch_roster_orders_by_date_then_name() {
    let store = seeded().await;
    let rows = store.fetch_roster(feb(), "Ops").await.unwrap();
    let keys: Vec<_> = rows.iter().map(|e| (e.date.to_string(), e.name.as_str())).collect();
    assert_eq!(
        keys,
        vec![
            ("2026-02-01".to_string(), "Ayush S"),
            ("2026-02-01".to_string(), "Manoj"),
            ("2026-02-02".to_string(), "Manoj"),
        ]
    );
}

#[tokio::test]
async fn upsert_replaces_existing_triple() {
    let store = seeded().await;
    store
        .upsert_entry(&RosterEntry::new(d(2026, 2, 1), "Manoj", "SL", "Ops"))
        .await
        .unwrap();

    let rows = store.fetch_roster(feb(), "Ops").await.unwrap();
    let manoj: Vec<_> = rows
        .iter()
        .filter(|e| e.name == "Manoj" && e.date == d(2026, 2, 1))
        .collect();
    assert_eq!(manoj.len(), 1);
    assert_eq!(manoj[0].status, "SL");
}

#[tokio::test]
async fn same_agent_may_appear_in_two_teams_on_one_day() {
    let store = seeded().await;
    store
        .upsert_entry(&RosterEntry::new(d(2026, 2, 1), "Manoj", "PL", "Billing"))
        .await
        .unwrap();
    let all = store.fetch_all_teams_roster(feb()).await.unwrap();
    assert_eq!(all["Billing"].len(), 2);
    assert_eq!(all["Ops"].len(), 3);
}

#[tokio::test]
async fn all_teams_grouped_by_team_name() {
    let store = seeded().await;
    let all = store.fetch_all_teams_roster(feb()).await.unwrap();
    assert_eq!(all.keys().collect::<Vec<_>>(), vec!["Billing", "Ops"]);
    assert!(all.values().flatten().all(|e| feb().contains(e.date)));
}

#[tokio::test]
async fn exists_and_delete_are_scoped_to_month_and_team() {
    let store = seeded().await;
    assert!(store.roster_exists(feb(), "Ops").await.unwrap());
    assert!(!store
        .roster_exists(MonthRef::new(2026, 4).unwrap(), "Ops")
        .await
        .unwrap());

    let removed = store.delete_roster(feb(), "Ops").await.unwrap();
    assert_eq!(removed, 3);
    assert!(!store.roster_exists(feb(), "Ops").await.unwrap());
    // March and other teams untouched.
    assert!(store.roster_exists(feb(), "Billing").await.unwrap());
    assert!(store
        .roster_exists(MonthRef::new(2026, 3).unwrap(), "Ops")
        .await
        .unwrap());
}

#[tokio::test]
async fn fetch_range_filters_strictly() {
    let store = seeded().await;
    let range = DateRange::new(d(2026, 2, 2), d(2026, 3, 1)).unwrap();

    let ops = store.fetch_range(&range, Some("Ops")).await.unwrap();
    assert_eq!(ops.len(), 2);
    assert!(ops.iter().all(|e| range.contains(e.date)));

    let everyone = store.fetch_range(&range, None).await.unwrap();
    assert_eq!(everyone.len(), 2);
}

#[tokio::test]
async fn team_crud_round_trip() {
    let store = SqliteStore::in_memory().unwrap();
    let created = store
        .create_team(&NewTeam {
            name: "Ops".into(),
            members: vec!["Manoj".into(), " Ayush S ".into(), "".into()],
            custom_prompt: Some("".into()),
        })
        .await
        .unwrap();
    assert_eq!(created.members, vec!["Manoj", "Ayush S"]);
    assert!(created.custom_prompt.is_none());

    store
        .create_team(&NewTeam {
            name: "Billing".into(),
            members: vec!["Kiran".into()],
            custom_prompt: None,
        })
        .await
        .unwrap();

    let names: Vec<_> = store
        .list_teams()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["Billing", "Ops"]);

    let updated = store
        .update_team(
            &created.id,
            &TeamUpdate {
                custom_prompt: Some(Some("Roster for {{TEAM_NAME}}".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Ops");
    assert_eq!(updated.custom_prompt.as_deref(), Some("Roster for {{TEAM_NAME}}"));

    let by_name = store.get_team_by_name("Ops").await.unwrap().unwrap();
    assert_eq!(by_name.id, created.id);
    assert_eq!(by_name.members, vec!["Manoj", "Ayush S"]);

    store.delete_team(&created.id).await.unwrap();
    assert!(store.get_team(&created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn deleting_team_keeps_roster_entries() {
    let store = seeded().await;
    let team = store
        .create_team(&NewTeam {
            name: "Ops".into(),
            members: vec!["Manoj".into()],
            custom_prompt: None,
        })
        .await
        .unwrap();
    store.delete_team(&team.id).await.unwrap();
    assert!(store.roster_exists(feb(), "Ops").await.unwrap());
}

#[tokio::test]
async fn duplicate_team_name_is_a_conflict() {
    let store = SqliteStore::in_memory().unwrap();
    let team = NewTeam {
        name: "Ops".into(),
        members: vec!["A".into()],
        custom_prompt: None,
    };
    store.create_team(&team).await.unwrap();
    let err = store.create_team(&team).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
}

#[tokio::test]
async fn missing_team_errors() {
    let store = SqliteStore::in_memory().unwrap();
    assert!(matches!(
        store.delete_team("nope").await.unwrap_err(),
        StoreError::TeamNotFound { .. }
    ));
    assert!(matches!(
        store
            .update_team("nope", &TeamUpdate::default())
            .await
            .unwrap_err(),
        StoreError::TeamNotFound { .. }
    ));
}

#[tokio::test]
async fn file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.db");
    let path = path.to_str().unwrap();

    {
        let store = SqliteStore::open(path).unwrap();
        store
            .upsert_entry(&RosterEntry::new(d(2026, 2, 5), "Kiran", "WFH", "Billing"))
            .await
            .unwrap();
    }

    let reopened = SqliteStore::open(path).unwrap();
    let rows = reopened.fetch_roster(feb(), "Billing").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, "WFH");
}

