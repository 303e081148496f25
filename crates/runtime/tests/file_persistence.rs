//! Sessions backed by files survive a restart.

use std::fs;

use ledger_content::ContentFactory;
use ledger_core::{FixedConfirmer, Standing, UsageEvent};
use ledger_runtime::{Acquisition, ActorId, FileSheetRepository, Session};

const CORNELIUS: ActorId = ActorId(3);
const AERO_CLUB: ActorId = ActorId(30);

fn write_content(dir: &std::path::Path) {
    fs::write(dir.join("config.toml"), "max_usage_cap = 4\n").unwrap();
    fs::write(
        dir.join("scene_cues.ron"),
        r#"
        (
            scene_cues: [
                (
                    name: "Challenge to a Duel",
                    max_usage: 4,
                    social_standing: 1,
                    influence: "RollTable.duels",
                ),
            ],
        )
        "#,
    )
    .unwrap();
    fs::write(
        dir.join("club_upgrades.ron"),
        r#"(upgrades: [(name: "Hangar", min_renown: 1, readies: 3, has_usage: true, max_usage: 2)])"#,
    )
    .unwrap();
}

fn open(content: &std::path::Path, saves: &std::path::Path) -> Session {
    Session::builder()
        .content(&ContentFactory::new(content))
        .unwrap()
        .repository(FileSheetRepository::new(saves).unwrap())
        .confirmer(FixedConfirmer(true))
        .build()
        .unwrap()
}

#[test]
fn state_is_reloaded_from_disk() {
    let content = tempfile::tempdir().unwrap();
    let saves = tempfile::tempdir().unwrap();
    write_content(content.path());

    let (duel, hangar) = {
        let mut session = open(content.path(), saves.path());
        assert_eq!(session.config().max_usage_cap, 4);

        session.create_character(CORNELIUS, "Cornelius").unwrap();
        session.create_club(AERO_CLUB, "The Aero Club", 1, 7).unwrap();

        let duel = session
            .add_catalog_scene_cue(CORNELIUS, "Challenge to a Duel")
            .unwrap();
        for _ in 0..3 {
            session
                .fire_scene_cue(CORNELIUS, duel, UsageEvent::Grant)
                .unwrap();
        }
        session
            .fire_scene_cue(CORNELIUS, duel, UsageEvent::Consume)
            .unwrap();

        let Acquisition::Acquired { item, .. } = session
            .acquire_catalog_upgrade(AERO_CLUB, "Hangar")
            .unwrap()
        else {
            panic!("expected the hangar to be acquired");
        };
        (duel, item)
    };

    let session = open(content.path(), saves.path());

    let character = session.character(CORNELIUS).unwrap();
    assert_eq!(character.sheet.social_standing().value(), 1);
    assert_eq!(character.sheet.social_standing().standing(), Standing::Scandal);

    let rows = session.scene_cue_rows(CORNELIUS).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, duel);
    let ledger = rows[0].cue.ledger();
    assert_eq!(
        (ledger.max_usage(), ledger.available_usage(), ledger.used()),
        (4, 3, 1)
    );

    let club = session.club(AERO_CLUB).unwrap();
    assert_eq!(club.funds, 4);
    assert_eq!(club.upgrades, vec![hangar]);
    assert_ne!(duel, hangar);
}

#[test]
fn new_items_do_not_overwrite_saved_ones() {
    let content = tempfile::tempdir().unwrap();
    let saves = tempfile::tempdir().unwrap();
    write_content(content.path());

    let first = {
        let session = open(content.path(), saves.path());
        session.create_character(CORNELIUS, "Cornelius").unwrap();
        session
            .add_catalog_scene_cue(CORNELIUS, "Challenge to a Duel")
            .unwrap()
    };

    let session = open(content.path(), saves.path());
    let second = session
        .add_catalog_scene_cue(CORNELIUS, "Challenge to a Duel")
        .unwrap();
    assert_ne!(first, second);
    assert_eq!(session.scene_cue_rows(CORNELIUS).unwrap().len(), 2);
}

#[test]
fn broken_content_fails_the_build() {
    let content = tempfile::tempdir().unwrap();
    fs::write(content.path().join("scene_cues.ron"), "(scene_cues: [").unwrap();

    let result = Session::builder().content(&ContentFactory::new(content.path()));
    assert!(result.is_err());
}
