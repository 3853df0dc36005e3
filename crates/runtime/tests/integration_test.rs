use std::sync::Arc;
use std::time::Duration;

use fray_content::ContentFactory;
use fray_core::content::EffectApplication;
use fray_core::{
    CreatureRecord, DamageGroup, DamageMethod, DamageType, FightError, FightOutcome, StatKind,
};
use fray_runtime::{
    Collection, ContentSnapshot, FightProgress, InMemoryStore, Runtime, RuntimeConfig,
    RuntimeError, Store,
};
use serde_json::json;

fn bundled_config() -> RuntimeConfig {
    RuntimeConfig {
        data_dir: Some(ContentFactory::bundled().data_dir().to_path_buf()),
        rng_seed: Some(7),
        ..RuntimeConfig::default()
    }
}

fn bundled_snapshot() -> ContentSnapshot {
    let factory = ContentFactory::bundled();
    ContentSnapshot::new(
        factory.load_registry().expect("bundled content"),
        factory.load_config().expect("bundled config"),
    )
}

fn vanguard(id: &str) -> CreatureRecord {
    CreatureRecord::new(id, id)
        .with_species("human")
        .with_class("vanguard")
}

#[tokio::test]
async fn creatures_persist_through_the_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = RuntimeConfig {
        store_dir: Some(dir.path().to_path_buf()),
        ..bundled_config()
    };

    {
        let runtime = Runtime::builder().config(config.clone()).build().await.unwrap();
        let handle = runtime.handle();

        let created = handle.create_creature(false, vanguard("ada")).await.unwrap();
        assert!(created.vitals.health > 0.0);

        let armor_before = handle.creature("ada").await.unwrap().stat(StatKind::Armor);
        handle.give_item(true, "ada", "plated_vest").await.unwrap();
        handle.equip("ada", "plated_vest").await.unwrap();

        let ada = handle.creature("ada").await.unwrap();
        assert_eq!(ada.stat(StatKind::Armor), armor_before + 18.0);
        assert!(ada.record().inventory.backpack.is_empty());
    }

    let runtime = Runtime::builder().config(config).build().await.unwrap();
    let ada = runtime.handle().creature("ada").await.unwrap();
    assert_eq!(ada.record().inventory.equipped, vec!["plated_vest"]);
}

#[tokio::test]
async fn validation_failures_leave_documents_untouched() {
    let runtime = Runtime::builder().config(bundled_config()).build().await.unwrap();
    let handle = runtime.handle();
    handle.create_creature(false, vanguard("ada")).await.unwrap();
    let before = handle.store().fetch(Collection::Creatures, "ada").await.unwrap();

    let denied = handle
        .damage(false, "ada", DamageGroup::single(DamageType::True, 10.0))
        .await;
    assert!(matches!(denied, Err(RuntimeError::PermissionDenied { .. })));

    let unknown = handle.equip("ada", "plated_vest").await;
    assert!(matches!(unknown, Err(RuntimeError::Inventory(_))));

    let missing = handle
        .damage(true, "ghost", DamageGroup::single(DamageType::True, 10.0))
        .await;
    assert!(matches!(
        missing,
        Err(RuntimeError::NotFound { collection: "creatures", .. })
    ));

    let npc = handle.create_creature(false, vanguard("grunt").npc()).await;
    assert!(matches!(npc, Err(RuntimeError::PermissionDenied { .. })));

    let after = handle.store().fetch(Collection::Creatures, "ada").await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn bulk_tick_collects_failures_and_keeps_going() {
    let store = Arc::new(InMemoryStore::new());
    let runtime = Runtime::builder()
        .config(bundled_config())
        .store(store.clone())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    for id in ["ada", "bex"] {
        handle.create_creature(false, vanguard(id)).await.unwrap();
    }
    handle
        .apply_effect(true, "ada", EffectApplication::new("bleeding", 5, 2))
        .await
        .unwrap();
    store
        .put(Collection::Creatures, json!({"id": "broken", "name": 5}))
        .await
        .unwrap();
    let health = handle.creature("ada").await.unwrap().vitals().health;

    let report = handle.tick_all(true).await.unwrap();
    assert_eq!(report.ticked, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].id.as_deref(), Some("broken"));

    let ada = handle.creature("ada").await.unwrap();
    assert_eq!(ada.vitals().health, health - 5.0);
    assert_eq!(ada.active_effects()[0].ticks, 1);

    assert!(matches!(
        handle.tick_all(false).await,
        Err(RuntimeError::PermissionDenied { .. })
    ));
}

#[tokio::test]
async fn fight_lifecycle() {
    let runtime = Runtime::builder().config(bundled_config()).build().await.unwrap();
    let handle = runtime.handle();
    for id in ["ada", "bex"] {
        handle.create_creature(false, vanguard(id)).await.unwrap();
    }

    let parties = vec![vec!["ada".to_owned()], vec!["bex".to_owned(), "ghost".to_owned()]];
    let fight = handle.start_fight(true, "f1", parties).await.unwrap();
    assert_eq!(fight.round, 1);
    assert_eq!(fight.queue.len(), 2);

    let again = handle.start_fight(true, "f1", Vec::new()).await;
    assert!(matches!(again, Err(RuntimeError::AlreadyExists { .. })));

    let FightProgress::Turn(turn) = handle.next_turn("f1").await.unwrap() else {
        panic!("fight should continue");
    };
    let actor = turn.actor.clone();
    let other = if actor == "ada" { "bex" } else { "ada" };

    let wrong = handle.attack("f1", other, &actor, DamageMethod::Melee).await;
    assert!(matches!(
        wrong,
        Err(RuntimeError::Fight(FightError::NotCurrentActor(_)))
    ));

    let report = handle
        .attack("f1", &actor, other, DamageMethod::Melee)
        .await
        .unwrap();
    assert_eq!(report.caster, actor);
    assert_eq!(report.target, other);
    // six action points on the first turn, basic attacks cost two
    let attacker = handle.creature(&actor).await.unwrap();
    assert_eq!(attacker.vitals().action_points, 4.0);

    let outcome = handle.end_fight(true, "f1").await.unwrap();
    assert_eq!(outcome, FightOutcome::Continue);
    assert!(matches!(
        handle.fight("f1").await,
        Err(RuntimeError::NotFound { collection: "fights", .. })
    ));
    assert_eq!(handle.creature(&actor).await.unwrap().vitals().intensity, 0);
}

#[tokio::test]
async fn fights_conclude_when_one_party_is_down() {
    let runtime = Runtime::builder().config(bundled_config()).build().await.unwrap();
    let handle = runtime.handle();
    for id in ["ada", "bex"] {
        handle.create_creature(false, vanguard(id)).await.unwrap();
    }
    handle
        .start_fight(true, "f1", vec![vec!["ada".into()], vec!["bex".into()]])
        .await
        .unwrap();

    handle
        .damage(true, "bex", DamageGroup::single(DamageType::True, 10_000.0))
        .await
        .unwrap();

    let progress = handle.next_turn("f1").await.unwrap();
    assert_eq!(progress, FightProgress::Concluded(FightOutcome::Winner(0)));
    assert!(handle.fight("f1").await.is_err());
}

#[tokio::test(start_paused = true)]
async fn ticker_runs_on_its_interval_until_stopped() {
    let mut runtime = Runtime::builder()
        .config(RuntimeConfig {
            tick_interval: Some(Duration::from_secs(1)),
            rng_seed: Some(1),
            ..RuntimeConfig::default()
        })
        .content(bundled_snapshot())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    handle.create_creature(false, vanguard("ada")).await.unwrap();
    handle
        .apply_effect(true, "ada", EffectApplication::new("bleeding", 1, 10))
        .await
        .unwrap();
    let health = handle.creature("ada").await.unwrap().vitals().health;
    assert!(runtime.ticker_running());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(
        handle.creature("ada").await.unwrap().vitals().health,
        health - 1.0
    );

    runtime.stop_ticker();
    assert!(!runtime.ticker_running());
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(
        handle.creature("ada").await.unwrap().vitals().health,
        health - 1.0
    );

    runtime.shutdown().await.unwrap();
}
