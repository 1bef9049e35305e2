use fasttrack_core::model::{
    CvField, ProgressState, QuestionId, TaskCatalog, TaskId, WeekNumber, reference_checklist,
};
use fasttrack_core::time::{fixed_clock, fixed_now};
use services::{AppServices, PlannerError};
use storage::repository::{InMemoryRepository, KeyValueRepository, PROGRESS_KEY, Storage};

fn shared_storage() -> (InMemoryRepository, Storage) {
    let repo = InMemoryRepository::new();
    let storage = Storage {
        progress: std::sync::Arc::new(repo.clone()),
    };
    (repo, storage)
}

#[tokio::test]
async fn progress_survives_restart() {
    let (_repo, storage) = shared_storage();

    let mut planner = AppServices::with_storage(&storage, fixed_clock()).await;
    planner.toggle(&TaskId::new("w1t1")).await.unwrap();
    planner.toggle(&TaskId::new("c3")).await.unwrap();
    let before = planner.progress().clone();
    drop(planner);

    let restarted = AppServices::with_storage(&storage, fixed_clock()).await;
    assert_eq!(restarted.progress(), &before);
    assert_eq!(before.percent(), 7);
}

#[tokio::test]
async fn restart_recounts_percent_without_session_tasks() {
    let (_repo, storage) = shared_storage();

    let mut planner = AppServices::with_storage(&storage, fixed_clock()).await;
    planner.select_week(WeekNumber::new(9).unwrap());
    for title in ["mock interview", "pitch deck", "network call"] {
        let task = planner.add_task(title).unwrap();
        planner.toggle(task.id()).await.unwrap();
    }
    // 3 of 30 known ids
    assert_eq!(planner.progress().percent(), 10);
    drop(planner);

    let restarted = AppServices::with_storage(&storage, fixed_clock()).await;
    let known = restarted.catalog().completable_ids();
    let counted = restarted.progress().completed().intersection(&known).count();
    assert_eq!(counted, 0);
    assert_eq!(restarted.progress().completed().len(), 3);
    assert_eq!(restarted.progress().percent(), 0);
}

#[tokio::test]
async fn reset_then_restart_is_empty() {
    let (_repo, storage) = shared_storage();

    let mut planner = AppServices::with_storage(&storage, fixed_clock()).await;
    planner.toggle(&TaskId::new("c10")).await.unwrap();
    planner.reset_progress().await.unwrap();
    drop(planner);

    let restarted = AppServices::with_storage(&storage, fixed_clock()).await;
    assert_eq!(restarted.progress(), &ProgressState::empty());
}

#[tokio::test]
async fn corrupt_snapshot_starts_empty() {
    let (repo, storage) = shared_storage();
    repo.put(PROGRESS_KEY, "{\"completedTasks\": 12}").await.unwrap();

    let planner = AppServices::with_storage(&storage, fixed_clock()).await;
    assert_eq!(planner.progress(), &ProgressState::empty());
}

#[tokio::test]
async fn toggle_twice_restores_state() {
    let (_repo, storage) = shared_storage();
    let mut planner = AppServices::with_storage(&storage, fixed_clock()).await;
    planner.toggle(&TaskId::new("w4t2")).await.unwrap();
    let before = planner.progress().clone();

    planner.toggle(&TaskId::new("c6")).await.unwrap();
    planner.toggle(&TaskId::new("c6")).await.unwrap();

    assert_eq!(planner.progress(), &before);
}

#[tokio::test]
async fn added_task_counts_towards_percent() {
    let (_repo, storage) = shared_storage();
    let mut catalog = TaskCatalog::new(reference_checklist());
    catalog
        .add_task(WeekNumber::first(), "seed a", fixed_now())
        .unwrap();
    catalog
        .add_task(WeekNumber::first(), "seed b", fixed_now())
        .unwrap();
    let mut planner = AppServices::with_catalog(&storage, fixed_clock(), catalog).await;

    for id in ["c1", "c2", "c3"] {
        planner.toggle(&TaskId::new(id)).await.unwrap();
    }
    assert_eq!(planner.progress().percent(), 25);

    // 13 known ids after the add; 4/13 rounds to 31
    let task = planner.add_task("extra").unwrap();
    let state = planner.toggle(task.id()).await.unwrap();
    assert_eq!(state.percent(), 31);
}

#[tokio::test]
async fn blank_titles_do_not_change_the_week() {
    let (_repo, storage) = shared_storage();
    let mut planner = AppServices::with_storage(&storage, fixed_clock()).await;
    let week = planner.current_week();
    let before = planner.tasks_for_week(week).to_vec();

    assert!(matches!(planner.add_task(""), Err(PlannerError::Catalog(_))));
    assert!(matches!(planner.add_task("   "), Err(PlannerError::Catalog(_))));

    assert_eq!(planner.tasks_for_week(week), before.as_slice());
}

#[tokio::test]
async fn week_navigation_is_clamped() {
    let (_repo, storage) = shared_storage();
    let mut planner = AppServices::with_storage(&storage, fixed_clock()).await;

    assert_eq!(planner.prev_week().value(), 1);
    planner.select_week(WeekNumber::new(24).unwrap());
    assert_eq!(planner.next_week().value(), 24);
    assert!(planner.tasks_for_week(planner.current_week()).is_empty());
}

#[tokio::test]
async fn cv_copy_and_download_are_identical() {
    let (_repo, storage) = shared_storage();
    let mut planner = AppServices::with_storage(&storage, fixed_clock()).await;
    planner.set_cv_field(CvField::Name, "Jo Smith");
    planner.set_cv_field(CvField::Skills, "SQL, Power BI");

    let dir = tempfile::tempdir().unwrap();
    let path = planner.save_cv(dir.path()).unwrap();

    assert_eq!(std::fs::read_to_string(path).unwrap(), planner.cv_text());
    assert!(planner.cv_text().starts_with("Jo Smith\nFinTech Product Analyst\n"));
}

#[tokio::test]
async fn quiz_scores_on_submit() {
    let (_repo, storage) = shared_storage();
    let mut planner = AppServices::with_storage(&storage, fixed_clock()).await;
    assert_eq!(planner.quiz().score(), None);

    planner.answer_quiz(QuestionId::new(1), 2).unwrap();
    planner.answer_quiz(QuestionId::new(2), 0).unwrap();

    assert_eq!(planner.submit_quiz().to_string(), "2 / 2");
    assert!(matches!(
        planner.answer_quiz(QuestionId::new(2), 7),
        Err(PlannerError::Quiz(_))
    ));
}

#[tokio::test]
async fn export_includes_session_tasks_and_cv() {
    let (_repo, storage) = shared_storage();
    let mut planner = AppServices::with_storage(&storage, fixed_clock()).await;
    planner.select_week(WeekNumber::new(3).unwrap());
    let task = planner.add_task("Draft onboarding case study").unwrap();
    planner.toggle(task.id()).await.unwrap();
    planner.set_cv_field(CvField::Name, "Jo Smith");

    let dir = tempfile::tempdir().unwrap();
    let path = planner.write_export(dir.path()).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();

    let week3 = json["schedule"]["3"].as_array().unwrap();
    assert_eq!(week3.len(), 3);
    assert_eq!(week3[2]["title"], "Draft onboarding case study");
    assert_eq!(json["progress"]["completedTasks"][task.id().as_str()], true);
    assert_eq!(json["cvData"]["name"], "Jo Smith");
}
