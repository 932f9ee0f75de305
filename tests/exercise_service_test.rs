//! Tests for ExerciseService against a real SQLite store

use exercise_tracker::error::AppError;
use exercise_tracker::exercise::{AddExerciseInput, ExerciseDb, ExerciseService, LogQuery};
use std::sync::Arc;
use tempfile::TempDir;

async fn create_test_service() -> (ExerciseService, TempDir) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("service.db");
    let db = ExerciseDb::connect(path.to_str().unwrap()).await.unwrap();
    (ExerciseService::new(db), dir)
}

fn exercise(user_id: &str, description: &str, date: &str) -> AddExerciseInput {
    AddExerciseInput {
        user_id: Some(user_id.to_string()),
        description: Some(description.to_string()),
        duration: Some("15".to_string()),
        date: Some(date.to_string()),
    }
}

fn log_query(user_id: &str) -> LogQuery {
    LogQuery {
        user_id: Some(user_id.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_created_user_appears_in_list() {
    let (service, _dir) = create_test_service().await;

    let user = service.create_user(Some("alice")).await.unwrap();
    let users = service.list_users().await.unwrap();
    assert_eq!(users, vec![user]);
}

#[tokio::test]
async fn test_duplicate_username_conflicts() {
    let (service, _dir) = create_test_service().await;
    let original = service.create_user(Some("alice")).await.unwrap();

    match service.create_user(Some("alice")).await {
        Err(AppError::Conflict(msg)) => assert_eq!(msg, "Username already taken"),
        other => panic!("Expected Conflict error, got: {:?}", other),
    }
    assert_eq!(service.list_users().await.unwrap(), vec![original]);
}

#[tokio::test]
async fn test_blank_username_is_rejected() {
    let (service, _dir) = create_test_service().await;

    for username in [None, Some(""), Some("   ")] {
        assert!(matches!(
            service.create_user(username).await,
            Err(AppError::Validation(_))
        ));
    }
    assert!(service.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_exercise_to_missing_user_changes_nothing() {
    let (service, _dir) = create_test_service().await;
    let user = service.create_user(Some("alice")).await.unwrap();

    let result = service
        .add_exercise(exercise("not-a-user", "run", "2020-01-15"))
        .await;
    match result {
        Err(AppError::NotFound(msg)) => assert_eq!(msg, "Invalid UserId"),
        other => panic!("Expected NotFound error, got: {:?}", other),
    }

    let log = service.get_log(log_query(&user.id)).await.unwrap();
    assert_eq!(log.count, 0);
}

#[tokio::test]
async fn test_add_exercise_returns_rendered_record() {
    let (service, _dir) = create_test_service().await;
    let user = service.create_user(Some("alice")).await.unwrap();

    let added = service
        .add_exercise(AddExerciseInput {
            duration: Some("30".to_string()),
            ..exercise(&user.id, "run", "2020-01-15")
        })
        .await
        .unwrap();

    assert_eq!(added.user, user);
    assert_eq!(added.exercise.duration, 30);
    let json = serde_json::to_value(&added).unwrap();
    assert_eq!(json["date"], "Wed Jan 15");
}

#[tokio::test]
async fn test_log_boundaries_are_inclusive() {
    let (service, _dir) = create_test_service().await;
    let user = service.create_user(Some("alice")).await.unwrap();
    for (name, date) in [
        ("before", "2020-01-09"),
        ("first", "2020-01-10"),
        ("inside", "2020-01-15"),
        ("last", "2020-01-20"),
        ("after", "2020-01-21"),
    ] {
        service
            .add_exercise(exercise(&user.id, name, date))
            .await
            .unwrap();
    }

    let log = service
        .get_log(LogQuery {
            from: Some("2020-01-10".to_string()),
            to: Some("2020-01-20".to_string()),
            ..log_query(&user.id)
        })
        .await
        .unwrap();

    let names: Vec<_> = log.log.iter().map(|e| e.description.as_str()).collect();
    assert_eq!(names, vec!["first", "inside", "last"]);
    assert_eq!(log.count, 3);
}

#[tokio::test]
async fn test_log_limit_keeps_first_entries() {
    let (service, _dir) = create_test_service().await;
    let user = service.create_user(Some("alice")).await.unwrap();
    for day in 1..=5 {
        service
            .add_exercise(exercise(&user.id, &format!("e{}", day), &format!("2020-05-0{}", day)))
            .await
            .unwrap();
    }

    let log = service
        .get_log(LogQuery {
            limit: Some("2".to_string()),
            ..log_query(&user.id)
        })
        .await
        .unwrap();
    let names: Vec<_> = log.log.iter().map(|e| e.description.as_str()).collect();
    assert_eq!(names, vec!["e1", "e2"]);
    assert_eq!(log.count, 2);

    let log = service
        .get_log(LogQuery {
            limit: Some("50".to_string()),
            ..log_query(&user.id)
        })
        .await
        .unwrap();
    assert_eq!(log.count, 5);
}

#[tokio::test]
async fn test_malformed_from_returns_no_data() {
    let (service, _dir) = create_test_service().await;
    let user = service.create_user(Some("alice")).await.unwrap();

    let result = service
        .get_log(LogQuery {
            from: Some("2020-1-1".to_string()),
            ..log_query(&user.id)
        })
        .await;
    match result {
        Err(AppError::Validation(msg)) => {
            assert_eq!(msg, "Invalid from value. Please use yyyy-mm-dd")
        }
        other => panic!("Expected Validation error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_concurrent_appends_are_not_lost() {
    let (service, _dir) = create_test_service().await;
    let service = Arc::new(service);
    let user = service.create_user(Some("alice")).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..20 {
        let service = Arc::clone(&service);
        let user_id = user.id.clone();
        handles.push(tokio::spawn(async move {
            service
                .add_exercise(exercise(&user_id, &format!("set{}", i), "2020-01-01"))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let log = service.get_log(log_query(&user.id)).await.unwrap();
    assert_eq!(log.count, 20);
}
