//! End-to-end tests for the module progression engine and its wire
//! contract.

mod common;

use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use aula_core::modules::{
    CompletionRequirement, EventKind, ModuleItemResponse, ModuleResponse, ProgressState,
    ProgressTracker,
};

use common::{links, lms_fixture};

#[test]
fn lists_modules_with_the_expected_fields() {
    let fixture = lms_fixture();
    let responses: Vec<ModuleResponse> = fixture
        .course
        .modules()
        .iter()
        .map(ModuleResponse::new)
        .collect();
    let value = serde_json::to_value(&responses).unwrap();

    assert_eq!(
        value,
        json!([
            {
                "name": "module1",
                "unlock_at": null,
                "position": 1,
                "require_sequential_progress": false,
                "prerequisite_module_ids": [],
                "id": fixture.module1,
            },
            {
                "name": "do not open until christmas",
                "unlock_at": fixture.christmas,
                "position": 2,
                "require_sequential_progress": true,
                "prerequisite_module_ids": [fixture.module1],
                "id": fixture.module2,
            }
        ])
    );
}

#[test]
fn shows_a_single_module_without_user_state() {
    let fixture = lms_fixture();
    let module = fixture.course.module(fixture.module2).unwrap();
    let value = serde_json::to_value(ModuleResponse::new(module)).unwrap();

    assert_eq!(value["name"], json!("do not open until christmas"));
    assert_eq!(value["unlock_at"], serde_json::to_value(fixture.christmas).unwrap());
    // No learner in scope, so no state or completion stamp.
    assert!(value.get("state").is_none());
    assert!(value.get("completed_at").is_none());
}

#[test]
fn lists_module_items_with_links_and_requirements() {
    let fixture = lms_fixture();
    let links = links();
    let course_id = fixture.course.id;
    let module = fixture.course.module(fixture.module1).unwrap();
    let responses: Vec<ModuleItemResponse> = module
        .items
        .iter()
        .map(|item| ModuleItemResponse::new(course_id, item, &links))
        .collect();
    let value = serde_json::to_value(&responses).unwrap();

    assert_eq!(
        value,
        json!([
            {
                "type": "Assignment",
                "id": fixture.assignment_tag,
                "html_url": format!("http://www.example.com/courses/{course_id}/modules/items/{}", fixture.assignment_tag),
                "position": 1,
                "url": format!("http://www.example.com/api/v1/courses/{course_id}/assignments/{}", fixture.assignment_id),
                "title": "pls submit",
                "indent": 0,
                "completion_requirement": {"type": "must_submit"},
            },
            {
                "type": "Quiz",
                "id": fixture.quiz_tag,
                "html_url": format!("http://www.example.com/courses/{course_id}/modules/items/{}", fixture.quiz_tag),
                "position": 2,
                "title": "score 10",
                "indent": 0,
                "completion_requirement": {"type": "min_score", "min_score": 10.0},
            },
            {
                "type": "Discussion",
                "id": fixture.topic_tag,
                "html_url": format!("http://www.example.com/courses/{course_id}/modules/items/{}", fixture.topic_tag),
                "position": 3,
                "url": format!("http://www.example.com/api/v1/courses/{course_id}/discussion_topics/{}", fixture.topic_id),
                "title": "pls contribute",
                "indent": 0,
                "completion_requirement": {"type": "must_contribute"},
            },
            {
                "type": "SubHeader",
                "id": fixture.subheader_tag,
                "position": 4,
                "title": "external resources",
                "indent": 0,
            },
            {
                "type": "ExternalUrl",
                "id": fixture.external_url_tag,
                "html_url": format!("http://www.example.com/api/v1/courses/{course_id}/module_item_redirect/{}", fixture.external_url_tag),
                "position": 5,
                "title": "pls view",
                "indent": 1,
                "completion_requirement": {"type": "must_view"},
            }
        ])
    );
}

#[test]
fn shows_module_items_individually() {
    let fixture = lms_fixture();
    let links = links();
    let course_id = fixture.course.id;
    let module = fixture.course.module(fixture.module2).unwrap();

    let page = module.item(fixture.wiki_page_tag).unwrap();
    let value = serde_json::to_value(ModuleItemResponse::new(course_id, page, &links)).unwrap();
    assert_eq!(
        value,
        json!({
            "type": "Page",
            "id": fixture.wiki_page_tag,
            "html_url": format!("http://www.example.com/courses/{course_id}/modules/items/{}", fixture.wiki_page_tag),
            "position": 1,
            "title": "Front Page",
            "indent": 0,
            "url": format!("http://www.example.com/api/v1/courses/{course_id}/pages/front-page"),
        })
    );

    let file = module.item(fixture.attachment_tag).unwrap();
    let value = serde_json::to_value(ModuleItemResponse::new(course_id, file, &links)).unwrap();
    assert_eq!(
        value,
        json!({
            "type": "File",
            "id": fixture.attachment_tag,
            "html_url": format!("http://www.example.com/courses/{course_id}/modules/items/{}", fixture.attachment_tag),
            "position": 2,
            "title": "notes.txt",
            "indent": 0,
            "url": format!("http://www.example.com/api/v1/files/{}", fixture.attachment_id),
        })
    );
}

#[test]
fn time_gated_module_shows_locked() {
    let fixture = lms_fixture();
    let tracker = ProgressTracker::new();
    let student = Uuid::now_v7();

    let progress = tracker
        .evaluate(&fixture.course, fixture.module2, student, Utc::now())
        .unwrap();
    assert_eq!(progress.state, ProgressState::Locked);

    let module = fixture.course.module(fixture.module2).unwrap();
    let value = serde_json::to_value(ModuleResponse::with_progress(module, &progress)).unwrap();
    assert_eq!(value["state"], json!("locked"));
}

#[test]
fn progress_moves_through_started_to_completed() {
    let mut fixture = lms_fixture();
    // Relax the quiz and discussion requirements to keep the walk short.
    fixture
        .course
        .set_completion_requirements(
            fixture.module1,
            &[
                (fixture.assignment_tag, CompletionRequirement::MustSubmit),
                (fixture.external_url_tag, CompletionRequirement::MustView),
            ],
        )
        .unwrap();

    let tracker = ProgressTracker::new();
    let student = Uuid::now_v7();
    let now = Utc::now();

    let progress = tracker
        .evaluate(&fixture.course, fixture.module1, student, now)
        .unwrap();
    assert_eq!(progress.state, ProgressState::Unlocked);

    let assignment = fixture.course.find_item(fixture.assignment_tag).unwrap().clone();
    tracker.record_event(student, &assignment, EventKind::Submitted);
    let progress = tracker
        .evaluate(&fixture.course, fixture.module1, student, now)
        .unwrap();
    assert_eq!(progress.state, ProgressState::Started);
    assert!(progress.completed_at.is_none());

    let external = fixture.course.find_item(fixture.external_url_tag).unwrap().clone();
    tracker.record_event(student, &external, EventKind::Viewed);
    let completed_now = now + Duration::minutes(5);
    let progress = tracker
        .evaluate(&fixture.course, fixture.module1, student, completed_now)
        .unwrap();
    assert_eq!(progress.state, ProgressState::Completed);
    assert_eq!(progress.completed_at, Some(completed_now));

    let module = fixture.course.module(fixture.module1).unwrap();
    let value = serde_json::to_value(ModuleResponse::with_progress(module, &progress)).unwrap();
    assert_eq!(value["state"], json!("completed"));
    assert_eq!(
        value["completed_at"],
        serde_json::to_value(completed_now).unwrap()
    );
}

#[test]
fn item_completion_flips_after_the_matching_event() {
    let fixture = lms_fixture();
    let links = links();
    let tracker = ProgressTracker::new();
    let student = Uuid::now_v7();
    let assignment = fixture.course.find_item(fixture.assignment_tag).unwrap();

    let completed = tracker.item_completion(student, assignment);
    let value = serde_json::to_value(ModuleItemResponse::with_completion(
        fixture.course.id,
        assignment,
        &links,
        completed,
    ))
    .unwrap();
    assert_eq!(value["completion_requirement"]["type"], json!("must_submit"));
    assert_eq!(value["completion_requirement"]["completed"], json!(false));

    tracker.record_event(student, assignment, EventKind::Submitted);
    let completed = tracker.item_completion(student, assignment);
    let value = serde_json::to_value(ModuleItemResponse::with_completion(
        fixture.course.id,
        assignment,
        &links,
        completed,
    ))
    .unwrap();
    assert_eq!(value["completion_requirement"]["completed"], json!(true));
}

#[test]
fn redirect_views_count_toward_requirements() {
    let fixture = lms_fixture();
    let tracker = ProgressTracker::new();
    let student = Uuid::now_v7();

    // The redirect endpoint records a view before sending the learner
    // off to the external destination.
    let external = fixture.course.find_item(fixture.external_url_tag).unwrap();
    assert_eq!(
        external.external_url.as_deref(),
        Some("http://example.com/lolcats")
    );
    tracker.mark_viewed(student, external);

    let progress = tracker
        .evaluate(&fixture.course, fixture.module1, student, Utc::now())
        .unwrap();
    assert!(progress.requirements_met.contains(&fixture.external_url_tag));
    assert_eq!(progress.state, ProgressState::Started);
}

#[test]
fn prerequisite_completion_unlocks_the_next_module() {
    let mut fixture = lms_fixture();
    // Unlock module2's time gate so only the prerequisite holds it.
    fixture
        .course
        .set_unlock_at(fixture.module2, None)
        .unwrap();
    // Leave a single requirement on module1.
    fixture
        .course
        .set_completion_requirements(
            fixture.module1,
            &[(fixture.assignment_tag, CompletionRequirement::MustSubmit)],
        )
        .unwrap();

    let tracker = ProgressTracker::new();
    let student = Uuid::now_v7();
    let now = Utc::now();

    let progress = tracker
        .evaluate(&fixture.course, fixture.module2, student, now)
        .unwrap();
    assert_eq!(progress.state, ProgressState::Locked);

    let assignment = fixture.course.find_item(fixture.assignment_tag).unwrap().clone();
    tracker.record_event(student, &assignment, EventKind::Submitted);
    let progress = tracker
        .evaluate(&fixture.course, fixture.module2, student, now)
        .unwrap();
    assert_eq!(progress.state, ProgressState::Unlocked);
}
