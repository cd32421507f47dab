//! Shared fixtures for the API integration tests.
#![allow(dead_code)]

use std::sync::Once;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use uuid::Uuid;

use aula_core::config::Config;
use aula_core::modules::{
    CompletionRequirement, ContentType, Course, LinkBuilder, NewItem, NewModule,
};
use aula_core::roles::{Account, RoleAuthority};

static TRACING: Once = Once::new();

/// Install a test subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// A course with two modules mirroring a typical intro setup: one
/// module carrying one requirement of each kind, and a second module
/// that is time-gated, sequential, and prerequisite-locked behind the
/// first.
pub struct LmsFixture {
    pub course: Course,
    pub module1: Uuid,
    pub assignment_tag: Uuid,
    pub quiz_tag: Uuid,
    pub topic_tag: Uuid,
    pub subheader_tag: Uuid,
    pub external_url_tag: Uuid,
    pub module2: Uuid,
    pub wiki_page_tag: Uuid,
    pub attachment_tag: Uuid,
    pub christmas: DateTime<Utc>,
    pub assignment_id: Uuid,
    pub quiz_id: Uuid,
    pub topic_id: Uuid,
    pub attachment_id: Uuid,
}

pub fn lms_fixture() -> LmsFixture {
    init_tracing();
    let mut course = Course::new("Intro Course");

    let module1 = course.add_module(NewModule::new("module1"));
    let assignment_id = Uuid::now_v7();
    let assignment_tag = course
        .add_item(
            module1,
            NewItem::new(ContentType::Assignment, "pls submit").with_content(assignment_id),
        )
        .unwrap();
    let quiz_id = Uuid::now_v7();
    let quiz_tag = course
        .add_item(
            module1,
            NewItem::new(ContentType::Quiz, "score 10").with_content(quiz_id),
        )
        .unwrap();
    let topic_id = Uuid::now_v7();
    let topic_tag = course
        .add_item(
            module1,
            NewItem::new(ContentType::Discussion, "pls contribute").with_content(topic_id),
        )
        .unwrap();
    let subheader_tag = course
        .add_item(
            module1,
            NewItem::new(ContentType::SubHeader, "external resources"),
        )
        .unwrap();
    let external_url_tag = course
        .add_item(
            module1,
            NewItem::new(ContentType::ExternalUrl, "pls view")
                .with_external_url("http://example.com/lolcats")
                .with_indent(1),
        )
        .unwrap();
    course
        .set_completion_requirements(
            module1,
            &[
                (assignment_tag, CompletionRequirement::MustSubmit),
                (quiz_tag, CompletionRequirement::MinScore { min_score: 10.0 }),
                (topic_tag, CompletionRequirement::MustContribute),
                (external_url_tag, CompletionRequirement::MustView),
            ],
        )
        .unwrap();

    let christmas = Utc
        .with_ymd_and_hms(Utc::now().year() + 1, 12, 25, 7, 0, 0)
        .unwrap();
    let module2 = course.add_module(
        NewModule::new("do not open until christmas")
            .with_unlock_at(christmas)
            .sequential(),
    );
    course.set_prerequisites(module2, vec![module1]).unwrap();
    let wiki_page_tag = course
        .add_item(
            module2,
            NewItem::new(ContentType::Page, "Front Page").with_page_slug("front-page"),
        )
        .unwrap();
    let attachment_id = Uuid::now_v7();
    let attachment_tag = course
        .add_item(
            module2,
            NewItem::new(ContentType::File, "notes.txt").with_content(attachment_id),
        )
        .unwrap();

    LmsFixture {
        course,
        module1,
        assignment_tag,
        quiz_tag,
        topic_tag,
        subheader_tag,
        external_url_tag,
        module2,
        wiki_page_tag,
        attachment_tag,
        christmas,
        assignment_id,
        quiz_id,
        topic_id,
        attachment_id,
    }
}

/// Link builder over the test base URL.
pub fn links() -> LinkBuilder {
    LinkBuilder::new(Config::default_for_test().base_url)
}

/// Authority that grants role management to exactly one admin.
pub struct SingleAdmin(pub Uuid);

impl RoleAuthority for SingleAdmin {
    fn can_manage_roles(&self, actor: Uuid, _account: &Account) -> bool {
        actor == self.0
    }
}
