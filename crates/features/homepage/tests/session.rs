use folio_event_bus::EventBus;
use folio_homepage::catalog::SectionId;
use folio_homepage::{
    EditSession, LayoutService, LayoutVersion, LayoutViolation, MemoryLayoutStore, SaveFailure,
    SessionState,
};

async fn editor(service: &LayoutService<MemoryLayoutStore>) -> EditSession {
    EditSession::new(service.read().await.unwrap())
}

#[tokio::test]
async fn successful_save_returns_to_idle_on_new_version() {
    let service = LayoutService::new(MemoryLayoutStore::new(), EventBus::new());
    let mut session = editor(&service).await;

    session.move_section(SectionId::Blog, 1).unwrap();
    assert_eq!(session.state(), SessionState::Editing);

    let version = session.save(&service).await.unwrap();
    assert_eq!(version, LayoutVersion(2));
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.confirmed().sections[1].id, SectionId::Blog);
    assert!(!session.is_dirty());
    assert!(session.last_error().is_none());
}

#[tokio::test]
async fn conflict_discards_candidate_and_reloads() {
    let service = LayoutService::new(MemoryLayoutStore::new(), EventBus::new());
    let mut first = editor(&service).await;
    let mut second = editor(&service).await;

    first.move_section(SectionId::Blog, 1).unwrap();
    second.toggle_visibility(SectionId::Team).unwrap();
    first.save(&service).await.unwrap();

    let failure = second.save(&service).await.unwrap_err();
    assert!(matches!(failure, SaveFailure::Conflict { current: LayoutVersion(2) }));
    assert_eq!(second.state(), SessionState::Idle);
    assert!(second.candidate().is_none());
    assert_eq!(second.base_version(), LayoutVersion(2));
    assert_eq!(second.confirmed().sections[1].id, SectionId::Blog);
    assert!(matches!(second.last_error(), Some(SaveFailure::Conflict { .. })));

    // Redoing the intent on the fresh layout succeeds.
    second.toggle_visibility(SectionId::Team).unwrap();
    assert_eq!(second.save(&service).await.unwrap(), LayoutVersion(3));
}

#[tokio::test]
async fn invalid_save_stays_editing_with_candidate() {
    let service = LayoutService::new(MemoryLayoutStore::new(), EventBus::new());
    let mut session = editor(&service).await;

    session.toggle_visibility(SectionId::Hero).unwrap();
    let candidate = session.candidate().unwrap().to_vec();

    let failure = session.save(&service).await.unwrap_err();
    assert!(matches!(failure, SaveFailure::Invalid(LayoutViolation::RequiredSectionHidden)));
    assert_eq!(session.state(), SessionState::Editing);
    assert_eq!(session.candidate(), Some(candidate.as_slice()));
    assert_eq!(service.read().await.unwrap().version, LayoutVersion::INITIAL);

    // Fixing the candidate clears the error on the next save.
    session.toggle_visibility(SectionId::Hero).unwrap();
    session.save(&service).await.unwrap();
    assert!(session.last_error().is_none());
}

#[tokio::test]
async fn saving_without_changes_is_rejected() {
    let service = LayoutService::new(MemoryLayoutStore::new(), EventBus::new());
    let mut session = editor(&service).await;

    let failure = session.save(&service).await.unwrap_err();
    assert!(matches!(failure, SaveFailure::Rejected(_)));
    assert_eq!(service.read().await.unwrap().version, LayoutVersion::INITIAL);
}
