use super::*;

fn svg(tag: &str) -> Artifact {
    Artifact::new(format!("<svg>{tag}</svg>"))
}

fn dispatch(sync: &mut ArtifactSync, revision: u64) -> RefreshTicket {
    match sync.begin_refresh(revision) {
        RefreshStart::Dispatch(ticket) => ticket,
        RefreshStart::Pending(_) => panic!("expected dispatch"),
    }
}

#[test]
fn starts_empty_and_stale() {
    let sync = ArtifactSync::new();
    assert!(sync.cached().is_none());
    assert!(sync.is_stale());
    assert!(!sync.is_refreshing());
}

#[test]
fn successful_refresh_caches_and_clears_staleness() {
    let mut sync = ArtifactSync::new();
    let ticket = dispatch(&mut sync, 3);
    assert!(sync.is_refreshing());

    let out = sync.complete::<()>(ticket, Ok(svg("a")), 3).unwrap();
    assert_eq!(out, svg("a"));
    assert_eq!(sync.cached(), Some(&svg("a")));
    assert!(!sync.is_stale());
    assert!(!sync.is_refreshing());
}

#[test]
fn invalidate_keeps_cached_artifact() {
    let mut sync = ArtifactSync::new();
    sync.overwrite(svg("gen"), 1);
    sync.invalidate();
    assert!(sync.is_stale());
    assert_eq!(sync.cached(), Some(&svg("gen")));
}

#[test]
fn second_refresh_while_in_flight_sees_previous_artifact() {
    let mut sync = ArtifactSync::new();
    sync.overwrite(svg("old"), 1);
    let _ticket = dispatch(&mut sync, 2);

    assert_eq!(sync.begin_refresh(2), RefreshStart::Pending(Some(svg("old"))));
}

#[test]
fn mutation_during_render_leaves_result_stale() {
    let mut sync = ArtifactSync::new();
    let ticket = dispatch(&mut sync, 4);
    // document committed revision 5 while the render was outstanding
    sync.invalidate();

    sync.complete::<()>(ticket, Ok(svg("r4")), 5).unwrap();
    assert_eq!(sync.cached(), Some(&svg("r4")));
    assert!(sync.is_stale());
}

#[test]
fn failed_refresh_keeps_previous_artifact() {
    let mut sync = ArtifactSync::new();
    sync.overwrite(svg("good"), 2);
    let ticket = dispatch(&mut sync, 2);

    let err = sync.complete(ticket, Err("boom"), 2).unwrap_err();
    assert_eq!(err, "boom");
    assert_eq!(sync.cached(), Some(&svg("good")));
    assert!(sync.is_stale());
    assert!(!sync.is_refreshing());
}

#[test]
fn render_older_than_generated_artifact_is_discarded() {
    let mut sync = ArtifactSync::new();
    let ticket = dispatch(&mut sync, 1);
    sync.overwrite(svg("generated"), 2);

    let out = sync.complete::<()>(ticket, Ok(svg("render")), 2).unwrap();
    assert_eq!(out, svg("generated"));
    assert_eq!(sync.cached(), Some(&svg("generated")));
    assert!(!sync.is_stale());
}

#[test]
fn status_reflects_state() {
    let mut sync = ArtifactSync::new();
    assert_eq!(sync.status(), ArtifactStatus { present: false, stale: true, refreshing: false });
    let _ticket = dispatch(&mut sync, 0);
    assert!(sync.status().refreshing);
}
