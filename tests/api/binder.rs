use crate::helpers::{
    ALPHA_DOCUMENT, TestBinder, configuration_for, generated_document,
    spawn_delayed_locations_server, spawn_locations_server, unreachable_address,
};
use actix_web::http::StatusCode;
use claims::{assert_err, assert_matches, assert_ok};
use locations::binder::{BinderError, LocationBinder, SyncOutcome};
use locations::domain::{Centre, Fragment, LocationsDocument};
use locations::source::{HttpLocationSource, LocationSource, SourceError};
use locations::view::{HtmlLinkList, LinkTemplates, MapView};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, mpsc};

#[tokio::test]
async fn alpha_scenario_lists_one_link_and_centres_the_map() {
    // Arrange
    let server = spawn_locations_server(StatusCode::OK, ALPHA_DOCUMENT).await;
    let mut binder = server.binder();

    // Act
    binder
        .initialize(&server.source(), &Fragment::default())
        .await
        .expect("Failed to initialize binder.");
    let outcome = binder.sync_map_to_fragment(&Fragment::parse("alpha"));

    // Assert
    assert_eq!(
        binder.list().items(),
        [r##"<li><a href="#alpha">Alpha Project</a></li>"##.to_string()]
    );
    let alpha = Centre::new(51.5, -0.1).unwrap();
    assert_eq!(outcome, SyncOutcome::Centred(alpha));
    assert_eq!(binder.map().pans, vec![(alpha, 11)]);
}

#[tokio::test]
async fn every_location_gets_one_link_in_document_order() {
    // Arrange
    let document = generated_document(25);
    let server = spawn_locations_server(StatusCode::OK, document.to_string()).await;
    let expected: LocationsDocument = serde_json::from_value(document).unwrap();
    let mut binder = server.binder();

    // Act
    assert_ok!(
        binder
            .initialize(&server.source(), &Fragment::default())
            .await
    );

    // Assert
    let templates = LinkTemplates::new();
    assert_eq!(binder.list().len(), expected.len());
    for (item, location) in binder.list().items().iter().zip(&expected.locations) {
        assert_eq!(item, &templates.render_link(location).unwrap());
    }
    assert_eq!(binder.lookup().len(), expected.len());
}

#[tokio::test]
async fn every_known_name_centres_the_map_exactly_once() {
    // Arrange
    let document = generated_document(10);
    let server = spawn_locations_server(StatusCode::OK, document.to_string()).await;
    let expected: LocationsDocument = serde_json::from_value(document).unwrap();
    let mut binder = server.binder();
    binder
        .initialize(&server.source(), &Fragment::default())
        .await
        .unwrap();

    for location in &expected.locations {
        // Act
        let before = binder.map().pans.len();
        binder.sync_map_to_fragment(&Fragment::parse(location.name.as_str()));

        // Assert
        assert_eq!(binder.map().pans.len(), before + 1);
        assert_eq!(binder.map().pans[before], (location.centre, 11));
    }
}

#[tokio::test]
async fn names_with_spaces_and_out_of_range_centres_are_listed() {
    // Arrange
    let body = r#"{"locations":[
        {"name":"alpha","human_readable_name":"Alpha Project","centre":[51.5,-0.1]},
        {"name":"east london","human_readable_name":"East London","centre":[51.52,-0.03]},
        {"name":" alpha","human_readable_name":"Spaced Alpha","centre":[95.0,0.0]}
    ]}"#;
    let server = spawn_locations_server(StatusCode::OK, body).await;
    let mut binder = server.binder();

    // Act
    assert_ok!(
        binder
            .initialize(&server.source(), &Fragment::default())
            .await
    );
    let east_london = binder.sync_map_to_fragment(&Fragment::parse("#east london"));

    // Assert
    assert_eq!(
        binder.list().items(),
        [
            r##"<li><a href="#alpha">Alpha Project</a></li>"##.to_string(),
            r##"<li><a href="#east london">East London</a></li>"##.to_string(),
            r##"<li><a href="# alpha">Spaced Alpha</a></li>"##.to_string(),
        ]
    );
    assert_eq!(binder.lookup().len(), 3);
    let centre = Centre::new(51.52, -0.03).unwrap();
    assert_eq!(east_london, SyncOutcome::Centred(centre));
    assert_eq!(binder.map().pans, vec![(centre, 11)]);
}

#[tokio::test]
async fn initial_fragment_is_applied_once_after_loading() {
    let server = spawn_locations_server(StatusCode::OK, ALPHA_DOCUMENT).await;
    let mut binder = server.binder();

    let outcome = binder
        .initialize(&server.source(), &Fragment::of_address("http://example.com/#alpha"))
        .await
        .unwrap();

    assert_matches!(outcome, SyncOutcome::Centred(_));
    assert_eq!(binder.map().pans.len(), 1);
}

#[tokio::test]
async fn unknown_fragment_leaves_the_map_alone_and_later_changes_still_work() {
    // Arrange
    let server = spawn_locations_server(StatusCode::OK, ALPHA_DOCUMENT).await;
    let mut binder = server.binder();
    binder
        .initialize(&server.source(), &Fragment::default())
        .await
        .unwrap();

    // Act
    let unknown = binder.sync_map_to_fragment(&Fragment::parse("does-not-exist"));
    let empty = binder.sync_map_to_fragment(&Fragment::default());
    let known = binder.sync_map_to_fragment(&Fragment::parse("alpha"));

    // Assert
    assert_eq!(unknown, SyncOutcome::Unresolved);
    assert_eq!(empty, SyncOutcome::Unresolved);
    assert_matches!(known, SyncOutcome::Centred(_));
    assert_eq!(binder.map().pans.len(), 1);
}

#[tokio::test]
async fn same_fragment_twice_pans_twice_identically() {
    // Arrange
    let server = spawn_locations_server(StatusCode::OK, ALPHA_DOCUMENT).await;
    let mut binder = server.binder();
    binder
        .initialize(&server.source(), &Fragment::default())
        .await
        .unwrap();

    // Act
    binder.sync_map_to_fragment(&Fragment::parse("alpha"));
    binder.sync_map_to_fragment(&Fragment::parse("alpha"));

    // Assert
    let pans = &binder.map().pans;
    assert_eq!(pans.len(), 2);
    assert_eq!(pans[0], pans[1]);
    assert_eq!(binder.list().len(), 1);
    assert_eq!(binder.lookup().len(), 1);
}

#[tokio::test]
async fn failed_fetch_populates_nothing_and_centres_nothing() {
    let test_cases = vec![
        (StatusCode::INTERNAL_SERVER_ERROR, ALPHA_DOCUMENT, "server error"),
        (StatusCode::OK, "{", "truncated body"),
    ];

    for (status, body, description) in test_cases {
        // Arrange
        let server = spawn_locations_server(status, body).await;
        let mut binder = server.binder();

        // Act
        let result = binder
            .initialize(&server.source(), &Fragment::parse("alpha"))
            .await;

        // Assert
        assert!(result.is_err(), "Fetch with {} did not fail", description);
        assert!(binder.list().is_empty(), "List populated after {}", description);
        assert!(binder.map().pans.is_empty(), "Map centred after {}", description);
    }
}

#[tokio::test]
async fn unreachable_endpoint_populates_nothing() {
    let configuration = configuration_for(&unreachable_address());
    let source = HttpLocationSource::from_settings(&configuration.application).unwrap();
    let mut binder = test_binder();

    let error = assert_err!(binder.initialize(&source, &Fragment::parse("alpha")).await);

    assert_matches!(error, BinderError::Source(SourceError::Request(_)));
    assert!(binder.list().is_empty());
    assert!(binder.map().pans.is_empty());
}

#[tokio::test]
async fn configured_timeout_stops_a_hanging_fetch() {
    // Arrange
    let mut server =
        spawn_delayed_locations_server(StatusCode::OK, ALPHA_DOCUMENT, Duration::from_secs(3))
            .await;
    server.configuration.application.timeout_seconds = Some(1);
    let mut binder = server.binder();

    // Act
    let error = assert_err!(
        binder
            .initialize(&server.source(), &Fragment::parse("alpha"))
            .await
    );

    // Assert
    assert_matches!(error, BinderError::Source(SourceError::Request(e)) if e.is_timeout());
    assert!(binder.list().is_empty());
    assert!(binder.map().pans.is_empty());
    assert!(!binder.is_loaded());
}

#[tokio::test]
async fn duplicate_names_are_rejected_before_binding() {
    let body = r#"{"locations":[
        {"name":"alpha","human_readable_name":"Alpha Project","centre":[51.5,-0.1]},
        {"name":"beta","human_readable_name":"Beta Project","centre":[52.2,0.1]},
        {"name":"alpha","human_readable_name":"Alpha Again","centre":[10.0,10.0]}
    ]}"#;
    let server = spawn_locations_server(StatusCode::OK, body).await;
    let mut binder = server.binder();

    let error = assert_err!(
        binder
            .initialize(&server.source(), &Fragment::parse("alpha"))
            .await
    );

    assert_matches!(error, BinderError::DuplicateName(name) if name.as_str() == "alpha");
    assert!(binder.list().is_empty());
    assert!(binder.lookup().is_empty());
    assert!(binder.map().pans.is_empty());
}

/// Serves a fixed document once `release` is notified.
struct GatedSource {
    document: LocationsDocument,
    release: Arc<Notify>,
}

impl LocationSource for GatedSource {
    async fn fetch(&self) -> Result<LocationsDocument, SourceError> {
        self.release.notified().await;
        Ok(self.document.clone())
    }
}

fn gated_alpha_source() -> (GatedSource, Arc<Notify>) {
    let release = Arc::new(Notify::new());
    let source = GatedSource {
        document: serde_json::from_str(ALPHA_DOCUMENT).unwrap(),
        release: release.clone(),
    };
    (source, release)
}

fn test_binder() -> TestBinder {
    TestBinder::new(
        Default::default(),
        HtmlLinkList::new("locations"),
        11,
    )
}

#[tokio::test]
async fn changes_while_loading_are_no_ops_and_latest_fragment_wins() {
    // Arrange
    let (source, release) = gated_alpha_source();
    let (sender, receiver) = mpsc::channel(8);

    // Act
    let run = tokio::spawn(async move {
        test_binder()
            .run(&source, Fragment::default(), receiver)
            .await
    });
    sender.send(Fragment::parse("alpha")).await.unwrap();
    // Let the binder observe the change while the document is still held back.
    while !sender.is_closed() && sender.capacity() < sender.max_capacity() {
        tokio::task::yield_now().await;
    }
    release.notify_one();
    drop(sender);
    let binder = run.await.unwrap().expect("Binder failed.");

    // Assert
    let alpha = Centre::new(51.5, -0.1).unwrap();
    assert_eq!(binder.map().pans, vec![(alpha, 11)]);
    assert_eq!(binder.list().len(), 1);
}

/// Records pans and reports each one as it happens.
struct SignallingMap {
    pans: Vec<(Centre, u8)>,
    signal: mpsc::UnboundedSender<Centre>,
}

impl MapView for SignallingMap {
    fn pan_to(&mut self, centre: Centre, zoom: u8) {
        self.pans.push((centre, zoom));
        let _ = self.signal.send(centre);
    }
}

#[tokio::test]
async fn run_follows_fragment_changes_after_loading() {
    // Arrange
    let (source, release) = gated_alpha_source();
    release.notify_one();
    let (signal, mut panned) = mpsc::unbounded_channel();
    let binder = LocationBinder::new(
        SignallingMap {
            pans: Vec::new(),
            signal,
        },
        HtmlLinkList::new("locations"),
        11,
    );
    let (sender, receiver) = mpsc::channel(8);
    let run = tokio::spawn(async move {
        binder
            .run(&source, Fragment::of_address("http://example.com/#alpha"), receiver)
            .await
    });
    // The initial sync has happened once the first pan is reported.
    let alpha = panned.recv().await.expect("Binder never centred the map.");

    // Act
    for line in ["#nowhere", "", "#alpha", "alpha"] {
        sender.send(Fragment::parse(line)).await.unwrap();
    }
    drop(sender);
    let binder = run.await.unwrap().expect("Binder failed.");

    // Assert
    assert_eq!(alpha, Centre::new(51.5, -0.1).unwrap());
    assert_eq!(binder.map().pans, vec![(alpha, 11); 3]);
}

#[tokio::test]
async fn run_centres_on_the_initial_fragment() {
    let (source, release) = gated_alpha_source();
    release.notify_one();
    let (sender, receiver) = mpsc::channel(1);
    drop(sender);

    let binder = test_binder()
        .run(&source, Fragment::of_address("http://example.com/#alpha"), receiver)
        .await
        .unwrap();

    assert_eq!(binder.map().pans.len(), 1);
}

#[tokio::test]
async fn run_surfaces_fetch_failures() {
    let configuration = configuration_for(&unreachable_address());
    let source = HttpLocationSource::from_settings(&configuration.application).unwrap();
    let (_sender, receiver) = mpsc::channel(1);

    let result = test_binder()
        .run(&source, Fragment::parse("alpha"), receiver)
        .await;

    assert_matches!(result, Err(BinderError::Source(_)));
}
