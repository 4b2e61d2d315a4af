mod common;

use async_trait::async_trait;
use common::{init_tracing, APPS, EMPTY_FEED};
use parking_lot::Mutex;
use splunk_client::resource::Sharing;
use splunk_client::{
    Application, Context, EntityCollection, Namespace, Resource, ResourceName, Response,
    Result, SplunkError, Transport, Version,
};
use std::collections::VecDeque;
use std::sync::Arc;

/// Serves queued bodies in order and records what was asked for.
#[derive(Default)]
struct Scripted {
    bodies: Mutex<VecDeque<(u16, &'static str)>>,
    requests: Mutex<Vec<String>>,
}

impl Scripted {
    fn new(bodies: Vec<(u16, &'static str)>) -> Arc<Self> {
        Arc::new(Scripted {
            bodies: Mutex::new(bodies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for Scripted {
    async fn get(&self, namespace: &Namespace, name: &ResourceName) -> Result<Response> {
        self.requests.lock().push(format!("{}/{}", namespace, name));
        let (status, body) = self
            .bodies
            .lock()
            .pop_front()
            .ok_or_else(|| SplunkError::Config("no response queued".into()))?;
        Ok(Response::from_bytes(status, body))
    }
}

#[tokio::test]
async fn test_fetch_all_builds_applications() {
    init_tracing();
    let transport = Scripted::new(vec![(200, APPS)]);
    let apps = EntityCollection::applications(transport.clone(), Namespace::Default);
    assert_eq!(apps.count(), 0);

    apps.fetch_all().await.unwrap();
    assert_eq!(transport.requests(), ["/services/apps/local"]);
    assert_eq!(apps.count(), 2);
    assert_eq!(apps.pagination().total_results, 2);
    assert_eq!(apps.pagination().items_per_page, 30);

    let names: Vec<_> = apps.iter().map(|app| app.name().to_string()).collect();
    assert_eq!(names, ["launcher", "search"]);

    let search = apps.at(1).unwrap();
    assert_eq!(search.label().unwrap(), "Search & Reporting");
    assert_eq!(search.version().unwrap(), "6.1.1".parse::<Version>().unwrap());
    assert!(search.is_visible().unwrap());
    assert!(!search.is_disabled().unwrap());
    assert_eq!(search.description().unwrap(), "");
    assert!(search.acl().is_none());
    assert_eq!(search.namespace(), &Namespace::new("nobody", "system"));

    let acl = apps.at(0).unwrap().acl().unwrap();
    assert_eq!(acl.sharing, Sharing::App);
    assert_eq!(acl.perms.write, ["admin", "power"]);
    assert!(acl.can_write);
    assert!(!acl.removable);

    assert_eq!(
        apps.snapshot().generator_version(),
        Some("6.1.1".parse().unwrap())
    );
}

#[tokio::test]
async fn test_index_out_of_range() {
    let transport = Scripted::new(vec![(200, APPS)]);
    let apps = EntityCollection::applications(transport, Namespace::Default);
    apps.fetch_all().await.unwrap();

    assert!(apps.at(apps.count() - 1).is_ok());
    let err = apps.at(2).unwrap_err();
    assert!(matches!(err, SplunkError::Index { index: 2, count: 2 }));
}

#[tokio::test]
async fn test_fetch_replaces_whole_page() {
    let transport = Scripted::new(vec![(200, APPS), (200, EMPTY_FEED)]);
    let apps = EntityCollection::applications(transport, Namespace::Default);

    apps.fetch_all().await.unwrap();
    let before: Vec<_> = apps.iter().collect();

    apps.fetch_all().await.unwrap();
    assert_eq!(apps.count(), 0);
    assert!(apps.iter().next().is_none());
    assert_eq!(before.len(), 2);
    assert_eq!(before[0].name(), "launcher");
}

#[tokio::test]
async fn test_failed_fetch_keeps_page() {
    let transport = Scripted::new(vec![(200, APPS), (500, "<response>boom</response>")]);
    let apps = EntityCollection::applications(transport, Namespace::Default);
    tokio_test::assert_ok!(apps.fetch_all().await);

    let err = tokio_test::assert_err!(apps.fetch_all().await);
    assert!(matches!(err, SplunkError::Status { status: 500, .. }));
    assert_eq!(apps.count(), 2);
}

#[tokio::test]
async fn test_reload_does_not_refresh_local_state() {
    let transport = Scripted::new(vec![(200, APPS), (200, EMPTY_FEED)]);
    let apps = EntityCollection::applications(transport.clone(), Namespace::any());
    apps.fetch_all().await.unwrap();

    apps.reload().await.unwrap();
    assert_eq!(apps.count(), 2);
    assert_eq!(
        transport.requests(),
        ["/servicesNS/-/-/apps/local", "/servicesNS/-/-/apps/local/_reload"]
    );
}

#[tokio::test]
async fn test_custom_factory() {
    struct Named(String);

    let transport = Scripted::new(vec![(200, APPS)]);
    let collection = EntityCollection::new(
        transport,
        Namespace::Default,
        ResourceName::applications(),
        |resource: Resource| Named(resource.name().to_uppercase()),
    );
    collection.fetch_all().await.unwrap();
    let names: Vec<_> = collection.iter().map(|named| named.0.clone()).collect();
    assert_eq!(names, ["LAUNCHER", "SEARCH"]);
}

#[tokio::test]
async fn test_over_http_with_session_key() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    let feed = server
        .mock("GET", "/servicesNS/admin/search/apps/local")
        .match_header("authorization", "Splunk 1234abcd")
        .with_status(200)
        .with_header("content-type", "text/xml; charset=UTF-8")
        .with_body(APPS)
        .create_async()
        .await;
    let reload = server
        .mock("GET", "/servicesNS/admin/search/apps/local/_reload")
        .with_status(200)
        .with_body("<response/>")
        .create_async()
        .await;

    let context = Context::new(&server.url()).unwrap().with_session_key("1234abcd");
    let apps: EntityCollection<Application> =
        EntityCollection::applications(Arc::new(context), Namespace::new("admin", "search"));

    apps.fetch_all().await.unwrap();
    apps.reload().await.unwrap();

    feed.assert_async().await;
    reload.assert_async().await;
    assert_eq!(apps.count(), 2);
}

#[tokio::test]
async fn test_over_http_access_denied() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/services/apps/local")
        .with_status(401)
        .with_body("<response><messages><msg type=\"WARN\">call not properly authenticated</msg></messages></response>")
        .create_async()
        .await;

    let context = Context::new(&server.url()).unwrap();
    let apps = EntityCollection::applications(Arc::new(context), Namespace::Default);
    let err = apps.fetch_all().await.unwrap_err();
    assert!(err.is_access_denied());
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn test_single_resource_refresh() {
    let transport = Scripted::new(vec![(200, APPS)]);
    let apps = EntityCollection::applications(transport, Namespace::Default);
    apps.fetch_all().await.unwrap();
    let launcher = apps.at(0).unwrap();

    let updated = APPS.replace("<s:key name=\"label\">Home</s:key>", "<s:key name=\"label\">Start</s:key>");
    let single = Scripted::new(vec![(200, Box::leak(updated.into_boxed_str()))]);
    let before = launcher.snapshot();
    launcher.get(single.as_ref(), &Default::default()).await.unwrap();

    assert_eq!(launcher.label().unwrap(), "Start");
    assert_eq!(before.title(), "launcher");
    assert_eq!(
        single.requests(),
        ["/servicesNS/nobody/system/apps/local/launcher"]
    );
}
