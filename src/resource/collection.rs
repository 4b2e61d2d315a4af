use super::application::Application;
use super::entity::Resource;
use crate::atom::{AtomFeed, Pagination};
use crate::client::{DecodeOptions, Transport};
use crate::error::{Result, SplunkError};
use crate::types::{Message, Namespace, ResourceName, Version};
use chrono::{DateTime, FixedOffset};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Builds a typed entity from a decoded resource.
pub type EntityFactory<T> = Arc<dyn Fn(Resource) -> T + Send + Sync>;

/// Name of the sub-resource that makes the server reload a collection.
const RELOAD: &str = "_reload";

/// One fetched page of a collection. Immutable.
pub struct CollectionSnapshot<T> {
    title: String,
    updated: Option<DateTime<FixedOffset>>,
    generator_version: Option<Version>,
    pagination: Pagination,
    messages: Vec<Message>,
    entities: Vec<Arc<T>>,
}

impl<T> CollectionSnapshot<T> {
    fn from_feed(feed: AtomFeed, factory: &(dyn Fn(Resource) -> T + Send + Sync)) -> Result<Self> {
        let generator_version = feed.generator_version();
        let entities = feed
            .entries
            .into_iter()
            .map(|entry| Resource::from_entry(entry, generator_version).map(|r| Arc::new(factory(r))))
            .collect::<Result<Vec<_>>>()?;

        Ok(CollectionSnapshot {
            title: feed.title,
            updated: feed.updated,
            generator_version,
            pagination: feed.pagination,
            messages: feed.messages,
            entities,
        })
    }

    /// Feed title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Time the server produced the feed.
    pub fn updated(&self) -> Option<DateTime<FixedOffset>> {
        self.updated
    }

    /// Version of the server the feed was read from.
    pub fn generator_version(&self) -> Option<Version> {
        self.generator_version
    }

    /// Paging counters as reported by the server.
    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Server messages attached to the feed.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True before the first fetch or for an empty feed.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in feed order.
    pub fn entities(&self) -> &[Arc<T>] {
        &self.entities
    }
}

impl<T> Default for CollectionSnapshot<T> {
    fn default() -> Self {
        CollectionSnapshot {
            title: String::new(),
            updated: None,
            generator_version: None,
            pagination: Pagination::default(),
            messages: Vec::new(),
            entities: Vec::new(),
        }
    }
}

/// A server-side collection of entities of one kind.
///
/// The collection holds the page read by the latest
/// [`fetch_all`](Self::fetch_all). A fetch replaces that page as a whole, so
/// [`count`](Self::count), [`at`](Self::at) and [`iter`](Self::iter) always
/// agree with one feed. Entities keep the order the server sent them in.
///
/// # Examples
///
/// ```ignore
/// let apps = EntityCollection::applications(transport, Namespace::Default);
/// apps.fetch_all().await?;
/// for app in apps.iter() {
///     println!("{} {}", app.name(), app.version()?);
/// }
/// ```
pub struct EntityCollection<T> {
    transport: Arc<dyn Transport>,
    namespace: Namespace,
    name: ResourceName,
    factory: EntityFactory<T>,
    options: DecodeOptions,
    state: RwLock<Arc<CollectionSnapshot<T>>>,
}

impl<T> EntityCollection<T> {
    /// Create an empty collection; nothing is read until
    /// [`fetch_all`](Self::fetch_all).
    pub fn new<F>(transport: Arc<dyn Transport>, namespace: Namespace, name: ResourceName, factory: F) -> Self
    where
        F: Fn(Resource) -> T + Send + Sync + 'static,
    {
        EntityCollection {
            transport,
            namespace,
            name,
            factory: Arc::new(factory),
            options: DecodeOptions::default(),
            state: RwLock::new(Arc::new(CollectionSnapshot::default())),
        }
    }

    /// Use `options` for every read of this collection.
    pub fn with_decode_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Namespace of the collection.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Resource name of the collection.
    pub fn name(&self) -> &ResourceName {
        &self.name
    }

    /// Read the whole collection and replace the current page.
    ///
    /// On failure the current page is kept.
    pub async fn fetch_all(&self) -> Result<()> {
        let response = self.transport.get(&self.namespace, &self.name).await?;
        let feed = AtomFeed::read(response, &self.options).await?;
        let snapshot = CollectionSnapshot::from_feed(feed, &*self.factory)?;

        tracing::debug!(
            "fetched {}/{}: {} entities",
            self.namespace,
            self.name,
            snapshot.len()
        );
        *self.state.write() = Arc::new(snapshot);
        Ok(())
    }

    /// Ask the server to reload the collection from its configuration.
    ///
    /// Local state is left alone: call [`fetch_all`](Self::fetch_all)
    /// afterwards to see the effect.
    pub async fn reload(&self) -> Result<()> {
        let name = self.name.child(RELOAD);
        let mut response = self.transport.get(&self.namespace, &name).await?;
        response.ensure_status(&self.options.expected_status).await?;
        response.dispose();
        tracing::debug!("reloaded {}/{}", self.namespace, self.name);
        Ok(())
    }

    /// The current page.
    pub fn snapshot(&self) -> Arc<CollectionSnapshot<T>> {
        self.state.read().clone()
    }

    /// Number of entities in the current page.
    pub fn count(&self) -> usize {
        self.state.read().len()
    }

    /// Entity at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SplunkError::Index`] unless `index < count()`.
    pub fn at(&self, index: usize) -> Result<Arc<T>> {
        let state = self.state.read();
        state.entities.get(index).cloned().ok_or(SplunkError::Index {
            index,
            count: state.len(),
        })
    }

    /// Iterate over the current page in feed order.
    ///
    /// The iterator holds on to the page it started with; a concurrent fetch
    /// does not affect it.
    pub fn iter(&self) -> std::vec::IntoIter<Arc<T>> {
        self.snapshot().entities.clone().into_iter()
    }

    /// Paging counters of the current page.
    pub fn pagination(&self) -> Pagination {
        self.state.read().pagination
    }
}

impl EntityCollection<Application> {
    /// The installed apps (`apps/local`).
    pub fn applications(transport: Arc<dyn Transport>, namespace: Namespace) -> Self {
        Self::new(transport, namespace, ResourceName::applications(), Application::from)
    }
}

impl<T> fmt::Debug for EntityCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityCollection")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("count", &self.count())
            .finish()
    }
}
