use super::snapshot::Snapshot;
use crate::atom::{AtomEntry, AtomFeed};
use crate::client::{DecodeOptions, Transport};
use crate::convert::ValueConverter;
use crate::error::{Result, SplunkError};
use crate::types::{identity_from_id, Namespace, ResourceName, Version};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// A REST resource: a fixed identity and its current [`Snapshot`].
///
/// Readers take the snapshot with [`snapshot`](Self::snapshot) and keep a
/// consistent view for as long as they hold it. [`refresh`](Self::refresh)
/// replaces the whole snapshot in one step, so a concurrent reader sees either
/// the old or the new one, never a mixture.
pub struct Resource {
    namespace: Namespace,
    name: ResourceName,
    snapshot: RwLock<Arc<Snapshot>>,
}

impl Resource {
    /// Create a resource with an initial snapshot.
    pub fn new(namespace: Namespace, name: ResourceName, snapshot: Snapshot) -> Self {
        Resource {
            namespace,
            name,
            snapshot: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Create a resource from a decoded entry, taking its identity from the
    /// entry id.
    ///
    /// # Errors
    ///
    /// Returns [`SplunkError::InvalidResource`] if the id is not a REST
    /// resource URL, or the error of [`Snapshot::from_entry`].
    pub fn from_entry(entry: AtomEntry, generator_version: Option<Version>) -> Result<Self> {
        let (namespace, name) = identity_from_id(&entry.id)?;
        let snapshot = Snapshot::from_entry(entry, generator_version)?;
        Ok(Self::new(namespace, name, snapshot))
    }

    /// Namespace the resource lives in.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Full resource name within the namespace.
    pub fn resource_name(&self) -> &ResourceName {
        &self.name
    }

    /// Last part of the resource name, e.g. the app name.
    pub fn name(&self) -> &str {
        self.name.title()
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.read().clone()
    }

    /// Replace the current snapshot and return the previous one.
    pub fn refresh(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        std::mem::replace(&mut *self.snapshot.write(), snapshot)
    }

    /// Read a field of the current snapshot. See [`Snapshot::get_value`].
    pub fn get_value<T, C>(&self, name: &str, converter: &C) -> Result<T>
    where
        C: ValueConverter<T> + ?Sized,
    {
        self.snapshot().get_value(name, converter)
    }

    /// Read the entity again and replace the snapshot.
    ///
    /// Returns the new snapshot. The feed entry used is the one whose id
    /// names this resource; a feed without one is a [`SplunkError::Decode`].
    /// On failure the current snapshot is kept.
    pub async fn get(&self, transport: &dyn Transport, options: &DecodeOptions) -> Result<Arc<Snapshot>> {
        let response = transport.get(&self.namespace, &self.name).await?;
        let feed = AtomFeed::read(response, options).await?;
        let generator_version = feed.generator_version();

        let entry = feed
            .entries
            .into_iter()
            .find(|entry| self.is_entry_for(entry))
            .ok_or_else(|| SplunkError::Decode(format!("no entry in the feed for {}", self.name)))?;
        let snapshot = Arc::new(Snapshot::from_entry(entry, generator_version)?);

        *self.snapshot.write() = Arc::clone(&snapshot);
        tracing::debug!("refreshed {}/{}", self.namespace, self.name);
        Ok(snapshot)
    }
}

impl Resource {
    /// An entry belongs to this resource when its id names the same
    /// resource. Namespaces are not compared.
    fn is_entry_for(&self, entry: &AtomEntry) -> bool {
        identity_from_id(&entry.id).is_ok_and(|(_, name)| name == self.name)
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("snapshot", &self.snapshot.read().title())
            .finish()
    }
}
