use super::acl::Acl;
use super::entity::Resource;
use crate::convert::{BoolConverter, StringConverter, VersionConverter};
use crate::error::Result;
use crate::types::Version;
use std::ops::Deref;

/// An installed app (`apps/local/{name}`).
///
/// Accessors read the current snapshot. Text fields fall back to `""` when
/// absent; flags and the version are strict.
#[derive(Debug)]
pub struct Application {
    resource: Resource,
}

impl Application {
    /// Display name.
    pub fn label(&self) -> Result<String> {
        self.resource.get_value("label", &StringConverter)
    }

    /// App version, `0.0` when the app does not declare one.
    pub fn version(&self) -> Result<Version> {
        self.resource.get_value("version", &VersionConverter)
    }

    /// Author named in `app.conf`.
    pub fn author(&self) -> Result<String> {
        self.resource.get_value("author", &StringConverter)
    }

    /// Free-form description.
    pub fn description(&self) -> Result<String> {
        self.resource.get_value("description", &StringConverter)
    }

    /// Whether the app is disabled.
    pub fn is_disabled(&self) -> Result<bool> {
        self.resource.get_value("disabled", &BoolConverter)
    }

    /// Whether the app shows up in the app menu.
    pub fn is_visible(&self) -> Result<bool> {
        self.resource.get_value("visible", &BoolConverter)
    }

    /// Whether the server checks splunkbase for updates of the app.
    pub fn check_for_updates(&self) -> Result<bool> {
        self.resource.get_value("check_for_updates", &BoolConverter)
    }

    /// Ownership and permissions.
    pub fn acl(&self) -> Option<Acl> {
        self.resource.snapshot().acl().cloned()
    }

    /// The underlying resource.
    pub fn resource(&self) -> &Resource {
        &self.resource
    }
}

impl From<Resource> for Application {
    fn from(resource: Resource) -> Self {
        Application { resource }
    }
}

impl Deref for Application {
    type Target = Resource;

    fn deref(&self) -> &Resource {
        &self.resource
    }
}
