//! A serializable description of a finalized [`RouteTable`](crate::RouteTable).
//!
//! It's meant for diagnostics: persist it at startup and diff it across deployments
//! to catch unexpected changes in dispatch order.
use std::path::Path;

use anyhow::Context;

use crate::endpoint::Endpoint;
use crate::reflection::Location;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// The endpoints of a route table, in dispatch order.
pub struct Manifest {
    pub endpoints: Vec<EndpointManifest>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A single endpoint in a [`Manifest`].
pub struct EndpointManifest {
    /// The route template, exactly as it was registered (prefixes included).
    pub pattern: String,
    pub display_name: String,
    pub order: i32,
    /// The accepted HTTP methods. `*` stands for any method.
    pub methods: Vec<String>,
    pub registered_at: Location,
}

impl From<&Endpoint> for EndpointManifest {
    fn from(endpoint: &Endpoint) -> Self {
        let methods = match endpoint.method_guard().methods() {
            None => vec!["*".to_owned()],
            Some(methods) => methods.iter().map(|m| m.as_str().to_owned()).collect(),
        };
        Self {
            pattern: endpoint.pattern().to_owned(),
            display_name: endpoint.display_name().to_owned(),
            order: endpoint.order(),
            methods,
            registered_at: endpoint.registered_at().clone(),
        }
    }
}

impl Manifest {
    /// Serialize the [`Manifest`] to a file in RON format.
    pub fn persist(&self, filepath: &Path) -> Result<(), anyhow::Error> {
        let config = ron::ser::PrettyConfig::new();
        let contents =
            ron::ser::to_string_pretty(self, config).context("Failed to serialize the manifest")?;
        fs_err::write(filepath, contents)?;
        Ok(())
    }

    /// Read a RON-encoded [`Manifest`] from a file.
    pub fn load(filepath: &Path) -> Result<Self, anyhow::Error> {
        let contents = fs_err::read_to_string(filepath)?;
        let value = ron::from_str(&contents)
            .with_context(|| format!("`{}` is not a valid manifest", filepath.display()))?;
        Ok(value)
    }
}
