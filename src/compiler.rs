use crate::args::{Args, Value, ValueKind};
use crate::error::CompileError;
use crate::graph::{ResourceGraph, ResourceNode};
use crate::package::{find_package, Package, PACKAGE_FILE};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Arguments for the package entrypoint.
    pub args: Args,
}

impl Options {
    pub fn with_args(mut self, args: Args) -> Self {
        self.args = args;
        self
    }
}

pub struct Compiler {
    base_dir: PathBuf,
    options: Options,
}

impl Compiler {
    pub fn new(base_dir: impl Into<PathBuf>, options: Options) -> Self {
        Self {
            base_dir: base_dir.into(),
            options,
        }
    }

    /// Locates the package enclosing `start` and uses its directory as the base.
    pub fn discover(start: &Path, options: Options) -> Result<Self, CompileError> {
        let package_file = find_package(start).ok_or_else(|| CompileError::WorkspaceNotFound {
            dir: start.to_path_buf(),
            file: PACKAGE_FILE,
        })?;
        let base_dir = package_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| start.to_path_buf());
        debug!("Discovered package at: {}", package_file.display());
        Ok(Self::new(base_dir, options))
    }

    /// Compiles the package found in the base directory.
    pub fn compile(&self) -> Result<ResourceGraph, CompileError> {
        let package = Package::load(&self.base_dir.join(PACKAGE_FILE))?;
        self.compile_package(&package)
    }

    pub fn compile_package(&self, package: &Package) -> Result<ResourceGraph, CompileError> {
        info!("Compiling package '{}'", package.name);
        let bound = self.bind_parameters(package)?;

        let mut declared = HashSet::new();
        for resource in &package.resources {
            if !declared.insert(resource.name.as_str()) {
                return Err(CompileError::DuplicateResource(resource.name.clone()));
            }
        }
        for resource in &package.resources {
            if let Some(dependency) = resource
                .depends_on
                .iter()
                .find(|dep| !declared.contains(dep.as_str()))
            {
                return Err(CompileError::UnknownDependency {
                    resource: resource.name.clone(),
                    dependency: dependency.clone(),
                });
            }
        }

        let mut graph = ResourceGraph::new();
        for resource in &package.resources {
            if is_enabled(package, &bound, &resource.name, resource.when.as_deref())? {
                graph.add_resource(ResourceNode {
                    name: resource.name.clone(),
                    resource_type: resource.resource_type.clone(),
                });
            } else {
                debug!("Skipping disabled resource '{}'", resource.name);
            }
        }

        for resource in &package.resources {
            let Some(from) = graph.find(&resource.name) else {
                continue;
            };
            for dependency in &resource.depends_on {
                if let Some(to) = graph.find(dependency) {
                    graph.add_dependency(from, to);
                }
            }
        }
        graph.mark_default_roots();

        info!(
            "Compiled {} resources with {} dependencies",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Matches the entrypoint arguments against the package's parameters,
    /// filling in defaults.
    fn bind_parameters(&self, package: &Package) -> Result<HashMap<String, Value>, CompileError> {
        let mut bound = HashMap::new();

        for (name, value) in self.options.args.iter() {
            let parameter = package
                .parameters
                .get(name)
                .ok_or_else(|| CompileError::UnknownArgument(name.to_string()))?;
            let value = coerce(value, parameter.kind).ok_or_else(|| CompileError::ArgumentKind {
                name: name.to_string(),
                expected: parameter.kind,
                found: value.kind(),
            })?;
            bound.insert(name.to_string(), value);
        }

        for (name, parameter) in &package.parameters {
            if bound.contains_key(name) {
                continue;
            }
            let default = parameter
                .default
                .as_ref()
                .ok_or_else(|| CompileError::MissingArgument(name.clone()))?;
            if default.kind() != parameter.kind {
                return Err(CompileError::DefaultKind {
                    name: name.clone(),
                    expected: parameter.kind,
                    found: default.kind(),
                });
            }
            bound.insert(name.clone(), default.clone());
        }

        Ok(bound)
    }
}

/// `--flag true` arrives as a string, so bool parameters accept the
/// strings `true` and `false` too.
fn coerce(value: &Value, kind: ValueKind) -> Option<Value> {
    match (value, kind) {
        (Value::Bool(b), ValueKind::Bool) => Some(Value::Bool(*b)),
        (Value::String(s), ValueKind::String) => Some(Value::String(s.clone())),
        (Value::String(s), ValueKind::Bool) => s.parse::<bool>().ok().map(Value::Bool),
        (Value::Bool(_), ValueKind::String) => None,
    }
}

fn is_enabled(
    package: &Package,
    bound: &HashMap<String, Value>,
    resource: &str,
    when: Option<&str>,
) -> Result<bool, CompileError> {
    let Some(parameter) = when else {
        return Ok(true);
    };
    let invalid = || CompileError::InvalidCondition {
        resource: resource.to_string(),
        parameter: parameter.to_string(),
    };
    match package.parameters.get(parameter) {
        Some(declared) if declared.kind == ValueKind::Bool => bound
            .get(parameter)
            .and_then(Value::as_bool)
            .ok_or_else(invalid),
        _ => Err(invalid()),
    }
}
