//! Static software structure: application, packages, classes and methods.
//!
//! These types are the read-only input of the layout engine. They are produced
//! by whatever reconstructs the structure from application metadata and are
//! (de)serialized with the camelCase field names used on the wire.

use serde::{Deserialize, Serialize};

use crate::identifier::Id;

/// Method name marking a constructor call in trace data.
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// Root container of the structure tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Id,
    pub name: String,
    /// Top-level packages.
    #[serde(default)]
    pub packages: Vec<Component>,
}

impl Application {
    /// Creates an application without packages.
    pub fn new(id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            packages: Vec::new(),
        }
    }

    /// Adds a top-level package (builder style).
    pub fn with_package(mut self, package: Component) -> Self {
        self.packages.push(package);
        self
    }

    /// Returns every class of the application in depth-first order.
    pub fn classes(&self) -> Vec<&Class> {
        let mut classes = Vec::new();
        for package in &self.packages {
            package.collect_classes(&mut classes);
        }
        classes
    }

    /// Returns the number of entities (application, packages and classes) in the tree.
    pub fn entity_count(&self) -> usize {
        1 + self
            .packages
            .iter()
            .map(Component::entity_count)
            .sum::<usize>()
    }
}

/// A package. Holds classes and nested packages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub classes: Vec<Class>,
    #[serde(default)]
    pub sub_packages: Vec<Component>,
}

impl Component {
    /// Creates an empty package.
    pub fn new(id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            classes: Vec::new(),
            sub_packages: Vec::new(),
        }
    }

    /// Adds a class (builder style).
    pub fn with_class(mut self, class: Class) -> Self {
        self.classes.push(class);
        self
    }

    /// Adds a nested package (builder style).
    pub fn with_sub_package(mut self, package: Component) -> Self {
        self.sub_packages.push(package);
        self
    }

    /// Appends every class of this package and its sub-packages, own classes first.
    fn collect_classes<'a>(&'a self, out: &mut Vec<&'a Class>) {
        out.extend(self.classes.iter());
        for package in &self.sub_packages {
            package.collect_classes(out);
        }
    }

    fn entity_count(&self) -> usize {
        1 + self.classes.len()
            + self
                .sub_packages
                .iter()
                .map(Self::entity_count)
                .sum::<usize>()
    }
}

/// A class, rendered as a single building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: Id,
    pub name: String,
    /// Instance count known before trace analysis.
    #[serde(default)]
    pub instance_count: u64,
    #[serde(default)]
    pub methods: Vec<Method>,
}

impl Class {
    /// Creates a class with no methods and a zero instance count.
    pub fn new(id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            instance_count: 0,
            methods: Vec::new(),
        }
    }

    /// Adds a method (builder style).
    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }
}

/// A method, identified in traces by its hash code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    pub name: String,
    pub hash_code: String,
}

impl Method {
    pub fn new(name: impl Into<String>, hash_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hash_code: hash_code.into(),
        }
    }

    /// Creates a constructor method with the given hash code.
    pub fn constructor(hash_code: impl Into<String>) -> Self {
        Self::new(CONSTRUCTOR_NAME, hash_code)
    }

    /// Returns true if this method is a constructor.
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }
}
