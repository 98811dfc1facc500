use std::fmt;

const DEFAULT_NAMESPACE: &str = "minecraft";

/// A block with optional state properties, e.g. `minecraft:grass_block[snowy=true]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Block {
    identifier: String,
    properties: Vec<(String, String)>,
}

impl Block {
    /// Creates a block, adding the `minecraft:` namespace when none is given.
    pub fn new(identifier: &str) -> Self {
        let identifier = if identifier.contains(':') {
            identifier.to_string()
        } else {
            format!("{DEFAULT_NAMESPACE}:{identifier}")
        };
        Self {
            identifier,
            properties: Vec::new(),
        }
    }

    pub fn air() -> Self {
        Self::new("minecraft:air")
    }

    /// Sets `name=value`, replacing an earlier value for `name`.
    pub fn with_property(mut self, name: &str, value: &str) -> Self {
        match self.properties.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.properties.push((name.to_string(), value.to_string())),
        }
        self.properties.sort();
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn properties(&self) -> &[(String, String)] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_air(&self) -> bool {
        matches!(
            self.identifier.as_str(),
            "minecraft:air" | "minecraft:cave_air" | "minecraft:void_air"
        )
    }

    /// Canonical state key with properties sorted by name.
    pub fn state_key(&self) -> String {
        self.to_string()
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::air()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)?;
        if self.properties.is_empty() {
            return Ok(());
        }
        f.write_str("[")?;
        for (i, (name, value)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str("]")
    }
}
