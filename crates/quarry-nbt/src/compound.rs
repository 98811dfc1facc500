use crate::Tag;

/// An insertion-ordered NBT compound. Entries are written in the order they
/// were added so encoded payloads stay byte-for-byte reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
    entries: Vec<(String, Tag)>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `name`, keeping the original position on replace.
    pub fn insert(&mut self, name: impl Into<String>, tag: impl Into<Tag>) -> &mut Self {
        let name = name.into();
        let tag = tag.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = tag,
            None => self.entries.push((name, tag)),
        }
        self
    }

    pub fn with(mut self, name: impl Into<String>, tag: impl Into<Tag>) -> Self {
        self.insert(name, tag);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Tag::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), t))
    }
}

impl FromIterator<(String, Tag)> for Compound {
    fn from_iter<I: IntoIterator<Item = (String, Tag)>>(iter: I) -> Self {
        let mut compound = Compound::new();
        for (name, tag) in iter {
            compound.insert(name, tag);
        }
        compound
    }
}
