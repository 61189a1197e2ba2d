use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A single (source, target) pair with its reference value.
///
/// For oracle mappings the value is the label (`1.0` means match); for
/// executed rules it is the similarity the pair was accepted with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub value: f64,
}

impl Link {
    pub fn new(source: impl Into<String>, target: impl Into<String>, value: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            value,
        }
    }
}

/// An insertion-ordered set of links keyed by (source, target).
///
/// Adding a pair that is already present overwrites its value in place, so
/// the latest judgement for a pair wins while the pair keeps its position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Link>", into = "Vec<Link>")]
pub struct Mapping {
    links: Vec<Link>,
    index: AHashMap<(String, String), usize>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn add(&mut self, source: impl Into<String>, target: impl Into<String>, value: f64) {
        self.push(Link::new(source, target, value));
    }

    pub fn push(&mut self, link: Link) {
        let key = (link.source.clone(), link.target.clone());
        match self.index.get(&key) {
            Some(&position) => self.links[position].value = link.value,
            None => {
                self.index.insert(key, self.links.len());
                self.links.push(link);
            }
        }
    }

    pub fn get(&self, source: &str, target: &str) -> Option<f64> {
        self.index
            .get(&(source.to_string(), target.to_string()))
            .map(|&position| self.links[position].value)
    }

    pub fn contains(&self, source: &str, target: &str) -> bool {
        self.get(source, target).is_some()
    }

    #[inline]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }

    /// Number of links whose value is exactly `1.0`
    pub fn positives(&self) -> usize {
        self.links.iter().filter(|l| l.value == 1.0).count()
    }
}

impl From<Vec<Link>> for Mapping {
    fn from(links: Vec<Link>) -> Self {
        links.into_iter().collect()
    }
}

impl From<Mapping> for Vec<Link> {
    fn from(mapping: Mapping) -> Self {
        mapping.links
    }
}

impl FromIterator<Link> for Mapping {
    fn from_iter<I: IntoIterator<Item = Link>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for link in iter {
            mapping.push(link);
        }
        mapping
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = &'a Link;
    type IntoIter = std::slice::Iter<'a, Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}
